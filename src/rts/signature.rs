//! Signature types exchanged between signers, the aggregator and a
//! verifier.
//!
//! - [`PartialSignature`]: one signer's contribution `(cj, H(M)^(sj·Π))`
//! - [`AggregatedSignature`]: contributions re-encrypted for one verifier
//! - [`VerificationReport`]: per-signer diagnostics of an exact check

use serde::{Deserialize, Serialize};

use crate::{CurvePoint, Fr, PairingBackend, SignerSet, errors::Error};

/// Domain separation tag for hashing messages into G1.
pub const MESSAGE_DST: &[u8] = b"SWARM-RTS-V01-CS01-with-BLS12381G1_XMD:SHA-256_SSWU_RO_";

/// Hashes a message to the G1 point `H(M)`.
pub fn hash_message<B: PairingBackend<Scalar = Fr>>(message: &[u8]) -> B::G1 {
    B::G1::hash_to_curve(message, MESSAGE_DST)
}

/// One signer's contribution for a given coalition and threshold.
///
/// - `cj`: product of the first `t - 1` ElGamal first components
/// - `sig`: `H(M)` scaled by the Lagrange-weighted product of the second
///   components
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartialSignature<B: PairingBackend<Scalar = Fr>> {
    pub(crate) signer: usize,
    pub(crate) cj: Fr,
    pub(crate) sig: B::G1,
}

impl<B: PairingBackend<Scalar = Fr>> PartialSignature<B> {
    pub fn signer(&self) -> usize {
        self.signer
    }

    pub fn cj(&self) -> &Fr {
        &self.cj
    }

    pub fn sig(&self) -> &B::G1 {
        &self.sig
    }
}

/// Transformed aggregate handed to a verifier.
///
/// Entries are aligned and sorted by registry index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregatedSignature<B: PairingBackend<Scalar = Fr>> {
    pub(crate) aux: Vec<Fr>,
    pub(crate) sigs: Vec<B::G1>,
    pub(crate) signers: Vec<usize>,
}

impl<B: PairingBackend<Scalar = Fr>> AggregatedSignature<B> {
    pub fn aux(&self) -> &[Fr] {
        &self.aux
    }

    pub fn sigs(&self) -> &[B::G1] {
        &self.sigs
    }

    pub fn signers(&self) -> &[usize] {
        &self.signers
    }

    /// Number of contributors, which is also the threshold it claims.
    pub fn len(&self) -> usize {
        self.signers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }

    /// Checks the three lists line up and returns the contributor set.
    pub fn signer_set(&self) -> Result<SignerSet, Error> {
        if self.aux.len() != self.signers.len() || self.sigs.len() != self.signers.len() {
            return Err(Error::InvalidParameter(
                "aggregated signature lists have different lengths".into(),
            ));
        }
        SignerSet::new(self.signers.iter().copied())
    }
}

/// Verification strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerificationMode {
    /// One pairing check per contributor plus the aggregate check.
    #[default]
    Exact,
    /// A single randomly weighted check plus the aggregate check.
    Batch,
}

/// Outcome of exact-mode verification with per-signer diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VerificationReport {
    pub accepted: bool,
    /// Whether the summed signature matched the group key.
    pub aggregate_valid: bool,
    /// Registry indices whose individual check failed.
    pub rejected_signers: Vec<usize>,
}

//! Threshold signatures with aggregator-side transformation.
//!
//! The protocol runs between four roles that share one set of
//! [`PublicParameters`]:
//!
//! 1. **Setup** ([`TransformableThreshold::setup`]): draws the ElGamal base
//!    `g`, the aggregator secret `alpha` and `beta = g^alpha`.
//!
//! 2. **Key Generation** ([`TransformableThreshold::keygen`]): evaluates the
//!    hidden coefficient pairs at every signer identifier, encrypts the
//!    evaluations under `beta` and publishes the global and per-signer
//!    threshold ladders.
//!
//! 3. **Signing** ([`TransformableThreshold::sign`]): a signer multiplies the
//!    first `t - 1` ciphertexts of its share, weights the result with its
//!    Lagrange coefficient and scales `H(M)` by it. No share is decrypted.
//!
//! 4. **Aggregation** ([`TransformableThreshold::aggregate`]): the aggregator
//!    re-encrypts every contribution towards a verifier's ephemeral key and
//!    blinds it with a fresh session exponent.
//!
//! 5. **Verification** ([`TransformableThreshold::verify`],
//!    [`TransformableThreshold::batch_verify`]): the verifier removes the
//!    blinding with its secret and checks the pairing equations, either one
//!    per contributor or as one randomly weighted combination.
//!
//! A swarm split ([`SwarmThresholdScheme::split_swarm`]) rotates the
//! transformation key of a subset of signers by rewriting their ciphertexts
//! in place.

use core::fmt::Debug;

use rand_core::RngCore;

use crate::{Fr, PairingBackend, errors::Error};

mod params;
pub use params::{AggregatorSecret, PublicParameters, threshold_ladder_index};

mod elgamal;
pub use elgamal::{ElGamalCiphertext, ElGamalKeyPair};

mod coalition;
pub use coalition::{Coalition, SignerSet};

mod keys;
pub use keys::{KeyMaterial, SignerRecord, SignerRegistry, SignerShare};

mod signature;
pub use signature::{
    AggregatedSignature, MESSAGE_DST, PartialSignature, VerificationMode, VerificationReport,
    hash_message,
};

mod scheme;
pub use scheme::SwarmThresholdScheme;

mod split;
pub use split::{SealedGrant, SplitStrategy, SubSwarm, TransformationGrant};

/// Threshold signature scheme whose aggregates are transformed for a
/// designated verifier.
///
/// Rejection is reported as `Ok(false)`; errors are reserved for malformed
/// inputs and arithmetic failures.
pub trait TransformableThreshold<B: PairingBackend<Scalar = Fr>>:
    Debug + Send + Sync + 'static
{
    /// Generates public parameters and the aggregator secret.
    fn setup<R: RngCore + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<(PublicParameters<B>, AggregatorSecret), Error>;

    /// Generates a share for every signer with freshly drawn identifiers.
    fn keygen<R: RngCore + ?Sized>(
        &self,
        rng: &mut R,
        params: &PublicParameters<B>,
    ) -> Result<KeyMaterial<B>, Error>;

    /// Produces one partial signature on `message` for a coalition of
    /// exactly `threshold` members.
    fn sign(
        &self,
        params: &PublicParameters<B>,
        share: &SignerShare<B>,
        coalition: &Coalition,
        threshold: usize,
        message: &[u8],
    ) -> Result<PartialSignature<B>, Error>;

    /// Merges partial signatures and transforms them for the verifier whose
    /// public key is `verifier_public`.
    fn aggregate<R: RngCore + ?Sized>(
        &self,
        rng: &mut R,
        params: &PublicParameters<B>,
        secret: &AggregatorSecret,
        partials: &[PartialSignature<B>],
        verifier_public: &Fr,
    ) -> Result<AggregatedSignature<B>, Error>;

    /// Exact verification: one pairing check per contributor plus the
    /// aggregate check.
    fn verify(
        &self,
        params: &PublicParameters<B>,
        registry: &SignerRegistry<B>,
        sigma: &AggregatedSignature<B>,
        verifier: &ElGamalKeyPair,
        message: &[u8],
    ) -> Result<bool, Error>;

    /// Batch verification with random weights drawn from `rng`.
    fn batch_verify<R: RngCore + ?Sized>(
        &self,
        rng: &mut R,
        params: &PublicParameters<B>,
        registry: &SignerRegistry<B>,
        sigma: &AggregatedSignature<B>,
        verifier: &ElGamalKeyPair,
        message: &[u8],
    ) -> Result<bool, Error>;
}

//! Swarm splitting.
//!
//! A split rotates the transformation key for a subset of signers. The old
//! aggregator issues a [`TransformationGrant`] binding a fresh rotation
//! exponent to `alpha`:
//!
//! ```text
//! g_trot = g^t_rot,  h = H(g_trot),  stk = t_rot + alpha · (h + 1)  (mod q - 1)
//! ```
//!
//! The grant travels to the sub-swarm head sealed with ElGamal. Once
//! `g^stk == g_trot · beta^(h + 1)` holds, every ciphertext slot selected by
//! the [`SplitStrategy`] is moved from `beta` to `beta · g^stk`. All updates
//! are staged first and committed together.

use rand_core::RngCore;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::{
    AggregatorSecret, ElGamalCiphertext, ElGamalKeyPair, Exponent, FieldElement, Fr, PairingBackend,
    PublicParameters, SignerSet, SignerShare, SwarmThresholdScheme, errors::Error, exp,
};

const CHALLENGE_DOMAIN: &[u8] = b"swarm-rts/split-challenge/v1";

/// Which ciphertext slots a split rewrites.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SplitStrategy {
    /// Every held slot.
    #[default]
    Full,
    /// Only the first `ceil(log2(s + 1))` slots for a sub-swarm of size `s`.
    ///
    /// Thresholds that read past the rewritten slots no longer verify, so the
    /// strategy must be enabled through `SchemeConfig::allow_logarithmic_split`.
    Logarithmic,
}

impl SplitStrategy {
    /// Number of slots to rewrite for a sub-swarm of `sub_swarm_size` signers
    /// holding `held` slots each.
    pub fn slots(&self, sub_swarm_size: usize, held: usize) -> usize {
        match self {
            SplitStrategy::Full => held,
            SplitStrategy::Logarithmic => {
                let log = (usize::BITS - sub_swarm_size.leading_zeros()) as usize;
                log.min(held)
            }
        }
    }
}

/// Key rotation issued by the current aggregator.
#[derive(Clone, PartialEq, Eq)]
pub struct TransformationGrant {
    stk: Exponent,
    g_trot: Fr,
    h: Exponent,
}

impl core::fmt::Debug for TransformationGrant {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TransformationGrant")
            .field("stk", &"<redacted>")
            .field("g_trot", &self.g_trot)
            .finish()
    }
}

impl TransformationGrant {
    /// Draws `t_rot` and derives `stk` from the aggregator secret.
    pub fn issue<R: RngCore + ?Sized, B: PairingBackend<Scalar = Fr>>(
        rng: &mut R,
        params: &PublicParameters<B>,
        secret: &AggregatorSecret,
    ) -> Self {
        let t_rot = Exponent::random(rng);
        let g_trot = exp(params.g(), &t_rot);
        let h = challenge(&g_trot);
        let stk = t_rot.add(&secret.alpha().mul(&h.add(&Exponent::one())));
        Self { stk, g_trot, h }
    }

    /// The commitment `g^t_rot`.
    pub fn g_trot(&self) -> &Fr {
        &self.g_trot
    }

    /// Checks `g^stk == g_trot · beta^(h + 1)`.
    pub fn verify<B: PairingBackend<Scalar = Fr>>(
        &self,
        params: &PublicParameters<B>,
    ) -> Result<(), Error> {
        let lhs = exp(params.g(), &self.stk);
        let rhs = self.g_trot * exp(params.beta(), &self.h.add(&Exponent::one()));
        if lhs != rhs {
            warn!("transformation grant failed its consistency check");
            return Err(Error::Integrity("g^stk does not match g_trot * beta^(h+1)"));
        }
        Ok(())
    }

    /// Seals the grant for the sub-swarm head owning `recipient`.
    pub fn seal<R: RngCore + ?Sized, B: PairingBackend<Scalar = Fr>>(
        &self,
        rng: &mut R,
        params: &PublicParameters<B>,
        recipient: &Fr,
    ) -> Result<SealedGrant, Error> {
        let stk = self.stk.to_scalar()?;
        Ok(SealedGrant {
            stk: ElGamalCiphertext::encrypt(rng, params.g(), recipient, &stk),
            g_trot: ElGamalCiphertext::encrypt(rng, params.g(), recipient, &self.g_trot),
        })
    }
}

/// A [`TransformationGrant`] in transit to a sub-swarm head.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SealedGrant {
    stk: ElGamalCiphertext,
    g_trot: ElGamalCiphertext,
}

impl SealedGrant {
    /// Opens the grant and recomputes its challenge.
    pub fn open(&self, recipient: &ElGamalKeyPair) -> Result<TransformationGrant, Error> {
        let stk = Exponent::from_scalar(&self.stk.decrypt(recipient.secret())?);
        let g_trot = self.g_trot.decrypt(recipient.secret())?;
        Ok(TransformationGrant {
            stk,
            g_trot,
            h: challenge(&g_trot),
        })
    }
}

/// A split-off sub-swarm with its own transformation key.
#[derive(Clone, Debug)]
pub struct SubSwarm<B: PairingBackend<Scalar = Fr>> {
    /// Parameters carrying `beta' = beta · g^stk`.
    pub params: PublicParameters<B>,
    /// Aggregator secret `alpha' = alpha + stk`.
    pub secret: AggregatorSecret,
    pub members: SignerSet,
    pub strategy: SplitStrategy,
}

fn challenge(g_trot: &Fr) -> Exponent {
    Exponent::hash(CHALLENGE_DOMAIN, &FieldElement::to_repr(g_trot))
}

impl<B: PairingBackend<Scalar = Fr>> SwarmThresholdScheme<B> {
    /// Splits `shares` off into a sub-swarm headed by `sub_head`.
    ///
    /// Issues a grant, seals it to the head, opens and checks it, then
    /// rewrites the shares. On error no share is modified.
    #[instrument(level = "info", skip_all, fields(members = shares.len(), ?strategy))]
    pub fn split_swarm<R: RngCore + ?Sized>(
        &self,
        rng: &mut R,
        params: &PublicParameters<B>,
        secret: &AggregatorSecret,
        shares: &mut [SignerShare<B>],
        sub_head: &ElGamalKeyPair,
        strategy: SplitStrategy,
    ) -> Result<SubSwarm<B>, Error> {
        self.check_strategy(strategy)?;
        let sealed =
            TransformationGrant::issue(rng, params, secret).seal(rng, params, sub_head.public())?;
        let grant = sealed.open(sub_head)?;
        self.apply_grant(params, secret, &grant, shares, strategy)
    }

    /// Verifies `grant` and re-keys the selected slots of every share.
    pub fn apply_grant(
        &self,
        params: &PublicParameters<B>,
        secret: &AggregatorSecret,
        grant: &TransformationGrant,
        shares: &mut [SignerShare<B>],
        strategy: SplitStrategy,
    ) -> Result<SubSwarm<B>, Error> {
        self.check_strategy(strategy)?;
        let members = SignerSet::new(shares.iter().map(SignerShare::index))?;
        if members.is_empty() {
            return Err(Error::InvalidParameter("sub-swarm has no members".into()));
        }
        grant.verify(params)?;

        let staged = shares
            .iter()
            .map(|share| {
                let held = share.ciphertexts().len();
                let slots = strategy.slots(members.len(), held);
                if held < params.max_threshold() - 1 {
                    return Err(Error::InvalidParameter(format!(
                        "share {} holds {held} slots",
                        share.index()
                    )));
                }
                Ok(share
                    .ciphertexts()
                    .iter()
                    .enumerate()
                    .map(|(k, ct)| if k < slots { ct.rekey(&grant.stk) } else { *ct })
                    .collect::<Vec<_>>())
            })
            .collect::<Result<Vec<_>, Error>>()?;

        for (share, ciphertexts) in shares.iter_mut().zip(staged) {
            share.replace_ciphertexts(ciphertexts);
        }

        let beta = *params.beta() * exp(params.g(), &grant.stk);
        info!(members = members.len(), "sub-swarm re-keyed");
        Ok(SubSwarm {
            params: params.with_transformation_key(beta),
            secret: AggregatorSecret::new(secret.alpha().add(&grant.stk)),
            members,
            strategy,
        })
    }

    fn check_strategy(&self, strategy: SplitStrategy) -> Result<(), Error> {
        if strategy == SplitStrategy::Logarithmic && !self.config().allow_logarithmic_split {
            return Err(Error::InvalidConfig(
                "logarithmic split is disabled; set allow_logarithmic_split".into(),
            ));
        }
        Ok(())
    }
}

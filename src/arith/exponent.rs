//! Exponent ring of the ElGamal group `Z_q^*`.
//!
//! Share transport and the aggregator transformation operate in the
//! multiplicative group of the scalar field, whose order is `q - 1`.
//! Exponents therefore live modulo `q - 1`, which is even and composite, so
//! they cannot be represented by `Fr` itself. [`Exponent`] wraps an arbitrary
//! precision integer that is always kept reduced into `[0, q - 1)`.
//!
//! The module also hosts `hash_to_coprime`, which maps a group element to an
//! exponent that is invertible modulo `q - 1`.

use std::sync::OnceLock;

use blake3::Hasher;
use libpaillier::unknown_order::BigNumber;
use rand_core::RngCore;

use crate::{BackendError, FieldElement, Fr, config::CoprimeHashConfig};

const COPRIME_DOMAIN: &[u8] = b"swarm-rts/hash-to-coprime/v1";

/// Returns `q - 1`, the order of `Z_q^*`.
///
/// Computed once as the canonical integer of `-1 ∈ Fr`.
pub fn unit_group_order() -> &'static BigNumber {
    static ORDER: OnceLock<BigNumber> = OnceLock::new();
    ORDER.get_or_init(|| {
        let minus_one = -<Fr as FieldElement>::one();
        BigNumber::from_slice(FieldElement::to_repr(&minus_one))
    })
}

/// An integer modulo `q - 1`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exponent(BigNumber);

impl Exponent {
    /// Draws a uniformly distributed exponent.
    ///
    /// The draw reduces 64 random bytes modulo `q - 1`, which keeps the bias
    /// below `2^-250`.
    pub fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        let mut wide = [0u8; 64];
        rng.fill_bytes(&mut wide);
        Self::reduce(BigNumber::from_slice(wide))
    }

    /// Interprets a scalar's canonical integer as an exponent.
    pub fn from_scalar(scalar: &Fr) -> Self {
        Self::reduce(BigNumber::from_slice(FieldElement::to_repr(scalar)))
    }

    pub fn from_u64(n: u64) -> Self {
        Self::reduce(BigNumber::from(n))
    }

    /// Hashes `bytes` under `domain` into the exponent ring.
    pub fn hash(domain: &[u8], bytes: &[u8]) -> Self {
        Self::reduce(hash_wide(domain, bytes))
    }

    fn reduce(value: BigNumber) -> Self {
        Exponent(value.nmod(unit_group_order()))
    }

    pub fn zero() -> Self {
        Exponent(BigNumber::zero())
    }

    pub fn one() -> Self {
        Exponent(BigNumber::one())
    }

    pub fn is_zero(&self) -> bool {
        self.0 == BigNumber::zero()
    }

    pub fn add(&self, other: &Self) -> Self {
        Exponent(self.0.modadd(&other.0, unit_group_order()))
    }

    pub fn mul(&self, other: &Self) -> Self {
        Exponent(self.0.modmul(&other.0, unit_group_order()))
    }

    /// Inverse modulo `q - 1`; fails when the value shares a factor with `q - 1`.
    pub fn invert(&self) -> Result<Self, BackendError> {
        self.0
            .invert(unit_group_order())
            .map(Exponent)
            .ok_or(BackendError::Math("exponent is not invertible modulo q - 1"))
    }

    /// 256-bit little-endian limbs, the form consumed by [`FieldElement::pow`].
    pub fn to_limbs(&self) -> [u64; 4] {
        let bytes = self.to_be_bytes();
        let mut limbs = [0u64; 4];
        for (i, limb) in limbs.iter_mut().enumerate() {
            let end = 32 - 8 * i;
            let mut word = [0u8; 8];
            word.copy_from_slice(&bytes[end - 8..end]);
            *limb = u64::from_be_bytes(word);
        }
        limbs
    }

    /// Embeds the exponent into `Fr`; exact because `q - 1 < q`.
    pub fn to_scalar(&self) -> Result<Fr, BackendError> {
        <Fr as FieldElement>::from_repr(&self.to_be_bytes())
    }

    fn to_be_bytes(&self) -> [u8; 32] {
        let raw = self.0.to_bytes();
        let mut out = [0u8; 32];
        // reduced values never exceed 32 bytes
        let take = raw.len().min(32);
        out[32 - take..].copy_from_slice(&raw[raw.len() - take..]);
        out
    }

    /// Returns `true` if no listed prime divides this value.
    pub fn is_coprime_to(&self, factors: &[u64]) -> bool {
        coprime_to_factors(&self.0, factors)
    }
}

/// Computes `base^e` in `Z_q^*`.
pub fn exp(base: &Fr, e: &Exponent) -> Fr {
    FieldElement::pow(base, &e.to_limbs())
}

/// Maps `value` to an exponent that is invertible modulo `q - 1`.
///
/// The candidate is a wide BLAKE3 digest reduced modulo `q - 1`. While any
/// configured prime factor of `q - 1` divides it, the candidate is advanced
/// by `config.step`. The loop is capped at `config.retry_limit` candidates.
pub fn hash_to_coprime(
    value: &Fr,
    config: &CoprimeHashConfig,
) -> Result<Exponent, BackendError> {
    let step = BigNumber::from(config.step);
    let mut candidate =
        hash_wide(COPRIME_DOMAIN, &FieldElement::to_repr(value)).nmod(unit_group_order());
    for _ in 0..config.retry_limit {
        if coprime_to_factors(&candidate, &config.factors) {
            return Ok(Exponent::reduce(candidate));
        }
        candidate = &candidate + &step;
    }
    Err(BackendError::Math("hash-to-coprime retry limit reached"))
}

fn coprime_to_factors(value: &BigNumber, factors: &[u64]) -> bool {
    let zero = BigNumber::zero();
    factors
        .iter()
        .all(|&p| value.nmod(&BigNumber::from(p)) != zero)
}

fn hash_wide(domain: &[u8], bytes: &[u8]) -> BigNumber {
    let mut hasher = Hasher::new();
    hasher.update(domain);
    hasher.update(&(bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
    let mut wide = [0u8; 64];
    hasher.finalize_xof().fill(&mut wide);
    BigNumber::from_slice(wide)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::arith::field::random_unit;

    #[test]
    fn default_factors_divide_the_group_order() {
        let order = unit_group_order();
        for p in CoprimeHashConfig::default().factors {
            assert_eq!(order.nmod(&BigNumber::from(p)), BigNumber::zero(), "{p} must divide q - 1");
        }
    }

    #[test]
    fn group_order_reduces_to_zero() {
        let mut rng = StdRng::seed_from_u64(1);
        let base = random_unit(&mut rng, false).unwrap();
        // q - 1 reduces to zero, so base^(q-1) == 1 is observed as base^0
        let e = Exponent(unit_group_order().clone());
        assert!(Exponent::reduce(e.0).is_zero());
        assert_eq!(exp(&base, &Exponent::zero()), <Fr as FieldElement>::one());
        assert_eq!(exp(&base, &Exponent::one()), base);
    }

    #[test]
    fn exponent_arithmetic_matches_group_law() {
        let mut rng = StdRng::seed_from_u64(2);
        let g = random_unit(&mut rng, true).unwrap();
        let a = Exponent::random(&mut rng);
        let b = Exponent::random(&mut rng);
        assert_eq!(exp(&g, &a.add(&b)), exp(&g, &a) * exp(&g, &b));
        assert_eq!(exp(&g, &a.mul(&b)), exp(&exp(&g, &a), &b));
    }

    #[test]
    fn hash_to_coprime_is_invertible_and_deterministic() {
        let mut rng = StdRng::seed_from_u64(3);
        let config = CoprimeHashConfig::default();
        for _ in 0..64 {
            let value = <Fr as FieldElement>::random(&mut rng);
            let h = hash_to_coprime(&value, &config).unwrap();
            assert_eq!(h, hash_to_coprime(&value, &config).unwrap());
            assert!(h.is_coprime_to(&config.factors));
            assert_eq!(h.0.gcd(unit_group_order()), BigNumber::one());
            let inv = h.invert().unwrap();
            assert_eq!(h.mul(&inv), Exponent::one());
        }
    }

    #[test]
    fn hash_to_coprime_respects_retry_cap() {
        // a step that is itself a multiple of 2 can never escape an even candidate
        let config = CoprimeHashConfig {
            factors: vec![2, 3],
            step: 6,
            retry_limit: 4,
        };
        let mut rng = StdRng::seed_from_u64(4);
        let mut saw_failure = false;
        for _ in 0..32 {
            let value = <Fr as FieldElement>::random(&mut rng);
            match hash_to_coprime(&value, &config) {
                Ok(h) => assert!(h.is_coprime_to(&config.factors)),
                Err(BackendError::Math(_)) => saw_failure = true,
                Err(other) => panic!("unexpected error {other:?}"),
            }
        }
        assert!(saw_failure);
    }

    #[test]
    fn limbs_and_scalar_embedding_agree() {
        let mut rng = StdRng::seed_from_u64(5);
        let e = Exponent::random(&mut rng);
        let s = e.to_scalar().unwrap();
        assert_eq!(Exponent::from_scalar(&s), e);
        let base = <Fr as FieldElement>::from_u64(7);
        assert_eq!(exp(&base, &Exponent::from_u64(3)), <Fr as FieldElement>::from_u64(343));
    }

    #[test]
    fn non_coprime_values_are_not_invertible() {
        assert!(Exponent::from_u64(2).invert().is_err());
        assert!(Exponent::from_u64(11).invert().is_err());
        assert!(Exponent::from_u64(13).invert().is_ok());
    }
}

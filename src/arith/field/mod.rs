use std::fmt::Debug;

use rand_core::RngCore;

use crate::BackendError;

mod blst_bls12_381;
pub use blst_bls12_381::Fr;

/// Number of attempts made when rejection-sampling a unit of `Fr`.
pub const UNIT_SAMPLING_RETRY_MAX: usize = 64;

/// Field element abstraction for scalar field operations.
///
/// This trait abstracts over the scalar field Fr of the pairing curve. The
/// same field doubles as the modulus `q` of the multiplicative ElGamal group
/// `Z_q^*` used for share transport, so every "mod q" value of the protocol is
/// an `Fr`.
///
/// # Example
///
/// ```rust
/// use rand::thread_rng;
/// use swarm_rts::{FieldElement, Fr};
///
/// let mut rng = thread_rng();
/// let a = <Fr as FieldElement>::random(&mut rng);
///
/// let inv = FieldElement::invert(&a).expect("non-zero element");
/// assert_eq!(a * inv, <Fr as FieldElement>::one());
///
/// let bytes = FieldElement::to_repr(&a);
/// let recovered = <Fr as FieldElement>::from_repr(&bytes).expect("valid repr");
/// assert_eq!(a, recovered);
/// ```
pub trait FieldElement: Clone + Send + Sync + Debug + PartialEq + Eq + 'static + Copy {
    /// Byte representation type (32-byte big-endian for bls12-381 scalars).
    type Repr: AsRef<[u8]> + Default + Debug + Send + Sync + Clone + 'static;

    /// Returns the additive identity (zero) element.
    fn zero() -> Self;

    /// Returns the multiplicative identity (one) element.
    fn one() -> Self;

    /// Generates a random field element using the provided RNG.
    fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self;

    /// Computes the multiplicative inverse, returning `None` for zero.
    fn invert(&self) -> Option<Self>;

    /// Raises this element to a power given as 256-bit little-endian limbs.
    ///
    /// Runs in time independent of the exponent, which is often secret.
    fn pow(&self, exp: &[u64; 4]) -> Self;

    /// Serializes this field element to its byte representation.
    fn to_repr(&self) -> Self::Repr;

    /// Deserializes a field element from its byte representation.
    ///
    /// Returns an error if the representation is invalid (e.g., not reduced
    /// modulo the field order).
    fn from_repr(repr: &[u8]) -> Result<Self, BackendError>;

    /// Performs batch inversion of a slice of field elements.
    fn batch_inversion(elements: &mut [Self]) -> Result<(), BackendError>;

    /// Convert u64 to self.
    fn from_u64(n: u64) -> Self;

    /// Convert u128 to self.
    fn from_u128(n: u128) -> Self;

    /// Returns `true` for the additive identity.
    fn is_zero(&self) -> bool {
        *self == Self::zero()
    }
}

/// Samples a uniformly random unit of `Z_q^*`.
///
/// Zero is always rejected; `exclude_one` additionally rejects the identity,
/// which is required for group bases such as the ElGamal generator `g`.
pub fn random_unit<R: RngCore + ?Sized>(
    rng: &mut R,
    exclude_one: bool,
) -> Result<Fr, BackendError> {
    let one = <Fr as FieldElement>::one();
    std::iter::repeat_with(|| <Fr as FieldElement>::random(rng))
        .take(UNIT_SAMPLING_RETRY_MAX)
        .find(|x| !FieldElement::is_zero(x) && !(exclude_one && *x == one))
        .ok_or(BackendError::Math("failed to sample a unit of Z_q"))
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn batch_inversion_matches_single_inversion() {
        let mut rng = StdRng::seed_from_u64(7);
        let values: Vec<Fr> = (0..8).map(|_| <Fr as FieldElement>::random(&mut rng)).collect();
        let mut inverted = values.clone();
        <Fr as FieldElement>::batch_inversion(&mut inverted).unwrap();
        for (v, inv) in values.iter().zip(inverted.iter()) {
            assert_eq!(FieldElement::invert(v).unwrap(), *inv);
        }
    }

    #[test]
    fn batch_inversion_rejects_zero() {
        let mut values = vec![<Fr as FieldElement>::from_u64(3), <Fr as FieldElement>::zero()];
        assert!(<Fr as FieldElement>::batch_inversion(&mut values).is_err());
    }

    #[test]
    fn repr_rejects_bad_lengths_and_unreduced_values() {
        assert!(<Fr as FieldElement>::from_repr(&[1u8; 31]).is_err());
        assert!(<Fr as FieldElement>::from_repr(&[0xffu8; 32]).is_err());
        let x = <Fr as FieldElement>::from_u64(123_456_789);
        let repr = FieldElement::to_repr(&x);
        assert_eq!(<Fr as FieldElement>::from_repr(repr.as_ref()).unwrap(), x);
    }

    #[test]
    fn random_unit_excludes_identity() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..32 {
            let u = random_unit(&mut rng, true).unwrap();
            assert!(!FieldElement::is_zero(&u));
            assert_ne!(u, <Fr as FieldElement>::one());
        }
    }

    #[test]
    fn u128_conversion_spans_both_words() {
        let hi_lo = <Fr as FieldElement>::from_u128((5u128 << 64) | 9);
        let expected = <Fr as FieldElement>::from_u64(5)
            * <Fr as FieldElement>::from_u128(1u128 << 64)
            + <Fr as FieldElement>::from_u64(9);
        assert_eq!(hi_lo, expected);
    }

    #[test]
    fn pow_matches_variable_time_reference() {
        use ff::Field;

        let mut rng = StdRng::seed_from_u64(13);
        let x = <Fr as FieldElement>::random(&mut rng);
        for _ in 0..8 {
            let limbs = [rng.next_u64(), rng.next_u64(), rng.next_u64(), rng.next_u64() >> 2];
            assert_eq!(FieldElement::pow(&x, &limbs), x.pow_vartime(limbs));
        }

        // Fermat: x^(q-1) = 1 for the group order of Z_q^*
        let order = (-<Fr as FieldElement>::one()).to_bytes_le();
        let mut limbs = [0u64; 4];
        for (limb, chunk) in limbs.iter_mut().zip(order.chunks_exact(8)) {
            let mut word = [0u8; 8];
            word.copy_from_slice(chunk);
            *limb = u64::from_le_bytes(word);
        }
        assert_eq!(FieldElement::pow(&x, &limbs), <Fr as FieldElement>::one());
        assert_eq!(FieldElement::pow(&x, &[0; 4]), <Fr as FieldElement>::one());
    }
}

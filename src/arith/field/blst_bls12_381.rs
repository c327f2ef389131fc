//! blst-backed scalar field for BLS12-381.
//!
//! Implements [`FieldElement`] for `blstrs::Scalar`. Encodings are 32-byte
//! big-endian, matching the integer view used by the exponent ring.

use blstrs::Scalar;
use ff::{Field, PrimeField};
use rand_core::RngCore;

use crate::{BackendError, FieldElement};

pub type Fr = Scalar;

impl FieldElement for Scalar {
    type Repr = [u8; 32];

    fn zero() -> Self {
        Scalar::ZERO
    }

    fn one() -> Self {
        Scalar::ONE
    }

    fn random<R: RngCore + ?Sized>(rng: &mut R) -> Self {
        <Scalar as Field>::random(rng)
    }

    fn invert(&self) -> Option<Self> {
        Field::invert(self).into()
    }

    fn pow(&self, exp: &[u64; 4]) -> Self {
        Field::pow(self, exp)
    }

    fn to_repr(&self) -> Self::Repr {
        self.to_bytes_be()
    }

    fn from_repr(repr: &[u8]) -> Result<Self, BackendError> {
        let bytes: [u8; 32] = repr
            .try_into()
            .map_err(|_| BackendError::Serialization("invalid scalar length"))?;
        Option::<Scalar>::from(Scalar::from_bytes_be(&bytes))
            .ok_or(BackendError::Serialization("invalid scalar bytes"))
    }

    fn batch_inversion(elements: &mut [Self]) -> Result<(), BackendError> {
        use ff::BatchInvert;

        if elements.is_empty() {
            return Ok(());
        }

        // Check for zero elements before batch inversion
        if elements.iter().any(|elem| bool::from(Field::is_zero(elem))) {
            return Err(BackendError::Math("cannot invert zero element"));
        }

        // Montgomery's trick
        elements.iter_mut().batch_invert();

        Ok(())
    }

    fn from_u64(n: u64) -> Self {
        Scalar::from(n)
    }

    fn from_u128(n: u128) -> Self {
        <Scalar as PrimeField>::from_u128(n)
    }
}

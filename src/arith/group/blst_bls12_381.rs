//! blst-backed curve groups for BLS12-381.
//!
//! Exported types:
//! - `G1`, `G2` - projective points of the two source groups
//! - `Gt` - the pairing target group
//!
//! Messages are hashed with the RFC 9380 `hash_to_curve` suite exposed by
//! `blstrs`; compressed encodings are 48 bytes (G1) and 96 bytes (G2).

use blstrs::{G1Affine, G1Projective, G2Affine, G2Projective, Gt as BlstGt, Scalar};
use group::{Curve, Group};

use crate::{BackendError, CurvePoint, TargetGroup};

pub type G1 = G1Projective;
pub type G2 = G2Projective;
pub type Gt = BlstGt;

impl CurvePoint<Scalar> for G1 {
    type Affine = G1Affine;

    fn identity() -> Self {
        <G1Projective as Group>::identity()
    }

    fn generator() -> Self {
        <G1Projective as Group>::generator()
    }

    fn is_identity(&self) -> bool {
        <Self as Group>::is_identity(self).into()
    }

    fn to_affine(&self) -> Self::Affine {
        <Self as Curve>::to_affine(self)
    }

    fn add(&self, other: &Self) -> Self {
        self + other
    }

    fn sub(&self, other: &Self) -> Self {
        self - other
    }

    fn negate(&self) -> Self {
        -self
    }

    fn mul_scalar(&self, scalar: &Scalar) -> Self {
        self * scalar
    }

    fn multi_scalar_multiplication(
        points: &[Self],
        scalars: &[Scalar],
    ) -> Result<Self, BackendError> {
        if points.len() != scalars.len() {
            return Err(BackendError::Math("msm length mismatch"));
        }
        Ok(G1Projective::multi_exp(points, scalars))
    }

    fn hash_to_curve(message: &[u8], dst: &[u8]) -> Self {
        G1Projective::hash_to_curve(message, dst, &[])
    }

    fn to_compressed(&self) -> Vec<u8> {
        <Self as Curve>::to_affine(self).to_compressed().to_vec()
    }

    fn from_compressed(bytes: &[u8]) -> Result<Self, BackendError> {
        let bytes: [u8; 48] = bytes
            .try_into()
            .map_err(|_| BackendError::Serialization("invalid G1 length"))?;
        Option::<G1Affine>::from(G1Affine::from_compressed(&bytes))
            .map(G1Projective::from)
            .ok_or(BackendError::Serialization("invalid G1 bytes"))
    }
}

impl CurvePoint<Scalar> for G2 {
    type Affine = G2Affine;

    fn identity() -> Self {
        <G2Projective as Group>::identity()
    }

    fn generator() -> Self {
        <G2Projective as Group>::generator()
    }

    fn is_identity(&self) -> bool {
        <Self as Group>::is_identity(self).into()
    }

    fn to_affine(&self) -> Self::Affine {
        <Self as Curve>::to_affine(self)
    }

    fn add(&self, other: &Self) -> Self {
        self + other
    }

    fn sub(&self, other: &Self) -> Self {
        self - other
    }

    fn negate(&self) -> Self {
        -self
    }

    fn mul_scalar(&self, scalar: &Scalar) -> Self {
        self * scalar
    }

    fn multi_scalar_multiplication(
        points: &[Self],
        scalars: &[Scalar],
    ) -> Result<Self, BackendError> {
        if points.len() != scalars.len() {
            return Err(BackendError::Math("msm length mismatch"));
        }
        Ok(G2Projective::multi_exp(points, scalars))
    }

    fn hash_to_curve(message: &[u8], dst: &[u8]) -> Self {
        G2Projective::hash_to_curve(message, dst, &[])
    }

    fn to_compressed(&self) -> Vec<u8> {
        <Self as Curve>::to_affine(self).to_compressed().to_vec()
    }

    fn from_compressed(bytes: &[u8]) -> Result<Self, BackendError> {
        let bytes: [u8; 96] = bytes
            .try_into()
            .map_err(|_| BackendError::Serialization("invalid G2 length"))?;
        Option::<G2Affine>::from(G2Affine::from_compressed(&bytes))
            .map(G2Projective::from)
            .ok_or(BackendError::Serialization("invalid G2 bytes"))
    }
}

impl TargetGroup for Gt {
    type Scalar = Scalar;

    fn identity() -> Self {
        <Gt as Group>::identity()
    }

    fn mul_scalar(&self, scalar: &Self::Scalar) -> Self {
        self * scalar
    }

    fn combine(&self, other: &Self) -> Self {
        self + other
    }
}

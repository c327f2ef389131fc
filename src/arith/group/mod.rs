use std::fmt::Debug;

use crate::{BackendError, FieldElement};

mod blst_bls12_381;
pub use blst_bls12_381::{G1, G2, Gt};

/// Elliptic curve point abstraction for G1 and G2 groups.
///
/// This trait provides operations on elliptic curve points in projective coordinates,
/// with compressed encodings for transport and a hash-to-curve map for messages.
///
/// # Type Parameters
///
/// - `F`: The scalar field type used for scalar multiplication
/// - `Affine`: The affine representation of the curve point
///
/// # Example
///
/// ```rust
/// use rand::thread_rng;
/// use swarm_rts::{CurvePoint, FieldElement, PairingBackend, PairingEngine};
///
/// type G1 = <PairingEngine as PairingBackend>::G1;
/// type Scalar = <PairingEngine as PairingBackend>::Scalar;
///
/// let mut rng = thread_rng();
/// let scalar = <Scalar as FieldElement>::random(&mut rng);
///
/// let g = <G1 as CurvePoint<Scalar>>::generator();
/// let point = g.mul_scalar(&scalar);
/// let doubled = point.add(&point);
/// assert_eq!(doubled.sub(&point), point);
/// ```
pub trait CurvePoint<F: FieldElement>:
    Clone + Send + Sync + Debug + PartialEq + Eq + 'static + Copy
{
    /// Associated affine representation.
    type Affine: Clone + Debug + Send + Sync + 'static + Copy;

    /// Returns the point at infinity (identity element).
    fn identity() -> Self;

    /// Returns the standard generator for this group.
    fn generator() -> Self;

    /// Checks if this point is the identity element.
    fn is_identity(&self) -> bool;

    /// Converts from projective to affine coordinates.
    fn to_affine(&self) -> Self::Affine;

    /// Performs elliptic curve point addition.
    fn add(&self, other: &Self) -> Self;

    /// Performs elliptic curve point subtraction.
    fn sub(&self, other: &Self) -> Self;

    /// Returns the additive inverse of this point.
    fn negate(&self) -> Self;

    /// Performs scalar multiplication: returns `scalar * self`.
    fn mul_scalar(&self, scalar: &F) -> Self;

    /// Computes `∑ scalars[i] * points[i]`.
    ///
    /// Returns an error if the slices have different lengths.
    fn multi_scalar_multiplication(points: &[Self], scalars: &[F]) -> Result<Self, BackendError>;

    /// Hashes an arbitrary message onto the curve under a domain separation tag.
    fn hash_to_curve(message: &[u8], dst: &[u8]) -> Self;

    /// Serializes the point in compressed form.
    fn to_compressed(&self) -> Vec<u8>;

    /// Deserializes a compressed point, rejecting encodings off the curve or
    /// outside the prime-order subgroup.
    fn from_compressed(bytes: &[u8]) -> Result<Self, BackendError>;
}

/// Pairing target group (GT) abstraction.
///
/// This trait represents the target group of the pairing operation. Only the
/// operations needed to compare and combine pairing values are exposed.
pub trait TargetGroup: Clone + Send + Sync + Debug + PartialEq + Eq + 'static {
    /// Scalar field type for scalar multiplication.
    type Scalar: FieldElement + Copy;

    /// Returns the identity element.
    fn identity() -> Self;

    /// Performs scalar multiplication (exponentiation in multiplicative notation).
    fn mul_scalar(&self, scalar: &Self::Scalar) -> Self;

    /// Combines (multiplies) two target group elements.
    fn combine(&self, other: &Self) -> Self;
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::Fr;

    #[test]
    fn compressed_round_trip_and_rejection() {
        let mut rng = StdRng::seed_from_u64(3);
        let s = <Fr as FieldElement>::random(&mut rng);
        let p1 = <G1 as CurvePoint<Fr>>::generator().mul_scalar(&s);
        let p2 = <G2 as CurvePoint<Fr>>::generator().mul_scalar(&s);

        let b1 = p1.to_compressed();
        let b2 = p2.to_compressed();
        assert_eq!(b1.len(), 48);
        assert_eq!(b2.len(), 96);
        assert_eq!(<G1 as CurvePoint<Fr>>::from_compressed(&b1).unwrap(), p1);
        assert_eq!(<G2 as CurvePoint<Fr>>::from_compressed(&b2).unwrap(), p2);

        assert!(<G1 as CurvePoint<Fr>>::from_compressed(&b1[..47]).is_err());
        assert!(<G1 as CurvePoint<Fr>>::from_compressed(&[0xffu8; 48]).is_err());
    }

    #[test]
    fn hash_to_curve_is_deterministic_and_separated() {
        let a = <G1 as CurvePoint<Fr>>::hash_to_curve(b"123456789", b"DST-A");
        let b = <G1 as CurvePoint<Fr>>::hash_to_curve(b"123456789", b"DST-A");
        let c = <G1 as CurvePoint<Fr>>::hash_to_curve(b"123456789", b"DST-B");
        let d = <G1 as CurvePoint<Fr>>::hash_to_curve(b"123456780", b"DST-A");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, d);
        assert!(!CurvePoint::is_identity(&a));
    }

    #[test]
    fn msm_matches_naive_sum() {
        let mut rng = StdRng::seed_from_u64(5);
        let points: Vec<G1> = (0..5)
            .map(|_| {
                let s = <Fr as FieldElement>::random(&mut rng);
                <G1 as CurvePoint<Fr>>::generator().mul_scalar(&s)
            })
            .collect();
        let scalars: Vec<Fr> = (0..5).map(|_| <Fr as FieldElement>::random(&mut rng)).collect();
        let naive = points
            .iter()
            .zip(scalars.iter())
            .fold(<G1 as CurvePoint<Fr>>::identity(), |acc, (p, s)| acc.add(&p.mul_scalar(s)));
        let msm = <G1 as CurvePoint<Fr>>::multi_scalar_multiplication(&points, &scalars).unwrap();
        assert_eq!(naive, msm);
        let short = <G1 as CurvePoint<Fr>>::multi_scalar_multiplication(&points, &scalars[..4]);
        assert!(short.is_err());
    }
}

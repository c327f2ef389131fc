use std::fmt::Debug;

mod blst_bls12_381;
pub use blst_bls12_381::PairingEngine;

use crate::{BackendError, CurvePoint, FieldElement, TargetGroup};

/// Main backend trait that ties together all cryptographic operations.
///
/// Every protocol type in this crate is generic over a `PairingBackend`
/// whose scalar field is [`Fr`](crate::Fr). The backend supplies the two
/// source groups, the target group and the pairing map.
///
/// # Example
///
/// ```rust
/// use swarm_rts::{CurvePoint, PairingBackend, PairingEngine};
///
/// type Scalar = <PairingEngine as PairingBackend>::Scalar;
/// type G1 = <PairingEngine as PairingBackend>::G1;
/// type G2 = <PairingEngine as PairingBackend>::G2;
///
/// let g1 = <G1 as CurvePoint<Scalar>>::generator();
/// let g2 = <G2 as CurvePoint<Scalar>>::generator();
///
/// // e(2·g1, g2) == e(g1, 2·g2)
/// let ok = PairingEngine::pairing_eq(&g1.add(&g1), &g2, &g1, &g2.add(&g2)).unwrap();
/// assert!(ok);
/// ```
pub trait PairingBackend:
    Clone + Copy + Debug + Default + PartialEq + Eq + Send + Sync + Sized + 'static
{
    /// Scalar field type (Fr).
    type Scalar: FieldElement;
    /// First curve group (G1).
    type G1: CurvePoint<Self::Scalar>;
    /// Second curve group (G2).
    type G2: CurvePoint<Self::Scalar>;
    /// Pairing target group (GT).
    type Target: TargetGroup<Scalar = Self::Scalar>;

    /// Computes the bilinear pairing: `e(g1, g2) -> GT`.
    ///
    /// The pairing satisfies bilinearity: `e(a*P, b*Q) = e(P, Q)^(ab)`.
    fn pairing(g1: &Self::G1, g2: &Self::G2) -> Self::Target;

    /// Computes a product of pairings: `∏ e(g1[i], g2[i])`.
    ///
    /// This is more efficient than computing individual pairings and multiplying.
    /// Returns an error if the input arrays have different lengths.
    fn multi_pairing(g1: &[Self::G1], g2: &[Self::G2]) -> Result<Self::Target, BackendError>;

    /// Checks `e(a1, b1) == e(a2, b2)` with a single final exponentiation,
    /// evaluated as `e(a1, b1) · e(-a2, b2) == 1`.
    fn pairing_eq(
        a1: &Self::G1,
        b1: &Self::G2,
        a2: &Self::G1,
        b2: &Self::G2,
    ) -> Result<bool, BackendError> {
        let product = Self::multi_pairing(&[*a1, a2.negate()], &[*b1, *b2])?;
        Ok(product == <Self::Target as TargetGroup>::identity())
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::Fr;

    type G1 = <PairingEngine as PairingBackend>::G1;
    type G2 = <PairingEngine as PairingBackend>::G2;

    #[test]
    fn pairing_is_bilinear() {
        let mut rng = StdRng::seed_from_u64(9);
        let a = <Fr as FieldElement>::random(&mut rng);
        let b = <Fr as FieldElement>::random(&mut rng);
        let p = <G1 as CurvePoint<Fr>>::generator();
        let q = <G2 as CurvePoint<Fr>>::generator();

        let lhs = PairingEngine::pairing(&p.mul_scalar(&a), &q.mul_scalar(&b));
        let rhs = PairingEngine::pairing(&p, &q).mul_scalar(&(a * b));
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn pairing_eq_detects_mismatch() {
        let mut rng = StdRng::seed_from_u64(10);
        let a = <Fr as FieldElement>::random(&mut rng);
        let p = <G1 as CurvePoint<Fr>>::generator();
        let q = <G2 as CurvePoint<Fr>>::generator();

        assert!(PairingEngine::pairing_eq(&p.mul_scalar(&a), &q, &p, &q.mul_scalar(&a)).unwrap());
        assert!(!PairingEngine::pairing_eq(&p.mul_scalar(&a), &q, &p, &q).unwrap());
    }

    #[test]
    fn multi_pairing_matches_product() {
        let p = <G1 as CurvePoint<Fr>>::generator();
        let q = <G2 as CurvePoint<Fr>>::generator();
        let two = <Fr as FieldElement>::from_u64(2);
        let combined = PairingEngine::multi_pairing(&[p, p.mul_scalar(&two)], &[q, q]).unwrap();
        let separate = PairingEngine::pairing(&p, &q)
            .combine(&PairingEngine::pairing(&p.mul_scalar(&two), &q));
        assert_eq!(combined, separate);
        assert!(PairingEngine::multi_pairing(&[p], &[q, q]).is_err());
    }
}

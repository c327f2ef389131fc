//! Lagrange interpolation at zero over signer identifiers.
//!
//! For a coalition with identifiers `ID_1..ID_t`, the coefficient of signer
//! `i` is
//!
//! ```text
//! Π_i = ∏_{j≠i} ID_j / ∏_{j≠i} (ID_j - ID_i)
//! ```
//!
//! so that `∑ Π_i · f(ID_i) = f(0)` for every polynomial `f` of degree below
//! `t`. Identifiers must be pairwise distinct.

use rayon::iter::{IntoParallelIterator, ParallelIterator};
use tracing::instrument;

use crate::{BackendError, FieldElement, Fr};

/// Computes a single coefficient `Π_i` for `ids[index]`.
pub fn lagrange_at_zero(ids: &[Fr], index: usize) -> Result<Fr, BackendError> {
    let xi = ids
        .get(index)
        .ok_or(BackendError::Math("lagrange index out of range"))?;
    let mut num = <Fr as FieldElement>::one();
    let mut den = <Fr as FieldElement>::one();
    for (j, xj) in ids.iter().enumerate() {
        if j == index {
            continue;
        }
        num *= xj;
        den *= *xj - xi;
    }
    let den_inv = FieldElement::invert(&den)
        .ok_or(BackendError::Math("duplicate identifier in lagrange set"))?;
    Ok(num * den_inv)
}

/// Computes `Π_i` for every identifier at once.
///
/// Numerators come from prefix and suffix products, denominators are built in
/// parallel and inverted with a single batch inversion.
#[instrument(level = "trace", skip_all, fields(points = ids.len()))]
pub fn lagrange_coefficients_at_zero(ids: &[Fr]) -> Result<Vec<Fr>, BackendError> {
    let n = ids.len();
    if n == 0 {
        return Ok(Vec::new());
    }

    let mut prefix = vec![<Fr as FieldElement>::one(); n + 1];
    for (i, x) in ids.iter().enumerate() {
        prefix[i + 1] = prefix[i] * x;
    }
    let mut suffix = vec![<Fr as FieldElement>::one(); n + 1];
    for i in (0..n).rev() {
        suffix[i] = suffix[i + 1] * ids[i];
    }

    let mut denominators: Vec<Fr> = (0..n)
        .into_par_iter()
        .map(|i| {
            ids.iter()
                .enumerate()
                .filter(|(j, _)| *j != i)
                .fold(<Fr as FieldElement>::one(), |acc, (_, xj)| acc * (*xj - ids[i]))
        })
        .collect();

    <Fr as FieldElement>::batch_inversion(&mut denominators)
        .map_err(|_| BackendError::Math("duplicate identifier in lagrange set"))?;

    Ok((0..n)
        .map(|i| prefix[i] * suffix[i + 1] * denominators[i])
        .collect())
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    fn eval(coeffs: &[Fr], x: &Fr) -> Fr {
        coeffs
            .iter()
            .rev()
            .fold(<Fr as FieldElement>::zero(), |acc, c| acc * x + c)
    }

    #[test]
    fn coefficients_interpolate_constant_term() {
        let mut rng = StdRng::seed_from_u64(21);
        let t = 5;
        let coeffs: Vec<Fr> = (0..t).map(|_| <Fr as FieldElement>::random(&mut rng)).collect();
        let ids: Vec<Fr> = (0..t).map(|_| <Fr as FieldElement>::random(&mut rng)).collect();

        let lambdas = lagrange_coefficients_at_zero(&ids).unwrap();
        let recovered = ids
            .iter()
            .zip(lambdas.iter())
            .fold(<Fr as FieldElement>::zero(), |acc, (x, l)| acc + eval(&coeffs, x) * l);
        assert_eq!(recovered, coeffs[0]);
    }

    #[test]
    fn batch_and_single_forms_agree() {
        let ids: Vec<Fr> = [3u64, 17, 42, 1001]
            .iter()
            .map(|&v| <Fr as FieldElement>::from_u64(v))
            .collect();
        let all = lagrange_coefficients_at_zero(&ids).unwrap();
        for (i, lambda) in all.iter().enumerate() {
            assert_eq!(lagrange_at_zero(&ids, i).unwrap(), *lambda);
        }
        // weights of a partition of unity at zero
        let sum = all.iter().fold(<Fr as FieldElement>::zero(), |acc, l| acc + l);
        assert_eq!(sum, <Fr as FieldElement>::one());
    }

    #[test]
    fn duplicate_identifiers_are_rejected() {
        let ids = vec![
            <Fr as FieldElement>::from_u64(5),
            <Fr as FieldElement>::from_u64(9),
            <Fr as FieldElement>::from_u64(5),
        ];
        assert!(lagrange_coefficients_at_zero(&ids).is_err());
        assert!(lagrange_at_zero(&ids, 0).is_err());
        assert!(lagrange_at_zero(&ids, 3).is_err());
    }
}

//! Public parameters published at setup and the aggregator's secret.
//!
//! Group keys are indexed by threshold: the key for threshold `t` sits at
//! ladder position `t - 2`, see [`threshold_ladder_index`].

use core::fmt;

use crate::{Exponent, Fr, PairingBackend, errors::Error};

/// Maps a threshold `t` to its position in a threshold ladder.
///
/// Ladders start at `t = 2`, so the index is `t - 2`. Returns `None` for
/// `t < 2`.
pub fn threshold_ladder_index(threshold: usize) -> Option<usize> {
    threshold.checked_sub(2)
}

/// Public parameters shared read-only by every role.
///
/// Produced by setup with an empty group-key ladder; key generation returns a
/// copy with the ladder filled in. A swarm split returns a copy carrying the
/// rotated transformation key.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicParameters<B: PairingBackend<Scalar = Fr>> {
    p2: B::G2,
    g: Fr,
    beta: Fr,
    swarm_size: usize,
    max_threshold: usize,
    group_keys: Vec<B::G2>,
}

impl<B: PairingBackend<Scalar = Fr>> PublicParameters<B> {
    pub(crate) fn new(p2: B::G2, g: Fr, beta: Fr, swarm_size: usize, max_threshold: usize) -> Self {
        Self {
            p2,
            g,
            beta,
            swarm_size,
            max_threshold,
            group_keys: Vec::new(),
        }
    }

    /// The G2 generator against which signatures are paired.
    pub fn p2(&self) -> &B::G2 {
        &self.p2
    }

    /// ElGamal base of `Z_q^*`.
    pub fn g(&self) -> &Fr {
        &self.g
    }

    /// Aggregator transformation key `beta = g^alpha`.
    pub fn beta(&self) -> &Fr {
        &self.beta
    }

    pub fn swarm_size(&self) -> usize {
        self.swarm_size
    }

    pub fn max_threshold(&self) -> usize {
        self.max_threshold
    }

    /// Global threshold ladder; entry `k` is the threshold-`k + 2` group key.
    pub fn group_keys(&self) -> &[B::G2] {
        &self.group_keys
    }

    /// Rejects thresholds outside `[2, tm]`.
    pub fn check_threshold(&self, threshold: usize) -> Result<(), Error> {
        if threshold < 2 || threshold > self.max_threshold {
            return Err(Error::ThresholdOutOfRange {
                threshold,
                max: self.max_threshold,
            });
        }
        Ok(())
    }

    /// Ladder index for `threshold` after bounds checking.
    pub fn ladder_index(&self, threshold: usize) -> Result<usize, Error> {
        self.check_threshold(threshold)?;
        threshold_ladder_index(threshold).ok_or(Error::ThresholdOutOfRange {
            threshold,
            max: self.max_threshold,
        })
    }

    /// Group public key for `threshold`.
    pub fn group_key(&self, threshold: usize) -> Result<&B::G2, Error> {
        let index = self.ladder_index(threshold)?;
        self.group_keys
            .get(index)
            .ok_or_else(|| Error::InvalidParameter("group key ladder not generated".into()))
    }

    pub(crate) fn with_group_keys(&self, group_keys: Vec<B::G2>) -> Self {
        Self {
            group_keys,
            ..self.clone()
        }
    }

    pub(crate) fn with_transformation_key(&self, beta: Fr) -> Self {
        Self {
            beta,
            ..self.clone()
        }
    }
}

/// The aggregator's transformation secret `alpha`.
#[derive(Clone, PartialEq, Eq)]
pub struct AggregatorSecret {
    alpha: Exponent,
}

impl AggregatorSecret {
    pub(crate) fn new(alpha: Exponent) -> Self {
        Self { alpha }
    }

    pub(crate) fn alpha(&self) -> &Exponent {
        &self.alpha
    }
}

impl fmt::Debug for AggregatorSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AggregatorSecret")
            .field("alpha", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CurvePoint, FieldElement, G2, PairingEngine};

    fn params(tm: usize) -> PublicParameters<PairingEngine> {
        let one = <Fr as FieldElement>::one();
        let p2 = <G2 as CurvePoint<Fr>>::generator();
        PublicParameters::new(p2, one, one, 6, tm).with_group_keys(vec![p2; tm - 1])
    }

    #[test]
    fn ladder_index_is_offset_by_two() {
        assert_eq!(threshold_ladder_index(2), Some(0));
        assert_eq!(threshold_ladder_index(6), Some(4));
        assert_eq!(threshold_ladder_index(1), None);
    }

    #[test]
    fn thresholds_outside_range_are_rejected() {
        let params = params(4);
        assert!(params.group_key(2).is_ok());
        assert!(params.group_key(4).is_ok());
        for t in [0, 1, 5] {
            let err = params.group_key(t).unwrap_err();
            assert!(matches!(
                err,
                Error::ThresholdOutOfRange { threshold, max: 4 } if threshold == t
            ));
        }
    }

    #[test]
    fn secret_debug_is_redacted() {
        let secret = AggregatorSecret::new(Exponent::from_u64(1234));
        let rendered = format!("{secret:?}");
        assert!(rendered.contains("redacted"));
        assert!(!rendered.contains("1234"));
    }
}

//! Configuration types for the swarm threshold signature scheme.
//!
//! [`SchemeConfig`] fixes the swarm size, the largest supported threshold and
//! the tunables of verification and hashing. It is serde-serializable so a
//! deployment can load it from any format the caller prefers.
//!
//! # Example
//!
//! ```rust
//! use swarm_rts::config::SchemeConfig;
//!
//! // six signers, thresholds 2..=6 supported
//! let config = SchemeConfig::new(6, 6).expect("valid config");
//! assert_eq!(config.batch_weight_bits, 64);
//! ```

use libpaillier::unknown_order::BigNumber;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::{arith::unit_group_order, errors::Error};

/// Small prime factors of the BLS12-381 `q - 1`.
pub const BLS12_381_ORDER_FACTORS: [u64; 12] = [
    2, 3, 11, 19, 10177, 125527, 859267, 906349, 2508409, 2529403, 52437899, 254760293,
];

/// Parameters of the hash-to-coprime map.
///
/// `factors` must list primes dividing `q - 1`; a candidate is accepted once
/// none of them divides it. Rejected candidates are advanced by `step`, and
/// at most `retry_limit` candidates are tried.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoprimeHashConfig {
    pub factors: Vec<u64>,
    pub step: u64,
    pub retry_limit: usize,
}

impl Default for CoprimeHashConfig {
    fn default() -> Self {
        Self {
            factors: BLS12_381_ORDER_FACTORS.to_vec(),
            step: 254_760_293,
            retry_limit: 256,
        }
    }
}

impl CoprimeHashConfig {
    /// Checks that every configured factor divides `q - 1`.
    pub fn validate(&self) -> Result<(), Error> {
        if self.factors.is_empty() {
            return Err(Error::InvalidConfig(
                "hash-to-coprime needs at least one factor".into(),
            ));
        }
        if self.retry_limit == 0 {
            return Err(Error::InvalidConfig(
                "hash-to-coprime retry limit must be positive".into(),
            ));
        }
        if self.step == 0 {
            return Err(Error::InvalidConfig("hash-to-coprime step must be positive".into()));
        }
        let order = unit_group_order();
        let zero = BigNumber::zero();
        if let Some(bad) = self
            .factors
            .iter()
            .find(|&&p| p < 2 || order.nmod(&BigNumber::from(p)) != zero)
        {
            return Err(Error::InvalidConfig(format!(
                "{bad} is not a factor of the unit group order"
            )));
        }
        Ok(())
    }
}

/// Scheme-wide configuration.
///
/// # Constraints
///
/// - `max_threshold >= 2`, since threshold ladders start at `t = 2`
/// - `swarm_size >= max_threshold`
/// - `batch_weight_bits` within `32..=128`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemeConfig {
    /// Number of signers `n`.
    pub swarm_size: usize,
    /// Largest usable threshold `tm`.
    pub max_threshold: usize,
    /// Bit length of the random weights used by batch verification.
    pub batch_weight_bits: u32,
    pub coprime_hash: CoprimeHashConfig,
    /// Opt-in for the partial-slot split variant.
    pub allow_logarithmic_split: bool,
    /// Fixed seed for reproducible runs; `None` draws from OS entropy.
    pub rng_seed: Option<u64>,
}

impl SchemeConfig {
    /// Creates and validates a configuration with default tunables.
    pub fn new(swarm_size: usize, max_threshold: usize) -> Result<Self, Error> {
        let config = Self {
            swarm_size,
            max_threshold,
            batch_weight_bits: 64,
            coprime_hash: CoprimeHashConfig::default(),
            allow_logarithmic_split: false,
            rng_seed: None,
        };
        config.validate()?;
        Ok(config)
    }

    /// Pins the RNG seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    pub fn with_logarithmic_split(mut self, allow: bool) -> Self {
        self.allow_logarithmic_split = allow;
        self
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.max_threshold < 2 {
            return Err(Error::InvalidConfig(
                "maximum threshold must be at least 2".into(),
            ));
        }
        if self.swarm_size < self.max_threshold {
            return Err(Error::InvalidConfig(
                "swarm size must be at least the maximum threshold".into(),
            ));
        }
        if !(32..=128).contains(&self.batch_weight_bits) {
            return Err(Error::InvalidConfig(
                "batch weight bits must be within [32, 128]".into(),
            ));
        }
        self.coprime_hash.validate()
    }

    /// Returns a ChaCha20 generator seeded from `rng_seed` or from entropy.
    pub fn rng(&self) -> ChaCha20Rng {
        match self.rng_seed {
            Some(seed) => ChaCha20Rng::seed_from_u64(seed),
            None => ChaCha20Rng::from_entropy(),
        }
    }
}

//! # swarm-rts: Threshold BLS Signatures for Swarms
//!
//! `swarm-rts` implements a `(t, n)` threshold signature scheme on BLS12-381
//! in which an aggregator transforms the combined signature for one
//! designated verifier, and a swarm of signers can be split into
//! independently keyed sub-swarms without a new key generation.
//!
//! ## Overview
//!
//! Signer shares are ElGamal ciphertexts over `Z_q^*`. Signing multiplies
//! ciphertexts homomorphically, so no signer ever decrypts its own share. The
//! aggregator re-encrypts every contribution towards the verifier's ephemeral
//! key; only that verifier can strip the blinding and check the pairing
//! equations.
//!
//! ## Architecture
//!
//! - **arith**: field, curve and pairing traits ([`FieldElement`],
//!   [`CurvePoint`], [`PairingBackend`]) with
//!   the blstrs backend, the exponent ring modulo `q - 1`, hash-to-coprime
//!   and Lagrange coefficients.
//!
//! - **[`config`]**: [`SchemeConfig`](config::SchemeConfig) and
//!   [`CoprimeHashConfig`](config::CoprimeHashConfig).
//!
//! - **rts**: the [`TransformableThreshold`] trait and its
//!   [`SwarmThresholdScheme`] implementation, plus the key, coalition,
//!   signature and split types.
//!
//! - **[`errors`]**: backend and protocol error types.
//!
//! ## Quick Example
//!
//! ```rust
//! use swarm_rts::config::SchemeConfig;
//! use swarm_rts::{
//!     ElGamalKeyPair, PairingEngine, SignerSet, SwarmThresholdScheme, TransformableThreshold,
//! };
//!
//! # fn main() -> Result<(), swarm_rts::errors::Error> {
//! // six signers, thresholds up to six
//! let config = SchemeConfig::new(6, 6)?.with_seed(7);
//! let mut rng = config.rng();
//! let scheme = SwarmThresholdScheme::<PairingEngine>::new(config)?;
//!
//! let (params, secret) = scheme.setup(&mut rng)?;
//! let keys = scheme.keygen(&mut rng, &params)?;
//!
//! // the first four signers sign
//! let message = 123_456_789u64.to_be_bytes();
//! let coalition = keys.registry.resolve(&SignerSet::first(4))?;
//! let partials =
//!     scheme.collect_partial_signatures(&keys.params, &keys.shares, &coalition, 4, &message)?;
//!
//! // the aggregator transforms the result for one verifier
//! let verifier = ElGamalKeyPair::generate(&mut rng, keys.params.g());
//! let sigma = scheme.aggregate(&mut rng, &keys.params, &secret, &partials, verifier.public())?;
//!
//! assert!(scheme.verify(&keys.params, &keys.registry, &sigma, &verifier, &message)?);
//! let registry = &keys.registry;
//! assert!(scheme.batch_verify(&mut rng, &keys.params, registry, &sigma, &verifier, &message)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Protocol Workflow
//!
//! 1. **Setup**: [`TransformableThreshold::setup`] draws `g`, `alpha` and
//!    `beta = g^alpha`.
//! 2. **Key Generation**: [`TransformableThreshold::keygen`] hands each
//!    signer its encrypted evaluations and publishes the threshold ladders.
//! 3. **Signing**: [`TransformableThreshold::sign`], or
//!    [`SwarmThresholdScheme::collect_partial_signatures`] to fan out over a
//!    whole coalition.
//! 4. **Aggregation**: [`TransformableThreshold::aggregate`].
//! 5. **Verification**: [`TransformableThreshold::verify`] (exact, with
//!    diagnostics via [`SwarmThresholdScheme::verify_detailed`]) or
//!    [`TransformableThreshold::batch_verify`].
//! 6. **Splitting**: [`SwarmThresholdScheme::split_swarm`].
//!
//! ## Security Considerations
//!
//! - Randomness is always passed in explicitly. Use a CSPRNG; fixed seeds are
//!   for tests only.
//! - Batch verification accepts an invalid contribution set with probability
//!   about `2^-batch_weight_bits`.
//! - [`SplitStrategy::Logarithmic`] leaves high slots on the old key and is
//!   disabled unless explicitly allowed.

mod arith;
pub mod config;
pub mod errors;
mod rts;

pub use arith::*;
pub use errors::{BackendError, Error};
pub use rts::*;

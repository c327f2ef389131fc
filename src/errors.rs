//! Error types for the crate.
//!
//! This module defines low-level backend errors returned by the arithmetic
//! layer (field, exponent ring, curve encodings) as well as the high-level
//! protocol-facing `Error` type used across the crate.
//!
//! A rejected signature is not an error: verification returns `Ok(false)`.
//! Errors are reserved for malformed parameters, non-invertible values and
//! failed integrity checks.
//!
//! # Examples
//!
//! ```rust
//! use swarm_rts::errors::Error;
//!
//! let err = Error::ThresholdOutOfRange { threshold: 1, max: 6 };
//! assert!(err.is_parameter_error());
//! ```

use thiserror::Error;

/// Errors bubbled up from the arithmetic backend.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("serialization failure: {0}")]
    Serialization(&'static str),
    #[error("math error: {0}")]
    Math(&'static str),
}

/// High-level errors returned by the threshold signature API.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("backend error: {0}")]
    Backend(#[from] BackendError),
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    #[error("threshold {threshold} outside supported range [2, {max}]")]
    ThresholdOutOfRange { threshold: usize, max: usize },
    #[error("coalition size mismatch: expected {expected}, got {actual}")]
    CoalitionMismatch { expected: usize, actual: usize },
    #[error("duplicate signer in coalition")]
    DuplicateSigner,
    #[error("unknown signer index {0}")]
    UnknownSigner(usize),
    #[error("insufficient shares: required {required}, provided {provided}")]
    NotEnoughShares { required: usize, provided: usize },
    #[error("integrity check failed: {0}")]
    Integrity(&'static str),
}

impl Error {
    /// Returns `true` for malformed or inconsistent inputs that are rejected
    /// before any pairing is evaluated.
    pub fn is_parameter_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidParameter(_)
                | Error::ThresholdOutOfRange { .. }
                | Error::CoalitionMismatch { .. }
                | Error::DuplicateSigner
                | Error::UnknownSigner(_)
                | Error::NotEnoughShares { .. }
        )
    }

    /// Returns `true` when a modular inverse or a bounded retry loop failed.
    pub fn is_arithmetic_error(&self) -> bool {
        matches!(self, Error::Backend(BackendError::Math(_)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_families_are_disjoint() {
        let math: Error = BackendError::Math("not invertible").into();
        assert!(math.is_arithmetic_error());
        assert!(!math.is_parameter_error());

        let dup = Error::DuplicateSigner;
        assert!(dup.is_parameter_error());
        assert!(!dup.is_arithmetic_error());

        let integrity = Error::Integrity("stk mismatch");
        assert!(!integrity.is_parameter_error());
        assert!(!integrity.is_arithmetic_error());
    }

    #[test]
    fn messages_name_the_bounds() {
        let err = Error::CoalitionMismatch {
            expected: 4,
            actual: 3,
        };
        assert_eq!(
            err.to_string(),
            "coalition size mismatch: expected 4, got 3"
        );
    }
}

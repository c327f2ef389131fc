//! Arithmetic layer shared by every protocol role.
//!
//! The module wraps the BLS12-381 pairing groups and the two integer rings the
//! protocol needs:
//!
//! - **[`field`]**: the scalar field `Fr`, which doubles as `Z_q` for the
//!   multiplicative ElGamal group used in share transport
//! - **[`group`]**: G1/G2/GT operations, hash-to-curve and compressed encodings
//! - **[`pairing`]**: the bilinear map `e(G1, G2) -> GT` and equality checks
//! - **[`exponent`]**: integers modulo `q - 1` and the hash-to-coprime map
//! - **[`lagrange`]**: Lagrange coefficients at zero over signer identifiers
//!
//! # Example
//!
//! ```rust
//! use rand::thread_rng;
//! use swarm_rts::{CurvePoint, FieldElement, Fr, G1};
//!
//! let mut rng = thread_rng();
//! let scalar = <Fr as FieldElement>::random(&mut rng);
//! let inv = FieldElement::invert(&scalar).expect("non-zero scalar");
//!
//! let g1 = <G1 as CurvePoint<Fr>>::generator();
//! let point = g1.mul_scalar(&scalar).mul_scalar(&inv);
//! assert_eq!(point, g1);
//! ```

mod field;
pub use field::*;

mod group;
pub use group::*;

mod pairing;
pub use pairing::*;

mod exponent;
pub use exponent::*;

mod lagrange;
pub use lagrange::*;

//! Multiplicative ElGamal over `Z_q^*`.
//!
//! Used to transport key-share evaluations to signers and split grants to a
//! sub-swarm head. The scheme is homomorphic in the plaintext, which lets a
//! signer multiply ciphertext components without decrypting them.

use core::fmt;

use rand_core::RngCore;

use crate::{BackendError, Exponent, FieldElement, Fr, arith::random_unit, exp};

/// An ElGamal key pair `(sk, pk = g^sk)`.
///
/// The verifier's ephemeral key and the sub-swarm head's transport key are
/// both of this shape.
#[derive(Clone, PartialEq, Eq)]
pub struct ElGamalKeyPair {
    secret: Exponent,
    public: Fr,
}

impl ElGamalKeyPair {
    /// Generates a fresh key pair for base `g`.
    pub fn generate<R: RngCore + ?Sized>(rng: &mut R, g: &Fr) -> Self {
        Self::from_secret(g, Exponent::random(rng))
    }

    pub fn from_secret(g: &Fr, secret: Exponent) -> Self {
        let public = exp(g, &secret);
        Self { secret, public }
    }

    pub fn public(&self) -> &Fr {
        &self.public
    }

    pub(crate) fn secret(&self) -> &Exponent {
        &self.secret
    }
}

impl fmt::Debug for ElGamalKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElGamalKeyPair")
            .field("secret", &"<redacted>")
            .field("public", &self.public)
            .finish()
    }
}

/// A ciphertext `(c1, c2) = (g^u, pk^u · m)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElGamalCiphertext {
    c1: Fr,
    c2: Fr,
}

impl ElGamalCiphertext {
    /// Encrypts `message` under `public` with fresh randomness.
    pub fn encrypt<R: RngCore + ?Sized>(rng: &mut R, g: &Fr, public: &Fr, message: &Fr) -> Self {
        Self::encrypt_with(g, public, message, &Exponent::random(rng))
    }

    /// Encrypts with caller-supplied randomness `u`.
    pub fn encrypt_with(g: &Fr, public: &Fr, message: &Fr, u: &Exponent) -> Self {
        Self {
            c1: exp(g, u),
            c2: exp(public, u) * message,
        }
    }

    /// Recovers `m = c2 / c1^sk`.
    pub fn decrypt(&self, secret: &Exponent) -> Result<Fr, BackendError> {
        let mask = exp(&self.c1, secret);
        let mask_inv = FieldElement::invert(&mask)
            .ok_or(BackendError::Math("ciphertext mask is not invertible"))?;
        Ok(self.c2 * mask_inv)
    }

    pub fn c1(&self) -> &Fr {
        &self.c1
    }

    pub fn c2(&self) -> &Fr {
        &self.c2
    }

    /// Moves the ciphertext from key `g^a` to key `g^(a + delta)`.
    pub(crate) fn rekey(&self, delta: &Exponent) -> Self {
        Self {
            c1: self.c1,
            c2: self.c2 * exp(&self.c1, delta),
        }
    }
}

/// Samples an ElGamal base: a unit of `Z_q` other than one.
pub(crate) fn sample_base<R: RngCore + ?Sized>(rng: &mut R) -> Result<Fr, BackendError> {
    random_unit(rng, true)
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn round_trip_recovers_plaintext() {
        let mut rng = StdRng::seed_from_u64(31);
        let g = sample_base(&mut rng).unwrap();
        let keys = ElGamalKeyPair::generate(&mut rng, &g);
        for _ in 0..16 {
            let m = <Fr as FieldElement>::random(&mut rng);
            let ct = ElGamalCiphertext::encrypt(&mut rng, &g, keys.public(), &m);
            assert_eq!(ct.decrypt(keys.secret()).unwrap(), m);
        }
    }

    #[test]
    fn wrong_secret_does_not_recover_plaintext() {
        let mut rng = StdRng::seed_from_u64(32);
        let g = sample_base(&mut rng).unwrap();
        let keys = ElGamalKeyPair::generate(&mut rng, &g);
        let other = ElGamalKeyPair::generate(&mut rng, &g);
        let m = <Fr as FieldElement>::random(&mut rng);
        let ct = ElGamalCiphertext::encrypt(&mut rng, &g, keys.public(), &m);
        assert_ne!(ct.decrypt(other.secret()).unwrap(), m);
    }

    #[test]
    fn rekey_tracks_the_shifted_secret() {
        let mut rng = StdRng::seed_from_u64(33);
        let g = sample_base(&mut rng).unwrap();
        let keys = ElGamalKeyPair::generate(&mut rng, &g);
        let delta = Exponent::random(&mut rng);
        let m = <Fr as FieldElement>::random(&mut rng);

        let ct = ElGamalCiphertext::encrypt(&mut rng, &g, keys.public(), &m).rekey(&delta);
        let shifted = keys.secret().add(&delta);
        assert_eq!(ct.decrypt(&shifted).unwrap(), m);
        assert_ne!(ct.decrypt(keys.secret()).unwrap(), m);
    }

    #[test]
    fn products_of_ciphertexts_encrypt_products() {
        let mut rng = StdRng::seed_from_u64(34);
        let g = sample_base(&mut rng).unwrap();
        let keys = ElGamalKeyPair::generate(&mut rng, &g);
        let a = <Fr as FieldElement>::random(&mut rng);
        let b = <Fr as FieldElement>::random(&mut rng);
        let ca = ElGamalCiphertext::encrypt(&mut rng, &g, keys.public(), &a);
        let cb = ElGamalCiphertext::encrypt(&mut rng, &g, keys.public(), &b);
        let product = ElGamalCiphertext {
            c1: ca.c1 * cb.c1,
            c2: ca.c2 * cb.c2,
        };
        assert_eq!(product.decrypt(keys.secret()).unwrap(), a * b);
    }

    #[test]
    fn debug_hides_secret() {
        let mut rng = StdRng::seed_from_u64(35);
        let g = sample_base(&mut rng).unwrap();
        let keys = ElGamalKeyPair::generate(&mut rng, &g);
        assert!(format!("{keys:?}").contains("<redacted>"));
    }
}

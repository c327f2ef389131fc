//! Signer key material: encrypted shares, the public registry and the
//! bundle returned by key generation.

use std::collections::HashSet;

use crate::{
    ElGamalCiphertext, FieldElement, Fr, PairingBackend, PublicParameters, SignerSet,
    errors::Error,
    rts::coalition::Coalition,
};

/// Checks that signer identifiers are non-zero and pairwise distinct.
pub(crate) fn check_identifiers<'a>(ids: impl IntoIterator<Item = &'a Fr>) -> Result<(), Error> {
    let mut seen = HashSet::new();
    for id in ids {
        if FieldElement::is_zero(id) {
            return Err(Error::InvalidParameter("signer identifier must be non-zero".into()));
        }
        if !seen.insert(FieldElement::to_repr(id)) {
            return Err(Error::DuplicateSigner);
        }
    }
    Ok(())
}

/// Key share held by a single signer.
///
/// The share carries one ElGamal ciphertext per ladder slot, each encrypting
/// an evaluation `f_k = d_k · ID + b_k` under the aggregator key `beta`, and
/// the signer's own threshold ladder `PK_i[k] = P2^(f_0 · ... · f_k)`.
///
/// The ciphertexts are only ever rewritten by a swarm split.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignerShare<B: PairingBackend<Scalar = Fr>> {
    index: usize,
    id: Fr,
    ciphertexts: Vec<ElGamalCiphertext>,
    ladder: Vec<B::G2>,
}

impl<B: PairingBackend<Scalar = Fr>> SignerShare<B> {
    pub(crate) fn new(
        index: usize,
        id: Fr,
        ciphertexts: Vec<ElGamalCiphertext>,
        ladder: Vec<B::G2>,
    ) -> Self {
        Self {
            index,
            id,
            ciphertexts,
            ladder,
        }
    }

    /// Registry position, also used for bitmap membership.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn id(&self) -> &Fr {
        &self.id
    }

    pub fn ciphertexts(&self) -> &[ElGamalCiphertext] {
        &self.ciphertexts
    }

    pub fn ladder(&self) -> &[B::G2] {
        &self.ladder
    }

    /// The public part of this share as it appears in a [`SignerRegistry`].
    pub fn record(&self) -> SignerRecord<B> {
        SignerRecord {
            index: self.index,
            id: self.id,
            ladder: self.ladder.clone(),
        }
    }

    pub(crate) fn replace_ciphertexts(&mut self, ciphertexts: Vec<ElGamalCiphertext>) {
        self.ciphertexts = ciphertexts;
    }
}

/// Public registry entry of one signer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignerRecord<B: PairingBackend<Scalar = Fr>> {
    pub index: usize,
    pub id: Fr,
    pub ladder: Vec<B::G2>,
}

/// Ordered registry of every signer's identifier and threshold ladder.
///
/// Entry `i` belongs to the signer with registry index `i`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SignerRegistry<B: PairingBackend<Scalar = Fr>> {
    records: Vec<SignerRecord<B>>,
}

impl<B: PairingBackend<Scalar = Fr>> SignerRegistry<B> {
    /// Builds a registry from records, which must be indexed `0..len` and
    /// carry non-zero, pairwise distinct identifiers.
    pub fn new(mut records: Vec<SignerRecord<B>>) -> Result<Self, Error> {
        records.sort_by_key(|r| r.index);
        for (position, record) in records.iter().enumerate() {
            if record.index != position {
                return Err(Error::InvalidParameter(format!(
                    "registry index {} does not match position {position}",
                    record.index
                )));
            }
        }
        check_identifiers(records.iter().map(|r| &r.id))?;
        Ok(Self { records })
    }

    pub fn from_shares(shares: &[SignerShare<B>]) -> Result<Self, Error> {
        Self::new(shares.iter().map(SignerShare::record).collect())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&SignerRecord<B>> {
        self.records.get(index)
    }

    /// Resolves a signer set into a coalition.
    pub fn resolve(&self, set: &SignerSet) -> Result<Coalition, Error> {
        let mut ids = Vec::with_capacity(set.len());
        for &index in set.indices() {
            let record = self.get(index).ok_or(Error::UnknownSigner(index))?;
            ids.push(record.id);
        }
        Ok(Coalition::new(set.indices().to_vec(), ids))
    }

    /// Ladder entry `ladder_index` of every member of `coalition`.
    pub(crate) fn ladder_keys(
        &self,
        coalition: &Coalition,
        ladder_index: usize,
    ) -> Result<Vec<B::G2>, Error> {
        coalition
            .indices()
            .iter()
            .map(|&index| {
                self.get(index)
                    .ok_or(Error::UnknownSigner(index))?
                    .ladder
                    .get(ladder_index)
                    .copied()
                    .ok_or_else(|| {
                        Error::InvalidParameter(format!("signer {index} has a short ladder"))
                    })
            })
            .collect()
    }
}

/// Output of key generation.
///
/// In a deployment each signer receives only its own entry of `shares`;
/// `params` and `registry` are public.
#[derive(Clone, Debug)]
pub struct KeyMaterial<B: PairingBackend<Scalar = Fr>> {
    pub params: PublicParameters<B>,
    pub shares: Vec<SignerShare<B>>,
    pub registry: SignerRegistry<B>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{CurvePoint, FieldElement, G2, PairingEngine};

    fn record(index: usize, id: u64) -> SignerRecord<PairingEngine> {
        SignerRecord {
            index,
            id: <Fr as FieldElement>::from_u64(id),
            ladder: vec![<G2 as CurvePoint<Fr>>::generator(); 3],
        }
    }

    #[test]
    fn registry_requires_contiguous_indices() {
        let registry = SignerRegistry::new(vec![record(1, 20), record(0, 10)]).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(1).unwrap().id, <Fr as FieldElement>::from_u64(20));

        assert!(SignerRegistry::new(vec![record(0, 10), record(2, 30)]).is_err());
    }

    #[test]
    fn resolve_reports_unknown_members() {
        let registry =
            SignerRegistry::new(vec![record(0, 10), record(1, 20), record(2, 30)]).unwrap();
        let coalition = registry.resolve(&SignerSet::new([2, 0]).unwrap()).unwrap();
        assert_eq!(coalition.indices(), &[0, 2]);
        assert_eq!(coalition.ids()[1], <Fr as FieldElement>::from_u64(30));

        let err = registry.resolve(&SignerSet::new([1, 5]).unwrap()).unwrap_err();
        assert!(matches!(err, Error::UnknownSigner(5)));
        assert!(registry.ladder_keys(&coalition, 3).is_err());
        assert_eq!(registry.ladder_keys(&coalition, 2).unwrap().len(), 2);
    }

    #[test]
    fn registry_rejects_zero_and_repeated_identifiers() {
        let err = SignerRegistry::new(vec![record(0, 7), record(1, 7), record(2, 9)]).unwrap_err();
        assert!(matches!(err, Error::DuplicateSigner));
        assert!(err.is_parameter_error());

        let err = SignerRegistry::new(vec![record(0, 7), record(1, 0)]).unwrap_err();
        assert!(matches!(err, Error::InvalidParameter(_)));
        assert!(err.is_parameter_error());

        assert!(check_identifiers(&[<Fr as FieldElement>::from_u64(3)]).is_ok());
    }
}

//! Signer-set selection.
//!
//! A coalition is named by a [`SignerSet`]: the sorted registry indices of
//! its members. Compact bitmaps are accepted and produced only at the
//! boundary. [`SignerRegistry::resolve`](crate::SignerRegistry::resolve)
//! turns a set into a [`Coalition`] carrying the members' identifiers.

use serde::{Deserialize, Serialize};

use crate::{BackendError, Fr, errors::Error, lagrange_at_zero, lagrange_coefficients_at_zero};

/// Sorted, duplicate-free registry indices.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignerSet(Vec<usize>);

impl SignerSet {
    /// Builds a set from indices in any order.
    ///
    /// Repeated indices yield [`Error::DuplicateSigner`].
    pub fn new(indices: impl IntoIterator<Item = usize>) -> Result<Self, Error> {
        let mut indices: Vec<usize> = indices.into_iter().collect();
        indices.sort_unstable();
        if indices.windows(2).any(|w| w[0] == w[1]) {
            return Err(Error::DuplicateSigner);
        }
        Ok(Self(indices))
    }

    /// The first `count` registry entries.
    pub fn first(count: usize) -> Self {
        Self((0..count).collect())
    }

    /// Decodes a membership bitmap: bit `i % 8` of byte `i / 8`, least
    /// significant bit first.
    ///
    /// Set bits at or beyond `registry_len` are rejected.
    pub fn from_bitmap(bitmap: &[u8], registry_len: usize) -> Result<Self, Error> {
        let mut indices = Vec::new();
        for (byte_idx, byte) in bitmap.iter().enumerate() {
            for bit in 0..8 {
                if (byte >> bit) & 1 == 1 {
                    let index = byte_idx * 8 + bit;
                    if index >= registry_len {
                        return Err(Error::UnknownSigner(index));
                    }
                    indices.push(index);
                }
            }
        }
        Ok(Self(indices))
    }

    /// Encodes the set as the shortest bitmap covering its largest index.
    pub fn to_bitmap(&self) -> Vec<u8> {
        let len = self.0.last().map_or(0, |max| max / 8 + 1);
        let mut bitmap = vec![0u8; len];
        for &index in &self.0 {
            bitmap[index / 8] |= 1 << (index % 8);
        }
        bitmap
    }

    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.0.binary_search(&index).is_ok()
    }
}

/// A resolved coalition: registry indices paired with signer identifiers,
/// in registry order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coalition {
    indices: Vec<usize>,
    ids: Vec<Fr>,
}

impl Coalition {
    pub(crate) fn new(indices: Vec<usize>, ids: Vec<Fr>) -> Self {
        debug_assert_eq!(indices.len(), ids.len());
        Self { indices, ids }
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn ids(&self) -> &[Fr] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Position of a registry index inside the coalition.
    pub fn position(&self, index: usize) -> Option<usize> {
        self.indices.binary_search(&index).ok()
    }

    pub fn signer_set(&self) -> SignerSet {
        SignerSet(self.indices.clone())
    }

    /// Lagrange weight at zero of the member at `position`.
    pub fn lagrange_coefficient(&self, position: usize) -> Result<Fr, BackendError> {
        lagrange_at_zero(&self.ids, position)
    }

    /// Lagrange weights at zero for every member.
    pub fn lagrange_coefficients(&self) -> Result<Vec<Fr>, BackendError> {
        lagrange_coefficients_at_zero(&self.ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_is_sorted_and_rejects_duplicates() {
        let set = SignerSet::new([5, 1, 3]).unwrap();
        assert_eq!(set.indices(), &[1, 3, 5]);
        assert!(set.contains(3));
        assert!(!set.contains(2));
        assert!(matches!(SignerSet::new([2, 4, 2]), Err(Error::DuplicateSigner)));
    }

    #[test]
    fn bitmap_is_lsb_first() {
        let set = SignerSet::new([0, 2, 9]).unwrap();
        let bitmap = set.to_bitmap();
        assert_eq!(bitmap, vec![0b0000_0101, 0b0000_0010]);
        assert_eq!(SignerSet::from_bitmap(&bitmap, 10).unwrap(), set);
        assert!(SignerSet::first(0).to_bitmap().is_empty());
    }

    #[test]
    fn bitmap_rejects_bits_past_registry() {
        let err = SignerSet::from_bitmap(&[0b1000_0001], 6).unwrap_err();
        assert!(matches!(err, Error::UnknownSigner(7)));
        // trailing zero bytes are harmless
        assert_eq!(SignerSet::from_bitmap(&[0b11, 0, 0], 2).unwrap(), SignerSet::first(2));
    }
}

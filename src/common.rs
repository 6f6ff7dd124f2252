//! Structures common to the sequence state and the PRF instantiations
use crate::errors::Error;
use crate::traits::Prf;
use rand_core::{CryptoRng, RngCore};
use std::fmt;
use subtle::{Choice, ConstantTimeEq};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Domain separation tag passed to the PRF. Each derivation in the tree uses exactly one
/// of these labels, so outputs for the same secret under distinct labels are independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Label {
    /// Derives the root secret from the caller's seed.
    Seed,
    /// Derives the output key from a node secret.
    Key,
    /// Derives the left child secret.
    Left,
    /// Derives the right child secret.
    Right,
}

impl Label {
    /// Byte representation of the label. No label is a prefix of another.
    pub const fn as_bytes(self) -> &'static [u8] {
        match self {
            Label::Seed => b"seed",
            Label::Key => b"key",
            Label::Left => b"left",
            Label::Right => b"right",
        }
    }
}

/// Structure that represents the height of a frontier node, i.e. the remaining depth of the
/// subtree it roots. Height 1 is a leaf.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Height(pub u32);

impl Height {
    /// Height of the tree needed to address `max_keys` keys, that is
    /// `ceil(log2(max_keys + 1))`.
    ///
    /// # Errors
    /// The function fails if `max_keys` is zero.
    pub fn from_max_keys(max_keys: u64) -> Result<Self, Error> {
        if max_keys == 0 {
            return Err(Error::InvalidMaxKeys(max_keys));
        }
        // Bit length of `max_keys`, which avoids computing `max_keys + 1`.
        Ok(Height(u64::BITS - max_keys.leading_zeros()))
    }

    /// Number of keys addressable by a subtree of this height: every node, internal or
    /// leaf, yields one key, so this is `2^h - 1`.
    pub fn capacity(self) -> u64 {
        match self.0 {
            0 => 0,
            h => u64::MAX >> (u64::BITS - h),
        }
    }

    /// `2^h`, the offset of the right sibling when `self` is the height of a left child.
    /// Only meaningful for heights below 64, which is all a child can have.
    pub(crate) fn subtree_size(self) -> u64 {
        1u64 << self.0
    }

    /// Returns the height of the children of a node of height `self`, or `None` if `self`
    /// is a leaf.
    pub fn decr(self) -> Option<Self> {
        match self.0 {
            0 | 1 => None,
            h => Some(Height(h - 1)),
        }
    }
}

/// Secret of a frontier node. Never leaves the crate; it is overwritten when dropped.
#[derive(Zeroize, ZeroizeOnDrop)]
pub(crate) struct Secret(Vec<u8>);

impl Secret {
    pub(crate) fn derive<P: Prf + ?Sized>(prf: &P, label: Label, input: &[u8]) -> Self {
        let mut out = vec![0u8; prf.output_size()];
        prf.derive(label, input, &mut out);
        Secret(out)
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(feature = "state_clone_enabled")]
impl Clone for Secret {
    fn clone(&self) -> Self {
        Secret(self.0.clone())
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(..)")
    }
}

/// Output key of a sequence at a given position. The bytes are overwritten when the value
/// is dropped, so callers should copy out only what they need. Equality runs in constant
/// time.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Key(Vec<u8>);

impl Key {
    pub(crate) fn derive<P: Prf + ?Sized>(prf: &P, secret: &Secret) -> Self {
        let mut out = vec![0u8; prf.output_size()];
        prf.derive(Label::Key, secret.as_bytes(), &mut out);
        Key(out)
    }

    /// Return the key as a byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Size of the key in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the key is empty. Never the case for keys produced by a sequence.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl ConstantTimeEq for Key {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0.as_slice().ct_eq(other.0.as_slice())
    }
}

impl PartialEq for Key {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Key {}

impl AsRef<[u8]> for Key {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Key({} bytes)", self.0.len())
    }
}

/// Seed of a sequence. Any length is accepted; it should match the security level of the
/// chosen PRF.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Seed(Vec<u8>);

impl Seed {
    /// Size of seeds drawn by `Seed::generate_default`.
    pub const DEFAULT_SIZE: usize = 32;

    /// Draw a fresh seed of `size` bytes from a cryptographically secure rng.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R, size: usize) -> Self {
        let mut out = vec![0u8; size];
        rng.fill_bytes(&mut out);
        Seed(out)
    }

    /// Draw a fresh seed of `Seed::DEFAULT_SIZE` bytes.
    pub fn generate_default<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self::generate(rng, Self::DEFAULT_SIZE)
    }

    /// Creates a `Seed` from a slice, copying it.
    pub fn from_slice(bytes: &[u8]) -> Self {
        Seed(bytes.to_vec())
    }

    /// Return the seed as a byte slice.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Seed {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(..)")
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn height_from_max_keys() {
        assert_eq!(Height::from_max_keys(0), Err(Error::InvalidMaxKeys(0)));
        assert_eq!(Height::from_max_keys(1).unwrap(), Height(1));
        assert_eq!(Height::from_max_keys(2).unwrap(), Height(2));
        assert_eq!(Height::from_max_keys(3).unwrap(), Height(2));
        assert_eq!(Height::from_max_keys(4).unwrap(), Height(3));
        assert_eq!(Height::from_max_keys(1 << 32).unwrap(), Height(33));
        assert_eq!(Height::from_max_keys(u64::MAX).unwrap(), Height(64));
    }

    #[test]
    fn capacity_covers_max_keys() {
        for max_keys in 1..=300u64 {
            let capacity = Height::from_max_keys(max_keys).unwrap().capacity();
            assert!(capacity >= max_keys);
            assert!(capacity < 2 * max_keys + 1);
        }
        assert_eq!(Height(1).capacity(), 1);
        assert_eq!(Height(33).capacity(), (1 << 33) - 1);
        assert_eq!(Height(64).capacity(), u64::MAX);
    }

    #[test]
    fn decr_stops_at_leaf() {
        assert_eq!(Height(3).decr(), Some(Height(2)));
        assert_eq!(Height(2).decr(), Some(Height(1)));
        assert_eq!(Height(1).decr(), None);
    }

    #[test]
    fn labels_are_prefix_free() {
        let labels = [Label::Seed, Label::Key, Label::Left, Label::Right];
        for a in labels.iter() {
            for b in labels.iter().filter(|b| b != &a) {
                assert!(!b.as_bytes().starts_with(a.as_bytes()));
            }
        }
    }

    #[test]
    fn debug_is_redacted() {
        let seed = Seed::from_slice(&[0xab; 32]);
        let secret = Secret(vec![0xcd; 32]);
        let key = Key(vec![0xef; 32]);

        assert_eq!(format!("{:?}", seed), "Seed(..)");
        assert_eq!(format!("{:?}", secret), "Secret(..)");
        assert_eq!(format!("{:?}", key), "Key(32 bytes)");
    }

    #[test]
    fn key_equality() {
        let a = Key(vec![1, 2, 3, 4]);
        assert_eq!(a, Key(vec![1, 2, 3, 4]));
        assert_ne!(a, Key(vec![1, 2, 3, 5]));
        assert_ne!(a, Key(vec![1, 2, 3]));
        assert!(bool::from(a.ct_eq(&a.clone())));
    }

    #[test]
    fn generated_seeds_differ() {
        let mut rng = ChaCha20Rng::from_seed([7u8; 32]);
        let a = Seed::generate_default(&mut rng);
        let b = Seed::generate_default(&mut rng);
        assert_eq!(a.as_bytes().len(), Seed::DEFAULT_SIZE);
        assert_ne!(a, b);
    }
}

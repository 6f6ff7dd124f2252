//! The sequence state: the frontier of an implicit binary tree of secrets, kept as a stack.
//!
//! Every node of the tree yields one key, in pre-order. A node of height `h > 1` has two
//! children of height `h - 1`, derived with the `left` and `right` labels. The stack holds
//! the roots of the subtrees that have not been consumed yet, the next one on top, so the
//! tree itself is never materialised and consumed secrets are gone for good.
use crate::common::{Height, Key, Label, Secret};
use crate::errors::Error;
use crate::traits::Prf;
use std::fmt;
use tracing::{debug, trace};
use zeroize::Zeroize;

/// Root of a subtree that has not been consumed yet.
#[cfg_attr(feature = "state_clone_enabled", derive(Clone))]
struct Node {
    secret: Secret,
    height: Height,
}

/// A forward-secure sequence of keys with logarithmic fast-forward.
///
/// Advancing overwrites the secrets of the keys left behind, so a compromise of the current
/// state reveals nothing about earlier keys. The state is single-owner; mutation goes
/// through `&mut self`.
///
/// # Example
/// ```
/// use sskg::prf::Blake2bPrf;
/// use sskg::{Error, SequenceState};
///
/// let mut a = SequenceState::new(&[0u8; 32], 7, Blake2bPrf::default()).unwrap();
/// let mut b = SequenceState::new(&[0u8; 32], 7, Blake2bPrf::default()).unwrap();
///
/// for _ in 0..5 {
///     a.next().unwrap();
/// }
/// b.seek(5).unwrap();
/// assert_eq!(a.key().unwrap(), b.key().unwrap());
///
/// // A sequence declared for 7 keys addresses exactly 7.
/// b.next().unwrap();
/// assert_eq!(b.next(), Err(Error::KeyspaceExhausted));
/// assert!(b.is_exhausted());
/// ```
pub struct SequenceState<P: Prf> {
    nodes: Vec<Node>,
    prf: P,
    height: Height,
    position: u64,
}

impl<P: Prf> SequenceState<P> {
    /// Create a sequence able to address at least `max_keys` keys. The root secret is
    /// `PRF("seed", seed)`; the tree height is `ceil(log2(max_keys + 1))`. The seed can be
    /// any byte container, a [`Seed`](crate::Seed) included.
    ///
    /// # Errors
    /// The function fails if `max_keys` is zero.
    pub fn new<S: AsRef<[u8]>>(seed: S, max_keys: u64, prf: P) -> Result<Self, Error> {
        let height = Height::from_max_keys(max_keys)?;

        // The stack never holds more than one entry per level.
        let mut nodes = Vec::with_capacity(height.0 as usize);
        nodes.push(Node {
            secret: Secret::derive(&prf, Label::Seed, seed.as_ref()),
            height,
        });

        debug!(
            height = height.0,
            capacity = height.capacity(),
            "key sequence created"
        );

        Ok(Self {
            nodes,
            prf,
            height,
            position: 0,
        })
    }

    /// Same as `new`, but overwrites `seed` with zeroes once the root has been derived, even
    /// when construction fails.
    pub fn new_from_mut_seed(seed: &mut [u8], max_keys: u64, prf: P) -> Result<Self, Error> {
        let seq = Self::new(&*seed, max_keys, prf);
        seed.zeroize();
        seq
    }

    /// Key at the current position, `PRF("key", top)`. Repeated calls return the same key
    /// until the sequence is advanced.
    ///
    /// # Errors
    /// Fails with `KeyspaceExhausted` once the sequence is exhausted.
    pub fn key(&self) -> Result<Key, Error> {
        let top = self.nodes.last().ok_or(Error::KeyspaceExhausted)?;
        Ok(Key::derive(&self.prf, &top.secret))
    }

    /// Advance to the next key. In the literature this operation is called `Evolve`.
    ///
    /// # Errors
    /// Fails with `KeyspaceExhausted` if the current key is the last one the tree can
    /// address, or if the sequence is already exhausted. Either way the sequence is
    /// exhausted afterwards.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<(), Error> {
        let node = self.nodes.pop().ok_or(Error::KeyspaceExhausted)?;

        match node.height.decr() {
            Some(child) => {
                let right = Secret::derive(&self.prf, Label::Right, node.secret.as_bytes());
                let left = Secret::derive(&self.prf, Label::Left, node.secret.as_bytes());
                self.nodes.push(Node {
                    secret: right,
                    height: child,
                });
                self.nodes.push(Node {
                    secret: left,
                    height: child,
                });
            }
            // A leaf with nothing pending below it was the last key.
            None if self.nodes.is_empty() => return Err(self.exhaust()),
            None => {}
        }

        self.position += 1;
        trace!(position = self.position, depth = self.nodes.len(), "next");
        Ok(())
    }

    /// Advance by `n` keys. The result is the same as `n` calls to `next`, but only
    /// `O(log max_keys)` PRF evaluations are needed: pending subtrees that lie entirely
    /// before the target are dropped, and whole left subtrees are skipped without ever
    /// deriving their secrets.
    ///
    /// # Errors
    /// Fails with `KeyspaceExhausted` if the target lies beyond the last key the tree can
    /// address, or if the sequence is already exhausted. The sequence is exhausted
    /// afterwards; it is never left partially advanced.
    pub fn seek(&mut self, n: u64) -> Result<(), Error> {
        let mut remaining = n;

        // Find the pending subtree holding the target. Each one covers `capacity` keys
        // starting at its root, and they are stacked in key order.
        let Node {
            mut secret,
            mut height,
        } = loop {
            let node = self.nodes.pop().ok_or(Error::KeyspaceExhausted)?;
            let covered = node.height.capacity();
            if remaining < covered {
                break node;
            }
            remaining -= covered;
            if self.nodes.is_empty() {
                return Err(self.exhaust());
            }
        };

        let mut evaluations = 0u32;
        while remaining > 0 {
            height = match height.decr() {
                Some(child) => child,
                None => return Err(self.exhaust()),
            };

            // Keys in the left subtree, plus the left child itself.
            let subtree_size = height.subtree_size();
            if remaining < subtree_size {
                let right = Secret::derive(&self.prf, Label::Right, secret.as_bytes());
                self.nodes.push(Node {
                    secret: right,
                    height,
                });
                secret = Secret::derive(&self.prf, Label::Left, secret.as_bytes());
                remaining -= 1;
                evaluations += 2;
            } else {
                secret = Secret::derive(&self.prf, Label::Right, secret.as_bytes());
                remaining -= subtree_size;
                evaluations += 1;
            }
        }

        self.nodes.push(Node { secret, height });
        self.position += n;

        trace!(
            n,
            evaluations,
            position = self.position,
            depth = self.nodes.len(),
            "seek"
        );
        Ok(())
    }

    /// Index of the current key; 0 right after construction.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Number of keys the sequence can address, `2^H - 1` for a tree of height `H`. Never
    /// less than the `max_keys` it was created with.
    pub fn capacity(&self) -> u64 {
        self.height.capacity()
    }

    /// Height `H` of the tree, fixed at construction.
    pub fn height(&self) -> Height {
        self.height
    }

    /// Number of pending subtrees currently held. Never exceeds `height()`.
    pub fn depth(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the sequence has run out of keys. An exhausted sequence only returns errors.
    pub fn is_exhausted(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The PRF the sequence was created with.
    pub fn prf(&self) -> &P {
        &self.prf
    }

    fn exhaust(&mut self) -> Error {
        // Dropping the nodes overwrites their secrets.
        self.nodes.clear();
        debug!(
            position = self.position,
            capacity = self.capacity(),
            "keyspace exhausted"
        );
        Error::KeyspaceExhausted
    }
}

#[cfg(feature = "state_clone_enabled")]
impl<P: Prf + Clone> Clone for SequenceState<P> {
    fn clone(&self) -> Self {
        let mut nodes = Vec::with_capacity(self.height.0 as usize);
        nodes.extend(self.nodes.iter().cloned());
        Self {
            nodes,
            prf: self.prf.clone(),
            height: self.height,
            position: self.position,
        }
    }
}

impl<P: Prf> fmt::Debug for SequenceState<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequenceState")
            .field("height", &self.height.0)
            .field("position", &self.position)
            .field("depth", &self.nodes.len())
            .finish_non_exhaustive()
    }
}

//! Trait that defines the pseudorandom function a sequence is built on
use crate::common::Label;

/// A label-keyed one-way function `(label, secret) -> bytes`.
///
/// Implementations must be deterministic, produce `output_size` bytes for every input, keep
/// outputs under distinct labels independent, and be one-way: no set of outputs may reveal
/// the secret they were derived from. Both node secrets and output keys have
/// `output_size` bytes.
///
/// # Example
/// ```
/// use sskg::prf::Blake2bPrf;
/// use sskg::SequenceState;
///
/// let mut seq = SequenceState::new(&[0u8; 32], 1 << 20, Blake2bPrf::default()).unwrap();
/// let first = seq.key().unwrap();
///
/// seq.seek(1000).unwrap();
/// assert_ne!(first, seq.key().unwrap());
/// assert_eq!(seq.position(), 1000);
/// ```
pub trait Prf {
    /// Size in bytes of every output.
    fn output_size(&self) -> usize;
    /// Derive `out.len()` bytes from `secret` under `label`. Callers always pass a buffer of
    /// exactly `output_size` bytes.
    fn derive(&self, label: Label, secret: &[u8], out: &mut [u8]);
}

impl<P: Prf + ?Sized> Prf for &P {
    fn output_size(&self) -> usize {
        (**self).output_size()
    }

    fn derive(&self, label: Label, secret: &[u8], out: &mut [u8]) {
        (**self).derive(label, secret, out)
    }
}

impl<P: Prf + ?Sized> Prf for Box<P> {
    fn output_size(&self) -> usize {
        (**self).output_size()
    }

    fn derive(&self, label: Label, secret: &[u8], out: &mut [u8]) {
        (**self).derive(label, secret, out)
    }
}

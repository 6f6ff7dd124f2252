//! Concrete instantiations of the PRF a sequence is built on. Any of them satisfies the
//! [`Prf`] contract; which one to use is the caller's choice, and the key sequences they
//! produce are unrelated to each other.
use crate::common::Label;
use crate::errors::Error;
use crate::traits::Prf;
use blake2::digest::{Update, VariableOutput};
use blake2::Blake2bVar;

#[cfg(feature = "sha256_enabled")]
use {
    hkdf::Hkdf,
    hmac::{Hmac, Mac},
    sha2::Sha256,
    std::fmt,
    zeroize::{Zeroize, ZeroizeOnDrop},
};

#[cfg(feature = "sha256_enabled")]
type HmacSha256 = Hmac<Sha256>;

#[cfg(feature = "sha256_enabled")]
const SHA256_SIZE: usize = 32;

/// BLAKE2b over `label || secret`, with a configurable digest length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blake2bPrf {
    size: usize,
}

impl Blake2bPrf {
    /// Largest digest BLAKE2b can produce.
    pub const MAX_OUTPUT_SIZE: usize = 64;
    /// Output size of `Blake2bPrf::default()`.
    pub const DEFAULT_OUTPUT_SIZE: usize = 32;

    /// # Errors
    /// The function fails if `output_size` is zero or above `Self::MAX_OUTPUT_SIZE`.
    pub fn new(output_size: usize) -> Result<Self, Error> {
        if output_size == 0 || output_size > Self::MAX_OUTPUT_SIZE {
            return Err(Error::InvalidOutputSize(output_size));
        }
        Ok(Self { size: output_size })
    }
}

impl Default for Blake2bPrf {
    fn default() -> Self {
        Self {
            size: Self::DEFAULT_OUTPUT_SIZE,
        }
    }
}

impl Prf for Blake2bPrf {
    fn output_size(&self) -> usize {
        self.size
    }

    fn derive(&self, label: Label, secret: &[u8], out: &mut [u8]) {
        let mut h = Blake2bVar::new(self.size).expect("valid size");
        h.update(label.as_bytes());
        h.update(secret);
        h.finalize_variable(out)
            .expect("Buffer is defined with output_size bytes, so it won't fail.");
    }
}

/// HMAC-SHA256 keyed by the secret, over the label. Outputs are 32 bytes.
#[cfg(feature = "sha256_enabled")]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HmacSha256Prf;

#[cfg(feature = "sha256_enabled")]
impl Prf for HmacSha256Prf {
    fn output_size(&self) -> usize {
        SHA256_SIZE
    }

    fn derive(&self, label: Label, secret: &[u8], out: &mut [u8]) {
        let mut mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
        Mac::update(&mut mac, label.as_bytes());
        out.copy_from_slice(&mac.finalize().into_bytes());
    }
}

/// HKDF-SHA256 (RFC 5869). The node secret is the salt, the label is the info, and an
/// optional application key, shared by every derivation of the instance, is the input
/// keying material.
#[cfg(feature = "sha256_enabled")]
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct HkdfSha256Prf {
    size: usize,
    key: Vec<u8>,
}

#[cfg(feature = "sha256_enabled")]
impl HkdfSha256Prf {
    /// Largest output HKDF-SHA256 can expand to.
    pub const MAX_OUTPUT_SIZE: usize = 255 * SHA256_SIZE;

    /// HKDF with an empty application key.
    ///
    /// # Errors
    /// The function fails if `output_size` is zero or above `Self::MAX_OUTPUT_SIZE`.
    pub fn new(output_size: usize) -> Result<Self, Error> {
        Self::with_key(output_size, &[])
    }

    /// HKDF bound to an application key. Sequences built with different keys are unrelated
    /// even when they share a seed.
    ///
    /// # Errors
    /// The function fails if `output_size` is zero or above `Self::MAX_OUTPUT_SIZE`.
    pub fn with_key(output_size: usize, key: &[u8]) -> Result<Self, Error> {
        if output_size == 0 || output_size > Self::MAX_OUTPUT_SIZE {
            return Err(Error::InvalidOutputSize(output_size));
        }
        Ok(Self {
            size: output_size,
            key: key.to_vec(),
        })
    }
}

#[cfg(feature = "sha256_enabled")]
impl fmt::Debug for HkdfSha256Prf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HkdfSha256Prf")
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

#[cfg(feature = "sha256_enabled")]
impl Prf for HkdfSha256Prf {
    fn output_size(&self) -> usize {
        self.size
    }

    fn derive(&self, label: Label, secret: &[u8], out: &mut [u8]) {
        let hk = Hkdf::<Sha256>::new(Some(secret), &self.key);
        hk.expand(label.as_bytes(), out)
            .expect("Output size is checked against MAX_OUTPUT_SIZE, so it won't fail.");
    }
}

/// The TLS 1.2 PRF (RFC 5246, section 5) with P_SHA256: the node secret is the PRF secret
/// and the label is the PRF label, with an empty seed.
#[cfg(feature = "sha256_enabled")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tls12Prf {
    size: usize,
}

#[cfg(feature = "sha256_enabled")]
impl Tls12Prf {
    /// # Errors
    /// The function fails if `output_size` is zero.
    pub fn new(output_size: usize) -> Result<Self, Error> {
        if output_size == 0 {
            return Err(Error::InvalidOutputSize(output_size));
        }
        Ok(Self { size: output_size })
    }
}

#[cfg(feature = "sha256_enabled")]
impl Prf for Tls12Prf {
    fn output_size(&self) -> usize {
        self.size
    }

    fn derive(&self, label: Label, secret: &[u8], out: &mut [u8]) {
        let mac = HmacSha256::new_from_slice(secret).expect("HMAC can take key of any size");
        let seed = label.as_bytes();

        // A(1) = HMAC(secret, seed)
        let mut a = [0u8; SHA256_SIZE];
        let mut h = mac.clone();
        Mac::update(&mut h, seed);
        a.copy_from_slice(&h.finalize().into_bytes());

        for chunk in out.chunks_mut(SHA256_SIZE) {
            let mut h = mac.clone();
            Mac::update(&mut h, &a);
            Mac::update(&mut h, seed);
            let block = h.finalize().into_bytes();
            chunk.copy_from_slice(&block[..chunk.len()]);

            let mut h = mac.clone();
            Mac::update(&mut h, &a);
            a.copy_from_slice(&h.finalize().into_bytes());
        }
        a.zeroize();
    }
}

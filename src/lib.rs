//! A seekable sequential key generator.
//!
//! Generates a forward-secure sequence of keys, as used to authenticate tamper-evident local
//! logs: compromising the current state does not reveal any earlier key, yet an auditor can
//! fast-forward to any position in `O(log N)` PRF evaluations instead of walking a hash chain.
//!
//! "Practical Secure Logging: Seekable Sequential Key Generators"
//! By Giorgia Azzurra Marson and Bertram Poettering
//! <https://eprint.iacr.org/2014/479>
//!
#![warn(missing_docs, rust_2018_idioms)]

mod common;
mod errors;
pub mod prf;
pub mod sequence;
pub mod traits;

pub use common::{Height, Key, Label, Seed};
pub use errors::Error;
pub use sequence::SequenceState;
pub use traits::Prf;

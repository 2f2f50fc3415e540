//! A keyed AES-128 encryption oracle, modeled as a scoped handle: `expand`
//! stores round-key state borrowed by every subsequent `encrypt` call.
//! Concurrency across handles is unsupported.
//!
//! Two concrete implementations satisfy the capability; no call site
//! branches between them at runtime — selection is a Cargo feature choice.

mod constants;
mod table;

#[cfg(feature = "openssl-oracle")]
mod openssl_oracle;

pub use table::{RoundKeys, decrypt_block, encrypt_block, expand_key};
pub use table::TableOracle;

#[cfg(feature = "openssl-oracle")]
pub use openssl_oracle::OpensslOracle;

use crate::error::Result;
use crate::key::AesKey;
use crate::types::Block;

/// A keyed black-box AES-128 encryption oracle.
///
/// Callers must `expand` a key before calling `encrypt`; `encrypt` always
/// uses the most recently expanded key.
pub trait CipherOracle {
    /// One-time setup (e.g. table construction). Safe to call more than
    /// once; implementations that need no setup may no-op.
    fn init(&mut self) {}

    /// Expand a 16-byte key into the oracle's internal state. Must complete
    /// before the timed window the caller opens around `encrypt` —
    /// key expansion itself must never be measured.
    fn expand(&mut self, key: &AesKey) -> Result<()>;

    /// Encrypt a 16-byte block under the last-expanded key.
    fn encrypt(&mut self, plaintext: &Block) -> Result<Block>;
}

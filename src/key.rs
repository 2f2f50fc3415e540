//! Defines [`AesKey`], a validated 16-byte AES-128 key.
//!
//! The first-round T-box leakage this engine measures is specific to
//! AES-128, so only the 128-bit key size is represented here.

use rand::TryRngCore;
use rand::rngs::OsRng;

use crate::error::{Error, Result};
use crate::types::Block;

/// A validated AES-128 key. Required to instantiate a [`crate::oracle::TableOracle`]
/// or to address the target/test keys a key study is run under.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct AesKey(Block);

impl AesKey {
    /// Generate a random key. Returns an error if the OS RNG fails.
    pub fn random() -> Result<Self> {
        let mut k = [0u8; 16];
        OsRng.try_fill_bytes(&mut k)?;
        Ok(Self(k))
    }

    /// Build a key from a 16-byte block.
    pub fn from_block(block: Block) -> Self {
        Self(block)
    }

    /// Attempt to build a key from a byte slice. Fails unless the slice is exactly 16 bytes.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self> {
        let arr: Block = bytes
            .try_into()
            .map_err(|_| Error::InvalidKeyLength { len: bytes.len() })?;
        Ok(Self(arr))
    }

    /// The key's bytes.
    pub fn as_bytes(&self) -> &Block {
        &self.0
    }
}

impl From<Block> for AesKey {
    fn from(block: Block) -> Self {
        Self::from_block(block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_bytes() {
        let bytes = [0xAAu8; 16];
        let key = AesKey::try_from_slice(&bytes).unwrap();
        assert_eq!(key.as_bytes(), &bytes);
    }

    #[test]
    fn rejects_wrong_length() {
        assert!(AesKey::try_from_slice(&[0u8; 15]).is_err());
        assert!(AesKey::try_from_slice(&[0u8; 17]).is_err());
    }
}

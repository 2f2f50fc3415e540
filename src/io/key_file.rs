//! Target/test-key file format: 16 raw bytes, binary.

use std::path::Path;

use crate::error::Result;
use crate::key::AesKey;

/// Read a 16-byte key from a file.
pub fn read(path: impl AsRef<Path>) -> Result<AesKey> {
    let bytes = std::fs::read(path)?;
    Ok(AesKey::try_from_slice(&bytes)?)
}

/// Write a key's raw bytes to a file.
pub fn write(path: impl AsRef<Path>, key: &AesKey) -> Result<()> {
    std::fs::write(path, key.as_bytes())?;
    Ok(())
}

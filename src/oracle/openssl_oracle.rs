//! Alternate [`CipherOracle`] backed by OpenSSL's AES-128-ECB single-block
//! path, gated behind the `openssl-oracle` feature. Lets an operator compare
//! the channel against a production, possibly AES-NI-accelerated, cipher,
//! which is expected to look immune to this attack.

use openssl::symm::{Cipher, Crypter, Mode};

use super::CipherOracle;
use crate::error::Result;
use crate::key::AesKey;
use crate::types::Block;

pub struct OpensslOracle {
    key: Option<[u8; 16]>,
}

impl OpensslOracle {
    pub fn new() -> Self {
        Self { key: None }
    }
}

impl Default for OpensslOracle {
    fn default() -> Self {
        Self::new()
    }
}

impl CipherOracle for OpensslOracle {
    fn expand(&mut self, key: &AesKey) -> Result<()> {
        self.key = Some(*key.as_bytes());
        Ok(())
    }

    fn encrypt(&mut self, plaintext: &Block) -> Result<Block> {
        let key = self.key.expect("OpensslOracle::encrypt called before expand");

        // ECB, single 16-byte block, no padding: a raw keyed permutation.
        let mut crypter = Crypter::new(Cipher::aes_128_ecb(), Mode::Encrypt, &key, None)?;
        crypter.pad(false);

        let mut out = vec![0u8; 16 + Cipher::aes_128_ecb().block_size()];
        let mut written = crypter.update(plaintext, &mut out)?;
        written += crypter.finalize(&mut out[written..])?;

        let mut block = [0u8; 16];
        block.copy_from_slice(&out[..16]);
        debug_assert_eq!(written, 16);
        Ok(block)
    }
}

//! Produces the uniformly random plaintexts the measurement loop feeds the
//! oracle, and the random keys threshold calibration and test-key
//! generation use.

use rand::rngs::SmallRng;
use rand::{RngCore, SeedableRng, TryRngCore};
use rand::rngs::OsRng;

use crate::error::Result;
use crate::key::AesKey;
use crate::types::Block;

/// A source of random 16-byte blocks and keys.
pub trait EntropySource {
    /// Draw a fresh uniformly random 16-byte plaintext.
    fn next_block(&mut self) -> Block;

    /// Draw a fresh uniformly random AES-128 key.
    fn next_key(&mut self) -> AesKey {
        AesKey::from_block(self.next_block())
    }
}

/// Default entropy source. Seeds a non-cryptographic PRNG once from the OS
/// CSPRNG, then draws from it for every subsequent block.
///
/// A measurement loop draws one plaintext per accepted sample, commonly
/// millions per key study. Routing every draw through the OS RNG risks a
/// syscall per sample on some platforms, which is unrelated jitter this
/// engine otherwise works hard to avoid. The plaintext distribution only
/// needs to be uniform, not unpredictable to an adversary, so a PRNG
/// seeded once from the OS is sufficient.
pub struct FastEntropy {
    rng: SmallRng,
}

impl FastEntropy {
    /// Seed a new generator from the OS CSPRNG.
    pub fn new() -> Result<Self> {
        let mut seed = [0u8; 32];
        OsRng.try_fill_bytes(&mut seed)?;
        Ok(Self {
            rng: SmallRng::from_seed(seed),
        })
    }
}

impl EntropySource for FastEntropy {
    fn next_block(&mut self) -> Block {
        let mut block = [0u8; 16];
        self.rng.fill_bytes(&mut block);
        block
    }
}

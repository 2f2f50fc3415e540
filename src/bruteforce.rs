//! Exhaustively enumerates the product of 16 per-position candidate pools,
//! re-encrypting a fixed probe plaintext under each candidate key and
//! checking against a reference ciphertext produced under the true target
//! key.

use crate::error::{Error, Result};
use crate::key::AesKey;
use crate::oracle::CipherOracle;
use crate::types::Block;

/// The fixed probe plaintext (all zeros) used both to produce the reference
/// ciphertext and to test every candidate key.
pub const PROBE_PLAINTEXT: Block = [0u8; 16];

use crate::pool::Pool;

/// Encrypt [`PROBE_PLAINTEXT`] under the true target key to obtain the
/// reference ciphertext the engine checks candidates against.
pub fn reference_ciphertext<O: CipherOracle>(oracle: &mut O, target_key: &AesKey) -> Result<Block> {
    oracle.expand(target_key)?;
    oracle.encrypt(&PROBE_PLAINTEXT)
}

/// Enumerates the product space of 16 per-position [`Pool`]s.
pub struct BruteForceEngine {
    pools: [Pool; 16],
    /// Position indices reordered so the smallest pools are iterated most
    /// frequently, stable on ties.
    order: [usize; 16],
}

impl BruteForceEngine {
    /// Build an engine over 16 per-position candidate pools.
    pub fn new(pools: [Pool; 16]) -> Self {
        let mut order: [usize; 16] = std::array::from_fn(|i| i);
        order.sort_by_key(|&i| pools[i].len());
        Self { pools, order }
    }

    /// Total size of the product space this engine will enumerate (at most)
    /// before reporting exhaustion.
    pub fn space_size(&self) -> u128 {
        self.pools.iter().map(|p| p.len() as u128).product()
    }

    /// Enumerate candidate keys, re-encrypting `PROBE_PLAINTEXT` under each
    /// and checking against `reference_ciphertext`. Returns the recovered
    /// key on the first match, or [`Error::BruteForceExhausted`] once the
    /// whole product space has been tried.
    pub fn search<O: CipherOracle>(
        &self,
        oracle: &mut O,
        reference_ciphertext: &Block,
    ) -> Result<AesKey> {
        let mut idx = [0usize; 16];
        let mut enumerated: u64 = 0;

        loop {
            let mut candidate: Block = [0u8; 16];
            for position in 0..16 {
                candidate[position] = self.pools[position].get(idx[position]);
            }

            let key = AesKey::from_block(candidate);
            oracle.expand(&key)?;
            let ciphertext = oracle.encrypt(&PROBE_PLAINTEXT)?;
            enumerated += 1;

            if &ciphertext == reference_ciphertext {
                return Ok(key);
            }

            if !self.advance(&mut idx) {
                return Err(Error::BruteForceExhausted { enumerated });
            }
        }
    }

    /// Increment the counter vector in reordered significance, carrying
    /// upward through `self.order`. Returns `false` once the carry
    /// propagates past the last (reordered) position, meaning the whole
    /// space has been enumerated.
    fn advance(&self, idx: &mut [usize; 16]) -> bool {
        for &position in &self.order {
            idx[position] += 1;
            if idx[position] < self.pools[position].len() {
                return true;
            }
            idx[position] = 0;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::TableOracle;

    fn pools_from(candidates: [Vec<u8>; 16]) -> [Pool; 16] {
        std::array::from_fn(|i| Pool::new(i, candidates[i].clone()).unwrap())
    }

    #[test]
    fn finds_key_when_pools_contain_it() {
        let target: [u8; 16] = [
            0x2B, 0x7E, 0x15, 0x16, 0x28, 0xAE, 0xD2, 0xA6, 0xAB, 0xF7, 0x15, 0x88, 0x09, 0xCF,
            0x4F, 0x3C,
        ];
        let target_key = AesKey::from_block(target);

        let mut oracle = TableOracle::new();
        let reference = reference_ciphertext(&mut oracle, &target_key).unwrap();

        // position 0 has a 2-candidate pool containing the true byte and a
        // decoy; every other position is pinned to the true byte alone.
        let candidates: [Vec<u8>; 16] = std::array::from_fn(|i| {
            if i == 0 {
                vec![target[0] ^ 1, target[0]]
            } else {
                vec![target[i]]
            }
        });
        let pools = pools_from(candidates);

        let engine = BruteForceEngine::new(pools);
        assert_eq!(engine.space_size(), 2);

        let found = engine.search(&mut oracle, &reference).unwrap();
        assert_eq!(found.as_bytes(), &target);
    }

    #[test]
    fn reports_exhaustion_when_key_is_missing() {
        let target: [u8; 16] = [0x11; 16];
        let target_key = AesKey::from_block(target);

        let mut oracle = TableOracle::new();
        let reference = reference_ciphertext(&mut oracle, &target_key).unwrap();

        // position 0's pool deliberately excludes the true byte.
        let candidates: [Vec<u8>; 16] = std::array::from_fn(|i| {
            if i == 0 {
                vec![target[0] ^ 1]
            } else {
                vec![target[i]]
            }
        });
        let pools = pools_from(candidates);
        let engine = BruteForceEngine::new(pools);

        let err = engine.search(&mut oracle, &reference).unwrap_err();
        match err {
            Error::BruteForceExhausted { enumerated } => assert_eq!(enumerated, 1),
            other => panic!("expected BruteForceExhausted, got {other:?}"),
        }
    }

    #[test]
    fn reorders_smallest_pools_innermost() {
        let pools: [Pool; 16] = std::array::from_fn(|i| {
            let size = if i == 15 { 2 } else { 256 };
            Pool::new(i, (0..size).map(|v| v as u8).collect()).unwrap()
        });
        let engine = BruteForceEngine::new(pools);
        assert_eq!(engine.order[0], 15, "the 2-candidate pool should be innermost");
    }
}

//! In-house, table-based (T-box/S-box) AES-128 single-block encryptor.
//!
//! This is the actual side channel the rest of the crate is built to
//! measure: round 1 indexes [`SBOX`] at `plaintext[i] XOR key[i]`, and on a
//! table-based implementation without constant-time lookups that index
//! influences encryption latency. Fixed to the single key size (128 bits /
//! 10 rounds) the leakage model targets.

use super::CipherOracle;
use super::constants::{RCON, SBOX, SBOX_INV};
use crate::error::Result;
use crate::key::AesKey;
use crate::types::Block;

const NK: usize = 4; // key length in 32-bit words
const NR: usize = 10; // number of rounds for AES-128
const NW: usize = (NR + 1) * 4; // total words produced by the key schedule

/// Eleven round keys (the initial key plus one per round) derived from an
/// [`AesKey`] via the FIPS-197 key schedule.
pub type RoundKeys = [[u8; 16]; NR + 1];

/// Run the AES-128 key schedule, producing 11 round keys.
///
/// Variable names match FIPS-197: `Nk`/`Nr`/`w` are the key length (words),
/// round count, and the expanded word array respectively.
pub fn expand_key(key: &AesKey) -> RoundKeys {
    let key = key.as_bytes();

    let mut w: [[u8; 4]; NW] = [[0u8; 4]; NW];
    for i in 0..key.len() {
        w[i / 4][i % 4] = key[i];
    }

    let mut temp = w[NK - 1];
    for i in NK..NW {
        if i % NK == 0 {
            temp = [
                SBOX[temp[1] as usize] ^ RCON[i / NK],
                SBOX[temp[2] as usize],
                SBOX[temp[3] as usize],
                SBOX[temp[0] as usize],
            ];
        }
        temp = xor_words(&temp, &w[i - NK]);
        w[i] = temp;
    }

    let mut round_keys: RoundKeys = [[0u8; 16]; NR + 1];
    for round in 0..=NR {
        let base = round * 4;
        for col in 0..4 {
            let word = w[base + col];
            for row in 0..4 {
                round_keys[round][col * 4 + row] = word[row];
            }
        }
    }
    round_keys
}

#[inline(always)]
fn xor_words(a: &[u8; 4], b: &[u8; 4]) -> [u8; 4] {
    [a[0] ^ b[0], a[1] ^ b[1], a[2] ^ b[2], a[3] ^ b[3]]
}

#[inline(always)]
fn add_round_key(state: &mut Block, round_key: &[u8; 16]) {
    for i in 0..16 {
        state[i] ^= round_key[i];
    }
}

// adapted from https://crypto.stackexchange.com/a/71206
#[inline(always)]
fn dbl(a: u8) -> u8 {
    (a << 1) ^ (0x1B & (0u8).wrapping_sub((a >> 7) & 1))
}

#[inline(always)]
fn sub_bytes(state: &mut Block) {
    for byte in state.iter_mut() {
        *byte = SBOX[*byte as usize];
    }
}

#[inline(always)]
fn sub_bytes_inv(state: &mut Block) {
    for byte in state.iter_mut() {
        *byte = SBOX_INV[*byte as usize];
    }
}

#[inline(always)]
fn shift_rows(state: &mut Block) {
    let s = *state;
    state[1] = s[5];
    state[5] = s[9];
    state[9] = s[13];
    state[13] = s[1];
    state[2] = s[10];
    state[6] = s[14];
    state[10] = s[2];
    state[14] = s[6];
    state[3] = s[15];
    state[7] = s[3];
    state[11] = s[7];
    state[15] = s[11];
}

#[inline(always)]
fn shift_rows_inv(state: &mut Block) {
    let s = *state;
    state[5] = s[1];
    state[9] = s[5];
    state[13] = s[9];
    state[1] = s[13];
    state[10] = s[2];
    state[14] = s[6];
    state[2] = s[10];
    state[6] = s[14];
    state[15] = s[3];
    state[3] = s[7];
    state[7] = s[11];
    state[11] = s[15];
}

#[inline(always)]
fn mix_columns(state: &mut Block) {
    for col in 0..4 {
        let i = col * 4;
        let (a, b, c, d) = (state[i], state[i + 1], state[i + 2], state[i + 3]);
        state[i] = dbl(a ^ b) ^ b ^ c ^ d;
        state[i + 1] = dbl(b ^ c) ^ c ^ d ^ a;
        state[i + 2] = dbl(c ^ d) ^ d ^ a ^ b;
        state[i + 3] = dbl(d ^ a) ^ a ^ b ^ c;
    }
}

#[inline(always)]
fn mix_columns_inv(state: &mut Block) {
    for col in 0..4 {
        let i = col * 4;
        let (a, b, c, d) = (state[i], state[i + 1], state[i + 2], state[i + 3]);
        let (a2, b2, c2, d2) = (dbl(a), dbl(b), dbl(c), dbl(d));
        let (a4, b4, c4, d4) = (dbl(a2), dbl(b2), dbl(c2), dbl(d2));
        let (a8, b8, c8, d8) = (dbl(a4), dbl(b4), dbl(c4), dbl(d4));
        state[i] = a8 ^ a4 ^ a2 ^ b8 ^ b2 ^ b ^ c8 ^ c4 ^ c ^ d8 ^ d;
        state[i + 1] = a8 ^ a ^ b8 ^ b4 ^ b2 ^ c8 ^ c2 ^ c ^ d8 ^ d4 ^ d;
        state[i + 2] = a8 ^ a4 ^ a ^ b8 ^ b ^ c8 ^ c4 ^ c2 ^ d8 ^ d2 ^ d;
        state[i + 3] = a8 ^ a2 ^ a ^ b8 ^ b4 ^ b ^ c8 ^ c ^ d8 ^ d4 ^ d2;
    }
}

/// Encrypt a single 16-byte block with the given round keys. The first
/// `AddRoundKey` and `SubBytes` steps are precisely the table lookup the
/// rest of this crate's leakage model is defined over.
#[inline(always)]
pub fn encrypt_block(plaintext: &Block, round_keys: &RoundKeys) -> Block {
    let mut state = *plaintext;

    add_round_key(&mut state, &round_keys[0]);

    for round_key in &round_keys[1..NR] {
        sub_bytes(&mut state);
        shift_rows(&mut state);
        mix_columns(&mut state);
        add_round_key(&mut state, round_key);
    }

    sub_bytes(&mut state);
    shift_rows(&mut state);
    add_round_key(&mut state, &round_keys[NR]);

    state
}

/// Decrypt a single 16-byte block with the given round keys. Not used by
/// the attack itself, but kept alongside `encrypt_block` so the table
/// oracle is a complete, checkable AES-128 implementation rather than a
/// one-way stub.
#[inline(always)]
pub fn decrypt_block(ciphertext: &Block, round_keys: &RoundKeys) -> Block {
    let mut state = *ciphertext;

    add_round_key(&mut state, &round_keys[NR]);

    for round_key in round_keys[1..NR].iter().rev() {
        shift_rows_inv(&mut state);
        sub_bytes_inv(&mut state);
        add_round_key(&mut state, round_key);
        mix_columns_inv(&mut state);
    }

    shift_rows_inv(&mut state);
    sub_bytes_inv(&mut state);
    add_round_key(&mut state, &round_keys[0]);

    state
}

/// In-house [`CipherOracle`] implementation. Its `encrypt` is the first-round
/// T-box lookup the whole measurement pipeline is built to time.
#[derive(Default)]
pub struct TableOracle {
    round_keys: Option<RoundKeys>,
}

impl TableOracle {
    /// Build an unkeyed oracle. `expand` must be called before `encrypt`.
    pub fn new() -> Self {
        Self { round_keys: None }
    }
}

impl CipherOracle for TableOracle {
    fn expand(&mut self, key: &AesKey) -> Result<()> {
        self.round_keys = Some(expand_key(key));
        Ok(())
    }

    fn encrypt(&mut self, plaintext: &Block) -> Result<Block> {
        let round_keys = self
            .round_keys
            .as_ref()
            .expect("TableOracle::encrypt called before expand");
        Ok(encrypt_block(plaintext, round_keys))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_schedule_matches_fips197_appendix_a1() {
        let key = AesKey::try_from_slice(&[
            0x2b, 0x7e, 0x15, 0x16, 0x28, 0xae, 0xd2, 0xa6, 0xab, 0xf7, 0x15, 0x88, 0x09, 0xcf,
            0x4f, 0x3c,
        ])
        .unwrap();

        let round_keys = expand_key(&key);
        let last = *round_keys.last().unwrap();

        assert_eq!(
            last,
            [
                0xd0, 0x14, 0xf9, 0xa8, 0xc9, 0xee, 0x25, 0x89, 0xe1, 0x3f, 0x0c, 0xc8, 0xb6, 0x63,
                0x0c, 0xa6,
            ]
        );
    }

    #[test]
    fn encrypt_matches_fips197_core128_vector() {
        let key = AesKey::try_from_slice(&[
            0x2B, 0x7E, 0x15, 0x16, 0x28, 0xAE, 0xD2, 0xA6, 0xAB, 0xF7, 0x15, 0x88, 0x09, 0xCF,
            0x4F, 0x3C,
        ])
        .unwrap();
        let plaintext: Block = [
            0x6B, 0xC1, 0xBE, 0xE2, 0x2E, 0x40, 0x9F, 0x96, 0xE9, 0x3D, 0x7E, 0x11, 0x73, 0x93,
            0x17, 0x2A,
        ];
        let expected: Block = [
            0x3A, 0xD7, 0x7B, 0xB4, 0x0D, 0x7A, 0x36, 0x60, 0xA8, 0x9E, 0xCA, 0xF3, 0x24, 0x66,
            0xEF, 0x97,
        ];

        let round_keys = expand_key(&key);
        assert_eq!(encrypt_block(&plaintext, &round_keys), expected);
    }

    #[test]
    fn table_oracle_matches_free_function() {
        let key = AesKey::random().unwrap();
        let plaintext: Block = *b"0123456789abcdef";

        let mut oracle = TableOracle::new();
        oracle.expand(&key).unwrap();
        let via_oracle = oracle.encrypt(&plaintext).unwrap();

        let via_function = encrypt_block(&plaintext, &expand_key(&key));
        assert_eq!(via_oracle, via_function);
    }

    #[test]
    fn decrypt_inverts_encrypt() {
        let key = AesKey::random().unwrap();
        let round_keys = expand_key(&key);
        let plaintext: Block = *b"0123456789abcdef";

        let ciphertext = encrypt_block(&plaintext, &round_keys);
        let recovered = decrypt_block(&ciphertext, &round_keys);

        assert_eq!(recovered, plaintext);
    }
}

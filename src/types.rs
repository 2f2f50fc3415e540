//! Core data types shared across the measurement and statistics pipeline.

/// A 16-byte AES block: plaintext, ciphertext, or key material.
pub type Block = [u8; 16];

/// A non-negative hardware cycle count. A single encryption's duration fits
/// comfortably in 32 bits, but accumulations across a whole key study must
/// use the full 64 bits.
pub type Tick = u64;

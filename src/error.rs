use thiserror::Error;

/// Timing-engine result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Timing-engine error type.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// A key file, pool file, or other input was not 16 bytes / otherwise malformed.
    #[error("invalid key length: {len} bytes (expected 16)")]
    InvalidKeyLength { len: usize },

    /// A `Pool` was constructed with zero candidates, or with duplicate bytes.
    #[error("invalid candidate pool at position {position}: {reason}")]
    InvalidPool { position: usize, reason: &'static str },

    /// `bf.dat` or another framed file did not match its expected layout.
    #[error("malformed {context}: {detail}")]
    MalformedFile {
        context: &'static str,
        detail: String,
    },

    /// The measurement loop discarded more than `Config::max_discard_ratio` of its samples.
    #[error("measurement degeneracy: discard ratio {ratio:.3} exceeded configured maximum")]
    MeasurementDegenerate { ratio: f64 },

    /// The brute-force engine exhausted the candidate product space without a match.
    #[error("brute-force exhausted {enumerated} candidates without finding the target key")]
    BruteForceExhausted { enumerated: u64 },

    /// Propagated I/O failure (missing key file, unwritable dump path, ...).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// OS RNG failed during entropy draw.
    #[error("OS RNG failed")]
    Rng(#[from] rand::rand_core::OsError),

    /// Oracle backend failed to initialize or encrypt (only the OpenSSL-backed
    /// oracle can currently produce this; the in-house table oracle is infallible).
    #[cfg(feature = "openssl-oracle")]
    #[error("OpenSSL oracle error: {0}")]
    Openssl(#[from] openssl::error::ErrorStack),
}

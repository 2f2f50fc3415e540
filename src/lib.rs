//! `aestime` is a measurement-and-analysis engine for a known-plaintext
//! timing side channel against AES-128 implementations whose first round
//! uses table-based (T-box/S-box) lookups.
//!
//! Given an oracle that encrypts under a fixed unknown target key, and the
//! ability to key and time the same oracle under chosen test keys, this
//! crate:
//!
//! 1. Drives the [`measurement`] loop to build per-cleartext-byte timing
//!    [`tally`] tables, normalized by [`stats`] into [`stats::MeanVector`]s.
//! 2. Cross-[`correlator::correlate`]s a target key's mean vector against
//!    known test keys' under the first-round T-box leakage model, and
//!    [`aggregator::Aggregator`] sums the result across many test keys.
//! 3. Brute-forces the product of per-position candidate [`pool::Pool`]s
//!    with [`bruteforce::BruteForceEngine`] once pools are small enough.
//!
//! AES-128 itself is provided by the [`oracle`] module, which is deliberately
//! a pluggable capability rather than a general-purpose cipher library: the
//! attack is about the *timing* of a table-based first round, not about
//! providing AES to downstream callers.
//!
//! ## Example
//! ```
//! use aestime::key::AesKey;
//! use aestime::oracle::{CipherOracle, TableOracle};
//! use aestime::config::Config;
//! use aestime::entropy::FastEntropy;
//! use aestime::measurement::{OracleSampler, RealClock, run};
//!
//! # fn main() -> aestime::error::Result<()> {
//! let key = AesKey::random()?;
//! let mut oracle = TableOracle::new();
//! oracle.expand(&key)?;
//! let mut entropy = FastEntropy::new()?;
//! let mut sampler = OracleSampler::new(&mut oracle, &mut entropy, RealClock, false);
//!
//! let config = Config { sample_count: 256, ..Config::default() };
//! let table = run(&mut sampler, &config)?;
//! assert_eq!(table.total_runs(), 256);
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod bruteforce;
pub mod config;
pub mod correlator;
pub mod entropy;
pub mod error;
pub mod io;
pub mod key;
pub mod measurement;
pub mod oracle;
pub mod pool;
pub mod scrubber;
pub mod stats;
pub mod tally;
pub mod timer;
pub mod tuner;
pub mod types;

pub use error::{Error, Result};

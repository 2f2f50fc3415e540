//! On-disk file formats, one small module per format, keeping the
//! statistical core free of I/O concerns.

pub mod bf_file;
pub mod correlation_dump;
pub mod key_file;
pub mod mean_file;
pub mod rate_file;
pub mod raw_dump;
pub mod tally_dump;

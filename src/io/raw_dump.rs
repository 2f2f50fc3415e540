//! Raw per-measurement dump: one record per accepted measurement, in either
//! an ASCII form (16 hex bytes, a space, then a decimal tick count, then a
//! newline) or a binary form (16 raw cleartext bytes followed by a 4-byte
//! native-endian tick count).
//!
//! The binary form ties consumers to the producer's ABI (native endianness,
//! native `u32` width); prefer [`Format::Ascii`] unless both ends are known
//! to share a platform.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::types::{Block, Tick};

/// On-disk encoding for a raw dump.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Format {
    /// `"%02x %02x ... %02x %lld\n"`, portable across architectures.
    Ascii,
    /// 16 raw bytes + a 4-byte native-endian tick count, truncated to `u32`.
    Binary,
}

/// Streaming writer for the raw dump, one [`write_record`](Self::write_record)
/// call per accepted measurement.
pub struct RawDumpWriter {
    out: BufWriter<File>,
    format: Format,
}

impl RawDumpWriter {
    /// Create (or truncate) a raw dump file at `path`.
    pub fn create(path: impl AsRef<Path>, format: Format) -> Result<Self> {
        let file = File::create(path)?;
        Ok(Self {
            out: BufWriter::new(file),
            format,
        })
    }

    /// Append one accepted measurement's record.
    pub fn write_record(&mut self, plaintext: &Block, ticks: Tick) -> Result<()> {
        match self.format {
            Format::Ascii => {
                for byte in plaintext {
                    write!(self.out, "{byte:02x} ")?;
                }
                writeln!(self.out, "{ticks}")?;
            }
            Format::Binary => {
                self.out.write_all(plaintext)?;
                self.out.write_all(&(ticks as u32).to_ne_bytes())?;
            }
        }
        Ok(())
    }

    /// Flush any buffered output.
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

//! Tally dump format (optional): per position and candidate byte, ordered by
//! descending normalized mean, one line `"%2d %02x %lld %lf\n"` — position,
//! candidate byte, raw count, normalized mean.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::stats::MeanVector;
use crate::tally::TallyTable;

/// Write a [`TallyTable`]/[`MeanVector`] pair to `path` in the standard dump
/// format, one line per position per candidate byte, descending by
/// normalized mean (stable on ties).
pub fn write(path: impl AsRef<Path>, table: &TallyTable, means: &MeanVector) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);

    for position in 0..16 {
        let mut rows: Vec<(u8, u64, f64)> = (0u16..256)
            .map(|b| {
                let byte = b as u8;
                let tally = table.get(position, byte);
                (byte, tally.count, means.get(position, byte))
            })
            .collect();
        rows.sort_by(|a, b| b.2.total_cmp(&a.2));

        for (byte, count, mean) in rows {
            writeln!(out, "{position:2} {byte:02x} {count} {mean:.6}")?;
        }
    }

    out.flush()?;
    Ok(())
}

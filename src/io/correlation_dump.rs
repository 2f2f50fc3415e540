//! Correlation dump format: for each position and every candidate byte,
//! ordered by descending coefficient (stable on ties), one line
//! `"%2d %02x %lf\n"` — position, candidate byte, coefficient.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::correlator::CorrelationMatrix;
use crate::error::{Error, Result};

/// Write a [`CorrelationMatrix`] to `path` in the standard dump format.
pub fn write(path: impl AsRef<Path>, matrix: &CorrelationMatrix) -> Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    for position in 0..16 {
        for (candidate, score) in matrix.ranked_candidates(position) {
            writeln!(out, "{position:2} {candidate:02x} {score:.6}")?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Read a correlation dump back into a [`CorrelationMatrix`]. Line order
/// doesn't matter for reconstruction: each line names its own `(position,
/// candidate)` cell explicitly.
pub fn read(path: impl AsRef<Path>) -> Result<CorrelationMatrix> {
    let contents = std::fs::read_to_string(path)?;
    let mut matrix = CorrelationMatrix::new_zeroed();

    for line in contents.lines() {
        let mut fields = line.split_whitespace();
        let position: usize = fields
            .next()
            .ok_or_else(|| malformed("missing position field"))?
            .parse()
            .map_err(|_| malformed("position field is not an integer"))?;
        let candidate = u8::from_str_radix(
            fields.next().ok_or_else(|| malformed("missing candidate field"))?,
            16,
        )
        .map_err(|_| malformed("candidate field is not hex"))?;
        let score: f64 = fields
            .next()
            .ok_or_else(|| malformed("missing score field"))?
            .parse()
            .map_err(|_| malformed("score field is not a float"))?;

        if position >= 16 {
            return Err(malformed("position field out of range"));
        }
        matrix.set_cell(position, candidate, score);
    }

    Ok(matrix)
}

fn malformed(detail: &str) -> Error {
    Error::MalformedFile {
        context: "correlation dump",
        detail: detail.to_string(),
    }
}

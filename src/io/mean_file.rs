//! Mean-vector file format: a flat, native-endian dump of a
//! [`MeanVector`]'s 16x256 `f64` cells in row-major order.
//!
//! Not one of the standard wire formats written by the CLI — those cover
//! measurements flowing *in* and candidates/correlations flowing *out*.
//! This format is the glue a multi-stage CLI needs to hand a `measure`
//! stage's output to a later `correlate` stage without re-running the
//! measurement loop; it plays the role a checkpoint file plays, with the
//! encoding kept as simple as possible since checkpoint formatting is
//! otherwise an external concern.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::stats::MeanVector;

const CELLS: usize = 16 * 256;

/// Write a [`MeanVector`] to `path` as `CELLS` native-endian `f64`s.
pub fn write(path: impl AsRef<Path>, means: &MeanVector) -> Result<()> {
    let mut out = Vec::with_capacity(CELLS * 8);
    for value in means.to_flat() {
        out.extend_from_slice(&value.to_ne_bytes());
    }
    File::create(path)?.write_all(&out)?;
    Ok(())
}

/// Read a [`MeanVector`] previously written by [`write`].
pub fn read(path: impl AsRef<Path>) -> Result<MeanVector> {
    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;

    if bytes.len() != CELLS * 8 {
        return Err(Error::MalformedFile {
            context: "mean file",
            detail: format!("expected {} bytes, found {}", CELLS * 8, bytes.len()),
        });
    }

    let mut values = [0.0f64; CELLS];
    for (i, chunk) in bytes.chunks_exact(8).enumerate() {
        values[i] = f64::from_ne_bytes(chunk.try_into().unwrap());
    }

    Ok(MeanVector::from_flat(&values))
}

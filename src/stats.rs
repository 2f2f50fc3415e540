//! Statistics pipeline: mean extraction with grand-mean normalization.

use crate::tally::TallyTable;

/// A 16x256 matrix of normalized mean timings, indexed `[position][byte]`.
#[derive(Clone, Debug)]
pub struct MeanVector {
    cells: Box<[[f64; 256]; 16]>,
}

impl MeanVector {
    /// Extract a [`MeanVector`] from a tally table via grand-mean
    /// normalization: each cell's raw mean is divided by the grand mean
    /// `total_ticks / total_runs`, which removes DC offsets
    /// common to every bucket at a position while preserving the relative
    /// variation between cleartext byte values that the attack consumes.
    ///
    /// Empty cells (`count == 0`) are defined as the neutral value `1.0`;
    /// with uniform random plaintexts and a realistic sample count this
    /// should not occur, but the definition keeps the matrix total.
    pub fn from_tally(table: &TallyTable) -> Self {
        let grand_mean = table.total_ticks() as f64 / table.total_runs() as f64;

        let mut cells = Box::new([[1.0f64; 256]; 16]);
        for position in 0..16 {
            for byte in 0u16..256 {
                let tally = table.get(position, byte as u8);
                if tally.count > 0 {
                    let raw_mean = tally.ticks_sum as f64 / tally.count as f64;
                    cells[position][byte as usize] = raw_mean / grand_mean;
                }
            }
        }

        Self { cells }
    }

    /// The normalized mean timing for cleartext byte `byte` at `position`.
    pub fn get(&self, position: usize, byte: u8) -> f64 {
        self.cells[position][byte as usize]
    }

    /// Build a [`MeanVector`] from a flat, row-major (`position * 256 +
    /// byte`) sequence of 4096 values. Used to deserialize the mean-file
    /// format the CLI passes between `measure` and `correlate`.
    pub fn from_flat(values: &[f64; 16 * 256]) -> Self {
        let mut cells = Box::new([[0.0f64; 256]; 16]);
        for position in 0..16 {
            cells[position].copy_from_slice(&values[position * 256..(position + 1) * 256]);
        }
        Self { cells }
    }

    /// Flatten this matrix into row-major (`position * 256 + byte`) order,
    /// the inverse of [`from_flat`](Self::from_flat).
    pub fn to_flat(&self) -> Vec<f64> {
        let mut out = Vec::with_capacity(16 * 256);
        for position in 0..16 {
            out.extend_from_slice(&self.cells[position]);
        }
        out
    }

    /// The full row of 256 normalized means for one position.
    pub fn row(&self, position: usize) -> &[f64; 256] {
        &self.cells[position]
    }
}

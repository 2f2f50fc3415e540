//! Cross-correlates a target key's mean timing vector against a known test
//! key's, under every candidate first-round key-byte hypothesis.

use crate::key::AesKey;
use crate::stats::MeanVector;

/// A 16x256 matrix of Pearson correlation coefficients, `[position][k1]`
/// where `k1` is the candidate target-key byte hypothesis.
#[derive(Clone, Debug)]
pub struct CorrelationMatrix {
    cells: Box<[[f64; 256]; 16]>,
}

impl CorrelationMatrix {
    fn zeroed() -> Self {
        Self {
            cells: Box::new([[0.0f64; 256]; 16]),
        }
    }

    /// Build an all-zero matrix directly, e.g. to reconstruct one from a
    /// correlation dump read back off disk.
    pub fn new_zeroed() -> Self {
        Self::zeroed()
    }

    /// The correlation coefficient for hypothesis `k1` at `position`.
    pub fn get(&self, position: usize, k1: u8) -> f64 {
        self.cells[position][k1 as usize]
    }

    /// Set the correlation coefficient for hypothesis `k1` at `position`.
    pub fn set_cell(&mut self, position: usize, k1: u8, value: f64) {
        self.set(position, k1, value);
    }

    fn set(&mut self, position: usize, k1: u8, value: f64) {
        self.cells[position][k1 as usize] = value;
    }

    /// Add another matrix element-wise in place (used by the Aggregator).
    pub fn add_assign(&mut self, other: &CorrelationMatrix) {
        for position in 0..16 {
            for k in 0..256 {
                self.cells[position][k] += other.cells[position][k];
            }
        }
    }

    /// Candidate bytes at `position` ordered by descending correlation
    /// score, stable on ties.
    pub fn ranked_candidates(&self, position: usize) -> Vec<(u8, f64)> {
        let mut ranked: Vec<(u8, f64)> = (0u16..256)
            .map(|b| (b as u8, self.cells[position][b as usize]))
            .collect();
        // total_cmp gives a well-defined (stable-on-ties) order even with NaN.
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

/// Pearson correlation coefficient between two equal-length samples, using
/// the textbook N-1 denominator for the variance/covariance estimators.
/// Degenerate (zero-variance) inputs are not guarded against: the result
/// may be `NaN` or infinite, and that is propagated rather than treated
/// as an error.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    assert_eq!(x.len(), y.len(), "pearson requires equal-length inputs");
    let n = x.len() as f64;

    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let avg_x = sum_x / n;
    let avg_y = sum_y / n;

    let sum_x2: f64 = x.iter().map(|v| v * v).sum();
    let sum_y2: f64 = y.iter().map(|v| v * v).sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();

    let var_x = (sum_x2 - n * avg_x * avg_x) / (n - 1.0);
    let var_y = (sum_y2 - n * avg_y * avg_y) / (n - 1.0);
    let cov_xy = (sum_xy - n * avg_x * avg_y) / (n - 1.0);

    cov_xy / (var_x * var_y).sqrt()
}

/// Compute the [`CorrelationMatrix`] between a target key's and a known test
/// key's mean timing vectors.
///
/// For each position `i` and candidate hypothesis `k1`, the target vector is
/// realigned into T-box-input space (`X[s] = mean_target[i][s XOR k1]`) and
/// compared against the test vector realigned with the *known* test key byte
/// (`Y[s] = mean_test[i][s XOR test_key[i]]`). Under the true hypothesis
/// both realignments land in the same T-box-input space and correlate
/// strongly; under a wrong hypothesis the realignment is a pseudo-random
/// permutation and the correlation is near zero.
pub fn correlate(mean_target: &MeanVector, mean_test: &MeanVector, test_key: &AesKey) -> CorrelationMatrix {
    let mut matrix = CorrelationMatrix::zeroed();
    let test_key = test_key.as_bytes();

    for position in 0..16 {
        let test_row = mean_test.row(position);
        // Y is independent of k1, so compute it once per position.
        let y: Vec<f64> = (0u16..256)
            .map(|s| test_row[(s as u8 ^ test_key[position]) as usize])
            .collect();

        let target_row = mean_target.row(position);
        for k1 in 0u16..256 {
            let x: Vec<f64> = (0u16..256)
                .map(|s| target_row[(s as u8 ^ k1 as u8) as usize])
                .collect();
            matrix.set(position, k1 as u8, pearson(&x, &y));
        }
    }

    matrix
}

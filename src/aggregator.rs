//! Sums correlation matrices across multiple test keys to amplify signal.
//! No averaging is needed — only the sign and relative magnitude of the
//! summed coefficients matter to downstream pool selection.

use crate::correlator::CorrelationMatrix;

/// Accumulates correlation matrices from successive test keys.
pub struct Aggregator {
    sum: Option<CorrelationMatrix>,
    contributions: usize,
}

impl Aggregator {
    pub fn new() -> Self {
        Self {
            sum: None,
            contributions: 0,
        }
    }

    /// Fold in one test key's correlation matrix.
    pub fn add(&mut self, matrix: &CorrelationMatrix) {
        match &mut self.sum {
            Some(sum) => sum.add_assign(matrix),
            None => self.sum = Some(matrix.clone()),
        }
        self.contributions += 1;
    }

    /// How many test keys have been folded in so far.
    pub fn contributions(&self) -> usize {
        self.contributions
    }

    /// The running sum, if at least one matrix has been added.
    pub fn sum(&self) -> Option<&CorrelationMatrix> {
        self.sum.as_ref()
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::AesKey;
    use crate::stats::MeanVector;
    use crate::tally::TallyTable;

    fn sample_means() -> MeanVector {
        let mut table = TallyTable::new();
        for byte in 0u16..256 {
            let plaintext: [u8; 16] = [byte as u8; 16];
            table.record(&plaintext, 1000 + byte as u64);
        }
        MeanVector::from_tally(&table)
    }

    #[test]
    fn sums_without_averaging() {
        let means = sample_means();
        let key = AesKey::from_block([0x11; 16]);
        let matrix = crate::correlator::correlate(&means, &means, &key);

        let mut aggregator = Aggregator::new();
        aggregator.add(&matrix);
        aggregator.add(&matrix);

        let summed = aggregator.sum().unwrap();
        let single = matrix.get(0, 0x11);
        let doubled = summed.get(0, 0x11);
        assert!((doubled - 2.0 * single).abs() < 1e-9);
        assert_eq!(aggregator.contributions(), 2);
    }
}

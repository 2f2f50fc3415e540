//! The tally table accumulated by the measurement loop.

use crate::types::Tick;

/// `(count, ticks_sum)` for one cleartext byte value at one position: the
/// number of accepted measurements whose cleartext byte at that position
/// equaled that value, and the sum of their measured ticks.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub count: u64,
    pub ticks_sum: Tick,
}

/// The full 16x256 tally matrix for one key study, plus the running
/// `(total_runs, total_ticks)` counters.
#[derive(Clone, Debug)]
pub struct TallyTable {
    cells: Box<[[Tally; 256]; 16]>,
    total_runs: u64,
    total_ticks: Tick,
}

impl TallyTable {
    /// A freshly zeroed tally table for a new key study.
    pub fn new() -> Self {
        Self {
            cells: Box::new([[Tally::default(); 256]; 16]),
            total_runs: 0,
            total_ticks: 0,
        }
    }

    /// Record one accepted measurement: a 16-byte plaintext and the ticks
    /// its encryption took. Increments all 16 per-position tallies, then
    /// the grand counters.
    pub fn record(&mut self, plaintext: &[u8; 16], ticks: Tick) {
        for (position, &byte) in plaintext.iter().enumerate() {
            let cell = &mut self.cells[position][byte as usize];
            cell.count += 1;
            cell.ticks_sum += ticks;
        }
        self.total_runs += 1;
        self.total_ticks += ticks;
    }

    /// The tally for position `i`, byte value `b`.
    pub fn get(&self, position: usize, byte: u8) -> Tally {
        self.cells[position][byte as usize]
    }

    /// Total accepted measurements in this study.
    pub fn total_runs(&self) -> u64 {
        self.total_runs
    }

    /// Total ticks summed across all accepted measurements.
    pub fn total_ticks(&self) -> Tick {
        self.total_ticks
    }
}

impl Default for TallyTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conserves_counts_and_ticks_per_position() {
        let mut table = TallyTable::new();
        let samples: [(&[u8; 16], Tick); 3] = [
            (b"aaaaaaaaaaaaaaaa", 100),
            (b"bbbbbbbbbbbbbbbb", 200),
            (b"aaaaaaaaaaaaaaaa", 150),
        ];
        for (plaintext, ticks) in samples {
            table.record(plaintext, ticks);
        }

        for position in 0..16 {
            let sum_counts: u64 = (0u16..256)
                .map(|b| table.get(position, b as u8).count)
                .sum();
            let sum_ticks: Tick = (0u16..256)
                .map(|b| table.get(position, b as u8).ticks_sum)
                .sum();
            assert_eq!(sum_counts, table.total_runs());
            assert_eq!(sum_ticks, table.total_ticks());
        }
        assert_eq!(table.total_runs(), 3);
        assert_eq!(table.total_ticks(), 450);
    }
}

//! The Measurement Loop and Threshold Calibrator.

use crate::config::{Config, THRESH_MULT};
use crate::entropy::EntropySource;
use crate::error::{Error, Result};
use crate::oracle::CipherOracle;
use crate::scrubber::CacheScrubber;
use crate::tally::TallyTable;
use crate::timer;
use crate::types::{Block, Tick};

/// A monotonic tick source. Abstracted so the measurement loop can be driven
/// by the real hardware cycle counter in production and by deterministic
/// synthetic sources in tests (a constant-tick oracle, one that
/// deterministically returns `in[0]`, etc. are expressed as [`Sampler`]
/// implementations below, not as fakes of this trait — see [`Sampler`] for
/// why).
pub trait Clock {
    fn cycles(&mut self) -> Tick;
}

/// The real hardware cycle counter.
#[derive(Default)]
pub struct RealClock;

impl Clock for RealClock {
    fn cycles(&mut self) -> Tick {
        timer::cycles()
    }
}

/// Produces one `(plaintext, ticks)` measurement per call. This is the seam
/// the Measurement Loop is built against instead of directly against
/// `CipherOracle` + `Clock`, because exercising scenarios like "a
/// constant-tick oracle", "an oracle whose tick leaks `in[0]`", or "an
/// oracle whose tick is `in[3] XOR target_key[3]`" is about *timing
/// behavior*, which on real hardware emerges from executing the oracle, but
/// in tests needs to be supplied directly and deterministically. A
/// `Sampler` is where that choice is made; [`OracleSampler`] is the
/// production implementation, wiring a real `CipherOracle` + `EntropySource`
/// + `Clock` together.
pub trait Sampler {
    /// Draw a plaintext and report the ticks its encryption took.
    fn sample(&mut self) -> Result<(Block, Tick)>;
}

/// Drives a real [`CipherOracle`] with plaintexts from an [`EntropySource`],
/// timed with a [`Clock`]. The tick counter is read immediately around the
/// single `encrypt` call with no intervening work; the key must already be
/// expanded before sampling begins.
pub struct OracleSampler<'a, O, E, C> {
    oracle: &'a mut O,
    entropy: &'a mut E,
    clock: C,
    scrubber: Option<CacheScrubber>,
}

impl<'a, O, E, C> OracleSampler<'a, O, E, C>
where
    O: CipherOracle,
    E: EntropySource,
    C: Clock,
{
    /// Build a sampler. `oracle` must already have had `expand` called on
    /// the key under study.
    pub fn new(oracle: &'a mut O, entropy: &'a mut E, clock: C, scrub_cache: bool) -> Self {
        Self {
            oracle,
            entropy,
            clock,
            scrubber: scrub_cache.then(CacheScrubber::new),
        }
    }
}

impl<O, E, C> Sampler for OracleSampler<'_, O, E, C>
where
    O: CipherOracle,
    E: EntropySource,
    C: Clock,
{
    fn sample(&mut self) -> Result<(Block, Tick)> {
        let plaintext = self.entropy.next_block();

        if let Some(scrubber) = &mut self.scrubber {
            scrubber.scrub();
        }

        let start = self.clock.cycles();
        self.oracle.encrypt(&plaintext)?;
        let end = self.clock.cycles();

        Ok((plaintext, end.saturating_sub(start)))
    }
}

/// Run the Measurement Loop until `config.sample_count` measurements have
/// been accepted, returning the populated tally table.
///
/// Outlier retry policy: on discard, a fresh plaintext is drawn on retry
/// rather than reusing the discarded one.
pub fn run<S: Sampler>(sampler: &mut S, config: &Config) -> Result<TallyTable> {
    run_recording(sampler, config, |_, _| {})
}

/// Like [`run`], but invokes `on_accept` with every accepted
/// `(plaintext, ticks)` pair as it is recorded — the hook the optional raw
/// dump is wired through, keeping the measurement loop itself free of file
/// I/O.
pub fn run_recording<S: Sampler>(
    sampler: &mut S,
    config: &Config,
    mut on_accept: impl FnMut(&Block, Tick),
) -> Result<TallyTable> {
    let mut table = TallyTable::new();
    let mut discarded: u64 = 0;

    while table.total_runs() < config.sample_count {
        let (plaintext, ticks) = sampler.sample()?;

        if let Some(threshold) = config.threshold {
            if ticks > threshold {
                discarded += 1;
                if let Some(max_ratio) = config.max_discard_ratio {
                    let attempted = table.total_runs() + discarded;
                    let ratio = discarded as f64 / attempted as f64;
                    if ratio > max_ratio {
                        return Err(Error::MeasurementDegenerate { ratio });
                    }
                }
                continue;
            }
        }

        table.record(&plaintext, ticks);
        on_accept(&plaintext, ticks);
    }

    Ok(table)
}

/// Result of a Threshold Calibrator pass: the observed encryption rate and
/// the derived outlier cutoff.
#[derive(Copy, Clone, Debug)]
pub struct Calibration {
    pub rate_per_second: f64,
    pub threshold: u64,
}

/// Run `2^runs` measurements with the outlier filter disabled under a fresh
/// random key, and derive `(rate, threshold)` from the result. Skipped
/// entirely by callers that have an operator-supplied threshold.
pub fn calibrate<S: Sampler>(sampler: &mut S, runs: u32) -> Result<Calibration> {
    let sample_count = 1u64 << runs;
    let config = Config::calibration(sample_count);

    let wall_start = std::time::Instant::now();
    let table = run(sampler, &config)?;
    let wall_seconds = wall_start.elapsed().as_secs_f64();

    let mean = table.total_ticks() as f64 / table.total_runs() as f64;
    let threshold = (mean * THRESH_MULT as f64).round() as u64;
    let rate_per_second = table.total_runs() as f64 / wall_seconds;

    Ok(Calibration {
        rate_per_second,
        threshold,
    })
}

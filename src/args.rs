//! Command-line surface: one subcommand per pipeline stage, plus a `run`
//! subcommand mirroring the minimal single-shot CLI contract (one optional
//! positional threshold argument).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, author, arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the Threshold Calibrator: disable the outlier filter, measure a
    /// fresh random key, and derive `(rate, threshold)`.
    Calibrate(CalibrateArgs),

    /// Run the Measurement Loop under a keyed oracle, writing a mean-vector
    /// file and optional raw/tally dumps.
    Measure(MeasureArgs),

    /// Cross-correlate a target key's mean vector against a known test
    /// key's, writing a correlation dump.
    Correlate(CorrelateArgs),

    /// Sum correlation dumps element-wise into one aggregate dump.
    Aggregate(AggregateArgs),

    /// Brute-force the product of 16 per-position candidate pools against a
    /// target key's reference ciphertext.
    Bruteforce(BruteforceArgs),

    /// One-shot pipeline: calibrate (unless an explicit threshold is given),
    /// then measure the target key and report a summary.
    Run(RunArgs),
}

#[derive(Args, Debug)]
#[command(arg_required_else_help = true)]
pub struct CalibrateArgs {
    /// Rate file to write `<rate>\n<threshold>\n` to.
    #[arg(short = 'o', long = "out")]
    pub out: PathBuf,

    /// log2 of the number of measurements to calibrate over.
    #[arg(long = "runs", default_value_t = crate::config::DEFAULT_RUNS)]
    pub runs: u32,
}

#[derive(Args, Debug)]
#[command(arg_required_else_help = true)]
pub struct MeasureArgs {
    /// Key file to key the oracle with (16 raw bytes).
    #[arg(short = 'k', long = "key")]
    pub key: PathBuf,

    /// Mean-vector file to write the extracted, normalized means to.
    #[arg(short = 'o', long = "out")]
    pub out: PathBuf,

    /// Target count of accepted measurements.
    #[arg(short = 'c', long = "count")]
    pub count: u64,

    /// Outlier cutoff in ticks. Omit to disable the outlier filter.
    #[arg(short = 't', long = "threshold")]
    pub threshold: Option<u64>,

    /// Disable the outlier filter even if `--threshold` is given.
    #[arg(long = "no-outlier-filter")]
    pub no_outlier_filter: bool,

    /// Scrub the data cache immediately before every timed encryption.
    #[arg(long = "scrub-cache")]
    pub scrub_cache: bool,

    /// Best-effort pin the measuring thread to CPU 0.
    #[arg(long = "pin-cpu")]
    pub pin_cpu: bool,

    /// Best-effort request realtime scheduling priority.
    #[arg(long = "realtime")]
    pub realtime: bool,

    /// Optional path to write a raw per-measurement dump to.
    #[arg(long = "raw-dump")]
    pub raw_dump: Option<PathBuf>,

    /// Write the raw dump in binary form instead of ASCII.
    #[arg(long = "raw-binary", requires = "raw_dump")]
    pub raw_binary: bool,

    /// Optional path to write a tally dump to.
    #[arg(long = "tally-dump")]
    pub tally_dump: Option<PathBuf>,
}

#[derive(Args, Debug)]
#[command(arg_required_else_help = true)]
pub struct CorrelateArgs {
    /// Mean-vector file for the (unknown) target key.
    #[arg(long = "target")]
    pub target: PathBuf,

    /// Mean-vector file for a known test key.
    #[arg(long = "test")]
    pub test: PathBuf,

    /// Key file for the same known test key.
    #[arg(long = "test-key")]
    pub test_key: PathBuf,

    /// Correlation dump to write.
    #[arg(short = 'o', long = "out")]
    pub out: PathBuf,
}

#[derive(Args, Debug)]
#[command(arg_required_else_help = true)]
pub struct AggregateArgs {
    /// Aggregate correlation dump to write.
    #[arg(short = 'o', long = "out")]
    pub out: PathBuf,

    /// Correlation dumps to sum, one per test key.
    #[arg(required = true)]
    pub dumps: Vec<PathBuf>,
}

#[derive(Args, Debug)]
#[command(arg_required_else_help = true)]
pub struct BruteforceArgs {
    /// `bf.dat`-formatted per-position candidate pools.
    #[arg(long = "pools")]
    pub pools: PathBuf,

    /// Target key file, used only to produce the reference ciphertext.
    #[arg(long = "target")]
    pub target: PathBuf,
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Outlier cutoff in ticks. When present and > 0, calibration is
    /// skipped and this threshold is used directly.
    pub threshold: Option<f64>,

    /// Key file for the target key to measure.
    #[arg(short = 'k', long = "key")]
    pub key: PathBuf,

    /// Target count of accepted measurements.
    #[arg(short = 'c', long = "count", default_value_t = 1u64 << crate::config::DEFAULT_RUNS)]
    pub count: u64,
}

mod args;

use std::process::ExitCode;

use args::{
    AggregateArgs, BruteforceArgs, CalibrateArgs, Cli, Commands, CorrelateArgs, MeasureArgs,
    RunArgs,
};
use clap::Parser;
use tracing::{info, warn};

use aestime::aggregator::Aggregator;
use aestime::bruteforce::{BruteForceEngine, reference_ciphertext};
use aestime::config::Config;
use aestime::correlator::correlate;
use aestime::entropy::{EntropySource, FastEntropy};
use aestime::error::{Error, Result};
use aestime::io::{bf_file, correlation_dump, key_file, mean_file, raw_dump, rate_file, tally_dump};
use aestime::measurement::{Calibration, OracleSampler, RealClock, calibrate, run_recording};
use aestime::oracle::CipherOracle;
use aestime::pool::Pool;
use aestime::stats::MeanVector;
use aestime::tuner;

#[cfg(feature = "openssl-oracle")]
type Oracle = aestime::oracle::OpensslOracle;
#[cfg(not(feature = "openssl-oracle"))]
type Oracle = aestime::oracle::TableOracle;

fn new_oracle() -> Oracle {
    Oracle::default()
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(exit_code_for(&e))
        }
    }
}

/// 0 on success; 1 on configuration/I/O errors or brute-force exhaustion;
/// everything else also maps to 1 rather than panicking out of `main`.
fn exit_code_for(_err: &Error) -> u8 {
    1
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Calibrate(args) => calibrate_cmd(args),
        Commands::Measure(args) => measure_cmd(args),
        Commands::Correlate(args) => correlate_cmd(args),
        Commands::Aggregate(args) => aggregate_cmd(args),
        Commands::Bruteforce(args) => bruteforce_cmd(args),
        Commands::Run(args) => run_cmd(args),
    }
}

fn apply_tuning(pin_cpu: bool, realtime: bool) {
    if pin_cpu && !tuner::pin_to_core_zero() {
        warn!("failed to pin measuring thread to CPU 0; continuing unpinned");
    }
    if realtime && !tuner::request_realtime_priority() {
        warn!("failed to acquire realtime scheduling priority; continuing at default priority");
    }
}

fn calibrate_cmd(args: CalibrateArgs) -> Result<()> {
    let mut entropy = FastEntropy::new()?;
    let key = entropy.next_key();
    let mut oracle = new_oracle();
    oracle.expand(&key)?;
    let mut sampler = OracleSampler::new(&mut oracle, &mut entropy, RealClock, false);

    let calibration = calibrate(&mut sampler, args.runs)?;
    info!(
        rate = calibration.rate_per_second,
        threshold = calibration.threshold,
        "calibration complete"
    );
    rate_file::write(&args.out, &calibration)?;
    Ok(())
}

fn measure_cmd(args: MeasureArgs) -> Result<()> {
    apply_tuning(args.pin_cpu, args.realtime);

    let key = key_file::read(&args.key)?;
    let mut oracle = new_oracle();
    oracle.expand(&key)?;
    let mut entropy = FastEntropy::new()?;
    let mut sampler = OracleSampler::new(&mut oracle, &mut entropy, RealClock, args.scrub_cache);

    let threshold = if args.no_outlier_filter {
        None
    } else {
        args.threshold
    };
    let config = Config {
        sample_count: args.count,
        threshold,
        scrub_cache: args.scrub_cache,
        max_discard_ratio: None,
    };

    let mut dump = match &args.raw_dump {
        Some(path) => {
            let format = if args.raw_binary {
                raw_dump::Format::Binary
            } else {
                raw_dump::Format::Ascii
            };
            Some(raw_dump::RawDumpWriter::create(path, format)?)
        }
        None => None,
    };

    let table = run_recording(&mut sampler, &config, |plaintext, ticks| {
        if let Some(dump) = dump.as_mut() {
            if let Err(e) = dump.write_record(plaintext, ticks) {
                warn!("failed to write raw dump record: {e}");
            }
        }
    })?;
    if let Some(mut dump) = dump {
        dump.flush()?;
    }

    info!(
        total_runs = table.total_runs(),
        total_ticks = table.total_ticks(),
        "measurement complete"
    );

    let means = MeanVector::from_tally(&table);
    mean_file::write(&args.out, &means)?;

    if let Some(path) = &args.tally_dump {
        tally_dump::write(path, &table, &means)?;
    }

    Ok(())
}

fn correlate_cmd(args: CorrelateArgs) -> Result<()> {
    let mean_target = mean_file::read(&args.target)?;
    let mean_test = mean_file::read(&args.test)?;
    let test_key = key_file::read(&args.test_key)?;

    let matrix = correlate(&mean_target, &mean_test, &test_key);
    correlation_dump::write(&args.out, &matrix)?;
    Ok(())
}

fn aggregate_cmd(args: AggregateArgs) -> Result<()> {
    let mut aggregator = Aggregator::new();
    for path in &args.dumps {
        let matrix = correlation_dump::read(path)?;
        aggregator.add(&matrix);
    }

    let summed = aggregator
        .sum()
        .expect("clap requires at least one dump; aggregator always has a contribution");
    info!(contributions = aggregator.contributions(), "aggregation complete");
    correlation_dump::write(&args.out, summed)?;
    Ok(())
}

fn bruteforce_cmd(args: BruteforceArgs) -> Result<()> {
    let target_key = key_file::read(&args.target)?;
    let pools: [Pool; 16] = bf_file::read(&args.pools)?;

    let mut oracle = new_oracle();
    let reference = reference_ciphertext(&mut oracle, &target_key)?;

    let engine = BruteForceEngine::new(pools);
    info!(space_size = engine.space_size(), "starting brute-force search");

    let found = engine.search(&mut oracle, &reference)?;
    info!(key = %hex_key(found.as_bytes()), "brute-force search succeeded");
    println!("{}", hex_key(found.as_bytes()));
    Ok(())
}

fn run_cmd(args: RunArgs) -> Result<()> {
    let threshold = match args.threshold {
        Some(t) if t > 0.0 => {
            info!(threshold = t, "using operator-supplied threshold, skipping calibration");
            t.round() as u64
        }
        _ => {
            // Calibration measures a fresh random key, never the target key:
            // its own oracle, entropy, and sampler, independent of the ones
            // used for the actual measurement below.
            let mut calib_entropy = FastEntropy::new()?;
            let calib_key = calib_entropy.next_key();
            let mut calib_oracle = new_oracle();
            calib_oracle.expand(&calib_key)?;
            let mut calib_sampler =
                OracleSampler::new(&mut calib_oracle, &mut calib_entropy, RealClock, false);

            let calibration: Calibration =
                calibrate(&mut calib_sampler, aestime::config::DEFAULT_RUNS)?;
            info!(
                rate = calibration.rate_per_second,
                threshold = calibration.threshold,
                "calibration complete"
            );
            calibration.threshold
        }
    };

    let target_key = key_file::read(&args.key)?;
    let mut oracle = new_oracle();
    oracle.expand(&target_key)?;
    let mut entropy = FastEntropy::new()?;
    let mut sampler = OracleSampler::new(&mut oracle, &mut entropy, RealClock, false);

    let config = Config {
        sample_count: args.count,
        threshold: Some(threshold),
        ..Config::default()
    };
    let table = run_recording(&mut sampler, &config, |_, _| {})?;

    println!(
        "collected {} measurements, {} total ticks, grand mean {:.2}",
        table.total_runs(),
        table.total_ticks(),
        table.total_ticks() as f64 / table.total_runs() as f64
    );
    Ok(())
}

fn hex_key(key: &[u8; 16]) -> String {
    key.iter().map(|b| format!("{b:02x}")).collect()
}

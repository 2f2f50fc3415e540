//! Rate file format: two text lines, `<rate_float>\n<threshold_int>\n`.

use std::path::Path;

use crate::error::{Error, Result};
use crate::measurement::Calibration;

/// Write a [`Calibration`]'s rate and threshold to the rate file.
pub fn write(path: impl AsRef<Path>, calibration: &Calibration) -> Result<()> {
    let contents = format!(
        "{}\n{}\n",
        calibration.rate_per_second, calibration.threshold
    );
    std::fs::write(path, contents)?;
    Ok(())
}

/// Read a previously written rate file.
pub fn read(path: impl AsRef<Path>) -> Result<Calibration> {
    let contents = std::fs::read_to_string(path)?;
    let mut lines = contents.lines();

    let rate_per_second: f64 = lines
        .next()
        .ok_or_else(|| malformed("missing rate line"))?
        .trim()
        .parse()
        .map_err(|_| malformed("rate line is not a float"))?;

    let threshold: u64 = lines
        .next()
        .ok_or_else(|| malformed("missing threshold line"))?
        .trim()
        .parse()
        .map_err(|_| malformed("threshold line is not an integer"))?;

    Ok(Calibration {
        rate_per_second,
        threshold,
    })
}

fn malformed(detail: &str) -> Error {
    Error::MalformedFile {
        context: "rate file",
        detail: detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips() {
        let dir = std::env::temp_dir().join(format!("aestime-ratefile-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("rate.txt");

        let calibration = Calibration {
            rate_per_second: 1_234_567.5,
            threshold: 4200,
        };
        write(&path, &calibration).unwrap();
        let read_back = read(&path).unwrap();

        assert_eq!(read_back.threshold, calibration.threshold);
        assert!((read_back.rate_per_second - calibration.rate_per_second).abs() < 1e-6);
        std::fs::remove_dir_all(&dir).ok();
    }
}

//! `bf.dat` format: 16 repetitions of `(length_byte, length_byte candidate
//! bytes)`, one repetition per key position in order. `length_byte == 0`
//! denotes a full 256-candidate pool rather than an empty one (pools are
//! never empty).

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use crate::error::{Error, Result};
use crate::pool::Pool;

/// Read 16 per-position candidate pools from a `bf.dat`-formatted file.
pub fn read(path: impl AsRef<Path>) -> Result<[Pool; 16]> {
    let mut bytes = Vec::new();
    File::open(path)?.read_to_end(&mut bytes)?;

    let mut cursor = bytes.as_slice();
    let mut pools: Vec<Pool> = Vec::with_capacity(16);

    for position in 0..16 {
        let &length_byte = cursor.first().ok_or_else(|| malformed("ran out of bytes reading a pool length"))?;
        cursor = &cursor[1..];

        let length = if length_byte == 0 { 256 } else { length_byte as usize };
        if cursor.len() < length {
            return Err(malformed(&format!(
                "position {position} declared {length} candidates but only {} bytes remain",
                cursor.len()
            )));
        }

        let candidates = cursor[..length].to_vec();
        cursor = &cursor[length..];

        pools.push(Pool::new(position, candidates)?);
    }

    pools
        .try_into()
        .map_err(|_| malformed("expected exactly 16 pools"))
}

/// Write 16 per-position candidate pools to a `bf.dat`-formatted file.
pub fn write(path: impl AsRef<Path>, pools: &[Pool; 16]) -> Result<()> {
    let mut out = Vec::new();
    for pool in pools {
        let length_byte = if pool.len() == 256 { 0 } else { pool.len() as u8 };
        out.push(length_byte);
        for i in 0..pool.len() {
            out.push(pool.get(i));
        }
    }
    File::create(path)?.write_all(&out)?;
    Ok(())
}

fn malformed(detail: &str) -> Error {
    Error::MalformedFile {
        context: "bf.dat",
        detail: detail.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_mixed_length_pools() {
        let pools: [Pool; 16] = std::array::from_fn(|i| {
            if i == 0 {
                Pool::full() // length byte 0 => 256
            } else if i == 1 {
                Pool::new(1, vec![0x42]).unwrap() // length byte 1
            } else {
                Pool::new(i, vec![1, 2, 3]).unwrap()
            }
        });

        let path = std::env::temp_dir().join(format!("aestime-bfdat-test-{}", std::process::id()));
        write(&path, &pools).unwrap();
        let read_back = read(&path).unwrap();

        for i in 0..16 {
            assert_eq!(read_back[i].len(), pools[i].len(), "position {i}");
        }
        assert_eq!(read_back[1].get(0), 0x42);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn rejects_truncated_file() {
        let bytes = vec![5u8, 1, 2, 3]; // claims 5 candidates, only supplies 3
        let path = std::env::temp_dir().join(format!(
            "aestime-bfdat-truncated-test-{}",
            std::process::id()
        ));
        std::fs::write(&path, &bytes).unwrap();

        assert!(read(&path).is_err());
        std::fs::remove_file(&path).ok();
    }
}

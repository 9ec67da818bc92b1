// src/source/decode.rs

use anyhow::{Context, Result};
use std::{fs, path::Path};
use tracing::warn;

const BOM: char = '\u{feff}';

/// Decode bytes as UTF-8, silently dropping invalid sequences, and strip a
/// leading byte-order mark.
pub fn decode_lossy(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    let mut dropped = 0usize;
    for chunk in bytes.utf8_chunks() {
        out.push_str(chunk.valid());
        dropped += chunk.invalid().len();
    }
    if dropped > 0 {
        warn!(dropped_bytes = dropped, "dropped invalid UTF-8 while decoding");
    }
    match out.strip_prefix(BOM) {
        Some(rest) => rest.to_string(),
        None => out,
    }
}

/// Read a whole file with [`decode_lossy`]. A missing or unreadable file is
/// an error; bad encoding is not.
pub fn read_lossy<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    Ok(decode_lossy(&bytes))
}

/// Trim whitespace and strip stray BOMs from a header cell.
pub fn clean_header(raw: &str) -> String {
    raw.trim().trim_start_matches(BOM).trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn invalid_bytes_are_dropped() {
        let bytes = b"Caf\xe9 Clinic\xff\xfe, ok";
        assert_eq!(decode_lossy(bytes), "Caf Clinic, ok");
    }

    #[test]
    fn valid_multibyte_survives() {
        assert_eq!(decode_lossy("Peñasco".as_bytes()), "Peñasco");
    }

    #[test]
    fn bom_is_stripped() {
        let mut bytes = vec![0xef, 0xbb, 0xbf];
        bytes.extend_from_slice(b"name1,city");
        assert_eq!(decode_lossy(&bytes), "name1,city");
    }

    #[test]
    fn clean_header_trims() {
        assert_eq!(clean_header(" \u{feff}name1 "), "name1");
        assert_eq!(clean_header("DT\r"), "DT");
    }

    #[test]
    fn read_lossy_missing_file_fails() {
        let tmp = tempdir().unwrap();
        let err = read_lossy(tmp.path().join("absent.csv")).unwrap_err();
        assert!(err.to_string().contains("absent.csv"));
    }
}

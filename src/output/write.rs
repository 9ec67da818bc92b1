// src/output/write.rs

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::debug;

/// Write `contents` to `path` atomically: a hidden temp file next to the
/// target is written and flushed, then renamed over the target.
pub fn write_atomic<P: AsRef<Path>>(path: P, contents: &[u8]) -> Result<()> {
    let path = path.as_ref();
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow!("output path {:?} has no file name", path))?;
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).with_context(|| format!("creating directory {:?}", dir))?;

    let tmp_path = dir.join(format!(".{}.tmp", file_name));
    let result = (|| -> io::Result<()> {
        let mut tmp = fs::File::create(&tmp_path)?;
        tmp.write_all(contents)?;
        tmp.sync_all()?;
        fs::rename(&tmp_path, path)
    })();

    if let Err(e) = result {
        // leave no half-written temp file behind
        let _ = fs::remove_file(&tmp_path);
        return Err(e).with_context(|| format!("writing {:?}", path));
    }
    debug!(path = %path.display(), bytes = contents.len(), "wrote file");
    Ok(())
}

/// Pretty-printed JSON with a trailing newline, written atomically.
pub fn write_json<P: AsRef<Path>, T: Serialize>(path: P, value: &T) -> Result<()> {
    let mut buf = serde_json::to_vec_pretty(value).context("serializing JSON")?;
    buf.push(b'\n');
    write_atomic(path, &buf)
}

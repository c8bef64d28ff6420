//! Gzip archive merging.
//!
//! Every `.gz` file directly inside a folder is decompressed, in name order,
//! and appended byte for byte to a single output. No separator is inserted,
//! so archives of JSON Lines merge into one JSON Lines file.

use crate::domain::constants::{MERGED_FALLBACK_FILE, MERGE_BUFFER_SIZE};
use crate::domain::error::{HarnessError, HarnessResult, StreamError};
use crate::domain::models::MergeSummary;
use flate2::read::MultiGzDecoder;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

/// `<dir name>.json` beside the folder.
pub fn default_output_path(dir: &Path) -> PathBuf {
    match dir.file_name() {
        Some(name) => dir.with_file_name(format!("{}.json", name.to_string_lossy())),
        None => PathBuf::from(MERGED_FALLBACK_FILE),
    }
}

/// `.gz` files directly inside `dir`, sorted by name.
pub fn archives(dir: &Path) -> HarnessResult<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| HarnessError::io(dir, e))?;
    let mut found = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| HarnessError::io(dir, e))?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "gz") {
            found.push(path);
        }
    }
    found.sort();
    Ok(found)
}

/// Streams one decompressed archive into `out`. Multi-member archives are read to the end.
pub fn append_archive<R: Read, W: Write>(archive: R, out: &mut W) -> Result<u64, StreamError> {
    let mut decoder = MultiGzDecoder::new(archive);
    let mut buffer = [0u8; MERGE_BUFFER_SIZE];
    let mut copied = 0u64;
    loop {
        let n = decoder.read(&mut buffer).map_err(StreamError::Read)?;
        if n == 0 {
            return Ok(copied);
        }
        out.write_all(&buffer[..n]).map_err(StreamError::Write)?;
        copied += n as u64;
    }
}

/// Merges every archive in `dir` into `output`.
///
/// An archive that cannot be opened or decompressed is listed in `failed` and
/// skipped; whatever it yielded before the error stays in the output. A write
/// failure aborts the merge.
pub fn merge_archives(dir: &Path, output: &Path) -> HarnessResult<MergeSummary> {
    let inputs = archives(dir)?;
    if inputs.is_empty() {
        tracing::warn!(dir = %dir.display(), "no .gz archives found");
    }
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| HarnessError::io(parent, e))?;
    }
    let mut out =
        BufWriter::new(File::create(output).map_err(|e| HarnessError::io(output, e))?);

    let mut files = Vec::new();
    let mut failed = Vec::new();
    let mut bytes_written = 0u64;
    for path in inputs {
        let name = path.display().to_string();
        tracing::info!(archive = %name, "processing");
        let file = match File::open(&path) {
            Ok(f) => f,
            Err(err) => {
                tracing::warn!(archive = %name, %err, "failed to open, skipping");
                failed.push(name);
                continue;
            }
        };
        match append_archive(file, &mut out) {
            Ok(n) => {
                bytes_written += n;
                files.push(name);
            }
            Err(StreamError::Read(err)) => {
                tracing::warn!(archive = %name, %err, "failed to decompress, skipping");
                failed.push(name);
            }
            Err(write) => return Err(write.at(&path, output)),
        }
    }
    out.flush().map_err(|e| HarnessError::io(output, e))?;

    tracing::info!(
        output = %output.display(),
        archives = files.len(),
        bytes = bytes_written,
        "all archives merged"
    );
    Ok(MergeSummary {
        dir: dir.display().to_string(),
        output: output.display().to_string(),
        files,
        failed,
        bytes_written,
    })
}

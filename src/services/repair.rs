use crate::domain::error::{HarnessError, HarnessResult, StreamError};
use crate::domain::models::RepairSummary;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct RepairCounts {
    pub lines_read: usize,
    pub records_written: usize,
    pub decode_retries: usize,
    pub pending_bytes: usize,
}

/// Reassembles objects split across lines, writing one compact JSON value per line.
///
/// Lines are trimmed and accumulated until the buffer ends with `}` and decodes.
/// A failed decode means the object is still incomplete: a space is appended and
/// accumulation continues.
/// Numbers are kept as written, including integers wider than 64 bits and
/// exponents outside the `f64` range.
pub fn repair<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
) -> Result<RepairCounts, StreamError> {
    let mut counts = RepairCounts::default();
    let mut buffer = String::new();

    for line in reader.lines() {
        let line = line.map_err(StreamError::Read)?;
        counts.lines_read += 1;
        buffer.push_str(line.trim());
        if !buffer.ends_with('}') {
            continue;
        }
        match serde_json::from_str::<serde_json::Value>(&buffer) {
            Ok(value) => {
                serde_json::to_writer(&mut writer, &value)
                    .map_err(|e| StreamError::Write(e.into()))?;
                writer.write_all(b"\n").map_err(StreamError::Write)?;
                counts.records_written += 1;
                buffer.clear();
            }
            Err(err) => {
                tracing::trace!(line = counts.lines_read, %err, "object incomplete, reading on");
                counts.decode_retries += 1;
                buffer.push(' ');
            }
        }
    }

    counts.pending_bytes = buffer.trim().len();
    if counts.pending_bytes > 0 {
        tracing::warn!(
            bytes = counts.pending_bytes,
            "input ended inside an incomplete object; trailing bytes dropped"
        );
    }
    writer.flush().map_err(StreamError::Write)?;
    Ok(counts)
}

pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("jsonl")
}

pub fn repair_file(input: &Path, output: &Path) -> HarnessResult<RepairSummary> {
    if same_file(input, output) {
        return Err(HarnessError::SameFile(output.to_path_buf()));
    }
    let infile = File::open(input).map_err(|e| HarnessError::io(input, e))?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| HarnessError::io(parent, e))?;
    }
    let outfile = File::create(output).map_err(|e| HarnessError::io(output, e))?;

    let counts = repair(BufReader::new(infile), BufWriter::new(outfile))
        .map_err(|e| e.at(input, output))?;
    tracing::info!(
        input = %input.display(),
        output = %output.display(),
        records = counts.records_written,
        "saved clean JSONL"
    );

    Ok(RepairSummary {
        input: input.display().to_string(),
        output: output.display().to_string(),
        lines_read: counts.lines_read,
        records_written: counts.records_written,
        decode_retries: counts.decode_retries,
        pending_bytes: counts.pending_bytes,
    })
}

fn same_file(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(x), Ok(y)) => x == y,
        _ => false,
    }
}

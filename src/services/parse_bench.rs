//! CPU parse benchmark: serde_json vs simd-json vs sonic-rs.

use crate::cli::{InputFormat, ParserKind};
use crate::domain::error::{HarnessError, HarnessResult};
use crate::domain::models::{BenchSettings, ParseStats};
use crate::services::loader::records;
use std::hint::black_box;
use std::time::Instant;

/// Text to parse per run: the whole document, or every JSON Lines record.
pub struct BenchInput<'a> {
    pub units: Vec<&'a str>,
    pub bytes: usize,
}

impl<'a> BenchInput<'a> {
    pub fn new(text: &'a str, format: InputFormat) -> Self {
        let units = match format {
            InputFormat::Lines => records(text).map(|(_, r)| r).collect(),
            _ => vec![text],
        };
        Self {
            units,
            bytes: text.len(),
        }
    }
}

fn parse_units(kind: ParserKind, units: &[&str], scratch: &mut [Vec<u8>]) -> Result<(), String> {
    match kind {
        ParserKind::SerdeJson => {
            for unit in units {
                let v: serde_json::Value = serde_json::from_str(unit).map_err(|e| e.to_string())?;
                black_box(v);
            }
        }
        ParserKind::SimdJson => {
            for buf in scratch.iter_mut() {
                let v = simd_json::to_borrowed_value(buf).map_err(|e| e.to_string())?;
                black_box(v);
            }
        }
        ParserKind::SonicRs => {
            for unit in units {
                let v: sonic_rs::Value = sonic_rs::from_str(unit).map_err(|e| e.to_string())?;
                black_box(v);
            }
        }
    }
    Ok(())
}

/// simd-json parses in place, so each run gets fresh copies made outside the timed region.
fn refill(kind: ParserKind, units: &[&str], scratch: &mut Vec<Vec<u8>>) {
    if kind != ParserKind::SimdJson {
        return;
    }
    scratch.resize_with(units.len(), Vec::new);
    for (buf, unit) in scratch.iter_mut().zip(units) {
        buf.clear();
        buf.extend_from_slice(unit.as_bytes());
    }
}

pub fn bench_parser(
    kind: ParserKind,
    input: &BenchInput<'_>,
    settings: BenchSettings,
) -> HarnessResult<ParseStats> {
    if settings.iterations == 0 {
        return Err(HarnessError::NoIterations);
    }
    let fail = |message| HarnessError::Parse {
        parser: kind.label(),
        message,
    };
    let mut scratch = Vec::new();

    for _ in 0..settings.warmup {
        refill(kind, &input.units, &mut scratch);
        parse_units(kind, &input.units, &mut scratch).map_err(fail)?;
    }

    let mut times = Vec::with_capacity(settings.iterations);
    for _ in 0..settings.iterations {
        refill(kind, &input.units, &mut scratch);
        let start = Instant::now();
        parse_units(kind, &input.units, &mut scratch).map_err(fail)?;
        times.push(start.elapsed().as_secs_f64() * 1000.0);
    }

    let stats = summarize(kind, &times, input.bytes);
    tracing::info!(
        parser = kind.label(),
        min_ms = stats.min_ms,
        avg_ms = stats.avg_ms,
        "parse benchmark finished"
    );
    Ok(stats)
}

fn summarize(kind: ParserKind, times: &[f64], bytes: usize) -> ParseStats {
    let min_ms = times.iter().copied().fold(f64::INFINITY, f64::min);
    let max_ms = times.iter().copied().fold(0.0, f64::max);
    let avg_ms = times.iter().sum::<f64>() / times.len() as f64;
    let throughput_gbps = if min_ms > 0.0 {
        (bytes as f64 / 1e9) / (min_ms / 1000.0)
    } else {
        0.0
    };
    ParseStats {
        parser: kind,
        iterations: times.len(),
        min_ms,
        avg_ms,
        max_ms,
        throughput_gbps,
    }
}

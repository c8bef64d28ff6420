use crate::cli::{Cli, Commands, InputFormat, ParserKind, ScanKind};
use crate::domain::constants::DEFAULT_KEY_COLUMN;
use crate::domain::models::{BenchReport, BenchSettings, HarnessConfig, QueryReport, QueryRun};
use crate::services::loader::{load_document, read_input, sniff_format};
use crate::services::merge::merge_archives;
use crate::services::output::print_one;
use crate::services::parse_bench::{bench_parser, BenchInput};
use crate::services::queries::{
    find_query, queries_for_dataset, run_catalogue, run_pointers, scan, validate_pointer,
};
use crate::services::{merge, repair};
use crate::services::results::append_row;
use crate::services::storage::record_run;
use std::collections::BTreeMap;
use std::path::Path;

pub fn handle_data_commands(cli: &Cli, config: &HarnessConfig) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Repair { input, output } => {
            let output = output
                .clone()
                .unwrap_or_else(|| repair::default_output_path(input));
            let summary = repair::repair_file(input, &output)?;
            record_run(
                config,
                "repair",
                serde_json::json!({"input": summary.input, "records": summary.records_written}),
            );
            print_one(cli.json, summary, |s| {
                let mut lines = vec![format!(
                    "saved clean JSONL to {} ({} records from {} lines)",
                    s.output, s.records_written, s.lines_read
                )];
                if s.pending_bytes > 0 {
                    lines.push(format!(
                        "dropped {} trailing bytes of an incomplete object",
                        s.pending_bytes
                    ));
                }
                lines
            })?;
        }
        Commands::Merge { dir, output } => {
            let output = output
                .clone()
                .unwrap_or_else(|| merge::default_output_path(dir));
            let summary = merge_archives(dir, &output)?;
            record_run(
                config,
                "merge",
                serde_json::json!({"dir": summary.dir, "archives": summary.files.len()}),
            );
            print_one(cli.json, summary, |s| {
                let mut lines = vec![format!(
                    "merged {} archives into {} ({} bytes)",
                    s.files.len(),
                    s.output,
                    s.bytes_written
                )];
                lines.extend(s.failed.iter().map(|f| format!("failed to decompress {}", f)));
                lines
            })?;
        }
        Commands::Query {
            input,
            queries,
            dataset,
            pointers,
            scans,
            format,
        } => {
            let selection = Selection {
                ids: queries,
                dataset: dataset.as_deref(),
                pointers,
                scans,
            };
            let run = run_queries(input, &selection, *format)?;
            record_run(
                config,
                "query",
                serde_json::json!({
                    "input": run.document.path,
                    "queries": run.queries.iter().map(|q| q.id).collect::<Vec<_>>(),
                    "scans": run.scans.iter().map(|s| s.scan).collect::<Vec<_>>(),
                }),
            );
            print_one(cli.json, run, query_lines)?;
        }
        Commands::Bench {
            input,
            parsers,
            iterations,
            warmup,
            format,
            csv,
            dataset,
        } => {
            let settings = BenchSettings {
                warmup: warmup.unwrap_or(config.bench.warmup),
                iterations: iterations.unwrap_or(config.bench.iterations),
            };
            let parsers = if parsers.is_empty() {
                ParserKind::ALL.to_vec()
            } else {
                parsers.clone()
            };
            let text = read_input(input)?;
            let format = sniff_format(input, &text, *format);
            let bench_input = BenchInput::new(&text, format);

            let mut results = Vec::new();
            for kind in &parsers {
                results.push(bench_parser(*kind, &bench_input, settings)?);
            }

            let csv_written = match (csv, dataset) {
                (Some(path), Some(label)) => {
                    let mut header = vec![DEFAULT_KEY_COLUMN.to_string()];
                    header.extend(results.iter().map(|r| r.parser.label().to_string()));
                    let mut row = vec![label.clone()];
                    row.extend(results.iter().map(|r| format!("{:.3}", r.avg_ms)));
                    append_row(path, &header, &row)?;
                    Some(path.display().to_string())
                }
                _ => None,
            };

            let report = BenchReport {
                path: input.display().to_string(),
                format,
                bytes: text.len(),
                warmup: settings.warmup,
                results,
                csv: csv_written,
            };
            let avg_ms: BTreeMap<_, _> = report
                .results
                .iter()
                .map(|r| (r.parser.label(), r.avg_ms))
                .collect();
            record_run(
                config,
                "bench",
                serde_json::json!({"input": report.path, "avg_ms": avg_ms}),
            );
            print_one(cli.json, report, bench_lines)?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}

/// What one `query` invocation asked for.
struct Selection<'a> {
    ids: &'a [u8],
    dataset: Option<&'a str>,
    pointers: &'a [String],
    scans: &'a [ScanKind],
}

impl Selection<'_> {
    fn is_empty(&self) -> bool {
        self.ids.is_empty()
            && self.dataset.is_none()
            && self.pointers.is_empty()
            && self.scans.is_empty()
    }
}

fn run_queries(
    input: &Path,
    selection: &Selection,
    format: InputFormat,
) -> anyhow::Result<QueryRun> {
    if selection.is_empty() {
        anyhow::bail!("nothing to run: pass --query, --dataset, --pointer or --scan");
    }
    let mut defs = selection
        .ids
        .iter()
        .map(|id| find_query(*id))
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(name) = selection.dataset {
        let registered = queries_for_dataset(name);
        if registered.is_empty() {
            anyhow::bail!("no catalogue queries registered for dataset '{}'", name);
        }
        defs.extend(registered);
    }
    for p in selection.pointers {
        validate_pointer(p)?;
    }

    let doc = load_document(input, format)?;
    let mut queries: Vec<QueryReport> = defs.iter().map(|d| run_catalogue(&doc.root, d)).collect();
    if !selection.pointers.is_empty() {
        queries.push(run_pointers(&doc.root, selection.pointers)?);
    }
    let scans = selection
        .scans
        .iter()
        .map(|kind| scan(&doc.root, *kind))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(QueryRun {
        document: doc.report,
        queries,
        scans,
    })
}

fn format_label(format: InputFormat) -> &'static str {
    match format {
        InputFormat::Auto => "auto",
        InputFormat::Standard => "standard",
        InputFormat::Lines => "lines",
    }
}

fn query_lines(run: &QueryRun) -> Vec<String> {
    let d = &run.document;
    let mut lines = vec![
        format!(
            "{}: {} JSON, {} records, {} bytes",
            d.path,
            format_label(d.format),
            d.records,
            d.bytes
        ),
        format!("document size: {:.2} MB", d.approx_memory_mb),
        format!("time taken to parse: {:.2} ms", d.parse_ms),
    ];
    for q in &run.queries {
        let name = q
            .id
            .map(|id| format!("Q{}", id))
            .unwrap_or_else(|| "pointer".to_string());
        let values: Vec<String> = q
            .hits
            .iter()
            .map(|h| match &h.value {
                Some(v) => format!("{}={}", h.pointer, v),
                None => format!("{}=<missing>", h.pointer),
            })
            .collect();
        lines.push(format!("{}\t{} ns\t{}", name, q.elapsed_ns, values.join("\t")));
    }
    for s in &run.scans {
        lines.push(format!(
            "{}\t{} ns\tmatched {} of {} records",
            s.scan.label(),
            s.elapsed_ns,
            s.matched,
            s.scanned
        ));
    }
    lines
}

fn bench_lines(report: &BenchReport) -> Vec<String> {
    let mut lines = vec![format!(
        "{}: {} bytes ({:.1} KB), {} JSON, warmup {}",
        report.path,
        report.bytes,
        report.bytes as f64 / 1024.0,
        format_label(report.format),
        report.warmup
    )];
    for r in &report.results {
        lines.push(format!(
            "{}\titerations={}\tmin={:.3} ms\tavg={:.3} ms\tmax={:.3} ms\t{:.3} GB/s",
            r.parser.label(),
            r.iterations,
            r.min_ms,
            r.avg_ms,
            r.max_ms,
            r.throughput_gbps
        ));
    }
    if let Some(csv) = &report.csv {
        lines.push(format!("appended averages to {}", csv));
    }
    lines
}

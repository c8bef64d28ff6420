use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_FILE: &str = "cujson-bench.toml";

#[derive(Parser, Debug)]
#[command(
    name = "cujson-bench",
    version,
    about = "Benchmark harness for GPU JSON parsing: JSONL repair, result figures, timed queries"
)]
pub struct Cli {
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        help = "Harness config file (defaults to ./cujson-bench.toml when present)"
    )]
    pub config: Option<PathBuf>,
    #[arg(
        short,
        long,
        global = true,
        action = ArgAction::Count,
        help = "Increase log verbosity (-v info, -vv debug); RUST_LOG takes precedence"
    )]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Reassemble multi-line JSON objects into JSON Lines.
    Repair {
        input: PathBuf,
        #[arg(short, long, help = "Output file (defaults to <input stem>.jsonl)")]
        output: Option<PathBuf>,
    },
    /// Decompress every `.gz` archive in a folder into one file.
    Merge {
        dir: PathBuf,
        #[arg(short, long, help = "Output file (defaults to <dir name>.json beside the folder)")]
        output: Option<PathBuf>,
    },
    /// List the figure catalogue.
    Figures,
    /// Render result CSVs into charts.
    Plot {
        figures: Vec<String>,
        #[arg(long, default_value_t = false, conflicts_with = "figures")]
        all: bool,
        #[arg(long, help = "Override the input CSV (single figure only)")]
        csv: Option<PathBuf>,
        #[arg(long, help = "Override the output SVG (single figure only)")]
        out: Option<PathBuf>,
    },
    /// Load a JSON dataset and time field-extraction queries against it.
    Query {
        input: PathBuf,
        #[arg(long = "query", value_name = "ID")]
        queries: Vec<u8>,
        #[arg(long, help = "Run every catalogue query registered for this dataset")]
        dataset: Option<String>,
        #[arg(long = "pointer", value_name = "PTR")]
        pointers: Vec<String>,
        #[arg(long = "scan", value_enum, help = "Count matching records in one timed pass")]
        scans: Vec<ScanKind>,
        #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
        format: InputFormat,
    },
    /// Time whole-document parsing with the available CPU parsers.
    Bench {
        input: PathBuf,
        #[arg(long = "parser", value_enum)]
        parsers: Vec<ParserKind>,
        #[arg(long)]
        iterations: Option<usize>,
        #[arg(long)]
        warmup: Option<usize>,
        #[arg(long, value_enum, default_value_t = InputFormat::Auto)]
        format: InputFormat,
        #[arg(long, requires = "dataset", help = "Append average times to this results CSV")]
        csv: Option<PathBuf>,
        #[arg(long, help = "Row label written to --csv")]
        dataset: Option<String>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Auto,
    Standard,
    Lines,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum ParserKind {
    #[serde(rename = "serde_json")]
    #[value(name = "serde_json")]
    SerdeJson,
    #[serde(rename = "simd-json")]
    #[value(name = "simd-json")]
    SimdJson,
    #[serde(rename = "sonic-rs")]
    #[value(name = "sonic-rs")]
    SonicRs,
}

impl ParserKind {
    pub const ALL: [ParserKind; 3] = [
        ParserKind::SerdeJson,
        ParserKind::SimdJson,
        ParserKind::SonicRs,
    ];

    pub fn label(self) -> &'static str {
        match self {
            ParserKind::SerdeJson => "serde_json",
            ParserKind::SimdJson => "simd-json",
            ParserKind::SonicRs => "sonic-rs",
        }
    }
}

/// Whole-document record counts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum ScanKind {
    /// Records carrying an `id` field.
    Ids,
    /// `PushEvent` records whose `repo.name` is a string.
    PushRepos,
}

impl ScanKind {
    pub fn label(self) -> &'static str {
        match self {
            ScanKind::Ids => "ids",
            ScanKind::PushRepos => "push-repos",
        }
    }
}

use crate::cli::{InputFormat, ParserKind, ScanKind};
use crate::domain::constants::{
    DEFAULT_BENCH_ITERATIONS, DEFAULT_FIGURES_DIR, DEFAULT_KEY_COLUMN, DEFAULT_RESULTS_DIR,
    DEFAULT_WARMUP_RUNS,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn default_results_dir() -> PathBuf {
    PathBuf::from(DEFAULT_RESULTS_DIR)
}

fn default_figures_dir() -> PathBuf {
    PathBuf::from(DEFAULT_FIGURES_DIR)
}

fn default_key_column() -> String {
    DEFAULT_KEY_COLUMN.to_string()
}

fn default_warmup() -> usize {
    DEFAULT_WARMUP_RUNS
}

fn default_iterations() -> usize {
    DEFAULT_BENCH_ITERATIONS
}

#[derive(Serialize)]
pub struct JsonOut<T: Serialize> {
    pub ok: bool,
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct HarnessConfig {
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
    #[serde(default = "default_figures_dir")]
    pub figures_dir: PathBuf,
    /// Append one event per command to `<results_dir>/runs.jsonl`.
    #[serde(default)]
    pub record_runs: bool,
    #[serde(default)]
    pub bench: BenchSettings,
    #[serde(default)]
    pub figures: Vec<FigureSpec>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            results_dir: default_results_dir(),
            figures_dir: default_figures_dir(),
            record_runs: false,
            bench: BenchSettings::default(),
            figures: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy)]
pub struct BenchSettings {
    #[serde(default = "default_warmup")]
    pub warmup: usize,
    #[serde(default = "default_iterations")]
    pub iterations: usize,
}

impl Default for BenchSettings {
    fn default() -> Self {
        Self {
            warmup: default_warmup(),
            iterations: default_iterations(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RepairSummary {
    pub input: String,
    pub output: String,
    pub lines_read: usize,
    pub records_written: usize,
    pub decode_retries: usize,
    /// Bytes of trailing input that never formed a complete object.
    pub pending_bytes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FigureKind {
    GroupedBar,
    StackedBar,
    Scaling,
}

impl FigureKind {
    pub fn label(self) -> &'static str {
        match self {
            FigureKind::GroupedBar => "grouped-bar",
            FigureKind::StackedBar => "stacked-bar",
            FigureKind::Scaling => "scaling",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FigureSpec {
    pub id: String,
    pub kind: FigureKind,
    pub title: String,
    #[serde(default)]
    pub x_label: Option<String>,
    pub y_label: String,
    #[serde(default = "default_key_column")]
    pub key_column: String,
    /// Empty selects every non-key column in file order.
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default)]
    pub csv: Option<PathBuf>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub bar_width: Option<f64>,
    #[serde(default)]
    pub annotate: bool,
    #[serde(default = "default_true")]
    pub grid: bool,
    #[serde(default)]
    pub uppercase_labels: bool,
    #[serde(default)]
    pub legend_title: Option<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize)]
pub struct FigureRow {
    pub id: String,
    pub kind: String,
    pub title: String,
    pub csv: String,
    pub output: String,
}

#[derive(Debug, Serialize)]
pub struct PlotReport {
    pub id: String,
    pub status: String,
    pub csv: String,
    pub output: String,
    pub rows: usize,
    pub series: usize,
}

#[derive(Debug, Serialize)]
pub struct LoadReport {
    pub path: String,
    pub format: InputFormat,
    pub bytes: usize,
    pub records: usize,
    pub parse_ms: f64,
    pub approx_memory_mb: f64,
}

#[derive(Debug, Serialize)]
pub struct QueryHit {
    pub pointer: String,
    pub found: bool,
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Serialize)]
pub struct QueryReport {
    /// `None` for ad-hoc pointer queries.
    pub id: Option<u8>,
    pub dataset: Option<String>,
    pub elapsed_ns: u64,
    pub hits: Vec<QueryHit>,
}

#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub scan: ScanKind,
    pub scanned: usize,
    pub matched: usize,
    pub elapsed_ns: u64,
}

#[derive(Debug, Serialize)]
pub struct QueryRun {
    pub document: LoadReport,
    pub queries: Vec<QueryReport>,
    pub scans: Vec<ScanReport>,
}

#[derive(Debug, Serialize)]
pub struct MergeSummary {
    pub dir: String,
    pub output: String,
    /// Archives appended, in name order.
    pub files: Vec<String>,
    /// Archives skipped after a decompression error.
    pub failed: Vec<String>,
    pub bytes_written: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParseStats {
    pub parser: ParserKind,
    pub iterations: usize,
    pub min_ms: f64,
    pub avg_ms: f64,
    pub max_ms: f64,
    pub throughput_gbps: f64,
}

#[derive(Debug, Serialize)]
pub struct BenchReport {
    pub path: String,
    pub format: InputFormat,
    pub bytes: usize,
    pub warmup: usize,
    pub results: Vec<ParseStats>,
    pub csv: Option<String>,
}

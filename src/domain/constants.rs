pub const DEFAULT_RESULTS_DIR: &str = "results";
pub const DEFAULT_FIGURES_DIR: &str = "figures";
pub const RUN_LOG_FILE: &str = "runs.jsonl";

pub const DEFAULT_KEY_COLUMN: &str = "Dataset";
pub const DEFAULT_FIGURE_WIDTH: u32 = 1000;
pub const DEFAULT_FIGURE_HEIGHT: u32 = 600;
pub const DEFAULT_BAR_WIDTH: f64 = 0.2;

pub const DEFAULT_WARMUP_RUNS: usize = 3;
pub const DEFAULT_BENCH_ITERATIONS: usize = 10;

pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

pub const MERGE_BUFFER_SIZE: usize = 8192;
pub const MERGED_FALLBACK_FILE: &str = "merged_records.json";

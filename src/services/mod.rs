//! Service layer containing business logic and side-effect helpers.
//!
//! ## Service map
//! - `repair.rs` — multi-line JSON to JSON Lines reassembly.
//! - `merge.rs` — gzip archive folder merging.
//! - `results.rs` — result-table CSV loading and row appends.
//! - `figures.rs` — figure catalogue (built-ins + config) and default paths.
//! - `render.rs` — SVG chart rendering with plotters.
//! - `loader.rs` — standard JSON / JSON Lines document loading.
//! - `queries.rs` — query catalogue, timed pointer look-ups and record scans.
//! - `parse_bench.rs` — CPU parser timing.
//! - `config.rs` — harness TOML config.
//! - `storage.rs` — optional run log.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Return `HarnessError` from services; keep `anyhow` in command handlers.

pub mod config;
pub mod figures;
pub mod loader;
pub mod merge;
pub mod output;
pub mod parse_bench;
pub mod queries;
pub mod render;
pub mod repair;
pub mod results;
pub mod storage;

//! Command handler layer.
//!
//! This module owns CLI-oriented orchestration and output wiring.
//!
//! ## Files
//! - `data.rs` — repair/query/bench.
//! - `plots.rs` — figures/plot.
//!
//! ## Principles
//! - Parse/match CLI inputs here.
//! - Delegate business logic to `services/*`.
//! - Keep behavior and output schema stable.

pub mod data;
pub mod plots;

pub use data::handle_data_commands;
pub use plots::handle_plot_commands;

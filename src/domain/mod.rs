//! Shared data model layer (structs/constants only).
//!
//! ## Purpose
//! - Keep report/spec structs in one place.
//! - Avoid cyclic imports and duplicated type definitions.
//! - Make JSON output schema changes explicit and reviewable.
//!
//! ## Files
//! - `models.rs` — reports, figure specs, config structs.
//! - `constants.rs` — default paths, bench defaults, built-in figure parameters.
//! - `error.rs` — `HarnessError`, the service-level error type.
//!
//! ## Rule of thumb
//! Domain types should be data-only: no filesystem side effects.
//!
//! ## Compatibility note
//! Changes in these structs can affect `--json` outputs and integration contracts.
//! Keep schema-impacting changes explicit and synchronized with `docs/contracts/*`.

pub mod constants;
pub mod error;
pub mod models;

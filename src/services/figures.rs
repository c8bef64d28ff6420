//! Figure catalogue: the built-in paper figures plus config-defined ones.

use crate::domain::constants::{
    DEFAULT_BAR_WIDTH, DEFAULT_FIGURE_HEIGHT, DEFAULT_FIGURE_WIDTH, DEFAULT_KEY_COLUMN,
};
use crate::domain::error::{HarnessError, HarnessResult};
use crate::domain::models::{FigureKind, FigureRow, FigureSpec, HarnessConfig};
use std::path::PathBuf;

fn bar_figure(id: &str, title: &str, y_label: &str, columns: &[&str]) -> FigureSpec {
    FigureSpec {
        id: id.to_string(),
        kind: FigureKind::GroupedBar,
        title: title.to_string(),
        x_label: None,
        y_label: y_label.to_string(),
        key_column: DEFAULT_KEY_COLUMN.to_string(),
        columns: columns.iter().map(|c| c.to_string()).collect(),
        csv: None,
        output: None,
        width: None,
        height: None,
        bar_width: None,
        annotate: false,
        grid: true,
        uppercase_labels: false,
        legend_title: None,
    }
}

pub fn builtin_figures() -> Vec<FigureSpec> {
    let fig9 = bar_figure(
        "fig9",
        "Figure 9: End-to-End Parsing Time",
        "Parsing Time (ms)",
        &["cuJSON", "simdjson", "RapidJSON", "Pison"],
    );
    let fig11 = bar_figure(
        "fig11",
        "Figure 11: End-to-End Parsing Time",
        "Parsing Time (ms)",
        &["cuJSON", "cuDF", "GPJSON"],
    );
    let fig12 = bar_figure(
        "fig12",
        "Figure 12: Peak Memory Usage",
        "Peak Memory (MB)",
        &["cuJSON", "cuDF", "GPJSON"],
    );
    let fig13 = FigureSpec {
        kind: FigureKind::StackedBar,
        x_label: Some("Dataset".to_string()),
        bar_width: Some(0.8),
        grid: false,
        legend_title: Some("Steps".to_string()),
        ..bar_figure(
            "fig13",
            "Figure 13: Time Breakdown for Each Dataset",
            "Time (ms)",
            &["h2d", "validation", "tokenization", "parsing", "d2h"],
        )
    };
    let fig14 = FigureSpec {
        width: Some(1200),
        bar_width: Some(0.15),
        ..bar_figure(
            "fig14",
            "Figure 14: Output Memory Usage",
            "Output Memory Usage (MB)",
            &["cuJSON", "cuDF", "simdjson", "pison", "rapidjson"],
        )
    };
    let fig15 = FigureSpec {
        key_column: "Method".to_string(),
        annotate: true,
        grid: false,
        ..bar_figure(
            "fig15",
            "Figure 15: Single Query Return Time",
            "Time (ns)",
            &["cuJSON", "simdjson", "pison", "rapidjson"],
        )
    };
    let fig16 = FigureSpec {
        kind: FigureKind::Scaling,
        x_label: Some("JSON Data Size (MB)".to_string()),
        uppercase_labels: true,
        ..bar_figure(
            "fig16",
            "Figure 16. Scalability of cuJSON (Standard JSON, Server)",
            "Parsing Time (ms)",
            &[],
        )
    };
    vec![fig9, fig11, fig12, fig13, fig14, fig15, fig16]
}

/// Built-ins first; a config entry replaces the built-in with the same id or is appended.
pub fn catalogue(config: &HarnessConfig) -> Vec<FigureSpec> {
    let mut figures = builtin_figures();
    for custom in &config.figures {
        match figures.iter_mut().find(|f| f.id == custom.id) {
            Some(existing) => *existing = custom.clone(),
            None => figures.push(custom.clone()),
        }
    }
    figures
}

pub fn find_figure(config: &HarnessConfig, id: &str) -> HarnessResult<FigureSpec> {
    catalogue(config)
        .into_iter()
        .find(|f| f.id == id)
        .ok_or_else(|| HarnessError::UnknownFigure(id.to_string()))
}

pub fn csv_path(spec: &FigureSpec, config: &HarnessConfig) -> PathBuf {
    spec.csv
        .clone()
        .unwrap_or_else(|| config.results_dir.join(format!("{}_data.csv", spec.id)))
}

pub fn output_path(spec: &FigureSpec, config: &HarnessConfig) -> PathBuf {
    spec.output
        .clone()
        .unwrap_or_else(|| config.figures_dir.join(format!("{}.svg", spec.id)))
}

pub fn size(spec: &FigureSpec) -> (u32, u32) {
    (
        spec.width.unwrap_or(DEFAULT_FIGURE_WIDTH),
        spec.height.unwrap_or(DEFAULT_FIGURE_HEIGHT),
    )
}

pub fn bar_width(spec: &FigureSpec) -> f64 {
    spec.bar_width.unwrap_or(DEFAULT_BAR_WIDTH)
}

pub fn figure_rows(config: &HarnessConfig) -> Vec<FigureRow> {
    catalogue(config)
        .iter()
        .map(|f| FigureRow {
            id: f.id.clone(),
            kind: f.kind.label().to_string(),
            title: f.title.clone(),
            csv: csv_path(f, config).display().to_string(),
            output: output_path(f, config).display().to_string(),
        })
        .collect()
}

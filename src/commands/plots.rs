use crate::cli::{Cli, Commands};
use crate::domain::models::{FigureSpec, HarnessConfig, PlotReport};
use crate::services::figures::{catalogue, csv_path, figure_rows, find_figure, output_path};
use crate::services::output::print_out;
use crate::services::render::render;
use crate::services::results::load_table;
use crate::services::storage::record_run;
use std::path::PathBuf;

pub fn handle_plot_commands(cli: &Cli, config: &HarnessConfig) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Figures => {
            let rows = figure_rows(config);
            print_out(cli.json, &rows, |f| {
                format!("{}\t{}\t{}\t{} -> {}", f.id, f.kind, f.title, f.csv, f.output)
            })?;
        }
        Commands::Plot {
            figures,
            all,
            csv,
            out,
        } => {
            if !*all && figures.is_empty() {
                anyhow::bail!("no figure selected: pass figure ids or --all");
            }
            let single = !*all && figures.len() == 1;
            if !single && (csv.is_some() || out.is_some()) {
                anyhow::bail!("--csv and --out apply to a single figure only");
            }

            let specs = if *all {
                catalogue(config)
            } else {
                figures
                    .iter()
                    .map(|id| find_figure(config, id))
                    .collect::<Result<Vec<_>, _>>()?
            };

            let mut reports = Vec::with_capacity(specs.len());
            for spec in &specs {
                let csv = csv.clone().unwrap_or_else(|| csv_path(spec, config));
                let output = out.clone().unwrap_or_else(|| output_path(spec, config));
                reports.push(plot_one(spec, csv, output, *all)?);
            }
            let statuses: Vec<(&str, &str)> = reports
                .iter()
                .map(|r| (r.id.as_str(), r.status.as_str()))
                .collect();
            record_run(config, "plot", serde_json::json!({ "figures": statuses }));
            print_out(cli.json, &reports, |r| match r.status.as_str() {
                "skipped" => format!("{}\tskipped (missing {})", r.id, r.csv),
                _ => format!(
                    "{}\tsaved {} ({} rows, {} series)",
                    r.id, r.output, r.rows, r.series
                ),
            })?;
        }
        _ => return Ok(false),
    }
    Ok(true)
}

fn plot_one(
    spec: &FigureSpec,
    csv: PathBuf,
    output: PathBuf,
    skip_missing: bool,
) -> anyhow::Result<PlotReport> {
    if skip_missing && !csv.exists() {
        tracing::warn!(figure = %spec.id, csv = %csv.display(), "results CSV missing, skipping");
        return Ok(PlotReport {
            id: spec.id.clone(),
            status: "skipped".to_string(),
            csv: csv.display().to_string(),
            output: output.display().to_string(),
            rows: 0,
            series: 0,
        });
    }
    let table = load_table(&csv, &spec.key_column)?;
    let series = render(spec, &table, &output)?;
    Ok(PlotReport {
        id: spec.id.clone(),
        status: "saved".to_string(),
        csv: csv.display().to_string(),
        output: output.display().to_string(),
        rows: table.rows(),
        series,
    })
}

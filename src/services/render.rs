use crate::domain::error::{HarnessError, HarnessResult};
use crate::domain::models::{FigureKind, FigureSpec};
use crate::services::figures::{bar_width, size};
use crate::services::results::{Column, ResultTable};
use plotters::coord::combinators::WithKeyPoints;
use plotters::coord::ranged1d::{KeyPointHint, NoDefaultFormatting, ValueFormatter};
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle};
use std::error::Error;
use std::path::Path;

type DrawResult = Result<(), Box<dyn Error>>;

const CAPTION_FONT: (&str, u32) = ("sans-serif", 24);
const LABEL_FONT_SIZE: f64 = 12.0;

/// Renders `table` as `spec` describes into an SVG at `output`; returns the series count.
pub fn render(spec: &FigureSpec, table: &ResultTable, output: &Path) -> HarnessResult<usize> {
    let columns = table.select(&spec.columns)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| HarnessError::io(parent, e))?;
    }

    let (drawn, series) = match spec.kind {
        FigureKind::GroupedBar => (
            draw_grouped(spec, &table.labels, &columns, output),
            columns.len(),
        ),
        FigureKind::StackedBar => (
            draw_stacked(spec, &table.labels, &columns, output),
            columns.len(),
        ),
        FigureKind::Scaling => {
            let sizes = table.numeric_headers(&spec.columns)?;
            (
                draw_scaling(spec, &table.labels, &sizes, &columns, output),
                table.rows(),
            )
        }
    };
    drawn.map_err(|e| HarnessError::Render {
        path: output.to_path_buf(),
        message: e.to_string(),
    })?;
    tracing::info!(figure = %spec.id, output = %output.display(), "figure saved");
    Ok(series)
}

fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

fn headroom(max: f64) -> f64 {
    if max > 0.0 {
        max * 1.1
    } else {
        1.0
    }
}

/// Category label for an integer x position; blank between categories.
fn label_at(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

fn series_color(idx: usize) -> RGBAColor {
    Palette99::pick(idx).to_rgba()
}

/// `WithKeyPoints<RangedCoordf64>` delegated as-is; plotters gives it no `ValueFormatter<f64>`.
struct KeyedAxis(WithKeyPoints<RangedCoordf64>);

impl Ranged for KeyedAxis {
    type FormatOption = NoDefaultFormatting;
    type ValueType = f64;

    fn map(&self, value: &f64, limit: (i32, i32)) -> i32 {
        self.0.map(value, limit)
    }

    fn key_points<Hint: KeyPointHint>(&self, hint: Hint) -> Vec<f64> {
        self.0.key_points(hint)
    }

    fn range(&self) -> std::ops::Range<f64> {
        self.0.range()
    }

    fn axis_pixel_range(&self, limit: (i32, i32)) -> std::ops::Range<i32> {
        self.0.axis_pixel_range(limit)
    }
}

impl ValueFormatter<f64> for KeyedAxis {
    fn format(value: &f64) -> String {
        RangedCoordf64::format(value)
    }
}

type CategoryChart<'a, 'b> =
    ChartContext<'a, SVGBackend<'b>, Cartesian2d<KeyedAxis, RangedCoordf64>>;

/// Bar chart frame: a tick per row label, mesh drawn, legend title registered.
fn category_chart<'a, 'b>(
    root: &'a DrawingArea<SVGBackend<'b>, Shift>,
    spec: &FigureSpec,
    labels: &[String],
    y_top: f64,
    x_label_area: u32,
) -> Result<CategoryChart<'a, 'b>, Box<dyn Error>> {
    let ticks: Vec<f64> = (0..labels.len()).map(|i| i as f64).collect();
    let mut chart = ChartBuilder::on(root)
        .caption(&spec.title, CAPTION_FONT)
        .margin(15)
        .x_label_area_size(x_label_area)
        .y_label_area_size(70)
        .build_cartesian_2d(
            KeyedAxis((-0.5f64..(labels.len() as f64 - 0.5)).with_key_points(ticks)),
            0f64..y_top,
        )?;

    let formatter = |x: &f64| label_at(labels, *x);
    let mut mesh = chart.configure_mesh();
    mesh.disable_x_mesh()
        .x_label_formatter(&formatter)
        .y_desc(spec.y_label.as_str());
    if let Some(x_label) = &spec.x_label {
        mesh.x_desc(x_label.as_str());
    }
    if !spec.grid {
        mesh.disable_y_mesh();
    }
    mesh.draw()?;

    if let Some(title) = &spec.legend_title {
        chart
            .draw_series(std::iter::empty::<Rectangle<(f64, f64)>>())?
            .label(title.clone());
    }
    Ok(chart)
}

fn legend_box(color: RGBAColor) -> impl Fn((i32, i32)) -> Rectangle<(i32, i32)> {
    move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
}

fn draw_grouped(
    spec: &FigureSpec,
    labels: &[String],
    columns: &[&Column],
    output: &Path,
) -> DrawResult {
    let width = bar_width(spec);
    let y_max = columns
        .iter()
        .flat_map(|c| c.values.iter().copied().filter_map(finite))
        .fold(0.0, f64::max);
    let y_top = headroom(y_max);

    let root = SVGBackend::new(output, size(spec)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = category_chart(&root, spec, labels, y_top, 40)?;

    let count = columns.len() as f64;
    let label_style = TextStyle::from(FontDesc::new(
        FontFamily::SansSerif,
        LABEL_FONT_SIZE,
        FontStyle::Normal,
    ))
    .pos(Pos::new(HPos::Center, VPos::Bottom));
    for (k, column) in columns.iter().enumerate() {
        let color = series_color(k);
        let offset = (k as f64 - (count - 1.0) / 2.0) * width;
        let points: Vec<(f64, f64)> = column
            .values
            .iter()
            .enumerate()
            .filter_map(|(i, v)| finite(*v).map(|v| (i as f64 + offset, v)))
            .collect();

        chart
            .draw_series(points.iter().map(|&(x, v)| {
                Rectangle::new([(x - width / 2.0, 0.0), (x + width / 2.0, v)], color.filled())
            }))?
            .label(column.name.clone())
            .legend(legend_box(color));

        if spec.annotate {
            chart.draw_series(points.iter().map(|&(x, v)| {
                Text::new(format!("{v:.2}"), (x, v + y_top * 0.01), label_style.clone())
            }))?;
        }
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;
    root.present()?;
    Ok(())
}

fn draw_stacked(
    spec: &FigureSpec,
    labels: &[String],
    columns: &[&Column],
    output: &Path,
) -> DrawResult {
    let width = bar_width(spec);
    let totals: Vec<f64> = (0..labels.len())
        .map(|i| {
            columns
                .iter()
                .filter_map(|c| c.values.get(i).copied().and_then(finite))
                .sum()
        })
        .collect();
    let y_top = headroom(totals.iter().copied().fold(0.0, f64::max));

    let root = SVGBackend::new(output, size(spec)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = category_chart(&root, spec, labels, y_top, 50)?;

    // a missing cell draws nothing and leaves the base where it was
    let mut bottoms = vec![0.0f64; labels.len()];
    for (k, column) in columns.iter().enumerate() {
        let color = series_color(k);
        let mut segments = Vec::new();
        for (i, v) in column.values.iter().enumerate() {
            let (Some(v), Some(bottom)) = (finite(*v), bottoms.get_mut(i)) else {
                continue;
            };
            let x = i as f64;
            segments.push(Rectangle::new(
                [(x - width / 2.0, *bottom), (x + width / 2.0, *bottom + v)],
                color.filled(),
            ));
            *bottom += v;
        }
        chart
            .draw_series(segments)?
            .label(column.name.clone())
            .legend(legend_box(color));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;
    root.present()?;
    Ok(())
}

fn format_size(x: f64) -> String {
    if x.fract() == 0.0 {
        format!("{}", x as i64)
    } else {
        format!("{x:.2}")
    }
}

/// One x tick per measured size, ascending and deduplicated.
fn size_ticks(sizes: &[f64]) -> Vec<f64> {
    let mut ticks: Vec<f64> = sizes
        .iter()
        .copied()
        .filter(|s| s.is_finite() && *s > 0.0)
        .collect();
    ticks.sort_by(f64::total_cmp);
    ticks.dedup();
    ticks
}

fn positive_bounds(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .filter(|v| v.is_finite() && *v > 0.0)
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn draw_scaling(
    spec: &FigureSpec,
    labels: &[String],
    sizes: &[f64],
    columns: &[&Column],
    output: &Path,
) -> DrawResult {
    let lines: Vec<(String, Vec<(f64, f64)>)> = labels
        .iter()
        .enumerate()
        .map(|(row, label)| {
            let name = if spec.uppercase_labels {
                label.to_uppercase()
            } else {
                label.clone()
            };
            let points = sizes
                .iter()
                .zip(columns.iter())
                .filter_map(|(&x, c)| c.values.get(row).map(|&y| (x, y)))
                .filter(|&(x, y)| x > 0.0 && y > 0.0 && y.is_finite())
                .collect();
            (name, points)
        })
        .collect();

    let all_points = || lines.iter().flat_map(|(_, p)| p.iter().copied());
    let (x_lo, x_hi) = positive_bounds(all_points().map(|(x, _)| x))
        .ok_or("no positive sizes to plot on a log axis")?;
    let (y_lo, y_hi) = positive_bounds(all_points().map(|(_, y)| y))
        .ok_or("no positive measurements to plot on a log axis")?;

    let root = SVGBackend::new(output, size(spec)).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption(&spec.title, CAPTION_FONT)
        .margin(15)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(
            (x_lo / 1.5..x_hi * 1.5)
                .log_scale()
                .base(2.0)
                .with_key_points(size_ticks(sizes)),
            (y_lo / 1.5..y_hi * 1.5).log_scale(),
        )?;

    let formatter = |x: &f64| format_size(*x);
    let mut mesh = chart.configure_mesh();
    mesh.disable_x_mesh()
        .x_label_formatter(&formatter)
        .y_desc(spec.y_label.as_str());
    if let Some(x_label) = &spec.x_label {
        mesh.x_desc(x_label.as_str());
    }
    if !spec.grid {
        mesh.disable_y_mesh();
    }
    mesh.draw()?;

    for (idx, (name, points)) in lines.iter().enumerate() {
        let color = series_color(idx);
        chart
            .draw_series(LineSeries::new(points.iter().copied(), color.stroke_width(2)))?
            .label(name.clone())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
        chart.draw_series(points.iter().map(|&p| Circle::new(p, 4, color.filled())))?;
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .position(SeriesLabelPosition::UpperLeft)
        .draw()?;
    root.present()?;
    Ok(())
}

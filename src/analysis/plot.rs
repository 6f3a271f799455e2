use anyhow::{bail, Result};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::analysis::stats::LinearFit;

const CHART_SIZE: (u32, u32) = (1200, 600);
const HEATMAP_SIZE: (u32, u32) = (800, 600);

/// Bin count of the magnitude histogram.
pub const HISTOGRAM_BINS: usize = 20;

// coolwarm endpoints of the heatmap color ramp
const NEGATIVE_END: (u8, u8, u8) = (33, 102, 172);
const POSITIVE_END: (u8, u8, u8) = (178, 24, 43);

/// Magnitude frequency histogram → `magnitude_histogram.png`.
pub fn magnitude_histogram(values: &[f64], dest_dir: &Path) -> Result<PathBuf> {
    if values.is_empty() {
        bail!("no magnitude values to plot");
    }
    let path = dest_dir.join("magnitude_histogram.png");
    let bins = bin(values, HISTOGRAM_BINS);
    let max_count = bins.iter().map(|&(_, _, c)| c).max().unwrap_or(0) as f64;
    let lo = bins.first().map(|&(lo, _, _)| lo).unwrap_or(0.0);
    let hi = bins.last().map(|&(_, hi, _)| hi).unwrap_or(1.0);

    let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Magnitude distribution", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(44)
        .y_label_area_size(56)
        .build_cartesian_2d(lo..hi, 0.0..max_count * 1.05)?;
    chart
        .configure_mesh()
        .x_desc("Magnitude")
        .y_desc("Frequency")
        .draw()?;
    chart.draw_series(bins.iter().map(|&(b_lo, b_hi, count)| {
        Rectangle::new([(b_lo, 0.0), (b_hi, count as f64)], BLUE.mix(0.5).filled())
    }))?;
    root.present()?;
    drop(chart);
    drop(root);

    info!(path = %path.display(), "wrote histogram");
    Ok(path)
}

/// Horizontal magnitude boxplot → `magnitude_boxplot.png`.
pub fn magnitude_boxplot(values: &[f64], dest_dir: &Path) -> Result<PathBuf> {
    if values.is_empty() {
        bail!("no magnitude values to plot");
    }
    let path = dest_dir.join("magnitude_boxplot.png");
    let (lo, hi) = padded_range(values.iter().copied());
    let categories = ["Magnitude"];
    let quartiles = Quartiles::new(values);

    let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Magnitude boxplot", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(44)
        .y_label_area_size(100)
        .build_cartesian_2d((lo as f32)..(hi as f32), categories[..].into_segmented())?;
    chart.configure_mesh().x_desc("Magnitude").draw()?;
    chart.draw_series(categories.iter().map(|category| {
        Boxplot::new_horizontal(SegmentValue::CenterOf(category), &quartiles)
            .width(36)
            .whisker_width(0.5)
            .style(BLUE)
    }))?;
    root.present()?;
    drop(chart);
    drop(root);

    info!(path = %path.display(), "wrote boxplot");
    Ok(path)
}

/// Depth vs. magnitude scatter → `depth_magnitude_scatter.png`.
pub fn depth_magnitude_scatter(pairs: &[(f64, f64)], dest_dir: &Path) -> Result<PathBuf> {
    if pairs.is_empty() {
        bail!("no (depth, magnitude) pairs to plot");
    }
    let path = dest_dir.join("depth_magnitude_scatter.png");
    let (x_lo, x_hi) = padded_range(pairs.iter().map(|&(x, _)| x));
    let (y_lo, y_hi) = padded_range(pairs.iter().map(|&(_, y)| y));

    let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Depth vs. magnitude", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(44)
        .y_label_area_size(56)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;
    chart
        .configure_mesh()
        .x_desc("Depth (km)")
        .y_desc("Magnitude")
        .draw()?;
    chart.draw_series(
        pairs
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 3, BLUE.mix(0.4).filled())),
    )?;
    root.present()?;
    drop(chart);
    drop(root);

    info!(path = %path.display(), "wrote scatter");
    Ok(path)
}

/// Annotated 2x2 correlation heatmap → `correlation_heatmap.png`.
pub fn correlation_heatmap(
    labels: [&str; 2],
    matrix: [[f64; 2]; 2],
    dest_dir: &Path,
) -> Result<PathBuf> {
    let path = dest_dir.join("correlation_heatmap.png");
    let root = BitMapBackend::new(&path, HEATMAP_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Correlation matrix", ("sans-serif", 28))
        .margin(12)
        .build_cartesian_2d(-1.0f64..2.0f64, -0.5f64..2.0f64)?;

    let centered = ("sans-serif", 24)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Center, VPos::Center));

    let mut cells = Vec::new();
    let mut annotations = Vec::new();
    for (row, row_values) in matrix.iter().enumerate() {
        for (col, &value) in row_values.iter().enumerate() {
            let (x, y) = (col as f64, row as f64);
            cells.push(Rectangle::new(
                [(x, y), (x + 1.0, y + 1.0)],
                correlation_color(value).filled(),
            ));
            cells.push(Rectangle::new([(x, y), (x + 1.0, y + 1.0)], BLACK));
            annotations.push(Text::new(
                format!("{:.2}", value),
                (x + 0.5, y + 0.5),
                centered.clone(),
            ));
        }
    }
    for (idx, label) in labels.iter().enumerate() {
        // column labels under the grid, row labels to its left
        annotations.push(Text::new(
            label.to_string(),
            (idx as f64 + 0.5, -0.25),
            centered.clone(),
        ));
        annotations.push(Text::new(
            label.to_string(),
            (-0.5, idx as f64 + 0.5),
            centered.clone(),
        ));
    }
    chart.draw_series(cells)?;
    chart.draw_series(annotations)?;
    root.present()?;
    drop(chart);
    drop(root);

    info!(path = %path.display(), "wrote heatmap");
    Ok(path)
}

/// Scatter with the fitted regression line → `depth_magnitude_regression.png`.
pub fn regression_fit(
    pairs: &[(f64, f64)],
    fit: &LinearFit,
    dest_dir: &Path,
) -> Result<PathBuf> {
    if pairs.is_empty() {
        bail!("no (depth, magnitude) pairs to plot");
    }
    let path = dest_dir.join("depth_magnitude_regression.png");
    let (x_lo, x_hi) = padded_range(pairs.iter().map(|&(x, _)| x));
    let (y_lo, y_hi) = padded_range(pairs.iter().map(|&(_, y)| y));

    let root = BitMapBackend::new(&path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Regression: depth vs. magnitude", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(44)
        .y_label_area_size(56)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)?;
    chart
        .configure_mesh()
        .x_desc("Depth (km)")
        .y_desc("Magnitude")
        .draw()?;

    chart
        .draw_series(
            pairs
                .iter()
                .map(|&(x, y)| Circle::new((x, y), 3, BLUE.mix(0.4).filled())),
        )?
        .label("Observations")
        .legend(|(x, y)| Circle::new((x + 10, y), 3, BLUE.filled()));

    chart
        .draw_series(LineSeries::new(
            [(x_lo, fit.predict(x_lo)), (x_hi, fit.predict(x_hi))],
            RED.stroke_width(2),
        ))?
        .label("Fitted line")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED.stroke_width(2)));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.85))
        .border_style(BLACK)
        .draw()?;
    root.present()?;
    drop(chart);
    drop(root);

    info!(path = %path.display(), "wrote regression fit");
    Ok(path)
}

/// Equal-width bins over the value range as (lo, hi, count) triples.
/// A constant series gets a single unit-wide span so every bin is valid.
fn bin(values: &[f64], bins: usize) -> Vec<(f64, f64, usize)> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    let (lo, width) = if hi > lo {
        (lo, (hi - lo) / bins as f64)
    } else {
        (lo - 0.5, 1.0 / bins as f64)
    };

    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
        .iter()
        .enumerate()
        .map(|(i, &count)| {
            (
                lo + i as f64 * width,
                lo + (i + 1) as f64 * width,
                count,
            )
        })
        .collect()
}

/// Slightly widened min/max of a series, so no mark sits on the chart edge.
fn padded_range(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !lo.is_finite() || !hi.is_finite() {
        return (0.0, 1.0);
    }
    if lo == hi {
        return (lo - 0.5, hi + 0.5);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad, hi + pad)
}

/// White at zero, ramping to the coolwarm endpoints at ±1.
fn correlation_color(value: f64) -> RGBColor {
    let v = value.clamp(-1.0, 1.0);
    let (end, t) = if v >= 0.0 {
        (POSITIVE_END, v)
    } else {
        (NEGATIVE_END, -v)
    };
    let channel = |e: u8| (255.0 + (e as f64 - 255.0) * t).round() as u8;
    RGBColor(channel(end.0), channel(end.1), channel(end.2))
}

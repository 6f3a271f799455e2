pub mod plot;
pub mod stats;

pub use stats::{describe, linear_regression, pearson, pooled_t_test, Describe, LinearFit, TTest};

use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};

/// Events at or above this magnitude form the "strong" group of the
/// depth t-test.
pub const MAGNITUDE_THRESHOLD: f64 = 4.0;

/// Labels of the two analysis columns, in matrix order.
pub const ANALYSIS_COLUMNS: [&str; 2] = ["Depth(km)", "Magnitude"];

/// 2x2 Pearson correlation matrix over paired (depth, magnitude) values.
/// `None` when the coefficient is undefined for the data.
pub fn correlation_matrix(pairs: &[(f64, f64)]) -> Option<[[f64; 2]; 2]> {
    let depths: Vec<f64> = pairs.iter().map(|&(d, _)| d).collect();
    let magnitudes: Vec<f64> = pairs.iter().map(|&(_, m)| m).collect();
    let r = pearson(&depths, &magnitudes)?;
    Some([[1.0, r], [r, 1.0]])
}

/// Render per-column descriptive statistics the way the original report
/// lays them out: statistics as rows, variables as columns.
pub fn render_describe(columns: &[(&str, Option<Describe>)]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![String::new()];
    header.extend(columns.iter().map(|(name, _)| name.to_string()));
    table.set_header(header);

    stat_row(&mut table, "count", columns, |d| d.count.to_string());
    stat_row(&mut table, "mean", columns, |d| format!("{:.6}", d.mean));
    stat_row(&mut table, "std", columns, |d| {
        d.std.map(|s| format!("{:.6}", s)).unwrap_or_else(|| "-".into())
    });
    stat_row(&mut table, "min", columns, |d| format!("{:.6}", d.min));
    stat_row(&mut table, "25%", columns, |d| format!("{:.6}", d.q1));
    stat_row(&mut table, "50%", columns, |d| format!("{:.6}", d.median));
    stat_row(&mut table, "75%", columns, |d| format!("{:.6}", d.q3));
    stat_row(&mut table, "max", columns, |d| format!("{:.6}", d.max));

    table
}

/// Render the correlation matrix as a labelled console table.
pub fn render_correlation(labels: [&str; 2], matrix: [[f64; 2]; 2]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);

    let mut header = vec![String::new()];
    header.extend(labels.iter().map(|l| l.to_string()));
    table.set_header(header);

    for (label, row) in labels.iter().zip(matrix.iter()) {
        let mut cells = vec![label.to_string()];
        cells.extend(row.iter().map(|v| format!("{:.4}", v)));
        table.add_row(cells);
    }
    table
}

fn stat_row(
    table: &mut Table,
    label: &str,
    columns: &[(&str, Option<Describe>)],
    value: impl Fn(&Describe) -> String,
) {
    let mut row = vec![label.to_string()];
    row.extend(
        columns
            .iter()
            .map(|(_, d)| d.as_ref().map(|d| value(d)).unwrap_or_else(|| "-".into())),
    );
    table.add_row(row);
}

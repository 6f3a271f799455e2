use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::process::bulletin::EarthquakeRecord;

/// Column headings of the CSV export, in output order.
pub const CSV_HEADER: [&str; 7] = [
    "Date",
    "Time",
    "Latitude",
    "Longitude",
    "Depth(km)",
    "Magnitude",
    "Location",
];

const DATE_FORMAT: &str = "%Y.%m.%d";
const EXPORT_STAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// One row of the aggregate table. Depth and magnitude are the analysis
/// columns; coercion turns non-finite parsed values into missing.
#[derive(Debug, Clone)]
pub struct EventRow {
    pub date: NaiveDate,
    pub time: String,
    pub latitude: f64,
    pub longitude: f64,
    pub depth_km: Option<f64>,
    pub magnitude: Option<f64>,
    pub location: String,
}

/// The combined listing from every configured endpoint: concatenated in
/// input order, no dedup, no sort, immutable once built.
#[derive(Debug, Default)]
pub struct EventTable {
    rows: Vec<EventRow>,
}

impl EventTable {
    pub fn from_records(records: Vec<EarthquakeRecord>) -> Self {
        let rows = records
            .into_iter()
            .map(|rec| EventRow {
                date: rec.date,
                time: rec.time,
                latitude: rec.latitude,
                longitude: rec.longitude,
                depth_km: coerce_numeric(rec.depth_km),
                magnitude: coerce_numeric(rec.magnitude),
                location: rec.location,
            })
            .collect();
        EventTable { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[EventRow] {
        &self.rows
    }

    /// Depth values present in the table, in row order.
    pub fn depths(&self) -> Vec<f64> {
        self.rows.iter().filter_map(|r| r.depth_km).collect()
    }

    /// Magnitude values present in the table, in row order.
    pub fn magnitudes(&self) -> Vec<f64> {
        self.rows.iter().filter_map(|r| r.magnitude).collect()
    }

    /// Rows where both analysis columns are present, as (depth, magnitude).
    pub fn depth_magnitude_pairs(&self) -> Vec<(f64, f64)> {
        self.rows
            .iter()
            .filter_map(|r| Some((r.depth_km?, r.magnitude?)))
            .collect()
    }

    /// Split depths into (magnitude >= threshold, magnitude < threshold)
    /// groups. Rows missing either column contribute to neither group.
    pub fn depth_groups_by_magnitude(&self, threshold: f64) -> (Vec<f64>, Vec<f64>) {
        let mut at_or_above = Vec::new();
        let mut below = Vec::new();
        for row in &self.rows {
            let (Some(depth), Some(magnitude)) = (row.depth_km, row.magnitude) else {
                continue;
            };
            if magnitude >= threshold {
                at_or_above.push(depth);
            } else {
                below.push(depth);
            }
        }
        (at_or_above, below)
    }

    /// Write the table as `tum_depremler_<YYYYMMDD_HHMMSS>.csv` under
    /// `dest_dir`, via a `.tmp` file renamed into place. Returns the final
    /// path.
    pub fn write_csv(&self, dest_dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dest_dir = dest_dir.as_ref();
        let file_name = format!(
            "tum_depremler_{}.csv",
            Local::now().format(EXPORT_STAMP_FORMAT)
        );
        let final_path = dest_dir.join(&file_name);
        let tmp_path = dest_dir.join(format!("{}.tmp", file_name));

        let mut writer = csv::Writer::from_path(&tmp_path)
            .with_context(|| format!("creating `{}`", tmp_path.display()))?;
        writer.write_record(CSV_HEADER)?;
        for row in &self.rows {
            writer.write_record(&[
                row.date.format(DATE_FORMAT).to_string(),
                row.time.clone(),
                format!("{:.4}", row.latitude),
                format!("{:.4}", row.longitude),
                format_opt(row.depth_km),
                format_opt(row.magnitude),
                row.location.clone(),
            ])?;
        }
        writer
            .flush()
            .with_context(|| format!("flushing `{}`", tmp_path.display()))?;
        drop(writer);

        fs::rename(&tmp_path, &final_path).with_context(|| {
            format!(
                "renaming `{}` → `{}`",
                tmp_path.display(),
                final_path.display()
            )
        })?;

        info!(rows = self.rows.len(), path = %final_path.display(), "wrote CSV export");
        Ok(final_path)
    }

    /// Render the first `n` rows as a console table.
    pub fn render_head(&self, n: usize) -> Table {
        render_rows(&self.rows[..self.rows.len().min(n)])
    }

    /// Render the last `n` rows as a console table.
    pub fn render_tail(&self, n: usize) -> Table {
        let start = self.rows.len().saturating_sub(n);
        render_rows(&self.rows[start..])
    }

    /// Render every row as a console table.
    pub fn render_all(&self) -> Table {
        render_rows(&self.rows)
    }
}

/// `f64` parsing accepts "NaN" and "inf" tokens; those are not usable
/// measurements, so they become missing here.
fn coerce_numeric(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

fn format_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{:.1}", v)).unwrap_or_default()
}

fn render_rows(rows: &[EventRow]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(CSV_HEADER);
    for row in rows {
        table.add_row(vec![
            row.date.format(DATE_FORMAT).to_string(),
            row.time.clone(),
            format!("{:.4}", row.latitude),
            format!("{:.4}", row.longitude),
            format_opt(row.depth_km),
            format_opt(row.magnitude),
            row.location.clone(),
        ]);
    }
    table
}

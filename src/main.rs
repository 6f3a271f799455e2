use anyhow::Result;
use koeriscraper::{
    analysis::{self, plot, stats},
    fetch::{self, BULLETIN_SOURCES},
    process::{parse_bulletin, EventTable},
};
use reqwest::Client;
use std::{fs, path::Path};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

const PREVIEW_ROWS: usize = 20;

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env).init();
    info!("startup");

    // ─── 2) configure dirs ───────────────────────────────────────────
    let plots_dir = Path::new("plots");
    fs::create_dir_all(plots_dir)?;

    // ─── 3) fetch + parse each bulletin, in order ────────────────────
    let client = Client::new();
    let mut records = Vec::new();
    for &(year, url) in BULLETIN_SOURCES {
        info!(year, url, "fetching bulletin");
        match fetch::fetch_bulletin(&client, url).await {
            Ok(raw) => {
                let parsed = parse_bulletin(&raw);
                info!(year, rows = parsed.len(), "parsed bulletin");
                records.extend(parsed);
            }
            Err(err) => {
                // the endpoint contributes nothing; keep going with the rest
                error!(year, url, "bulletin fetch failed: {:#}", err);
            }
        }
    }

    // ─── 4) build the aggregate table ────────────────────────────────
    let table = EventTable::from_records(records);
    if table.is_empty() {
        println!("No data could be fetched, or none is usable for analysis.");
        return Ok(());
    }

    // ─── 5) export ───────────────────────────────────────────────────
    let csv_path = table.write_csv(".")?;
    println!("Saved {} events to {}", table.len(), csv_path.display());

    // ─── 6) console previews ─────────────────────────────────────────
    println!("\nProcessed earthquake data (first {} rows):", PREVIEW_ROWS);
    println!("{}", table.render_head(PREVIEW_ROWS));

    println!("\nProcessed earthquake data (last {} rows):", PREVIEW_ROWS);
    println!("{}", table.render_tail(PREVIEW_ROWS));

    println!("\nAll rows:");
    println!("{}", table.render_all());

    // ─── 7) descriptive statistics ───────────────────────────────────
    let depths = table.depths();
    let magnitudes = table.magnitudes();
    println!("\nDescriptive statistics:");
    println!(
        "{}",
        analysis::render_describe(&[
            ("Depth(km)", stats::describe(&depths)),
            ("Magnitude", stats::describe(&magnitudes)),
        ])
    );

    // ─── 8) distribution plots ───────────────────────────────────────
    plot::magnitude_histogram(&magnitudes, plots_dir)?;
    plot::magnitude_boxplot(&magnitudes, plots_dir)?;
    let pairs = table.depth_magnitude_pairs();
    plot::depth_magnitude_scatter(&pairs, plots_dir)?;

    // ─── 9) hypothesis test: depth by magnitude group ────────────────
    println!("\nHypothesis test:");
    let (strong, weak) = table.depth_groups_by_magnitude(analysis::MAGNITUDE_THRESHOLD);
    match stats::pooled_t_test(&strong, &weak) {
        Some(result) => println!(
            "t-statistic: {:.2}, p-value: {:.2e}",
            result.statistic, result.p_value
        ),
        None => println!("Not enough data in both magnitude groups for a t-test."),
    }

    // ─── 10) correlation ─────────────────────────────────────────────
    println!("\nCorrelation matrix:");
    match analysis::correlation_matrix(&pairs) {
        Some(matrix) => {
            println!(
                "{}",
                analysis::render_correlation(analysis::ANALYSIS_COLUMNS, matrix)
            );
            plot::correlation_heatmap(analysis::ANALYSIS_COLUMNS, matrix, plots_dir)?;
        }
        None => println!("Correlation is undefined for the available data."),
    }

    // ─── 11) regression: magnitude on depth ──────────────────────────
    match stats::linear_regression(&pairs) {
        Some(fit) => {
            println!("\nRegression analysis:");
            println!("Slope: {:.2}", fit.slope);
            println!("Intercept: {:.2}", fit.intercept);
            plot::regression_fit(&pairs, &fit, plots_dir)?;
        }
        None => println!("\nNot enough data for regression analysis."),
    }

    info!("all done");
    Ok(())
}

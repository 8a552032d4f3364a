//! AirWatch CLI
//!
//! Offline AQI classification, recommendation table checks, and commands
//! against a running AirWatch server.

#![allow(clippy::print_stdout)]

mod table_check;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use domain::{
    Aqi, AlertThresholds, Classification, PollutantLevels, evaluate_alert, pollutant_risks,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// AirWatch CLI
#[derive(Parser)]
#[command(name = "airwatch-cli")]
#[command(author, version, about = "AirWatch air quality CLI", long_about = None)]
struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify an AQI value offline
    ///
    /// Example: airwatch-cli classify 162 --pm25 58
    Classify {
        /// AQI value, non-negative
        aqi: String,

        /// PM2.5 in μg/m³
        #[arg(long)]
        pm25: Option<f64>,

        /// PM10 in μg/m³
        #[arg(long)]
        pm10: Option<f64>,

        /// Ozone in μg/m³
        #[arg(long)]
        o3: Option<f64>,

        /// Nitrogen dioxide in μg/m³
        #[arg(long)]
        no2: Option<f64>,

        /// Sulphur dioxide in μg/m³
        #[arg(long)]
        so2: Option<f64>,

        /// Carbon monoxide in mg/m³
        #[arg(long)]
        co: Option<f64>,
    },

    /// Check the stored recommendation ranges for gaps and overlaps
    ///
    /// Exits non-zero when the table has errors.
    CheckTable {
        /// Path to the database
        #[arg(long, default_value = "airwatch.db", env = "AIRWATCH_DATABASE__PATH")]
        db: PathBuf,
    },

    /// Check server readiness
    Status {
        /// Server URL
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
    },

    /// List locations with their latest reading
    Locations {
        /// Server URL
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
    },

    /// Fetch and store a fresh reading for a location
    Refresh {
        /// Location identifier
        location_id: i64,

        /// Server URL
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
    },

    /// Look up the health recommendation for an AQI value
    Recommend {
        /// AQI value
        aqi: String,

        /// Server URL
        #[arg(short, long, default_value = "http://localhost:3000")]
        url: String,
    },
}

/// Determine log filter level from verbosity count
const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Format endpoint URL
fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{}{path}", base_url.trim_end_matches('/'))
}

/// Human-readable classification of an AQI value with pollutant flags
fn classification_report(aqi: Aqi, levels: &PollutantLevels) -> Vec<String> {
    let classification = Classification::from(aqi.band());
    let mut lines = vec![
        format!("AQI:      {aqi}"),
        format!("Category: {}", classification.category()),
        format!("Color:    {}", classification.color_token()),
    ];

    for risk in pollutant_risks(levels) {
        lines.push(format!(
            "High {}: {:.1} (cutoff {:.1}) - {}",
            risk.pollutant.label(),
            risk.value,
            risk.threshold,
            risk.action
        ));
    }

    if let Some(alert) = evaluate_alert(aqi, &AlertThresholds::default()) {
        lines.push(format!("Alert [{}]: {}", alert.level.as_str(), alert.title));
    }
    lines
}

/// Print a JSON response, failing on a non-success status
async fn print_json(response: reqwest::Response) -> anyhow::Result<()> {
    let status = response.status();
    let body = response.json::<serde_json::Value>().await?;
    println!("{}", serde_json::to_string_pretty(&body)?);
    if !status.is_success() {
        anyhow::bail!("server responded with HTTP {status}");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let filter = log_filter_from_verbosity(cli.verbose);

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let client = reqwest::Client::new();

    match cli.command {
        Commands::Classify {
            aqi,
            pm25,
            pm10,
            o3,
            no2,
            so2,
            co,
        } => {
            let aqi: Aqi = aqi.parse()?;
            let levels = PollutantLevels {
                pm25,
                pm10,
                o3,
                no2,
                so2,
                co,
            };
            for line in classification_report(aqi, &levels) {
                println!("{line}");
            }
        },

        Commands::CheckTable { db } => {
            let report = table_check::check_table(&db).await?;
            println!("Recommendation ranges: {}", report.records);
            for issue in &report.issues {
                println!("[{:?}] {issue}", issue.severity());
            }
            if report.has_errors() {
                anyhow::bail!("recommendation table has errors");
            }
            println!("Table OK");
        },

        Commands::Status { url } => {
            print_json(client.get(endpoint_url(&url, "/ready")).send().await?).await?;
        },

        Commands::Locations { url } => {
            print_json(client.get(endpoint_url(&url, "/api/air-quality")).send().await?).await?;
        },

        Commands::Refresh { location_id, url } => {
            let response = client
                .post(endpoint_url(&url, "/api/air-quality"))
                .json(&serde_json::json!({ "locationId": location_id }))
                .send()
                .await?;
            print_json(response).await?;
        },

        Commands::Recommend { aqi, url } => {
            let response = client
                .get(endpoint_url(&url, "/api/health-recommendations"))
                .query(&[("aqi", aqi.as_str())])
                .send()
                .await?;
            print_json(response).await?;
        },
    }

    Ok(())
}

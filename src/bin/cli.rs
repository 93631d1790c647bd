//! Tiltwatch CLI
//!
//! Command-line interface for Tiltwatch operations:
//! - Send a reading to the hub (stand-in for the device)
//! - Fetch one telemetry payload and print the chart series
//! - Check hub status
//! - Generate a config file

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use tiltwatch::poller::{HttpTelemetrySource, TelemetrySource};
use tiltwatch::render::{render, ChartId, DashboardView, LabelClock, LabelZone, RenderOutcome};
use tiltwatch::telemetry::Reading;

#[derive(Parser)]
#[command(name = "tiltwatch-cli")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Posture sensor dashboard and telemetry hub tools")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Hub base URL
    #[arg(long, default_value = "http://localhost:8000", global = true)]
    pub url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Send one reading to the hub, as the device would
    Ingest {
        /// Tilt angle in degrees
        #[arg(short, long)]
        angle: Option<f64>,
        /// Light sensor level
        #[arg(short, long)]
        light: Option<f64>,
        /// Posture label
        #[arg(short, long)]
        posture: Option<String>,
        /// Mark the reading as a calibration press
        #[arg(long)]
        calibration: bool,
        /// Mark the reading as a buzzer event
        #[arg(long)]
        buzzer: bool,
    },

    /// Fetch the current payload and print both charts' series
    Snapshot {
        /// Label time zone: local, utc, or an offset such as +02:00
        #[arg(long, default_value = "local")]
        zone: String,
        /// Request timeout in milliseconds
        #[arg(long, default_value = "5000")]
        timeout_ms: u64,
    },

    /// Show hub status
    Status,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();

    match cli.command {
        Commands::Ingest {
            angle,
            light,
            posture,
            calibration,
            buzzer,
        } => {
            let reading = Reading {
                tilt_angle: angle,
                posture_label: posture,
                light,
                buzzer,
                calibration,
            };

            let response = client
                .post(format!("{}/ingest", cli.url.trim_end_matches('/')))
                .json(&reading)
                .send()
                .await?;

            if response.status().is_success() {
                println!(
                    "Sent reading: angle={} light={}{}{}",
                    angle.unwrap_or(0.0),
                    light.unwrap_or(0.0),
                    if calibration { " [calibration]" } else { "" },
                    if buzzer { " [buzzer]" } else { "" },
                );
            } else {
                let status = response.status();
                let text = response.text().await.unwrap_or_default();
                eprintln!("Failed ({}): {}", status, text);
                std::process::exit(1);
            }
        }

        Commands::Snapshot { zone, timeout_ms } => {
            let zone: LabelZone = zone.parse()?;
            let clock = LabelClock::new(tiltwatch::render::DEFAULT_LABEL_FORMAT, zone)?;
            let source = HttpTelemetrySource::new(&cli.url, Duration::from_millis(timeout_ms))?;

            let payload = match source.fetch().await {
                Ok(payload) => payload,
                Err(e) => {
                    eprintln!("Cannot fetch telemetry from {}", source.url());
                    eprintln!("Error: {}", e);
                    std::process::exit(1);
                }
            };

            let mut view = DashboardView::new();
            if render(&payload, &mut view, &clock) == RenderOutcome::Skipped {
                println!("No samples yet.");
                return Ok(());
            }

            match cli.format.as_str() {
                "json" => {
                    println!("{}", serde_json::to_string_pretty(&view)?);
                }
                _ => {
                    print_view(&view);
                }
            }
        }

        Commands::Status => {
            let response = client
                .get(format!("{}/health", cli.url.trim_end_matches('/')))
                .send()
                .await;

            match response {
                Ok(resp) if resp.status().is_success() => {
                    let health: serde_json::Value = resp.json().await?;

                    println!("Tiltwatch v{}", env!("CARGO_PKG_VERSION"));
                    println!();
                    println!(
                        "Hub Status: {}",
                        health["status"].as_str().unwrap_or("unknown")
                    );
                    println!();
                    println!("Buffers:");
                    println!("  Samples: {}", health["samples"].as_u64().unwrap_or(0));
                    println!("  Log lines: {}", health["logs"].as_u64().unwrap_or(0));

                    if let Some(uptime) = health["uptime_seconds"].as_u64() {
                        println!();
                        println!("Uptime: {}", format_duration(uptime));
                    }
                }
                Ok(resp) => {
                    eprintln!("Hub returned error: {}", resp.status());
                    std::process::exit(1);
                }
                Err(e) => {
                    eprintln!("Cannot connect to Tiltwatch hub at {}", cli.url);
                    eprintln!("Error: {}", e);
                    eprintln!();
                    eprintln!("Make sure the hub is running:");
                    eprintln!("  cargo run --bin tiltwatch-hub");
                    std::process::exit(1);
                }
            }
        }

        Commands::Config { output } => {
            let config = tiltwatch::config::generate_default_config();

            match output {
                Some(path) => {
                    // Create parent directory if needed
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}

fn marker(value: Option<f64>) -> String {
    value
        .map(|v| format!("{:.1}", v))
        .unwrap_or_else(|| "-".to_string())
}

fn print_view(view: &DashboardView) {
    for id in ChartId::all() {
        let chart = view.chart(*id);
        let [primary, calibration, buzzer] = id.datasets();

        println!("{} ({} points)", id.surface_id(), chart.len());
        println!(
            "{:<10} | {:<15} | {:<11} | {:<8}",
            "Time", primary.label, calibration.label, buzzer.label
        );
        println!("{}", "-".repeat(54));

        for i in 0..chart.len() {
            println!(
                "{:<10} | {:<15.1} | {:<11} | {:<8}",
                chart.labels[i],
                chart.series.values[i],
                marker(chart.series.calibration[i]),
                marker(chart.series.buzzer[i]),
            );
        }
        println!();
    }

    println!(
        "Last calibration: {}",
        view.last_calibration.as_deref().unwrap_or("never")
    );
    println!();
    println!("Logs:");
    for line in view.logs.lines() {
        println!("  {}", line);
    }
}

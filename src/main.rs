//! Reptrack CLI
//!
//! Command-line interface for the exercise dashboard flows:
//! - Load a patient's prescription and measurement history
//! - Record a new exercise entry
//! - Create test data on the server

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use reptrack::config::{generate_default_config, Config};
use reptrack::fhir::{FhirClient, Measurement};
use reptrack::series::format_label;
use reptrack::workflows::{self, DashboardView};

#[derive(Parser)]
#[command(name = "reptrack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Track prescribed exercise performance over FHIR")]
#[command(
    long_about = "Reptrack is a client for a FHIR clinical-data server.\nLook up a patient's exercise prescription, review recorded repetitions, and upload new entries."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// FHIR server base URL (overrides config)
    #[arg(long, global = true)]
    fhir_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a patient's prescription and measurement history
    Load {
        /// Patient identifier assigned by the server
        patient_id: String,
    },

    /// Record a new exercise entry
    Log {
        /// Repetitions performed
        reps: String,
        /// Load lifted in kilograms (optional)
        #[arg(short, long, default_value = "")]
        weight: String,
        /// Patient identifier
        #[arg(short, long)]
        patient: String,
    },

    /// Create a test patient with an active squats order
    Setup,

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "reptrack=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let mut config = Config::load_default();
    if let Some(url) = cli.fhir_url {
        config.fhir.base_url = url;
    }
    let client = FhirClient::new(config.fhir.clone());

    match cli.command {
        Commands::Load { patient_id } => {
            let view = workflows::load(&client, &patient_id).await?;
            print_view(&view);
        }

        Commands::Log {
            reps,
            weight,
            patient,
        } => {
            let measurements = workflows::upload(&client, &patient, &reps, &weight).await?;

            println!("Uploaded entry for patient {}", patient);
            println!();
            print_measurements(&measurements);
        }

        Commands::Setup => {
            println!("Creating test data on {} ...", client.config().base_url);

            let patient_id = workflows::create_test_data(&client).await?;
            println!("Created patient: {}", patient_id);
            println!();

            // Same transition the dashboard runs after test-data creation
            let view = workflows::load(&client, &patient_id).await?;
            print_view(&view);
        }

        Commands::Config { output } => {
            let config = generate_default_config();

            match output {
                Some(path) => {
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

fn print_view(view: &DashboardView) {
    println!("Prescription: {}", view.task_display);
    println!();
    print_measurements(&view.measurements);
}

fn print_measurements(measurements: &[Measurement]) {
    if measurements.is_empty() {
        println!("No measurements recorded yet.");
        println!();
        println!("Record one with:");
        println!("  reptrack log 12 --patient <id>");
        return;
    }

    println!("{:<14} {:>8} {:>11}", "Time", "Reps", "Load (kg)");
    println!("{}", "-".repeat(35));

    for measurement in measurements {
        let load = measurement
            .load_kg
            .map(|kg| format!("{:.1}", kg))
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<14} {:>8.0} {:>11}",
            format_label(measurement.taken_at),
            measurement.reps,
            load
        );
    }

    println!();
    println!("{} entries", measurements.len());
}

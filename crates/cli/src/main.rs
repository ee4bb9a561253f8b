use anyhow::{bail, Context, Result};
use artifacts::ScoringArtifacts;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use features::RawRequest;
use image_search::{NoImageSearch, UnsplashClient, UnsplashConfig, UNSPLASH_SEARCH_URL};
use server::{parse_form, EstimateService, FormFields, ServerConfig, Valuation};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::warn;

/// Car valuation - price estimates from a pre-trained model
#[derive(Parser)]
#[command(name = "car-valuation")]
#[command(about = "Estimate used car prices from a pre-trained regression model", long_about = None)]
struct Cli {
    /// Path to the feature schema (JSON array of column names)
    #[arg(long, default_value = "artifacts/columns.json")]
    schema: PathBuf,

    /// Path to the model artifact
    #[arg(long, default_value = "artifacts/model.json")]
    model: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the valuation web app
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:8080")]
        bind: String,

        /// Number of worker threads (defaults to one per core)
        #[arg(long)]
        workers: Option<usize>,

        #[command(flatten)]
        unsplash: UnsplashArgs,
    },

    /// Value a single car
    Estimate {
        #[command(flatten)]
        car: CarArgs,

        /// Also look up photos (requires an Unsplash key)
        #[arg(long)]
        with_images: bool,

        #[command(flatten)]
        unsplash: UnsplashArgs,
    },

    /// Value every car in a JSON file (an array of form objects)
    Batch {
        #[arg(long)]
        input: PathBuf,
    },

    /// Print the model's feature columns
    Schema,
}

#[derive(Args)]
struct CarArgs {
    #[arg(long)]
    year: String,
    #[arg(long)]
    motor_volume: String,
    #[arg(long)]
    running_km: String,
    #[arg(long)]
    model: String,
    #[arg(long)]
    motor_type: String,
    #[arg(long)]
    wheel: String,
    #[arg(long)]
    color: String,
    /// Body type, e.g. sedan or suv
    #[arg(long = "type")]
    car_type: String,
    #[arg(long)]
    status: String,
}

impl CarArgs {
    fn into_fields(self) -> FormFields {
        [
            ("year", self.year),
            ("motor_volume", self.motor_volume),
            ("running_km", self.running_km),
            ("model", self.model),
            ("motor_type", self.motor_type),
            ("wheel", self.wheel),
            ("color", self.color),
            ("type", self.car_type),
            ("status", self.status),
        ]
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
    }
}

#[derive(Args)]
struct UnsplashArgs {
    /// Unsplash API access key; photos are disabled without one
    #[arg(long, env = "UNSPLASH_ACCESS_KEY")]
    unsplash_key: Option<String>,

    /// Photo search endpoint
    #[arg(long, default_value = UNSPLASH_SEARCH_URL)]
    unsplash_url: String,

    /// Give up on the photo search after this many seconds
    #[arg(long, default_value = "5")]
    image_timeout_secs: u64,

    /// Results requested per search
    #[arg(long, default_value = "10")]
    per_page: u32,
}

impl UnsplashArgs {
    /// Build a client, or None when no key was given
    fn client(&self) -> Result<Option<UnsplashClient>> {
        let Some(key) = self.unsplash_key.as_ref().filter(|k| !k.is_empty()) else {
            return Ok(None);
        };
        let mut config = UnsplashConfig::new(key.clone());
        config.endpoint = self.unsplash_url.clone();
        config.timeout = Duration::from_secs(self.image_timeout_secs);
        config.per_page = self.per_page;
        let client = UnsplashClient::new(config).context("Failed to create Unsplash client")?;
        Ok(Some(client))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    // Load artifacts; the process doesn't start without them
    let start = Instant::now();
    let artifacts = ScoringArtifacts::load(&cli.schema, &cli.model)
        .context("Failed to load scoring artifacts")?;
    println!(
        "{} Loaded {} feature columns in {:?}",
        "✓".green(),
        artifacts.schema().len(),
        start.elapsed()
    );

    // Dispatch to appropriate command handler
    match cli.command {
        Commands::Serve {
            bind,
            workers,
            unsplash,
        } => handle_serve(artifacts, ServerConfig { bind, workers }, &unsplash).await?,
        Commands::Estimate {
            car,
            with_images,
            unsplash,
        } => handle_estimate(artifacts, car.into_fields(), with_images, &unsplash).await?,
        Commands::Batch { input } => handle_batch(artifacts, &input)?,
        Commands::Schema => handle_schema(&artifacts),
    }

    Ok(())
}

/// Handle the 'serve' command
async fn handle_serve(
    artifacts: ScoringArtifacts,
    config: ServerConfig,
    unsplash: &UnsplashArgs,
) -> Result<()> {
    match unsplash.client()? {
        Some(client) => {
            let service = EstimateService::from_artifacts(artifacts, client);
            server::serve(service, &config).await
        }
        None => {
            warn!("no Unsplash access key configured, valuations will have no photos");
            let service = EstimateService::from_artifacts(artifacts, NoImageSearch);
            server::serve(service, &config).await
        }
    }
}

/// Handle the 'estimate' command
async fn handle_estimate(
    artifacts: ScoringArtifacts,
    fields: FormFields,
    with_images: bool,
    unsplash: &UnsplashArgs,
) -> Result<()> {
    let client = if with_images { unsplash.client()? } else { None };
    if with_images && client.is_none() {
        warn!("--with-images needs an Unsplash access key, skipping photos");
    }

    let valuation = match client {
        Some(client) => {
            EstimateService::from_artifacts(artifacts, client)
                .handle(&fields)
                .await?
        }
        None => {
            EstimateService::from_artifacts(artifacts, NoImageSearch)
                .handle(&fields)
                .await?
        }
    };

    print_valuation(&valuation)
}

fn print_valuation(valuation: &Valuation) -> Result<()> {
    match valuation {
        Valuation::Rejected { message, .. } => {
            bail!("{}", message);
        }
        Valuation::Estimated {
            estimate_text,
            image_urls,
            ..
        } => {
            println!("{}", estimate_text.bold().green());
            for url in image_urls {
                println!("  {} {}", "•".cyan(), url);
            }
        }
    }
    Ok(())
}

/// Turn one batch row into form fields.
///
/// Strings are taken as-is; numbers and booleans use their JSON text.
fn row_to_fields(row: &serde_json::Map<String, serde_json::Value>) -> FormFields {
    row.iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(name, value)| {
            let text = match value {
                serde_json::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            (name.clone(), text)
        })
        .collect()
}

/// Handle the 'batch' command
fn handle_batch(artifacts: ScoringArtifacts, input: &Path) -> Result<()> {
    let contents = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let rows: Vec<serde_json::Map<String, serde_json::Value>> = serde_json::from_str(&contents)
        .with_context(|| format!("{} is not a JSON array of objects", input.display()))?;

    // Validate every row first, then score the valid ones together
    let mut requests: Vec<(usize, RawRequest)> = Vec::new();
    let mut rejected: Vec<(usize, String)> = Vec::new();
    for (idx, row) in rows.iter().enumerate() {
        match parse_form(&row_to_fields(row)) {
            Ok(raw) => requests.push((idx, raw)),
            Err(err) => rejected.push((idx, err.message())),
        }
    }

    let service = EstimateService::from_artifacts(artifacts, NoImageSearch);
    let start = Instant::now();
    let raws: Vec<RawRequest> = requests.iter().map(|(_, raw)| raw.clone()).collect();
    let prices = service.estimate_batch(&raws);

    let mut lines: Vec<(usize, String)> = rejected
        .into_iter()
        .map(|(idx, message)| (idx, format!("{}", message.red())))
        .collect();
    for ((idx, raw), price) in requests.iter().zip(prices) {
        let line = match price {
            Ok(price) => format!(
                "{} {} {} - {}",
                raw.year,
                raw.model,
                raw.car_type,
                server::format_estimate(price)
            ),
            Err(e) => format!("{}", format!("scoring failed: {:#}", e).red()),
        };
        lines.push((*idx, line));
    }
    lines.sort_by_key(|(idx, _)| *idx);

    println!("{}", "Batch valuations:".bold().blue());
    for (idx, line) in &lines {
        println!("{:>4}. {}", (idx + 1).to_string().green(), line);
    }
    println!(
        "Scored {} of {} rows in {:?}",
        raws.len(),
        rows.len(),
        start.elapsed()
    );
    Ok(())
}

/// Handle the 'schema' command
fn handle_schema(artifacts: &ScoringArtifacts) {
    println!("{}", "Feature columns:".bold().blue());
    for (idx, column) in artifacts.schema().columns().iter().enumerate() {
        println!("{:>4}  {}", idx, column);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_to_fields_stringifies_numbers() {
        let row = json!({
            "year": 2020,
            "motor_volume": 2.0,
            "running_km": "50000",
            "model": "BMW",
            "color": null
        });
        let fields = row_to_fields(row.as_object().unwrap());

        let get = |name: &str| {
            fields
                .iter()
                .find(|(k, _)| k == name)
                .map(|(_, v)| v.as_str())
        };
        assert_eq!(get("year"), Some("2020"));
        assert_eq!(get("motor_volume"), Some("2.0"));
        assert_eq!(get("running_km"), Some("50000"));
        assert_eq!(get("model"), Some("BMW"));
        assert_eq!(get("color"), None);
    }

    #[test]
    fn test_car_args_field_order() {
        let args = CarArgs {
            year: "2020".into(),
            motor_volume: "2.0".into(),
            running_km: "50000".into(),
            model: "bmw".into(),
            motor_type: "petrol".into(),
            wheel: "left".into(),
            color: "black".into(),
            car_type: "sedan".into(),
            status: "used".into(),
        };
        let fields = args.into_fields();
        let names: Vec<&str> = fields.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(
            names,
            vec!["year", "motor_volume", "running_km", "model", "motor_type", "wheel", "color", "type", "status"]
        );
        assert!(parse_form(&fields).is_ok());
    }

    #[test]
    fn test_cli_parses_estimate() {
        let cli = Cli::try_parse_from([
            "car-valuation",
            "--schema",
            "s.json",
            "estimate",
            "--year",
            "2020",
            "--motor-volume",
            "2.0",
            "--running-km",
            "50000",
            "--model",
            "bmw",
            "--motor-type",
            "petrol",
            "--wheel",
            "left",
            "--color",
            "black",
            "--type",
            "sedan",
            "--status",
            "used",
        ])
        .unwrap();

        assert_eq!(cli.schema, PathBuf::from("s.json"));
        assert_eq!(cli.model, PathBuf::from("artifacts/model.json"));
        match cli.command {
            Commands::Estimate { car, with_images, .. } => {
                assert_eq!(car.car_type, "sedan");
                assert!(!with_images);
            }
            _ => panic!("expected estimate command"),
        }
    }
}

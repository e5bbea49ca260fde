use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use ward_resolver::{batch, config, coverage, LatLon, WardInfo, WardResolver};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, value_name = "FILE", default_value = "config.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up the ward and chapter for one location
    Resolve {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(short, long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
    /// Resolve every row of a CSV of points
    Batch {
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
        #[arg(short, long, value_name = "FILE")]
        output: PathBuf,
    },
    /// Report wards without a chapter and roster entries without a ward
    Check,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
    Summary,
}

fn render(info: Option<&WardInfo>, format: Format) -> Result<String> {
    let Some(info) = info else {
        return Ok("No ward found".to_string());
    };
    Ok(match format {
        Format::Text => info.to_string(),
        Format::Json => serde_json::to_string_pretty(info)?,
        Format::Summary => info.summary(),
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let app_config = config::AppConfig::load_from_file(&cli.config)?;
    let resolver = WardResolver::load(&app_config);

    match cli.command {
        Commands::Resolve { lat, lon, format } => {
            let info = resolver.resolve(LatLon::new(lat, lon));
            println!("{}", render(info.as_ref(), format)?);
        }
        Commands::Batch { input, output } => {
            let summary = batch::run_batch(&resolver, &app_config.batch, &input, &output)?;
            println!(
                "Resolved {} of {} rows ({} not found, {} invalid)",
                summary.resolved, summary.rows, summary.not_found, summary.invalid
            );
        }
        Commands::Check => {
            let dataset = resolver
                .dataset()
                .ok_or_else(|| anyhow!("Boundary dataset failed to load, see log"))?;
            println!("{}", coverage::coverage(dataset, resolver.roster(), resolver.labels()));
        }
    }

    Ok(())
}

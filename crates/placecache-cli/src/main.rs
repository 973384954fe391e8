mod lookup;

use clap::{Parser, Subcommand};
use placecache_core::{DistanceUnit, QueryMode};
use placecache_lookup::LookupService;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "placecache-cli")]
#[command(about = "Query the place-lookup cache from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search nearby places through the cache
    Places {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lng: f64,
        /// Search radius in metres
        #[arg(long)]
        radius: Option<u32>,
        /// Provider category tag (e.g. restaurant)
        #[arg(long)]
        category: Option<String>,
        /// `food` or `grocery-only`
        #[arg(long, default_value = "food")]
        mode: QueryMode,
    },
    /// Route distance between two points
    Directions {
        #[arg(long, allow_hyphen_values = true)]
        origin_lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        origin_lng: f64,
        #[arg(long, allow_hyphen_values = true)]
        dest_lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        dest_lng: f64,
        /// `m`, `km`, or `mi`
        #[arg(long, default_value = "m")]
        unit: DistanceUnit,
    },
    /// Shared store operations
    Store {
        #[command(subcommand)]
        command: StoreCommands,
    },
}

#[derive(Debug, Subcommand)]
enum StoreCommands {
    /// Round-trip the configured store
    Ping,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("placecache-cli ready; see --help for commands");
        return Ok(());
    };

    let config = placecache_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let service = placecache_lookup::build_lookup_service(&config).await?;
    let outcome = run(&service, command).await;
    service.close_store().await?;
    outcome
}

async fn run(service: &LookupService, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Places {
            lat,
            lng,
            radius,
            category,
            mode,
        } => lookup::run_places(service, lat, lng, radius, category, mode).await?,
        Commands::Directions {
            origin_lat,
            origin_lng,
            dest_lat,
            dest_lng,
            unit,
        } => {
            lookup::run_directions(
                service,
                (origin_lat, origin_lng),
                (dest_lat, dest_lng),
                unit,
            )
            .await?;
        }
        Commands::Store {
            command: StoreCommands::Ping,
        } => lookup::run_store_ping(service).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;

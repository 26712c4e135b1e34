mod search;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "dimo-cli")]
#[command(about = "DIMO store directory command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Run a nearby-store search and print the ordered results
    Search {
        /// User to personalize the ranking for
        #[arg(long)]
        user_id: i64,
        /// Latitude of the search origin
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        /// Longitude of the search origin
        #[arg(long, allow_negative_numbers = true)]
        long: f64,
        /// Search radius in kilometres
        #[arg(long)]
        km_limit: f64,
        /// Ranking service base URL (overrides `DIMO_RECSYS_URL`)
        #[arg(long)]
        recsys_url: Option<String>,
    },
    /// Show one store with its distance from a point
    Store {
        /// Store id
        #[arg(long)]
        id: i64,
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        long: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = dimo_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let pool_config = dimo_db::PoolConfig::from_app_config(&config);
    let pool = dimo_db::connect_pool(&config.database_url, pool_config).await?;

    match cli.command {
        Commands::Migrate => {
            let applied = dimo_db::run_migrations(&pool).await?;
            println!("applied {applied} migration(s)");
        }
        Commands::Search {
            user_id,
            lat,
            long,
            km_limit,
            recsys_url,
        } => {
            let args = search::SearchArgs {
                user_id,
                lat,
                long,
                km_limit,
                recsys_url,
            };
            search::run_search(pool, &config, args).await?;
        }
        Commands::Store { id, lat, long } => {
            search::run_store(pool, &config, id, lat, long).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;

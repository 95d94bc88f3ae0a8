use clap::{Parser, Subcommand};
use gamereview_adapter_pg::{check_connection, connect_pool, introspect};
use gamereview_core::{GameReviewConfig, LogFormat, ObservabilityConfig, TableDescriptor};
use gamereview_server::server;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "gamereview", version, about = "Video-game review database backend")]
struct Cli {
    /// Path to the YAML configuration file (defaults to ./gamereview.yaml).
    #[arg(long, global = true, env = "GAMEREVIEW_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load the catalog and serve HTTP.
    Serve,

    /// Print the table whitelist the server would use, as YAML.
    Catalog,

    /// Check database connectivity. Exits non-zero when unreachable.
    Check,
}

#[derive(Serialize)]
struct CatalogDump<'a> {
    tables: Vec<&'a TableDescriptor>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = GameReviewConfig::load(cli.config.as_deref())?;
    init_tracing(&config.observability);

    match cli.cmd {
        Command::Serve => server::run(config).await,
        Command::Catalog => {
            let pool = connect_pool(&config.database, &config.catalog)?;
            let catalog = introspect::load_catalog(&pool, &config.catalog).await?;
            let dump = CatalogDump {
                tables: catalog.tables().collect(),
            };
            print!("{}", serde_yaml::to_string(&dump)?);
            pool.close().await;
            Ok(())
        }
        Command::Check => {
            let pool = connect_pool(&config.database, &config.catalog)?;
            let connected = check_connection(&pool).await;
            pool.close().await;
            if connected {
                println!("connected");
                Ok(())
            } else {
                println!("unable to connect");
                anyhow::bail!(
                    "database at {} is unreachable",
                    config.database.redacted_target()
                )
            }
        }
    }
}

/// `RUST_LOG` wins over the configured filter.
fn init_tracing(observability: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&observability.log_filter));

    match observability.log_format {
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init(),
    }
}

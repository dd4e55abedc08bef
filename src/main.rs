//! db-gateway - A minimal HTTP-to-SQL gateway for SQLite.

use db_gateway::cli::Cli;
use db_gateway::config::Config;
use db_gateway::error::Result;
use db_gateway::server::Server;
use db_gateway::{db, logging};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    logging::init_stderr_logging();

    if let Err(e) = run().await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse_args();

    // Load configuration file, then let CLI arguments and environment override it
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    cli.apply_to(&mut config);

    let db = db::connect(&config.database).await?;
    Server::new(&config, db).run().await
}

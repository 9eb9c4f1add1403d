//! User resource service: CLI entry point
//!
//! ```sh
//! # Run with default config (~/.config/user-resource/config.toml)
//! user-resource
//!
//! # Custom config path and port
//! user-resource --config /etc/user-resource/config.toml --port 8080
//!
//! # Throw-away store for local testing
//! user-resource --in-memory
//!
//! # Validate config without starting
//! user-resource --check
//! ```

use std::path::PathBuf;

use clap::Parser;
use tracing::{error, info};

use user_resource::config::AppConfig;
use user_resource::server::{init_tracing, run, ServerOptions};

/// User resource REST service.
#[derive(Parser, Debug)]
#[command(name = "user-resource", version, about = "User resource REST service")]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "USER_RESOURCE_CONFIG")]
    config: Option<PathBuf>,

    /// Override the listen port.
    #[arg(long)]
    port: Option<u16>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long)]
    log_level: Option<String>,

    /// Keep users in memory instead of the database.
    #[arg(long)]
    in_memory: bool,

    /// Validate the configuration file and exit without starting the server.
    #[arg(long)]
    check: bool,

    /// Skip database migrations on startup.
    #[arg(long)]
    no_migrate: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli
        .config
        .unwrap_or_else(user_resource::default_config_path);

    let mut config = match AppConfig::load(&config_path) {
        Ok(cfg) => cfg,
        Err(e) if cli.check => {
            eprintln!("Configuration is invalid: {}", e);
            return Err(e.into());
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config from {}: {}", config_path.display(), e);
            return Err(e.into());
        }
    };

    if let Some(port) = cli.port {
        config.server.port = port;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    if cli.check {
        println!("Configuration is valid");
        println!("   Config file : {}", config_path.display());
        println!("   API address : {}", config.server.address());
        println!("   Database    : {}", config.database.url);
        println!("   Log level   : {}", config.logging.level);
        println!("   bcrypt cost : {}", config.security.bcrypt_cost);
        return Ok(());
    }

    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    run(ServerOptions {
        config,
        auto_migrate: !cli.no_migrate,
        in_memory: cli.in_memory,
    })
    .await
}

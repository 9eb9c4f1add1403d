//! Server runtime.
//!
//! Wires configuration, storage, the user service and the REST API, then
//! serves until a shutdown signal arrives.

use std::sync::Arc;
use std::time::Instant;

use sea_orm_migration::MigratorTrait;
use tracing::{info, warn};

use crate::application::UserService;
use crate::config::AppConfig;
use crate::domain::UserRepositoryInterface;
use crate::infrastructure::database::migrator::Migrator;
use crate::infrastructure::{init_database, DatabaseConfig, InMemoryUserRepository, UserRepository};
use crate::interfaces::http::{create_api_router, AppState};
use crate::shared::shutdown_signal;

/// Options for starting the service.
pub struct ServerOptions {
    /// Application configuration.
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
    /// Keep users in process memory instead of the database (default: false).
    pub in_memory: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
            in_memory: false,
        }
    }
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

/// Run the service until SIGTERM / SIGINT.
pub async fn run(opts: ServerOptions) -> Result<(), Box<dyn std::error::Error>> {
    let app_cfg = opts.config;
    info!("Starting user resource service...");

    let mut db = None;
    let repo: Arc<dyn UserRepositoryInterface> = if opts.in_memory {
        warn!("Using in-memory user store; data is lost on exit");
        Arc::new(InMemoryUserRepository::new())
    } else {
        let db_config = DatabaseConfig {
            url: app_cfg.database.url.clone(),
        };
        let conn = init_database(&db_config).await?;

        if opts.auto_migrate {
            info!("Running database migrations...");
            Migrator::up(&conn, None).await?;
            info!("Migrations completed");
        }

        db = Some(conn.clone());
        Arc::new(UserRepository::new(conn))
    };

    let user_service = Arc::new(UserService::new(repo, app_cfg.security.bcrypt_cost));
    info!(
        "Password hashing: bcrypt cost {}",
        app_cfg.security.bcrypt_cost
    );

    let router = create_api_router(AppState {
        user_service,
        db: db.clone(),
        started_at: Arc::new(Instant::now()),
    });

    let addr = app_cfg.server.address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("REST API server stopped");

    if let Some(db) = db {
        if let Err(e) = db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("Database connection closed");
        }
    }

    info!("User resource service shutdown complete");
    Ok(())
}

//! # User Resource Service
//!
//! REST service managing user records: list, create (with a bcrypt-hashed
//! password), update and delete.
//!
//! ## Architecture
//!
//! - **domain**: the `User` record, request DTOs and the repository port
//! - **application**: `UserService`, the use-case orchestration
//! - **infrastructure**: bcrypt, SeaORM persistence and the in-memory store
//! - **interfaces**: axum handlers, router and OpenAPI documentation
//! - **shared**: error taxonomy, validation helpers, shutdown signal

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod shared;

pub use config::{default_config_path, AppConfig};

pub use infrastructure::{init_database, DatabaseConfig};

pub use interfaces::http::create_api_router;

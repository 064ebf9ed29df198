//! biztime: REST API over companies, invoices and industries.

pub mod config;
pub mod error;
pub mod handlers;
pub mod migration;
pub mod model;
pub mod response;
pub mod routes;
pub mod service;
pub mod slug;
pub mod state;
pub mod store;

pub use config::ServerConfig;
pub use error::{AppError, ConfigError};
pub use migration::{ensure_tables, seed_sample_data};
pub use routes::app;
pub use state::AppState;
pub use store::{ensure_database_exists, MemoryStore, PgStore, Store};

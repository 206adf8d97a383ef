//! Postgres connectivity for the marketplace services.
//!
//! - `postgres` (default): pooled SeaORM connections, retrying connect,
//!   migration runner and health probes (including the PostGIS extension).
//! - `config`: `core_config::FromEnv` for [`postgres::PostgresConfig`].
//!
//! ```ignore
//! use database::postgres;
//! use migration::Migrator;
//!
//! let db = postgres::connect_from_config_with_retry(config, None).await?;
//! postgres::run_migrations::<Migrator>(&db, "marketplace_api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use common::{DatabaseError, DatabaseResult};

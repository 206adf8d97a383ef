//! # Axum Helpers
//!
//! Shared HTTP plumbing for the marketplace services.
//!
//! - **[`errors`]**: `AppError` and the JSON error envelope
//! - **[`extractors`]**: `ValidatedJson` / `ValidatedQuery`
//! - **[`http`]**: CORS and security headers
//! - **[`server`]**: router assembly, health routes, graceful shutdown
//!
//! ```ignore
//! use axum_helpers::server::{create_production_app, create_router, health_router};
//!
//! let router = create_router::<ApiDoc>(api_routes, &config.server)?
//!     .merge(health_router(config.app));
//! create_production_app(router, &config.server, cleanup).await?;
//! ```

pub mod errors;
pub mod extractors;
pub mod http;
pub mod server;

pub use errors::{AppError, ErrorCode, ErrorResponse};
pub use extractors::{ValidatedJson, ValidatedQuery};
pub use http::{cors_layer_from_env, security_headers};
pub use server::{
    HealthCheckFuture, ShutdownCoordinator, create_production_app, create_router, health_router,
    run_health_checks, shutdown_signal,
};

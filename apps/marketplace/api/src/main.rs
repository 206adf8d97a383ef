use axum_helpers::server::{create_production_app, create_router, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use database::postgres::{connect_from_config_with_retry, run_migrations};
use domain_sellers::{NominatimGeocoder, PgSellerRepository, SellerService};
use eyre::WrapErr;
use tracing::info;

mod api;
mod config;
mod openapi;
mod state;

use config::Config;
use state::AppState;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Before anything fallible, so startup errors get colored reports
    install_color_eyre();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let db = connect_from_config_with_retry(config.database.clone(), None)
        .await
        .wrap_err("PostgreSQL connection failed")?;

    if config.run_migrations {
        run_migrations::<migration::Migrator>(&db, config.app.name)
            .await
            .wrap_err("Database migration failed")?;
    }

    let geocoder =
        NominatimGeocoder::new(&config.geocoder).wrap_err("Failed to build geocoder client")?;
    info!(url = %config.geocoder.base_url, timeout_secs = config.geocoder.timeout_secs, "Reverse geocoder configured");

    let state = AppState {
        sellers: SellerService::new(PgSellerRepository::new(db.clone()), geocoder),
        db,
        config,
    };

    let router = create_router::<openapi::ApiDoc>(api::routes(&state), &state.config.server)?;

    // /health: liveness with app name/version
    // /ready: database and PostGIS
    let app = router
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!(
        app = state.config.app.name,
        version = state.config.app.version,
        "Starting marketplace API"
    );

    let server = state.config.server.clone();
    create_production_app(app, &server, async move {
        info!("Shutting down: closing database connections");
        match state.db.close().await {
            Ok(_) => info!("PostgreSQL connection closed"),
            Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
        }
    })
    .await
    .wrap_err("Server error")?;

    info!("Marketplace API shutdown complete");
    Ok(())
}

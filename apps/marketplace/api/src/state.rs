//! Shared application state.

use database::postgres::DatabaseConnection;
use domain_sellers::{NominatimGeocoder, PgSellerRepository, SellerService};

pub type Sellers = SellerService<PgSellerRepository, NominatimGeocoder>;

/// Cloned into the readiness route; every field is a cheap handle
#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// PostgreSQL connection pool
    pub db: DatabaseConnection,
    pub sellers: Sellers,
}

//! Sellers Domain
//!
//! Nearby-seller discovery over factory locations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← POST /search, POST /search/city
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐     ┌──────────────┐
//! │   Service   │ ──► │   Geocoder   │  ← city fallback
//! └──────┬──────┘     └──────────────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← candidate retrieval (in-memory or PostGIS)
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Ranking   │  ← range filter, nearest factory per seller, top 20
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use domain_sellers::{
//!     handlers, FixedCityGeocoder, InMemorySellerRepository, SellerService,
//! };
//!
//! let service = SellerService::new(
//!     InMemorySellerRepository::new(),
//!     FixedCityGeocoder::new("Bengaluru"),
//! );
//! let router: axum::Router = handlers::router(service);
//! ```

pub mod entity;
pub mod error;
pub mod geo;
pub mod geocoding;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod ranking;
pub mod repository;
pub mod service;

pub use error::{SellerError, SellerResult};
pub use geo::{DEFAULT_MAX_DISTANCE_KM, DistanceRange, GeoPoint, RESULT_LIMIT, distance_km};
pub use geocoding::{
    FixedCityGeocoder, GeocoderConfig, GeocodingError, NominatimGeocoder, ReverseGeocoder,
};
pub use models::{
    CitySellersQuery, CreateFactory, CreateSeller, Factory, FactoryLocation, FactoryType,
    Location, NearbySeller, NearbySellersQuery, Seller, UpsertLocation,
};
pub use postgres::PgSellerRepository;
pub use repository::{InMemorySellerRepository, SellerRepository, SpatialQuery};
pub use service::SellerService;

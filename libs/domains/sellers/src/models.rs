use chrono::{DateTime, Utc};
use sea_orm::{DeriveActiveEnum, EnumIter, FromQueryResult};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::geo::{DEFAULT_MAX_DISTANCE_KM, GeoPoint};

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::new("phone_digits"));
    }
    Ok(())
}

/// Kind of premises a seller operates
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    Default,
    DeriveActiveEnum,
    EnumIter,
    ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "factory_type")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FactoryType {
    #[default]
    #[sea_orm(string_value = "factory")]
    Factory,
    #[sea_orm(string_value = "shop")]
    Shop,
    #[sea_orm(string_value = "warehouse")]
    Warehouse,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Seller {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Factory {
    pub id: Uuid,
    pub seller_id: Uuid,
    pub name: String,
    pub factory_type: FactoryType,
    pub contact_number: String,
    /// Free-form category tags, e.g. `["textiles", "wholesale"]`
    pub categories: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Street address and coordinates of a factory (at most one per factory)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Location {
    pub id: Uuid,
    pub factory_id: Uuid,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

impl Location {
    /// Always derived from the stored pair; `None` keeps the factory out of searches
    pub fn geo_point(&self) -> Option<GeoPoint> {
        GeoPoint::from_optional(self.latitude, self.longitude)
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSeller {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 7, max = 20), custom(function = "validate_phone"))]
    pub phone: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateFactory {
    pub seller_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[serde(default)]
    pub factory_type: FactoryType,
    #[validate(length(min = 7, max = 20), custom(function = "validate_phone"))]
    pub contact_number: String,
    #[serde(default)]
    pub categories: Vec<String>,
}

/// Create or replace the location of a factory.
///
/// Leaving either coordinate out keeps the factory out of every search.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct UpsertLocation {
    pub factory_id: Uuid,
    #[validate(length(min = 1, max = 255))]
    pub address_line1: String,
    pub address_line2: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub city: String,
    #[validate(length(min = 1, max = 100))]
    pub state: String,
    #[validate(length(min = 1, max = 100))]
    pub country: String,
    #[validate(length(min = 1, max = 12))]
    pub postal_code: String,
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
}

/// Radius search around a point
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NearbySellersQuery {
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "longitude must be between -180 and 180"))]
    pub longitude: f64,
    /// Only consider factories in this city (case-insensitive)
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
    /// Defaults to 0
    #[validate(range(min = 0.0))]
    pub min_distance_km: Option<f64>,
    /// Defaults to 500
    #[validate(range(min = 0.0))]
    #[schema(default = 500.0)]
    pub max_distance_km: Option<f64>,
}

impl NearbySellersQuery {
    pub fn at(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            city: None,
            min_distance_km: None,
            max_distance_km: None,
        }
    }

    pub fn min_km(&self) -> f64 {
        self.min_distance_km.unwrap_or(0.0)
    }

    pub fn max_km(&self) -> f64 {
        self.max_distance_km.unwrap_or(DEFAULT_MAX_DISTANCE_KM)
    }
}

/// Every seller in a city, nearest first.
///
/// Without `city` the point is reverse-geocoded to find one.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CitySellersQuery {
    #[validate(range(min = -90.0, max = 90.0, message = "latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "longitude must be between -180 and 180"))]
    pub longitude: f64,
    #[validate(length(min = 1, max = 100))]
    pub city: Option<String>,
}

/// One location row as read by a search, before ranking
#[derive(Debug, Clone, PartialEq, FromQueryResult)]
pub struct Candidate {
    pub seller_id: Uuid,
    pub seller_name: String,
    pub factory_id: Uuid,
    pub factory_name: String,
    pub factory_type: FactoryType,
    pub categories: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub address_line1: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub distance_km: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct FactoryLocation {
    pub latitude: f64,
    pub longitude: f64,
    pub address_line1: String,
    pub city: String,
    pub state: String,
    pub country: String,
    /// `address_line1, city, state, country`, skipping blank parts
    pub full_address: String,
}

/// A seller and the factory that matched the search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NearbySeller {
    pub seller_id: Uuid,
    pub seller_name: String,
    pub factory_id: Uuid,
    pub factory_name: String,
    pub factory_type: FactoryType,
    pub factory_categories: Vec<String>,
    /// Great-circle distance from the query point, unrounded
    pub distance_km: f64,
    pub factory_location: FactoryLocation,
}

fn full_address(parts: [&str; 4]) -> String {
    parts
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<Candidate> for NearbySeller {
    fn from(c: Candidate) -> Self {
        let full_address = full_address([&c.address_line1, &c.city, &c.state, &c.country]);

        Self {
            seller_id: c.seller_id,
            seller_name: c.seller_name,
            factory_id: c.factory_id,
            factory_name: c.factory_name,
            factory_type: c.factory_type,
            factory_categories: c.categories,
            distance_km: c.distance_km,
            factory_location: FactoryLocation {
                latitude: c.latitude,
                longitude: c.longitude,
                address_line1: c.address_line1,
                city: c.city,
                state: c.state,
                country: c.country,
                full_address,
            },
        }
    }
}

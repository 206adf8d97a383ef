use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{SellerError, SellerResult};
use crate::geo::{DistanceRange, GeoPoint, distance_km, expanded_limit};
use crate::models::{
    Candidate, CreateFactory, CreateSeller, Factory, Location, Seller, UpsertLocation,
};

/// Candidate retrieval for a radius search
#[derive(Debug, Clone, PartialEq)]
pub struct SpatialQuery {
    pub origin: GeoPoint,
    /// Locations further than this are never read
    pub max_radius_m: f64,
    /// Nearest-first cap on rows read before per-seller ranking
    pub candidate_limit: u64,
    /// Case-insensitive exact match on the location city
    pub city: Option<String>,
}

impl SpatialQuery {
    pub fn new(origin: GeoPoint, range: DistanceRange, city: Option<String>) -> Self {
        Self {
            origin,
            max_radius_m: range.max_radius_m(),
            candidate_limit: expanded_limit(range.max_km),
            city,
        }
    }

    fn max_km(&self) -> f64 {
        self.max_radius_m / 1000.0
    }
}

/// Storage of sellers, factories and their locations
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SellerRepository: Send + Sync {
    /// Locations within `max_radius_m` of the origin, nearest first, at most
    /// `candidate_limit` rows, each with its exact distance
    async fn nearby_candidates(&self, query: SpatialQuery) -> SellerResult<Vec<Candidate>>;

    /// Every located factory in `city`, with its distance from `origin`
    async fn sellers_in_city(&self, origin: GeoPoint, city: String)
    -> SellerResult<Vec<Candidate>>;

    async fn create_seller(&self, input: CreateSeller) -> SellerResult<Seller>;

    async fn create_factory(&self, input: CreateFactory) -> SellerResult<Factory>;

    /// Insert or replace the location of a factory
    async fn upsert_location(&self, input: UpsertLocation) -> SellerResult<Location>;

    async fn get_location(&self, factory_id: Uuid) -> SellerResult<Option<Location>>;
}

#[derive(Debug, Default)]
struct Store {
    sellers: HashMap<Uuid, Seller>,
    factories: HashMap<Uuid, Factory>,
    /// Keyed by factory id
    locations: HashMap<Uuid, Location>,
}

impl Store {
    /// Join every located factory with its seller, measuring from `origin`
    fn candidates(&self, origin: GeoPoint) -> impl Iterator<Item = Candidate> + '_ {
        self.locations.values().filter_map(move |location| {
            let point = location.geo_point()?;
            let factory = self.factories.get(&location.factory_id)?;
            let seller = self.sellers.get(&factory.seller_id)?;

            Some(Candidate {
                seller_id: seller.id,
                seller_name: seller.name.clone(),
                factory_id: factory.id,
                factory_name: factory.name.clone(),
                factory_type: factory.factory_type,
                categories: factory.categories.clone(),
                latitude: point.latitude(),
                longitude: point.longitude(),
                address_line1: location.address_line1.clone(),
                city: location.city.clone(),
                state: location.state.clone(),
                country: location.country.clone(),
                distance_km: distance_km(origin, point),
            })
        })
    }
}

fn same_city(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// In-memory implementation of SellerRepository (for development/testing).
///
/// Points are computed from latitude/longitude on every read, so a location
/// update is visible to the next search without any sync step.
#[derive(Debug, Default, Clone)]
pub struct InMemorySellerRepository {
    store: Arc<RwLock<Store>>,
}

impl InMemorySellerRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SellerRepository for InMemorySellerRepository {
    async fn nearby_candidates(&self, query: SpatialQuery) -> SellerResult<Vec<Candidate>> {
        let store = self.store.read().await;
        let max_km = query.max_km();

        let mut candidates: Vec<Candidate> = store
            .candidates(query.origin)
            .filter(|c| c.distance_km <= max_km)
            .filter(|c| query.city.as_deref().is_none_or(|city| same_city(&c.city, city)))
            .collect();

        candidates.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        candidates.truncate(usize::try_from(query.candidate_limit).unwrap_or(usize::MAX));

        Ok(candidates)
    }

    async fn sellers_in_city(
        &self,
        origin: GeoPoint,
        city: String,
    ) -> SellerResult<Vec<Candidate>> {
        let store = self.store.read().await;
        Ok(store
            .candidates(origin)
            .filter(|c| same_city(&c.city, &city))
            .collect())
    }

    async fn create_seller(&self, input: CreateSeller) -> SellerResult<Seller> {
        let mut store = self.store.write().await;

        let email = input.email.to_lowercase();
        if store.sellers.values().any(|s| s.email == email) {
            return Err(SellerError::Conflict(format!(
                "Seller with email '{}' already exists",
                email
            )));
        }

        let seller = Seller {
            id: Uuid::now_v7(),
            name: input.name,
            email,
            phone: input.phone,
            created_at: Utc::now(),
        };
        store.sellers.insert(seller.id, seller.clone());

        tracing::info!(seller_id = %seller.id, "Created seller");
        Ok(seller)
    }

    async fn create_factory(&self, input: CreateFactory) -> SellerResult<Factory> {
        let mut store = self.store.write().await;

        if !store.sellers.contains_key(&input.seller_id) {
            return Err(SellerError::NotFound(format!("Seller {}", input.seller_id)));
        }

        let factory = Factory {
            id: Uuid::now_v7(),
            seller_id: input.seller_id,
            name: input.name,
            factory_type: input.factory_type,
            contact_number: input.contact_number,
            categories: input.categories,
            created_at: Utc::now(),
        };
        store.factories.insert(factory.id, factory.clone());

        tracing::info!(factory_id = %factory.id, seller_id = %factory.seller_id, "Created factory");
        Ok(factory)
    }

    async fn upsert_location(&self, input: UpsertLocation) -> SellerResult<Location> {
        let mut store = self.store.write().await;

        if !store.factories.contains_key(&input.factory_id) {
            return Err(SellerError::NotFound(format!("Factory {}", input.factory_id)));
        }

        let id = store
            .locations
            .get(&input.factory_id)
            .map(|existing| existing.id)
            .unwrap_or_else(Uuid::now_v7);

        let location = Location {
            id,
            factory_id: input.factory_id,
            address_line1: input.address_line1,
            address_line2: input.address_line2,
            city: input.city,
            state: input.state,
            country: input.country,
            postal_code: input.postal_code,
            latitude: input.latitude,
            longitude: input.longitude,
            updated_at: Utc::now(),
        };
        store.locations.insert(location.factory_id, location.clone());

        tracing::info!(factory_id = %location.factory_id, "Stored factory location");
        Ok(location)
    }

    async fn get_location(&self, factory_id: Uuid) -> SellerResult<Option<Location>> {
        let store = self.store.read().await;
        Ok(store.locations.get(&factory_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FactoryType;

    async fn seed_factory(
        repo: &InMemorySellerRepository,
        email: &str,
        city: &str,
        coords: Option<(f64, f64)>,
    ) -> Factory {
        let seller = repo
            .create_seller(CreateSeller {
                name: format!("Seller {email}"),
                email: email.to_string(),
                phone: "+919800000000".to_string(),
            })
            .await
            .unwrap();
        let factory = repo
            .create_factory(CreateFactory {
                seller_id: seller.id,
                name: format!("{city} unit"),
                factory_type: FactoryType::Factory,
                contact_number: "+919800000001".to_string(),
                categories: vec![],
            })
            .await
            .unwrap();
        repo.upsert_location(UpsertLocation {
            factory_id: factory.id,
            address_line1: "1 Main Road".to_string(),
            address_line2: None,
            city: city.to_string(),
            state: "Karnataka".to_string(),
            country: "India".to_string(),
            postal_code: "560001".to_string(),
            latitude: coords.map(|c| c.0),
            longitude: coords.map(|c| c.1),
        })
        .await
        .unwrap();
        factory
    }

    fn bangalore() -> GeoPoint {
        GeoPoint::new(12.9716, 77.5946).unwrap()
    }

    #[tokio::test]
    async fn test_spatial_query_sizing() {
        let query = SpatialQuery::new(bangalore(), DistanceRange::new(0.0, 30.0), None);
        assert_eq!(query.max_radius_m, 30_000.0);
        assert_eq!(query.candidate_limit, 60);
    }

    #[tokio::test]
    async fn test_nearby_candidates_respects_radius_and_order() {
        let repo = InMemorySellerRepository::new();
        let near = seed_factory(&repo, "a@example.com", "Bengaluru", Some((12.98, 77.60))).await;
        let far = seed_factory(&repo, "b@example.com", "Mysuru", Some((12.2958, 76.6394))).await;
        seed_factory(&repo, "c@example.com", "Chennai", Some((13.0827, 80.2707))).await;

        let query = SpatialQuery::new(bangalore(), DistanceRange::new(0.0, 200.0), None);
        let found = repo.nearby_candidates(query).await.unwrap();

        let ids: Vec<_> = found.iter().map(|c| c.factory_id).collect();
        assert_eq!(ids, vec![near.id, far.id]);
    }

    #[tokio::test]
    async fn test_nearby_candidates_city_filter_is_case_insensitive() {
        let repo = InMemorySellerRepository::new();
        let factory = seed_factory(&repo, "a@example.com", "Bengaluru", Some((12.98, 77.60))).await;
        seed_factory(&repo, "b@example.com", "Tumakuru", Some((13.3379, 77.1173))).await;

        let query = SpatialQuery::new(
            bangalore(),
            DistanceRange::default(),
            Some("BENGALURU".to_string()),
        );
        let found = repo.nearby_candidates(query).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].factory_id, factory.id);
    }

    #[tokio::test]
    async fn test_unlocated_factories_are_never_candidates() {
        let repo = InMemorySellerRepository::new();
        seed_factory(&repo, "a@example.com", "Bengaluru", None).await;

        let query = SpatialQuery::new(bangalore(), DistanceRange::default(), None);
        assert!(repo.nearby_candidates(query).await.unwrap().is_empty());
        assert!(
            repo.sellers_in_city(bangalore(), "Bengaluru".to_string())
                .await
                .unwrap()
                .is_empty()
        );
    }

    #[tokio::test]
    async fn test_upsert_location_replaces_in_place() {
        let repo = InMemorySellerRepository::new();
        let factory = seed_factory(&repo, "a@example.com", "Bengaluru", Some((12.98, 77.60))).await;
        let first = repo.get_location(factory.id).await.unwrap().unwrap();

        let moved = repo
            .upsert_location(UpsertLocation {
                factory_id: factory.id,
                address_line1: "2 Anna Salai".to_string(),
                address_line2: None,
                city: "Chennai".to_string(),
                state: "Tamil Nadu".to_string(),
                country: "India".to_string(),
                postal_code: "600002".to_string(),
                latitude: Some(13.0827),
                longitude: Some(80.2707),
            })
            .await
            .unwrap();

        assert_eq!(moved.id, first.id);
        let in_chennai = repo
            .sellers_in_city(bangalore(), "chennai".to_string())
            .await
            .unwrap();
        assert_eq!(in_chennai.len(), 1);
        assert!(in_chennai[0].distance_km > 250.0);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let repo = InMemorySellerRepository::new();
        seed_factory(&repo, "dup@example.com", "Bengaluru", None).await;

        let result = repo
            .create_seller(CreateSeller {
                name: "Other".to_string(),
                email: "DUP@example.com".to_string(),
                phone: "+919800000002".to_string(),
            })
            .await;
        assert!(matches!(result, Err(SellerError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_unknown_parents_are_not_found() {
        let repo = InMemorySellerRepository::new();

        let factory = repo
            .create_factory(CreateFactory {
                seller_id: Uuid::now_v7(),
                name: "Orphan".to_string(),
                factory_type: FactoryType::Shop,
                contact_number: "+919800000003".to_string(),
                categories: vec![],
            })
            .await;
        assert!(matches!(factory, Err(SellerError::NotFound(_))));

        let location = repo
            .upsert_location(UpsertLocation {
                factory_id: Uuid::now_v7(),
                address_line1: "x".to_string(),
                address_line2: None,
                city: "x".to_string(),
                state: "x".to_string(),
                country: "x".to_string(),
                postal_code: "x".to_string(),
                latitude: None,
                longitude: None,
            })
            .await;
        assert!(matches!(location, Err(SellerError::NotFound(_))));
    }
}

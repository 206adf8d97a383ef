use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{SellerError, SellerResult};
use crate::geo::{DistanceRange, GeoPoint, RESULT_LIMIT};
use crate::geocoding::ReverseGeocoder;
use crate::models::{
    CitySellersQuery, CreateFactory, CreateSeller, Factory, Location, NearbySeller,
    NearbySellersQuery, Seller, UpsertLocation,
};
use crate::ranking::{rank_nearest_per_seller, sort_by_distance};
use crate::repository::{SellerRepository, SpatialQuery};

/// Proximity search over seller factory locations
pub struct SellerService<R: SellerRepository, G: ReverseGeocoder> {
    repository: Arc<R>,
    geocoder: Arc<G>,
}

impl<R: SellerRepository, G: ReverseGeocoder> Clone for SellerService<R, G> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            geocoder: Arc::clone(&self.geocoder),
        }
    }
}

impl<R: SellerRepository, G: ReverseGeocoder> SellerService<R, G> {
    pub fn new(repository: R, geocoder: G) -> Self {
        Self {
            repository: Arc::new(repository),
            geocoder: Arc::new(geocoder),
        }
    }

    /// Up to 20 sellers ranked by the distance of their nearest factory.
    ///
    /// Every result lies inside `[min_distance_km, max_distance_km]`, each
    /// seller appears once, and the list is sorted nearest first. An inverted
    /// range yields an empty list.
    #[instrument(skip(self), fields(lat = query.latitude, lon = query.longitude))]
    pub async fn find_nearby_sellers(
        &self,
        query: NearbySellersQuery,
    ) -> SellerResult<Vec<NearbySeller>> {
        query.validate()?;

        let origin = GeoPoint::new(query.latitude, query.longitude)?;
        let range = DistanceRange::new(query.min_km(), query.max_km());
        if range.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = self
            .repository
            .nearby_candidates(SpatialQuery::new(origin, range, query.city))
            .await?;
        let read = candidates.len();

        let ranked = rank_nearest_per_seller(candidates, range, RESULT_LIMIT);
        tracing::debug!(candidates = read, results = ranked.len(), "Ranked nearby sellers");

        Ok(ranked.into_iter().map(NearbySeller::from).collect())
    }

    /// Every factory in a city, nearest first, with no radius or limit.
    ///
    /// Without an explicit city the query point is reverse-geocoded. A failed
    /// or empty lookup is [`SellerError::CityNotResolved`].
    #[instrument(skip(self), fields(lat = query.latitude, lon = query.longitude))]
    pub async fn find_sellers_for_city(
        &self,
        query: CitySellersQuery,
    ) -> SellerResult<Vec<NearbySeller>> {
        query.validate()?;

        let origin = GeoPoint::new(query.latitude, query.longitude)?;
        let city = match query.city {
            Some(city) => city,
            None => self.resolve_city(origin).await?,
        };

        let candidates = self.repository.sellers_in_city(origin, city).await?;
        Ok(sort_by_distance(candidates)
            .into_iter()
            .map(NearbySeller::from)
            .collect())
    }

    async fn resolve_city(&self, origin: GeoPoint) -> SellerResult<String> {
        let unresolved = SellerError::CityNotResolved {
            latitude: origin.latitude(),
            longitude: origin.longitude(),
        };

        match self.geocoder.resolve_city(origin).await {
            Ok(Some(city)) => Ok(city),
            Ok(None) => Err(unresolved),
            Err(e) => {
                tracing::warn!(error = %e, "Reverse geocoding failed");
                Err(unresolved)
            }
        }
    }

    pub async fn register_seller(&self, input: CreateSeller) -> SellerResult<Seller> {
        input.validate()?;
        self.repository.create_seller(input).await
    }

    pub async fn add_factory(&self, input: CreateFactory) -> SellerResult<Factory> {
        input.validate()?;
        self.repository.create_factory(input).await
    }

    /// Create or move a factory's location; the next search sees the new point
    pub async fn set_factory_location(&self, input: UpsertLocation) -> SellerResult<Location> {
        input.validate()?;
        self.repository.upsert_location(input).await
    }

    pub async fn get_factory_location(&self, factory_id: Uuid) -> SellerResult<Location> {
        self.repository
            .get_location(factory_id)
            .await?
            .ok_or_else(|| SellerError::NotFound(format!("Location of factory {}", factory_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocoding::{FixedCityGeocoder, GeocodingError, MockReverseGeocoder};
    use crate::models::{Candidate, FactoryType};
    use crate::repository::{InMemorySellerRepository, MockSellerRepository};
    use mockall::predicate::eq;

    const BANGALORE: (f64, f64) = (12.9716, 77.5946);

    fn candidate(seller_id: Uuid, factory_id: Uuid, distance_km: f64) -> Candidate {
        Candidate {
            seller_id,
            seller_name: "Seller".to_string(),
            factory_id,
            factory_name: "Factory".to_string(),
            factory_type: FactoryType::Factory,
            categories: vec![],
            latitude: 0.0,
            longitude: 0.0,
            address_line1: "1 Main Road".to_string(),
            city: "Bengaluru".to_string(),
            state: "Karnataka".to_string(),
            country: "India".to_string(),
            distance_km,
        }
    }

    /// Seed one seller with a factory at each of `points`, all in `city`
    async fn seed(
        service: &SellerService<InMemorySellerRepository, FixedCityGeocoder>,
        email: &str,
        city: &str,
        points: &[(f64, f64)],
    ) -> (Seller, Vec<Factory>) {
        let seller = service
            .register_seller(CreateSeller {
                name: format!("Seller {email}"),
                email: email.to_string(),
                phone: "+919812345678".to_string(),
            })
            .await
            .unwrap();

        let mut factories = Vec::new();
        for (i, &(lat, lon)) in points.iter().enumerate() {
            let factory = service
                .add_factory(CreateFactory {
                    seller_id: seller.id,
                    name: format!("Unit {i}"),
                    factory_type: FactoryType::Warehouse,
                    contact_number: "+919812345679".to_string(),
                    categories: vec!["textiles".to_string()],
                })
                .await
                .unwrap();
            service
                .set_factory_location(location(factory.id, city, lat, lon))
                .await
                .unwrap();
            factories.push(factory);
        }
        (seller, factories)
    }

    fn location(factory_id: Uuid, city: &str, lat: f64, lon: f64) -> UpsertLocation {
        UpsertLocation {
            factory_id,
            address_line1: "1 Main Road".to_string(),
            address_line2: None,
            city: city.to_string(),
            state: "Karnataka".to_string(),
            country: "India".to_string(),
            postal_code: "560001".to_string(),
            latitude: Some(lat),
            longitude: Some(lon),
        }
    }

    fn in_memory(city: Option<&str>) -> SellerService<InMemorySellerRepository, FixedCityGeocoder> {
        SellerService::new(
            InMemorySellerRepository::new(),
            FixedCityGeocoder(city.map(str::to_string)),
        )
    }

    #[tokio::test]
    async fn test_seller_at_query_point_ranks_first() {
        let service = in_memory(None);
        let (far, _) = seed(&service, "far@example.com", "Mysuru", &[(12.2958, 76.6394)]).await;
        let (here, _) = seed(&service, "here@example.com", "Bengaluru", &[BANGALORE]).await;

        let results = service
            .find_nearby_sellers(NearbySellersQuery::at(BANGALORE.0, BANGALORE.1))
            .await
            .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].seller_id, here.id);
        assert!(results[0].distance_km.abs() < 1e-6);
        assert_eq!(results[1].seller_id, far.id);
        assert!(results[1].distance_km > 100.0);
    }

    #[tokio::test]
    async fn test_only_nearest_factory_per_seller() {
        let service = in_memory(None);
        let (seller, factories) = seed(
            &service,
            "multi@example.com",
            "Bengaluru",
            &[(13.10, 77.59), (12.98, 77.60)],
        )
        .await;

        let results = service
            .find_nearby_sellers(NearbySellersQuery::at(BANGALORE.0, BANGALORE.1))
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].seller_id, seller.id);
        assert_eq!(results[0].factory_id, factories[1].id);
        assert_eq!(results[0].factory_categories, vec!["textiles".to_string()]);
    }

    #[tokio::test]
    async fn test_inverted_range_is_empty_without_querying() {
        let mut repository = MockSellerRepository::new();
        repository.expect_nearby_candidates().never();
        let service = SellerService::new(repository, MockReverseGeocoder::new());

        let results = service
            .find_nearby_sellers(NearbySellersQuery {
                min_distance_km: Some(10.0),
                max_distance_km: Some(5.0),
                ..NearbySellersQuery::at(BANGALORE.0, BANGALORE.1)
            })
            .await
            .unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_min_distance_excludes_close_sellers() {
        let service = in_memory(None);
        seed(&service, "here@example.com", "Bengaluru", &[BANGALORE]).await;
        let (tumakuru, _) =
            seed(&service, "tk@example.com", "Tumakuru", &[(13.3379, 77.1173)]).await;

        let results = service
            .find_nearby_sellers(NearbySellersQuery {
                min_distance_km: Some(10.0),
                max_distance_km: Some(100.0),
                ..NearbySellersQuery::at(BANGALORE.0, BANGALORE.1)
            })
            .await
            .unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].seller_id, tumakuru.id);
    }

    #[tokio::test]
    async fn test_nearby_requests_expanded_candidate_set() {
        let seller = Uuid::from_u128(1);
        let mut repository = MockSellerRepository::new();
        repository
            .expect_nearby_candidates()
            .withf(|q| q.candidate_limit == 200 && q.max_radius_m == 500_000.0 && q.city.is_none())
            .times(1)
            .returning(move |_| {
                Ok(vec![
                    candidate(seller, Uuid::from_u128(11), 3.0),
                    candidate(seller, Uuid::from_u128(10), 3.0),
                    candidate(Uuid::from_u128(2), Uuid::from_u128(20), 1.0),
                ])
            });
        let service = SellerService::new(repository, MockReverseGeocoder::new());

        let results = service
            .find_nearby_sellers(NearbySellersQuery::at(BANGALORE.0, BANGALORE.1))
            .await
            .unwrap();

        let factories: Vec<_> = results.iter().map(|r| r.factory_id).collect();
        assert_eq!(factories, vec![Uuid::from_u128(20), Uuid::from_u128(10)]);
    }

    #[tokio::test]
    async fn test_nearby_caps_results() {
        let mut repository = MockSellerRepository::new();
        repository.expect_nearby_candidates().returning(|_| {
            Ok((0..50u128)
                .map(|i| candidate(Uuid::from_u128(i), Uuid::from_u128(1000 + i), i as f64))
                .collect())
        });
        let service = SellerService::new(repository, MockReverseGeocoder::new());

        let results = service
            .find_nearby_sellers(NearbySellersQuery::at(BANGALORE.0, BANGALORE.1))
            .await
            .unwrap();

        assert_eq!(results.len(), RESULT_LIMIT);
        assert!(results.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
    }

    #[tokio::test]
    async fn test_nearby_rejects_bad_coordinates() {
        let service = in_memory(None);
        let result = service.find_nearby_sellers(NearbySellersQuery::at(95.0, 0.0)).await;
        assert!(matches!(result, Err(SellerError::Validation(_))));
    }

    #[tokio::test]
    async fn test_repository_failure_aborts_search() {
        let mut repository = MockSellerRepository::new();
        repository
            .expect_nearby_candidates()
            .returning(|_| Err(SellerError::Internal("connection reset".to_string())));
        let service = SellerService::new(repository, MockReverseGeocoder::new());

        let result = service
            .find_nearby_sellers(NearbySellersQuery::at(BANGALORE.0, BANGALORE.1))
            .await;
        assert!(matches!(result, Err(SellerError::Internal(_))));
    }

    #[tokio::test]
    async fn test_city_with_no_sellers_is_empty() {
        let service = in_memory(None);
        seed(&service, "here@example.com", "Bengaluru", &[BANGALORE]).await;

        let results = service
            .find_sellers_for_city(CitySellersQuery {
                latitude: BANGALORE.0,
                longitude: BANGALORE.1,
                city: Some("Chennai".to_string()),
            })
            .await
            .unwrap();

        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_city_listing_keeps_every_factory_sorted() {
        let service = in_memory(Some("bengaluru"));
        let (_, factories) = seed(
            &service,
            "multi@example.com",
            "Bengaluru",
            &[(13.10, 77.59), (12.98, 77.60)],
        )
        .await;
        seed(&service, "far@example.com", "Bengaluru", &[(12.85, 77.66)]).await;
        seed(&service, "other@example.com", "Mysuru", &[(12.2958, 76.6394)]).await;

        let results = service
            .find_sellers_for_city(CitySellersQuery {
                latitude: BANGALORE.0,
                longitude: BANGALORE.1,
                city: None,
            })
            .await
            .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].factory_id, factories[1].id);
        assert!(results.windows(2).all(|w| w[0].distance_km <= w[1].distance_km));
        assert!(results.iter().all(|r| r.factory_location.city == "Bengaluru"));
    }

    #[tokio::test]
    async fn test_explicit_city_skips_geocoder() {
        let mut geocoder = MockReverseGeocoder::new();
        geocoder.expect_resolve_city().never();
        let mut repository = MockSellerRepository::new();
        repository
            .expect_sellers_in_city()
            .with(mockall::predicate::always(), eq("Chennai".to_string()))
            .times(1)
            .returning(|_, _| Ok(vec![]));
        let service = SellerService::new(repository, geocoder);

        let results = service
            .find_sellers_for_city(CitySellersQuery {
                latitude: 13.0827,
                longitude: 80.2707,
                city: Some("Chennai".to_string()),
            })
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_geocoder_failure_is_city_not_resolved() {
        let mut geocoder = MockReverseGeocoder::new();
        geocoder
            .expect_resolve_city()
            .times(1)
            .returning(|_| Err(GeocodingError::Timeout));
        let mut repository = MockSellerRepository::new();
        repository.expect_sellers_in_city().never();
        let service = SellerService::new(repository, geocoder);

        let result = service
            .find_sellers_for_city(CitySellersQuery {
                latitude: BANGALORE.0,
                longitude: BANGALORE.1,
                city: None,
            })
            .await;

        assert!(matches!(result, Err(SellerError::CityNotResolved { .. })));
    }

    #[tokio::test]
    async fn test_empty_geocoder_answer_is_city_not_resolved() {
        let service = in_memory(None);
        let result = service
            .find_sellers_for_city(CitySellersQuery {
                latitude: 0.0,
                longitude: -30.0,
                city: None,
            })
            .await;

        assert!(matches!(
            result,
            Err(SellerError::CityNotResolved { latitude, longitude }) if latitude == 0.0 && longitude == -30.0
        ));
    }

    #[tokio::test]
    async fn test_moving_a_factory_changes_results() {
        let service = in_memory(None);
        let (seller, factories) =
            seed(&service, "mover@example.com", "Chennai", &[(13.0827, 80.2707)]).await;

        let nearby = NearbySellersQuery {
            max_distance_km: Some(50.0),
            ..NearbySellersQuery::at(BANGALORE.0, BANGALORE.1)
        };
        assert!(service.find_nearby_sellers(nearby.clone()).await.unwrap().is_empty());

        service
            .set_factory_location(location(factories[0].id, "Bengaluru", 12.98, 77.60))
            .await
            .unwrap();

        let results = service.find_nearby_sellers(nearby).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].seller_id, seller.id);
        assert!(results[0].distance_km < 2.0);
    }

    #[tokio::test]
    async fn test_get_factory_location_not_found() {
        let service = in_memory(None);
        let result = service.get_factory_location(Uuid::now_v7()).await;
        assert!(matches!(result, Err(SellerError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_register_seller_validates() {
        let service = in_memory(None);
        let result = service
            .register_seller(CreateSeller {
                name: "Bad".to_string(),
                email: "not-an-email".to_string(),
                phone: "+91".to_string(),
            })
            .await;
        assert!(matches!(result, Err(SellerError::Validation(_))));
    }
}

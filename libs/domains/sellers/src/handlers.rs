use axum::{Json, Router, extract::State, routing::post};
use axum_helpers::{
    ValidatedJson,
    errors::responses::{
        BadRequestValidationResponse, InternalServerErrorResponse, UnresolvableLocationResponse,
    },
};
use std::sync::Arc;
use utoipa::OpenApi;

use crate::error::SellerResult;
use crate::geocoding::ReverseGeocoder;
use crate::models::{CitySellersQuery, FactoryLocation, FactoryType, NearbySeller, NearbySellersQuery};
use crate::repository::SellerRepository;
use crate::service::SellerService;

pub const TAG: &str = "sellers";

#[derive(OpenApi)]
#[openapi(
    paths(search_nearby, search_city),
    components(
        schemas(NearbySellersQuery, CitySellersQuery, NearbySeller, FactoryLocation, FactoryType),
        responses(
            BadRequestValidationResponse,
            UnresolvableLocationResponse,
            InternalServerErrorResponse
        )
    ),
    tags(
        (name = TAG, description = "Nearby seller discovery")
    )
)]
pub struct ApiDoc;

pub fn router<R, G>(service: SellerService<R, G>) -> Router
where
    R: SellerRepository + 'static,
    G: ReverseGeocoder + 'static,
{
    Router::new()
        .route("/search", post(search_nearby))
        .route("/search/city", post(search_city))
        .with_state(Arc::new(service))
}

/// Sellers near a point, one row per seller with its nearest factory
#[utoipa::path(
    post,
    path = "/search",
    tag = TAG,
    request_body = NearbySellersQuery,
    responses(
        (status = 200, description = "At most 20 sellers, nearest first", body = Vec<NearbySeller>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_nearby<R: SellerRepository, G: ReverseGeocoder>(
    State(service): State<Arc<SellerService<R, G>>>,
    ValidatedJson(query): ValidatedJson<NearbySellersQuery>,
) -> SellerResult<Json<Vec<NearbySeller>>> {
    let sellers = service.find_nearby_sellers(query).await?;
    Ok(Json(sellers))
}

/// Every factory in a city, nearest first.
///
/// The city is reverse-geocoded from the point when not given.
#[utoipa::path(
    post,
    path = "/search/city",
    tag = TAG,
    request_body = CitySellersQuery,
    responses(
        (status = 200, description = "All factories in the city, nearest first", body = Vec<NearbySeller>),
        (status = 400, response = BadRequestValidationResponse),
        (status = 404, response = UnresolvableLocationResponse),
        (status = 500, response = InternalServerErrorResponse)
    )
)]
async fn search_city<R: SellerRepository, G: ReverseGeocoder>(
    State(service): State<Arc<SellerService<R, G>>>,
    ValidatedJson(query): ValidatedJson<CitySellersQuery>,
) -> SellerResult<Json<Vec<NearbySeller>>> {
    let sellers = service.find_sellers_for_city(query).await?;
    Ok(Json(sellers))
}

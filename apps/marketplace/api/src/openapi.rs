use utoipa::OpenApi;

/// Served at `/api-docs/openapi.json` and by every docs UI
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Marketplace API",
        description = "Nearby seller discovery for the marketplace"
    ),
    nest(
        (path = "/api/sellers", api = domain_sellers::handlers::ApiDoc)
    )
)]
pub struct ApiDoc;

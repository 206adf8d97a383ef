use super::shutdown::ShutdownCoordinator;
use crate::errors::handlers::not_found;
use crate::http::{cors_layer_from_env, security_headers};
use axum::{Router, middleware};
use core_config::server::ServerConfig;
use std::io;
use tower_http::compression::CompressionLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info, warn};
use utoipa::OpenApi;

/// Wrap the API routes with documentation UIs and cross-cutting layers.
///
/// - `apis` is nested under `/api` and must already carry its state
/// - `/swagger-ui`, `/redoc`, `/rapidoc`, `/scalar` serve `T::openapi()`
/// - tracing, security headers, CORS (`CORS_ALLOWED_ORIGIN`), a per-request
///   timeout from `server.request_timeout()`, and response compression
///
/// Health routes are not included; merge [`health_router`](super::health_router)
/// and the app's own readiness route on top.
pub fn create_router<T>(apis: Router, server: &ServerConfig) -> io::Result<Router>
where
    T: OpenApi + 'static,
{
    use utoipa_rapidoc::RapiDoc;
    use utoipa_redoc::{Redoc, Servable as RedocServable};
    use utoipa_scalar::{Scalar, Servable as ScalarServable};
    use utoipa_swagger_ui::SwaggerUi;

    let cors = cors_layer_from_env()?;

    #[allow(deprecated)]
    let timeout = TimeoutLayer::new(server.request_timeout());

    let router = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", T::openapi()))
        .merge(Redoc::with_url("/redoc", T::openapi()))
        .merge(RapiDoc::new("/api-docs/openapi.json").path("/rapidoc"))
        .merge(Scalar::with_url("/scalar", T::openapi()))
        .nest("/api", apis)
        .fallback(not_found)
        .layer(timeout)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(middleware::from_fn(security_headers))
        .layer(cors)
        .layer(CompressionLayer::new());

    Ok(router)
}

/// Serve `router` until SIGINT/SIGTERM, then run `cleanup`.
///
/// `cleanup` (closing the database pool, for instance) gets at most
/// `server.shutdown_grace()` before the process moves on.
pub async fn create_production_app<F>(
    router: Router,
    server: &ServerConfig,
    cleanup: F,
) -> io::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let coordinator = ShutdownCoordinator::new();
    let grace = server.shutdown_grace();

    let listener = tokio::net::TcpListener::bind(server.address()).await?;
    info!("Server listening on {}", listener.local_addr()?);

    let signal_watcher = coordinator.clone();
    let cleanup_handle = tokio::spawn(async move {
        signal_watcher.wait_for_signal().await;

        info!(?grace, "running cleanup");
        if tokio::time::timeout(grace, cleanup).await.is_err() {
            warn!(?grace, "cleanup exceeded its grace period");
        }
    });

    let serve_result = axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(async move { coordinator.cancelled().await })
        .await
        .inspect_err(|e| tracing::error!("Server error: {:?}", e));

    cleanup_handle.await.ok();

    serve_result
}

use crate::errors::AppError;
use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;
use validator::Validate;

/// Query string counterpart of [`ValidatedJson`](super::ValidatedJson)
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(data) = Query::<T>::from_request_parts(parts, state).await?;
        data.validate()?;
        Ok(ValidatedQuery(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::{Request, StatusCode}, routing::get};
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize, Validate)]
    struct Point {
        #[validate(range(min = -90.0, max = 90.0))]
        latitude: f64,
    }

    fn app() -> Router {
        Router::new().route(
            "/",
            get(|ValidatedQuery(p): ValidatedQuery<Point>| async move { p.latitude.to_string() }),
        )
    }

    async fn status(uri: &str) -> StatusCode {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        app().oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn test_query_validation() {
        assert_eq!(status("/?latitude=12.97").await, StatusCode::OK);
        assert_eq!(status("/?latitude=120").await, StatusCode::BAD_REQUEST);
        assert_eq!(status("/?latitude=north").await, StatusCode::BAD_REQUEST);
    }
}

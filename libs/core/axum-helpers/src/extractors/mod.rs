//! Extractors that validate their payload with the `validator` crate before
//! the handler runs. Failures become [`AppError`](crate::AppError) responses.

pub mod validated_json;
pub mod validated_query;

pub use validated_json::ValidatedJson;
pub use validated_query::ValidatedQuery;

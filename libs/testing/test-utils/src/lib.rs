//! Shared test utilities for domain testing
//!
//! - `TestDatabase`: migrated PostGIS container, removed on drop (feature: "postgres")
//! - `TestDataBuilder`: per-test deterministic names, emails and phone numbers
//! - `assertions`: assertion helpers with readable failure messages
//!
//! # Usage
//!
//! ```rust,no_run
//! use test_utils::{TestDatabase, TestDataBuilder};
//!
//! #[tokio::test]
//! async fn my_postgres_test() {
//!     let db = TestDatabase::new().await;
//!     let builder = TestDataBuilder::from_test_name("my_test");
//!
//!     let email = builder.email("seller");
//!     let factory_name = builder.name("factory", "main");
//! }
//! ```

use std::hash::{DefaultHasher, Hash, Hasher};
use uuid::Uuid;

#[cfg(feature = "postgres")]
mod postgres;

#[cfg(feature = "postgres")]
pub use postgres::TestDatabase;

/// Seeded generator for fixture values.
///
/// Two builders with the same seed produce the same values, so failures
/// reproduce; different test names give values that do not collide on
/// unique columns such as `sellers.email`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestDataBuilder {
    seed: u64,
}

impl TestDataBuilder {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed from the test name; the usual way to build one
    pub fn from_test_name(name: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        name.hash(&mut hasher);
        Self::new(hasher.finish())
    }

    /// A UUID derived from the seed
    pub fn id(&self) -> Uuid {
        Uuid::from_u64_pair(self.seed, self.seed.rotate_left(32))
    }

    /// `test-<prefix>-<seed>-<suffix>`
    pub fn name(&self, prefix: &str, suffix: &str) -> String {
        format!("test-{}-{}-{}", prefix, self.seed, suffix)
    }

    /// A unique, valid, lowercase email address
    pub fn email(&self, local: &str) -> String {
        format!("{}.{}@example.test", local.to_lowercase(), self.seed)
    }

    /// `+91` and ten digits; `n` tells numbers within one test apart
    pub fn phone(&self, n: u8) -> String {
        format!("+91{:08}{:02}", self.seed % 100_000_000, n % 100)
    }
}

pub mod assertions {
    use uuid::Uuid;

    pub fn assert_uuid_eq(actual: Uuid, expected: Uuid, context: &str) {
        assert_eq!(
            actual, expected,
            "{}: expected UUID {}, got {}",
            context, expected, actual
        );
    }

    /// Unwrap `value`, failing with `context` when it is `None`
    pub fn assert_some<T>(value: Option<T>, context: &str) -> T {
        value.unwrap_or_else(|| panic!("{}: expected Some, got None", context))
    }

    /// `actual` within `tolerance_km` of `expected_km`
    pub fn assert_distance_near(actual: f64, expected_km: f64, tolerance_km: f64) {
        assert!(
            (actual - expected_km).abs() <= tolerance_km,
            "expected {} km (±{}), got {} km",
            expected_km,
            tolerance_km,
            actual
        );
    }
}

//! SeaORM entities for the write path.
//!
//! `locations.location` is not mapped: the database trigger derives it from
//! latitude/longitude and only the search SQL reads it.

pub mod factory;
pub mod location;
pub mod seller;

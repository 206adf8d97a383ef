pub use sea_orm_migration::prelude::*;

mod m20250801_000000_bootstrap;
mod m20250801_000001_create_sellers;
mod m20250801_000002_location_geography;
mod m20250801_000003_create_products;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250801_000000_bootstrap::Migration),
            Box::new(m20250801_000001_create_sellers::Migration),
            Box::new(m20250801_000002_location_geography::Migration),
            Box::new(m20250801_000003_create_products::Migration),
        ]
    }
}

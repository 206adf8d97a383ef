use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend, DbErr, EntityTrait,
    FromQueryResult, IntoActiveModel, QueryFilter, SqlErr, Statement,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    entity,
    error::{SellerError, SellerResult},
    geo::GeoPoint,
    models::{Candidate, CreateFactory, CreateSeller, Factory, Location, Seller, UpsertLocation},
    repository::{SellerRepository, SpatialQuery},
};

/// Columns every search returns, in the shape of [`Candidate`].
///
/// `$1`/`$2` are the query longitude/latitude. Distances use the sphere
/// (`use_spheroid = false`) to match [`crate::geo::distance_km`].
const CANDIDATE_COLUMNS: &str = r#"
    s.id AS seller_id,
    s.name AS seller_name,
    f.id AS factory_id,
    f.name AS factory_name,
    f.factory_type::text AS factory_type,
    f.categories,
    l.latitude,
    l.longitude,
    l.address_line1,
    l.city,
    l.state,
    l.country,
    ST_Distance(
        l.location,
        ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography,
        false
    ) / 1000.0 AS distance_km
"#;

const FROM_LOCATED_FACTORIES: &str = r#"
    FROM locations l
    JOIN factories f ON f.id = l.factory_id
    JOIN sellers s ON s.id = f.seller_id
    WHERE l.location IS NOT NULL
"#;

fn nearby_sql() -> String {
    // `<->` walks the GIST index nearest first; the LIMIT bounds the scan.
    format!(
        r#"SELECT {CANDIDATE_COLUMNS}
    {FROM_LOCATED_FACTORIES}
      AND ($4::text IS NULL OR lower(l.city) = lower($4::text))
      AND ST_DWithin(
          l.location,
          ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography,
          $3,
          false
      )
    ORDER BY l.location <-> ST_SetSRID(ST_MakePoint($1, $2), 4326)::geography
    LIMIT $5"#
    )
}

fn city_sql() -> String {
    format!(
        r#"SELECT {CANDIDATE_COLUMNS}
    {FROM_LOCATED_FACTORIES}
      AND lower(l.city) = lower($3::text)
    ORDER BY distance_km, f.id"#
    )
}

/// Map constraint violations onto domain errors, everything else is internal
fn map_write_err(err: DbErr, what: &str) -> SellerError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            SellerError::Conflict(format!("{} already exists: {}", what, detail))
        }
        Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
            SellerError::NotFound(format!("Parent of {} ({})", what, detail))
        }
        _ => err.into(),
    }
}

/// PostGIS-backed repository.
///
/// `locations.location` is written by the `locations_sync_geography`
/// trigger, so plain latitude/longitude updates through the entity keep the
/// spatial index current.
#[derive(Clone)]
pub struct PgSellerRepository {
    db: DatabaseConnection,
}

impl PgSellerRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SellerRepository for PgSellerRepository {
    #[instrument(skip(self), fields(origin = %query.origin, limit = query.candidate_limit))]
    async fn nearby_candidates(&self, query: SpatialQuery) -> SellerResult<Vec<Candidate>> {
        let limit = i64::try_from(query.candidate_limit).unwrap_or(i64::MAX);

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            nearby_sql(),
            [
                query.origin.longitude().into(),
                query.origin.latitude().into(),
                query.max_radius_m.into(),
                query.city.into(),
                limit.into(),
            ],
        );

        let rows = Candidate::find_by_statement(stmt).all(&self.db).await?;
        tracing::debug!(rows = rows.len(), "Read nearby candidates");
        Ok(rows)
    }

    #[instrument(skip(self), fields(origin = %origin))]
    async fn sellers_in_city(
        &self,
        origin: GeoPoint,
        city: String,
    ) -> SellerResult<Vec<Candidate>> {
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            city_sql(),
            [
                origin.longitude().into(),
                origin.latitude().into(),
                city.into(),
            ],
        );

        Ok(Candidate::find_by_statement(stmt).all(&self.db).await?)
    }

    async fn create_seller(&self, input: CreateSeller) -> SellerResult<Seller> {
        let model = entity::seller::ActiveModel::from(input)
            .insert(&self.db)
            .await
            .map_err(|e| map_write_err(e, "Seller"))?;

        tracing::info!(seller_id = %model.id, "Created seller");
        Ok(model.into())
    }

    async fn create_factory(&self, input: CreateFactory) -> SellerResult<Factory> {
        let seller_id = input.seller_id;
        let model = entity::factory::ActiveModel::from(input)
            .insert(&self.db)
            .await
            .map_err(|e| match map_write_err(e, "Factory") {
                SellerError::NotFound(_) => SellerError::NotFound(format!("Seller {}", seller_id)),
                other => other,
            })?;

        tracing::info!(factory_id = %model.id, seller_id = %model.seller_id, "Created factory");
        Ok(model.into())
    }

    async fn upsert_location(&self, input: UpsertLocation) -> SellerResult<Location> {
        let factory_id = input.factory_id;
        let existing = entity::location::Entity::find()
            .filter(entity::location::Column::FactoryId.eq(factory_id))
            .one(&self.db)
            .await?;

        let result = match existing {
            Some(model) => {
                let mut active = model.into_active_model();
                active.apply(input);
                active.update(&self.db).await
            }
            None => entity::location::ActiveModel::from(input).insert(&self.db).await,
        };

        let model = result.map_err(|e| match map_write_err(e, "Location") {
            SellerError::NotFound(_) => SellerError::NotFound(format!("Factory {}", factory_id)),
            other => other,
        })?;

        tracing::info!(factory_id = %factory_id, "Stored factory location");
        Ok(model.into())
    }

    async fn get_location(&self, factory_id: Uuid) -> SellerResult<Option<Location>> {
        let model = entity::location::Entity::find()
            .filter(entity::location::Column::FactoryId.eq(factory_id))
            .one(&self.db)
            .await?;

        Ok(model.map(Into::into))
    }
}

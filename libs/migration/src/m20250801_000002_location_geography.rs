use sea_orm_migration::prelude::*;

/// Spatial column for locations.
///
/// `location` is owned by the trigger: it is rebuilt from latitude/longitude
/// before every insert or update, and is NULL whenever either coordinate is.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            r#"
            ALTER TABLE locations
                ADD COLUMN IF NOT EXISTS location geography(Point, 4326),
                ADD CONSTRAINT chk_locations_latitude
                    CHECK (latitude IS NULL OR latitude BETWEEN -90 AND 90),
                ADD CONSTRAINT chk_locations_longitude
                    CHECK (longitude IS NULL OR longitude BETWEEN -180 AND 180)
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE OR REPLACE FUNCTION util.sync_location_geography()
            RETURNS TRIGGER AS $$
            BEGIN
                IF NEW.latitude IS NULL OR NEW.longitude IS NULL THEN
                    NEW.location = NULL;
                ELSE
                    NEW.location = ST_SetSRID(
                        ST_MakePoint(NEW.longitude, NEW.latitude), 4326
                    )::geography;
                END IF;
                RETURN NEW;
            END;
            $$ LANGUAGE plpgsql
            "#,
        )
        .await?;

        db.execute_unprepared(
            r#"
            CREATE TRIGGER locations_sync_geography
                BEFORE INSERT OR UPDATE ON locations
                FOR EACH ROW
                EXECUTE FUNCTION util.sync_location_geography()
            "#,
        )
        .await?;

        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_locations_location ON locations USING GIST (location)",
        )
        .await?;

        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_locations_city_lower ON locations (lower(city))",
        )
        .await?;

        // Rows written before the trigger existed
        db.execute_unprepared(
            r#"
            UPDATE locations
            SET location = ST_SetSRID(ST_MakePoint(longitude, latitude), 4326)::geography
            WHERE latitude IS NOT NULL AND longitude IS NOT NULL AND location IS NULL
            "#,
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared("DROP TRIGGER IF EXISTS locations_sync_geography ON locations")
            .await?;
        db.execute_unprepared("DROP FUNCTION IF EXISTS util.sync_location_geography()")
            .await?;
        db.execute_unprepared("DROP INDEX IF EXISTS idx_locations_city_lower").await?;
        db.execute_unprepared("DROP INDEX IF EXISTS idx_locations_location").await?;
        db.execute_unprepared(
            r#"
            ALTER TABLE locations
                DROP CONSTRAINT IF EXISTS chk_locations_longitude,
                DROP CONSTRAINT IF EXISTS chk_locations_latitude,
                DROP COLUMN IF EXISTS location
            "#,
        )
        .await?;

        Ok(())
    }
}

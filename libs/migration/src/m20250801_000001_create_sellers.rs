use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(FactoryType::Enum)
                    .values([FactoryType::Factory, FactoryType::Shop, FactoryType::Warehouse])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sellers::Table)
                    .if_not_exists()
                    .col(pk_uuid(Sellers::Id))
                    .col(string(Sellers::Name))
                    .col(string_uniq(Sellers::Email))
                    .col(string_len(Sellers::Phone, 20))
                    .col(timestamp_with_time_zone(Sellers::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Factories::Table)
                    .if_not_exists()
                    .col(pk_uuid(Factories::Id))
                    .col(uuid(Factories::SellerId))
                    .col(string(Factories::Name))
                    .col(
                        ColumnDef::new(Factories::FactoryType)
                            .enumeration(
                                FactoryType::Enum,
                                [FactoryType::Factory, FactoryType::Shop, FactoryType::Warehouse],
                            )
                            .not_null()
                            .default("factory"),
                    )
                    .col(string_len(Factories::ContactNumber, 20))
                    .col(
                        ColumnDef::new(Factories::Categories)
                            .array(ColumnType::Text)
                            .not_null()
                            .default(Expr::cust("'{}'::text[]")),
                    )
                    .col(timestamp_with_time_zone(Factories::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_factories_seller_id")
                            .from(Factories::Table, Factories::SellerId)
                            .to(Sellers::Table, Sellers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_factories_seller_id")
                    .table(Factories::Table)
                    .col(Factories::SellerId)
                    .to_owned(),
            )
            .await?;

        // One location per factory
        manager
            .create_table(
                Table::create()
                    .table(Locations::Table)
                    .if_not_exists()
                    .col(pk_uuid(Locations::Id))
                    .col(uuid_uniq(Locations::FactoryId))
                    .col(string(Locations::AddressLine1))
                    .col(string_null(Locations::AddressLine2))
                    .col(string(Locations::City))
                    .col(string(Locations::State))
                    .col(string(Locations::Country))
                    .col(string_len(Locations::PostalCode, 12))
                    .col(double_null(Locations::Latitude))
                    .col(double_null(Locations::Longitude))
                    .col(timestamp_with_time_zone(Locations::UpdatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_locations_factory_id")
                            .from(Locations::Table, Locations::FactoryId)
                            .to(Factories::Table, Factories::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                r#"
                CREATE TRIGGER locations_touch_updated_at
                    BEFORE UPDATE ON locations
                    FOR EACH ROW
                    EXECUTE FUNCTION util.touch_updated_at()
                "#,
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Locations::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Factories::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Sellers::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_type(Type::drop().if_exists().name(FactoryType::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Sellers {
    Table,
    Id,
    Name,
    Email,
    Phone,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Factories {
    Table,
    Id,
    SellerId,
    Name,
    FactoryType,
    ContactNumber,
    Categories,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Locations {
    Table,
    Id,
    FactoryId,
    AddressLine1,
    AddressLine2,
    City,
    State,
    Country,
    PostalCode,
    Latitude,
    Longitude,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum FactoryType {
    #[sea_orm(iden = "factory_type")]
    Enum,
    #[sea_orm(iden = "factory")]
    Factory,
    #[sea_orm(iden = "shop")]
    Shop,
    #[sea_orm(iden = "warehouse")]
    Warehouse,
}

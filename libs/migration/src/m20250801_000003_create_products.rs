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
                    .as_enum(QuantityUnit::Enum)
                    .values([
                        QuantityUnit::Unit,
                        QuantityUnit::Kilogram,
                        QuantityUnit::Gram,
                        QuantityUnit::Liter,
                    ])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(pk_uuid(Products::Id))
                    .col(uuid(Products::SellerId))
                    .col(uuid_null(Products::FactoryId))
                    .col(string(Products::Name))
                    .col(text(Products::Description).default(""))
                    .col(decimal_len(Products::Price, 12, 2))
                    .col(integer(Products::StockQuantity).default(0))
                    .col(
                        ColumnDef::new(Products::QuantityUnit)
                            .enumeration(
                                QuantityUnit::Enum,
                                [
                                    QuantityUnit::Unit,
                                    QuantityUnit::Kilogram,
                                    QuantityUnit::Gram,
                                    QuantityUnit::Liter,
                                ],
                            )
                            .not_null()
                            .default("unit"),
                    )
                    .col(string(Products::Category))
                    .col(timestamp_with_time_zone(Products::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_seller_id")
                            .from(Products::Table, Products::SellerId)
                            .to(Sellers::Table, Sellers::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_factory_id")
                            .from(Products::Table, Products::FactoryId)
                            .to(Factories::Table, Factories::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_seller_id")
                    .table(Products::Table)
                    .col(Products::SellerId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_category")
                    .table(Products::Table)
                    .col(Products::Category)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_type(Type::drop().if_exists().name(QuantityUnit::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    SellerId,
    FactoryId,
    Name,
    Description,
    Price,
    StockQuantity,
    QuantityUnit,
    Category,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Sellers {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Factories {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum QuantityUnit {
    #[sea_orm(iden = "quantity_unit")]
    Enum,
    #[sea_orm(iden = "unit")]
    Unit,
    #[sea_orm(iden = "kilogram")]
    Kilogram,
    #[sea_orm(iden = "gram")]
    Gram,
    #[sea_orm(iden = "liter")]
    Liter,
}

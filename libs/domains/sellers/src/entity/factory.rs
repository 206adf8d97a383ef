use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::{CreateFactory, Factory, FactoryType};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "factories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub seller_id: Uuid,
    pub name: String,
    pub factory_type: FactoryType,
    pub contact_number: String,
    pub categories: Vec<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Factory {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            seller_id: model.seller_id,
            name: model.name,
            factory_type: model.factory_type,
            contact_number: model.contact_number,
            categories: model.categories,
            created_at: model.created_at.into(),
        }
    }
}

impl From<CreateFactory> for ActiveModel {
    fn from(input: CreateFactory) -> Self {
        ActiveModel {
            id: Set(Uuid::now_v7()),
            seller_id: Set(input.seller_id),
            name: Set(input.name),
            factory_type: Set(input.factory_type),
            contact_number: Set(input.contact_number),
            categories: Set(input.categories),
            created_at: Set(chrono::Utc::now().into()),
        }
    }
}

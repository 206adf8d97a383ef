use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;

use crate::models::{Location, UpsertLocation};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "locations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub factory_id: Uuid,
    pub address_line1: String,
    pub address_line2: Option<String>,
    pub city: String,
    pub state: String,
    pub country: String,
    pub postal_code: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Location {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            factory_id: model.factory_id,
            address_line1: model.address_line1,
            address_line2: model.address_line2,
            city: model.city,
            state: model.state,
            country: model.country,
            postal_code: model.postal_code,
            latitude: model.latitude,
            longitude: model.longitude,
            updated_at: model.updated_at.into(),
        }
    }
}

impl ActiveModel {
    /// Overwrite every address and coordinate column from `input`
    pub fn apply(&mut self, input: UpsertLocation) {
        self.address_line1 = Set(input.address_line1);
        self.address_line2 = Set(input.address_line2);
        self.city = Set(input.city);
        self.state = Set(input.state);
        self.country = Set(input.country);
        self.postal_code = Set(input.postal_code);
        self.latitude = Set(input.latitude);
        self.longitude = Set(input.longitude);
        self.updated_at = Set(chrono::Utc::now().into());
    }
}

impl From<UpsertLocation> for ActiveModel {
    fn from(input: UpsertLocation) -> Self {
        let mut model = ActiveModel {
            id: Set(Uuid::now_v7()),
            factory_id: Set(input.factory_id),
            ..Default::default()
        };
        model.apply(input);
        model
    }
}

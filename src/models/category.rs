use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub title: String,
    pub description: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        super::item_categories::Relation::Item.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::item_categories::Relation::Category.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! Activity entity.
//!
//! Activities form a tree: a module is an activity without a parent, and its
//! sub-activities point at it through `parent_id`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "activity")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub title: String,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    /// Parent activity (NULL for top-level modules)
    #[sea_orm(nullable, indexed)]
    pub parent_id: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "Entity",
        from = "Column::ParentId",
        to = "Column::Id",
        on_delete = "SetNull"
    )]
    Parent,

    #[sea_orm(has_many = "super::activity_response::Entity")]
    Responses,

    #[sea_orm(has_many = "super::module_completion::Entity")]
    Completions,
}

impl Related<super::activity_response::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Responses.def()
    }
}

impl Related<super::module_completion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Completions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

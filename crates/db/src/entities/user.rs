//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    /// Login identifier, stored lower-cased
    #[sea_orm(unique)]
    pub email: String,

    /// Display name
    pub name: String,

    /// Password hash (Argon2)
    #[serde(skip_serializing)]
    pub password: String,

    /// Access token
    #[sea_orm(unique, nullable)]
    #[serde(skip_serializing)]
    pub token: Option<String>,

    #[sea_orm(default_value = true)]
    pub is_active: bool,

    /// Staff users may read every response
    #[sea_orm(default_value = false)]
    pub is_staff: bool,

    /// Superusers curate the catalog and see every user's records
    #[sea_orm(default_value = false)]
    pub is_superuser: bool,

    #[sea_orm(nullable)]
    pub last_login: Option<DateTimeWithTimeZone>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::user_data::Entity")]
    UserData,

    #[sea_orm(has_many = "super::user_score::Entity")]
    Scores,

    #[sea_orm(has_many = "super::activity_response::Entity")]
    ActivityResponses,

    #[sea_orm(has_many = "super::forms_question_response::Entity")]
    FormsQuestionResponses,

    #[sea_orm(has_many = "super::module_completion::Entity")]
    ModuleCompletions,
}

impl Related<super::user_data::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UserData.def()
    }
}

impl Related<super::user_score::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Scores.def()
    }
}

impl Related<super::activity_response::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ActivityResponses.def()
    }
}

impl Related<super::forms_question_response::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FormsQuestionResponses.def()
    }
}

impl Related<super::module_completion::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ModuleCompletions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! User score entity.
//!
//! Holds both the initial and the final self-assessment of a user; the
//! `(user_id, kind)` pair is unique, so each user has at most one of each.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Which self-assessment a score row belongs to.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ScoreKind {
    #[sea_orm(string_value = "initial")]
    Initial,
    #[sea_orm(string_value = "final")]
    Final,
}

impl ScoreKind {
    /// Wire name of this kind.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Final => "final",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user_score")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(indexed)]
    pub user_id: String,

    pub kind: ScoreKind,

    // Each scale is bounded to [0, 100] by a CHECK constraint.
    pub self_control: i32,
    pub leadership: i32,
    pub social_awareness: i32,
    pub social_innovation: i32,
    pub systemic_thinking: i32,
    pub scientific_thinking: i32,
    pub critical_thinking: i32,
    pub innovative_thinking: i32,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! SeaORM Entity for categories table

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_name = "userId")]
    pub user_id: i32,
    /// Unique per user; 1-50 chars, CHECK-constrained.
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    #[sea_orm(column_name = "createdAt")]
    pub created_at: i64,
    #[sea_orm(column_name = "updatedAt")]
    pub updated_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::learning_samples::Entity")]
    LearningSamples,
    #[sea_orm(has_many = "super::style_profiles::Entity")]
    StyleProfiles,
    #[sea_orm(has_many = "super::monetization_tips::Entity")]
    MonetizationTips,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::learning_samples::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::LearningSamples.def()
    }
}

impl Related<super::style_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StyleProfiles.def()
    }
}

impl Related<super::monetization_tips::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonetizationTips.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

//! SeaORM Entity for posts table

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_name = "userId")]
    pub user_id: i32,
    /// Soft reference; the category may have been deleted since.
    #[sea_orm(column_name = "categoryId")]
    pub category_id: String,
    #[sea_orm(column_name = "locationName")]
    pub location_name: String,
    #[sea_orm(column_name = "overallNote", column_type = "Text")]
    pub overall_note: String,
    /// Denormalized copy of the latest generated title; empty on drafts.
    pub title: String,
    #[sea_orm(column_name = "contentMarkdown", column_type = "Text")]
    pub content_markdown: String,
    pub status: Status,
    #[sea_orm(column_name = "createdAt")]
    pub created_at: i64,
    #[sea_orm(column_name = "updatedAt")]
    pub updated_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "generated")]
    Generated,
    #[sea_orm(string_value = "exported")]
    Exported,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::photos::Entity")]
    Photos,
    #[sea_orm(has_many = "super::crawl_sources::Entity")]
    CrawlSources,
    #[sea_orm(has_many = "super::post_versions::Entity")]
    PostVersions,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::photos::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Photos.def()
    }
}

impl Related<super::crawl_sources::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CrawlSources.def()
    }
}

impl Related<super::post_versions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostVersions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

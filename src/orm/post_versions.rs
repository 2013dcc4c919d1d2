//! SeaORM Entity for post_versions table
//!
//! Immutable snapshots of generated content. versionNumber starts at 1 and
//! is unique per post; rows are never updated, only cascade-deleted with
//! their post.

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "post_versions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_name = "userId")]
    pub user_id: i32,
    #[sea_orm(column_name = "postId")]
    pub post_id: String,
    #[sea_orm(column_name = "versionNumber")]
    pub version_number: i32,
    #[sea_orm(column_name = "promptNote")]
    pub prompt_note: String,
    pub title: String,
    #[sea_orm(column_name = "contentMarkdown", column_type = "Text")]
    pub content_markdown: String,
    #[sea_orm(column_name = "createdAt")]
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::posts::Entity",
        from = "Column::PostId",
        to = "super::posts::Column::Id"
    )]
    Post,
    #[sea_orm(has_many = "super::plagiarism_checks::Entity")]
    PlagiarismChecks,
    #[sea_orm(has_many = "super::seo_analyses::Entity")]
    SeoAnalyses,
}

impl Related<super::posts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl Related<super::plagiarism_checks::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlagiarismChecks.def()
    }
}

impl Related<super::seo_analyses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SeoAnalyses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

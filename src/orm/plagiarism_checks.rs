//! SeaORM Entity for plagiarism_checks table
//!
//! Immutable analysis records; several may exist per version, latest wins.

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "plagiarism_checks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_name = "userId")]
    pub user_id: i32,
    #[sea_orm(column_name = "postId")]
    pub post_id: String,
    #[sea_orm(column_name = "versionId")]
    pub version_id: String,
    #[sea_orm(column_name = "similarityScore")]
    pub similarity_score: i32,
    /// JSON-serialized array of crawl source ids that scored above the
    /// comparison threshold.
    #[sea_orm(column_name = "comparedSourceIds", column_type = "Text")]
    pub compared_source_ids: String,
    pub passed: bool,
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
    #[sea_orm(
        belongs_to = "super::post_versions::Entity",
        from = "Column::VersionId",
        to = "super::post_versions::Column::Id"
    )]
    Version,
}

impl Related<super::post_versions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Version.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

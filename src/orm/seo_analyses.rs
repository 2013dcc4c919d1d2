//! SeaORM Entity for seo_analyses table

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "seo_analyses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_name = "userId")]
    pub user_id: i32,
    #[sea_orm(column_name = "postId")]
    pub post_id: String,
    #[sea_orm(column_name = "versionId")]
    pub version_id: String,
    #[sea_orm(column_name = "keywordDensityScore")]
    pub keyword_density_score: i32,
    #[sea_orm(column_name = "titleOptimizationScore")]
    pub title_optimization_score: i32,
    #[sea_orm(column_name = "metaDescriptionScore")]
    pub meta_description_score: i32,
    #[sea_orm(column_name = "readabilityScore")]
    pub readability_score: i32,
    #[sea_orm(column_name = "internalLinksScore")]
    pub internal_links_score: i32,
    #[sea_orm(column_name = "overallScore")]
    pub overall_score: i32,
    /// JSON-serialized array of human-readable suggestion strings.
    #[sea_orm(column_type = "Text")]
    pub suggestions: String,
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

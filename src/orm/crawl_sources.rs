//! SeaORM Entity for crawl_sources table

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "crawl_sources")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_name = "userId")]
    pub user_id: i32,
    #[sea_orm(column_name = "postId")]
    pub post_id: String,
    pub provider: Provider,
    #[sea_orm(column_name = "sourceUrl", nullable)]
    pub source_url: Option<String>,
    /// 20-2000 chars, CHECK-constrained; plagiarism comparison material.
    #[sea_orm(column_name = "snippetText", column_type = "Text")]
    pub snippet_text: String,
    /// 0-5 when the provider carries ratings; None for blog snippets.
    #[sea_orm(nullable)]
    pub rating: Option<f64>,
    #[sea_orm(column_name = "createdAt")]
    pub created_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    #[sea_orm(string_value = "naver")]
    Naver,
    #[sea_orm(string_value = "kakao")]
    Kakao,
    #[sea_orm(string_value = "google")]
    Google,
    #[sea_orm(string_value = "blog")]
    Blog,
}

impl Provider {
    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::Naver => "naver",
            Provider::Kakao => "kakao",
            Provider::Google => "google",
            Provider::Blog => "blog",
        }
    }
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
}

impl Related<super::posts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

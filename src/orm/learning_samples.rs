//! SeaORM Entity for learning_samples table

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "learning_samples")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_name = "userId")]
    pub user_id: i32,
    #[sea_orm(column_name = "categoryId")]
    pub category_id: String,
    #[sea_orm(column_name = "sourceType")]
    pub source_type: SourceType,
    /// Set iff source_type is Url; CHECK-enforced exclusivity with file_name.
    #[sea_orm(column_name = "sourceUrl", nullable)]
    pub source_url: Option<String>,
    #[sea_orm(column_name = "fileName", nullable)]
    pub file_name: Option<String>,
    /// 200-200000 chars, CHECK-constrained.
    #[sea_orm(column_name = "rawText", column_type = "Text")]
    pub raw_text: String,
    #[sea_orm(column_name = "createdAt")]
    pub created_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(None)")]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    #[sea_orm(string_value = "url")]
    Url,
    #[sea_orm(string_value = "file")]
    File,
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
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Category,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Category.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

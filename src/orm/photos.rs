//! SeaORM Entity for photos table
//!
//! Capped at 20 rows per post by a BEFORE INSERT trigger; sortOrder is
//! unique per post and reassigned in bulk by the reorder repository op.

use sea_orm::entity::prelude::*;
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[serde(rename_all = "camelCase")]
#[sea_orm(table_name = "photos")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_name = "userId")]
    pub user_id: i32,
    #[sea_orm(column_name = "postId")]
    pub post_id: String,
    #[sea_orm(column_name = "originalFileName")]
    pub original_file_name: String,
    #[sea_orm(column_name = "storedFilePath")]
    pub stored_file_path: String,
    pub memo: String,
    #[sea_orm(column_name = "sortOrder")]
    pub sort_order: i32,
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
}

impl Related<super::posts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Post.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

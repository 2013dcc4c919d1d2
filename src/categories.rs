//! Category operations.
//!
//! Categories group learning samples, a style profile, and a monetization
//! tip per user. Deleting a category cascades to those three, but posts
//! keep their categoryId and simply go orphaned; see DESIGN.md.

use crate::orm::categories;
use chrono::Utc;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};
use uuid::Uuid;

/// Insert a new category. The (userId, name) unique index rejects
/// duplicates; the caller surfaces that as a conflict, not a retry.
pub async fn create_category(
    db: &DatabaseConnection,
    user_id: i32,
    name: &str,
    description: Option<&str>,
) -> Result<categories::Model, DbErr> {
    let now = Utc::now().timestamp_millis();

    categories::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        user_id: Set(user_id),
        name: Set(name.to_owned()),
        description: Set(description.map(|d| d.to_owned())),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
}

pub async fn get_category_by_id(
    db: &DatabaseConnection,
    category_id: &str,
) -> Result<Option<categories::Model>, DbErr> {
    categories::Entity::find_by_id(category_id.to_owned())
        .one(db)
        .await
}

/// Category scoped to its owner; None when missing or owned by someone else.
pub async fn get_category_for_user(
    db: &DatabaseConnection,
    user_id: i32,
    category_id: &str,
) -> Result<Option<categories::Model>, DbErr> {
    categories::Entity::find()
        .filter(categories::Column::Id.eq(category_id))
        .filter(categories::Column::UserId.eq(user_id))
        .one(db)
        .await
}

pub async fn list_categories_by_user(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<categories::Model>, DbErr> {
    categories::Entity::find()
        .filter(categories::Column::UserId.eq(user_id))
        .order_by_desc(categories::Column::UpdatedAt)
        .all(db)
        .await
}

/// Delete a category. Learning samples, the style profile, and the
/// monetization tip go with it via FK cascade; posts are left orphaned.
/// Returns false when nothing matched.
pub async fn delete_category(
    db: &DatabaseConnection,
    user_id: i32,
    category_id: &str,
) -> Result<bool, DbErr> {
    let res = categories::Entity::delete_many()
        .filter(categories::Column::Id.eq(category_id))
        .filter(categories::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    Ok(res.rows_affected > 0)
}

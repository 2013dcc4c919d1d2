//! Post operations.
//!
//! A post's title/contentMarkdown/status columns are a denormalized copy of
//! its latest generated version; the immutable history lives in
//! [`crate::versions`].

use crate::orm::posts::{self, Status};
use chrono::Utc;
use sea_orm::{entity::*, query::*, ConnectionTrait, DatabaseConnection, DbErr};
use uuid::Uuid;

pub async fn create_post(
    db: &DatabaseConnection,
    user_id: i32,
    category_id: &str,
    location_name: &str,
    overall_note: &str,
) -> Result<posts::Model, DbErr> {
    let now = Utc::now().timestamp_millis();

    posts::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        user_id: Set(user_id),
        category_id: Set(category_id.to_owned()),
        location_name: Set(location_name.to_owned()),
        overall_note: Set(overall_note.to_owned()),
        title: Set(String::new()),
        content_markdown: Set(String::new()),
        status: Set(Status::Draft),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(db)
    .await
}

pub async fn get_post_for_user<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    post_id: &str,
) -> Result<Option<posts::Model>, DbErr> {
    posts::Entity::find()
        .filter(posts::Column::Id.eq(post_id))
        .filter(posts::Column::UserId.eq(user_id))
        .one(db)
        .await
}

pub async fn list_posts_by_user(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Vec<posts::Model>, DbErr> {
    posts::Entity::find()
        .filter(posts::Column::UserId.eq(user_id))
        .order_by_desc(posts::Column::UpdatedAt)
        .all(db)
        .await
}

/// Overwrite the denormalized content columns and bump updatedAt.
/// Generic over the connection so the generation workflow can run it
/// inside its transaction.
pub async fn update_post_content<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    post_id: &str,
    title: &str,
    content_markdown: &str,
    status: Status,
) -> Result<(), DbErr> {
    let post = get_post_for_user(db, user_id, post_id)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("post {} not found", post_id)))?;

    let mut active: posts::ActiveModel = post.into();
    active.title = Set(title.to_owned());
    active.content_markdown = Set(content_markdown.to_owned());
    active.status = Set(status);
    active.updated_at = Set(Utc::now().timestamp_millis());
    active.update(db).await?;

    Ok(())
}

/// Status-only transition (draft -> generated -> exported is enforced by
/// callers, not here).
pub async fn update_post_status(
    db: &DatabaseConnection,
    user_id: i32,
    post_id: &str,
    status: Status,
) -> Result<(), DbErr> {
    let post = get_post_for_user(db, user_id, post_id)
        .await?
        .ok_or_else(|| DbErr::RecordNotFound(format!("post {} not found", post_id)))?;

    let mut active: posts::ActiveModel = post.into();
    active.status = Set(status);
    active.updated_at = Set(Utc::now().timestamp_millis());
    active.update(db).await?;

    Ok(())
}

/// Delete a post; photos, crawl data, versions, and their analyses go with
/// it via FK cascade. Returns false when nothing matched.
pub async fn delete_post(
    db: &DatabaseConnection,
    user_id: i32,
    post_id: &str,
) -> Result<bool, DbErr> {
    let res = posts::Entity::delete_many()
        .filter(posts::Column::Id.eq(post_id))
        .filter(posts::Column::UserId.eq(user_id))
        .exec(db)
        .await?;

    Ok(res.rows_affected > 0)
}

//! Photo ordering operations.
//!
//! sortOrder is 1-based and unique per post. The database trigger caps a
//! post at 20 photos; [`is_photo_cap_error`] re-exported here lets callers
//! tell that apart from any other constraint failure. Bulk reorder first
//! shifts every row out of the 1..N range so the unique index never sees a
//! transient duplicate.

use crate::orm::photos;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr, TransactionTrait};
use uuid::Uuid;

pub use crate::schema::{is_photo_cap_error, MAX_PHOTOS_PER_POST};

/// Offset applied to every sortOrder before reassignment; must exceed any
/// reachable sortOrder (the cap keeps them at most 20).
const REORDER_OFFSET: i32 = 1000;

pub struct NewPhoto {
    pub original_file_name: String,
    pub stored_file_path: String,
    pub memo: String,
}

/// Insert a photo at the end of the post's ordering (max sortOrder + 1).
/// The 21st insert for a post is rejected by the cap trigger.
pub async fn add_photo(
    db: &DatabaseConnection,
    user_id: i32,
    post_id: &str,
    photo: NewPhoto,
) -> Result<photos::Model, DbErr> {
    let last = photos::Entity::find()
        .filter(photos::Column::PostId.eq(post_id))
        .order_by_desc(photos::Column::SortOrder)
        .one(db)
        .await?;
    let next_sort_order = last.map(|p| p.sort_order).unwrap_or(0) + 1;

    photos::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        user_id: Set(user_id),
        post_id: Set(post_id.to_owned()),
        original_file_name: Set(photo.original_file_name),
        stored_file_path: Set(photo.stored_file_path),
        memo: Set(photo.memo),
        sort_order: Set(next_sort_order),
        created_at: Set(Utc::now().timestamp_millis()),
    }
    .insert(db)
    .await
}

pub async fn list_photos_by_post(
    db: &DatabaseConnection,
    user_id: i32,
    post_id: &str,
) -> Result<Vec<photos::Model>, DbErr> {
    photos::Entity::find()
        .filter(photos::Column::UserId.eq(user_id))
        .filter(photos::Column::PostId.eq(post_id))
        .order_by_asc(photos::Column::SortOrder)
        .all(db)
        .await
}

/// Reassign sortOrder so the post's photos end up in the given id order,
/// 1-based. Two phases inside one transaction: shift everything past the
/// live range, then write 1..N back in.
pub async fn reorder_photos(
    db: &DatabaseConnection,
    user_id: i32,
    post_id: &str,
    ordered_photo_ids: &[String],
) -> Result<(), DbErr> {
    let txn = db.begin().await?;

    photos::Entity::update_many()
        .col_expr(
            photos::Column::SortOrder,
            Expr::col(photos::Column::SortOrder).add(REORDER_OFFSET),
        )
        .filter(photos::Column::UserId.eq(user_id))
        .filter(photos::Column::PostId.eq(post_id))
        .exec(&txn)
        .await?;

    for (index, photo_id) in ordered_photo_ids.iter().enumerate() {
        photos::Entity::update_many()
            .col_expr(photos::Column::SortOrder, Expr::value(index as i32 + 1))
            .filter(photos::Column::Id.eq(photo_id.as_str()))
            .filter(photos::Column::UserId.eq(user_id))
            .filter(photos::Column::PostId.eq(post_id))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;
    Ok(())
}

/// Remove a photo, returning its row so the caller can delete the stored
/// file. None when nothing matched.
pub async fn delete_photo(
    db: &DatabaseConnection,
    user_id: i32,
    photo_id: &str,
) -> Result<Option<photos::Model>, DbErr> {
    let existing = photos::Entity::find()
        .filter(photos::Column::Id.eq(photo_id))
        .filter(photos::Column::UserId.eq(user_id))
        .one(db)
        .await?;

    let photo = match existing {
        Some(photo) => photo,
        None => return Ok(None),
    };

    photos::Entity::delete_many()
        .filter(photos::Column::Id.eq(photo_id))
        .exec(db)
        .await?;

    Ok(Some(photo))
}

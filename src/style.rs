//! Style profile storage.
//!
//! At most one profile exists per (user, category). The upsert runs as a
//! read-modify-write inside one transaction; together with the unique index
//! this keeps concurrent upserts from ever producing two rows. An update
//! keeps the row's id and createdAt and refreshes updatedAt.

use crate::orm::style_profiles;
use chrono::Utc;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr, TransactionTrait};
use uuid::Uuid;

pub async fn get_style_profile(
    db: &DatabaseConnection,
    user_id: i32,
    category_id: &str,
) -> Result<Option<style_profiles::Model>, DbErr> {
    style_profiles::Entity::find()
        .filter(style_profiles::Column::UserId.eq(user_id))
        .filter(style_profiles::Column::CategoryId.eq(category_id))
        .one(db)
        .await
}

pub async fn upsert_style_profile(
    db: &DatabaseConnection,
    user_id: i32,
    category_id: &str,
    profile_json: &str,
    sample_count: i32,
) -> Result<style_profiles::Model, DbErr> {
    let now = Utc::now().timestamp_millis();
    let txn = db.begin().await?;

    let existing = style_profiles::Entity::find()
        .filter(style_profiles::Column::UserId.eq(user_id))
        .filter(style_profiles::Column::CategoryId.eq(category_id))
        .one(&txn)
        .await?;

    match existing {
        Some(profile) => {
            let mut active: style_profiles::ActiveModel = profile.into();
            active.profile_json = Set(profile_json.to_owned());
            active.sample_count = Set(sample_count);
            active.updated_at = Set(now);
            active.update(&txn).await?;
        }
        None => {
            style_profiles::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                user_id: Set(user_id),
                category_id: Set(category_id.to_owned()),
                profile_json: Set(profile_json.to_owned()),
                sample_count: Set(sample_count),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await?;

    get_style_profile(db, user_id, category_id)
        .await?
        .ok_or_else(|| DbErr::Custom("style profile upsert lost its row".to_owned()))
}

//! Monetization tip storage. Same one-row-per-(user, category) upsert
//! contract as the style profile.

use crate::orm::monetization_tips;
use chrono::Utc;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr, TransactionTrait};
use uuid::Uuid;

pub async fn get_monetization_tip(
    db: &DatabaseConnection,
    user_id: i32,
    category_id: &str,
) -> Result<Option<monetization_tips::Model>, DbErr> {
    monetization_tips::Entity::find()
        .filter(monetization_tips::Column::UserId.eq(user_id))
        .filter(monetization_tips::Column::CategoryId.eq(category_id))
        .one(db)
        .await
}

pub async fn upsert_monetization_tip(
    db: &DatabaseConnection,
    user_id: i32,
    category_id: &str,
    recommended_method: &str,
    tip_text: &str,
) -> Result<monetization_tips::Model, DbErr> {
    let now = Utc::now().timestamp_millis();
    let txn = db.begin().await?;

    let existing = monetization_tips::Entity::find()
        .filter(monetization_tips::Column::UserId.eq(user_id))
        .filter(monetization_tips::Column::CategoryId.eq(category_id))
        .one(&txn)
        .await?;

    match existing {
        Some(tip) => {
            let mut active: monetization_tips::ActiveModel = tip.into();
            active.recommended_method = Set(recommended_method.to_owned());
            active.tip_text = Set(tip_text.to_owned());
            active.updated_at = Set(now);
            active.update(&txn).await?;
        }
        None => {
            monetization_tips::ActiveModel {
                id: Set(Uuid::new_v4().to_string()),
                user_id: Set(user_id),
                category_id: Set(category_id.to_owned()),
                recommended_method: Set(recommended_method.to_owned()),
                tip_text: Set(tip_text.to_owned()),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await?;

    get_monetization_tip(db, user_id, category_id)
        .await?
        .ok_or_else(|| DbErr::Custom("monetization tip upsert lost its row".to_owned()))
}

//! Subscription state, one row per user.
//!
//! The payments webhook drives all mutations here; the rest of the app only
//! ever asks for the effective tier.

use crate::orm::subscriptions::{self, Tier};
use chrono::Utc;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr, TransactionTrait};

pub struct SubscriptionUpdate {
    pub stripe_customer_id: String,
    pub stripe_subscription_id: String,
    pub status: String,
    pub tier: Tier,
    pub current_period_end: Option<i64>,
}

pub async fn get_subscription_by_user(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Option<subscriptions::Model>, DbErr> {
    subscriptions::Entity::find()
        .filter(subscriptions::Column::UserId.eq(user_id))
        .one(db)
        .await
}

pub async fn get_subscription_by_customer(
    db: &DatabaseConnection,
    stripe_customer_id: &str,
) -> Result<Option<subscriptions::Model>, DbErr> {
    subscriptions::Entity::find()
        .filter(subscriptions::Column::StripeCustomerId.eq(stripe_customer_id))
        .one(db)
        .await
}

/// Effective tier: the subscription's tier while its status is active,
/// free otherwise (including when no row exists).
pub async fn get_tier(db: &DatabaseConnection, user_id: i32) -> Result<Tier, DbErr> {
    let sub = subscriptions::Entity::find()
        .filter(subscriptions::Column::UserId.eq(user_id))
        .filter(subscriptions::Column::Status.eq("active"))
        .one(db)
        .await?;

    Ok(sub.map(|s| s.tier).unwrap_or(Tier::Free))
}

/// One subscription row per user: update in place when present, insert
/// otherwise. The user_id unique constraint backs this up.
pub async fn upsert_subscription(
    db: &DatabaseConnection,
    user_id: i32,
    update: SubscriptionUpdate,
) -> Result<(), DbErr> {
    let now = Utc::now().timestamp_millis();
    let txn = db.begin().await?;

    let existing = subscriptions::Entity::find()
        .filter(subscriptions::Column::UserId.eq(user_id))
        .one(&txn)
        .await?;

    match existing {
        Some(sub) => {
            let mut active: subscriptions::ActiveModel = sub.into();
            active.stripe_customer_id = Set(Some(update.stripe_customer_id));
            active.stripe_subscription_id = Set(Some(update.stripe_subscription_id));
            active.status = Set(update.status);
            active.tier = Set(update.tier);
            active.current_period_end = Set(update.current_period_end);
            active.updated_at = Set(now);
            active.update(&txn).await?;
        }
        None => {
            subscriptions::ActiveModel {
                user_id: Set(user_id),
                stripe_customer_id: Set(Some(update.stripe_customer_id)),
                stripe_subscription_id: Set(Some(update.stripe_subscription_id)),
                status: Set(update.status),
                tier: Set(update.tier),
                current_period_end: Set(update.current_period_end),
                created_at: Set(now),
                updated_at: Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await?;
    Ok(())
}

/// Provider cancelled the subscription: mark it canceled and drop to free.
pub async fn deactivate_subscription(
    db: &DatabaseConnection,
    stripe_subscription_id: &str,
) -> Result<(), DbErr> {
    let existing = subscriptions::Entity::find()
        .filter(subscriptions::Column::StripeSubscriptionId.eq(stripe_subscription_id))
        .one(db)
        .await?;

    if let Some(sub) = existing {
        let mut active: subscriptions::ActiveModel = sub.into();
        active.status = Set("canceled".to_owned());
        active.tier = Set(Tier::Free);
        active.updated_at = Set(Utc::now().timestamp_millis());
        active.update(db).await?;
    }

    Ok(())
}

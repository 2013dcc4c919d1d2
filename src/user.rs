//! User accounts.

use crate::orm::users;
use chrono::Utc;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};
use serde::Serialize;

/// User data safe to hand to templates and responses; never carries the
/// password hash.
#[derive(Clone, Debug, Serialize)]
pub struct Profile {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub created_at: i64,
}

impl From<users::Model> for Profile {
    fn from(user: users::Model) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
        }
    }
}

/// Insert a new account. `password` must already be an Argon2 PHC string;
/// the unique email constraint rejects duplicates.
pub async fn insert_user(
    db: &DatabaseConnection,
    email: &str,
    password_hash: &str,
    name: &str,
) -> Result<users::Model, DbErr> {
    let now = Utc::now().timestamp_millis();

    users::ActiveModel {
        email: Set(email.to_owned()),
        password: Set(password_hash.to_owned()),
        name: Set(name.to_owned()),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn get_user_by_id(
    db: &DatabaseConnection,
    user_id: i32,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find_by_id(user_id).one(db).await
}

pub async fn get_user_by_email(
    db: &DatabaseConnection,
    email: &str,
) -> Result<Option<users::Model>, DbErr> {
    users::Entity::find()
        .filter(users::Column::Email.eq(email))
        .one(db)
        .await
}

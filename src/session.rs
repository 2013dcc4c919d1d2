//! Session management.
//!
//! Sessions are rows in the sessions table, keyed by an opaque UUID token
//! carried in the client cookie. Expired rows are removed lazily on lookup;
//! a task endpoint sweeps the rest. Also owns the process-wide Argon2
//! instance used for password hashing.

use crate::db::get_db_pool;
use crate::orm::sessions;
use crate::user::Profile;
use actix_web::{get, Responder};
use argon2::Argon2;
use chrono::Utc;
use once_cell::sync::OnceCell;
use sea_orm::{entity::*, query::*, DatabaseConnection, DbErr};
use uuid::Uuid;

/// Sessions live for seven days from login.
pub const SESSION_MAX_AGE_MS: i64 = 7 * 24 * 60 * 60 * 1000;

/// Cookie key holding the session token.
pub const SESSION_TOKEN_KEY: &str = "token";

static ARGON2: OnceCell<Argon2<'static>> = OnceCell::new();

/// Build the global Argon2 instance. When a SALT env var is present it is
/// used as the hasher's secret (pepper); without it hashes are still salted
/// per-password, just not peppered.
pub fn init() {
    let argon2 = match std::env::var("SALT") {
        Ok(salt) if !salt.is_empty() => {
            let secret: &'static [u8] = Box::leak(salt.into_bytes().into_boxed_slice());
            Argon2::new_with_secret(
                secret,
                argon2::Algorithm::Argon2id,
                argon2::Version::V0x13,
                argon2::Params::default(),
            )
            .expect("SALT is not usable as an Argon2 secret.")
        }
        _ => {
            log::warn!("SALT not set; password hashes will not be peppered.");
            Argon2::default()
        }
    };

    // Idempotent so test setups can call init() repeatedly.
    let _ = ARGON2.set(argon2);
}

pub fn get_argon2() -> &'static Argon2<'static> {
    ARGON2.get().expect("session::init() has not run.")
}

/// Create a session row for a fresh login and return it; the row id is the
/// cookie token.
pub async fn new_session(db: &DatabaseConnection, user_id: i32) -> Result<sessions::Model, DbErr> {
    let now = Utc::now().timestamp_millis();

    sessions::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        user_id: Set(user_id),
        expires_at: Set(now + SESSION_MAX_AGE_MS),
        created_at: Set(now),
    }
    .insert(db)
    .await
}

/// Look up a session by token. An expired row is deleted on the spot and
/// reported as absent.
pub async fn authenticate_by_token(
    db: &DatabaseConnection,
    token: &str,
) -> Result<Option<sessions::Model>, DbErr> {
    let session = sessions::Entity::find_by_id(token.to_owned()).one(db).await?;

    match session {
        Some(session) if session.expires_at < Utc::now().timestamp_millis() => {
            sessions::Entity::delete_many()
                .filter(sessions::Column::Id.eq(token))
                .exec(db)
                .await?;
            Ok(None)
        }
        other => Ok(other),
    }
}

/// Resolve the cookie session to a user profile, if the token is valid.
pub async fn authenticate_by_cookie(cookies: &actix_session::Session) -> Option<Profile> {
    let token = match cookies.get::<String>(SESSION_TOKEN_KEY) {
        Ok(Some(token)) => token,
        _ => return None,
    };

    let db = get_db_pool();
    let session = match authenticate_by_token(db, &token).await {
        Ok(Some(session)) => session,
        Ok(None) => return None,
        Err(err) => {
            log::error!("session lookup failed: {:?}", err);
            return None;
        }
    };

    match crate::user::get_user_by_id(db, session.user_id).await {
        Ok(Some(user)) => Some(user.into()),
        Ok(None) => None,
        Err(err) => {
            log::error!("session user lookup failed: {:?}", err);
            None
        }
    }
}

/// Delete one session (logout). Missing rows are fine.
pub async fn destroy_session(db: &DatabaseConnection, token: &str) -> Result<(), DbErr> {
    sessions::Entity::delete_many()
        .filter(sessions::Column::Id.eq(token))
        .exec(db)
        .await?;
    Ok(())
}

/// Sweep every expired session row; returns how many were removed.
pub async fn expire_sessions(db: &DatabaseConnection) -> Result<u64, DbErr> {
    let res = sessions::Entity::delete_many()
        .filter(sessions::Column::ExpiresAt.lt(Utc::now().timestamp_millis()))
        .exec(db)
        .await?;
    Ok(res.rows_affected)
}

#[get("/task/expire_sessions")]
pub async fn view_task_expire_sessions() -> impl Responder {
    match expire_sessions(get_db_pool()).await {
        Ok(count) => format!("Deleted {} expired sessions.", count),
        Err(err) => {
            log::error!("session sweep failed: {:?}", err);
            "Session sweep failed.".to_owned()
        }
    }
}

//! Integration tests for database-backed sessions.

mod common;
use serial_test::serial;

use blogcraft::orm::sessions;
use blogcraft::session;
use chrono::Utc;
use common::{database::*, fixtures::*};
use sea_orm::{entity::*, query::*};

#[actix_rt::test]
#[serial]
async fn test_new_session_round_trip() {
    let db = setup_test_database().await.expect("test database");
    let user = create_test_user(&db, "sess_user1").await.expect("user");

    let created = session::new_session(&db, user.id).await.expect("session");
    assert!(created.expires_at > created.created_at);

    let found = session::authenticate_by_token(&db, &created.id)
        .await
        .expect("lookup")
        .expect("session valid");
    assert_eq!(found.user_id, user.id);
}

#[actix_rt::test]
#[serial]
async fn test_expired_session_is_deleted_on_lookup() {
    let db = setup_test_database().await.expect("test database");
    let user = create_test_user(&db, "sess_user2").await.expect("user");

    // Insert a row whose expiry is already in the past.
    let now = Utc::now().timestamp_millis();
    let stale = sessions::ActiveModel {
        id: Set("stale-token".to_string()),
        user_id: Set(user.id),
        expires_at: Set(now - 1000),
        created_at: Set(now - 2000),
    }
    .insert(&db)
    .await
    .expect("insert stale session");

    let result = session::authenticate_by_token(&db, &stale.id)
        .await
        .expect("lookup");
    assert!(result.is_none(), "expired session must not authenticate");

    // The lazy delete removed the row.
    let remaining = sessions::Entity::find_by_id(stale.id)
        .one(&db)
        .await
        .expect("lookup");
    assert!(remaining.is_none());
}

#[actix_rt::test]
#[serial]
async fn test_destroy_session() {
    let db = setup_test_database().await.expect("test database");
    let user = create_test_user(&db, "sess_user3").await.expect("user");

    let created = session::new_session(&db, user.id).await.expect("session");
    session::destroy_session(&db, &created.id).await.expect("destroy");

    assert!(session::authenticate_by_token(&db, &created.id)
        .await
        .expect("lookup")
        .is_none());

    // Destroying a missing session is a no-op.
    session::destroy_session(&db, &created.id).await.expect("idempotent");
}

#[actix_rt::test]
#[serial]
async fn test_expire_sessions_sweeps_only_stale_rows() {
    let db = setup_test_database().await.expect("test database");
    let user = create_test_user(&db, "sess_user4").await.expect("user");

    let live = session::new_session(&db, user.id).await.expect("live session");

    let now = Utc::now().timestamp_millis();
    for n in 0..3 {
        sessions::ActiveModel {
            id: Set(format!("stale-{}", n)),
            user_id: Set(user.id),
            expires_at: Set(now - 1),
            created_at: Set(now - 1000),
        }
        .insert(&db)
        .await
        .expect("insert stale session");
    }

    let swept = session::expire_sessions(&db).await.expect("sweep");
    assert_eq!(swept, 3);

    assert!(session::authenticate_by_token(&db, &live.id)
        .await
        .expect("lookup")
        .is_some());

    let count = sessions::Entity::find().count(&db).await.expect("count");
    assert_eq!(count, 1);
}

#[actix_rt::test]
#[serial]
async fn test_sessions_cascade_with_user_deletion() {
    let db = setup_test_database().await.expect("test database");
    let user = create_test_user(&db, "sess_user5").await.expect("user");
    session::new_session(&db, user.id).await.expect("session");

    blogcraft::orm::users::Entity::delete_many()
        .filter(blogcraft::orm::users::Column::Id.eq(user.id))
        .exec(&db)
        .await
        .expect("delete user");

    let count = sessions::Entity::find()
        .filter(sessions::Column::UserId.eq(user.id))
        .count(&db)
        .await
        .expect("count");
    assert_eq!(count, 0);
}

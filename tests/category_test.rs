//! Integration tests for categories: uniqueness, constraints, and the
//! cascade-with-orphaned-posts delete behavior.

mod common;
use serial_test::serial;

use blogcraft::orm::learning_samples::SourceType;
use blogcraft::samples::NewSample;
use blogcraft::{categories, monetization, posts, samples, style};
use common::{database::*, fixtures::*};

#[actix_rt::test]
#[serial]
async fn test_category_name_unique_per_user() {
    let db = setup_test_database().await.expect("test database");
    let user = create_test_user(&db, "cat_user1").await.expect("user");
    let other = create_test_user(&db, "cat_user2").await.expect("user");

    categories::create_category(&db, user.id, "Food", None)
        .await
        .expect("first category");

    let duplicate = categories::create_category(&db, user.id, "Food", None).await;
    let err = duplicate.expect_err("duplicate name for the same user must fail");
    assert!(
        err.to_string().contains("UNIQUE constraint failed"),
        "expected a uniqueness violation, got: {}",
        err
    );

    // Same name under a different account is fine.
    categories::create_category(&db, other.id, "Food", None)
        .await
        .expect("same name for another user");
}

#[actix_rt::test]
#[serial]
async fn test_category_name_length_constraint() {
    let db = setup_test_database().await.expect("test database");
    let user = create_test_user(&db, "cat_len_user").await.expect("user");

    let too_long = "x".repeat(51);
    let err = categories::create_category(&db, user.id, &too_long, None)
        .await
        .expect_err("51-char name must fail");
    assert!(err.to_string().contains("CHECK constraint failed"));
}

#[actix_rt::test]
#[serial]
async fn test_category_delete_cascades_but_orphans_posts() {
    let db = setup_test_database().await.expect("test database");
    let user = create_test_user(&db, "cascade_user").await.expect("user");
    let category = create_test_category(&db, user.id, "Travel").await.expect("category");

    samples::create_learning_sample(
        &db,
        user.id,
        &category.id,
        NewSample {
            source_type: SourceType::File,
            source_url: None,
            file_name: Some("sample.txt".to_string()),
            raw_text: long_text(),
        },
    )
    .await
    .expect("sample");

    style::upsert_style_profile(&db, user.id, &category.id, "{\"tone\":\"warm\"}", 1)
        .await
        .expect("style profile");
    monetization::upsert_monetization_tip(&db, user.id, &category.id, "affiliate links", "Add one per post.")
        .await
        .expect("tip");

    let post = create_test_post(&db, user.id, &category.id).await.expect("post");

    let deleted = categories::delete_category(&db, user.id, &category.id)
        .await
        .expect("delete");
    assert!(deleted);

    // Everything keyed by the category is gone...
    assert_eq!(
        samples::count_samples_for_category(&db, user.id, &category.id)
            .await
            .expect("count"),
        0
    );
    assert!(style::get_style_profile(&db, user.id, &category.id)
        .await
        .expect("profile lookup")
        .is_none());
    assert!(monetization::get_monetization_tip(&db, user.id, &category.id)
        .await
        .expect("tip lookup")
        .is_none());

    // ...but the post survives, now pointing at a category that no longer
    // exists.
    let orphan = posts::get_post_for_user(&db, user.id, &post.id)
        .await
        .expect("post lookup")
        .expect("post still present");
    assert_eq!(orphan.category_id, category.id);
    assert!(categories::get_category_by_id(&db, &category.id)
        .await
        .expect("category lookup")
        .is_none());
}

#[actix_rt::test]
#[serial]
async fn test_delete_scoped_to_owner() {
    let db = setup_test_database().await.expect("test database");
    let owner = create_test_user(&db, "owner_user").await.expect("user");
    let stranger = create_test_user(&db, "stranger_user").await.expect("user");
    let category = create_test_category(&db, owner.id, "Cafes").await.expect("category");

    let deleted = categories::delete_category(&db, stranger.id, &category.id)
        .await
        .expect("delete call");
    assert!(!deleted, "someone else's category must not be deletable");

    assert!(categories::get_category_by_id(&db, &category.id)
        .await
        .expect("lookup")
        .is_some());
}

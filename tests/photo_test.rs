//! Integration tests for photo ordering and the per-post cap.

mod common;
use serial_test::serial;

use blogcraft::photos;
use common::{database::*, fixtures::*};

#[actix_rt::test]
#[serial]
async fn test_sort_order_is_assigned_sequentially() {
    let db = setup_test_database().await.expect("test database");
    let user = create_test_user(&db, "photo_user1").await.expect("user");
    let category = create_test_category(&db, user.id, "Food").await.expect("category");
    let post = create_test_post(&db, user.id, &category.id).await.expect("post");

    for n in 1..=3 {
        let photo = create_test_photo(&db, user.id, &post.id, n).await.expect("photo");
        assert_eq!(photo.sort_order, n as i32);
    }
}

#[actix_rt::test]
#[serial]
async fn test_photo_cap_allows_twenty_rejects_twenty_first() {
    let db = setup_test_database().await.expect("test database");
    let user = create_test_user(&db, "photo_user2").await.expect("user");
    let category = create_test_category(&db, user.id, "Food").await.expect("category");
    let post = create_test_post(&db, user.id, &category.id).await.expect("post");

    for n in 1..=20 {
        create_test_photo(&db, user.id, &post.id, n)
            .await
            .unwrap_or_else(|e| panic!("photo {} should fit under the cap: {}", n, e));
    }

    let err = create_test_photo(&db, user.id, &post.id, 21)
        .await
        .expect_err("21st photo must be rejected");

    // Specifically the cap trigger, not some other constraint.
    assert!(
        blogcraft::schema::is_photo_cap_error(&err),
        "expected the photo cap abort, got: {}",
        err
    );
    assert!(err.to_string().contains("max_photos_per_post_exceeded"));

    // A different post is unaffected.
    let other_post = create_test_post(&db, user.id, &category.id).await.expect("post");
    create_test_photo(&db, user.id, &other_post.id, 1)
        .await
        .expect("other post starts fresh");
}

#[actix_rt::test]
#[serial]
async fn test_reorder_assigns_one_based_order() {
    let db = setup_test_database().await.expect("test database");
    let user = create_test_user(&db, "photo_user3").await.expect("user");
    let category = create_test_category(&db, user.id, "Food").await.expect("category");
    let post = create_test_post(&db, user.id, &category.id).await.expect("post");

    let a = create_test_photo(&db, user.id, &post.id, 1).await.expect("photo a");
    let b = create_test_photo(&db, user.id, &post.id, 2).await.expect("photo b");
    let c = create_test_photo(&db, user.id, &post.id, 3).await.expect("photo c");

    // [A, B, C] -> [C, A, B]. The two-phase shift keeps the unique
    // (postId, sortOrder) index satisfied throughout.
    photos::reorder_photos(
        &db,
        user.id,
        &post.id,
        &[c.id.clone(), a.id.clone(), b.id.clone()],
    )
    .await
    .expect("reorder");

    let ordered = photos::list_photos_by_post(&db, user.id, &post.id)
        .await
        .expect("list");
    let ids: Vec<&str> = ordered.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(ids, vec![c.id.as_str(), a.id.as_str(), b.id.as_str()]);
    assert_eq!(
        ordered.iter().map(|p| p.sort_order).collect::<Vec<_>>(),
        vec![1, 2, 3]
    );
}

#[actix_rt::test]
#[serial]
async fn test_reorder_then_append_continues_from_max() {
    let db = setup_test_database().await.expect("test database");
    let user = create_test_user(&db, "photo_user4").await.expect("user");
    let category = create_test_category(&db, user.id, "Food").await.expect("category");
    let post = create_test_post(&db, user.id, &category.id).await.expect("post");

    let a = create_test_photo(&db, user.id, &post.id, 1).await.expect("photo a");
    let b = create_test_photo(&db, user.id, &post.id, 2).await.expect("photo b");

    photos::reorder_photos(&db, user.id, &post.id, &[b.id.clone(), a.id.clone()])
        .await
        .expect("reorder");

    let next = create_test_photo(&db, user.id, &post.id, 3).await.expect("photo c");
    assert_eq!(next.sort_order, 3);
}

#[actix_rt::test]
#[serial]
async fn test_delete_photo_returns_row() {
    let db = setup_test_database().await.expect("test database");
    let user = create_test_user(&db, "photo_user5").await.expect("user");
    let category = create_test_category(&db, user.id, "Food").await.expect("category");
    let post = create_test_post(&db, user.id, &category.id).await.expect("post");
    let photo = create_test_photo(&db, user.id, &post.id, 1).await.expect("photo");

    let removed = photos::delete_photo(&db, user.id, &photo.id)
        .await
        .expect("delete")
        .expect("row returned");
    assert_eq!(removed.stored_file_path, photo.stored_file_path);

    assert!(photos::delete_photo(&db, user.id, &photo.id)
        .await
        .expect("second delete")
        .is_none());
}

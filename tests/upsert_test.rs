//! Integration tests for the three one-row-per-key upserts: style profile,
//! crawl summary, and monetization tip. Two sequential upserts must leave
//! exactly one row, keeping its id and createdAt from the first call.

mod common;
use serial_test::serial;

use blogcraft::crawl::{self, CrawlDigest};
use blogcraft::orm::{crawl_summaries, monetization_tips, style_profiles};
use blogcraft::{monetization, style};
use common::{database::*, fixtures::*};
use sea_orm::{entity::*, query::*};

#[actix_rt::test]
#[serial]
async fn test_style_profile_upsert_is_idempotent() {
    let db = setup_test_database().await.expect("test database");
    let user = create_test_user(&db, "upsert_user1").await.expect("user");
    let category = create_test_category(&db, user.id, "Food").await.expect("category");

    let first = style::upsert_style_profile(&db, user.id, &category.id, "{\"tone\":\"dry\"}", 5)
        .await
        .expect("first upsert");
    let second = style::upsert_style_profile(&db, user.id, &category.id, "{\"tone\":\"warm\"}", 7)
        .await
        .expect("second upsert");

    assert_eq!(second.id, first.id, "id is stable across upserts");
    assert_eq!(second.created_at, first.created_at, "createdAt never changes");
    assert!(second.updated_at >= first.updated_at);
    assert_eq!(second.profile_json, "{\"tone\":\"warm\"}");
    assert_eq!(second.sample_count, 7);

    let rows = style_profiles::Entity::find()
        .filter(style_profiles::Column::UserId.eq(user.id))
        .filter(style_profiles::Column::CategoryId.eq(category.id.as_str()))
        .count(&db)
        .await
        .expect("count");
    assert_eq!(rows, 1, "exactly one row per (user, category)");
}

#[actix_rt::test]
#[serial]
async fn test_style_profiles_are_scoped_per_category() {
    let db = setup_test_database().await.expect("test database");
    let user = create_test_user(&db, "upsert_user2").await.expect("user");
    let food = create_test_category(&db, user.id, "Food").await.expect("category");
    let travel = create_test_category(&db, user.id, "Travel").await.expect("category");

    let a = style::upsert_style_profile(&db, user.id, &food.id, "{}", 5)
        .await
        .expect("food profile");
    let b = style::upsert_style_profile(&db, user.id, &travel.id, "{}", 5)
        .await
        .expect("travel profile");
    assert_ne!(a.id, b.id);
}

#[actix_rt::test]
#[serial]
async fn test_crawl_summary_upsert_is_idempotent() {
    let db = setup_test_database().await.expect("test database");
    let user = create_test_user(&db, "upsert_user3").await.expect("user");
    let category = create_test_category(&db, user.id, "Food").await.expect("category");
    let post = create_test_post(&db, user.id, &category.id).await.expect("post");

    let first = crawl::upsert_crawl_summary(
        &db,
        user.id,
        &post.id,
        &CrawlDigest {
            total_count: 17,
            average_rating: Some(4.2),
            summary_text: "First pass over the sources.".to_string(),
        },
    )
    .await
    .expect("first upsert");

    let second = crawl::upsert_crawl_summary(
        &db,
        user.id,
        &post.id,
        &CrawlDigest {
            total_count: 12,
            average_rating: None,
            summary_text: "Second pass over the sources.".to_string(),
        },
    )
    .await
    .expect("second upsert");

    assert_eq!(second.id, first.id);
    assert_eq!(second.created_at, first.created_at);
    assert_eq!(second.total_count, 12);
    assert!(second.average_rating.is_none());
    assert_eq!(second.summary_text, "Second pass over the sources.");

    let rows = crawl_summaries::Entity::find()
        .filter(crawl_summaries::Column::PostId.eq(post.id.as_str()))
        .count(&db)
        .await
        .expect("count");
    assert_eq!(rows, 1);
}

#[actix_rt::test]
#[serial]
async fn test_monetization_tip_upsert_is_idempotent() {
    let db = setup_test_database().await.expect("test database");
    let user = create_test_user(&db, "upsert_user4").await.expect("user");
    let category = create_test_category(&db, user.id, "Food").await.expect("category");

    let first = monetization::upsert_monetization_tip(
        &db,
        user.id,
        &category.id,
        "affiliate links",
        "Link the gear you actually used.",
    )
    .await
    .expect("first upsert");

    let second = monetization::upsert_monetization_tip(
        &db,
        user.id,
        &category.id,
        "sponsored posts",
        "Disclose the sponsorship up front.",
    )
    .await
    .expect("second upsert");

    assert_eq!(second.id, first.id);
    assert_eq!(second.created_at, first.created_at);
    assert!(second.updated_at >= first.updated_at);
    assert_eq!(second.recommended_method, "sponsored posts");

    let rows = monetization_tips::Entity::find()
        .filter(monetization_tips::Column::CategoryId.eq(category.id.as_str()))
        .count(&db)
        .await
        .expect("count");
    assert_eq!(rows, 1);
}

#[actix_rt::test]
#[serial]
async fn test_crawl_sources_insert_and_summary_flow() {
    let db = setup_test_database().await.expect("test database");
    let user = create_test_user(&db, "upsert_user5").await.expect("user");
    let category = create_test_category(&db, user.id, "Food").await.expect("category");
    let post = create_test_post(&db, user.id, &category.id).await.expect("post");

    let mock = crawl::generate_mock_crawl_data(&post.location_name);
    let digest = crawl::generate_mock_summary(&post.location_name, &mock);

    let inserted = crawl::insert_crawl_sources(&db, user.id, &post.id, mock)
        .await
        .expect("insert sources");
    assert_eq!(inserted.len(), 17);

    let summary = crawl::upsert_crawl_summary(&db, user.id, &post.id, &digest)
        .await
        .expect("summary");
    assert_eq!(summary.total_count, 17);

    let listed = crawl::list_crawl_sources(&db, user.id, &post.id)
        .await
        .expect("list");
    assert_eq!(listed.len(), 17);
}

//! Integration tests for post versions and their analysis records.

mod common;
use serial_test::serial;

use blogcraft::analysis::{analyze_seo, PlagiarismResult};
use blogcraft::orm::posts::Status;
use blogcraft::versions::{self, NewVersion};
use blogcraft::posts;
use common::{database::*, fixtures::*};

fn version_body(n: usize) -> NewVersion {
    NewVersion {
        prompt_note: String::new(),
        title: format!("Harbor Noodles, draft {}", n),
        content_markdown: long_text(),
    }
}

#[actix_rt::test]
#[serial]
async fn test_version_numbers_start_at_one_and_increment() {
    let db = setup_test_database().await.expect("test database");
    let user = create_test_user(&db, "ver_user1").await.expect("user");
    let category = create_test_category(&db, user.id, "Food").await.expect("category");
    let post = create_test_post(&db, user.id, &category.id).await.expect("post");

    let first = versions::create_post_version_next(&db, user.id, &post.id, version_body(1))
        .await
        .expect("first version");
    assert_eq!(first.version_number, 1);

    let second = versions::create_post_version_next(&db, user.id, &post.id, version_body(2))
        .await
        .expect("second version");
    assert_eq!(second.version_number, 2);
    assert_ne!(first.id, second.id);

    // Both snapshots persist; nothing was overwritten.
    let all = versions::list_versions(&db, user.id, &post.id)
        .await
        .expect("list");
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].version_number, 1);
    assert_eq!(all[1].version_number, 2);

    let latest = versions::get_latest_version(&db, user.id, &post.id)
        .await
        .expect("latest")
        .expect("present");
    assert_eq!(latest.id, second.id);
}

#[actix_rt::test]
#[serial]
async fn test_version_numbering_is_per_post() {
    let db = setup_test_database().await.expect("test database");
    let user = create_test_user(&db, "ver_user2").await.expect("user");
    let category = create_test_category(&db, user.id, "Food").await.expect("category");
    let post_a = create_test_post(&db, user.id, &category.id).await.expect("post a");
    let post_b = create_test_post(&db, user.id, &category.id).await.expect("post b");

    versions::create_post_version_next(&db, user.id, &post_a.id, version_body(1))
        .await
        .expect("a v1");
    let b1 = versions::create_post_version_next(&db, user.id, &post_b.id, version_body(1))
        .await
        .expect("b v1");
    assert_eq!(b1.version_number, 1);
}

#[actix_rt::test]
#[serial]
async fn test_version_content_length_constraint() {
    let db = setup_test_database().await.expect("test database");
    let user = create_test_user(&db, "ver_user3").await.expect("user");
    let category = create_test_category(&db, user.id, "Food").await.expect("category");
    let post = create_test_post(&db, user.id, &category.id).await.expect("post");

    let err = versions::create_post_version_next(
        &db,
        user.id,
        &post.id,
        NewVersion {
            prompt_note: String::new(),
            title: "Too short".to_string(),
            content_markdown: "tiny".to_string(),
        },
    )
    .await
    .expect_err("sub-200-char content must fail");
    assert!(err.to_string().contains("CHECK constraint failed"));
}

#[actix_rt::test]
#[serial]
async fn test_analysis_records_attach_to_version() {
    let db = setup_test_database().await.expect("test database");
    let user = create_test_user(&db, "ver_user4").await.expect("user");
    let category = create_test_category(&db, user.id, "Food").await.expect("category");
    let post = create_test_post(&db, user.id, &category.id).await.expect("post");

    let version = versions::create_post_version_next(&db, user.id, &post.id, version_body(1))
        .await
        .expect("version");

    let plagiarism = PlagiarismResult {
        similarity_score: 42,
        passed: true,
        compared_source_ids: vec!["src-1".to_string(), "src-2".to_string()],
    };
    let check =
        versions::create_plagiarism_check(&db, user.id, &post.id, &version.id, &plagiarism)
            .await
            .expect("check");
    assert_eq!(check.similarity_score, 42);
    assert!(check.passed);

    // The id list survives the serialize-to-one-column contract.
    let ids: Vec<String> = serde_json::from_str(&check.compared_source_ids).expect("json");
    assert_eq!(ids, vec!["src-1", "src-2"]);

    let latest = versions::get_latest_plagiarism_check(&db, user.id, &post.id, &version.id)
        .await
        .expect("latest")
        .expect("present");
    assert_eq!(latest.id, check.id);

    let scores = analyze_seo(&version.title, &version.content_markdown, "Harbor Noodles");
    let analysis = versions::create_seo_analysis(&db, user.id, &post.id, &version.id, &scores)
        .await
        .expect("analysis");
    assert_eq!(analysis.overall_score, scores.overall_score);

    let suggestions: Vec<String> = serde_json::from_str(&analysis.suggestions).expect("json");
    assert_eq!(suggestions, scores.suggestions);

    let latest_seo = versions::get_latest_seo_analysis(&db, user.id, &post.id, &version.id)
        .await
        .expect("latest")
        .expect("present");
    assert_eq!(latest_seo.id, analysis.id);
}

#[actix_rt::test]
#[serial]
async fn test_post_content_update_and_status() {
    let db = setup_test_database().await.expect("test database");
    let user = create_test_user(&db, "ver_user5").await.expect("user");
    let category = create_test_category(&db, user.id, "Food").await.expect("category");
    let post = create_test_post(&db, user.id, &category.id).await.expect("post");
    assert_eq!(post.status, Status::Draft);

    posts::update_post_content(
        &db,
        user.id,
        &post.id,
        "Harbor Noodles on a rainy day",
        &long_text(),
        Status::Generated,
    )
    .await
    .expect("content update");

    let updated = posts::get_post_for_user(&db, user.id, &post.id)
        .await
        .expect("lookup")
        .expect("present");
    assert_eq!(updated.status, Status::Generated);
    assert_eq!(updated.title, "Harbor Noodles on a rainy day");
    assert!(updated.updated_at >= post.updated_at);

    posts::update_post_status(&db, user.id, &post.id, Status::Exported)
        .await
        .expect("status update");
    let exported = posts::get_post_for_user(&db, user.id, &post.id)
        .await
        .expect("lookup")
        .expect("present");
    assert_eq!(exported.status, Status::Exported);
}

#[actix_rt::test]
#[serial]
async fn test_post_delete_cascades_versions_and_checks() {
    let db = setup_test_database().await.expect("test database");
    let user = create_test_user(&db, "ver_user6").await.expect("user");
    let category = create_test_category(&db, user.id, "Food").await.expect("category");
    let post = create_test_post(&db, user.id, &category.id).await.expect("post");

    let version = versions::create_post_version_next(&db, user.id, &post.id, version_body(1))
        .await
        .expect("version");
    let plagiarism = PlagiarismResult {
        similarity_score: 0,
        passed: true,
        compared_source_ids: vec![],
    };
    versions::create_plagiarism_check(&db, user.id, &post.id, &version.id, &plagiarism)
        .await
        .expect("check");

    assert!(posts::delete_post(&db, user.id, &post.id).await.expect("delete"));

    assert!(versions::get_version_by_id(&db, &version.id)
        .await
        .expect("lookup")
        .is_none());
    assert!(
        versions::get_latest_plagiarism_check(&db, user.id, &post.id, &version.id)
            .await
            .expect("lookup")
            .is_none()
    );
}

//! Post version snapshots and their analysis records.
//!
//! Versions are immutable and numbered from 1 per post. The next number is
//! computed and inserted inside one transaction so concurrent generation
//! runs for the same post cannot collide on (postId, versionNumber).
//! Plagiarism checks and SEO analyses hang off a version and are likewise
//! append-only; "latest" means most recent createdAt.

use crate::analysis::{PlagiarismResult, SeoScores};
use crate::orm::{plagiarism_checks, post_versions, seo_analyses};
use chrono::Utc;
use sea_orm::{entity::*, query::*, ConnectionTrait, DatabaseConnection, DbErr, TransactionTrait};
use uuid::Uuid;

pub struct NewVersion {
    pub prompt_note: String,
    pub title: String,
    pub content_markdown: String,
}

/// Insert the next version of a post: max(versionNumber) + 1, or 1 when the
/// post has none yet. Runs inside a transaction (a savepoint when the caller
/// already holds one).
pub async fn create_post_version_next<C>(
    db: &C,
    user_id: i32,
    post_id: &str,
    version: NewVersion,
) -> Result<post_versions::Model, DbErr>
where
    C: ConnectionTrait + TransactionTrait,
{
    let txn = db.begin().await?;

    let latest = post_versions::Entity::find()
        .filter(post_versions::Column::PostId.eq(post_id))
        .order_by_desc(post_versions::Column::VersionNumber)
        .one(&txn)
        .await?;
    let next_number = latest.map(|v| v.version_number).unwrap_or(0) + 1;

    let model = post_versions::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        user_id: Set(user_id),
        post_id: Set(post_id.to_owned()),
        version_number: Set(next_number),
        prompt_note: Set(version.prompt_note),
        title: Set(version.title),
        content_markdown: Set(version.content_markdown),
        created_at: Set(Utc::now().timestamp_millis()),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;
    Ok(model)
}

/// Highest-numbered version, or None for a fresh post.
pub async fn get_latest_version(
    db: &DatabaseConnection,
    user_id: i32,
    post_id: &str,
) -> Result<Option<post_versions::Model>, DbErr> {
    post_versions::Entity::find()
        .filter(post_versions::Column::UserId.eq(user_id))
        .filter(post_versions::Column::PostId.eq(post_id))
        .order_by_desc(post_versions::Column::VersionNumber)
        .one(db)
        .await
}

pub async fn list_versions(
    db: &DatabaseConnection,
    user_id: i32,
    post_id: &str,
) -> Result<Vec<post_versions::Model>, DbErr> {
    post_versions::Entity::find()
        .filter(post_versions::Column::UserId.eq(user_id))
        .filter(post_versions::Column::PostId.eq(post_id))
        .order_by_asc(post_versions::Column::VersionNumber)
        .all(db)
        .await
}

pub async fn get_version_by_id(
    db: &DatabaseConnection,
    version_id: &str,
) -> Result<Option<post_versions::Model>, DbErr> {
    post_versions::Entity::find_by_id(version_id.to_owned())
        .one(db)
        .await
}

/// Persist a plagiarism result against a version. The compared source ids
/// are stored as one JSON array string.
pub async fn create_plagiarism_check<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    post_id: &str,
    version_id: &str,
    result: &PlagiarismResult,
) -> Result<plagiarism_checks::Model, DbErr> {
    let compared_json = serde_json::to_string(&result.compared_source_ids)
        .map_err(|e| DbErr::Custom(format!("comparedSourceIds serialization: {}", e)))?;

    plagiarism_checks::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        user_id: Set(user_id),
        post_id: Set(post_id.to_owned()),
        version_id: Set(version_id.to_owned()),
        similarity_score: Set(result.similarity_score),
        compared_source_ids: Set(compared_json),
        passed: Set(result.passed),
        created_at: Set(Utc::now().timestamp_millis()),
    }
    .insert(db)
    .await
}

/// Latest plagiarism check for a version, if any has been run.
pub async fn get_latest_plagiarism_check(
    db: &DatabaseConnection,
    user_id: i32,
    post_id: &str,
    version_id: &str,
) -> Result<Option<plagiarism_checks::Model>, DbErr> {
    plagiarism_checks::Entity::find()
        .filter(plagiarism_checks::Column::UserId.eq(user_id))
        .filter(plagiarism_checks::Column::PostId.eq(post_id))
        .filter(plagiarism_checks::Column::VersionId.eq(version_id))
        .order_by_desc(plagiarism_checks::Column::CreatedAt)
        .one(db)
        .await
}

/// Persist SEO scores against a version; suggestions become one JSON array
/// string.
pub async fn create_seo_analysis<C: ConnectionTrait>(
    db: &C,
    user_id: i32,
    post_id: &str,
    version_id: &str,
    scores: &SeoScores,
) -> Result<seo_analyses::Model, DbErr> {
    let suggestions_json = serde_json::to_string(&scores.suggestions)
        .map_err(|e| DbErr::Custom(format!("suggestions serialization: {}", e)))?;

    seo_analyses::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        user_id: Set(user_id),
        post_id: Set(post_id.to_owned()),
        version_id: Set(version_id.to_owned()),
        keyword_density_score: Set(scores.keyword_density_score),
        title_optimization_score: Set(scores.title_optimization_score),
        meta_description_score: Set(scores.meta_description_score),
        readability_score: Set(scores.readability_score),
        internal_links_score: Set(scores.internal_links_score),
        overall_score: Set(scores.overall_score),
        suggestions: Set(suggestions_json),
        created_at: Set(Utc::now().timestamp_millis()),
    }
    .insert(db)
    .await
}

/// Latest SEO analysis for a version, if any has been run.
pub async fn get_latest_seo_analysis(
    db: &DatabaseConnection,
    user_id: i32,
    post_id: &str,
    version_id: &str,
) -> Result<Option<seo_analyses::Model>, DbErr> {
    seo_analyses::Entity::find()
        .filter(seo_analyses::Column::UserId.eq(user_id))
        .filter(seo_analyses::Column::PostId.eq(post_id))
        .filter(seo_analyses::Column::VersionId.eq(version_id))
        .order_by_desc(seo_analyses::Column::CreatedAt)
        .one(db)
        .await
}

//! Draft generation workflow.
//!
//! Given a post: gather the style profile, photos, and crawl data; call the
//! content provider; then persist the outcome. The external call happens
//! before any write. The four writes (version snapshot, post update,
//! plagiarism check, SEO analysis) share one transaction so a mid-workflow
//! failure cannot leave a version without its analyses.

use crate::analysis::{analyze_seo, check_plagiarism, SourceSnippet};
use crate::llm::{self, GenerationRequest, LlmError};
use crate::orm::posts::Status;
use crate::orm::{plagiarism_checks, post_versions, posts, seo_analyses};
use crate::versions::NewVersion;
use crate::{crawl, photos, posts as post_repo, style, versions};
use sea_orm::{DatabaseConnection, DbErr, TransactionTrait};

/// Generation workflow error
#[derive(Debug)]
pub enum GenerationError {
    /// The post does not exist or belongs to someone else
    NotFound,
    /// The content provider is unconfigured or failed
    Provider(LlmError),
    /// A storage operation failed
    Database(DbErr),
}

impl std::fmt::Display for GenerationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GenerationError::NotFound => write!(f, "Post not found"),
            GenerationError::Provider(e) => write!(f, "{}", e),
            GenerationError::Database(e) => write!(f, "Database error: {}", e),
        }
    }
}

impl std::error::Error for GenerationError {}

impl From<DbErr> for GenerationError {
    fn from(e: DbErr) -> Self {
        GenerationError::Database(e)
    }
}

/// Everything one generation run produced.
#[derive(Debug)]
pub struct GenerationOutcome {
    pub version: post_versions::Model,
    pub plagiarism_check: plagiarism_checks::Model,
    pub seo_analysis: seo_analyses::Model,
    pub post: posts::Model,
}

/// Run the full workflow for a post. Fails fast when the provider is not
/// configured, before touching the post at all.
pub async fn generate_post(
    db: &DatabaseConnection,
    user_id: i32,
    post_id: &str,
    prompt_note: Option<String>,
) -> Result<GenerationOutcome, GenerationError> {
    if !llm::is_configured() {
        return Err(GenerationError::Provider(LlmError::NotConfigured));
    }

    let post = post_repo::get_post_for_user(db, user_id, post_id)
        .await?
        .ok_or(GenerationError::NotFound)?;

    // Gather the generation bundle.
    let style_profile = style::get_style_profile(db, user_id, &post.category_id).await?;
    let post_photos = photos::list_photos_by_post(db, user_id, post_id).await?;
    let crawl_summary = crawl::get_crawl_summary(db, user_id, post_id).await?;
    let crawl_sources = crawl::list_crawl_sources(db, user_id, post_id).await?;

    let generated = llm::generate_post_content(GenerationRequest {
        style_profile: style_profile
            .map(|p| p.profile_json)
            .unwrap_or_else(|| "{}".to_owned()),
        location_name: post.location_name.clone(),
        overall_note: post.overall_note.clone(),
        photos: post_photos
            .iter()
            .map(|p| (p.original_file_name.clone(), p.memo.clone()))
            .collect(),
        crawl_summary: crawl_summary.map(|s| s.summary_text),
        crawl_sources: crawl_sources
            .iter()
            .map(|s| (s.provider.as_str().to_owned(), s.snippet_text.clone()))
            .collect(),
        prompt_note: prompt_note.clone(),
    })
    .await
    .map_err(GenerationError::Provider)?;

    // Score the draft before opening the transaction; both checks are pure.
    let plagiarism = check_plagiarism(
        &generated.content_markdown,
        &crawl_sources
            .iter()
            .map(|s| SourceSnippet {
                id: s.id.clone(),
                snippet_text: s.snippet_text.clone(),
            })
            .collect::<Vec<_>>(),
    );
    let seo = analyze_seo(
        &generated.title,
        &generated.content_markdown,
        &post.location_name,
    );

    let txn = db.begin().await?;

    let version = versions::create_post_version_next(
        &txn,
        user_id,
        post_id,
        NewVersion {
            prompt_note: prompt_note.unwrap_or_default(),
            title: generated.title.clone(),
            content_markdown: generated.content_markdown.clone(),
        },
    )
    .await?;

    post_repo::update_post_content(
        &txn,
        user_id,
        post_id,
        &generated.title,
        &generated.content_markdown,
        Status::Generated,
    )
    .await?;

    let plagiarism_check =
        versions::create_plagiarism_check(&txn, user_id, post_id, &version.id, &plagiarism)
            .await?;
    let seo_analysis =
        versions::create_seo_analysis(&txn, user_id, post_id, &version.id, &seo).await?;

    txn.commit().await?;

    let post = post_repo::get_post_for_user(db, user_id, post_id)
        .await?
        .ok_or(GenerationError::NotFound)?;

    log::info!(
        "Generated version {} for post {} (similarity {}, SEO {})",
        version.version_number,
        post_id,
        plagiarism_check.similarity_score,
        seo_analysis.overall_score,
    );

    Ok(GenerationOutcome {
        version,
        plagiarism_check,
        seo_analysis,
        post,
    })
}

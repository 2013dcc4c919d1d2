//! Generation API: the full draft workflow for one post.

use crate::db::get_db_pool;
use crate::generation::{self, GenerationError};
use crate::llm::LlmError;
use crate::middleware::ClientCtx;
use actix_web::{error, post, web, Error, HttpResponse};
use serde::Deserialize;
use serde_json::json;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(generate_post);
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct GenerateForm {
    prompt_note: Option<String>,
}

#[post("/api/posts/{post_id}/generate")]
pub async fn generate_post(
    client: ClientCtx,
    path: web::Path<String>,
    form: Option<web::Json<GenerateForm>>,
) -> Result<HttpResponse, Error> {
    let user = client.require_user()?;

    if let Err(e) = crate::rate_limit::check_generation_rate_limit(user.id) {
        return Err(error::ErrorTooManyRequests(format!(
            "Generation limit reached. Please wait {} seconds.",
            e.retry_after_seconds
        )));
    }

    let prompt_note = form.and_then(|f| f.into_inner().prompt_note);

    let outcome = generation::generate_post(get_db_pool(), user.id, &path, prompt_note)
        .await
        .map_err(|e| match e {
            GenerationError::NotFound => error::ErrorNotFound("Post not found."),
            GenerationError::Provider(LlmError::NotConfigured) => error::ErrorServiceUnavailable(
                "Content generation service is not configured.",
            ),
            GenerationError::Provider(provider_err) => {
                log::error!("generation provider error: {}", provider_err);
                error::ErrorBadGateway("The content provider failed.")
            }
            GenerationError::Database(db_err) => super::error::from_db_err(db_err),
        })?;

    Ok(HttpResponse::Created().json(json!({
        "version": outcome.version,
        "plagiarismCheck": outcome.plagiarism_check,
        "seoAnalysis": outcome.seo_analysis,
        "post": outcome.post,
    })))
}

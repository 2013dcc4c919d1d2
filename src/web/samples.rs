//! Learning sample API.

use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::orm::learning_samples::SourceType;
use crate::samples::{self, NewSample};
use crate::validation::is_valid_http_url;
use actix_web::{delete, error, get, post, web, Error, HttpResponse};
use serde::Deserialize;
use serde_json::json;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(create_sample)
        .service(list_samples)
        .service(delete_sample);
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateSampleForm {
    source_type: String,
    source_url: Option<String>,
    file_name: Option<String>,
    raw_text: String,
}

#[post("/api/categories/{category_id}/learning-samples")]
pub async fn create_sample(
    client: ClientCtx,
    path: web::Path<String>,
    form: web::Json<CreateSampleForm>,
) -> Result<HttpResponse, Error> {
    let user = client.require_user()?;
    let db = get_db_pool();
    super::categories::require_category(db, user.id, &path).await?;

    let source_type = match form.source_type.as_str() {
        "url" => SourceType::Url,
        "file" => SourceType::File,
        other => {
            return Err(error::ErrorBadRequest(format!(
                "Unknown source type \"{}\"; expected url or file.",
                other
            )))
        }
    };

    match source_type {
        SourceType::Url => {
            let url = form.source_url.as_deref().unwrap_or_default();
            if !is_valid_http_url(url) {
                return Err(error::ErrorBadRequest(
                    "URL samples need a valid http(s) sourceUrl.",
                ));
            }
        }
        SourceType::File => {
            if form.file_name.as_deref().unwrap_or_default().is_empty() {
                return Err(error::ErrorBadRequest("File samples need a fileName."));
            }
        }
    }

    let text_len = form.raw_text.chars().count();
    if !(200..=200_000).contains(&text_len) {
        return Err(error::ErrorBadRequest(
            "Sample text runs 200-200000 characters.",
        ));
    }

    let sample = samples::create_learning_sample(
        db,
        user.id,
        &path,
        NewSample {
            source_type,
            source_url: form.source_url.clone(),
            file_name: form.file_name.clone(),
            raw_text: form.raw_text.clone(),
        },
    )
    .await
    .map_err(super::error::from_db_err)?;

    Ok(HttpResponse::Created().json(json!({ "sample": sample })))
}

#[get("/api/categories/{category_id}/learning-samples")]
pub async fn list_samples(
    client: ClientCtx,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let user = client.require_user()?;
    let db = get_db_pool();
    super::categories::require_category(db, user.id, &path).await?;

    let samples = samples::list_samples_for_category(db, user.id, &path)
        .await
        .map_err(super::error::from_db_err)?;

    Ok(HttpResponse::Ok().json(json!({ "samples": samples })))
}

#[delete("/api/categories/{category_id}/learning-samples/{sample_id}")]
pub async fn delete_sample(
    client: ClientCtx,
    path: web::Path<(String, String)>,
) -> Result<HttpResponse, Error> {
    let user = client.require_user()?;
    let (category_id, sample_id) = path.into_inner();
    let db = get_db_pool();
    super::categories::require_category(db, user.id, &category_id).await?;

    let deleted = samples::delete_learning_sample(db, user.id, &sample_id)
        .await
        .map_err(super::error::from_db_err)?;

    if !deleted {
        return Err(error::ErrorNotFound("Sample not found."));
    }

    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

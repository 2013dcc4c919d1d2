//! Style profile API: fetch, and regenerate from learning samples.

use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::{llm, samples, style};
use actix_web::{error, get, post, web, Error, HttpResponse};
use serde_json::json;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_style_profile).service(generate_style_profile);
}

#[get("/api/categories/{category_id}/style-profile")]
pub async fn view_style_profile(
    client: ClientCtx,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let user = client.require_user()?;
    let db = get_db_pool();
    super::categories::require_category(db, user.id, &path).await?;

    let profile = style::get_style_profile(db, user.id, &path)
        .await
        .map_err(super::error::from_db_err)?;

    Ok(HttpResponse::Ok().json(json!({ "profile": profile })))
}

#[post("/api/categories/{category_id}/style-profile/generate")]
pub async fn generate_style_profile(
    client: ClientCtx,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let user = client.require_user()?;
    let db = get_db_pool();
    super::categories::require_category(db, user.id, &path).await?;

    let min_samples = crate::app_config::limits().min_samples_for_profile as usize;
    let sample_count = samples::count_samples_for_category(db, user.id, &path)
        .await
        .map_err(super::error::from_db_err)?;
    if sample_count < min_samples {
        return Err(error::ErrorConflict(format!(
            "A style profile needs at least {} learning samples; this category has {}.",
            min_samples, sample_count
        )));
    }

    if !llm::is_configured() {
        return Err(error::ErrorServiceUnavailable(
            "Content generation service is not configured.",
        ));
    }

    let sample_rows = samples::list_samples_for_category(db, user.id, &path)
        .await
        .map_err(super::error::from_db_err)?;
    let texts: Vec<String> = sample_rows.iter().map(|s| s.raw_text.clone()).collect();

    let profile_json = llm::generate_style_profile(&texts).await.map_err(|e| {
        log::error!("style profile generation failed: {}", e);
        error::ErrorBadGateway("The style analysis provider failed.")
    })?;

    let profile = style::upsert_style_profile(
        db,
        user.id,
        &path,
        &profile_json,
        sample_rows.len() as i32,
    )
    .await
    .map_err(super::error::from_db_err)?;

    Ok(HttpResponse::Created().json(json!({ "profile": profile })))
}

//! Post API.

use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::{photos, posts, versions};
use actix_web::{delete, error, get, post, web, Error, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(create_post)
        .service(list_posts)
        .service(view_post)
        .service(delete_post);
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostForm {
    category_id: String,
    #[validate(length(min = 1, max = 80))]
    location_name: String,
    #[validate(length(min = 1, max = 5000))]
    overall_note: String,
}

#[post("/api/posts")]
pub async fn create_post(
    client: ClientCtx,
    form: web::Json<CreatePostForm>,
) -> Result<HttpResponse, Error> {
    let user = client.require_user()?;
    form.validate().map_err(|_| {
        error::ErrorBadRequest("Location runs 1-80 characters, the note 1-5000.")
    })?;

    let db = get_db_pool();
    super::categories::require_category(db, user.id, &form.category_id).await?;

    let post = posts::create_post(
        db,
        user.id,
        &form.category_id,
        form.location_name.trim(),
        form.overall_note.trim(),
    )
    .await
    .map_err(super::error::from_db_err)?;

    Ok(HttpResponse::Created().json(json!({ "post": post })))
}

#[get("/api/posts")]
pub async fn list_posts(client: ClientCtx) -> Result<HttpResponse, Error> {
    let user = client.require_user()?;
    let posts = posts::list_posts_by_user(get_db_pool(), user.id)
        .await
        .map_err(super::error::from_db_err)?;

    Ok(HttpResponse::Ok().json(json!({ "posts": posts })))
}

/// Post detail: the post plus its photos, version history, and the latest
/// analyses of the newest version.
#[get("/api/posts/{post_id}")]
pub async fn view_post(client: ClientCtx, path: web::Path<String>) -> Result<HttpResponse, Error> {
    let user = client.require_user()?;
    let db = get_db_pool();

    let post = posts::get_post_for_user(db, user.id, &path)
        .await
        .map_err(super::error::from_db_err)?
        .ok_or_else(|| error::ErrorNotFound("Post not found."))?;

    let photos = photos::list_photos_by_post(db, user.id, &path)
        .await
        .map_err(super::error::from_db_err)?;
    let versions_list = versions::list_versions(db, user.id, &path)
        .await
        .map_err(super::error::from_db_err)?;

    let (plagiarism_check, seo_analysis) = match versions_list.last() {
        Some(latest) => (
            versions::get_latest_plagiarism_check(db, user.id, &path, &latest.id)
                .await
                .map_err(super::error::from_db_err)?,
            versions::get_latest_seo_analysis(db, user.id, &path, &latest.id)
                .await
                .map_err(super::error::from_db_err)?,
        ),
        None => (None, None),
    };

    Ok(HttpResponse::Ok().json(json!({
        "post": post,
        "photos": photos,
        "versions": versions_list,
        "plagiarismCheck": plagiarism_check,
        "seoAnalysis": seo_analysis,
    })))
}

#[delete("/api/posts/{post_id}")]
pub async fn delete_post(
    client: ClientCtx,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let user = client.require_user()?;
    let db = get_db_pool();

    // Collect stored photo paths before the cascade removes the rows.
    let photo_rows = photos::list_photos_by_post(db, user.id, &path)
        .await
        .map_err(super::error::from_db_err)?;

    let deleted = posts::delete_post(db, user.id, &path)
        .await
        .map_err(super::error::from_db_err)?;
    if !deleted {
        return Err(error::ErrorNotFound("Post not found."));
    }

    let storage = crate::storage::get_storage();
    for photo in photo_rows {
        if let Err(e) = storage.delete_file(&photo.stored_file_path).await {
            log::warn!("orphaned upload {}: {}", photo.stored_file_path, e);
        }
    }

    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

//! Photo upload and ordering API.

use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::photos::{self, NewPhoto};
use crate::posts;
use actix_multipart::Multipart;
use actix_web::{delete, error, get, post, put, web, Error, HttpResponse};
use futures_util::TryStreamExt;
use serde::Deserialize;
use serde_json::json;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(upload_photo)
        .service(list_photos)
        .service(reorder_photos)
        .service(delete_photo);
}

/// Multipart upload: a `file` part plus a `memo` text part.
#[post("/api/posts/{post_id}/photos")]
pub async fn upload_photo(
    client: ClientCtx,
    path: web::Path<String>,
    mut payload: Multipart,
) -> Result<HttpResponse, Error> {
    let user = client.require_user()?;
    let db = get_db_pool();
    require_post(db, user.id, &path).await?;

    let max_bytes = crate::app_config::limits().max_upload_size_mb as usize * 1024 * 1024;
    let mut file_name: Option<String> = None;
    let mut file_bytes = web::BytesMut::new();
    let mut memo = String::new();

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| error::ErrorBadRequest(format!("Malformed upload: {}", e)))?
    {
        let name = field.name().to_owned();
        match name.as_str() {
            "file" => {
                if let Some(content_type) = field.content_type() {
                    if content_type.type_() != mime::IMAGE {
                        return Err(error::ErrorBadRequest("Only image uploads are accepted."));
                    }
                }
                file_name = field
                    .content_disposition()
                    .get_filename()
                    .map(|f| f.to_owned());
                while let Some(chunk) = field
                    .try_next()
                    .await
                    .map_err(|e| error::ErrorBadRequest(format!("Malformed upload: {}", e)))?
                {
                    if file_bytes.len() + chunk.len() > max_bytes {
                        return Err(error::ErrorPayloadTooLarge(format!(
                            "Uploads are capped at {} MB.",
                            crate::app_config::limits().max_upload_size_mb
                        )));
                    }
                    file_bytes.extend_from_slice(&chunk);
                }
            }
            "memo" => {
                while let Some(chunk) = field
                    .try_next()
                    .await
                    .map_err(|e| error::ErrorBadRequest(format!("Malformed upload: {}", e)))?
                {
                    memo.push_str(&String::from_utf8_lossy(&chunk));
                }
            }
            _ => {
                // Drain unknown parts.
                while field.try_next().await.unwrap_or(None).is_some() {}
            }
        }
    }

    let original_file_name =
        file_name.ok_or_else(|| error::ErrorBadRequest("Upload needs a file part."))?;
    if file_bytes.is_empty() {
        return Err(error::ErrorBadRequest("Uploaded file is empty."));
    }
    let memo = memo.trim().to_owned();
    if memo.is_empty() || memo.chars().count() > 500 {
        return Err(error::ErrorBadRequest("Photo memos run 1-500 characters."));
    }

    let stored_file_path = crate::storage::get_storage()
        .put_file(&original_file_name, &file_bytes)
        .await
        .map_err(|e| {
            log::error!("photo store failed: {}", e);
            error::ErrorInternalServerError("Could not store the file.")
        })?;

    let photo = photos::add_photo(
        db,
        user.id,
        &path,
        NewPhoto {
            original_file_name,
            stored_file_path,
            memo,
        },
    )
    .await
    .map_err(super::error::from_db_err)?;

    Ok(HttpResponse::Created().json(json!({ "photo": photo })))
}

#[get("/api/posts/{post_id}/photos")]
pub async fn list_photos(client: ClientCtx, path: web::Path<String>) -> Result<HttpResponse, Error> {
    let user = client.require_user()?;
    let db = get_db_pool();
    require_post(db, user.id, &path).await?;

    let photos = photos::list_photos_by_post(db, user.id, &path)
        .await
        .map_err(super::error::from_db_err)?;

    Ok(HttpResponse::Ok().json(json!({ "photos": photos })))
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderForm {
    ordered_photo_ids: Vec<String>,
}

#[put("/api/posts/{post_id}/photos/order")]
pub async fn reorder_photos(
    client: ClientCtx,
    path: web::Path<String>,
    form: web::Json<ReorderForm>,
) -> Result<HttpResponse, Error> {
    let user = client.require_user()?;
    let db = get_db_pool();
    require_post(db, user.id, &path).await?;

    let existing = photos::list_photos_by_post(db, user.id, &path)
        .await
        .map_err(super::error::from_db_err)?;
    if existing.len() != form.ordered_photo_ids.len() {
        return Err(error::ErrorBadRequest(
            "The ordering must list every photo of the post exactly once.",
        ));
    }

    photos::reorder_photos(db, user.id, &path, &form.ordered_photo_ids)
        .await
        .map_err(super::error::from_db_err)?;

    let photos = photos::list_photos_by_post(db, user.id, &path)
        .await
        .map_err(super::error::from_db_err)?;

    Ok(HttpResponse::Ok().json(json!({ "photos": photos })))
}

#[delete("/api/photos/{photo_id}")]
pub async fn delete_photo(
    client: ClientCtx,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let user = client.require_user()?;

    let removed = photos::delete_photo(get_db_pool(), user.id, &path)
        .await
        .map_err(super::error::from_db_err)?
        .ok_or_else(|| error::ErrorNotFound("Photo not found."))?;

    if let Err(e) = crate::storage::get_storage()
        .delete_file(&removed.stored_file_path)
        .await
    {
        log::warn!("orphaned upload {}: {}", removed.stored_file_path, e);
    }

    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

/// 404 unless the post exists and belongs to the user.
pub(super) async fn require_post(
    db: &sea_orm::DatabaseConnection,
    user_id: i32,
    post_id: &str,
) -> Result<crate::orm::posts::Model, Error> {
    posts::get_post_for_user(db, user_id, post_id)
        .await
        .map_err(super::error::from_db_err)?
        .ok_or_else(|| error::ErrorNotFound("Post not found."))
}

//! Crawl API: run the (mock) crawl for a post and read back its results.

use crate::crawl;
use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use actix_web::{get, post, web, Error, HttpResponse};
use serde_json::json;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(run_crawl).service(list_sources);
}

/// Fetch provider snippets for the post's location and upsert the summary.
/// Running it again replaces the summary and appends a fresh batch of
/// sources.
#[post("/api/posts/{post_id}/crawl")]
pub async fn run_crawl(client: ClientCtx, path: web::Path<String>) -> Result<HttpResponse, Error> {
    let user = client.require_user()?;
    let db = get_db_pool();
    let post = super::photos::require_post(db, user.id, &path).await?;

    let mock_sources = crawl::generate_mock_crawl_data(&post.location_name);
    let digest = crawl::generate_mock_summary(&post.location_name, &mock_sources);

    let sources = crawl::insert_crawl_sources(db, user.id, &path, mock_sources)
        .await
        .map_err(super::error::from_db_err)?;
    let summary = crawl::upsert_crawl_summary(db, user.id, &path, &digest)
        .await
        .map_err(super::error::from_db_err)?;

    Ok(HttpResponse::Created().json(json!({ "sources": sources, "summary": summary })))
}

#[get("/api/posts/{post_id}/crawl-sources")]
pub async fn list_sources(
    client: ClientCtx,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let user = client.require_user()?;
    let db = get_db_pool();
    super::photos::require_post(db, user.id, &path).await?;

    let sources = crawl::list_crawl_sources(db, user.id, &path)
        .await
        .map_err(super::error::from_db_err)?;
    let summary = crawl::get_crawl_summary(db, user.id, &path)
        .await
        .map_err(super::error::from_db_err)?;

    Ok(HttpResponse::Ok().json(json!({ "sources": sources, "summary": summary })))
}

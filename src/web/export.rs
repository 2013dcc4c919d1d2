//! Export API: download the post's current draft as markdown.

use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::orm::posts::Status;
use crate::posts;
use actix_web::http::header;
use actix_web::{error, get, web, Error, HttpResponse};

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(export_markdown);
}

#[get("/api/posts/{post_id}/export/markdown")]
pub async fn export_markdown(
    client: ClientCtx,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let user = client.require_user()?;
    let db = get_db_pool();
    let post = super::photos::require_post(db, user.id, &path).await?;

    if post.status == Status::Draft {
        return Err(error::ErrorConflict(
            "Nothing to export yet; generate the post first.",
        ));
    }

    posts::update_post_status(db, user.id, &path, Status::Exported)
        .await
        .map_err(super::error::from_db_err)?;

    let body = format!("# {}\n\n{}\n", post.title, post.content_markdown);
    let file_name = safe_file_name(&post.title);

    Ok(HttpResponse::Ok()
        .content_type("text/markdown; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}.md\"", file_name),
        ))
        .body(body))
}

/// Reduce a title to something safe inside a filename.
fn safe_file_name(title: &str) -> String {
    let cleaned: String = title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        "post".to_owned()
    } else {
        trimmed.chars().take(60).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::safe_file_name;

    #[test]
    fn test_safe_file_name() {
        assert_eq!(safe_file_name("Harbor Noodles: a review!"), "Harbor_Noodles__a_review");
        assert_eq!(safe_file_name("***"), "post");
        assert!(safe_file_name(&"x".repeat(200)).len() <= 60);
    }
}

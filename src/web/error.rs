//! Error pages and database error mapping.

use actix_web::dev::ServiceResponse;
use actix_web::middleware::ErrorHandlerResponse;
use actix_web::{error, Error, HttpResponse, Result};
use sea_orm::DbErr;

/// Map a storage error to a client-facing rejection. Constraint violations
/// are definitive: the caller must not retry them. The message keeps enough
/// detail to tell a duplicate from the photo cap from a bad field value.
pub fn from_db_err(err: DbErr) -> Error {
    let message = err.to_string();

    if crate::schema::is_photo_cap_error(&err) {
        error::ErrorBadRequest(format!(
            "A post can hold at most {} photos.",
            crate::schema::MAX_PHOTOS_PER_POST
        ))
    } else if message.contains("UNIQUE constraint failed") {
        error::ErrorConflict("A record with that value already exists.")
    } else if message.contains("CHECK constraint failed") {
        error::ErrorBadRequest("A field value is outside its allowed range.")
    } else {
        log::error!("database error: {:?}", err);
        error::ErrorInternalServerError("Database error")
    }
}

fn render_error_page<B>(
    res: ServiceResponse<B>,
    body: &'static str,
) -> Result<ErrorHandlerResponse<B>> {
    let (req, original) = res.into_parts();
    let response = HttpResponse::build(original.status())
        .content_type("text/html; charset=utf-8")
        .body(body);
    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, response).map_into_right_body(),
    ))
}

pub fn render_400<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    render_error_page(res, "<h1>400</h1><p>That request was malformed.</p>")
}

pub fn render_404<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    render_error_page(res, "<h1>404</h1><p>Nothing lives at this address.</p>")
}

pub fn render_500<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    render_error_page(res, "<h1>500</h1><p>Something went wrong on our side.</p>")
}

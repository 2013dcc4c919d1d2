use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::session::{self, get_argon2, SESSION_TOKEN_KEY};
use crate::template::CreateUserTemplate;
use actix_web::http::header;
use actix_web::{error, get, post, web, Error, HttpRequest, HttpResponse, Responder};
use argon2::{
    password_hash::{rand_core::OsRng, SaltString},
    PasswordHasher,
};
use askama_actix::TemplateToResponse;
use serde::Deserialize;
use validator::Validate;

#[derive(Deserialize, Validate)]
pub struct FormData {
    #[validate(length(min = 1, max = 80))]
    name: String,
    #[validate(email)]
    email: String,
    #[validate(length(min = 8, max = 1000))]
    password: String,
}

#[get("/signup")]
pub async fn create_user_get(client: ClientCtx) -> impl Responder {
    CreateUserTemplate {
        client,
        error: None,
    }
    .to_response()
}

#[post("/signup")]
pub async fn create_user_post(
    req: HttpRequest,
    cookies: actix_session::Session,
    form: web::Form<FormData>,
) -> Result<HttpResponse, Error> {
    // Rate limiting - prevent registration spam
    let ip = crate::web::client_ip(&req);
    if let Err(e) = crate::rate_limit::check_registration_rate_limit(&ip) {
        log::warn!("Rate limit exceeded for registration: ip={}", ip);
        return Err(error::ErrorTooManyRequests(format!(
            "Too many registration attempts. Please wait {} seconds.",
            e.retry_after_seconds
        )));
    }

    form.validate().map_err(|e| {
        log::debug!("signup validation failed: {}", e);
        error::ErrorBadRequest("Invalid registration data")
    })?;

    let name = form.name.trim();
    let email = form.email.trim().to_lowercase();

    let db = get_db_pool();
    if crate::user::get_user_by_email(db, &email)
        .await
        .map_err(crate::web::error::from_db_err)?
        .is_some()
    {
        return Err(error::ErrorConflict("That email is already in use."));
    }

    let password_hash = get_argon2()
        .hash_password(form.password.as_bytes(), &SaltString::generate(&mut OsRng))
        .map_err(|e| {
            log::error!("Failed to hash password: {}", e);
            error::ErrorInternalServerError("Failed to create user")
        })?
        .to_string();

    let user = crate::user::insert_user(db, &email, &password_hash, name)
        .await
        .map_err(|e| {
            log::error!("Failed to create user: {}", e);
            crate::web::error::from_db_err(e)
        })?;

    log::info!("New user registered: {} (user_id: {})", email, user.id);

    // Log the fresh account straight in.
    let token = session::new_session(db, user.id)
        .await
        .map_err(crate::web::error::from_db_err)?
        .id;

    cookies
        .insert(SESSION_TOKEN_KEY, token)
        .map_err(|_| error::ErrorInternalServerError("middleware error"))?;

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, "/dashboard"))
        .finish())
}

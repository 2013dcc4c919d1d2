use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::session::{self, get_argon2, SESSION_TOKEN_KEY};
use crate::template::LoginTemplate;
use actix_web::http::header;
use actix_web::{error, get, post, web, Error, HttpRequest, HttpResponse, Responder};
use argon2::password_hash::{PasswordHash, PasswordVerifier};
use askama_actix::TemplateToResponse;
use serde::Deserialize;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(post_login).service(view_login);
}

#[derive(Deserialize)]
pub struct FormData {
    email: String,
    password: String,
}

#[get("/login")]
pub async fn view_login(client: ClientCtx) -> impl Responder {
    LoginTemplate {
        client,
        error: None,
    }
    .to_response()
}

#[post("/login")]
pub async fn post_login(
    req: HttpRequest,
    client: ClientCtx,
    cookies: actix_session::Session,
    form: web::Form<FormData>,
) -> Result<HttpResponse, Error> {
    let ip = super::client_ip(&req);
    if let Err(e) = crate::rate_limit::check_login_rate_limit(&ip) {
        log::warn!("Rate limit exceeded for login: ip={}", ip);
        return Err(error::ErrorTooManyRequests(format!(
            "Too many login attempts. Please wait {} seconds.",
            e.retry_after_seconds
        )));
    }

    let db = get_db_pool();
    let email = form.email.trim().to_lowercase();

    let user = crate::user::get_user_by_email(db, &email)
        .await
        .map_err(super::error::from_db_err)?;

    let user = match user {
        Some(user) => user,
        None => {
            // Generic message to avoid account enumeration.
            return Ok(failed_login(client).await);
        }
    };

    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|_| error::ErrorInternalServerError("Stored credentials are unreadable."))?;
    if get_argon2()
        .verify_password(form.password.as_bytes(), &parsed_hash)
        .is_err()
    {
        log::debug!("login failure for {}", email);
        return Ok(failed_login(client).await);
    }

    let token = session::new_session(db, user.id)
        .await
        .map_err(super::error::from_db_err)?
        .id;

    cookies
        .insert(SESSION_TOKEN_KEY, token)
        .map_err(|_| error::ErrorInternalServerError("middleware error"))?;

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, "/dashboard"))
        .finish())
}

async fn failed_login(client: ClientCtx) -> HttpResponse {
    LoginTemplate {
        client,
        error: Some("Invalid email or password.".to_owned()),
    }
    .to_response()
}

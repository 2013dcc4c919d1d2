use crate::db::get_db_pool;
use crate::session::{self, SESSION_TOKEN_KEY};
use actix_web::http::header;
use actix_web::{post, Error, HttpResponse};

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(post_logout);
}

#[post("/logout")]
pub async fn post_logout(cookies: actix_session::Session) -> Result<HttpResponse, Error> {
    if let Ok(Some(token)) = cookies.get::<String>(SESSION_TOKEN_KEY) {
        if let Err(e) = session::destroy_session(get_db_pool(), &token).await {
            log::error!("failed to destroy session: {:?}", e);
        }
    }
    cookies.purge();

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .finish())
}

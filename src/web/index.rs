use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::template::{DashboardTemplate, IndexTemplate};
use crate::{categories, posts};
use actix_web::http::header;
use actix_web::{get, Error, HttpResponse, Responder};
use askama_actix::TemplateToResponse;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(view_index).service(view_dashboard);
}

#[get("/")]
pub async fn view_index(client: ClientCtx) -> impl Responder {
    let site = crate::app_config::site();
    IndexTemplate {
        client,
        site_name: site.name,
        site_description: site.description,
    }
    .to_response()
}

#[get("/dashboard")]
pub async fn view_dashboard(client: ClientCtx) -> Result<HttpResponse, Error> {
    let user_id = match client.get_user_id() {
        Some(id) => id,
        None => {
            return Ok(HttpResponse::Found()
                .insert_header((header::LOCATION, "/login"))
                .finish())
        }
    };

    let db = get_db_pool();
    let categories = categories::list_categories_by_user(db, user_id)
        .await
        .map_err(super::error::from_db_err)?;
    let posts = posts::list_posts_by_user(db, user_id)
        .await
        .map_err(super::error::from_db_err)?;

    Ok(DashboardTemplate {
        client,
        categories,
        posts,
    }
    .to_response())
}

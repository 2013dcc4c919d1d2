//! Category API, including the per-category monetization tip.

use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::{categories, monetization};
use actix_web::{delete, error, get, post, web, Error, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(create_category)
        .service(list_categories)
        .service(view_category)
        .service(delete_category)
        .service(view_monetization_tip)
        .service(set_monetization_tip);
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryForm {
    #[validate(length(min = 1, max = 50))]
    name: String,
    #[validate(length(max = 500))]
    description: Option<String>,
}

#[post("/api/categories")]
pub async fn create_category(
    client: ClientCtx,
    form: web::Json<CreateCategoryForm>,
) -> Result<HttpResponse, Error> {
    let user = client.require_user()?;
    form.validate()
        .map_err(|_| error::ErrorBadRequest("Category names run 1-50 characters."))?;

    let category = categories::create_category(
        get_db_pool(),
        user.id,
        form.name.trim(),
        form.description.as_deref(),
    )
    .await
    .map_err(|e| {
        if e.to_string().contains("UNIQUE constraint failed") {
            error::ErrorConflict("You already have a category with that name.")
        } else {
            super::error::from_db_err(e)
        }
    })?;

    Ok(HttpResponse::Created().json(json!({ "category": category })))
}

#[get("/api/categories")]
pub async fn list_categories(client: ClientCtx) -> Result<HttpResponse, Error> {
    let user = client.require_user()?;
    let categories = categories::list_categories_by_user(get_db_pool(), user.id)
        .await
        .map_err(super::error::from_db_err)?;

    Ok(HttpResponse::Ok().json(json!({ "categories": categories })))
}

#[get("/api/categories/{category_id}")]
pub async fn view_category(
    client: ClientCtx,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let user = client.require_user()?;
    let category = categories::get_category_for_user(get_db_pool(), user.id, &path)
        .await
        .map_err(super::error::from_db_err)?
        .ok_or_else(|| error::ErrorNotFound("Category not found."))?;

    Ok(HttpResponse::Ok().json(json!({ "category": category })))
}

#[delete("/api/categories/{category_id}")]
pub async fn delete_category(
    client: ClientCtx,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let user = client.require_user()?;
    let deleted = categories::delete_category(get_db_pool(), user.id, &path)
        .await
        .map_err(super::error::from_db_err)?;

    if !deleted {
        return Err(error::ErrorNotFound("Category not found."));
    }

    Ok(HttpResponse::Ok().json(json!({ "ok": true })))
}

#[get("/api/categories/{category_id}/monetization-tip")]
pub async fn view_monetization_tip(
    client: ClientCtx,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let user = client.require_user()?;
    let db = get_db_pool();

    require_category(db, user.id, &path).await?;
    let tip = monetization::get_monetization_tip(db, user.id, &path)
        .await
        .map_err(super::error::from_db_err)?;

    Ok(HttpResponse::Ok().json(json!({ "tip": tip })))
}

#[derive(Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MonetizationTipForm {
    #[validate(length(min = 1, max = 60))]
    recommended_method: String,
    #[validate(length(min = 1, max = 500))]
    tip_text: String,
}

#[post("/api/categories/{category_id}/monetization-tip")]
pub async fn set_monetization_tip(
    client: ClientCtx,
    path: web::Path<String>,
    form: web::Json<MonetizationTipForm>,
) -> Result<HttpResponse, Error> {
    let user = client.require_user()?;
    form.validate().map_err(|_| {
        error::ErrorBadRequest("Method runs 1-60 characters, tip text 1-500.")
    })?;

    let db = get_db_pool();
    require_category(db, user.id, &path).await?;

    let tip = monetization::upsert_monetization_tip(
        db,
        user.id,
        &path,
        form.recommended_method.trim(),
        form.tip_text.trim(),
    )
    .await
    .map_err(super::error::from_db_err)?;

    Ok(HttpResponse::Created().json(json!({ "tip": tip })))
}

/// 404 unless the category exists and belongs to the user.
pub(super) async fn require_category(
    db: &sea_orm::DatabaseConnection,
    user_id: i32,
    category_id: &str,
) -> Result<crate::orm::categories::Model, Error> {
    categories::get_category_for_user(db, user_id, category_id)
        .await
        .map_err(super::error::from_db_err)?
        .ok_or_else(|| error::ErrorNotFound("Category not found."))
}

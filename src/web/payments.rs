//! Billing endpoints: checkout, portal, access check, and the provider
//! webhook that drives subscription state.

use crate::db::get_db_pool;
use crate::middleware::ClientCtx;
use crate::payments::{
    self, CheckoutSessionObject, PaymentsError, SubscriptionObject, WebhookEvent,
};
use crate::subscriptions::{self, SubscriptionUpdate};
use actix_web::{error, get, post, web, Error, HttpRequest, HttpResponse};
use chrono::Utc;
use sea_orm::DatabaseConnection;
use serde_json::json;

pub(super) fn configure(conf: &mut actix_web::web::ServiceConfig) {
    conf.service(create_checkout)
        .service(create_portal)
        .service(view_access)
        .service(webhook);
}

#[post("/api/payments/checkout")]
pub async fn create_checkout(client: ClientCtx) -> Result<HttpResponse, Error> {
    let user = client.require_user()?;

    if !payments::is_configured() {
        return Err(error::ErrorServiceUnavailable("Payments are not configured."));
    }

    let base_url = crate::app_config::site().base_url;
    let session = payments::create_checkout_session(
        &user.email,
        &format!("{}/dashboard?checkout=success", base_url),
        &format!("{}/pricing", base_url),
    )
    .await
    .map_err(payments_error)?;

    Ok(HttpResponse::Ok().json(json!({ "id": session.id, "url": session.url })))
}

#[post("/api/payments/portal")]
pub async fn create_portal(client: ClientCtx) -> Result<HttpResponse, Error> {
    let user = client.require_user()?;

    if !payments::is_configured() {
        return Err(error::ErrorServiceUnavailable("Payments are not configured."));
    }

    let db = get_db_pool();
    let customer_id = subscriptions::get_subscription_by_user(db, user.id)
        .await
        .map_err(super::error::from_db_err)?
        .and_then(|s| s.stripe_customer_id)
        .ok_or_else(|| error::ErrorNotFound("No billing account for this user."))?;

    let base_url = crate::app_config::site().base_url;
    let session = payments::create_portal_session(&customer_id, &format!("{}/dashboard", base_url))
        .await
        .map_err(payments_error)?;

    Ok(HttpResponse::Ok().json(json!({ "url": session.url })))
}

#[get("/api/payments/access")]
pub async fn view_access(client: ClientCtx) -> Result<HttpResponse, Error> {
    let user = client.require_user()?;
    let tier = subscriptions::get_tier(get_db_pool(), user.id)
        .await
        .map_err(super::error::from_db_err)?;

    Ok(HttpResponse::Ok().json(json!({ "tier": tier_name(tier) })))
}

/// Raw-body webhook endpoint. The signature covers the exact bytes sent, so
/// the payload must not pass through a JSON extractor first.
#[post("/api/payments/webhook")]
pub async fn webhook(req: HttpRequest, body: web::Bytes) -> Result<HttpResponse, Error> {
    if !payments::is_configured() {
        return Err(error::ErrorServiceUnavailable("Payments are not configured."));
    }

    let signature = req
        .headers()
        .get("stripe-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| error::ErrorBadRequest("Missing signature."))?;

    let payload = std::str::from_utf8(&body)
        .map_err(|_| error::ErrorBadRequest("Webhook payload is not UTF-8."))?;

    let event =
        payments::construct_webhook_event(payload, signature, Utc::now().timestamp())
            .map_err(|e| match e {
                PaymentsError::InvalidSignature => error::ErrorBadRequest("Invalid signature."),
                other => payments_error(other),
            })?;

    apply_webhook_event(get_db_pool(), event)
        .await
        .map_err(super::error::from_db_err)?;

    Ok(HttpResponse::Ok().json(json!({ "received": true })))
}

/// Map a verified event onto the subscriptions table.
async fn apply_webhook_event(
    db: &DatabaseConnection,
    event: WebhookEvent,
) -> Result<(), sea_orm::DbErr> {
    match event.event_type.as_str() {
        "checkout.session.completed" => {
            let session: CheckoutSessionObject =
                match serde_json::from_value(event.data.object) {
                    Ok(session) => session,
                    Err(e) => {
                        log::warn!("unparseable checkout session payload: {}", e);
                        return Ok(());
                    }
                };

            if session.mode.as_deref() != Some("subscription") {
                return Ok(());
            }
            let (customer, subscription_id) = match (session.customer, session.subscription) {
                (Some(c), Some(s)) => (c, s),
                _ => return Ok(()),
            };

            if let Some(user_id) =
                resolve_user_id(db, &customer, session.customer_email.as_deref()).await?
            {
                // Full details arrive with the subscription.updated event;
                // record the customer mapping now.
                subscriptions::upsert_subscription(
                    db,
                    user_id,
                    SubscriptionUpdate {
                        stripe_customer_id: customer,
                        stripe_subscription_id: subscription_id,
                        status: "active".to_owned(),
                        tier: crate::orm::subscriptions::Tier::Pro,
                        current_period_end: None,
                    },
                )
                .await?;
            }
        }
        "customer.subscription.updated" => {
            let sub: SubscriptionObject = match serde_json::from_value(event.data.object) {
                Ok(sub) => sub,
                Err(e) => {
                    log::warn!("unparseable subscription payload: {}", e);
                    return Ok(());
                }
            };

            if let Some(user_id) = resolve_user_id(db, &sub.customer, None).await? {
                let tier = if sub.is_active() {
                    sub.resolve_tier()
                } else {
                    crate::orm::subscriptions::Tier::Free
                };
                subscriptions::upsert_subscription(
                    db,
                    user_id,
                    SubscriptionUpdate {
                        stripe_customer_id: sub.customer.clone(),
                        stripe_subscription_id: sub.id.clone(),
                        status: sub.status.clone(),
                        tier,
                        current_period_end: sub.current_period_end.map(|secs| secs * 1000),
                    },
                )
                .await?;
            }
        }
        "customer.subscription.deleted" => {
            let sub: SubscriptionObject = match serde_json::from_value(event.data.object) {
                Ok(sub) => sub,
                Err(e) => {
                    log::warn!("unparseable subscription payload: {}", e);
                    return Ok(());
                }
            };
            subscriptions::deactivate_subscription(db, &sub.id).await?;
        }
        other => {
            log::debug!("ignoring webhook event type {}", other);
        }
    }

    Ok(())
}

/// Find the account a customer id belongs to: an existing subscription row
/// first, then the checkout email.
async fn resolve_user_id(
    db: &DatabaseConnection,
    customer_id: &str,
    email: Option<&str>,
) -> Result<Option<i32>, sea_orm::DbErr> {
    if let Some(sub) = subscriptions::get_subscription_by_customer(db, customer_id).await? {
        return Ok(Some(sub.user_id));
    }

    if let Some(email) = email {
        if let Some(user) = crate::user::get_user_by_email(db, email).await? {
            return Ok(Some(user.id));
        }
    }

    Ok(None)
}

fn tier_name(tier: crate::orm::subscriptions::Tier) -> &'static str {
    match tier {
        crate::orm::subscriptions::Tier::Free => "free",
        crate::orm::subscriptions::Tier::Pro => "pro",
        crate::orm::subscriptions::Tier::Enterprise => "enterprise",
    }
}

fn payments_error(err: PaymentsError) -> Error {
    match err {
        PaymentsError::NotConfigured => {
            error::ErrorServiceUnavailable("Payments are not configured.")
        }
        other => {
            log::error!("payments error: {}", other);
            error::ErrorBadGateway("The payments provider failed.")
        }
    }
}

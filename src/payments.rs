//! Payments provider client
//!
//! Stripe-compatible HTTP API: checkout session creation, billing portal
//! session creation, and webhook verification/parsing. The webhook signature
//! scheme is the `t=...,v1=...` header with an HMAC-SHA256 over
//! `"{timestamp}.{payload}"`.
//!
//! Configuration priority matches the LLM client: BLOGCRAFT_PAYMENTS_* env
//! vars, then config.toml, then the legacy STRIPE_SECRET_KEY /
//! STRIPE_WEBHOOK_SECRET variables.

use hmac::{Hmac, Mac};
use once_cell::sync::Lazy;
use serde::Deserialize;
use sha2::Sha256;

use crate::orm::subscriptions::Tier;

type HmacSha256 = Hmac<Sha256>;

/// Accept webhook timestamps up to five minutes old.
const WEBHOOK_TOLERANCE_SECS: i64 = 300;

pub struct PaymentsSettings {
    pub secret_key: String,
    pub webhook_secret: String,
    pub pro_price_id: String,
    pub api_base: String,
}

pub static PAYMENTS_SETTINGS: Lazy<PaymentsSettings> = Lazy::new(|| {
    let config = crate::app_config::payments();

    let secret_key = if !config.secret_key.is_empty() {
        config.secret_key.clone()
    } else {
        std::env::var("STRIPE_SECRET_KEY").unwrap_or_default()
    };
    let webhook_secret = if !config.webhook_secret.is_empty() {
        config.webhook_secret.clone()
    } else {
        std::env::var("STRIPE_WEBHOOK_SECRET").unwrap_or_default()
    };

    if secret_key.is_empty() {
        log::warn!("No payments secret key configured; billing is disabled.");
    }

    PaymentsSettings {
        secret_key,
        webhook_secret,
        pro_price_id: config.pro_price_id,
        api_base: config.api_base,
    }
});

pub fn is_configured() -> bool {
    !PAYMENTS_SETTINGS.secret_key.is_empty()
}

/// Payments error
#[derive(Debug)]
pub enum PaymentsError {
    /// No secret key configured
    NotConfigured,
    /// Network error talking to the provider
    Network(String),
    /// The provider rejected the request
    Provider(String),
    /// Webhook signature missing, malformed, stale, or wrong
    InvalidSignature,
    /// Webhook payload did not parse
    InvalidPayload(String),
}

impl std::fmt::Display for PaymentsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentsError::NotConfigured => write!(f, "Payments are not configured"),
            PaymentsError::Network(e) => write!(f, "Payments network error: {}", e),
            PaymentsError::Provider(e) => write!(f, "Payments provider error: {}", e),
            PaymentsError::InvalidSignature => write!(f, "Invalid webhook signature"),
            PaymentsError::InvalidPayload(e) => write!(f, "Invalid webhook payload: {}", e),
        }
    }
}

impl std::error::Error for PaymentsError {}

#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PortalSession {
    pub url: String,
}

/// Create a subscription checkout session and return its redirect URL.
pub async fn create_checkout_session(
    customer_email: &str,
    success_url: &str,
    cancel_url: &str,
) -> Result<CheckoutSession, PaymentsError> {
    if !is_configured() {
        return Err(PaymentsError::NotConfigured);
    }

    let params = [
        ("mode", "subscription"),
        ("line_items[0][price]", PAYMENTS_SETTINGS.pro_price_id.as_str()),
        ("line_items[0][quantity]", "1"),
        ("customer_email", customer_email),
        ("success_url", success_url),
        ("cancel_url", cancel_url),
    ];

    post_form("checkout/sessions", &params).await
}

/// Create a billing portal session for an existing customer.
pub async fn create_portal_session(
    customer_id: &str,
    return_url: &str,
) -> Result<PortalSession, PaymentsError> {
    if !is_configured() {
        return Err(PaymentsError::NotConfigured);
    }

    let params = [("customer", customer_id), ("return_url", return_url)];

    post_form("billing_portal/sessions", &params).await
}

async fn post_form<T: serde::de::DeserializeOwned>(
    path: &str,
    params: &[(&str, &str)],
) -> Result<T, PaymentsError> {
    let client = reqwest::Client::new();
    let response = client
        .post(format!("{}/{}", PAYMENTS_SETTINGS.api_base, path))
        .bearer_auth(&PAYMENTS_SETTINGS.secret_key)
        .form(params)
        .send()
        .await
        .map_err(|e| PaymentsError::Network(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status();
        let detail = response.text().await.unwrap_or_default();
        return Err(PaymentsError::Provider(format!("{}: {}", status, detail)));
    }

    response
        .json()
        .await
        .map_err(|e| PaymentsError::Provider(e.to_string()))
}

/// A verified webhook event.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookData {
    pub object: serde_json::Value,
}

/// Checkout session fields the webhook handler cares about.
#[derive(Debug, Deserialize)]
pub struct CheckoutSessionObject {
    pub customer: Option<String>,
    pub customer_email: Option<String>,
    pub subscription: Option<String>,
    pub mode: Option<String>,
}

/// Subscription fields the webhook handler cares about.
#[derive(Debug, Deserialize)]
pub struct SubscriptionObject {
    pub id: String,
    pub customer: String,
    pub status: String,
    pub current_period_end: Option<i64>,
    #[serde(default)]
    pub metadata: serde_json::Value,
    #[serde(default)]
    pub items: serde_json::Value,
}

impl SubscriptionObject {
    /// Map the subscription onto a tier: explicit metadata wins, then the
    /// price's metadata or lookup key, then pro as the paid default.
    pub fn resolve_tier(&self) -> Tier {
        let tier_from = |v: Option<&str>| match v {
            Some("pro") => Some(Tier::Pro),
            Some("enterprise") => Some(Tier::Enterprise),
            _ => None,
        };

        if let Some(tier) = tier_from(self.metadata.get("tier").and_then(|t| t.as_str())) {
            return tier;
        }

        let price = self
            .items
            .get("data")
            .and_then(|d| d.get(0))
            .and_then(|item| item.get("price"));
        if let Some(price) = price {
            let price_tier = price
                .get("metadata")
                .and_then(|m| m.get("tier"))
                .and_then(|t| t.as_str())
                .or_else(|| price.get("lookup_key").and_then(|k| k.as_str()));
            if let Some(tier) = tier_from(price_tier) {
                return tier;
            }
        }

        Tier::Pro
    }

    /// Active and trialing subscriptions grant the paid tier.
    pub fn is_active(&self) -> bool {
        matches!(self.status.as_str(), "active" | "trialing")
    }
}

/// Verify the signature header and parse the event. The caller passes the
/// raw request body; any re-serialization would break the MAC.
pub fn construct_webhook_event(
    payload: &str,
    signature_header: &str,
    now_epoch_secs: i64,
) -> Result<WebhookEvent, PaymentsError> {
    let secret = &PAYMENTS_SETTINGS.webhook_secret;
    if secret.is_empty() {
        return Err(PaymentsError::NotConfigured);
    }

    verify_signature(payload, signature_header, secret, now_epoch_secs)?;

    serde_json::from_str(payload).map_err(|e| PaymentsError::InvalidPayload(e.to_string()))
}

/// Check a `t=...,v1=...` signature header against the payload.
fn verify_signature(
    payload: &str,
    signature_header: &str,
    secret: &str,
    now_epoch_secs: i64,
) -> Result<(), PaymentsError> {
    let mut timestamp: Option<i64> = None;
    let mut signatures: Vec<Vec<u8>> = Vec::new();

    for part in signature_header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", value)) => timestamp = value.parse().ok(),
            Some(("v1", value)) => {
                if let Some(sig) = decode_hex(value) {
                    signatures.push(sig);
                }
            }
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or(PaymentsError::InvalidSignature)?;
    if signatures.is_empty() {
        return Err(PaymentsError::InvalidSignature);
    }
    if (now_epoch_secs - timestamp).abs() > WEBHOOK_TOLERANCE_SECS {
        return Err(PaymentsError::InvalidSignature);
    }

    let signed_payload = format!("{}.{}", timestamp, payload);
    for signature in &signatures {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
            .map_err(|_| PaymentsError::InvalidSignature)?;
        mac.update(signed_payload.as_bytes());
        if mac.verify_slice(signature).is_ok() {
            return Ok(());
        }
    }

    Err(PaymentsError::InvalidSignature)
}

fn decode_hex(input: &str) -> Option<Vec<u8>> {
    if input.len() % 2 != 0 {
        return None;
    }
    (0..input.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&input[i..i + 2], 16).ok())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sign(payload: &str, secret: &str, timestamp: i64) -> String {
        let mut mac = HmacSha256::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{}.{}", timestamp, payload).as_bytes());
        let sig = mac.finalize().into_bytes();
        let hex: String = sig.iter().map(|b| format!("{:02x}", b)).collect();
        format!("t={},v1={}", timestamp, hex)
    }

    #[test]
    fn test_signature_roundtrip() {
        let payload = r#"{"type":"customer.subscription.updated"}"#;
        let header = sign(payload, "whsec_test", 1_700_000_000);
        assert!(verify_signature(payload, &header, "whsec_test", 1_700_000_000).is_ok());
    }

    #[test]
    fn test_signature_rejects_tampered_payload() {
        let header = sign(r#"{"a":1}"#, "whsec_test", 1_700_000_000);
        assert!(verify_signature(r#"{"a":2}"#, &header, "whsec_test", 1_700_000_000).is_err());
    }

    #[test]
    fn test_signature_rejects_wrong_secret() {
        let payload = r#"{"a":1}"#;
        let header = sign(payload, "whsec_test", 1_700_000_000);
        assert!(verify_signature(payload, &header, "whsec_other", 1_700_000_000).is_err());
    }

    #[test]
    fn test_signature_rejects_stale_timestamp() {
        let payload = r#"{"a":1}"#;
        let header = sign(payload, "whsec_test", 1_700_000_000);
        let too_late = 1_700_000_000 + WEBHOOK_TOLERANCE_SECS + 1;
        assert!(verify_signature(payload, &header, "whsec_test", too_late).is_err());
    }

    #[test]
    fn test_signature_rejects_garbage_header() {
        assert!(verify_signature("{}", "nonsense", "whsec_test", 0).is_err());
        assert!(verify_signature("{}", "t=abc,v1=zz", "whsec_test", 0).is_err());
    }

    #[test]
    fn test_resolve_tier_prefers_metadata() {
        let sub: SubscriptionObject = serde_json::from_value(json!({
            "id": "sub_1",
            "customer": "cus_1",
            "status": "active",
            "current_period_end": 1_700_000_000,
            "metadata": { "tier": "enterprise" },
            "items": { "data": [ { "price": { "lookup_key": "pro" } } ] },
        }))
        .unwrap();
        assert_eq!(sub.resolve_tier(), Tier::Enterprise);
    }

    #[test]
    fn test_resolve_tier_from_price_lookup_key() {
        let sub: SubscriptionObject = serde_json::from_value(json!({
            "id": "sub_1",
            "customer": "cus_1",
            "status": "trialing",
            "items": { "data": [ { "price": { "lookup_key": "enterprise" } } ] },
        }))
        .unwrap();
        assert_eq!(sub.resolve_tier(), Tier::Enterprise);
        assert!(sub.is_active());
    }

    #[test]
    fn test_resolve_tier_defaults_to_pro() {
        let sub: SubscriptionObject = serde_json::from_value(json!({
            "id": "sub_1",
            "customer": "cus_1",
            "status": "past_due",
        }))
        .unwrap();
        assert_eq!(sub.resolve_tier(), Tier::Pro);
        assert!(!sub.is_active());
    }

    #[test]
    fn test_webhook_event_parses() {
        let payload = json!({
            "type": "checkout.session.completed",
            "data": { "object": { "mode": "subscription", "customer": "cus_1" } },
        })
        .to_string();
        let event: WebhookEvent = serde_json::from_str(&payload).unwrap();
        assert_eq!(event.event_type, "checkout.session.completed");
        let object: CheckoutSessionObject =
            serde_json::from_value(event.data.object).unwrap();
        assert_eq!(object.customer.as_deref(), Some("cus_1"));
    }
}

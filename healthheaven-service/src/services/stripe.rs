//! Stripe payment gateway client.
//!
//! Creates payment intents for checkout and verifies webhook signatures.
//! The browser confirms the card payment itself using the intent's
//! `client_secret`; this service never sees card data.

use crate::config::StripeConfig;
use hmac::{Hmac, Mac};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;
use service_core::error::AppError;
use sha2::Sha256;
use subtle::ConstantTimeEq;
use thiserror::Error;

/// Maximum age of a signed webhook before it is rejected as a replay.
pub const WEBHOOK_TOLERANCE_SECS: i64 = 300;

#[derive(Debug, Error)]
pub enum StripeError {
    #[error("Stripe is not configured: {0}")]
    NotConfigured(String),

    #[error("Request to Stripe failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Stripe API error ({code}): {message}")]
    Api { code: String, message: String },

    #[error("Unexpected Stripe response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Malformed signature header: {0}")]
    MalformedSignature(String),
}

impl From<StripeError> for AppError {
    fn from(err: StripeError) -> Self {
        match err {
            StripeError::NotConfigured(msg) => AppError::ServiceUnavailable(msg),
            StripeError::MalformedSignature(msg) => {
                AppError::Unauthorized(anyhow::anyhow!("Malformed webhook signature: {}", msg))
            }
            other => AppError::BadGateway(other.to_string()),
        }
    }
}

/// Subset of the Stripe PaymentIntent object the checkout flow reads.
#[derive(Debug, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub status: String,
    pub client_secret: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StripeErrorBody {
    error: StripeErrorDetail,
}

#[derive(Debug, Deserialize)]
struct StripeErrorDetail {
    #[serde(default)]
    code: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

/// Webhook event envelope.
#[derive(Debug, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookEventData,
}

#[derive(Debug, Deserialize)]
pub struct WebhookEventData {
    pub object: serde_json::Value,
}

impl WebhookEvent {
    /// Id of the object the event is about (the payment intent id for
    /// `payment_intent.*` events).
    pub fn object_id(&self) -> Option<&str> {
        self.data.object.get("id").and_then(|id| id.as_str())
    }
}

#[derive(Clone)]
pub struct StripeClient {
    client: Client,
    config: StripeConfig,
}

impl StripeClient {
    pub fn new(config: StripeConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.config.secret_key.expose_secret().is_empty()
    }

    pub fn currency(&self) -> &str {
        &self.config.currency
    }

    /// Create a card payment intent for `amount` in the smallest currency
    /// unit (cents for USD).
    pub async fn create_payment_intent(&self, amount: i64) -> Result<PaymentIntent, StripeError> {
        if !self.is_configured() {
            return Err(StripeError::NotConfigured(
                "STRIPE_SECRET_KEY is not set".to_string(),
            ));
        }

        let url = format!("{}/payment_intents", self.config.api_base_url);
        let params = [
            ("amount", amount.to_string()),
            ("currency", self.config.currency.clone()),
            ("payment_method_types[]", "card".to_string()),
        ];

        let response = self
            .client
            .post(&url)
            .bearer_auth(self.config.secret_key.expose_secret())
            .form(&params)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        tracing::debug!(status = %status, "Stripe create_payment_intent response");

        if status.is_success() {
            let intent: PaymentIntent = serde_json::from_str(&body)?;
            tracing::info!(
                payment_intent_id = %intent.id,
                amount = intent.amount,
                currency = %intent.currency,
                "Stripe payment intent created"
            );
            Ok(intent)
        } else {
            let (code, message) = match serde_json::from_str::<StripeErrorBody>(&body) {
                Ok(parsed) => (
                    parsed
                        .error
                        .code
                        .or(parsed.error.kind)
                        .unwrap_or_else(|| status.as_u16().to_string()),
                    parsed.error.message.unwrap_or_default(),
                ),
                Err(_) => (status.as_u16().to_string(), body),
            };
            tracing::error!(code = %code, message = %message, "Stripe payment intent failed");
            Err(StripeError::Api { code, message })
        }
    }

    /// Verify a `Stripe-Signature` header against the raw request body.
    ///
    /// The signed payload is `"{t}.{body}"`, signed with HMAC-SHA256 under
    /// the endpoint's webhook secret. Any `v1` entry may match; timestamps
    /// older than [`WEBHOOK_TOLERANCE_SECS`] relative to `now` are rejected.
    pub fn verify_webhook_signature(
        &self,
        payload: &str,
        header: &str,
        now: i64,
    ) -> Result<bool, StripeError> {
        let secret = self.config.webhook_secret.expose_secret();
        if secret.is_empty() {
            return Err(StripeError::NotConfigured(
                "STRIPE_WEBHOOK_SECRET is not set".to_string(),
            ));
        }

        let mut timestamp = None;
        let mut signatures = Vec::new();
        for part in header.split(',') {
            match part.trim().split_once('=') {
                Some(("t", value)) => {
                    timestamp = Some(value.parse::<i64>().map_err(|_| {
                        StripeError::MalformedSignature(format!("bad timestamp {}", value))
                    })?);
                }
                Some(("v1", value)) => signatures.push(value),
                _ => {}
            }
        }

        let timestamp = timestamp
            .ok_or_else(|| StripeError::MalformedSignature("missing timestamp".to_string()))?;
        if signatures.is_empty() {
            return Err(StripeError::MalformedSignature(
                "missing v1 signature".to_string(),
            ));
        }

        if (now - timestamp).abs() > WEBHOOK_TOLERANCE_SECS {
            tracing::warn!(timestamp, now, "Stripe webhook timestamp outside tolerance");
            return Ok(false);
        }

        let expected = compute_signature(&format!("{}.{}", timestamp, payload), secret)?;
        let is_valid = signatures.iter().any(|candidate| {
            candidate.len() == expected.len()
                && bool::from(candidate.as_bytes().ct_eq(expected.as_bytes()))
        });

        if !is_valid {
            tracing::warn!("Stripe webhook signature verification failed");
        }

        Ok(is_valid)
    }

    pub fn parse_webhook_event(&self, body: &str) -> Result<WebhookEvent, StripeError> {
        Ok(serde_json::from_str(body)?)
    }
}

/// Convert a price in major units to the smallest currency unit.
///
/// Rounds rather than truncates so `19.99` becomes `1999`, not `1998`.
pub fn to_minor_units(price: f64) -> i64 {
    (price * 100.0).round() as i64
}

fn compute_signature(payload: &str, secret: &str) -> Result<String, StripeError> {
    type HmacSha256 = Hmac<Sha256>;
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| StripeError::NotConfigured("invalid webhook secret".to_string()))?;
    mac.update(payload.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

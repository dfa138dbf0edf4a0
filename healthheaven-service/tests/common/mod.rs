#![allow(dead_code)]

use healthheaven_service::config::{CorsConfig, HealthHeavenConfig, MongoConfig, StripeConfig};
use healthheaven_service::services::{HealthHeavenDb, StripeClient};
use healthheaven_service::{AppState, Application};
use hmac::{Hmac, Mac};
use reqwest::Response;
use secrecy::Secret;
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use sha2::Sha256;

pub const WEBHOOK_SECRET: &str = "whsec_test_secret";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: HealthHeavenDb,
    pub client: reqwest::Client,
}

pub fn test_config(stripe_base_url: Option<&str>) -> HealthHeavenConfig {
    HealthHeavenConfig {
        common: CoreConfig {
            port: 0,
            ..CoreConfig::default()
        },
        mongodb: MongoConfig {
            uri: Secret::new(
                std::env::var("TEST_MONGODB_URI")
                    .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            ),
            database: format!("healthheaven_test_{}", uuid::Uuid::new_v4().simple()),
        },
        stripe: StripeConfig {
            secret_key: Secret::new(
                stripe_base_url
                    .map(|_| "sk_test_123".to_string())
                    .unwrap_or_default(),
            ),
            webhook_secret: Secret::new(WEBHOOK_SECRET.to_string()),
            api_base_url: stripe_base_url
                .unwrap_or("https://api.stripe.com/v1")
                .to_string(),
            currency: "usd".to_string(),
        },
        cors: CorsConfig::default(),
    }
}

/// State for router tests that never reach MongoDB. Connecting with a plain
/// `mongodb://` URI performs no I/O.
pub async fn offline_state() -> AppState {
    let config = test_config(None);
    let db = HealthHeavenDb::connect("mongodb://localhost:27017", &config.mongodb.database)
        .await
        .expect("Failed to create MongoDB client");
    let stripe = StripeClient::new(config.stripe.clone());
    AppState { config, db, stripe }
}

/// `Stripe-Signature` header for `payload` signed now with [`WEBHOOK_SECRET`].
pub fn sign_webhook(payload: &str) -> String {
    let timestamp = chrono::Utc::now().timestamp();
    let mut mac = Hmac::<Sha256>::new_from_slice(WEBHOOK_SECRET.as_bytes()).unwrap();
    mac.update(format!("{}.{}", timestamp, payload).as_bytes());
    format!(
        "t={},v1={}",
        timestamp,
        hex::encode(mac.finalize().into_bytes())
    )
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with_config(test_config(None)).await
    }

    /// Spawn with Stripe calls routed to a mock server.
    pub async fn spawn_with_stripe(stripe_base_url: &str) -> Self {
        Self::spawn_with_config(test_config(Some(stripe_base_url))).await
    }

    async fn spawn_with_config(config: HealthHeavenConfig) -> Self {
        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = app.db().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db,
            client,
        }
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_json(&self, path: &str) -> Value {
        let response = self.get(path).await;
        assert!(
            response.status().is_success(),
            "GET {} returned {}",
            path,
            response.status()
        );
        response.json().await.expect("Failed to parse response")
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn patch_json(&self, path: &str, body: &Value) -> Response {
        self.client
            .patch(format!("{}{}", self.address, path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn patch(&self, path: &str) -> Response {
        self.client
            .patch(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(format!("{}{}", self.address, path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Insert through the API and return the new document's id.
    pub async fn insert(&self, path: &str, body: &Value) -> String {
        let response = self.post_json(path, body).await;
        assert_eq!(response.status(), 200, "POST {} failed", path);
        let result: Value = response.json().await.expect("Failed to parse response");
        result["insertedId"]
            .as_str()
            .expect("insertedId should be a hex string")
            .to_string()
    }

    pub async fn cleanup(&self) {
        self.db.database().drop(None).await.ok();
    }
}

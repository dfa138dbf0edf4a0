//! Application startup and lifecycle management.

use crate::config::HealthHeavenConfig;
use crate::handlers::{self, ads, cart, catalog, payments, queries, sales, users, webhooks};
use crate::services::{HealthHeavenDb, StripeClient};
use axum::{
    http::HeaderValue,
    middleware::from_fn,
    routing::{get, patch, post},
    Router,
};
use secrecy::ExposeSecret;
use service_core::error::AppError;
use service_core::middleware::{
    make_request_span, metrics_middleware, request_id_middleware, security_headers_middleware,
};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: HealthHeavenConfig,
    pub db: HealthHeavenDb,
    pub stripe: StripeClient,
}

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors.allowed_origins);

    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/ready", get(handlers::readiness_check))
        .route("/metrics", get(handlers::metrics_endpoint))
        // Users
        .route("/users", post(users::create_user).get(users::list_users))
        .route(
            "/users/:id",
            get(users::check_user_exists).delete(users::delete_user),
        )
        .route("/users/:id/role", patch(users::update_user_role))
        .route("/user/:uid", get(users::get_user))
        // Shop
        .route("/addtoshop", post(catalog::add_to_shop))
        .route("/shop", get(catalog::list_shop))
        .route("/shop/discounted", get(catalog::list_discounted))
        .route(
            "/shop/item/:id",
            get(catalog::get_shop_item)
                .patch(catalog::update_shop_item)
                .delete(catalog::delete_shop_item),
        )
        .route("/shop/seller/:seller_uid", get(catalog::list_by_seller))
        .route("/shop/category/:category", get(catalog::list_by_category))
        // Categories
        .route(
            "/categories",
            post(catalog::create_category).get(catalog::list_categories),
        )
        .route(
            "/categories/:id",
            get(catalog::get_category)
                .patch(catalog::update_category)
                .delete(catalog::delete_category),
        )
        // Cart
        .route("/addcart", post(cart::add_to_cart))
        .route("/cart/:action", patch(cart::adjust_quantity))
        .route(
            "/cart/user/:user_id",
            get(cart::list_cart).delete(cart::clear_cart),
        )
        .route("/cart/item/:id", axum::routing::delete(cart::delete_cart_entry))
        // Advertisements
        .route("/ads", post(ads::create_ad).get(ads::list_ads))
        .route("/ads/added", get(ads::list_added_ads))
        .route("/ads/seller/:seller_uid", get(ads::list_seller_ads))
        .route("/ads/:id", patch(ads::toggle_ad).delete(ads::delete_ad))
        // Sales
        .route("/sold", post(sales::record_sales).get(sales::list_sales))
        .route("/sold/seller/:seller_uid", get(sales::list_seller_sales))
        .route("/sold/user/:user_id", get(sales::list_user_purchases))
        // Payments. `:id` is a user id for GET and a transaction id for PATCH.
        .route(
            "/create-payment-intent",
            post(payments::create_payment_intent),
        )
        .route(
            "/payments",
            post(payments::create_payment).get(payments::list_payments),
        )
        .route(
            "/payments/:id",
            get(payments::list_user_payments).patch(payments::complete_payment),
        )
        .route("/webhooks/stripe", post(webhooks::stripe_webhook))
        // Support queries. `:id` is a user id for GET and a query id for the reply.
        .route(
            "/queries",
            post(queries::create_query).get(queries::list_queries),
        )
        .route("/queries/:id", get(queries::list_user_queries))
        .route("/queries/:id/reply", patch(queries::reply_to_query))
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    layer.allow_origin(AllowOrigin::list(origins))
}

/// Application container for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    state: AppState,
}

impl Application {
    /// Build the application with the given configuration.
    pub async fn build(config: HealthHeavenConfig) -> Result<Self, AppError> {
        let db = HealthHeavenDb::connect(
            config.mongodb.uri.expose_secret(),
            &config.mongodb.database,
        )
        .await?;

        db.initialize_indexes().await.map_err(|e| {
            tracing::error!("Failed to initialize database indexes: {}", e);
            e
        })?;

        let stripe = StripeClient::new(config.stripe.clone());
        if stripe.is_configured() {
            tracing::info!(currency = %stripe.currency(), "Stripe client initialized");
        } else {
            tracing::warn!("Stripe credentials not configured - payment intents will be refused");
        }

        let state = AppState {
            config: config.clone(),
            db,
            stripe,
        };

        // Port 0 picks a random port for tests.
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("HealthHeaven server is running on port {}", port);

        Ok(Self {
            port,
            listener,
            state,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn db(&self) -> &HealthHeavenDb {
        &self.state.db
    }

    /// Serve until Ctrl+C or SIGTERM.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        let router = build_router(self.state);

        axum::serve(self.listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}

pub mod database;
pub mod metrics;
pub mod stripe;

pub use database::{CartAddOutcome, HealthHeavenDb};
pub use metrics::{
    get_metrics, init_metrics, record_ad_toggle, record_cart_addition, record_payment_intent,
};
pub use stripe::{StripeClient, StripeError};

//! Persisted documents.
//!
//! Collections are schema-less: bodies are stored as the client sent them
//! and read back as raw documents. This module only knows the few fields
//! the API branches on, and fills defaults for keys the client left out.

pub mod advertisement;
pub mod cart;
pub mod payment;
pub mod query;

pub use advertisement::{new_advertisement, AdStatus};
pub use cart::{new_cart_entry, CartAction, CartKey};
pub use payment::{new_payment_record, PaymentStatus};
pub use query::new_query;

use mongodb::bson::{Bson, Document};

/// Insert `value` under `key` unless the client already sent that key.
/// An explicit `null` counts as sent.
fn default_field(document: &mut Document, key: &str, value: impl Into<Bson>) {
    if !document.contains_key(key) {
        document.insert(key, value);
    }
}

use mongodb::bson::Document;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::default_field;

/// Settlement state shared by payment records and sold records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payment or sold record as it will be inserted. Records start pending
/// until the transaction is completed.
pub fn new_payment_record(mut record: Document) -> Document {
    default_field(&mut record, "status", PaymentStatus::Pending.as_str());
    record
}

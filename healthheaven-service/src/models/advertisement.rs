use mongodb::bson::Document;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::default_field;

/// Whether a seller's advertisement is shown on the home page banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdStatus {
    #[serde(rename = "added")]
    Added,
    #[serde(rename = "not added")]
    NotAdded,
}

impl AdStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            AdStatus::Added => "added",
            AdStatus::NotAdded => "not added",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "added" => Some(AdStatus::Added),
            "not added" => Some(AdStatus::NotAdded),
            _ => None,
        }
    }

    /// Status after a toggle. Anything that is not currently `added`,
    /// including a missing or unrecognised value, becomes `added`.
    pub fn toggle(current: Option<&str>) -> Self {
        match current.and_then(AdStatus::parse) {
            Some(AdStatus::Added) => AdStatus::NotAdded,
            _ => AdStatus::Added,
        }
    }
}

impl fmt::Display for AdStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An advertisement as it will be inserted. New ads are off the banner.
pub fn new_advertisement(mut ad: Document) -> Document {
    default_field(&mut ad, "status", AdStatus::NotAdded.as_str());
    ad
}

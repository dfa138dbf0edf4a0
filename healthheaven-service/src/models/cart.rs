use mongodb::bson::{doc, Bson, Document};
use std::fmt;
use std::str::FromStr;

use super::default_field;

pub const DEFAULT_QUANTITY: i32 = 1;

/// Composite identity of a cart line: the same item from the same seller in
/// the same user's cart is one document with a `quantity`.
///
/// Values are kept as raw BSON so a numeric `itemId` matches the number it
/// was stored as. A missing field is `null`, which matches documents that
/// lack it.
#[derive(Debug, Clone, PartialEq)]
pub struct CartKey {
    pub item_id: Bson,
    pub seller_uid: Bson,
    pub user_id: Bson,
}

impl CartKey {
    pub fn from_document(document: &Document) -> Self {
        let field = |key: &str| document.get(key).cloned().unwrap_or(Bson::Null);
        Self {
            item_id: field("itemId"),
            seller_uid: field("sellerUid"),
            user_id: field("userId"),
        }
    }

    pub fn filter(&self) -> Document {
        doc! {
            "itemId": self.item_id.clone(),
            "sellerUid": self.seller_uid.clone(),
            "userId": self.user_id.clone(),
        }
    }
}

/// A cart line as it will be inserted.
pub fn new_cart_entry(mut entry: Document) -> Document {
    default_field(&mut entry, "quantity", DEFAULT_QUANTITY);
    entry
}

/// Quantity adjustment requested through `PATCH /cart/:action`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartAction {
    Increase,
    Decrease,
}

impl CartAction {
    pub fn delta(self) -> i32 {
        match self {
            CartAction::Increase => 1,
            CartAction::Decrease => -1,
        }
    }
}

impl FromStr for CartAction {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "increase" => Ok(CartAction::Increase),
            "decrease" => Ok(CartAction::Decrease),
            other => Err(anyhow::anyhow!("Unknown cart action: {}", other)),
        }
    }
}

impl fmt::Display for CartAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CartAction::Increase => write!(f, "increase"),
            CartAction::Decrease => write!(f, "decrease"),
        }
    }
}

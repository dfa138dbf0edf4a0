//! MongoDB access for the `HealthHeaven` database.
//!
//! One submodule per resource, each adding methods to [`HealthHeavenDb`].
//! Collections hold raw documents. Every method is a single driver call
//! (two for cart add and ad toggle) and returns the raw driver result for
//! the handler to render.

mod ads;
mod cart;
mod catalog;
mod payments;
mod queries;
mod users;

pub use cart::CartAddOutcome;

use futures::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    options::IndexOptions,
    Client as MongoClient, Collection, Database, IndexModel,
};
use service_core::error::AppError;

pub const USERS: &str = "users";
pub const SHOP: &str = "shop";
pub const CATEGORIES: &str = "categories";
pub const CART: &str = "cart";
pub const ADVERTISEMENTS: &str = "advertisements";
pub const SOLD_ITEMS: &str = "soldItems";
pub const PAYMENTS: &str = "payments";
pub const QUERIES: &str = "queries";

const CART_KEY_INDEX: &str = "cart_key_idx";

#[derive(Clone)]
pub struct HealthHeavenDb {
    client: MongoClient,
    db: Database,
}

impl HealthHeavenDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!(database = %database, "Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to create MongoDB client: {}", e);
            AppError::DatabaseError(anyhow::anyhow!(e.to_string()))
        })?;
        let db = client.database(database);
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for healthheaven-service");

        let cart_user_index = IndexModel::builder()
            .keys(doc! { "userId": 1 })
            .options(
                IndexOptions::builder()
                    .name("cart_user_idx".to_string())
                    .build(),
            )
            .build();

        self.cart()
            .create_index(cart_user_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create cart index: {}", e);
                AppError::from(e)
            })?;

        self.ensure_cart_key_index().await;

        let user_uid_index = IndexModel::builder()
            .keys(doc! { "uid": 1 })
            .options(
                IndexOptions::builder()
                    .name("user_uid_idx".to_string())
                    .build(),
            )
            .build();

        self.users()
            .create_index(user_uid_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create users index: {}", e);
                AppError::from(e)
            })?;

        let shop_seller_index = IndexModel::builder()
            .keys(doc! { "sellerUid": 1 })
            .options(
                IndexOptions::builder()
                    .name("shop_seller_idx".to_string())
                    .build(),
            )
            .build();

        let shop_category_index = IndexModel::builder()
            .keys(doc! { "category": 1 })
            .options(
                IndexOptions::builder()
                    .name("shop_category_idx".to_string())
                    .build(),
            )
            .build();

        self.shop()
            .create_indexes([shop_seller_index, shop_category_index], None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create shop indexes: {}", e);
                AppError::from(e)
            })?;

        for (collection, name) in [(PAYMENTS, "payment_tx_idx"), (SOLD_ITEMS, "sold_tx_idx")] {
            let tx_index = IndexModel::builder()
                .keys(doc! { "transactionId": 1 })
                .options(IndexOptions::builder().name(name.to_string()).build())
                .build();

            self.db
                .collection::<Document>(collection)
                .create_index(tx_index, None)
                .await
                .map_err(|e| {
                    tracing::error!(collection = %collection, "Failed to create index: {}", e);
                    AppError::from(e)
                })?;
        }

        tracing::info!("MongoDB indexes created");
        Ok(())
    }

    /// Unique (itemId, sellerUid, userId) index backing the cart add
    /// invariant.
    ///
    /// A database that already holds duplicate cart lines cannot build it.
    /// The service still starts; cart adds then rely on the find-then-write
    /// path alone until the duplicates are merged and the service restarts.
    pub async fn ensure_cart_key_index(&self) -> bool {
        let cart_key_index = IndexModel::builder()
            .keys(doc! { "itemId": 1, "sellerUid": 1, "userId": 1 })
            .options(
                IndexOptions::builder()
                    .name(CART_KEY_INDEX.to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        match self.cart().create_index(cart_key_index, None).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(
                    index = CART_KEY_INDEX,
                    error = %e,
                    "Unique cart index not created; existing duplicate cart lines must be merged"
                );
                false
            }
        }
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(AppError::from)?;
        Ok(())
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn users(&self) -> Collection<Document> {
        self.db.collection(USERS)
    }

    pub fn shop(&self) -> Collection<Document> {
        self.db.collection(SHOP)
    }

    pub fn categories(&self) -> Collection<Document> {
        self.db.collection(CATEGORIES)
    }

    pub fn cart(&self) -> Collection<Document> {
        self.db.collection(CART)
    }

    pub fn advertisements(&self) -> Collection<Document> {
        self.db.collection(ADVERTISEMENTS)
    }

    pub fn sold_items(&self) -> Collection<Document> {
        self.db.collection(SOLD_ITEMS)
    }

    pub fn payments(&self) -> Collection<Document> {
        self.db.collection(PAYMENTS)
    }

    pub fn queries(&self) -> Collection<Document> {
        self.db.collection(QUERIES)
    }
}

/// `find` + `toArray`. Documents come back exactly as stored.
async fn find_all(
    collection: &Collection<Document>,
    filter: Document,
) -> Result<Vec<Document>, AppError> {
    let cursor = collection.find(filter, None).await?;
    let documents: Vec<Document> = cursor.try_collect().await?;
    Ok(documents)
}

mod common;

use common::TestApp;
use healthheaven_service::services::HealthHeavenDb;
use mongodb::bson::doc;
use serde_json::{json, Value};

fn cart_line() -> Value {
    json!({
        "itemId": "item-1",
        "sellerUid": "seller-1",
        "userId": "user-1",
        "itemName": "Vitamin C",
        "price": 12.5
    })
}

#[tokio::test]
async fn adding_same_item_twice_increments_quantity() {
    let app = TestApp::spawn().await;

    let response = app.post_json("/addcart", &cart_line()).await;
    assert_eq!(response.status(), 200);
    let first: Value = response.json().await.unwrap();
    assert!(first["insertedId"].is_string());

    let response = app.post_json("/addcart", &cart_line()).await;
    let second: Value = response.json().await.unwrap();
    assert_eq!(second["matchedCount"], 1);
    assert_eq!(second["modifiedCount"], 1);

    let cart = app.get_json("/cart/user/user-1").await;
    let entries = cart.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["quantity"], 2);
    assert_eq!(entries[0]["itemName"], "Vitamin C");

    app.cleanup().await;
}

#[tokio::test]
async fn same_item_from_different_seller_is_separate_entry() {
    let app = TestApp::spawn().await;

    app.post_json("/addcart", &cart_line()).await;
    let mut other = cart_line();
    other["sellerUid"] = json!("seller-2");
    app.post_json("/addcart", &other).await;

    let cart = app.get_json("/cart/user/user-1").await;
    assert_eq!(cart.as_array().unwrap().len(), 2);

    app.cleanup().await;
}

#[tokio::test]
async fn concurrent_adds_keep_one_entry() {
    let app = TestApp::spawn().await;

    let line = cart_line();
    let (a, b) = tokio::join!(
        app.post_json("/addcart", &line),
        app.post_json("/addcart", &line)
    );
    assert_eq!(a.status(), 200);
    assert_eq!(b.status(), 200);

    let cart = app.get_json("/cart/user/user-1").await;
    let entries = cart.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["quantity"], 2);

    app.cleanup().await;
}

#[tokio::test]
async fn increase_and_decrease_quantity() {
    let app = TestApp::spawn().await;
    app.post_json("/addcart", &cart_line()).await;

    let key = json!({ "itemId": "item-1", "sellerUid": "seller-1", "userId": "user-1" });

    let response = app.patch_json("/cart/increase", &key).await;
    assert_eq!(response.status(), 200);
    let response = app.patch_json("/cart/increase", &key).await;
    assert_eq!(response.status(), 200);
    let response = app.patch_json("/cart/decrease", &key).await;
    let result: Value = response.json().await.unwrap();
    assert_eq!(result["modifiedCount"], 1);

    let cart = app.get_json("/cart/user/user-1").await;
    assert_eq!(cart[0]["quantity"], 2);

    let missing = json!({ "itemId": "nope", "sellerUid": "seller-1", "userId": "user-1" });
    let response = app.patch_json("/cart/increase", &missing).await;
    let result: Value = response.json().await.unwrap();
    assert_eq!(result["matchedCount"], 0);

    app.cleanup().await;
}

#[tokio::test]
async fn delete_entry_and_clear_cart() {
    let app = TestApp::spawn().await;

    let first: Value = app
        .post_json("/addcart", &cart_line())
        .await
        .json()
        .await
        .unwrap();
    let mut second = cart_line();
    second["itemId"] = json!("item-2");
    app.post_json("/addcart", &second).await;
    let mut third = cart_line();
    third["itemId"] = json!("item-3");
    app.post_json("/addcart", &third).await;

    let response = app
        .delete(&format!("/cart/item/{}", first["insertedId"].as_str().unwrap()))
        .await;
    let result: Value = response.json().await.unwrap();
    assert_eq!(result["deletedCount"], 1);

    let response = app.delete("/cart/user/user-1").await;
    let result: Value = response.json().await.unwrap();
    assert_eq!(result["deletedCount"], 2);

    let cart = app.get_json("/cart/user/user-1").await;
    assert!(cart.as_array().unwrap().is_empty());

    app.cleanup().await;
}

#[tokio::test]
async fn numeric_item_ids_are_stored_and_matched_as_sent() {
    let app = TestApp::spawn().await;
    let line = json!({ "itemId": 1, "sellerUid": "S", "userId": "U", "price": 4.25 });

    let response = app.post_json("/addcart", &line).await;
    assert_eq!(response.status(), 200);
    let response = app.post_json("/addcart", &line).await;
    let result: Value = response.json().await.unwrap();
    assert_eq!(result["matchedCount"], 1);

    let key = json!({ "itemId": 1, "sellerUid": "S", "userId": "U" });
    let response = app.patch_json("/cart/increase", &key).await;
    let result: Value = response.json().await.unwrap();
    assert_eq!(result["modifiedCount"], 1);

    let cart = app.get_json("/cart/user/U").await;
    let entries = cart.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["itemId"], 1);
    assert_eq!(entries[0]["quantity"], 3);

    app.cleanup().await;
}

#[tokio::test]
async fn sent_quantity_is_kept() {
    let app = TestApp::spawn().await;

    let mut line = cart_line();
    line["quantity"] = json!(1.0);
    app.post_json("/addcart", &line).await;

    let cart = app.get_json("/cart/user/user-1").await;
    assert_eq!(cart[0]["quantity"], 1.0);

    app.cleanup().await;
}

#[tokio::test]
async fn legacy_lines_with_double_quantity_still_list_and_increment() {
    let app = TestApp::spawn().await;

    app.db
        .cart()
        .insert_one(
            doc! {
                "itemId": "item-1",
                "sellerUid": "seller-1",
                "userId": "user-1",
                "quantity": 2.0,
                "note": mongodb::bson::Bson::Null,
            },
            None,
        )
        .await
        .unwrap();

    let response = app.post_json("/addcart", &cart_line()).await;
    let result: Value = response.json().await.unwrap();
    assert_eq!(result["modifiedCount"], 1);

    let cart = app.get_json("/cart/user/user-1").await;
    assert_eq!(cart[0]["quantity"], 3.0);
    assert!(cart[0]["note"].is_null());

    app.cleanup().await;
}

#[tokio::test]
async fn startup_survives_existing_duplicate_cart_lines() {
    let uri = std::env::var("TEST_MONGODB_URI")
        .unwrap_or_else(|_| "mongodb://localhost:27017".to_string());
    let name = format!("healthheaven_test_{}", uuid::Uuid::new_v4().simple());
    let db = HealthHeavenDb::connect(&uri, &name).await.unwrap();

    let line = doc! { "itemId": "item-1", "sellerUid": "seller-1", "userId": "user-1" };
    db.cart()
        .insert_many([line.clone(), line], None)
        .await
        .unwrap();

    assert!(db.initialize_indexes().await.is_ok());
    assert!(!db.ensure_cart_key_index().await);

    db.database().drop(None).await.ok();
}

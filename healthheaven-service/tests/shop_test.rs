mod common;

use common::TestApp;
use serde_json::{json, Value};

async fn seed_shop(app: &TestApp) -> String {
    let id = app
        .insert(
            "/addtoshop",
            &json!({
                "itemName": "Vitamin C",
                "category": "supplements",
                "sellerUid": "seller-1",
                "price": 12.5,
                "discount": 10
            }),
        )
        .await;
    app.insert(
        "/addtoshop",
        &json!({
            "itemName": "Bandage",
            "category": "first-aid",
            "sellerUid": "seller-2",
            "price": 3.0,
            "discount": 0
        }),
    )
    .await;
    id
}

#[tokio::test]
async fn shop_filters() {
    let app = TestApp::spawn().await;
    seed_shop(&app).await;

    let all = app.get_json("/shop").await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let supplements = app.get_json("/shop?category=supplements").await;
    assert_eq!(supplements.as_array().unwrap().len(), 1);
    assert_eq!(supplements[0]["itemName"], "Vitamin C");

    let by_path = app.get_json("/shop/category/first-aid").await;
    assert_eq!(by_path[0]["itemName"], "Bandage");

    let discounted = app.get_json("/shop/discounted").await;
    assert_eq!(discounted.as_array().unwrap().len(), 1);
    assert_eq!(discounted[0]["sellerUid"], "seller-1");

    let seller = app.get_json("/shop/seller/seller-2").await;
    assert_eq!(seller.as_array().unwrap().len(), 1);

    app.cleanup().await;
}

#[tokio::test]
async fn shop_item_update_and_delete() {
    let app = TestApp::spawn().await;
    let id = seed_shop(&app).await;

    let item = app.get_json(&format!("/shop/item/{}", id)).await;
    assert_eq!(item["_id"], id.as_str());

    let response = app
        .patch_json(
            &format!("/shop/item/{}", id),
            &json!({ "price": 10.0, "_id": "ignored" }),
        )
        .await;
    assert_eq!(response.status(), 200);
    let result: Value = response.json().await.unwrap();
    assert_eq!(result["modifiedCount"], 1);

    let item = app.get_json(&format!("/shop/item/{}", id)).await;
    assert_eq!(item["price"], 10.0);
    assert_eq!(item["itemName"], "Vitamin C");

    let response = app
        .patch_json(&format!("/shop/item/{}", id), &json!({}))
        .await;
    assert_eq!(response.status(), 400);

    let response = app.delete(&format!("/shop/item/{}", id)).await;
    let result: Value = response.json().await.unwrap();
    assert_eq!(result["deletedCount"], 1);

    let item = app.get_json(&format!("/shop/item/{}", id)).await;
    assert!(item.is_null());

    app.cleanup().await;
}

#[tokio::test]
async fn category_lifecycle() {
    let app = TestApp::spawn().await;

    let id = app
        .insert(
            "/categories",
            &json!({ "categoryName": "Syrups", "categoryImage": "https://img/syrup.png" }),
        )
        .await;

    let response = app
        .patch_json(
            &format!("/categories/{}", id),
            &json!({ "categoryName": "Syrups & Tonics" }),
        )
        .await;
    assert_eq!(response.status(), 200);

    let category = app.get_json(&format!("/categories/{}", id)).await;
    assert_eq!(category["categoryName"], "Syrups & Tonics");
    assert_eq!(category["categoryImage"], "https://img/syrup.png");

    let response = app
        .patch_json(&format!("/categories/{}", id), &json!({}))
        .await;
    assert_eq!(response.status(), 400);

    let categories = app.get_json("/categories").await;
    assert_eq!(categories.as_array().unwrap().len(), 1);

    app.delete(&format!("/categories/{}", id)).await;
    let categories = app.get_json("/categories").await;
    assert!(categories.as_array().unwrap().is_empty());

    app.cleanup().await;
}

#[tokio::test]
async fn string_discount_is_stored_as_sent() {
    let app = TestApp::spawn().await;

    let response = app
        .post_json(
            "/addtoshop",
            &json!({ "itemName": "Zinc", "sellerUid": "seller-3", "price": "5", "discount": "10" }),
        )
        .await;
    assert_eq!(response.status(), 200);

    let items = app.get_json("/shop/seller/seller-3").await;
    assert_eq!(items[0]["discount"], "10");
    assert_eq!(items[0]["price"], "5");

    let discounted = app.get_json("/shop/discounted").await;
    assert!(discounted.as_array().unwrap().is_empty());

    app.cleanup().await;
}

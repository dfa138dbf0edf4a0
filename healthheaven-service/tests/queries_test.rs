mod common;

use common::TestApp;
use serde_json::{json, Value};

#[tokio::test]
async fn replies_are_appended_in_order() {
    let app = TestApp::spawn().await;

    let id = app
        .insert(
            "/queries",
            &json!({ "userId": "user-1", "subject": "Late delivery", "message": "Where is it?" }),
        )
        .await;

    let response = app
        .patch_json(
            &format!("/queries/{}/reply", id),
            &json!({ "from": "admin", "message": "Shipped today" }),
        )
        .await;
    assert_eq!(response.status(), 200);
    let result: Value = response.json().await.unwrap();
    assert_eq!(result["modifiedCount"], 1);

    app.patch_json(
        &format!("/queries/{}/reply", id),
        &json!({ "from": "user", "message": "Thanks" }),
    )
    .await;

    let queries = app.get_json("/queries/user-1").await;
    let replies = queries[0]["replies"].as_array().unwrap();
    assert_eq!(replies.len(), 2);
    assert_eq!(replies[0]["message"], "Shipped today");
    assert_eq!(replies[1]["from"], "user");

    let all = app.get_json("/queries").await;
    assert_eq!(all.as_array().unwrap().len(), 1);

    let other = app.get_json("/queries/user-2").await;
    assert!(other.as_array().unwrap().is_empty());

    app.cleanup().await;
}

//! Integration tests for profile, address, and wishlist endpoints.

use reqwest::{Client, StatusCode};
use serde_json::{Value, json};

use greenbasket_integration_tests::{api_base_url, register_user};

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn profile_roundtrip() {
    let client = Client::new();
    let (email, token) = register_user(&client, "profile").await;

    let response = client
        .get(format!("{}/user/profile", api_base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("profile request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("profile body");
    assert_eq!(body["data"]["email"], email);
    assert_eq!(body["data"]["name"], "Integration Tester");
    // The password hash must never appear in the document.
    assert!(body["data"].get("password").is_none());
    assert!(body["data"].get("passwordHash").is_none());

    let response = client
        .put(format!("{}/user/profile", api_base_url()))
        .bearer_auth(&token)
        .json(&json!({ "name": "Renamed Tester" }))
        .send()
        .await
        .expect("update request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("update body");
    assert_eq!(body["data"]["name"], "Renamed Tester");
    // Untouched fields survive a partial update.
    assert_eq!(body["data"]["email"], email);
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn address_replace_and_delete() {
    let client = Client::new();
    let (_email, token) = register_user(&client, "address").await;

    let response = client
        .put(format!("{}/user/address", api_base_url()))
        .bearer_auth(&token)
        .json(&json!({
            "addresses": [
                { "street": "1 Main St", "city": "Lisbon", "zipCode": "1000-001" },
                { "street": "2 Side St", "city": "Porto", "zipCode": "4000-001" },
            ]
        }))
        .send()
        .await
        .expect("address request");

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.expect("address body");
    let addresses = body["data"].as_array().expect("addresses array");
    assert_eq!(addresses.len(), 2);

    // Every stored address got an id assigned.
    let id = addresses[0]["id"].as_str().expect("address id").to_owned();

    let response = client
        .delete(format!("{}/user/address/{id}", api_base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("delete request");

    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{}/user/profile", api_base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("profile request");
    let body: Value = response.json().await.expect("profile body");
    assert_eq!(body["data"]["addresses"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
#[ignore = "Requires running server and database"]
async fn wishlist_add_is_idempotent() {
    let client = Client::new();
    let (_email, token) = register_user(&client, "wishlist").await;

    for _ in 0..2 {
        let response = client
            .post(format!("{}/user/wishlist/add", api_base_url()))
            .bearer_auth(&token)
            .json(&json!({ "productId": 1 }))
            .send()
            .await
            .expect("wishlist request");
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = client
        .get(format!("{}/user/profile", api_base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("profile request");
    let body: Value = response.json().await.expect("profile body");

    // Added twice, stored once.
    assert_eq!(body["data"]["wishlist"], json!([1]));

    let response = client
        .post(format!("{}/user/wishlist/remove", api_base_url()))
        .bearer_auth(&token)
        .json(&json!({ "productId": 1 }))
        .send()
        .await
        .expect("wishlist remove");
    assert_eq!(response.status(), StatusCode::OK);

    let response = client
        .get(format!("{}/user/profile", api_base_url()))
        .bearer_auth(&token)
        .send()
        .await
        .expect("profile request");
    let body: Value = response.json().await.expect("profile body");
    assert_eq!(body["data"]["wishlist"], json!([]));
}

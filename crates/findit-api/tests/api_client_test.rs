#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use findit_api::{ApiClient, Error, FilterSpec, ImageAttachment, ItemPayload, ItemType};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let client = ApiClient::with_client(reqwest::Client::new(), base_url);
    (server, client)
}

fn user_json() -> serde_json::Value {
    json!({
        "id": 1,
        "username": "sam",
        "email": "sam@example.com",
        "is_admin": false,
        "created_at": "2024-06-15T10:30:00"
    })
}

fn item_json(id: i64, title: &str) -> serde_json::Value {
    json!({
        "id": id,
        "uuid": "4f9f1f6a-54b2-4b07-9c3b-0f2a4d9f8b11",
        "title": title,
        "description": "Leather, two cards inside",
        "item_type": "lost",
        "date_posted": "2024-06-15T10:30:00",
        "date_occurred": "2024-06-14T18:00:00",
        "location": "Main library",
        "image_url": null,
        "is_resolved": false,
        "category": { "id": 3, "name": "Accessories" },
        "user_id": 2
    })
}

// ── Auth tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_check_auth_authenticated() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/check-auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "authenticated": true,
            "user": user_json()
        })))
        .mount(&server)
        .await;

    let check = client.check_auth().await.unwrap();
    assert!(check.authenticated);
    assert_eq!(check.user.unwrap().username, "sam");
}

#[tokio::test]
async fn test_check_auth_anonymous() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/auth/check-auth"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "authenticated": false })))
        .mount(&server)
        .await;

    let check = client.check_auth().await.unwrap();
    assert!(!check.authenticated);
    assert!(check.user.is_none());
}

#[tokio::test]
async fn test_login_success() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Login successful",
            "user": user_json()
        })))
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "test-password".to_string().into();
    let user = client.login("sam", &secret).await.unwrap();
    assert_eq!(user.id, 1);
    assert_eq!(user.email, "sam@example.com");
}

#[tokio::test]
async fn test_login_rejected_carries_server_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401)
                .set_body_json(json!({ "error": "Invalid username or password" })),
        )
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "wrong".to_string().into();
    let result = client.login("sam", &secret).await;

    match result {
        Err(Error::Authentication { ref message }) => {
            assert_eq!(message, "Invalid username or password");
        }
        other => panic!("expected Authentication error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_register_conflict() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/register"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({ "error": "Username already exists" })),
        )
        .mount(&server)
        .await;

    let secret: secrecy::SecretString = "hunter22".to_string().into();
    let result = client.register("sam", "sam@example.com", &secret).await;

    match result {
        Err(Error::Api {
            ref message,
            status: 409,
        }) => {
            assert_eq!(message, "Username already exists");
        }
        other => panic!("expected 409 Api error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_logout() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/logout"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "message": "Logged out successfully" })),
        )
        .mount(&server)
        .await;

    client.logout().await.unwrap();
}

// ── Item tests ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_items_encodes_filters() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/items"))
        .and(query_param("search", "wallet"))
        .and(query_param("type", "lost"))
        .and(query_param("category", "3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [item_json(4, "Black wallet")]
        })))
        .mount(&server)
        .await;

    let filter = FilterSpec {
        search: "wallet".into(),
        item_type: Some(ItemType::Lost),
        category_id: Some("3".into()),
    };
    let items = client.list_items(&filter).await.unwrap();

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Black wallet");
    assert_eq!(items[0].category.as_ref().unwrap().name, "Accessories");
}

#[tokio::test]
async fn test_list_items_preserves_server_order() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [item_json(9, "Umbrella"), item_json(2, "Scarf"), item_json(5, "Keys")]
        })))
        .mount(&server)
        .await;

    let items = client.list_items(&FilterSpec::default()).await.unwrap();
    let ids: Vec<i64> = items.iter().map(|i| i.id).collect();
    assert_eq!(ids, vec![9, 2, 5]);
}

#[tokio::test]
async fn test_list_mine_requires_session() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/items/mine"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "error": "Authentication required" })),
        )
        .mount(&server)
        .await;

    let result = client.list_my_items(&FilterSpec::default()).await;
    assert!(matches!(result, Err(ref e) if e.is_auth()), "got: {result:?}");
}

#[tokio::test]
async fn test_get_item_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/items/999"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "error": "Item not found" })))
        .mount(&server)
        .await;

    let result = client.get_item(999).await;
    assert!(matches!(result, Err(ref e) if e.is_not_found()), "got: {result:?}");
}

#[tokio::test]
async fn test_create_item_multipart() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "Item created successfully",
            "item": item_json(12, "Blue backpack")
        })))
        .mount(&server)
        .await;

    let payload = ItemPayload {
        title: "Blue backpack".into(),
        description: "Left on the 8:15 bus".into(),
        item_type: ItemType::Found,
        category_id: 2,
        date_occurred: "2024-06-14T08:15".into(),
        location: "Bus line 12".into(),
        is_resolved: false,
        image: Some(ImageAttachment {
            filename: "backpack.jpg".into(),
            bytes: vec![0xff, 0xd8, 0xff, 0xe0],
        }),
    };

    let item = client.create_item(&payload).await.unwrap();
    assert_eq!(item.id, 12);
    assert_eq!(item.title, "Blue backpack");
}

#[tokio::test]
async fn test_update_and_delete_item() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/api/items/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/items/12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let payload = ItemPayload {
        title: "Blue backpack".into(),
        description: "Left on the 8:15 bus".into(),
        item_type: ItemType::Found,
        category_id: 2,
        date_occurred: "2024-06-14T08:15".into(),
        location: "Bus line 12".into(),
        is_resolved: true,
        image: None,
    };

    client.update_item(12, &payload).await.unwrap();
    client.delete_item(12).await.unwrap();
}

#[tokio::test]
async fn test_list_categories() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/items/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "categories": [
                { "id": 1, "name": "Electronics" },
                { "id": 2, "name": "Bags" }
            ]
        })))
        .mount(&server)
        .await;

    let categories = client.list_categories().await.unwrap();
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[1].name, "Bags");
}

// ── Decode boundary tests ───────────────────────────────────────────

#[tokio::test]
async fn test_mismatched_payload_is_a_decode_error() {
    let (server, client) = setup().await;

    // Items endpoint answering with a bare array instead of the envelope.
    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([1, 2, 3])))
        .mount(&server)
        .await;

    let result = client.list_items(&FilterSpec::default()).await;
    assert!(matches!(result, Err(Error::Decode { .. })), "got: {result:?}");
}

#[tokio::test]
async fn test_error_body_without_error_field_falls_back() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/items"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    match client.list_items(&FilterSpec::default()).await {
        Err(Error::Api { message, status }) => {
            assert_eq!(status, 500);
            assert!(message.contains("500"), "generic fallback expected: {message}");
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}

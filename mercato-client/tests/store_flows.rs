//! Slice state contracts: list coercion, pagination sync, optimistic edits,
//! the cart aggregate invariant, and the last-request-wins guard.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mercato_client::{ClientConfig, MemoryTokenStore, Store, TokenPair};
use shared::models::{CategoryCreate, ProductQuery, ProductUpdate, UserStatus};
use shared::response::ListQuery;

fn store_for(server: &MockServer) -> Store {
    let tokens = Arc::new(MemoryTokenStore::with_tokens(TokenPair {
        access_token: "access-1".to_string(),
        refresh_token: "refresh-1".to_string(),
    }));
    Store::with_token_store(&ClientConfig::new(server.uri()), tokens).unwrap()
}

fn product_json(id: &str, name: &str) -> serde_json::Value {
    json!({
        "_id": id,
        "name": name,
        "description": "",
        "price": 10.0,
        "category": "c1",
        "brand": "Acme",
        "stock": 5,
        "status": "active"
    })
}

fn category_json(id: &str, name: &str) -> serde_json::Value {
    json!({ "_id": id, "name": name, "status": "active" })
}

#[tokio::test]
async fn fetch_products_applies_list_and_pagination() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("page", "1"))
        .and(query_param("limit", "12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Success",
            "data": [product_json("p1", "Hub"), product_json("p2", "Dock")],
            "pagination": {
                "currentPage": 1,
                "totalPages": 3,
                "totalItems": 30,
                "hasNextPage": true,
                "hasPrevPage": false
            }
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.fetch_products(ProductQuery::page(1, 12)).await.unwrap();

    let state = store.products_state().await;
    assert!(!state.loading);
    assert!(state.error.is_none());
    assert_eq!(state.products.len(), 2);
    assert_eq!(state.products[0].id, "p1");
    assert_eq!(state.pagination.total_pages, 3);
    assert_eq!(state.pagination.total_items, 30);
}

#[tokio::test]
async fn non_array_payload_coerces_to_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Success",
            "data": { "unexpected": "shape" }
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.fetch_products(ProductQuery::default()).await.unwrap();

    let state = store.products_state().await;
    assert!(state.products.is_empty());
    // Treated as an empty success, not an error.
    assert!(state.error.is_none());
}

#[tokio::test]
async fn rejected_list_fetch_resets_list_and_sets_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "message": "Catalog offline"
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    // Pre-existing data must not survive next to an error flag.
    store.fetch_products(ProductQuery::default()).await.unwrap_err();

    let state = store.products_state().await;
    assert!(state.products.is_empty());
    assert_eq!(state.error.as_deref(), Some("Catalog offline"));
    assert!(!state.loading);
}

#[tokio::test]
async fn stale_list_response_does_not_overwrite_newer_one() {
    let server = MockServer::start().await;
    // Page 1 is slow and arrives after page 2.
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(300))
                .set_body_json(json!({
                    "success": true,
                    "message": "Success",
                    "data": [product_json("old", "Old")],
                    "pagination": {"currentPage": 1, "totalPages": 2, "totalItems": 2}
                })),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Success",
            "data": [product_json("new", "New")],
            "pagination": {"currentPage": 2, "totalPages": 2, "totalItems": 2}
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let slow = store.fetch_products(ProductQuery::page(1, 12));
    let fast = async {
        // Issue the second request strictly after the first.
        tokio::time::sleep(Duration::from_millis(50)).await;
        store.fetch_products(ProductQuery::page(2, 12)).await
    };
    let (slow_result, fast_result) = tokio::join!(slow, fast);
    slow_result.unwrap();
    fast_result.unwrap();

    let state = store.products_state().await;
    assert_eq!(state.products.len(), 1);
    assert_eq!(state.products[0].id, "new");
    assert_eq!(state.pagination.current_page, 2);
}

#[tokio::test]
async fn created_entity_is_prepended_without_refetch() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/categories"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Success",
            "data": [category_json("c1", "Audio")]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/categories"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "message": "Created",
            "data": category_json("c2", "Video")
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.fetch_categories().await.unwrap();
    store
        .create_category(CategoryCreate {
            name: "Video".to_string(),
            description: None,
            image: None,
        })
        .await
        .unwrap();

    let state = store.categories_state().await;
    assert_eq!(state.categories.len(), 2);
    assert_eq!(state.categories[0].id, "c2");
    assert_eq!(state.categories[1].id, "c1");
}

#[tokio::test]
async fn update_replaces_only_the_matching_entity() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Success",
            "data": [product_json("p1", "Hub"), product_json("p2", "Dock")]
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/products/p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Updated",
            "data": product_json("p2", "Dock Pro")
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.fetch_products(ProductQuery::default()).await.unwrap();
    store
        .update_product(
            "p2",
            ProductUpdate {
                name: Some("Dock Pro".to_string()),
                ..ProductUpdate::default()
            },
        )
        .await
        .unwrap();

    let state = store.products_state().await;
    assert_eq!(state.products.len(), 2);
    assert_eq!(state.products[0].name, "Hub");
    assert_eq!(state.products[1].name, "Dock Pro");
}

#[tokio::test]
async fn delete_filters_entity_out_of_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Success",
            "data": [product_json("p1", "Hub"), product_json("p2", "Dock")]
        })))
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/products/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Deleted"
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.fetch_products(ProductQuery::default()).await.unwrap();
    store.delete_product("p1").await.unwrap();

    let state = store.products_state().await;
    assert_eq!(state.products.len(), 1);
    assert_eq!(state.products[0].id, "p2");
}

#[tokio::test]
async fn removing_cart_item_recomputes_totals_locally() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cart"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Success",
            "data": {
                "_id": "cart1",
                "userId": "u1",
                "items": [
                    {
                        "_id": "line1",
                        "productId": product_json("p1", "Hub"),
                        "quantity": 2,
                        "price": 10.0,
                        "total": 20.0
                    },
                    {
                        "_id": "line2",
                        "productId": product_json("p2", "Dock"),
                        "quantity": 3,
                        "price": 4.0,
                        "total": 12.0
                    }
                ],
                "totalAmount": 32.0,
                "totalItems": 5
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/cart/item/p1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Removed"
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.fetch_cart().await.unwrap();
    store.remove_from_cart("p1").await.unwrap();

    let cart = store.cart_state().await.cart.unwrap();
    assert!(cart.items.iter().all(|i| i.product.id != "p1"));
    assert_eq!(cart.total_items, 3);
    assert_eq!(cart.total_amount, 12.0);
}

#[tokio::test]
async fn user_status_update_patches_list_in_place() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Success",
            "data": [
                {
                    "_id": "u1",
                    "firstName": "Ada",
                    "lastName": "Lovelace",
                    "email": "ada@example.com",
                    "role": "customer",
                    "status": "active"
                }
            ],
            "pagination": {"currentPage": 1, "totalPages": 1, "totalItems": 1}
        })))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/users/u1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Updated"
        })))
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.fetch_users(ListQuery::page(1, 10)).await.unwrap();
    store
        .update_user_status("u1", UserStatus::Inactive)
        .await
        .unwrap();

    let state = store.users_state().await;
    assert_eq!(state.users[0].status, UserStatus::Inactive);
}

#[tokio::test]
async fn bootstrap_without_token_makes_no_request() {
    let server = MockServer::start().await;
    // No /auth/profile mock mounted: any request would 404 and the
    // assertion below would fail on the recorded request count.
    let tokens = Arc::new(MemoryTokenStore::new());
    let store = Store::with_token_store(&ClientConfig::new(server.uri()), tokens).unwrap();

    store.bootstrap().await;

    assert!(server.received_requests().await.unwrap().is_empty());
    assert!(!store.auth_state().await.is_authenticated);
}

#[tokio::test]
async fn bootstrap_with_token_hydrates_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/auth/profile"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Success",
            "data": {
                "_id": "u1",
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "role": "admin",
                "status": "active"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.bootstrap().await;

    let auth = store.auth_state().await;
    assert!(auth.is_authenticated);
    assert!(auth.user.unwrap().is_admin());
}

//! Order list and order creation against a mock backend.

#![allow(clippy::unwrap_used)]

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use omniorder_client::Route;
use omniorder_client::api::Page;
use omniorder_client::orders::{ORDER_NUMBER_BOUND, OrderForm, OrderList};
use omniorder_core::{OrderId, OrderStatus};
use omniorder_integration_tests::{TOKEN, TestContext, detail, order_json, user_json};

async fn signed_in_session(ctx: &TestContext) -> omniorder_client::SessionStore {
    Mock::given(method("GET"))
        .and(path("/v1/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
        .mount(&ctx.server)
        .await;
    let mut session = ctx.session();
    session.restore().await;
    assert!(session.user().is_some());
    session
}

// ============================================================================
// List
// ============================================================================

#[tokio::test]
async fn test_list_orders() {
    let ctx = TestContext::signed_in().await;
    Mock::given(method("GET"))
        .and(path("/v1/orders"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "orders": [order_json("o1", 4821), order_json("o2", 77)],
            "total": 2
        })))
        .mount(&ctx.server)
        .await;

    let mut list = OrderList::new();
    list.load(&ctx.api).await;

    assert!(!list.is_loading());
    assert_eq!(list.orders().len(), 2);
    let first = &list.orders()[0];
    assert_eq!(first.order_number, 4821);
    assert_eq!(first.status, OrderStatus::Booked);
    assert_eq!(first.price.to_string(), "499.99");
    assert_eq!(first.item_list.len(), 3);
    assert_eq!(first.address.city, "Pune");
}

#[tokio::test]
async fn test_list_failure_shows_empty_list() {
    let ctx = TestContext::signed_in().await;
    Mock::given(method("GET"))
        .and(path("/v1/orders"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&ctx.server)
        .await;

    let mut list = OrderList::new();
    list.load(&ctx.api).await;
    assert!(!list.is_loading());
    assert!(list.is_empty());
}

#[tokio::test]
async fn test_list_with_page() {
    let ctx = TestContext::signed_in().await;
    Mock::given(method("GET"))
        .and(path("/v1/orders"))
        .and(query_param("skip", "20"))
        .and(query_param("limit", "10"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"orders": [], "total": 20})),
        )
        .expect(1)
        .mount(&ctx.server)
        .await;

    let response = ctx
        .api
        .list_orders(Some(Page { skip: 20, limit: 10 }))
        .await
        .unwrap();
    assert!(response.orders.is_empty());
    assert_eq!(response.total, Some(20));
}

#[tokio::test]
async fn test_get_order() {
    let ctx = TestContext::signed_in().await;
    Mock::given(method("GET"))
        .and(path("/v1/orders/o1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(order_json("o1", 4821)))
        .mount(&ctx.server)
        .await;

    let order = ctx.api.get_order(&OrderId::new("o1")).await.unwrap();
    assert_eq!(order.id.as_str(), "o1");
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn test_create_order_posts_booked_order() {
    let ctx = TestContext::signed_in().await;
    let session = signed_in_session(&ctx).await;
    let user = session.user().unwrap();

    let mut form = OrderForm::new(Some(user));
    assert!(form.draft.order_number < ORDER_NUMBER_BOUND);
    assert_eq!(form.draft.address.city, "Pune");

    form.draft.order_number = 4821;
    form.draft.item_name = "Fruit basket".into();
    form.draft.price = "499.99".into();
    form.draft.items = "Apple, Banana ,, Orange".into();

    Mock::given(method("POST"))
        .and(path("/v1/orders"))
        .and(body_partial_json(json!({
            "user_id": "6650f1c2a1b2c3d4e5f60718",
            "item_name": "Fruit basket",
            "price": 499.99,
            "order_number": 4821,
            "item_list": ["Apple", "Banana", "Orange"],
            "Address": {"city": "Pune", "country": "India"},
            "status": "BOOKED"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Order created successfully",
            "order": order_json("o9", 4821)
        })))
        .expect(1)
        .mount(&ctx.server)
        .await;

    assert_eq!(form.submit(session.api(), user).await, Some(Route::Orders));
    assert_eq!(form.error(), None);
}

#[tokio::test]
async fn test_create_order_failure_keeps_values() {
    let ctx = TestContext::signed_in().await;
    let session = signed_in_session(&ctx).await;
    let user = session.user().unwrap();

    Mock::given(method("POST"))
        .and(path("/v1/orders"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&ctx.server)
        .await;

    let mut form = OrderForm::new(Some(user));
    form.draft.item_name = "Tea".into();
    form.draft.price = "120".into();

    assert_eq!(form.submit(session.api(), user).await, None);
    assert_eq!(form.error(), Some("Failed to create order"));
    assert_eq!(form.draft.item_name, "Tea");
    assert!(!form.is_loading());
}

#[tokio::test]
async fn test_create_order_failure_shows_detail() {
    let ctx = TestContext::signed_in().await;
    let session = signed_in_session(&ctx).await;
    let user = session.user().unwrap();

    Mock::given(method("POST"))
        .and(path("/v1/orders"))
        .respond_with(
            ResponseTemplate::new(400).set_body_json(detail(json!("Order number already exists"))),
        )
        .mount(&ctx.server)
        .await;

    let mut form = OrderForm::new(Some(user));
    form.draft.item_name = "Tea".into();
    form.draft.price = "120".into();

    assert_eq!(form.submit(session.api(), user).await, None);
    assert_eq!(form.error(), Some("Order number already exists"));
}

#[tokio::test]
async fn test_invalid_price_makes_no_request() {
    let ctx = TestContext::signed_in().await;
    let session = signed_in_session(&ctx).await;
    let user = session.user().unwrap();

    Mock::given(method("POST"))
        .and(path("/v1/orders"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&ctx.server)
        .await;

    let mut form = OrderForm::new(Some(user));
    form.draft.item_name = "Tea".into();
    form.draft.price = "-5".into();

    assert_eq!(form.submit(session.api(), user).await, None);
    assert!(form.error().unwrap().starts_with("Invalid price"));
}

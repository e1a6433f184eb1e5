//! Cart flows over HTTP: add, merge, adjust, remove and persistence.

#![allow(clippy::unwrap_used)]

use edairy_integration_tests::{TestContext, add_form, oob_content};
use serde_json::Value;

#[tokio::test]
async fn test_home_renders_catalog_and_empty_surfaces() {
    let ctx = TestContext::new().await;
    let body = ctx.get_text("/").await;

    assert!(body.contains("Fresh Cheese"));
    assert!(body.contains("Pure Ghee"));
    assert!(body.contains("Your cart is empty"));
    assert!(body.contains("No liked items yet"));
    assert!(body.contains(r#"id="like-organic-milk""#));
}

#[tokio::test]
async fn test_adding_twice_merges_into_one_line() {
    let ctx = TestContext::new().await;

    ctx.post_text("/cart/add", &add_form("Organic Milk", "60", "1")).await;
    let body = ctx.post_text("/cart/add", &add_form("Organic Milk", "60", "1")).await;

    assert_eq!(oob_content(&body, "cart-count"), Some("2"));
    assert_eq!(oob_content(&body, "cart-total"), Some("₹120"));
    assert!(body.contains("Organic Milk added to cart!"));

    let cart_items = oob_content(&body, "cart-items").unwrap_or_default();
    assert_eq!(cart_items.matches(r#"class="sidebar-item""#).count(), 1);
    assert!(cart_items.contains(r#"<span class="qty">2</span>"#));
}

#[tokio::test]
async fn test_cart_is_persisted_per_visitor() {
    let ctx = TestContext::new().await;
    ctx.post_text("/cart/add", &add_form("Fresh Curd", "40", "3")).await;

    let visitors = ctx.visitors();
    assert_eq!(visitors.len(), 1);

    let path = ctx.data_dir().join(&visitors[0]).join("cart.json");
    let stored: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(stored[0]["name"], "Fresh Curd");
    assert_eq!(stored[0]["price"], 40);
    assert_eq!(stored[0]["quantity"], 3);

    // Same visitor sees it after a full reload
    let body = ctx.get_text("/").await;
    assert!(body.contains(r#"<span id="cart-count" class="badge">3</span>"#));

    // Another visitor starts empty
    let other = ctx
        .other_visitor()
        .get(ctx.url("/"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(other.contains(r#"<span id="cart-count" class="badge">0</span>"#));
}

#[tokio::test]
async fn test_adjust_to_zero_removes_line() {
    let ctx = TestContext::new().await;
    ctx.post_text("/cart/add", &add_form("Pure Butter", "320", "1")).await;
    ctx.post_text("/cart/add", &add_form("Fresh Curd", "40", "1")).await;

    let body = ctx
        .post_text("/cart/adjust", &[("position", "0"), ("delta", "-1")])
        .await;

    assert_eq!(oob_content(&body, "cart-count"), Some("1"));
    let cart_items = oob_content(&body, "cart-items").unwrap_or_default();
    assert!(!cart_items.contains("Pure Butter"));
    assert!(cart_items.contains("Fresh Curd"));
}

#[tokio::test]
async fn test_remove_last_line_shows_empty_state() {
    let ctx = TestContext::new().await;
    ctx.post_text("/cart/add", &add_form("Almond Milk", "120", "2")).await;

    let body = ctx.post_text("/cart/remove", &[("position", "0")]).await;

    assert_eq!(oob_content(&body, "cart-count"), Some("0"));
    assert_eq!(oob_content(&body, "cart-total"), Some("₹0"));
    assert!(body.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_unparseable_quantity_adds_one() {
    let ctx = TestContext::new().await;
    let body = ctx.post_text("/cart/add", &add_form("Pure Ghee", "700", "lots")).await;

    assert_eq!(oob_content(&body, "cart-count"), Some("1"));
}

#[tokio::test]
async fn test_add_without_name_is_bad_request() {
    let ctx = TestContext::new().await;
    let resp = ctx.post_form("/cart/add", &add_form("  ", "60", "1")).await;

    assert_eq!(resp.status(), reqwest::StatusCode::BAD_REQUEST);
    assert!(ctx.visitors().iter().all(|v| {
        !ctx.data_dir().join(v).join("cart.json").exists()
    }));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_adds_from_one_visitor_are_all_kept() {
    let ctx = TestContext::new().await;
    // Establish the session cookie before going concurrent
    ctx.get_text("/").await;

    let adds: Vec<_> = (0..20)
        .map(|_| {
            let client = ctx.client.clone();
            let url = ctx.url("/cart/add");
            tokio::spawn(async move {
                client
                    .post(url)
                    .header("HX-Request", "true")
                    .form(&add_form("Organic Milk", "60", "1"))
                    .send()
                    .await
                    .unwrap()
                    .status()
            })
        })
        .collect();
    for add in adds {
        assert!(add.await.unwrap().is_success());
    }

    let body = ctx.post_text("/cart/add", &add_form("Organic Milk", "60", "1")).await;
    assert_eq!(oob_content(&body, "cart-count"), Some("21"));
    assert_eq!(ctx.visitors().len(), 1);
}

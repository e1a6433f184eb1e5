//! Liked items flows over HTTP.

#![allow(clippy::unwrap_used)]

use edairy_integration_tests::{TestContext, add_form, oob_content};

fn ghee() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "Pure Ghee"),
        ("price", "700"),
        ("image", "/static/images/product-6.jpg"),
    ]
}

#[tokio::test]
async fn test_toggle_marks_card_icon_liked() {
    let ctx = TestContext::new().await;
    let body = ctx.post_text("/liked/toggle", &ghee()).await;

    let icon = oob_content(&body, "like-pure-ghee").unwrap_or_default();
    assert!(icon.contains("is-liked"));
    assert_eq!(oob_content(&body, "liked-count"), Some("1"));
    assert!(body.contains("Pure Ghee added to favorites!"));

    // A full reload keeps the icon state
    let page = ctx.get_text("/").await;
    assert!(page.contains("like-btn is-liked"));
}

#[tokio::test]
async fn test_toggle_twice_unlikes() {
    let ctx = TestContext::new().await;
    ctx.post_text("/liked/toggle", &ghee()).await;
    let body = ctx.post_text("/liked/toggle", &ghee()).await;

    let icon = oob_content(&body, "like-pure-ghee").unwrap_or_default();
    assert!(!icon.contains("is-liked"));
    assert_eq!(oob_content(&body, "liked-count"), Some("0"));
}

#[tokio::test]
async fn test_remove_from_sidebar_resets_card_icon() {
    let ctx = TestContext::new().await;
    ctx.post_text("/liked/toggle", &ghee()).await;

    let body = ctx.post_text("/liked/remove", &[("name", "Pure Ghee")]).await;

    assert!(!body.contains("is-liked"));
    assert!(body.contains("No liked items yet"));
    assert_eq!(oob_content(&body, "liked-count"), Some("0"));
}

#[tokio::test]
async fn test_add_liked_item_to_cart_keeps_it_liked() {
    let ctx = TestContext::new().await;
    ctx.post_text("/liked/toggle", &ghee()).await;

    let body = ctx
        .post_text("/liked/add-to-cart", &[("name", "Pure Ghee")])
        .await;

    assert_eq!(oob_content(&body, "cart-count"), Some("1"));
    assert_eq!(oob_content(&body, "liked-count"), Some("1"));
    assert!(oob_content(&body, "like-pure-ghee").unwrap_or_default().contains("is-liked"));
}

#[tokio::test]
async fn test_add_liked_item_to_cart_merges_with_cart_line() {
    let ctx = TestContext::new().await;
    ctx.post_text("/cart/add", &add_form("Pure Ghee", "700", "3")).await;
    ctx.post_text("/liked/toggle", &ghee()).await;

    let body = ctx
        .post_text("/liked/add-to-cart", &[("name", "Pure Ghee")])
        .await;

    assert_eq!(oob_content(&body, "cart-count"), Some("4"));
    assert_eq!(oob_content(&body, "cart-total"), Some("₹2800"));
    let cart_items = oob_content(&body, "cart-items").unwrap_or_default();
    assert_eq!(cart_items.matches(r#"class="sidebar-item""#).count(), 1);
    assert!(cart_items.contains(r#"<span class="qty">4</span>"#));
    assert_eq!(oob_content(&body, "liked-count"), Some("1"));
}

#[tokio::test]
async fn test_clear_resets_every_icon() {
    let ctx = TestContext::new().await;
    ctx.post_text("/liked/toggle", &ghee()).await;
    ctx.post_text(
        "/liked/toggle",
        &[("name", "Fresh Curd"), ("price", "40"), ("image", "/static/images/product-5.jpg")],
    )
    .await;

    let body = ctx.post_text("/liked/clear", &[]).await;

    assert!(!body.contains("is-liked"));
    assert_eq!(oob_content(&body, "liked-count"), Some("0"));
    assert!(body.contains("All favorites cleared!"));
}

//! Product grid, login panel and form handlers over HTTP.

#![allow(clippy::unwrap_used)]

use edairy_integration_tests::{TestContext, add_form, oob_content};
use reqwest::StatusCode;

#[tokio::test]
async fn test_health() {
    let ctx = TestContext::new().await;
    assert_eq!(ctx.get_text("/health").await, "ok");
}

#[tokio::test]
async fn test_search_filters_grid_case_insensitively() {
    let ctx = TestContext::new().await;
    let grid = ctx.get_text("/products/search?q=MILK").await;

    assert!(grid.contains("Organic Milk"));
    assert!(grid.contains("Almond Milk"));
    assert!(!grid.contains("Pure Ghee"));
}

#[tokio::test]
async fn test_search_without_matches() {
    let ctx = TestContext::new().await;
    let grid = ctx.get_text("/products/search?q=yogurt").await;

    assert!(grid.contains("No products found"));
}

#[tokio::test]
async fn test_category_filter() {
    let ctx = TestContext::new().await;

    let grid = ctx.get_text("/products/filter/butter").await;
    assert!(grid.contains("Pure Butter"));
    assert!(!grid.contains("Fresh Cheese"));

    let all = ctx.get_text("/products/filter/all").await;
    assert_eq!(all.matches(r#"class="box""#).count(), 6);
}

#[tokio::test]
async fn test_grid_keeps_like_state() {
    let ctx = TestContext::new().await;
    ctx.post_text(
        "/liked/toggle",
        &[("name", "Fresh Curd"), ("price", "40"), ("image", "/static/images/product-5.jpg")],
    )
    .await;

    let grid = ctx.get_text("/products/filter/curd").await;
    assert!(grid.contains("like-btn is-liked"));
}

#[tokio::test]
async fn test_browse_notice() {
    let ctx = TestContext::new().await;
    let body = ctx.post_text("/products/browse/cheese", &[]).await;

    assert!(body.contains("Browsing cheese products!"));
}

#[tokio::test]
async fn test_login_panel_transitions() {
    let ctx = TestContext::new().await;

    let open = ctx.post_text("/panel/open", &[]).await;
    assert!(open.contains("login-form active"));

    let reset = ctx.post_text("/panel/show-reset", &[("from", "login")]).await;
    assert!(reset.contains("reset-form active"));

    let back = ctx.post_text("/panel/back-to-login", &[("from", "reset")]).await;
    assert!(back.contains("login-form active"));

    let closed = ctx.post_text("/panel/close", &[("from", "login")]).await;
    assert!(!closed.contains("<form"));

    // Switching forms while closed keeps it closed
    let still_closed = ctx.post_text("/panel/show-signup", &[("from", "closed")]).await;
    assert!(!still_closed.contains("signup-form"));
}

#[tokio::test]
async fn test_unknown_panel_action_is_bad_request() {
    let ctx = TestContext::new().await;
    let resp = ctx.post_form("/panel/explode", &[]).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_contact_form() {
    let ctx = TestContext::new().await;

    let incomplete = ctx
        .post_text("/contact", &[("name", "Ravi"), ("email", "ravi@dairy.in")])
        .await;
    assert!(incomplete.contains("Please fill in all required fields."));

    let sent = ctx
        .post_text(
            "/contact",
            &[("name", "Ravi"), ("email", "ravi@dairy.in"), ("message", "Do you deliver on Sundays?")],
        )
        .await;
    assert!(sent.contains("Thank you for your message!"));
    assert!(sent.contains(r#"id="contact-form""#));
}

#[tokio::test]
async fn test_newsletter_signup() {
    let ctx = TestContext::new().await;

    let blank = ctx.post_text("/newsletter", &[("email", "")]).await;
    assert!(!blank.contains("toast"));

    let body = ctx.post_text("/newsletter", &[("email", "ravi@dairy.in")]).await;
    assert!(body.contains("Thank you for subscribing to our newsletter!"));
}

#[tokio::test]
async fn test_security_headers() {
    let ctx = TestContext::new().await;
    let resp = ctx.client.get(ctx.url("/")).send().await.unwrap();

    assert!(resp.headers().contains_key("content-security-policy"));
    assert!(resp.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let ctx = TestContext::new().await;
    let resp = ctx.client.get(ctx.url("/dairy-farm")).send().await.unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_preview_add_to_cart_merges_and_closes_preview() {
    let ctx = TestContext::new().await;
    ctx.post_text("/cart/add", &add_form("Almond Milk", "120", "2")).await;

    let preview = ctx.get_text("/products/almond-milk").await;
    assert!(preview.contains("Almond Milk"));
    assert!(preview.contains("-20%"));
    assert!(preview.contains("Fresh and pure dairy product"));

    let body = ctx.post_text("/products/almond-milk/add", &[]).await;
    assert_eq!(oob_content(&body, "cart-count"), Some("3"));
    assert_eq!(oob_content(&body, "product-preview"), Some(""));
    assert!(body.contains("Almond Milk added to cart!"));
}

#[tokio::test]
async fn test_share_shows_link_and_notice() {
    let ctx = TestContext::new().await;
    let resp = ctx
        .client
        .post(ctx.url("/products/pure-ghee/share"))
        .header("HX-Request", "true")
        .header("HX-Current-URL", "http://shop.example/#products")
        .send()
        .await
        .unwrap();
    assert!(resp.status().is_success());
    let body = resp.text().await.unwrap();

    let panel = oob_content(&body, "product-preview").unwrap_or_default();
    assert!(panel.contains("Check out this amazing product: Pure Ghee for ₹700 at eDairy!"));
    assert!(panel.contains("shop.example"));
    assert!(body.contains("Pure Ghee link ready to share!"));
}

#[tokio::test]
async fn test_unknown_product_preview_is_not_found() {
    let ctx = TestContext::new().await;
    let resp = ctx.client.get(ctx.url("/products/paneer")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let resp = ctx.post_form("/products/paneer/add", &[]).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

//! Home page caching.

mod common;

use actix_web::test;

use yatube_core::ports::Cache;

use common::{TestContext, body_text};

#[actix_web::test]
async fn test_home_page_is_cached_until_cleared() {
    let ctx = TestContext::new();
    let author = ctx.user("auth").await;
    ctx.post(&author, "Before caching", None).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::get().uri("/").to_request();
    let first = body_text(test::call_and_read_body(&app, req).await);
    assert!(first.contains("Before caching"));

    ctx.post(&author, "After caching", None).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let cached = body_text(test::call_and_read_body(&app, req).await);
    assert_eq!(cached, first);
    assert!(!cached.contains("After caching"));

    ctx.state.cache.clear().await.unwrap();

    let req = test::TestRequest::get().uri("/").to_request();
    let fresh = body_text(test::call_and_read_body(&app, req).await);
    assert!(fresh.contains("After caching"));
}

#[actix_web::test]
async fn test_cache_is_per_viewer() {
    let ctx = TestContext::new();
    let author = ctx.user("auth").await;
    let cookie = ctx.session(&author);
    let app = test_app!(ctx);

    let req = test::TestRequest::get().uri("/").to_request();
    let anonymous = body_text(test::call_and_read_body(&app, req).await);
    assert!(anonymous.contains("/auth/login/"));

    let req = test::TestRequest::get().uri("/").cookie(cookie).to_request();
    let signed_in = body_text(test::call_and_read_body(&app, req).await);
    assert!(signed_in.contains("/auth/logout/"));
}

#[actix_web::test]
async fn test_page_parameter_spellings_share_one_entry() {
    let ctx = TestContext::new();
    let author = ctx.user("auth").await;
    ctx.post(&author, "Before caching", None).await;
    let app = test_app!(ctx);

    for uri in ["/?page=junk-1", "/?page=junk-2", "/?page=99999999999999999999", "/"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        test::call_service(&app, req).await;
    }

    assert!(ctx.state.cache.exists("index_page:anon:1").await);
    assert!(!ctx.state.cache.exists("index_page:anon:junk-1").await);
    assert!(!ctx.state.cache.exists("index_page:anon:").await);

    ctx.post(&author, "After caching", None).await;

    let req = test::TestRequest::get().uri("/?page=other").to_request();
    let body = body_text(test::call_and_read_body(&app, req).await);
    assert!(!body.contains("After caching"));
}

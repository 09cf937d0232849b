//! Subscriptions: follow/unfollow and the follow feed.

mod common;

use actix_web::http::StatusCode;
use actix_web::test;

use common::{TestContext, body_text, card_count, location};

#[actix_web::test]
async fn test_follow_then_unfollow_restores_state() {
    let ctx = TestContext::new();
    let reader = ctx.user("reader").await;
    ctx.user("author").await;
    let cookie = ctx.session(&reader);
    let app = test_app!(ctx);

    let before = ctx.follow_count(&reader).await;

    let req = test::TestRequest::get()
        .uri("/profile/author/follow/")
        .cookie(cookie.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/author/");
    assert_eq!(ctx.follow_count(&reader).await, before + 1);

    let req = test::TestRequest::get()
        .uri("/profile/author/unfollow/")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/author/");
    assert_eq!(ctx.follow_count(&reader).await, before);
}

#[actix_web::test]
async fn test_self_and_duplicate_follow_are_noops() {
    let ctx = TestContext::new();
    let reader = ctx.user("reader").await;
    ctx.user("author").await;
    let cookie = ctx.session(&reader);
    let app = test_app!(ctx);

    for uri in [
        "/profile/reader/follow/",
        "/profile/author/follow/",
        "/profile/author/follow/",
    ] {
        let req = test::TestRequest::get()
            .uri(uri)
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FOUND, "{uri}");
    }

    assert_eq!(ctx.follow_count(&reader).await, 1);
}

#[actix_web::test]
async fn test_unfollow_without_follow_is_noop() {
    let ctx = TestContext::new();
    let reader = ctx.user("reader").await;
    ctx.user("author").await;
    let cookie = ctx.session(&reader);
    let app = test_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/profile/author/unfollow/")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(ctx.follow_count(&reader).await, 0);
}

#[actix_web::test]
async fn test_feed_shows_posts_only_to_followers() {
    let ctx = TestContext::new();
    let follower = ctx.user("follower").await;
    let stranger = ctx.user("stranger").await;
    let author = ctx.user("author").await;
    ctx.post(&author, "Post for followers", None).await;
    let follower_cookie = ctx.session(&follower);
    let stranger_cookie = ctx.session(&stranger);
    let app = test_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/profile/author/follow/")
        .cookie(follower_cookie.clone())
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/follow/")
        .cookie(follower_cookie)
        .to_request();
    let body = body_text(test::call_and_read_body(&app, req).await);
    assert_eq!(card_count(&body), 1);
    assert!(body.contains("Post for followers"));

    let req = test::TestRequest::get()
        .uri("/follow/")
        .cookie(stranger_cookie)
        .to_request();
    let body = body_text(test::call_and_read_body(&app, req).await);
    assert_eq!(card_count(&body), 0);
}

#[actix_web::test]
async fn test_profile_shows_follow_button_state() {
    let ctx = TestContext::new();
    let reader = ctx.user("reader").await;
    ctx.user("author").await;
    let cookie = ctx.session(&reader);
    let app = test_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/profile/author/")
        .cookie(cookie.clone())
        .to_request();
    let body = body_text(test::call_and_read_body(&app, req).await);
    assert!(body.contains("/profile/author/follow/"));

    let req = test::TestRequest::get()
        .uri("/profile/author/follow/")
        .cookie(cookie.clone())
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/profile/author/")
        .cookie(cookie.clone())
        .to_request();
    let body = body_text(test::call_and_read_body(&app, req).await);
    assert!(body.contains("/profile/author/unfollow/"));
    assert!(body.contains("Followers: 1"));

    // No button on your own profile.
    let req = test::TestRequest::get()
        .uri("/profile/reader/")
        .cookie(cookie)
        .to_request();
    let body = body_text(test::call_and_read_body(&app, req).await);
    assert!(!body.contains("/profile/reader/follow/"));
}

#[actix_web::test]
async fn test_follow_unknown_author_is_404() {
    let ctx = TestContext::new();
    let reader = ctx.user("reader").await;
    let cookie = ctx.session(&reader);
    let app = test_app!(ctx);

    let req = test::TestRequest::get()
        .uri("/profile/ghost/follow/")
        .cookie(cookie)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

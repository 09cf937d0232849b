//! Public pages: routing, templates, pagination and group isolation.

mod common;

use actix_web::http::StatusCode;
use actix_web::test;

use web_server::SiteSettings;

use common::{TestContext, body_text, card_count, template_of};

#[actix_web::test]
async fn test_unknown_url_renders_404_page() {
    let ctx = TestContext::new();
    let app = test_app!(ctx);

    let req = test::TestRequest::get().uri("/unexisting_page/").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_text(test::read_body(resp).await);
    assert_eq!(template_of(&body), Some("core/404.html"));
}

#[actix_web::test]
async fn test_public_pages_render_their_templates() {
    let ctx = TestContext::new();
    let author = ctx.user("auth").await;
    let group = ctx.group("test-slug").await;
    let post = ctx.post(&author, "Test post text", Some(&group)).await;
    let app = test_app!(ctx);

    let pages = [
        ("/".to_string(), "posts/index.html"),
        ("/group/test-slug/".to_string(), "posts/group_list.html"),
        ("/profile/auth/".to_string(), "posts/profile.html"),
        (format!("/posts/{}/", post.id), "posts/post_detail.html"),
        ("/auth/signup/".to_string(), "users/signup.html"),
        ("/auth/login/".to_string(), "users/login.html"),
        ("/auth/logout/".to_string(), "users/logged_out.html"),
    ];

    for (uri, template) in pages {
        let req = test::TestRequest::get().uri(&uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        let body = body_text(test::read_body(resp).await);
        assert_eq!(template_of(&body), Some(template), "{uri}");
    }
}

#[actix_web::test]
async fn test_authenticated_pages_render_their_templates() {
    let ctx = TestContext::new();
    let author = ctx.user("auth").await;
    let post = ctx.post(&author, "Test post text", None).await;
    let cookie = ctx.session(&author);
    let app = test_app!(ctx);

    let pages = [
        ("/create/".to_string(), "posts/create_post.html"),
        (format!("/posts/{}/edit/", post.id), "posts/create_post.html"),
        ("/follow/".to_string(), "posts/follow.html"),
    ];

    for (uri, template) in pages {
        let req = test::TestRequest::get()
            .uri(&uri)
            .cookie(cookie.clone())
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        let body = body_text(test::read_body(resp).await);
        assert_eq!(template_of(&body), Some(template), "{uri}");
    }
}

#[actix_web::test]
async fn test_missing_objects_are_404() {
    let ctx = TestContext::new();
    let app = test_app!(ctx);

    for uri in [
        "/group/nope/",
        "/profile/nobody/",
        "/posts/not-a-uuid/",
        "/posts/00000000-0000-0000-0000-000000000000/",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
        let body = body_text(test::read_body(resp).await);
        assert_eq!(template_of(&body), Some("core/404.html"), "{uri}");
    }
}

#[actix_web::test]
async fn test_listings_paginate_by_configured_page_size() {
    let ctx = TestContext::new();
    let author = ctx.user("auth").await;
    let group = ctx.group("test-slug").await;
    for i in 0..13 {
        ctx.post(&author, &format!("Post {i}"), Some(&group)).await;
    }
    let app = test_app!(ctx);

    for base in ["/", "/group/test-slug/", "/profile/auth/"] {
        let req = test::TestRequest::get().uri(base).to_request();
        let body = body_text(test::call_and_read_body(&app, req).await);
        assert_eq!(card_count(&body), 10, "{base} page 1");

        let req = test::TestRequest::get()
            .uri(&format!("{base}?page=2"))
            .to_request();
        let body = body_text(test::call_and_read_body(&app, req).await);
        assert_eq!(card_count(&body), 3, "{base} page 2");
    }
}

#[actix_web::test]
async fn test_page_parameter_is_forgiving() {
    let ctx = TestContext::with_settings(SiteSettings {
        posts_per_page: 2,
        ..Default::default()
    });
    let author = ctx.user("auth").await;
    for i in 0..5 {
        ctx.post(&author, &format!("Post {i}"), None).await;
    }
    let app = test_app!(ctx);

    let cases = [
        ("/profile/auth/?page=abc", 2),
        ("/profile/auth/?page=0", 1),
        ("/profile/auth/?page=-4", 1),
        ("/profile/auth/?page=999", 1),
    ];
    for (uri, cards) in cases {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        let body = body_text(test::read_body(resp).await);
        assert_eq!(card_count(&body), cards, "{uri}");
    }
}

#[actix_web::test]
async fn test_post_in_one_group_never_listed_in_another() {
    let ctx = TestContext::new();
    let author = ctx.user("auth").await;
    let group_a = ctx.group("group-a").await;
    ctx.group("group-b").await;
    ctx.post(&author, "Only in group A", Some(&group_a)).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::get().uri("/group/group-a/").to_request();
    let body = body_text(test::call_and_read_body(&app, req).await);
    assert!(body.contains("Only in group A"));

    let req = test::TestRequest::get().uri("/group/group-b/").to_request();
    let body = body_text(test::call_and_read_body(&app, req).await);
    assert!(!body.contains("Only in group A"));
    assert_eq!(card_count(&body), 0);
}

#[actix_web::test]
async fn test_post_detail_shows_author_post_count() {
    let ctx = TestContext::new();
    let author = ctx.user("auth").await;
    ctx.post(&author, "First", None).await;
    let post = ctx.post(&author, "Second", None).await;
    let app = test_app!(ctx);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/", post.id))
        .to_request();
    let body = body_text(test::call_and_read_body(&app, req).await);
    assert!(body.contains("Posts by the author: <span>2</span>"));
    assert!(body.contains("Second"));
}

#[actix_web::test]
async fn test_health_reports_ok() {
    let ctx = TestContext::new();
    let app = test_app!(ctx);

    let req = test::TestRequest::get().uri("/health").to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
}

//! HTML page renderers.
//!
//! Every page is wrapped by [`layout`], which stamps the page's template name
//! on `<body data-template="…">` so clients and tests can tell pages apart
//! without parsing their content.

pub mod errors;
pub mod posts;
pub mod users;

use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;

use yatube_core::Page;
use yatube_shared::FormErrors;

use crate::middleware::auth::Identity;

/// Named page layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    Index,
    GroupList,
    Profile,
    PostDetail,
    CreatePost,
    Follow,
    Signup,
    Login,
    LoggedOut,
    NotFound,
    Forbidden,
    ServerError,
}

impl Template {
    pub fn name(self) -> &'static str {
        match self {
            Template::Index => "posts/index.html",
            Template::GroupList => "posts/group_list.html",
            Template::Profile => "posts/profile.html",
            Template::PostDetail => "posts/post_detail.html",
            Template::CreatePost => "posts/create_post.html",
            Template::Follow => "posts/follow.html",
            Template::Signup => "users/signup.html",
            Template::Login => "users/login.html",
            Template::LoggedOut => "users/logged_out.html",
            Template::NotFound => "core/404.html",
            Template::Forbidden => "core/403.html",
            Template::ServerError => "core/500.html",
        }
    }
}

/// Escape text for use in HTML content and quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escaped text with line breaks kept.
pub fn linebreaks(text: &str) -> String {
    escape(text).replace("\r\n", "\n").replace('\n', "<br>")
}

/// Inline messages for one form field.
pub fn form_errors(errors: &FormErrors, field: &str) -> String {
    errors
        .get(field)
        .iter()
        .map(|message| format!("<div class=\"error\">{}</div>\n", escape(message)))
        .collect()
}

fn navigation(viewer: Option<&Identity>) -> String {
    let mut nav = String::from(r#"<nav><a href="/">Yatube</a>"#);
    match viewer {
        Some(identity) => {
            nav.push_str(r#" <a href="/create/">New post</a>"#);
            nav.push_str(r#" <a href="/follow/">Subscriptions</a>"#);
            nav.push_str(&format!(
                r#" <a href="/profile/{0}/">{0}</a>"#,
                escape(&identity.username)
            ));
            nav.push_str(r#" <a href="/auth/logout/">Log out</a>"#);
        }
        None => {
            nav.push_str(r#" <a href="/auth/login/">Log in</a>"#);
            nav.push_str(r#" <a href="/auth/signup/">Sign up</a>"#);
        }
    }
    nav.push_str("</nav>");
    nav
}

/// Full HTML document for `template`.
pub fn layout(template: Template, title: &str, viewer: Option<&Identity>, content: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"en\">\n",
            "<head><meta charset=\"utf-8\"><title>{title}</title></head>\n",
            "<body data-template=\"{template}\">\n",
            "<header>{nav}</header>\n",
            "<main>\n{content}\n</main>\n",
            "<footer>&copy; Yatube</footer>\n",
            "</body>\n",
            "</html>\n"
        ),
        title = escape(title),
        template = template.name(),
        nav = navigation(viewer),
        content = content,
    )
}

/// Page navigation links. Empty when everything fits on one page.
pub fn paginator<T>(page: &Page<T>) -> String {
    if !page.has_other_pages() {
        return String::new();
    }

    let mut out = String::from(r#"<nav class="pagination">"#);
    if let Some(previous) = page.previous_page_number() {
        out.push_str(r#"<a href="?page=1">First</a> "#);
        out.push_str(&format!(r#"<a href="?page={previous}">Previous</a> "#));
    }
    for number in 1..=page.num_pages() {
        if number == page.number() {
            out.push_str(&format!(r#"<span class="current">{number}</span> "#));
        } else {
            out.push_str(&format!(r#"<a href="?page={number}">{number}</a> "#));
        }
    }
    if let Some(next) = page.next_page_number() {
        out.push_str(&format!(r#"<a href="?page={next}">Next</a> "#));
        out.push_str(&format!(
            r#"<a href="?page={}">Last</a>"#,
            page.num_pages()
        ));
    }
    out.push_str("</nav>");
    out
}

/// 200 response carrying an HTML document.
pub fn html(body: String) -> HttpResponse {
    html_with_status(StatusCode::OK, body)
}

pub fn html_with_status(status: StatusCode, body: String) -> HttpResponse {
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<script>alert("x") & 'y'</script>"#),
            "&lt;script&gt;alert(&quot;x&quot;) &amp; &#x27;y&#x27;&lt;/script&gt;"
        );
    }

    #[test]
    fn test_layout_carries_template_name() {
        let page = layout(Template::Index, "Home", None, "<p>hi</p>");
        assert!(page.contains(r#"<body data-template="posts/index.html">"#));
        assert!(page.contains("/auth/login/"));
    }

    #[test]
    fn test_paginator_hidden_for_single_page() {
        let page = Page::from_vec(vec![1, 2, 3], None, 10);
        assert!(paginator(&page).is_empty());

        let page = Page::from_vec((0..25).collect::<Vec<_>>(), Some("2"), 10);
        let links = paginator(&page);
        assert!(links.contains(r#"<a href="?page=3">Next</a>"#));
        assert!(links.contains(r#"<span class="current">2</span>"#));
    }
}

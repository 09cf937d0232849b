//! Error pages.

use super::{Template, escape, layout};

pub fn not_found(detail: &str) -> String {
    layout(
        Template::NotFound,
        "Page not found",
        None,
        &format!(
            "<h1>Page not found</h1>\n<p>{}</p>\n<a href=\"/\">Back to the home page</a>",
            escape(detail)
        ),
    )
}

pub fn forbidden() -> String {
    layout(
        Template::Forbidden,
        "Access denied",
        None,
        "<h1>Access denied</h1>\n<p>You are not allowed to do this.</p>",
    )
}

pub fn server_error() -> String {
    layout(
        Template::ServerError,
        "Server error",
        None,
        "<h1>Server error</h1>\n<p>Something went wrong. Please try again later.</p>",
    )
}

//! Account pages.

use yatube_shared::errors::NON_FIELD_ERRORS;
use yatube_shared::{FormErrors, LoginForm, SignupForm};

use super::{Template, escape, form_errors, layout};

pub fn signup(form: &SignupForm, errors: &FormErrors) -> String {
    let content = format!(
        concat!(
            "<h1>Sign up</h1>\n",
            "{non_field}",
            "<form method=\"post\" action=\"/auth/signup/\">\n",
            "<label for=\"id_username\">Username</label>\n",
            "<input type=\"text\" name=\"username\" id=\"id_username\" value=\"{username}\" required>\n",
            "{username_errors}",
            "<label for=\"id_password\">Password</label>\n",
            "<input type=\"password\" name=\"password\" id=\"id_password\" required>\n",
            "{password_errors}",
            "<label for=\"id_password_confirm\">Password confirmation</label>\n",
            "<input type=\"password\" name=\"password_confirm\" id=\"id_password_confirm\" required>\n",
            "{confirm_errors}",
            "<button type=\"submit\">Sign up</button>\n",
            "</form>"
        ),
        non_field = form_errors(errors, NON_FIELD_ERRORS),
        username = escape(&form.username),
        username_errors = form_errors(errors, "username"),
        password_errors = form_errors(errors, "password"),
        confirm_errors = form_errors(errors, "password_confirm"),
    );
    layout(Template::Signup, "Sign up", None, &content)
}

pub fn login(form: &LoginForm, errors: &FormErrors) -> String {
    let next = form
        .next
        .as_deref()
        .map(|next| {
            format!(
                "<input type=\"hidden\" name=\"next\" value=\"{}\">\n",
                escape(next)
            )
        })
        .unwrap_or_default();

    let content = format!(
        concat!(
            "<h1>Log in</h1>\n",
            "{non_field}",
            "<form method=\"post\" action=\"/auth/login/\">\n",
            "{next}",
            "<label for=\"id_username\">Username</label>\n",
            "<input type=\"text\" name=\"username\" id=\"id_username\" value=\"{username}\" required>\n",
            "{username_errors}",
            "<label for=\"id_password\">Password</label>\n",
            "<input type=\"password\" name=\"password\" id=\"id_password\" required>\n",
            "{password_errors}",
            "<button type=\"submit\">Log in</button>\n",
            "</form>\n",
            "<a href=\"/auth/signup/\">Create an account</a>"
        ),
        non_field = form_errors(errors, NON_FIELD_ERRORS),
        next = next,
        username = escape(&form.username),
        username_errors = form_errors(errors, "username"),
        password_errors = form_errors(errors, "password"),
    );
    layout(Template::Login, "Log in", None, &content)
}

pub fn logged_out() -> String {
    layout(
        Template::LoggedOut,
        "Logged out",
        None,
        "<h1>You have been logged out</h1>\n<a href=\"/auth/login/\">Log in again</a>",
    )
}

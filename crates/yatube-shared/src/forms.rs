//! Form payloads posted by the HTML pages.
//!
//! Every form exposes `clean`, which normalizes the raw input (trimming,
//! blank-to-none), runs the `validator` rules plus the checks that cannot be
//! expressed as attributes, and either yields the cleaned values or a
//! [`FormErrors`] to redisplay next to the submitted input.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::errors::FormErrors;

const INVALID_CHOICE: &str = "Select a valid choice.";

fn blank_to_none(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Create/edit post form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PostForm {
    #[validate(length(min = 1, message = "This field is required."))]
    #[serde(default)]
    pub text: String,

    /// Group ID, blank for no group.
    #[serde(default)]
    pub group: Option<String>,

    /// Image reference (file name or stored path), blank to keep the current one.
    #[serde(default)]
    pub image: Option<String>,
}

/// Values of a valid [`PostForm`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedPost {
    pub text: String,
    pub group_id: Option<Uuid>,
    pub image: Option<String>,
}

impl PostForm {
    /// Form prefilled from an existing post.
    pub fn prefilled(text: &str, group_id: Option<Uuid>, image: Option<&str>) -> Self {
        Self {
            text: text.to_string(),
            group: group_id.map(|id| id.to_string()),
            image: image.map(str::to_string),
        }
    }

    /// Selected group as submitted, for re-rendering the choice list.
    pub fn selected_group(&self) -> Option<&str> {
        self.group.as_deref().map(str::trim).filter(|g| !g.is_empty())
    }

    pub fn clean(&self) -> Result<CleanedPost, FormErrors> {
        let normalized = Self {
            text: self.text.trim().to_string(),
            group: blank_to_none(self.group.as_deref()),
            image: blank_to_none(self.image.as_deref()),
        };

        let mut errors = match normalized.validate() {
            Ok(()) => FormErrors::new(),
            Err(e) => FormErrors::from(e),
        };

        let group_id = match normalized.group.as_deref().map(Uuid::parse_str) {
            None => None,
            Some(Ok(id)) => Some(id),
            Some(Err(_)) => {
                errors.add("group", INVALID_CHOICE);
                None
            }
        };

        errors.into_result()?;
        Ok(CleanedPost {
            text: normalized.text,
            group_id,
            image: normalized.image,
        })
    }
}

/// Comment form shown under a post.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CommentForm {
    #[validate(length(min = 1, message = "This field is required."))]
    #[serde(default)]
    pub text: String,
}

impl CommentForm {
    /// Trimmed comment text.
    pub fn clean(&self) -> Result<String, FormErrors> {
        let normalized = Self {
            text: self.text.trim().to_string(),
        };
        normalized.validate()?;
        Ok(normalized.text)
    }
}

/// Login form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LoginForm {
    #[validate(length(min = 1, message = "This field is required."))]
    #[serde(default)]
    pub username: String,

    #[validate(length(min = 1, message = "This field is required."))]
    #[serde(default)]
    pub password: String,

    /// Local path to return to after logging in.
    #[serde(default)]
    pub next: Option<String>,
}

impl LoginForm {
    pub fn clean(&self) -> Result<(String, String), FormErrors> {
        let normalized = Self {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
            next: None,
        };
        normalized.validate()?;
        Ok((normalized.username, normalized.password))
    }
}

/// Signup form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SignupForm {
    #[validate(length(
        min = 1,
        max = 150,
        message = "Enter a username of at most 150 characters."
    ))]
    #[serde(default)]
    pub username: String,

    #[validate(length(
        min = 8,
        max = 128,
        message = "Password must be at least 8 characters."
    ))]
    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub password_confirm: String,
}

impl SignupForm {
    /// Usernames may contain letters, digits and `@.+-_`.
    fn username_is_valid(username: &str) -> bool {
        username
            .chars()
            .all(|c| c.is_alphanumeric() || "@.+-_".contains(c))
    }

    pub fn clean(&self) -> Result<(String, String), FormErrors> {
        let normalized = Self {
            username: self.username.trim().to_string(),
            password: self.password.clone(),
            password_confirm: self.password_confirm.clone(),
        };

        let mut errors = match normalized.validate() {
            Ok(()) => FormErrors::new(),
            Err(e) => FormErrors::from(e),
        };

        if !Self::username_is_valid(&normalized.username) {
            errors.add(
                "username",
                "Username may contain only letters, digits and @/./+/-/_ characters.",
            );
        }
        if normalized.password != normalized.password_confirm {
            errors.add("password_confirm", "The two password fields didn't match.");
        }

        errors.into_result()?;
        Ok((normalized.username, normalized.password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_form_requires_text() {
        let form = PostForm {
            text: "   ".to_string(),
            ..Default::default()
        };
        let errors = form.clean().unwrap_err();
        assert_eq!(errors.get("text"), ["This field is required."]);
    }

    #[test]
    fn test_post_form_blank_group_and_image_are_none() {
        let form = PostForm {
            text: " Hello ".to_string(),
            group: Some(String::new()),
            image: Some("  ".to_string()),
        };
        let cleaned = form.clean().unwrap();
        assert_eq!(cleaned.text, "Hello");
        assert_eq!(cleaned.group_id, None);
        assert_eq!(cleaned.image, None);
    }

    #[test]
    fn test_post_form_rejects_malformed_group() {
        let form = PostForm {
            text: "Hello".to_string(),
            group: Some("not-a-uuid".to_string()),
            image: None,
        };
        let errors = form.clean().unwrap_err();
        assert_eq!(errors.get("group"), [INVALID_CHOICE]);
    }

    #[test]
    fn test_post_form_parses_group() {
        let group_id = Uuid::new_v4();
        let form = PostForm::prefilled("Hello", Some(group_id), Some("small.gif"));
        let cleaned = form.clean().unwrap();
        assert_eq!(cleaned.group_id, Some(group_id));
        assert_eq!(cleaned.image.as_deref(), Some("small.gif"));
    }

    #[test]
    fn test_comment_form() {
        assert_eq!(
            CommentForm {
                text: " nice ".to_string()
            }
            .clean()
            .unwrap(),
            "nice"
        );
        assert!(CommentForm::default().clean().is_err());
    }

    #[test]
    fn test_signup_form_checks() {
        let form = SignupForm {
            username: "bad name!".to_string(),
            password: "short".to_string(),
            password_confirm: "other".to_string(),
        };
        let errors = form.clean().unwrap_err();
        assert!(errors.has("username"));
        assert!(errors.has("password"));
        assert!(errors.has("password_confirm"));

        let form = SignupForm {
            username: "leo.tolstoy".to_string(),
            password: "war-and-peace".to_string(),
            password_confirm: "war-and-peace".to_string(),
        };
        assert_eq!(
            form.clean().unwrap(),
            ("leo.tolstoy".to_string(), "war-and-peace".to_string())
        );
    }

    #[test]
    fn test_login_form_requires_both_fields() {
        let errors = LoginForm::default().clean().unwrap_err();
        assert!(errors.has("username"));
        assert!(errors.has("password"));
    }
}

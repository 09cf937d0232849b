use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of characters used when a post is shown as a one-line label.
const SHORT_TEXT_LEN: usize = 15;

/// Directory prefix for stored post images.
const IMAGE_DIR: &str = "posts/";

/// Post entity - a user-authored text entry, optionally grouped and illustrated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub group_id: Option<Uuid>,
    pub image: Option<String>,
    pub pub_date: DateTime<Utc>,
}

impl Post {
    /// Create a new post published now.
    pub fn new(
        author_id: Uuid,
        text: String,
        group_id: Option<Uuid>,
        image: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            text,
            group_id,
            image: image.as_deref().and_then(Self::image_path),
            pub_date: Utc::now(),
        }
    }

    /// Apply an edit. A missing image keeps the current one.
    pub fn edit(&mut self, text: String, group_id: Option<Uuid>, image: Option<String>) {
        self.text = text;
        self.group_id = group_id;
        if let Some(path) = image.as_deref().and_then(Self::image_path) {
            self.image = Some(path);
        }
    }

    pub fn is_authored_by(&self, user_id: Uuid) -> bool {
        self.author_id == user_id
    }

    /// First characters of the text, used as the post's label.
    pub fn short_text(&self) -> String {
        self.text.chars().take(SHORT_TEXT_LEN).collect()
    }

    /// Normalize an image reference into its stored path under `posts/`.
    ///
    /// Only the file name of the reference is kept, so `small.gif`,
    /// `posts/small.gif` and `/tmp/upload/small.gif` all map to `posts/small.gif`.
    pub fn image_path(reference: &str) -> Option<String> {
        let name = reference
            .trim()
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default();
        if name.is_empty() {
            return None;
        }
        Some(format!("{IMAGE_DIR}{name}"))
    }
}

impl fmt::Display for Post {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_text())
    }
}

/// Selection of posts for a listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostFilter {
    /// Every post.
    All,
    /// Posts in a group.
    Group(Uuid),
    /// Posts written by a user.
    Author(Uuid),
    /// Posts by the authors a user follows.
    FollowedBy(Uuid),
}

//! # Yatube Shared
//!
//! Form payloads submitted by the HTML pages, their validation rules and the
//! error container used to redisplay a form with inline messages.

pub mod errors;
pub mod forms;

pub use errors::FormErrors;
pub use forms::{CleanedPost, CommentForm, LoginForm, PostForm, SignupForm};

//! Resource entities and the views procedures return.

pub mod post;
pub mod user;

pub use post::{AuthorSummary, NewPost, Post, PostView, Tag};
pub use user::{NewUser, Role, User};

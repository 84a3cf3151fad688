//! Wire-facing half of the blog: the records the API exchanges, validation of
//! its payloads, and the HTTP connection itself.

extern crate serde;
extern crate serde_json;

pub mod connection;
pub mod persisted;
pub mod query_result;

pub use connection::{Connection, ConnectionError, HttpConnection};
pub use persisted::{NewPost, Post, PostUpdate, ReactionName, Reactions, UnknownReaction, User};
pub use query_result::PayloadError;

pub const USER_AGENT: &str = concat!("blog_frontend/", env!("CARGO_PKG_VERSION"));

//! Read-side views over the store and the session.
//!
//! Everything here is a plain function of its arguments and is recomputed on
//! every call.

pub mod posts;
pub mod users;

pub use posts::{all_posts, can_edit, post_by_id, post_ids, posts_by_user, posts_error, posts_status};
pub use users::{all_users, author_name, current_user, user_by_id, UNKNOWN_AUTHOR};

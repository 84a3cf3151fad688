use blog_frontend::User;

use crate::fetcher::Resource;
use crate::session::Session;

pub const UNKNOWN_AUTHOR: &str = "Unknown Author";

pub fn all_users(users: &Resource<User>) -> Vec<&User> {
    users.store.get_all()
}

pub fn user_by_id<'a>(users: &'a Resource<User>, id: &str) -> Option<&'a User> {
    users.store.get_by_id(id)
}

/// The logged in user's record. `None` when nobody is logged in or the
/// username matches no loaded user.
pub fn current_user<'a>(users: &'a Resource<User>, session: &Session) -> Option<&'a User> {
    session.username().and_then(|username| user_by_id(users, username))
}

pub fn author_name<'a>(users: &'a Resource<User>, user_id: &str) -> &'a str {
    user_by_id(users, user_id)
        .map(|user| user.name.as_str())
        .unwrap_or(UNKNOWN_AUTHOR)
}

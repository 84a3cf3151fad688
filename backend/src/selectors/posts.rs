use blog_frontend::Post;

use crate::fetcher::Resource;
use crate::lifecycle::Status;
use crate::session::Session;

pub fn all_posts(posts: &Resource<Post>) -> Vec<&Post> {
    posts.store.get_all()
}

pub fn post_by_id<'a>(posts: &'a Resource<Post>, id: &str) -> Option<&'a Post> {
    posts.store.get_by_id(id)
}

pub fn post_ids(posts: &Resource<Post>) -> Vec<&str> {
    posts.store.ids()
}

/// Posts written by `user_id`, in the same order as [`all_posts`].
pub fn posts_by_user<'a>(posts: &'a Resource<Post>, user_id: &str) -> Vec<&'a Post> {
    all_posts(posts)
        .into_iter()
        .filter(|post| post.user == user_id)
        .collect()
}

pub fn posts_status(posts: &Resource<Post>) -> Status {
    posts.lifecycle.status()
}

pub fn posts_error(posts: &Resource<Post>) -> Option<&str> {
    posts.lifecycle.error()
}

/// Only the author may edit a post.
pub fn can_edit(session: &Session, post: &Post) -> bool {
    session.username() == Some(post.user.as_str())
}

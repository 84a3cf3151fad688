use std::cell::{Ref, RefCell};
use std::time::Duration;

use log::{debug, info};

use blog_frontend::{Connection, HttpConnection, NewPost, Post, PostUpdate, User};

use crate::config::Config;
use crate::error::Result;
use crate::fetcher::{self, Resource};
use crate::lifecycle::Status;
use crate::notifications::Notifications;
use crate::records::newest_first;
use crate::session::Session;

pub const NEW_POST_MESSAGE: &str = "New post added!";

/// Client-side state of the blog and the operations that change it.
///
/// All state is owned here and lives on one thread. Async operations never
/// hold a borrow across an `.await`, so they can run concurrently (for example
/// under `join`) and readers see intermediate states such as `Pending`.
pub struct Blog<C: Connection> {
    connection: C,
    posts: RefCell<Resource<Post>>,
    users: RefCell<Resource<User>>,
    session: RefCell<Session>,
    notifications: Notifications,
}

impl Blog<HttpConnection> {
    pub fn connect(config: &Config) -> Result<Self> {
        let connection = HttpConnection::new(&config.api_url)?;
        info!("using API at {}", connection.base());
        Ok(Blog::new(connection, config.notification_delay))
    }
}

impl<C: Connection> Blog<C> {
    pub fn new(connection: C, notification_delay: Duration) -> Self {
        Blog {
            connection,
            posts: RefCell::new(Resource::with_sort(newest_first)),
            users: RefCell::new(Resource::new()),
            session: RefCell::new(Session::new()),
            notifications: Notifications::new(notification_delay),
        }
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn posts(&self) -> Ref<'_, Resource<Post>> {
        self.posts.borrow()
    }

    pub fn users(&self) -> Ref<'_, Resource<User>> {
        self.users.borrow()
    }

    pub fn session(&self) -> Ref<'_, Session> {
        self.session.borrow()
    }

    pub fn notifications(&self) -> &Notifications {
        &self.notifications
    }

    /// Loads all posts unless they are loading or already loaded.
    pub async fn fetch_posts(&self) -> Status {
        fetcher::fetch_all(&self.posts, "posts", || self.connection.get_posts()).await
    }

    /// Loads the posts again once the previous load has settled. While a
    /// load is pending this does nothing.
    pub async fn refresh_posts(&self) -> Status {
        self.posts.borrow_mut().lifecycle.reset();
        self.fetch_posts().await
    }

    pub async fn fetch_users(&self) -> Status {
        fetcher::fetch_all(&self.users, "users", || self.connection.get_users()).await
    }

    /// Fetches one post and stores it. `Ok(None)` if the server has no such
    /// post; the store is left alone in that case.
    pub async fn fetch_post(&self, id: &str) -> Result<Option<Post>> {
        let post = self.connection.get_post(id).await?;
        match &post {
            Some(post) => {
                self.posts.borrow_mut().store.add_one(post.clone());
            }
            None => debug!("post {} not found", id),
        }
        Ok(post)
    }

    /// Creates a post on the server and stores the record it returns. Nothing
    /// is stored if the server rejects it. A successful create also marks the
    /// loaded posts as out of date, so the next `fetch_posts` reloads them.
    pub async fn create_post(&self, new_post: NewPost) -> Result<Post> {
        let post = fetcher::create_one(&self.posts, self.connection.add_post(&new_post)).await?;
        info!("created post {} by {}", post.id, post.user);
        self.posts.borrow_mut().invalidate();
        self.notifications.show(NEW_POST_MESSAGE);
        Ok(post)
    }

    /// Edits a post locally. Returns false if the post is unknown.
    pub fn update_post(&self, id: &str, changes: PostUpdate) -> bool {
        self.posts.borrow_mut().store.update_one(id, changes)
    }

    /// Adds one to `reaction` (a wire name such as `thumbsUp`) on a post.
    /// Returns false if the post or the reaction is unknown.
    pub fn add_reaction(&self, post_id: &str, reaction: &str) -> bool {
        self.posts
            .borrow_mut()
            .store
            .increment_counter(post_id, reaction)
    }

    pub async fn login(&self, username: &str) -> Result<()> {
        self.connection.login(username).await?;
        self.session.borrow_mut().log_in(username);
        info!("logged in as {}", username);
        Ok(())
    }

    /// Logs out and forgets the loaded posts, so the next reader loads them
    /// afresh.
    pub async fn logout(&self) -> Result<()> {
        self.connection.logout().await?;
        self.session.borrow_mut().log_out();
        self.posts.borrow_mut().clear();
        info!("logged out");
        Ok(())
    }
}

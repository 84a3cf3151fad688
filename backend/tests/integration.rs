extern crate blog_frontend;
extern crate blog_store;
extern crate futures_util;
extern crate tokio;

use std::cell::{Cell, RefCell};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::future::{join, join3};
use futures_util::FutureExt;
use reqwest::StatusCode;
use tokio::sync::Notify;
use url::Url;

use blog_frontend::{Connection, ConnectionError, NewPost, Post, PostUpdate, Reactions, User};
use blog_store::selectors;
use blog_store::{Blog, Error, Status};

const DELAY: Duration = Duration::from_secs(5);

fn status_error(path: &str, status: StatusCode) -> ConnectionError {
    ConnectionError::Status {
        url: Url::parse("http://localhost:3000/fakeApi/")
            .unwrap()
            .join(path)
            .unwrap(),
        status,
    }
}

fn post(id: &str, user: &str, date: &str) -> Post {
    Post {
        id: id.into(),
        title: format!("Post {}", id),
        content: format!("Content of post {}", id),
        user: user.into(),
        date: date.into(),
        reactions: Reactions::default(),
    }
}

fn user(id: &str, name: &str) -> User {
    User {
        id: id.into(),
        name: name.into(),
    }
}

/// Answers from canned data and counts what it was asked.
#[derive(Default)]
struct ScriptedConnection {
    posts: RefCell<Vec<Post>>,
    posts_status: Cell<Option<StatusCode>>,
    users: Vec<User>,
    created: RefCell<Option<Post>>,
    gate: Option<Notify>,
    get_posts_calls: Cell<usize>,
    add_post_calls: Cell<usize>,
}

impl ScriptedConnection {
    fn with_posts(posts: Vec<Post>) -> Self {
        ScriptedConnection {
            posts: RefCell::new(posts),
            users: vec![user("0", "Tianna Jenkins"), user("2", "Kevin Grant")],
            ..ScriptedConnection::default()
        }
    }

    fn gated(mut self) -> Self {
        self.gate = Some(Notify::new());
        self
    }

    fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }
}

#[async_trait(?Send)]
impl Connection for ScriptedConnection {
    async fn get_posts(&self) -> Result<Vec<Post>, ConnectionError> {
        self.get_posts_calls.set(self.get_posts_calls.get() + 1);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match self.posts_status.get() {
            Some(status) => Err(status_error("posts", status)),
            None => Ok(self.posts.borrow().clone()),
        }
    }

    async fn get_post(&self, id: &str) -> Result<Option<Post>, ConnectionError> {
        Ok(self.posts.borrow().iter().find(|post| post.id == id).cloned())
    }

    async fn get_users(&self) -> Result<Vec<User>, ConnectionError> {
        Ok(self.users.clone())
    }

    async fn add_post(&self, new_post: &NewPost) -> Result<Post, ConnectionError> {
        self.add_post_calls.set(self.add_post_calls.get() + 1);
        match self.created.borrow().clone() {
            Some(post) => {
                assert_eq!(post.title, new_post.title);
                Ok(post)
            }
            None => Err(status_error("posts", StatusCode::INTERNAL_SERVER_ERROR)),
        }
    }

    async fn login(&self, _username: &str) -> Result<(), ConnectionError> {
        Ok(())
    }

    async fn logout(&self) -> Result<(), ConnectionError> {
        Ok(())
    }
}

fn ids(blog: &Blog<ScriptedConnection>) -> Vec<String> {
    selectors::post_ids(&blog.posts())
        .into_iter()
        .map(str::to_owned)
        .collect()
}

#[tokio::test]
async fn fetch_orders_posts_newest_first() {
    blog_store::init_logger();
    let blog = Blog::new(
        ScriptedConnection::with_posts(vec![
            post("1", "0", "2024-01-01T00:00:00Z"),
            post("2", "0", "2024-01-02T00:00:00Z"),
        ]),
        DELAY,
    );
    assert_eq!(selectors::posts_status(&blog.posts()), Status::Idle);

    assert_eq!(blog.fetch_posts().await, Status::Succeeded);

    assert_eq!(ids(&blog), vec!["2", "1"]);
    assert_eq!(selectors::posts_status(&blog.posts()), Status::Succeeded);
}

#[tokio::test]
async fn concurrent_fetches_issue_one_request() {
    let blog = Blog::new(
        ScriptedConnection::with_posts(vec![post("1", "0", "2024-01-01T00:00:00Z")]).gated(),
        DELAY,
    );

    let (first, second, ()) = join3(blog.fetch_posts(), blog.fetch_posts(), async {
        // the first fetch is parked on the gate
        assert_eq!(selectors::posts_status(&blog.posts()), Status::Pending);
        assert!(blog.posts().store.is_empty());
        blog.connection().release();
    })
    .await;

    assert_eq!(first, Status::Succeeded);
    assert_eq!(second, Status::Pending);
    assert_eq!(blog.connection().get_posts_calls.get(), 1);
    assert_eq!(ids(&blog), vec!["1"]);
}

#[tokio::test]
async fn settled_fetch_is_not_repeated_until_refresh() {
    let blog = Blog::new(
        ScriptedConnection::with_posts(vec![post("1", "0", "2024-01-01T00:00:00Z")]),
        DELAY,
    );
    blog.fetch_posts().await;

    blog.connection()
        .posts
        .borrow_mut()
        .push(post("3", "2", "2024-02-01T00:00:00Z"));
    assert_eq!(blog.fetch_posts().await, Status::Succeeded);
    assert_eq!(blog.connection().get_posts_calls.get(), 1);
    assert_eq!(ids(&blog), vec!["1"]);

    assert_eq!(blog.refresh_posts().await, Status::Succeeded);
    assert_eq!(blog.connection().get_posts_calls.get(), 2);
    assert_eq!(ids(&blog), vec!["3", "1"]);
}

#[tokio::test]
async fn failed_fetch_records_the_error() {
    let connection = ScriptedConnection::with_posts(vec![post("1", "0", "2024-01-01T00:00:00Z")]);
    connection.posts_status.set(Some(StatusCode::SERVICE_UNAVAILABLE));
    let blog = Blog::new(connection, DELAY);

    assert_eq!(blog.fetch_posts().await, Status::Failed);
    {
        let posts = blog.posts();
        assert!(posts.store.is_empty());
        let message = selectors::posts_error(&posts).unwrap();
        assert!(message.contains("503"), "unexpected message {:?}", message);
    }

    // no retry on its own
    assert_eq!(blog.fetch_posts().await, Status::Failed);
    assert_eq!(blog.connection().get_posts_calls.get(), 1);

    blog.connection().posts_status.set(None);
    assert_eq!(blog.refresh_posts().await, Status::Succeeded);
    assert_eq!(selectors::posts_error(&blog.posts()), None);
    assert_eq!(ids(&blog), vec!["1"]);
}

#[tokio::test(start_paused = true)]
async fn created_post_is_stored_as_the_server_returned_it() {
    let blog = Blog::new(ScriptedConnection::with_posts(vec![]), DELAY);
    blog.fetch_posts().await;

    let created = Post {
        id: "9".into(),
        title: "T".into(),
        content: "C".into(),
        user: "0".into(),
        date: "2024-03-01T12:00:00.000Z".into(),
        reactions: Reactions::default(),
    };
    *blog.connection().created.borrow_mut() = Some(created.clone());

    let post = blog.create_post(NewPost::new("T", "C", "0")).await.unwrap();

    assert_eq!(post, created);
    assert_eq!(selectors::post_by_id(&blog.posts(), "9"), Some(&created));

    let shown: Vec<String> = blog
        .notifications()
        .active()
        .into_iter()
        .map(|n| n.message)
        .collect();
    assert_eq!(shown, vec![blog_store::blog::NEW_POST_MESSAGE.to_owned()]);

    tokio::time::sleep(DELAY + Duration::from_millis(1)).await;
    assert!(blog.notifications().active().is_empty());
    assert_eq!(selectors::all_posts(&blog.posts()).len(), 1);
}

#[tokio::test]
async fn create_marks_loaded_posts_for_reload() {
    let blog = Blog::new(
        ScriptedConnection::with_posts(vec![post("1", "0", "2024-01-01T00:00:00Z")]),
        DELAY,
    );
    assert_eq!(blog.fetch_posts().await, Status::Succeeded);

    let created = post("9", "0", "2024-03-01T00:00:00Z");
    *blog.connection().created.borrow_mut() = Some(created.clone());
    blog.connection().posts.borrow_mut().push(created);
    blog.create_post(NewPost::new("Post 9", "C", "0")).await.unwrap();

    // readable right away, reloaded on the next fetch
    assert_eq!(ids(&blog), vec!["9", "1"]);
    assert_eq!(selectors::posts_status(&blog.posts()), Status::Idle);

    assert_eq!(blog.fetch_posts().await, Status::Succeeded);
    assert_eq!(blog.connection().get_posts_calls.get(), 2);
    assert_eq!(ids(&blog), vec!["9", "1"]);
}

#[test]
fn create_succeeds_outside_a_tokio_runtime() {
    let blog = Blog::new(ScriptedConnection::with_posts(vec![]), DELAY);
    *blog.connection().created.borrow_mut() = Some(post("9", "0", "2024-01-01T00:00:00Z"));

    let created = blog
        .create_post(NewPost::new("Post 9", "C", "0"))
        .now_or_never()
        .expect("the scripted connection answers at once");

    assert_eq!(created.unwrap().id, "9");
    assert_eq!(ids(&blog), vec!["9"]);
    assert!(blog.notifications().active().is_empty());
}

#[tokio::test]
async fn failed_create_leaves_no_phantom_post() {
    let blog = Blog::new(
        ScriptedConnection::with_posts(vec![post("1", "0", "2024-01-01T00:00:00Z")]),
        DELAY,
    );
    blog.fetch_posts().await;

    let err = blog
        .create_post(NewPost::new("T", "C", "0"))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Connection(ConnectionError::Status {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            ..
        })
    ));
    assert_eq!(blog.connection().add_post_calls.get(), 1);
    assert_eq!(selectors::all_posts(&blog.posts()).len(), 1);
    assert!(blog.notifications().active().is_empty());
}

#[tokio::test]
async fn creates_are_not_deduplicated() {
    let blog = Blog::new(ScriptedConnection::with_posts(vec![]), DELAY);
    *blog.connection().created.borrow_mut() = Some(post("9", "0", "2024-01-01T00:00:00Z"));

    let (first, second) = join(
        blog.create_post(NewPost::new("Post 9", "C", "0")),
        blog.create_post(NewPost::new("Post 9", "C", "0")),
    )
    .await;

    assert!(first.is_ok() && second.is_ok());
    assert_eq!(blog.connection().add_post_calls.get(), 2);
    // same canonical record twice: last write wins, one entry
    assert_eq!(ids(&blog), vec!["9"]);
}

#[tokio::test]
async fn posts_by_author_keep_store_order() {
    let blog = Blog::new(
        ScriptedConnection::with_posts(vec![
            post("1", "0", "2024-01-01T00:00:00Z"),
            post("2", "2", "2024-01-02T00:00:00Z"),
            post("3", "0", "2024-01-03T00:00:00Z"),
            post("4", "2", "2024-01-04T00:00:00Z"),
        ]),
        DELAY,
    );
    join(blog.fetch_posts(), blog.fetch_users()).await;

    let posts = blog.posts();
    let by_two: Vec<&str> = selectors::posts_by_user(&posts, "2")
        .into_iter()
        .map(|post| post.id.as_str())
        .collect();
    assert_eq!(by_two, vec!["4", "2"]);

    let users = blog.users();
    assert_eq!(selectors::author_name(&users, "2"), "Kevin Grant");
    assert_eq!(selectors::author_name(&users, "5"), selectors::UNKNOWN_AUTHOR);
}

#[tokio::test]
async fn edits_and_reactions_touch_one_post() {
    let blog = Blog::new(
        ScriptedConnection::with_posts(vec![
            post("1", "0", "2024-01-01T00:00:00Z"),
            post("2", "2", "2024-01-02T00:00:00Z"),
        ]),
        DELAY,
    );
    blog.fetch_posts().await;
    let untouched = selectors::post_by_id(&blog.posts(), "2").cloned();

    for _ in 0..3 {
        assert!(blog.add_reaction("1", "heart"));
    }
    assert!(!blog.add_reaction("1", "confetti"));
    assert!(!blog.add_reaction("missing", "heart"));
    assert!(blog.update_post("1", PostUpdate::new("Edited", "New content")));
    assert!(!blog.update_post("missing", PostUpdate::new("Edited", "New content")));

    let posts = blog.posts();
    let edited = selectors::post_by_id(&posts, "1").unwrap();
    assert_eq!(edited.title, "Edited");
    assert_eq!(edited.content, "New content");
    assert_eq!(edited.date, "2024-01-01T00:00:00Z");
    assert_eq!(
        edited.reactions,
        Reactions {
            heart: 3,
            ..Reactions::default()
        }
    );
    assert_eq!(selectors::post_by_id(&posts, "2").cloned(), untouched);
}

#[tokio::test]
async fn single_post_fetch_upserts_or_reports_absence() {
    let blog = Blog::new(
        ScriptedConnection::with_posts(vec![post("1", "0", "2024-01-01T00:00:00Z")]),
        DELAY,
    );

    assert_eq!(blog.fetch_post("missing").await.unwrap(), None);
    assert!(blog.posts().store.is_empty());

    let fetched = blog.fetch_post("1").await.unwrap();
    assert_eq!(fetched.as_ref().map(|p| p.id.as_str()), Some("1"));
    assert_eq!(ids(&blog), vec!["1"]);
    // a single post does not count as loading the collection
    assert_eq!(selectors::posts_status(&blog.posts()), Status::Idle);
}

#[tokio::test]
async fn session_drives_current_user_and_logout_resets_posts() {
    let blog = Blog::new(
        ScriptedConnection::with_posts(vec![post("1", "2", "2024-01-01T00:00:00Z")]),
        DELAY,
    );
    join(blog.fetch_posts(), blog.fetch_users()).await;
    assert_eq!(selectors::current_user(&blog.users(), &blog.session()), None);

    blog.login("2").await.unwrap();
    assert_eq!(
        selectors::current_user(&blog.users(), &blog.session()).map(|u| u.name.clone()),
        Some("Kevin Grant".to_owned())
    );
    {
        let posts = blog.posts();
        let post = selectors::post_by_id(&posts, "1").unwrap();
        assert!(selectors::can_edit(&blog.session(), post));
    }

    blog.logout().await.unwrap();
    assert!(!blog.session().is_authenticated());
    assert!(blog.posts().store.is_empty());
    assert_eq!(selectors::posts_status(&blog.posts()), Status::Idle);
    // users are not tied to the session
    assert_eq!(selectors::all_users(&blog.users()).len(), 2);

    assert_eq!(blog.fetch_posts().await, Status::Succeeded);
    assert_eq!(blog.connection().get_posts_calls.get(), 2);
}

#[tokio::test]
async fn logout_during_fetch_discards_the_response() {
    let blog = Blog::new(
        ScriptedConnection::with_posts(vec![post("1", "0", "2024-01-01T00:00:00Z")]).gated(),
        DELAY,
    );

    let (status, ()) = join(blog.fetch_posts(), async {
        blog.logout().await.unwrap();
        blog.connection().release();
    })
    .await;

    assert_eq!(status, Status::Idle);
    assert!(blog.posts().store.is_empty());
}

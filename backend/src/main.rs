extern crate blog_store;
extern crate clap;
extern crate futures_util;
extern crate tokio;

use std::path::PathBuf;

use clap::Parser;
use futures_util::future;
use log::error;

use blog_store::selectors;
use blog_store::{Blog, Config, Status};

/// Loads the blog from its API and prints the posts, newest first.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// API base url; overrides the configuration and BLOG_API_URL
    #[arg(long)]
    api_url: Option<String>,
    /// Log in as this user first
    #[arg(short, long)]
    user: Option<String>,
    /// Only list posts by this author id
    #[arg(short, long)]
    author: Option<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), blog_store::Error> {
    blog_store::init_logger();
    let args = Args::parse();

    let config = Config::load(args.config.as_deref())?.with_api_url_override(args.api_url);
    let blog = Blog::connect(&config)?;

    if let Some(user) = &args.user {
        blog.login(user).await?;
    }

    let (posts_status, users_status) = future::join(blog.fetch_posts(), blog.fetch_users()).await;
    if users_status == Status::Failed {
        error!(
            "could not load users: {}",
            blog.users().lifecycle.error().unwrap_or_default()
        );
    }
    if posts_status == Status::Failed {
        return Err(blog_store::Error::Load {
            what: "posts",
            message: selectors::posts_error(&blog.posts())
                .unwrap_or_default()
                .to_owned(),
        });
    }

    let posts = blog.posts();
    let users = blog.users();
    let session = blog.session();
    if let Some(user) = selectors::current_user(&users, &session) {
        println!("Logged in as {}", user.name);
    }

    let listed = match &args.author {
        Some(author) => selectors::posts_by_user(&posts, author),
        None => selectors::all_posts(&posts),
    };
    for post in listed {
        let edit_marker = if selectors::can_edit(&session, post) { " (yours)" } else { "" };
        println!("{}  {}{}", post.date, post.title, edit_marker);
        println!("    by {}", selectors::author_name(&users, &post.user));
        let reactions = &post.reactions;
        println!(
            "    thumbsUp {}  tada {}  heart {}  rocket {}  eyes {}",
            reactions.thumbs_up, reactions.tada, reactions.heart, reactions.rocket, reactions.eyes
        );
    }

    Ok(())
}

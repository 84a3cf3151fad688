extern crate blog_frontend;
extern crate env_logger;
extern crate log;

pub mod blog;
pub mod config;
pub mod entity_store;
pub mod error;
pub mod fetcher;
pub mod lifecycle;
pub mod notifications;
pub mod records;
pub mod selectors;
pub mod session;

pub use blog::Blog;
pub use config::Config;
pub use error::{Error, Result};
pub use lifecycle::Status;

use std::io::Write;

/// Logs to stderr, filtered by `RUST_LOG`. Calling it again is harmless.
pub fn init_logger() {
    let _ = env_logger::builder()
        .format(|buf, record| writeln!(buf, "[{}] {}", record.level(), record.args()))
        .try_init();
}

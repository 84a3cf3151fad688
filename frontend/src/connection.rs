use async_trait::async_trait;
use log::debug;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use url::Url;

use crate::persisted::{NewPost, Post, User};
use crate::query_result::{self, PayloadError};
use crate::USER_AGENT;

#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("invalid API url {url:?}: {source}")]
    Url { url: String, source: url::ParseError },
    #[error("API url {url:?} cannot carry a path")]
    NotABase { url: String },
    #[error("failed to build the HTTP client: {0}")]
    Client(reqwest::Error),
    #[error("request to {url} failed: {source}")]
    Transport { url: Url, source: reqwest::Error },
    #[error("{url} answered with status {status}")]
    Status { url: Url, status: StatusCode },
    #[error(transparent)]
    Payload(#[from] PayloadError),
}

/// The REST API the blog talks to.
///
/// Futures are not `Send`: the store lives on a single thread and so do the
/// requests it issues.
#[async_trait(?Send)]
pub trait Connection {
    /// `GET /posts`
    async fn get_posts(&self) -> Result<Vec<Post>, ConnectionError>;
    /// `GET /posts/{id}`; `None` when the server does not know the post.
    async fn get_post(&self, id: &str) -> Result<Option<Post>, ConnectionError>;
    /// `GET /users`
    async fn get_users(&self) -> Result<Vec<User>, ConnectionError>;
    /// `POST /posts`; returns the record as the server stored it.
    async fn add_post(&self, new_post: &NewPost) -> Result<Post, ConnectionError>;
    /// `POST /login`
    async fn login(&self, username: &str) -> Result<(), ConnectionError>;
    /// `POST /logout`
    async fn logout(&self) -> Result<(), ConnectionError>;
}

/// [`Connection`] over HTTP, rooted at a base url such as
/// `http://localhost:3000/fakeApi`.
#[derive(Clone, Debug)]
pub struct HttpConnection {
    client: Client,
    base: Url,
}

impl HttpConnection {
    pub fn new(api_url: &str) -> Result<Self, ConnectionError> {
        let base = Url::parse(api_url).map_err(|source| ConnectionError::Url {
            url: api_url.to_owned(),
            source,
        })?;
        if base.cannot_be_a_base() {
            return Err(ConnectionError::NotABase {
                url: api_url.to_owned(),
            });
        }
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(ConnectionError::Client)?;

        Ok(HttpConnection { client, base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        // checked in `new`
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(&self, request: reqwest::RequestBuilder, url: Url) -> Result<Option<Vec<u8>>, ConnectionError> {
        let response = request.send().await.map_err(|source| ConnectionError::Transport {
            url: url.clone(),
            source,
        })?;

        let status = response.status();
        debug!("{} -> {}", url, status);
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ConnectionError::Status { url, status });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| ConnectionError::Transport {
                url: url.clone(),
                source,
            })?;
        Ok(Some(body.to_vec()))
    }

    async fn get(&self, segments: &[&str]) -> Result<Option<Vec<u8>>, ConnectionError> {
        let url = self.endpoint(segments);
        debug!("GET {}", url);
        self.send(self.client.get(url.clone()), url).await
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<Option<Vec<u8>>, ConnectionError> {
        let url = self.endpoint(segments);
        debug!("POST {}", url);
        self.send(self.client.post(url.clone()).json(body), url).await
    }

    fn expect_found(
        &self,
        segments: &[&str],
        response: Option<Vec<u8>>,
    ) -> Result<Vec<u8>, ConnectionError> {
        response.ok_or_else(|| ConnectionError::Status {
            url: self.endpoint(segments),
            status: StatusCode::NOT_FOUND,
        })
    }
}

#[async_trait(?Send)]
impl Connection for HttpConnection {
    async fn get_posts(&self) -> Result<Vec<Post>, ConnectionError> {
        let body = self.get(&["posts"]).await?;
        let body = self.expect_found(&["posts"], body)?;
        Ok(query_result::parse_posts(query_result::decode(&body)?)?)
    }

    async fn get_post(&self, id: &str) -> Result<Option<Post>, ConnectionError> {
        match self.get(&["posts", id]).await? {
            Some(body) => Ok(Some(query_result::parse_post(query_result::decode(&body)?)?)),
            None => Ok(None),
        }
    }

    async fn get_users(&self) -> Result<Vec<User>, ConnectionError> {
        let body = self.get(&["users"]).await?;
        let body = self.expect_found(&["users"], body)?;
        Ok(query_result::parse_users(query_result::decode(&body)?)?)
    }

    async fn add_post(&self, new_post: &NewPost) -> Result<Post, ConnectionError> {
        let body = self.post(&["posts"], new_post).await?;
        let body = self.expect_found(&["posts"], body)?;
        Ok(query_result::parse_post(query_result::decode(&body)?)?)
    }

    // acknowledgements may be plain text, so their bodies are not decoded
    async fn login(&self, username: &str) -> Result<(), ConnectionError> {
        let body = self.post(&["login"], &json!({ "username": username })).await?;
        self.expect_found(&["login"], body).map(|_| ())
    }

    async fn logout(&self) -> Result<(), ConnectionError> {
        let body = self.post(&["logout"], &json!({})).await?;
        self.expect_found(&["logout"], body).map(|_| ())
    }
}

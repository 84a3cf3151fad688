//! Validation of API payloads.
//!
//! Responses arrive as loosely typed JSON. Everything that reaches the store
//! goes through one of the `parse_*` functions first, so a malformed record is
//! reported here instead of being stored.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::persisted::{Post, User};

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("response body is not JSON: {0}")]
    Json(serde_json::Error),
    #[error("expected an array of {what}, got {found}")]
    NotAnArray { what: &'static str, found: &'static str },
    #[error("malformed {what} at index {index}: {source}")]
    Shape {
        what: &'static str,
        index: usize,
        source: serde_json::Error,
    },
    #[error("{what} at index {index} has an empty id")]
    EmptyId { what: &'static str, index: usize },
    #[error("post {id} has a date that is not ISO-8601: {date:?}")]
    Date { id: String, date: String },
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn parse_record<T: DeserializeOwned>(
    what: &'static str,
    index: usize,
    value: Value,
) -> Result<T, PayloadError> {
    serde_json::from_value(value).map_err(|source| PayloadError::Shape {
        what,
        index,
        source,
    })
}

fn parse_array<T, F>(what: &'static str, value: Value, parse_one: F) -> Result<Vec<T>, PayloadError>
where
    F: Fn(usize, Value) -> Result<T, PayloadError>,
{
    match value {
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, item)| parse_one(index, item))
            .collect(),
        other => Err(PayloadError::NotAnArray {
            what,
            found: kind(&other),
        }),
    }
}

/// Decodes a response body. An empty body is `null`.
pub fn decode(body: &[u8]) -> Result<Value, PayloadError> {
    if body.is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(PayloadError::Json)
}

fn check_post(index: usize, mut post: Post) -> Result<Post, PayloadError> {
    if post.id.is_empty() {
        return Err(PayloadError::EmptyId { what: "post", index });
    }
    // stored in UTC with millisecond precision, so dates order as strings
    match DateTime::parse_from_rfc3339(&post.date) {
        Ok(date) => {
            post.date = date
                .with_timezone(&Utc)
                .to_rfc3339_opts(SecondsFormat::Millis, true);
            Ok(post)
        }
        Err(_) => Err(PayloadError::Date {
            id: post.id,
            date: post.date,
        }),
    }
}

fn parse_post_at(index: usize, value: Value) -> Result<Post, PayloadError> {
    check_post(index, parse_record("post", index, value)?)
}

fn parse_user_at(index: usize, value: Value) -> Result<User, PayloadError> {
    let user: User = parse_record("user", index, value)?;
    if user.id.is_empty() {
        return Err(PayloadError::EmptyId { what: "user", index });
    }
    Ok(user)
}

/// `GET /posts`
pub fn parse_posts(value: Value) -> Result<Vec<Post>, PayloadError> {
    parse_array("posts", value, parse_post_at)
}

/// `GET /posts/{id}` and `POST /posts`
pub fn parse_post(value: Value) -> Result<Post, PayloadError> {
    parse_post_at(0, value)
}

/// `GET /users`
pub fn parse_users(value: Value) -> Result<Vec<User>, PayloadError> {
    parse_array("users", value, parse_user_at)
}

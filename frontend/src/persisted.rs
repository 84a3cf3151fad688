use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Reaction counters attached to every post. Missing counters read as zero.
#[derive(Hash, Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct Reactions {
    pub thumbs_up: u32,
    pub tada: u32,
    pub heart: u32,
    pub rocket: u32,
    pub eyes: u32,
}

impl Reactions {
    pub fn get(&self, reaction: ReactionName) -> u32 {
        match reaction {
            ReactionName::ThumbsUp => self.thumbs_up,
            ReactionName::Tada => self.tada,
            ReactionName::Heart => self.heart,
            ReactionName::Rocket => self.rocket,
            ReactionName::Eyes => self.eyes,
        }
    }

    pub fn get_mut(&mut self, reaction: ReactionName) -> &mut u32 {
        match reaction {
            ReactionName::ThumbsUp => &mut self.thumbs_up,
            ReactionName::Tada => &mut self.tada,
            ReactionName::Heart => &mut self.heart,
            ReactionName::Rocket => &mut self.rocket,
            ReactionName::Eyes => &mut self.eyes,
        }
    }
}

#[derive(Hash, Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "camelCase")]
pub enum ReactionName {
    ThumbsUp,
    Tada,
    Heart,
    Rocket,
    Eyes,
}

impl ReactionName {
    pub const ALL: [ReactionName; 5] = [
        ReactionName::ThumbsUp,
        ReactionName::Tada,
        ReactionName::Heart,
        ReactionName::Rocket,
        ReactionName::Eyes,
    ];

    /// The name used on the wire, e.g. `thumbsUp`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionName::ThumbsUp => "thumbsUp",
            ReactionName::Tada => "tada",
            ReactionName::Heart => "heart",
            ReactionName::Rocket => "rocket",
            ReactionName::Eyes => "eyes",
        }
    }
}

impl fmt::Display for ReactionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown reaction {0:?}")]
pub struct UnknownReaction(pub String);

impl FromStr for ReactionName {
    type Err = UnknownReaction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ReactionName::ALL
            .into_iter()
            .find(|reaction| reaction.as_str() == s)
            .ok_or_else(|| UnknownReaction(s.to_owned()))
    }
}

/// A blog post as the API returns it. `date` is an RFC 3339 timestamp kept as
/// the server sent it; ordering compares it as a plain string.
#[derive(Hash, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Post {
    pub id: String,
    pub title: String,
    pub content: String,
    pub user: String,
    pub date: String,
    #[serde(default)]
    pub reactions: Reactions,
}

#[derive(Hash, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct User {
    pub id: String,
    pub name: String,
}

/// Body of `POST /posts`. The server fills in id, date and reactions.
#[derive(Hash, Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub user: String,
}

impl NewPost {
    pub fn new(title: impl Into<String>, content: impl Into<String>, user: impl Into<String>) -> Self {
        NewPost {
            title: title.into(),
            content: content.into(),
            user: user.into(),
        }
    }
}

/// Fields of a post the editor may change. `None` leaves the field alone.
#[derive(Hash, Clone, Debug, Default, PartialEq, Eq)]
pub struct PostUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl PostUpdate {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        PostUpdate {
            title: Some(title.into()),
            content: Some(content.into()),
        }
    }
}

//! Store behaviour of the blog's records.

use std::cmp::Ordering;

use blog_frontend::{Post, PostUpdate, ReactionName, User};

use crate::entity_store::{Counters, Entity, Patch};

impl Entity for Post {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Entity for User {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Counters for Post {
    fn counter_mut(&mut self, name: &str) -> Option<&mut u32> {
        let reaction: ReactionName = name.parse().ok()?;
        Some(self.reactions.get_mut(reaction))
    }
}

impl Patch<Post> for PostUpdate {
    fn apply(self, target: &mut Post) {
        if let Some(title) = self.title {
            target.title = title;
        }
        if let Some(content) = self.content {
            target.content = content;
        }
    }
}

/// Newest post first. Dates arrive normalized to UTC with millisecond
/// precision, so comparing the strings compares the instants.
pub fn newest_first(a: &Post, b: &Post) -> Ordering {
    b.date.cmp(&a.date)
}

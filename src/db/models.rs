use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, FromRow)]
pub struct Post {
    pub id: i32,
    pub title: String,
}

/// Title of the `n`th seeded post.
pub fn seed_title(n: usize) -> String {
    format!("Blog post #{n}")
}

/// Titles inserted by the startup seed, in insertion order.
pub fn seed_titles(count: usize) -> Vec<String> {
    (0..count).map(seed_title).collect()
}

use serde::{Deserialize, Serialize};

/// A named mood label, shared across movies
///
/// Mood names are globally unique. Rows come from the startup seeding pass or
/// are created lazily when a movie is tagged with a name not yet present;
/// they are never deleted by normal operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Mood {
    pub id: i32,
    #[sqlx(rename = "mood_name")]
    pub name: String,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single review attached to a movie
///
/// Reviews are ordered by insertion; deleting the parent movie deletes its
/// reviews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Review {
    pub id: i32,
    pub movie_id: i32,
    pub review: String,
    pub created_at: DateTime<Utc>,
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Review;

/// A movie row as stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Movie {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A movie hydrated with its mood names and reviews
///
/// This is the shape the recommendation engine scores over: mood names in
/// attachment order, reviews in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieWithRelations {
    #[serde(flatten)]
    pub movie: Movie,
    pub moods: Vec<String>,
    pub reviews: Vec<Review>,
}

impl MovieWithRelations {
    /// Text of the first (earliest) review, if any
    pub fn first_review(&self) -> Option<&str> {
        self.reviews.first().map(|r| r.review.as_str())
    }
}

/// Input for creating a movie together with its moods and initial review
#[derive(Debug, Clone)]
pub struct NewMovie {
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub mood_names: Vec<String>,
    pub initial_review: String,
}

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::error::AppResult;
use crate::models::{Mood, MovieWithRelations, NewMovie, Review};

pub use memory::InMemoryMovieRepository;
pub use postgres::{create_pool, PgMovieRepository};

/// Persistence seam for movies, moods and reviews
///
/// The HTTP layer only sees this trait; production wires in
/// [`PgMovieRepository`], tests the in-memory implementation.
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// All moods, ordered by name
    async fn list_moods(&self) -> AppResult<Vec<Mood>>;

    /// Insert each name that is not yet present; insert-or-ignore, safe to
    /// run repeatedly and concurrently with movie creation
    async fn seed_moods(&self, names: &[&str]) -> AppResult<()>;

    /// Create a movie, attach its moods (reusing or creating mood rows by
    /// exact name) and its initial review, and return the hydrated result
    async fn create_movie(&self, new_movie: NewMovie) -> AppResult<MovieWithRelations>;

    /// Case-insensitive title substring search, newest first
    async fn find_by_title(&self, query: &str) -> AppResult<Vec<MovieWithRelations>>;

    /// Every movie with its moods and reviews, ordered by movie id
    async fn fetch_all_with_relations(&self) -> AppResult<Vec<MovieWithRelations>>;

    /// Attach a review to an existing movie; `NotFound` for an unknown id
    async fn add_review(&self, movie_id: i32, review_text: &str) -> AppResult<Review>;
}

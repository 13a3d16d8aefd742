use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{AppError, AppResult};
use crate::models::{Mood, Movie, MovieWithRelations, NewMovie, Review};

use super::MovieRepository;

/// In-memory [`MovieRepository`] used by the HTTP tests
///
/// Mirrors the Postgres implementation's observable behavior: unique mood
/// names, insertion-ordered reviews, newest-first search results.
#[derive(Clone, Default)]
pub struct InMemoryMovieRepository {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    movies: Vec<Movie>,
    moods: Vec<Mood>,
    movie_moods: Vec<(i32, i32)>,
    reviews: Vec<Review>,
    next_movie_id: i32,
    next_mood_id: i32,
    next_review_id: i32,
}

impl Inner {
    fn mood_id_for(&mut self, name: &str) -> i32 {
        if let Some(mood) = self.moods.iter().find(|m| m.name == name) {
            return mood.id;
        }

        self.next_mood_id += 1;
        let id = self.next_mood_id;
        self.moods.push(Mood {
            id,
            name: name.to_string(),
        });
        id
    }

    fn hydrate(&self, movie: &Movie) -> MovieWithRelations {
        let mood_names: Vec<String> = self
            .movie_moods
            .iter()
            .filter(|(movie_id, _)| *movie_id == movie.id)
            .filter_map(|(_, mood_id)| {
                self.moods.iter().find(|m| m.id == *mood_id).map(|m| m.name.clone())
            })
            .collect();

        let reviews: Vec<Review> = self
            .reviews
            .iter()
            .filter(|r| r.movie_id == movie.id)
            .cloned()
            .collect();

        MovieWithRelations {
            movie: movie.clone(),
            moods: mood_names,
            reviews,
        }
    }
}

impl InMemoryMovieRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MovieRepository for InMemoryMovieRepository {
    async fn list_moods(&self) -> AppResult<Vec<Mood>> {
        let inner = self.inner.read().await;
        let mut moods = inner.moods.clone();
        moods.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(moods)
    }

    async fn seed_moods(&self, names: &[&str]) -> AppResult<()> {
        let mut inner = self.inner.write().await;
        for name in names {
            inner.mood_id_for(name);
        }
        Ok(())
    }

    async fn create_movie(&self, new_movie: NewMovie) -> AppResult<MovieWithRelations> {
        let mut inner = self.inner.write().await;

        inner.next_movie_id += 1;
        let movie = Movie {
            id: inner.next_movie_id,
            title: new_movie.title,
            description: new_movie.description,
            image_url: new_movie.image_url,
            created_at: Utc::now(),
        };
        inner.movies.push(movie.clone());

        for name in &new_movie.mood_names {
            let mood_id = inner.mood_id_for(name);
            if !inner.movie_moods.contains(&(movie.id, mood_id)) {
                inner.movie_moods.push((movie.id, mood_id));
            }
        }

        inner.next_review_id += 1;
        let review = Review {
            id: inner.next_review_id,
            movie_id: movie.id,
            review: new_movie.initial_review,
            created_at: Utc::now(),
        };
        inner.reviews.push(review);

        Ok(inner.hydrate(&movie))
    }

    async fn find_by_title(&self, query: &str) -> AppResult<Vec<MovieWithRelations>> {
        let inner = self.inner.read().await;
        let needle = query.to_lowercase();

        let mut matches: Vec<&Movie> = inner
            .movies
            .iter()
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .collect();
        // Ids increase with creation, so newest-first is id-descending.
        matches.sort_by(|a, b| b.id.cmp(&a.id));

        Ok(matches.into_iter().map(|m| inner.hydrate(m)).collect())
    }

    async fn fetch_all_with_relations(&self) -> AppResult<Vec<MovieWithRelations>> {
        let inner = self.inner.read().await;
        let mut movies: Vec<&Movie> = inner.movies.iter().collect();
        movies.sort_by_key(|m| m.id);

        Ok(movies.into_iter().map(|m| inner.hydrate(m)).collect())
    }

    async fn add_review(&self, movie_id: i32, review_text: &str) -> AppResult<Review> {
        let mut inner = self.inner.write().await;

        if !inner.movies.iter().any(|m| m.id == movie_id) {
            return Err(AppError::NotFound(format!("Movie {movie_id} not found")));
        }

        inner.next_review_id += 1;
        let review = Review {
            id: inner.next_review_id,
            movie_id,
            review: review_text.to_string(),
            created_at: Utc::now(),
        };
        inner.reviews.push(review.clone());

        Ok(review)
    }
}

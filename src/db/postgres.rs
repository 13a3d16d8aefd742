use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::error::{AppError, AppResult};
use crate::models::{Mood, Movie, MovieWithRelations, NewMovie, Review};

use super::MovieRepository;

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Postgres-backed [`MovieRepository`]
///
/// Mood-name races (startup seeding vs. lazy creation during movie upload)
/// resolve at the UNIQUE constraint on `moods.mood_name`: every insert goes
/// through `ON CONFLICT DO NOTHING`, never a check-then-insert.
#[derive(Clone)]
pub struct PgMovieRepository {
    pool: PgPool,
}

impl PgMovieRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attaches mood names and reviews to the given movie rows
    async fn hydrate(&self, movies: Vec<Movie>) -> AppResult<Vec<MovieWithRelations>> {
        let ids: Vec<i32> = movies.iter().map(|m| m.id).collect();

        let mood_rows: Vec<(i32, String)> = sqlx::query_as(
            "SELECT mm.movie_id, m.mood_name
             FROM movie_moods mm
             JOIN moods m ON m.id = mm.mood_id
             WHERE mm.movie_id = ANY($1)
             ORDER BY mm.movie_id, mm.mood_id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let review_rows: Vec<Review> = sqlx::query_as(
            "SELECT id, movie_id, review, created_at
             FROM reviews
             WHERE movie_id = ANY($1)
             ORDER BY id",
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await?;

        let mut moods_by_movie: HashMap<i32, Vec<String>> = HashMap::new();
        for (movie_id, name) in mood_rows {
            moods_by_movie.entry(movie_id).or_default().push(name);
        }

        let mut reviews_by_movie: HashMap<i32, Vec<Review>> = HashMap::new();
        for review in review_rows {
            reviews_by_movie.entry(review.movie_id).or_default().push(review);
        }

        Ok(movies
            .into_iter()
            .map(|movie| {
                let moods = moods_by_movie.remove(&movie.id).unwrap_or_default();
                let reviews = reviews_by_movie.remove(&movie.id).unwrap_or_default();
                MovieWithRelations { movie, moods, reviews }
            })
            .collect())
    }
}

#[async_trait]
impl MovieRepository for PgMovieRepository {
    async fn list_moods(&self) -> AppResult<Vec<Mood>> {
        let moods = sqlx::query_as::<_, Mood>(
            "SELECT id, mood_name FROM moods ORDER BY mood_name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(moods)
    }

    async fn seed_moods(&self, names: &[&str]) -> AppResult<()> {
        for name in names {
            sqlx::query("INSERT INTO moods (mood_name) VALUES ($1) ON CONFLICT (mood_name) DO NOTHING")
                .bind(name)
                .execute(&self.pool)
                .await?;
        }

        Ok(())
    }

    async fn create_movie(&self, new_movie: NewMovie) -> AppResult<MovieWithRelations> {
        let mut tx = self.pool.begin().await?;

        let movie: Movie = sqlx::query_as(
            "INSERT INTO movies (title, description, image_url)
             VALUES ($1, $2, $3)
             RETURNING id, title, description, image_url, created_at",
        )
        .bind(&new_movie.title)
        .bind(&new_movie.description)
        .bind(&new_movie.image_url)
        .fetch_one(&mut *tx)
        .await?;

        // Attaching the same mood twice is a no-op, so dedup up front to keep
        // the returned name list free of repeats.
        let mut attached: Vec<String> = Vec::new();
        for name in &new_movie.mood_names {
            if attached.iter().any(|m| m == name) {
                continue;
            }

            let mood_id: i32 = sqlx::query_scalar(
                "WITH ins AS (
                     INSERT INTO moods (mood_name) VALUES ($1)
                     ON CONFLICT (mood_name) DO NOTHING
                     RETURNING id
                 )
                 SELECT id FROM ins
                 UNION ALL
                 SELECT id FROM moods WHERE mood_name = $1
                 LIMIT 1",
            )
            .bind(name)
            .fetch_one(&mut *tx)
            .await?;

            sqlx::query(
                "INSERT INTO movie_moods (movie_id, mood_id) VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(movie.id)
            .bind(mood_id)
            .execute(&mut *tx)
            .await?;

            attached.push(name.clone());
        }

        let review: Review = sqlx::query_as(
            "INSERT INTO reviews (movie_id, review)
             VALUES ($1, $2)
             RETURNING id, movie_id, review, created_at",
        )
        .bind(movie.id)
        .bind(&new_movie.initial_review)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(MovieWithRelations {
            movie,
            moods: attached,
            reviews: vec![review],
        })
    }

    async fn find_by_title(&self, query: &str) -> AppResult<Vec<MovieWithRelations>> {
        let pattern = format!("%{query}%");
        let movies = sqlx::query_as::<_, Movie>(
            "SELECT id, title, description, image_url, created_at
             FROM movies
             WHERE title ILIKE $1
             ORDER BY created_at DESC",
        )
        .bind(pattern)
        .fetch_all(&self.pool)
        .await?;

        self.hydrate(movies).await
    }

    async fn fetch_all_with_relations(&self) -> AppResult<Vec<MovieWithRelations>> {
        let movies = sqlx::query_as::<_, Movie>(
            "SELECT id, title, description, image_url, created_at
             FROM movies
             ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        self.hydrate(movies).await
    }

    async fn add_review(&self, movie_id: i32, review_text: &str) -> AppResult<Review> {
        let exists: Option<i32> = sqlx::query_scalar("SELECT id FROM movies WHERE id = $1")
            .bind(movie_id)
            .fetch_optional(&self.pool)
            .await?;

        if exists.is_none() {
            return Err(AppError::NotFound(format!("Movie {movie_id} not found")));
        }

        let review: Review = sqlx::query_as(
            "INSERT INTO reviews (movie_id, review)
             VALUES ($1, $2)
             RETURNING id, movie_id, review, created_at",
        )
        .bind(movie_id)
        .bind(review_text)
        .fetch_one(&self.pool)
        .await?;

        Ok(review)
    }
}

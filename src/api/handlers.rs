use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::{Mood, MovieWithRelations, NewMovie, Review};
use crate::services::recommendations::{self, Preference, RankedMovie};

use super::AppState;

// Request/Response types

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct MoodResponse {
    pub id: i32,
    pub name: String,
}

impl From<Mood> for MoodResponse {
    fn from(mood: Mood) -> Self {
        Self {
            id: mood.id,
            name: mood.name,
        }
    }
}

/// The movie shape returned by creation and search
///
/// Carries only the earliest review; the recommendation response carries the
/// full list.
#[derive(Debug, Serialize)]
pub struct MovieSummaryResponse {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub review: Option<String>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub moods: Vec<String>,
}

impl From<&MovieWithRelations> for MovieSummaryResponse {
    fn from(movie: &MovieWithRelations) -> Self {
        Self {
            id: movie.movie.id,
            title: movie.movie.title.clone(),
            description: movie.movie.description.clone(),
            review: movie.first_review().map(str::to_string),
            image_url: movie.movie.image_url.clone(),
            created_at: movie.movie.created_at,
            moods: movie.moods.clone(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub id: i32,
    pub movie_id: i32,
    pub review: String,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewResponse {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            movie_id: review.movie_id,
            review: review.review,
            created_at: review.created_at,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub struct AddReviewRequest {
    pub review: String,
}

#[derive(Debug, Deserialize)]
pub struct RecommendationRequest {
    pub moods: Vec<String>,
    pub preference: String,
    /// Free-text notes from the client form; accepted but not scored
    #[serde(default, rename = "personalNotes")]
    pub personal_notes: Option<String>,
    /// Client-side submission timestamp; accepted but not scored
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Fields collected from the multipart movie-creation form
#[derive(Debug, Default)]
struct CreateMovieForm {
    title: Option<String>,
    description: Option<String>,
    review: Option<String>,
    moods: Option<String>,
    image_name: Option<String>,
    image_data: Option<Vec<u8>>,
}

impl CreateMovieForm {
    async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::InvalidInput(e.to_string()))?
        {
            let name = field.name().unwrap_or("").to_string();

            match name.as_str() {
                "title" => form.title = Some(read_text(field).await?),
                "description" => form.description = Some(read_text(field).await?),
                "review" => form.review = Some(read_text(field).await?),
                "moods" => form.moods = Some(read_text(field).await?),
                "image" => {
                    form.image_name = field.file_name().map(str::to_string);
                    form.image_data = Some(
                        field
                            .bytes()
                            .await
                            .map_err(|e| AppError::InvalidInput(e.to_string()))?
                            .to_vec(),
                    );
                }
                _ => {}
            }
        }

        Ok(form)
    }
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::InvalidInput(e.to_string()))
}

fn required(value: Option<String>, name: &str) -> AppResult<String> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(AppError::InvalidInput(format!("Missing form field: {name}"))),
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        message: "Movie Review API is running",
    })
}

/// All moods, sorted by name
pub async fn get_moods(State(state): State<AppState>) -> AppResult<Json<Vec<MoodResponse>>> {
    let moods = state.repo.list_moods().await?;
    Ok(Json(moods.into_iter().map(MoodResponse::from).collect()))
}

/// Creates a movie from the multipart form: title, description, review,
/// comma-separated mood names and an image file
///
/// The image lands on disk first (the multipart stream has to go somewhere),
/// but is removed again if the movie insert fails, so a failed creation
/// leaves no orphaned upload behind.
pub async fn create_movie(
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<MovieSummaryResponse>)> {
    let form = CreateMovieForm::from_multipart(multipart).await?;

    let title = required(form.title, "title")?;
    let description = required(form.description, "description")?;
    let review = required(form.review, "review")?;
    let mood_names: Vec<String> = required(form.moods, "moods")?
        .split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect();

    let image_data = form
        .image_data
        .ok_or_else(|| AppError::InvalidInput("Missing form field: image".to_string()))?;
    let image_name = form.image_name.unwrap_or_default();

    let image_url = state.images.save(&image_name, &image_data).await?;

    let new_movie = NewMovie {
        title,
        description: Some(description),
        image_url: Some(image_url.clone()),
        mood_names,
        initial_review: review,
    };

    let movie = match state.repo.create_movie(new_movie).await {
        Ok(movie) => movie,
        Err(e) => {
            state.images.remove(&image_url).await;
            return Err(e);
        }
    };

    tracing::info!(movie_id = movie.movie.id, title = %movie.movie.title, "movie created");

    Ok((StatusCode::CREATED, Json(MovieSummaryResponse::from(&movie))))
}

/// Case-insensitive title substring search, newest first
pub async fn search_movies(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<Vec<MovieSummaryResponse>>> {
    let movies = state.repo.find_by_title(&query.title).await?;
    Ok(Json(movies.iter().map(MovieSummaryResponse::from).collect()))
}

/// Attaches a review to an existing movie; 404 for an unknown id
pub async fn add_review(
    State(state): State<AppState>,
    Path(movie_id): Path<i32>,
    Json(request): Json<AddReviewRequest>,
) -> AppResult<(StatusCode, Json<ReviewResponse>)> {
    if request.review.trim().is_empty() {
        return Err(AppError::InvalidInput("Review text must not be empty".to_string()));
    }

    let review = state.repo.add_review(movie_id, &request.review).await?;
    Ok((StatusCode::CREATED, Json(ReviewResponse::from(review))))
}

/// Scores every movie against the user's mood selection and returns the
/// ranked survivors
///
/// The preference string is validated before any repository access; an
/// unknown value is a 400 with zero movies fetched or scored.
pub async fn recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendationRequest>,
) -> AppResult<Json<Vec<RankedMovie>>> {
    let preference: Preference = request.preference.parse()?;

    tracing::debug!(
        moods = ?request.moods,
        preference = %request.preference,
        has_notes = request.personal_notes.is_some(),
        client_timestamp = request.timestamp.as_deref().unwrap_or(""),
        "recommendation requested"
    );

    let movies = state.repo.fetch_all_with_relations().await?;
    let ranked = recommendations::recommend(&movies, &request.moods, preference);

    Ok(Json(ranked))
}

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::services::uploads;

use super::handlers;
use super::AppState;

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    let images = ServeDir::new(state.images.root());

    Router::new()
        .route("/", get(handlers::health_check))
        // Mood vocabulary
        .route("/api/moods", get(handlers::get_moods))
        // Movies
        .route("/api/movies", post(handlers::create_movie))
        .route("/api/movies/search", get(handlers::search_movies))
        .route("/api/movies/:id/reviews", post(handlers::add_review))
        // Recommendations
        .route("/api/recommendations", post(handlers::recommend))
        // Uploaded movie images
        .nest_service(uploads::PUBLIC_PREFIX, images)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

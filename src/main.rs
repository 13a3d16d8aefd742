use std::sync::Arc;

use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing_subscriber::EnvFilter;

use movie_feels_api::api::{create_router, AppState};
use movie_feels_api::config::Config;
use movie_feels_api::db::{create_pool, MovieRepository, PgMovieRepository};
use movie_feels_api::services::moods;
use movie_feels_api::services::uploads::ImageStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = create_pool(&config.database_url)
        .await
        .context("connecting to database")?;
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("running migrations")?;

    let repo: Arc<dyn MovieRepository> = Arc::new(PgMovieRepository::new(pool));

    // The vocabulary must exist before the first request can create a movie
    // or ask for the mood list, so seed before binding the listener.
    moods::seed(&repo).await.context("seeding mood vocabulary")?;

    let images = ImageStore::new(&config.upload_dir)
        .await
        .context("opening image store")?;

    let origins = config
        .cors_origins()
        .iter()
        .map(|o| o.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()
        .context("parsing allowed origins")?;
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true);

    let state = AppState::new(repo, images);
    let app = create_router(state).layer(cors);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    tracing::info!(%addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}

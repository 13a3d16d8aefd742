use std::sync::Arc;

use crate::db::MovieRepository;
use crate::services::uploads::ImageStore;

/// Shared application state
///
/// Constructed once at startup and cloned into every handler; no
/// process-wide singletons. The repository is a trait object so tests can
/// swap the Postgres implementation for the in-memory one.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<dyn MovieRepository>,
    pub images: ImageStore,
}

impl AppState {
    pub fn new(repo: Arc<dyn MovieRepository>, images: ImageStore) -> Self {
        Self { repo, images }
    }
}

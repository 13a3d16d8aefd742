use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::error::AppResult;

/// URL path prefix the stored images are served under
pub const PUBLIC_PREFIX: &str = "/uploaded_images";

/// Filesystem store for uploaded movie images
///
/// Files land under a fresh UUID name so client-supplied filenames never
/// touch the filesystem. A stored file is only referenced by a movie row
/// after the row commits; when the insert fails, the caller removes the file
/// again so no orphan survives a failed creation.
#[derive(Clone)]
pub struct ImageStore {
    root: PathBuf,
}

impl ImageStore {
    /// Opens the store, creating the directory if needed
    pub async fn new(root: impl Into<PathBuf>) -> AppResult<Self> {
        let root = root.into();
        tokio::fs::create_dir_all(&root).await?;
        Ok(Self { root })
    }

    /// Directory the files live in, for static serving
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Writes the upload and returns its public URL path
    ///
    /// Keeps the extension of the client filename, nothing else.
    pub async fn save(&self, original_name: &str, data: &[u8]) -> AppResult<String> {
        let ext = Path::new(original_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .unwrap_or_default();
        let file_name = format!("{}{}", Uuid::new_v4(), ext);

        tokio::fs::write(self.root.join(&file_name), data).await?;
        Ok(format!("{PUBLIC_PREFIX}/{file_name}"))
    }

    /// Best-effort removal of a stored file by its public URL path
    pub async fn remove(&self, url_path: &str) {
        let Some(file_name) = url_path.rsplit('/').next() else {
            return;
        };

        if let Err(e) = tokio::fs::remove_file(self.root.join(file_name)).await {
            tracing::warn!(file = file_name, error = %e, "failed to remove upload");
        }
    }
}

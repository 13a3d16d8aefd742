use std::collections::HashSet;
use std::sync::Arc;

use crate::db::MovieRepository;
use crate::error::AppResult;

/// The canonical mood vocabulary, seeded at startup
///
/// Order and spelling are part of the API contract: clients render the list
/// in this order.
pub const CANONICAL_MOODS: [&str; 19] = [
    "Sad",
    "Happy",
    "Bored",
    "Grief",
    "Magical",
    "Excited",
    "Loneliness",
    "Romance",
    "Adventurous",
    "Brokenhearted",
    "Optimistic",
    "Thrilled",
    "Stressed",
    "Relaxed & Carefree",
    "Scared",
    "Angry",
    "Community Joy",
    "Hopeless",
    "Nostalgia",
];

/// Canonical names not yet present in `existing`, in canonical order
pub fn missing_moods<'a>(
    existing: &HashSet<String>,
    canonical: &[&'a str],
) -> Vec<&'a str> {
    canonical
        .iter()
        .filter(|name| !existing.contains(**name))
        .copied()
        .collect()
}

/// Seeds the canonical mood vocabulary
///
/// Runs once at startup, before the server accepts traffic. Only names not
/// yet present are scheduled for insert; the insert itself is still
/// insert-or-ignore against the unique name constraint, so the pass is
/// idempotent and safe against concurrent movie creation.
pub async fn seed(repo: &Arc<dyn MovieRepository>) -> AppResult<()> {
    let existing: HashSet<String> = repo
        .list_moods()
        .await?
        .into_iter()
        .map(|m| m.name)
        .collect();
    let missing = missing_moods(&existing, &CANONICAL_MOODS);

    if missing.is_empty() {
        tracing::info!("mood vocabulary already seeded");
        return Ok(());
    }

    repo.seed_moods(&missing).await?;
    tracing::info!(inserted = missing.len(), "mood vocabulary seeded");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_list_has_nineteen_moods() {
        assert_eq!(CANONICAL_MOODS.len(), 19);
        assert_eq!(CANONICAL_MOODS[0], "Sad");
        assert_eq!(CANONICAL_MOODS[13], "Relaxed & Carefree");
        assert_eq!(CANONICAL_MOODS[16], "Community Joy");
        assert_eq!(CANONICAL_MOODS[18], "Nostalgia");
    }

    #[test]
    fn test_missing_moods_on_empty_store() {
        let existing = HashSet::new();
        let missing = missing_moods(&existing, &CANONICAL_MOODS);
        assert_eq!(missing.len(), 19);
        assert_eq!(missing, CANONICAL_MOODS.to_vec());
    }

    #[test]
    fn test_missing_moods_is_idempotent() {
        let existing: HashSet<String> =
            CANONICAL_MOODS.iter().map(|s| s.to_string()).collect();
        assert!(missing_moods(&existing, &CANONICAL_MOODS).is_empty());
    }

    #[tokio::test]
    async fn test_seed_inserts_only_missing_names() {
        use crate::db::InMemoryMovieRepository;

        let repo: Arc<dyn MovieRepository> = Arc::new(InMemoryMovieRepository::new());
        repo.seed_moods(&["Sad", "Happy"]).await.unwrap();

        seed(&repo).await.unwrap();
        assert_eq!(repo.list_moods().await.unwrap().len(), 19);

        seed(&repo).await.unwrap();
        assert_eq!(repo.list_moods().await.unwrap().len(), 19);
    }

    #[test]
    fn test_missing_moods_partial_store() {
        let existing: HashSet<String> =
            ["Sad", "Happy"].iter().map(|s| s.to_string()).collect();
        let missing = missing_moods(&existing, &CANONICAL_MOODS);
        assert_eq!(missing.len(), 17);
        assert!(!missing.contains(&"Sad"));
        assert!(!missing.contains(&"Happy"));
        assert_eq!(missing[0], "Bored");
    }
}

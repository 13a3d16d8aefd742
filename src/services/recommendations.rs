use std::cmp::Reverse;
use std::collections::HashSet;
use std::str::FromStr;

use serde::Serialize;

use crate::error::AppError;
use crate::models::MovieWithRelations;

/// How the user wants recommendations to relate to their mood
///
/// Congruence matches the stated moods directly (catharsis); incongruence
/// matches their emotional opposites (mood lift).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preference {
    Congruence,
    Incongruence,
}

impl FromStr for Preference {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "congruence" => Ok(Preference::Congruence),
            "incongruence" => Ok(Preference::Incongruence),
            other => Err(AppError::InvalidPreference(other.to_string())),
        }
    }
}

/// Emotional opposite pairs, used only by incongruence mode
///
/// Matching scans both positions of every pair: selecting either name of a
/// pair yields the other. Moods absent from the table have no opposite and
/// contribute nothing. Note that "Calm / Peaceful" only ever appears in the
/// second position and is not part of the seeded vocabulary; the
/// both-position scan still resolves it to "Happy" when selected.
const OPPOSITE_MOODS: [(&str, &str); 13] = [
    ("Sad", "Happy"),
    ("Sad", "Excited"),
    ("Happy", "Calm / Peaceful"),
    ("Grief", "Optimistic"),
    ("Loneliness", "Community Joy"),
    ("Brokenhearted", "Romance"),
    ("Bored", "Thrilled"),
    ("Bored", "Adventurous"),
    ("Stressed", "Relaxed & Carefree"),
    ("Stressed", "Calm / Peaceful"),
    ("Scared", "Calm / Peaceful"),
    ("Angry", "Calm / Peaceful"),
    ("Hopeless", "Optimistic"),
];

/// A movie that survived scoring, with everything the client renders
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RankedMovie {
    pub id: i32,
    pub title: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub moods: Vec<String>,
    pub reviews: Vec<String>,
    pub match_score: usize,
}

/// Resolves the mood set movies are scored against
///
/// Congruence passes the user's moods through unchanged. Incongruence
/// collects every opposite reachable from the selection via the pair table,
/// deduplicated. An empty selection resolves to an empty set either way.
pub fn resolve_target_moods(user_moods: &[String], preference: Preference) -> HashSet<String> {
    match preference {
        Preference::Congruence => user_moods.iter().cloned().collect(),
        Preference::Incongruence => {
            let mut targets = HashSet::new();
            for mood in user_moods {
                for (a, b) in &OPPOSITE_MOODS {
                    if mood == a {
                        targets.insert((*b).to_string());
                    } else if mood == b {
                        targets.insert((*a).to_string());
                    }
                }
            }
            targets
        }
    }
}

/// Scores and ranks movies against the user's mood selection
///
/// Pure function: no storage access, no mutation of its inputs. Each movie
/// scores the cardinality of the intersection between its mood names and the
/// resolved target set (exact string match). Zero-score movies are dropped
/// entirely; survivors sort by score descending, ties by movie id ascending.
pub fn recommend(
    movies: &[MovieWithRelations],
    user_moods: &[String],
    preference: Preference,
) -> Vec<RankedMovie> {
    let targets = resolve_target_moods(user_moods, preference);

    let mut ranked: Vec<RankedMovie> = movies
        .iter()
        .filter_map(|m| {
            let score = m.moods.iter().filter(|name| targets.contains(*name)).count();
            if score == 0 {
                return None;
            }

            Some(RankedMovie {
                id: m.movie.id,
                title: m.movie.title.clone(),
                description: m.movie.description.clone(),
                image_url: m.movie.image_url.clone(),
                moods: m.moods.clone(),
                reviews: m.reviews.iter().map(|r| r.review.clone()).collect(),
                match_score: score,
            })
        })
        .collect();

    ranked.sort_by_key(|m| (Reverse(m.match_score), m.id));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Movie, Review};
    use chrono::Utc;

    fn movie(id: i32, title: &str, moods: &[&str]) -> MovieWithRelations {
        MovieWithRelations {
            movie: Movie {
                id,
                title: title.to_string(),
                description: Some(format!("about {title}")),
                image_url: Some(format!("/uploaded_images/{id}.jpg")),
                created_at: Utc::now(),
            },
            moods: moods.iter().map(|s| s.to_string()).collect(),
            reviews: vec![Review {
                id,
                movie_id: id,
                review: format!("review of {title}"),
                created_at: Utc::now(),
            }],
        }
    }

    fn moods(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_preference_parsing() {
        assert_eq!("congruence".parse::<Preference>().unwrap(), Preference::Congruence);
        assert_eq!(
            "incongruence".parse::<Preference>().unwrap(),
            Preference::Incongruence
        );
        assert!(matches!(
            "random".parse::<Preference>(),
            Err(AppError::InvalidPreference(_))
        ));
        // Case-sensitive, like the rest of the mood name space
        assert!("Congruence".parse::<Preference>().is_err());
    }

    #[test]
    fn test_congruence_targets_are_unchanged() {
        let selection = moods(&["Happy", "Nostalgia"]);
        let targets = resolve_target_moods(&selection, Preference::Congruence);
        let expected: HashSet<String> = selection.into_iter().collect();
        assert_eq!(targets, expected);
    }

    #[test]
    fn test_incongruence_sad_yields_happy_and_excited() {
        let targets = resolve_target_moods(&moods(&["Sad"]), Preference::Incongruence);
        let expected: HashSet<String> = moods(&["Happy", "Excited"]).into_iter().collect();
        assert_eq!(targets, expected);
    }

    #[test]
    fn test_incongruence_scans_both_pair_positions() {
        // "Happy" is the second element of ("Sad", "Happy") and the first of
        // ("Happy", "Calm / Peaceful"); both directions must contribute.
        let targets = resolve_target_moods(&moods(&["Happy"]), Preference::Incongruence);
        let expected: HashSet<String> =
            moods(&["Sad", "Calm / Peaceful"]).into_iter().collect();
        assert_eq!(targets, expected);
    }

    #[test]
    fn test_incongruence_reverse_lookup_of_unseeded_target() {
        // "Calm / Peaceful" is never a source key, but the both-position scan
        // still resolves it.
        let targets =
            resolve_target_moods(&moods(&["Calm / Peaceful"]), Preference::Incongruence);
        let expected: HashSet<String> =
            moods(&["Happy", "Stressed", "Scared", "Angry"]).into_iter().collect();
        assert_eq!(targets, expected);
    }

    #[test]
    fn test_scared_and_angry_have_opposites() {
        let targets =
            resolve_target_moods(&moods(&["Scared", "Angry"]), Preference::Incongruence);
        let expected: HashSet<String> = moods(&["Calm / Peaceful"]).into_iter().collect();
        assert_eq!(targets, expected);
    }

    #[test]
    fn test_incongruence_deduplicates_targets() {
        // Grief and Hopeless both map to Optimistic
        let targets =
            resolve_target_moods(&moods(&["Grief", "Hopeless"]), Preference::Incongruence);
        let expected: HashSet<String> = moods(&["Optimistic"]).into_iter().collect();
        assert_eq!(targets, expected);
    }

    #[test]
    fn test_mood_without_table_entry_contributes_nothing() {
        let targets =
            resolve_target_moods(&moods(&["Magical", "Nostalgia"]), Preference::Incongruence);
        assert!(targets.is_empty());
    }

    #[test]
    fn test_empty_selection_resolves_empty() {
        assert!(resolve_target_moods(&[], Preference::Congruence).is_empty());
        assert!(resolve_target_moods(&[], Preference::Incongruence).is_empty());
    }

    #[test]
    fn test_score_is_intersection_cardinality() {
        let movies = vec![movie(1, "Inside Out", &["Happy", "Sad", "Nostalgia"])];
        let ranked = recommend(&movies, &moods(&["Happy", "Sad", "Bored"]), Preference::Congruence);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].match_score, 2);
    }

    #[test]
    fn test_congruence_includes_and_excludes() {
        let movies = vec![
            movie(1, "Up", &["Happy", "Sad"]),
            movie(2, "Grave of the Fireflies", &["Sad"]),
        ];

        let ranked = recommend(&movies, &moods(&["Happy"]), Preference::Congruence);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].title, "Up");
        assert_eq!(ranked[0].match_score, 1);
    }

    #[test]
    fn test_incongruence_scores_against_opposites() {
        let movies = vec![
            movie(1, "Mad Max", &["Excited"]),
            movie(2, "Manchester by the Sea", &["Sad"]),
        ];

        let ranked = recommend(&movies, &moods(&["Sad"]), Preference::Incongruence);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].title, "Mad Max");
        assert_eq!(ranked[0].match_score, 1);
    }

    #[test]
    fn test_zero_score_movies_are_absent() {
        let movies = vec![movie(1, "Tenet", &["Thrilled"])];
        let ranked = recommend(&movies, &moods(&["Sad"]), Preference::Congruence);
        assert!(ranked.is_empty());
    }

    #[test]
    fn test_ranking_sorts_by_score_descending() {
        let movies = vec![
            movie(1, "One", &["Happy"]),
            movie(2, "Two", &["Happy", "Excited"]),
        ];

        let ranked = recommend(
            &movies,
            &moods(&["Happy", "Excited"]),
            Preference::Congruence,
        );
        assert_eq!(ranked[0].title, "Two");
        assert_eq!(ranked[1].title, "One");
    }

    #[test]
    fn test_ties_break_by_movie_id_ascending() {
        let movies = vec![
            movie(7, "Later", &["Happy", "Excited"]),
            movie(3, "Earlier", &["Happy", "Excited"]),
        ];

        // Same input twice: the order must be identical and id-ascending.
        for _ in 0..2 {
            let ranked = recommend(
                &movies,
                &moods(&["Happy", "Excited"]),
                Preference::Congruence,
            );
            assert_eq!(ranked[0].id, 3);
            assert_eq!(ranked[1].id, 7);
            assert_eq!(ranked[0].match_score, ranked[1].match_score);
        }
    }

    #[test]
    fn test_output_carries_full_mood_and_review_lists() {
        let movies = vec![movie(1, "Amelie", &["Happy", "Magical", "Romance"])];
        let ranked = recommend(&movies, &moods(&["Happy"]), Preference::Congruence);

        // Full mood list, not just the matched names
        assert_eq!(ranked[0].moods, moods(&["Happy", "Magical", "Romance"]));
        assert_eq!(ranked[0].reviews, vec!["review of Amelie".to_string()]);
    }
}

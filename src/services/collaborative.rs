use std::collections::{HashMap, HashSet};

use rand::{rngs::StdRng, seq::IndexedRandom, SeedableRng};
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::{
    data::InteractionData,
    models::{Catalogue, CollaborativeRecommendations, ProfileSource, ScoredSong, UserInfo},
};

/// Number of liked titles echoed back in [`UserInfo::sample_liked_songs`]
const LIKED_SAMPLE_SIZE: usize = 3;

/// Tunables for collaborative scoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollaborativePolicy {
    /// Recommendations returned per user
    pub result_count: usize,
    /// Liked songs an unknown user borrows from a fallback user
    pub fallback_profile_size: usize,
    /// Liked songs synthesized per user in degraded mode
    pub degraded_liked_count: usize,
    /// Related songs synthesized per liked song in degraded mode
    pub degraded_related_per_song: usize,
}

impl Default for CollaborativePolicy {
    fn default() -> Self {
        Self {
            result_count: 5,
            fallback_profile_size: 5,
            degraded_liked_count: 10,
            degraded_related_per_song: 5,
        }
    }
}

/// Which collaborative strategy the scorer was built with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CollaborativeMode {
    Interactions,
    Degraded,
}

/// Liked songs resolved for a user, with where they came from
#[derive(Debug, Clone, PartialEq)]
pub struct LikedProfile {
    pub liked: Vec<String>,
    pub source: ProfileSource,
}

/// Accumulated candidate scores, remembering first-encounter order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateScores {
    entries: Vec<(String, u64)>,
    positions: HashMap<String, usize>,
}

impl CandidateScores {
    pub fn add(&mut self, title: &str, count: u64) {
        match self.positions.get(title) {
            Some(&position) => self.entries[position].1 += count,
            None => {
                self.positions.insert(title.to_string(), self.entries.len());
                self.entries.push((title.to_string(), count));
            }
        }
    }

    pub fn get(&self, title: &str) -> Option<u64> {
        self.positions.get(title).map(|&position| self.entries[position].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Candidates by descending score; equal scores keep first-encounter order
    pub fn into_ranked(self) -> Vec<(String, u64)> {
        let mut entries = self.entries;
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        entries
    }
}

/// A resolved profile and the candidate scores derived from it
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredProfile {
    pub profile: LikedProfile,
    pub candidates: CandidateScores,
}

/// Strategy that turns a user id into liked songs and candidate scores
pub trait CollaborativeSource: Send + Sync {
    fn score(
        &self,
        user_id: &str,
        catalogue: &Catalogue,
        policy: &CollaborativePolicy,
    ) -> ScoredProfile;

    fn mode(&self) -> CollaborativeMode;
}

/// PRNG whose whole stream is a function of the user id
fn seeded_rng(user_id: &str) -> StdRng {
    let digest = Sha256::digest(user_id.as_bytes());
    let mut seed = [0u8; 32];
    seed.copy_from_slice(&digest);
    StdRng::from_seed(seed)
}

/// Scores from the generator's interaction and co-occurrence tables
pub struct InteractionSource {
    data: InteractionData,
}

impl InteractionSource {
    pub fn new(data: InteractionData) -> Self {
        Self { data }
    }

    /// Known users keep their list; unknown users borrow a subset from a
    /// fallback user picked deterministically from their id.
    fn resolve_profile(&self, user_id: &str, policy: &CollaborativePolicy) -> LikedProfile {
        if let Some(liked) = self.data.interactions.liked(user_id) {
            return LikedProfile {
                liked: liked.to_vec(),
                source: ProfileSource::Known,
            };
        }

        let mut rng = seeded_rng(user_id);
        let user_ids = self.data.interactions.user_ids();
        let Some(donor) = user_ids.choose(&mut rng) else {
            return LikedProfile {
                liked: Vec::new(),
                source: ProfileSource::Unresolved,
            };
        };

        let donor_liked = self.data.interactions.liked(donor).unwrap_or_default();
        let amount = policy.fallback_profile_size.min(donor_liked.len());
        let liked = donor_liked
            .choose_multiple(&mut rng, amount)
            .cloned()
            .collect();

        tracing::debug!(user_id, donor = %donor, "Borrowing liked songs for unknown user");

        LikedProfile {
            liked,
            source: ProfileSource::Borrowed {
                from_user: donor.clone(),
            },
        }
    }
}

impl CollaborativeSource for InteractionSource {
    fn score(
        &self,
        user_id: &str,
        _catalogue: &Catalogue,
        policy: &CollaborativePolicy,
    ) -> ScoredProfile {
        let profile = self.resolve_profile(user_id, policy);
        let liked: HashSet<&str> = profile.liked.iter().map(String::as_str).collect();

        let mut candidates = CandidateScores::default();
        for song in &profile.liked {
            for (related, count) in self.data.cooccurrences.related(song) {
                if !liked.contains(related) {
                    candidates.add(related, u64::from(count));
                }
            }
        }

        ScoredProfile {
            profile,
            candidates,
        }
    }

    fn mode(&self) -> CollaborativeMode {
        CollaborativeMode::Interactions
    }
}

/// Degraded mode used when interaction tables are unavailable.
///
/// Synthesizes a liked set and pseudo co-occurrences from a PRNG seeded by the
/// user id: stable per user, but carries no real signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct DegradedCollaborativeSource;

impl CollaborativeSource for DegradedCollaborativeSource {
    fn score(
        &self,
        user_id: &str,
        catalogue: &Catalogue,
        policy: &CollaborativePolicy,
    ) -> ScoredProfile {
        let mut rng = seeded_rng(user_id);
        let titles = catalogue.titles();

        let liked_amount = policy.degraded_liked_count.min(titles.len());
        let liked: Vec<&str> = titles
            .choose_multiple(&mut rng, liked_amount)
            .copied()
            .collect();
        let liked_set: HashSet<&str> = liked.iter().copied().collect();

        let mut candidates = CandidateScores::default();
        for song in &liked {
            let others: Vec<&str> = titles.iter().copied().filter(|t| t != song).collect();
            let amount = policy.degraded_related_per_song.min(others.len());
            for related in others.choose_multiple(&mut rng, amount) {
                if !liked_set.contains(related) {
                    candidates.add(related, 1);
                }
            }
        }

        ScoredProfile {
            profile: LikedProfile {
                liked: liked.into_iter().map(str::to_string).collect(),
                source: ProfileSource::Synthetic,
            },
            candidates,
        }
    }

    fn mode(&self) -> CollaborativeMode {
        CollaborativeMode::Degraded
    }
}

/// Collaborative recommendations on top of a [`CollaborativeSource`]
pub struct CollaborativeScorer {
    source: Box<dyn CollaborativeSource>,
    policy: CollaborativePolicy,
}

impl CollaborativeScorer {
    pub fn new(source: Box<dyn CollaborativeSource>, policy: CollaborativePolicy) -> Self {
        Self { source, policy }
    }

    /// Picks the strategy once, from whether the interaction tables were loaded
    pub fn from_data(data: Option<InteractionData>, policy: CollaborativePolicy) -> Self {
        match data {
            Some(data) => {
                let asymmetric = data.cooccurrences.asymmetric_pairs();
                if !asymmetric.is_empty() {
                    tracing::warn!(
                        pairs = asymmetric.len(),
                        example = ?asymmetric.first(),
                        "Co-occurrence table is not symmetric; scores depend on liked-song order"
                    );
                }
                Self::new(Box::new(InteractionSource::new(data)), policy)
            }
            None => {
                tracing::warn!("Interaction data unavailable, collaborative scoring runs in degraded mode");
                Self::new(Box::new(DegradedCollaborativeSource), policy)
            }
        }
    }

    pub fn mode(&self) -> CollaborativeMode {
        self.source.mode()
    }

    pub fn policy(&self) -> &CollaborativePolicy {
        &self.policy
    }

    /// Top co-occurring songs for a user. Never fails; may be empty.
    ///
    /// Candidates missing from the catalogue are skipped before the result is
    /// cut to `result_count`.
    pub fn recommend(&self, user_id: &str, catalogue: &Catalogue) -> CollaborativeRecommendations {
        let ScoredProfile {
            profile,
            candidates,
        } = self.source.score(user_id, catalogue, &self.policy);

        let recommendations: Vec<ScoredSong> = candidates
            .into_ranked()
            .into_iter()
            .filter_map(|(title, count)| {
                catalogue
                    .find(&title)
                    .map(|song| ScoredSong::new(song.clone(), count as f64))
            })
            .take(self.policy.result_count)
            .collect();

        tracing::info!(
            user_id,
            mode = ?self.mode(),
            liked = profile.liked.len(),
            recommendations = recommendations.len(),
            "Collaborative recommendations computed"
        );

        CollaborativeRecommendations {
            user_info: UserInfo {
                user_id: user_id.to_string(),
                num_liked_songs: profile.liked.len(),
                sample_liked_songs: profile
                    .liked
                    .iter()
                    .take(LIKED_SAMPLE_SIZE)
                    .cloned()
                    .collect(),
                profile: profile.source,
            },
            recommendations,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CooccurrenceTable, InteractionTable};
    use crate::models::song::fixtures::song;

    fn catalogue(titles: &[&str]) -> Catalogue {
        Catalogue::new(
            titles
                .iter()
                .map(|title| song(title, "pop", 2015, 50.0))
                .collect(),
        )
    }

    fn scorer(
        interactions: Vec<(&str, Vec<&str>)>,
        cooccurrences: Vec<(&str, Vec<(&str, u32)>)>,
    ) -> CollaborativeScorer {
        let data = InteractionData {
            interactions: interactions.into_iter().collect::<InteractionTable>(),
            cooccurrences: CooccurrenceTable::from_entries(cooccurrences),
        };
        CollaborativeScorer::from_data(Some(data), CollaborativePolicy::default())
    }

    fn titles(result: &CollaborativeRecommendations) -> Vec<&str> {
        result.recommendations.iter().map(ScoredSong::title).collect()
    }

    #[test]
    fn test_known_user_ranks_by_cooccurrence() {
        let scorer = scorer(vec![("u1", vec!["A"])], vec![("A", vec![("B", 3), ("C", 1)])]);
        let catalogue = catalogue(&["A", "B", "C"]);

        let result = scorer.recommend("u1", &catalogue);

        assert_eq!(titles(&result), vec!["B", "C"]);
        assert_eq!(result.recommendations[0].score, 3.0);
        assert_eq!(result.recommendations[1].score, 1.0);
        assert_eq!(result.user_info.num_liked_songs, 1);
        assert_eq!(result.user_info.sample_liked_songs, vec!["A"]);
        assert_eq!(result.user_info.profile, ProfileSource::Known);
    }

    #[test]
    fn test_counts_sum_across_liked_songs_and_skip_liked() {
        let scorer = scorer(
            vec![("u1", vec!["A", "B"])],
            vec![
                ("A", vec![("B", 5), ("C", 2), ("D", 3)]),
                ("B", vec![("A", 5), ("C", 2)]),
            ],
        );
        let catalogue = catalogue(&["A", "B", "C", "D"]);

        let result = scorer.recommend("u1", &catalogue);

        assert_eq!(titles(&result), vec!["C", "D"]);
        assert_eq!(result.recommendations[0].score, 4.0);
    }

    #[test]
    fn test_ties_keep_first_encountered_order() {
        let scorer = scorer(
            vec![("u1", vec!["A", "B"])],
            vec![("A", vec![("D", 2), ("C", 1)]), ("B", vec![("C", 1), ("E", 2)])],
        );
        let catalogue = catalogue(&["A", "B", "C", "D", "E"]);

        let result = scorer.recommend("u1", &catalogue);

        assert_eq!(titles(&result), vec!["D", "C", "E"]);
    }

    #[test]
    fn test_truncates_to_result_count_after_skipping_unknown_titles() {
        let related: Vec<(&str, u32)> =
            vec![("Ghost", 9), ("B", 7), ("C", 6), ("D", 5), ("E", 4), ("F", 3), ("G", 2)];
        let scorer = scorer(vec![("u1", vec!["A"])], vec![("A", related)]);
        let catalogue = catalogue(&["A", "B", "C", "D", "E", "F", "G"]);

        let result = scorer.recommend("u1", &catalogue);

        assert_eq!(titles(&result), vec!["B", "C", "D", "E", "F"]);
    }

    #[test]
    fn test_unknown_user_borrows_deterministically() {
        let scorer = scorer(
            vec![
                ("u1", vec!["A", "B", "C", "D", "E", "F", "G"]),
                ("u2", vec!["B", "C"]),
                ("u3", vec!["D"]),
            ],
            vec![
                ("A", vec![("H", 2)]),
                ("B", vec![("H", 1), ("I", 4)]),
                ("C", vec![("I", 1)]),
                ("D", vec![("J", 3)]),
            ],
        );
        let catalogue = catalogue(&["A", "B", "C", "D", "E", "F", "G", "H", "I", "J"]);

        let first = scorer.recommend("stranger", &catalogue);
        let second = scorer.recommend("stranger", &catalogue);

        assert_eq!(first, second);
        assert!(matches!(first.user_info.profile, ProfileSource::Borrowed { .. }));
        assert!(first.user_info.num_liked_songs <= 5);
        assert!(first.user_info.sample_liked_songs.len() <= 3);
    }

    #[test]
    fn test_borrowed_profile_comes_from_donor() {
        let scorer = scorer(
            vec![("u1", vec!["A", "B", "C", "D", "E", "F", "G"])],
            vec![],
        );
        let catalogue = catalogue(&["A", "B", "C", "D", "E", "F", "G"]);

        let result = scorer.recommend("someone-new", &catalogue);

        assert_eq!(
            result.user_info.profile,
            ProfileSource::Borrowed {
                from_user: "u1".to_string()
            }
        );
        assert_eq!(result.user_info.num_liked_songs, 5);
        assert!(result.recommendations.is_empty());
    }

    #[test]
    fn test_empty_table_yields_empty_result() {
        let scorer = scorer(vec![], vec![]);
        let catalogue = catalogue(&["A", "B"]);

        let result = scorer.recommend("anyone", &catalogue);

        assert!(result.recommendations.is_empty());
        assert_eq!(result.user_info.num_liked_songs, 0);
        assert_eq!(result.user_info.profile, ProfileSource::Unresolved);
    }

    #[test]
    fn test_degraded_mode_is_deterministic_per_user() {
        let scorer = CollaborativeScorer::from_data(None, CollaborativePolicy::default());
        let titles: Vec<String> = (0..50).map(|i| format!("Song {}", i)).collect();
        let names: Vec<&str> = titles.iter().map(String::as_str).collect();
        let catalogue = catalogue(&names);

        let first = scorer.recommend("user_123", &catalogue);
        let second = scorer.recommend("user_123", &catalogue);

        assert_eq!(scorer.mode(), CollaborativeMode::Degraded);
        assert_eq!(first, second);
        assert_eq!(first.user_info.profile, ProfileSource::Synthetic);
        assert_eq!(first.user_info.num_liked_songs, 10);
        assert_eq!(first.recommendations.len(), 5);

        let liked: HashSet<&String> = first.user_info.sample_liked_songs.iter().collect();
        assert!(first
            .recommendations
            .iter()
            .all(|r| !liked.contains(&r.song.title)));
    }

    #[test]
    fn test_degraded_mode_varies_between_users() {
        let scorer = CollaborativeScorer::from_data(None, CollaborativePolicy::default());
        let titles: Vec<String> = (0..50).map(|i| format!("Song {}", i)).collect();
        let names: Vec<&str> = titles.iter().map(String::as_str).collect();
        let catalogue = catalogue(&names);

        let a = scorer.recommend("alice", &catalogue);
        let b = scorer.recommend("bob", &catalogue);

        assert_ne!(a.user_info.sample_liked_songs, b.user_info.sample_liked_songs);
    }

    #[test]
    fn test_candidate_scores_accumulate() {
        let mut scores = CandidateScores::default();
        scores.add("B", 1);
        scores.add("C", 3);
        scores.add("B", 2);

        assert_eq!(scores.len(), 2);
        assert_eq!(scores.get("B"), Some(3));
        assert_eq!(
            scores.into_ranked(),
            vec![("B".to_string(), 3), ("C".to_string(), 3)]
        );
    }
}

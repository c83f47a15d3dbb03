use chrono::{DateTime, Utc};

use crate::{
    data::{DataProvider, InteractionData},
    error::{AppError, AppResult},
    models::{
        Catalogue, CollaborativeRecommendations, FeatureWeights, HybridRecommendations,
        HybridWeights, ScoredSong, Song, SongInfo,
    },
};

use super::{
    collaborative::{CollaborativeMode, CollaborativePolicy, CollaborativeScorer},
    hybrid, popularity,
    similarity::SimilarityEngine,
};

/// Read-only recommendation state built once at startup.
///
/// Owns the catalogue, the precomputed similarity matrix and the
/// collaborative scorer. Every query borrows it immutably, so one instance is
/// shared across request handlers behind an `Arc`.
pub struct RecommendationEngine {
    catalogue: Catalogue,
    similarity: SimilarityEngine,
    collaborative: CollaborativeScorer,
    loaded_at: DateTime<Utc>,
}

impl RecommendationEngine {
    pub fn new(
        songs: Vec<Song>,
        interactions: Option<InteractionData>,
        policy: CollaborativePolicy,
    ) -> Self {
        let catalogue = Catalogue::new(songs);
        let similarity = SimilarityEngine::new(&catalogue);
        let collaborative = CollaborativeScorer::from_data(interactions, policy);

        tracing::info!(
            songs = catalogue.len(),
            collaborative_mode = ?collaborative.mode(),
            "Recommendation engine ready"
        );

        Self {
            catalogue,
            similarity,
            collaborative,
            loaded_at: Utc::now(),
        }
    }

    /// Loads everything from `provider` and builds the engine.
    ///
    /// A missing or unreadable catalogue is fatal. Missing interaction tables
    /// only switch collaborative scoring to degraded mode.
    pub async fn bootstrap(
        provider: &dyn DataProvider,
        policy: CollaborativePolicy,
    ) -> AppResult<Self> {
        tracing::info!(provider = provider.name(), "Loading recommendation data");

        let songs = provider.load_catalogue().await?;
        if songs.is_empty() {
            return Err(AppError::DataLoad("Song catalogue is empty".to_string()));
        }

        let interactions = provider.load_interactions().await?;

        Ok(Self::new(songs, interactions, policy))
    }

    pub fn catalogue(&self) -> &Catalogue {
        &self.catalogue
    }

    pub fn collaborative_mode(&self) -> CollaborativeMode {
        self.collaborative.mode()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Songs most similar to `title` by audio features
    pub fn content_based(
        &self,
        title: &str,
        limit: usize,
        weights: Option<&FeatureWeights>,
    ) -> AppResult<Vec<ScoredSong>> {
        let results = self
            .similarity
            .similar_songs(&self.catalogue, title, limit, weights)?;

        tracing::debug!(
            title,
            limit,
            weighted = weights.is_some_and(|w| !w.is_empty()),
            results = results.len(),
            "Content-based recommendations computed"
        );

        Ok(results)
    }

    pub fn genre_artist(
        &self,
        genre: Option<&str>,
        artist: Option<&str>,
        limit: usize,
    ) -> AppResult<Vec<Song>> {
        popularity::by_genre_artist(&self.catalogue, genre, artist, limit)
    }

    pub fn collaborative(&self, user_id: &str) -> CollaborativeRecommendations {
        self.collaborative.recommend(user_id, &self.catalogue)
    }

    /// Content and collaborative results for one song and one user, blended.
    ///
    /// The content side contributes up to `limit` candidates, the
    /// collaborative side its configured result count.
    pub fn hybrid(
        &self,
        title: &str,
        user_id: &str,
        weights: HybridWeights,
        limit: usize,
    ) -> AppResult<HybridRecommendations> {
        let content = self.content_based(title, limit, None)?;
        let collaborative = self.collaborative(user_id);

        let recommendations = hybrid::combine(
            &content,
            &collaborative.recommendations,
            weights,
            limit,
        );

        tracing::info!(
            title,
            user_id,
            content_weight = weights.content_weight,
            collab_weight = weights.collab_weight,
            content_candidates = content.len(),
            collab_candidates = collaborative.recommendations.len(),
            results = recommendations.len(),
            "Hybrid recommendations computed"
        );

        Ok(HybridRecommendations {
            user_info: collaborative.user_info,
            song_info: SongInfo {
                title: title.to_string(),
            },
            recommendations,
            weights,
        })
    }

    pub fn popular(&self, year: Option<&str>, genre: Option<&str>, limit: usize) -> Vec<Song> {
        popularity::popular(&self.catalogue, year, genre, limit)
    }
}

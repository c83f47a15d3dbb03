use serde::{Deserialize, Serialize};

use super::Song;

/// A recommended song with the score that ranked it
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ScoredSong {
    #[serde(flatten)]
    pub song: Song,
    pub score: f64,
}

impl ScoredSong {
    pub fn new(song: Song, score: f64) -> Self {
        Self { song, score }
    }

    pub fn title(&self) -> &str {
        &self.song.title
    }
}

/// Where the liked songs behind a collaborative recommendation came from
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProfileSource {
    /// The user exists in the interaction table
    Known,
    /// Unknown user; liked songs were borrowed from another user's profile
    Borrowed { from_user: String },
    /// Interaction data is unavailable; liked songs were synthesized
    Synthetic,
    /// Unknown user and nobody to borrow from
    Unresolved,
}

/// Transparency metadata returned with collaborative recommendations
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserInfo {
    pub user_id: String,
    pub num_liked_songs: usize,
    pub sample_liked_songs: Vec<String>,
    pub profile: ProfileSource,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CollaborativeRecommendations {
    pub user_info: UserInfo,
    pub recommendations: Vec<ScoredSong>,
}

/// Blend factors for the hybrid strategy.
///
/// Not required to sum to 1; negative values are accepted but meaningless.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct HybridWeights {
    #[serde(default = "default_content_weight")]
    pub content_weight: f64,
    #[serde(default = "default_collab_weight")]
    pub collab_weight: f64,
}

fn default_content_weight() -> f64 {
    0.7
}

fn default_collab_weight() -> f64 {
    0.3
}

impl Default for HybridWeights {
    fn default() -> Self {
        Self {
            content_weight: default_content_weight(),
            collab_weight: default_collab_weight(),
        }
    }
}

impl HybridWeights {
    pub fn new(content_weight: f64, collab_weight: f64) -> Self {
        Self {
            content_weight,
            collab_weight,
        }
    }
}

/// A hybrid recommendation with the contribution of each sub-system
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HybridScoredSong {
    #[serde(flatten)]
    pub song: Song,
    pub score: f64,
    pub content_score: f64,
    pub collab_score: f64,
    pub content_weight: f64,
    pub collab_weight: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SongInfo {
    pub title: String,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct HybridRecommendations {
    pub user_info: UserInfo,
    pub song_info: SongInfo,
    pub recommendations: Vec<HybridScoredSong>,
    pub weights: HybridWeights,
}

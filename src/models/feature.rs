use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Display;

use crate::error::{AppError, AppResult};

/// Number of numeric song attributes used for similarity
pub const FEATURE_COUNT: usize = 10;

/// Numeric song attribute.
///
/// Deserializes from the internal lowercase names as well as the short column
/// names used by the catalogue CSV (`BPM`, `Energy`, ...), so weight maps written
/// against either vocabulary are accepted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Feature {
    #[serde(alias = "BPM", alias = "bpm", alias = "Tempo")]
    Tempo,
    #[serde(alias = "Energy")]
    Energy,
    #[serde(alias = "Danceability")]
    Danceability,
    #[serde(alias = "Loudness", alias = "Loudness/dB")]
    Loudness,
    #[serde(alias = "Liveness")]
    Liveness,
    #[serde(alias = "Valence")]
    Valence,
    #[serde(alias = "Length")]
    Length,
    #[serde(alias = "Acousticness")]
    Acousticness,
    #[serde(alias = "Speechiness")]
    Speechiness,
    #[serde(alias = "Popularity")]
    Popularity,
}

impl Feature {
    /// All features in column order of the feature matrix
    pub const ALL: [Feature; FEATURE_COUNT] = [
        Feature::Tempo,
        Feature::Energy,
        Feature::Danceability,
        Feature::Loudness,
        Feature::Liveness,
        Feature::Valence,
        Feature::Length,
        Feature::Acousticness,
        Feature::Speechiness,
        Feature::Popularity,
    ];

    /// Column index in the feature matrix
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Feature::Tempo => "tempo",
            Feature::Energy => "energy",
            Feature::Danceability => "danceability",
            Feature::Loudness => "loudness",
            Feature::Liveness => "liveness",
            Feature::Valence => "valence",
            Feature::Length => "length",
            Feature::Acousticness => "acousticness",
            Feature::Speechiness => "speechiness",
            Feature::Popularity => "popularity",
        }
    }
}

impl Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-request multipliers applied to normalized feature columns
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeatureWeights(BTreeMap<Feature, f64>);

impl FeatureWeights {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the multiplier for a feature, replacing any previous value
    pub fn with(mut self, feature: Feature, weight: f64) -> Self {
        self.0.insert(feature, weight);
        self
    }

    /// Multiplier for a feature; unweighted features keep a factor of 1
    pub fn get(&self, feature: Feature) -> f64 {
        self.0.get(&feature).copied().unwrap_or(1.0)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Feature, f64)> + '_ {
        self.0.iter().map(|(feature, weight)| (*feature, *weight))
    }

    /// Parses a JSON object such as `{"energy": 1.5, "Danceability": 2}`.
    ///
    /// Unknown feature names and non-numeric weights are rejected.
    pub fn from_json(raw: &str) -> AppResult<Self> {
        let weights: FeatureWeights = serde_json::from_str(raw)
            .map_err(|e| AppError::InvalidInput(format!("Invalid feature weights: {}", e)))?;

        if let Some((feature, weight)) = weights.iter().find(|(_, w)| !w.is_finite()) {
            return Err(AppError::InvalidInput(format!(
                "Weight for {} must be finite, got {}",
                feature, weight
            )));
        }

        Ok(weights)
    }
}

impl FromIterator<(Feature, f64)> for FeatureWeights {
    fn from_iter<T: IntoIterator<Item = (Feature, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

use serde::{Deserialize, Serialize};

use super::{Feature, FEATURE_COUNT};

/// A catalogue track.
///
/// Field aliases cover both the verbose headers of the top-50 (2010-2019) CSV
/// export and the short column names, so either layout deserializes directly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Song {
    #[serde(alias = "Title")]
    pub title: String,
    #[serde(alias = "Artist")]
    pub artist: String,
    #[serde(alias = "the genre of the track", alias = "top genre", alias = "Genre")]
    pub genre: String,
    #[serde(alias = "Year")]
    pub year: i32,
    #[serde(
        alias = "Beats.Per.Minute -The tempo of the song",
        alias = "Beats.Per.Minute",
        alias = "BPM",
        alias = "bpm"
    )]
    pub tempo: f64,
    #[serde(
        alias = "Energy- The energy of a song - the higher the value, the more energtic",
        alias = "Energy",
        alias = "nrgy"
    )]
    pub energy: f64,
    #[serde(
        alias = "Danceability - The higher the value, the easier it is to dance to this song",
        alias = "Danceability",
        alias = "dnce"
    )]
    pub danceability: f64,
    #[serde(
        alias = "Loudness/dB - The higher the value, the louder the song",
        alias = "Loudness/dB",
        alias = "Loudness",
        alias = "dB"
    )]
    pub loudness: f64,
    #[serde(
        alias = "Liveness - The higher the value, the more likely the song is a live recording",
        alias = "Liveness",
        alias = "live"
    )]
    pub liveness: f64,
    #[serde(
        alias = "Valence - The higher the value, the more positive mood for the song",
        alias = "Valence",
        alias = "val"
    )]
    pub valence: f64,
    #[serde(alias = "Length - The duration of the song", alias = "Length", alias = "dur")]
    pub length: f64,
    #[serde(
        alias = "Acousticness - The higher the value the more acoustic the song is",
        alias = "Acousticness",
        alias = "acous"
    )]
    pub acousticness: f64,
    #[serde(
        alias = "Speechiness - The higher the value the more spoken word the song contains",
        alias = "Speechiness",
        alias = "spch"
    )]
    pub speechiness: f64,
    #[serde(
        alias = "Popularity- The higher the value the more popular the song is",
        alias = "Popularity",
        alias = "pop"
    )]
    pub popularity: f64,
}

impl Song {
    /// Raw (unnormalized) value of a numeric attribute
    pub fn feature(&self, feature: Feature) -> f64 {
        match feature {
            Feature::Tempo => self.tempo,
            Feature::Energy => self.energy,
            Feature::Danceability => self.danceability,
            Feature::Loudness => self.loudness,
            Feature::Liveness => self.liveness,
            Feature::Valence => self.valence,
            Feature::Length => self.length,
            Feature::Acousticness => self.acousticness,
            Feature::Speechiness => self.speechiness,
            Feature::Popularity => self.popularity,
        }
    }

    /// Raw attribute values in feature-matrix column order
    pub fn feature_vector(&self) -> [f64; FEATURE_COUNT] {
        Feature::ALL.map(|feature| self.feature(feature))
    }
}

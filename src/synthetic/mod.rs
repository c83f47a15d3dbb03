//! Offline generator for the collaborative lookup tables.
//!
//! Simulated users pick liked songs with probabilities shaped by popularity,
//! their taste profile and their activity level. Co-occurrence counts are then
//! derived from every pair of songs liked by the same user, which makes the
//! resulting table symmetric.

pub mod profiles;

use std::{
    collections::BTreeMap,
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use rand::Rng;
use serde::Serialize;

use crate::{error::AppResult, models::Song};

pub use profiles::{create_user_profiles, Affinity, TasteProfile, UserProfile, TASTE_PROFILES};

pub const INTERACTIONS_FILE: &str = "user_song_interactions.json";
pub const COOCCURRENCES_FILE: &str = "song_cooccurrences.json";
pub const PROFILES_FILE: &str = "user_profiles.json";

const MIN_LIKED_SONGS: usize = 5;
const PREFERRED_GENRE_BOOST: f64 = 3.0;
const FEATURE_AFFINITY_SCALE: f64 = 0.2;
const RECENCY_AFFINITY_SCALE: f64 = 0.3;
const FIRST_YEAR: i32 = 2010;
const YEAR_SPAN: f64 = 9.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorSettings {
    pub users: usize,
    /// Average share of the catalogue each user likes
    pub density: f64,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            users: 200,
            density: 0.1,
        }
    }
}

pub type InteractionMap = BTreeMap<String, Vec<String>>;
pub type CooccurrenceMap = BTreeMap<String, BTreeMap<String, u32>>;

/// Everything one generator run produces
#[derive(Debug, Clone, PartialEq)]
pub struct SyntheticDataset {
    pub profiles: Vec<UserProfile>,
    pub interactions: InteractionMap,
    pub cooccurrences: CooccurrenceMap,
}

impl SyntheticDataset {
    pub fn total_interactions(&self) -> usize {
        self.interactions.values().map(Vec::len).sum()
    }

    /// Writes the three JSON files into `dir` and returns their paths
    pub fn write_to(&self, dir: &Path) -> AppResult<Vec<PathBuf>> {
        std::fs::create_dir_all(dir)?;

        Ok(vec![
            write_json(&dir.join(INTERACTIONS_FILE), &self.interactions)?,
            write_json(&dir.join(COOCCURRENCES_FILE), &self.cooccurrences)?,
            write_json(&dir.join(PROFILES_FILE), &self.profiles)?,
        ])
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> AppResult<PathBuf> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writer.flush()?;
    tracing::debug!(path = %path.display(), "Wrote generator output");
    Ok(path.to_path_buf())
}

/// Relative like probability of every song for one user, scaled so the
/// likeliest song is 1.
///
/// Starts from popularity / 100, adds `0.2 * weight * value / column max` per
/// feature affinity and `0.3 * weight * (year - 2010) / 9` for recency, then
/// triples songs in a preferred genre and scales by activity. Negative
/// results are floored at 0.
pub fn like_probabilities(songs: &[Song], user: &UserProfile) -> Vec<f64> {
    let mut probabilities: Vec<f64> = songs.iter().map(|s| s.popularity / 100.0).collect();

    for &(affinity, weight) in &user.affinities {
        match affinity {
            Affinity::Recency => {
                for (p, song) in probabilities.iter_mut().zip(songs) {
                    let recency = f64::from(song.year - FIRST_YEAR) / YEAR_SPAN;
                    *p += weight * recency * RECENCY_AFFINITY_SCALE;
                }
            }
            Affinity::Feature(feature) => {
                let max = songs
                    .iter()
                    .map(|s| s.feature(feature))
                    .fold(f64::NEG_INFINITY, f64::max);
                if max == 0.0 || !max.is_finite() {
                    continue;
                }
                for (p, song) in probabilities.iter_mut().zip(songs) {
                    *p += weight * (song.feature(feature) / max) * FEATURE_AFFINITY_SCALE;
                }
            }
        }
    }

    for (p, song) in probabilities.iter_mut().zip(songs) {
        let boost = if user.prefers_genre(&song.genre) {
            PREFERRED_GENRE_BOOST
        } else {
            1.0
        };
        *p = (*p * boost * user.activity_level).max(0.0);
    }

    let max = probabilities.iter().copied().fold(0.0, f64::max);
    if max > 0.0 {
        for p in &mut probabilities {
            *p /= max;
        }
    }

    probabilities
}

/// How many songs a user likes: `⌊len · density · activity⌋`, at least 5 but
/// never more than half the catalogue
pub fn interaction_count(catalogue_len: usize, density: f64, activity_level: f64) -> usize {
    let raw = (catalogue_len as f64 * density * activity_level).floor().max(0.0) as usize;
    raw.max(MIN_LIKED_SONGS).min(catalogue_len / 2)
}

/// Weighted sampling of `amount` distinct positions.
///
/// Each position draws the key `u^(1/w)` and the largest keys win, so a
/// position's chance grows with its weight. Zero weights are only picked once
/// every positive weight is taken.
pub fn weighted_sample<R: Rng + ?Sized>(weights: &[f64], amount: usize, rng: &mut R) -> Vec<usize> {
    let mut keyed: Vec<(f64, usize)> = weights
        .iter()
        .enumerate()
        .map(|(position, &weight)| {
            let u: f64 = rng.random();
            let key = if weight > 0.0 { u.powf(1.0 / weight) } else { -1.0 };
            (key, position)
        })
        .collect();

    keyed.sort_by(|a, b| b.0.total_cmp(&a.0));
    keyed.into_iter().take(amount).map(|(_, position)| position).collect()
}

/// Counts, for every ordered pair of distinct songs, how many users liked both
pub fn cooccurrences(interactions: &InteractionMap) -> CooccurrenceMap {
    let mut table = CooccurrenceMap::new();

    for liked in interactions.values() {
        for song in liked {
            for other in liked {
                if song != other {
                    *table
                        .entry(song.clone())
                        .or_default()
                        .entry(other.clone())
                        .or_default() += 1;
                }
            }
        }
    }

    table
}

/// Runs the whole simulation over `songs`
pub fn generate<R: Rng + ?Sized>(
    songs: &[Song],
    settings: GeneratorSettings,
    rng: &mut R,
) -> SyntheticDataset {
    let profiles = create_user_profiles(settings.users, rng);

    let interactions: InteractionMap = profiles
        .iter()
        .map(|user| {
            let probabilities = like_probabilities(songs, user);
            let amount = interaction_count(songs.len(), settings.density, user.activity_level);
            let liked = weighted_sample(&probabilities, amount, rng)
                .into_iter()
                .map(|position| songs[position].title.clone())
                .collect();
            (user.user_id.clone(), liked)
        })
        .collect();

    let cooccurrences = cooccurrences(&interactions);

    tracing::info!(
        users = profiles.len(),
        songs = songs.len(),
        interactions = interactions.values().map(Vec::len).sum::<usize>(),
        related_songs = cooccurrences.len(),
        "Synthetic interactions generated"
    );

    SyntheticDataset {
        profiles,
        interactions,
        cooccurrences,
    }
}

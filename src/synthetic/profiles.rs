use std::collections::BTreeMap;

use rand::{seq::IndexedRandom, Rng};
use serde::Serialize;

use crate::models::Feature;

/// Lowest and highest activity multiplier a generated user can get
pub const ACTIVITY_RANGE: (f64, f64) = (0.5, 1.5);

/// Song attribute a taste profile leans towards
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Affinity {
    Feature(Feature),
    /// Newer release years
    Recency,
}

impl Affinity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Affinity::Feature(feature) => feature.as_str(),
            Affinity::Recency => "year",
        }
    }
}

/// A listener archetype users are drawn from
#[derive(Debug, Clone, Copy)]
pub struct TasteProfile {
    pub name: &'static str,
    pub genres: &'static [&'static str],
    pub affinities: &'static [(Affinity, f64)],
}

pub static TASTE_PROFILES: [TasteProfile; 9] = [
    TasteProfile {
        name: "Pop Lover",
        genres: &["pop", "dance pop"],
        affinities: &[
            (Affinity::Feature(Feature::Popularity), 1.0),
            (Affinity::Feature(Feature::Danceability), 0.8),
        ],
    },
    TasteProfile {
        name: "Hip Hop Fan",
        genres: &["hip hop", "detroit hip hop", "atl hip hop"],
        affinities: &[
            (Affinity::Feature(Feature::Energy), 0.9),
            (Affinity::Feature(Feature::Speechiness), 1.2),
        ],
    },
    TasteProfile {
        name: "Dance Music",
        genres: &["dance pop", "electronic", "edm"],
        affinities: &[
            (Affinity::Feature(Feature::Danceability), 1.5),
            (Affinity::Feature(Feature::Energy), 1.2),
        ],
    },
    TasteProfile {
        name: "Rock Enthusiast",
        genres: &["rock", "permanent wave", "celtic rock"],
        affinities: &[
            (Affinity::Feature(Feature::Energy), 1.1),
            (Affinity::Feature(Feature::Acousticness), 0.7),
        ],
    },
    TasteProfile {
        name: "R&B Lover",
        genres: &["r&b", "contemporary r&b", "canadian contemporary r&b"],
        affinities: &[
            (Affinity::Feature(Feature::Valence), 1.0),
            (Affinity::Feature(Feature::Speechiness), 0.8),
        ],
    },
    TasteProfile {
        name: "Pop Culture",
        genres: &["pop", "canadian pop", "australian pop"],
        affinities: &[(Affinity::Feature(Feature::Popularity), 1.3)],
    },
    TasteProfile {
        name: "New Music",
        genres: &["pop", "dance pop"],
        affinities: &[(Affinity::Recency, 1.2)],
    },
    TasteProfile {
        name: "Indie Fan",
        genres: &["indie pop", "alternative", "art pop"],
        affinities: &[
            (Affinity::Feature(Feature::Popularity), -0.5),
            (Affinity::Feature(Feature::Acousticness), 1.2),
        ],
    },
    TasteProfile {
        name: "All Music",
        genres: &[],
        affinities: &[(Affinity::Feature(Feature::Popularity), 0.8)],
    },
];

/// A generated user, as written to `user_profiles.json`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserProfile {
    pub user_id: String,
    pub profile_type: String,
    pub preferred_genres: Vec<String>,
    #[serde(serialize_with = "serialize_affinities")]
    pub affinities: Vec<(Affinity, f64)>,
    pub activity_level: f64,
}

impl UserProfile {
    pub fn from_taste(user_id: impl Into<String>, taste: &TasteProfile, activity_level: f64) -> Self {
        Self {
            user_id: user_id.into(),
            profile_type: taste.name.to_string(),
            preferred_genres: taste.genres.iter().map(|g| g.to_string()).collect(),
            affinities: taste.affinities.to_vec(),
            activity_level,
        }
    }

    pub fn prefers_genre(&self, genre: &str) -> bool {
        self.preferred_genres.iter().any(|g| g == genre)
    }
}

fn serialize_affinities<S>(affinities: &[(Affinity, f64)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    affinities
        .iter()
        .map(|(affinity, weight)| (affinity.as_str(), *weight))
        .collect::<BTreeMap<_, _>>()
        .serialize(serializer)
}

/// `count` users named `user_001`, `user_002`, … each with a random
/// archetype and activity level
pub fn create_user_profiles<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<UserProfile> {
    (1..=count)
        .filter_map(|n| {
            let taste = TASTE_PROFILES.choose(rng)?;
            let activity = rng.random_range(ACTIVITY_RANGE.0..ACTIVITY_RANGE.1);
            Some(UserProfile::from_taste(format!("user_{:03}", n), taste, activity))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_profiles_are_numbered_and_bounded() {
        let mut rng = StdRng::seed_from_u64(7);
        let profiles = create_user_profiles(12, &mut rng);

        assert_eq!(profiles.len(), 12);
        assert_eq!(profiles[0].user_id, "user_001");
        assert_eq!(profiles[11].user_id, "user_012");
        for profile in &profiles {
            assert!(profile.activity_level >= ACTIVITY_RANGE.0);
            assert!(profile.activity_level < ACTIVITY_RANGE.1);
            assert!(TASTE_PROFILES.iter().any(|t| t.name == profile.profile_type));
        }
    }

    #[test]
    fn test_same_seed_same_profiles() {
        let a = create_user_profiles(20, &mut StdRng::seed_from_u64(42));
        let b = create_user_profiles(20, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_profile_serializes_named_weights() {
        let profile = UserProfile::from_taste("user_001", &TASTE_PROFILES[6], 1.0);
        let json = serde_json::to_value(&profile).unwrap();

        assert_eq!(json["profile_type"], "New Music");
        assert_eq!(json["affinities"]["year"], 1.2);
        assert_eq!(json["preferred_genres"][1], "dance pop");
    }
}

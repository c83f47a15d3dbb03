use serde::Deserialize;

use crate::services::CollaborativePolicy;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Song catalogue CSV
    #[serde(default = "default_catalogue_path")]
    pub catalogue_path: String,

    /// User → liked songs table produced by the interaction generator
    #[serde(default = "default_interactions_path")]
    pub interactions_path: String,

    /// Song → related song co-occurrence counts
    #[serde(default = "default_cooccurrences_path")]
    pub cooccurrences_path: String,

    /// Number of collaborative recommendations returned per user
    #[serde(default = "default_collaborative_result_count")]
    pub collaborative_result_count: usize,

    /// How many liked songs an unknown user borrows from a fallback user
    #[serde(default = "default_fallback_profile_size")]
    pub fallback_profile_size: usize,

    /// Liked songs synthesized per user when interaction files are missing
    #[serde(default = "default_degraded_liked_count")]
    pub degraded_liked_count: usize,

    /// Related songs synthesized per liked song when interaction files are missing
    #[serde(default = "default_degraded_related_per_song")]
    pub degraded_related_per_song: usize,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_catalogue_path() -> String {
    "top50MusicFrom2010-2019.csv".to_string()
}

fn default_interactions_path() -> String {
    "user_song_interactions.json".to_string()
}

fn default_cooccurrences_path() -> String {
    "song_cooccurrences.json".to_string()
}

fn default_collaborative_result_count() -> usize {
    5
}

fn default_fallback_profile_size() -> usize {
    5
}

fn default_degraded_liked_count() -> usize {
    10
}

fn default_degraded_related_per_song() -> usize {
    5
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn collaborative_policy(&self) -> CollaborativePolicy {
        CollaborativePolicy {
            result_count: self.collaborative_result_count,
            fallback_profile_size: self.fallback_profile_size,
            degraded_liked_count: self.degraded_liked_count,
            degraded_related_per_song: self.degraded_related_per_song,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_environment() {
        let config: Config = envy::from_iter(Vec::<(String, String)>::new()).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.bind_address(), "127.0.0.1:3000");
        assert_eq!(config.collaborative_result_count, 5);
        assert_eq!(config.degraded_liked_count, 10);
    }

    #[test]
    fn test_overrides_from_environment() {
        let vars = vec![
            ("PORT".to_string(), "8080".to_string()),
            ("COLLABORATIVE_RESULT_COUNT".to_string(), "8".to_string()),
            ("CATALOGUE_PATH".to_string(), "/data/songs.csv".to_string()),
        ];
        let config: Config = envy::from_iter(vars).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.catalogue_path, "/data/songs.csv");

        let policy = config.collaborative_policy();
        assert_eq!(policy.result_count, 8);
        assert_eq!(policy.fallback_profile_size, 5);
    }
}

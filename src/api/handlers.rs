use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    error::{AppError, AppResult},
    models::{
        CollaborativeRecommendations, FeatureWeights, HybridRecommendations, HybridWeights,
        ScoredSong, Song,
    },
    services::CollaborativeMode,
};

use super::AppState;

const DEFAULT_LIMIT: usize = 5;

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn validate_limit(limit: usize) -> AppResult<usize> {
    if limit == 0 {
        return Err(AppError::InvalidInput("limit must be at least 1".to_string()));
    }
    Ok(limit)
}

// Request/Response types

#[derive(Debug, Deserialize)]
pub struct ContentBasedQuery {
    pub limit: Option<usize>,
    /// JSON object of feature name → weight
    pub weights: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenreArtistRequest {
    pub genre: Option<String>,
    pub artist: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

#[derive(Debug, Deserialize)]
pub struct HybridRequest {
    pub song_title: String,
    pub user_id: String,
    #[serde(flatten)]
    pub weights: HybridWeights,
    #[serde(default = "default_limit")]
    pub limit: usize,
}

#[derive(Debug, Deserialize)]
pub struct PopularQuery {
    pub year: Option<String>,
    pub genre: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub songs: usize,
    pub collaborative_mode: CollaborativeMode,
    pub loaded_at: DateTime<Utc>,
}

/// Catalogue fields returned by the filter-style strategies
#[derive(Debug, Serialize)]
pub struct SongSummary {
    pub title: String,
    pub artist: String,
    pub genre: String,
    pub year: i32,
    pub popularity: f64,
}

impl From<Song> for SongSummary {
    fn from(song: Song) -> Self {
        Self {
            title: song.title,
            artist: song.artist,
            genre: song.genre,
            year: song.year,
            popularity: song.popularity,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RecommendationsResponse<T> {
    pub recommendations: Vec<T>,
}

impl<T> From<Vec<T>> for RecommendationsResponse<T> {
    fn from(recommendations: Vec<T>) -> Self {
        Self { recommendations }
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let engine = &state.engine;
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy",
            songs: engine.catalogue().len(),
            collaborative_mode: engine.collaborative_mode(),
            loaded_at: engine.loaded_at(),
        }),
    )
}

/// Songs with the most similar audio features
pub async fn content_based(
    State(state): State<AppState>,
    Path(song_title): Path<String>,
    Query(query): Query<ContentBasedQuery>,
) -> AppResult<Json<RecommendationsResponse<ScoredSong>>> {
    let limit = validate_limit(query.limit.unwrap_or(DEFAULT_LIMIT))?;
    let weights = query
        .weights
        .as_deref()
        .map(FeatureWeights::from_json)
        .transpose()?;

    let recommendations = state
        .engine
        .content_based(&song_title, limit, weights.as_ref())?;
    Ok(Json(recommendations.into()))
}

/// Most popular songs of a genre and/or artist
pub async fn genre_artist(
    State(state): State<AppState>,
    Json(request): Json<GenreArtistRequest>,
) -> AppResult<Json<RecommendationsResponse<SongSummary>>> {
    let limit = validate_limit(request.limit)?;
    let songs = state.engine.genre_artist(
        request.genre.as_deref(),
        request.artist.as_deref(),
        limit,
    )?;

    let summaries: Vec<SongSummary> = songs.into_iter().map(SongSummary::from).collect();
    Ok(Json(summaries.into()))
}

/// Songs that co-occur with the user's liked songs
pub async fn collaborative(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<CollaborativeRecommendations> {
    Json(state.engine.collaborative(&user_id))
}

/// Weighted blend of content and collaborative results
pub async fn hybrid(
    State(state): State<AppState>,
    Json(request): Json<HybridRequest>,
) -> AppResult<Json<HybridRecommendations>> {
    let limit = validate_limit(request.limit)?;
    let recommendations =
        state
            .engine
            .hybrid(&request.song_title, &request.user_id, request.weights, limit)?;
    Ok(Json(recommendations))
}

/// Most popular songs, optionally by year and genre
pub async fn popular(
    State(state): State<AppState>,
    Query(query): Query<PopularQuery>,
) -> AppResult<Json<RecommendationsResponse<SongSummary>>> {
    let limit = validate_limit(query.limit.unwrap_or(DEFAULT_LIMIT))?;
    let songs = state
        .engine
        .popular(query.year.as_deref(), query.genre.as_deref(), limit);

    let summaries: Vec<SongSummary> = songs.into_iter().map(SongSummary::from).collect();
    Ok(Json(summaries.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_limit() {
        assert_eq!(validate_limit(3).unwrap(), 3);
        assert!(matches!(validate_limit(0), Err(AppError::InvalidInput(_))));
    }

    #[test]
    fn test_hybrid_request_defaults() {
        let request: HybridRequest =
            serde_json::from_str(r#"{"song_title": "Closer", "user_id": "user_1"}"#).unwrap();

        assert_eq!(request.weights, HybridWeights::default());
        assert_eq!(request.limit, DEFAULT_LIMIT);
    }

    #[test]
    fn test_hybrid_request_reads_flat_weights() {
        let request: HybridRequest = serde_json::from_str(
            r#"{"song_title": "Closer", "user_id": "user_1", "content_weight": 1.0, "collab_weight": 0.0, "limit": 3}"#,
        )
        .unwrap();

        assert_eq!(request.weights, HybridWeights::new(1.0, 0.0));
        assert_eq!(request.limit, 3);
    }
}

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::{
    config::Config,
    error::{AppError, AppResult},
    models::Song,
};

use super::{read_catalogue, CooccurrenceTable, InteractionData, InteractionTable};

/// Source of the reference data the recommendation engine is built from.
///
/// Everything is loaded once at startup; the engine never writes back.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DataProvider: Send + Sync {
    /// Load the song catalogue in its canonical order
    async fn load_catalogue(&self) -> AppResult<Vec<Song>>;

    /// Load the collaborative lookup tables.
    ///
    /// Returns `None` when the tables are unavailable, which puts the
    /// collaborative scorer in degraded mode.
    async fn load_interactions(&self) -> AppResult<Option<InteractionData>>;

    /// Provider name for logging
    fn name(&self) -> &'static str;
}

/// Reads the catalogue CSV and the generator's JSON tables from disk
#[derive(Debug, Clone)]
pub struct FileDataProvider {
    catalogue_path: PathBuf,
    interactions_path: PathBuf,
    cooccurrences_path: PathBuf,
}

impl FileDataProvider {
    pub fn new(
        catalogue_path: impl Into<PathBuf>,
        interactions_path: impl Into<PathBuf>,
        cooccurrences_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            catalogue_path: catalogue_path.into(),
            interactions_path: interactions_path.into(),
            cooccurrences_path: cooccurrences_path.into(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.catalogue_path,
            &config.interactions_path,
            &config.cooccurrences_path,
        )
    }
}

async fn read_file(path: &Path) -> AppResult<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|e| AppError::DataLoad(format!("Cannot read {}: {}", path.display(), e)))
}

#[async_trait]
impl DataProvider for FileDataProvider {
    async fn load_catalogue(&self) -> AppResult<Vec<Song>> {
        let bytes = read_file(&self.catalogue_path).await?;
        let songs = read_catalogue(bytes.as_slice())?;

        tracing::info!(
            path = %self.catalogue_path.display(),
            songs = songs.len(),
            "Catalogue loaded"
        );

        Ok(songs)
    }

    async fn load_interactions(&self) -> AppResult<Option<InteractionData>> {
        let interactions_exist = tokio::fs::try_exists(&self.interactions_path).await?;
        let cooccurrences_exist = tokio::fs::try_exists(&self.cooccurrences_path).await?;

        if !interactions_exist || !cooccurrences_exist {
            tracing::info!(
                interactions = %self.interactions_path.display(),
                interactions_exist,
                cooccurrences = %self.cooccurrences_path.display(),
                cooccurrences_exist,
                "Interaction files not found"
            );
            return Ok(None);
        }

        let interactions: InteractionTable =
            serde_json::from_slice(&read_file(&self.interactions_path).await?)?;
        let cooccurrences: CooccurrenceTable =
            serde_json::from_slice(&read_file(&self.cooccurrences_path).await?)?;

        tracing::info!(
            users = interactions.len(),
            songs_with_cooccurrences = cooccurrences.len(),
            "Interaction tables loaded"
        );

        Ok(Some(InteractionData {
            interactions,
            cooccurrences,
        }))
    }

    fn name(&self) -> &'static str {
        "files"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    const CATALOGUE_CSV: &str = "title,artist,genre,year,BPM,Energy,Danceability,Loudness,Liveness,Valence,Length,Acousticness,Speechiness,Popularity\n\
        Closer,The Chainsmokers,edm,2016,95,52,75,-6,11,66,245,41,3,86\n\
        Sorry,Justin Bieber,canadian pop,2015,100,76,65,-4,30,41,201,8,5,80\n";

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[tokio::test]
    async fn test_loads_catalogue_from_file() {
        let dir = TempDir::new().unwrap();
        let catalogue = write_file(&dir, "songs.csv", CATALOGUE_CSV);
        let provider = FileDataProvider::new(
            catalogue,
            dir.path().join("users.json"),
            dir.path().join("cooc.json"),
        );

        let songs = provider.load_catalogue().await.unwrap();
        assert_eq!(songs.len(), 2);
        assert_eq!(songs[1].title, "Sorry");
    }

    #[tokio::test]
    async fn test_missing_catalogue_is_a_load_error() {
        let dir = TempDir::new().unwrap();
        let provider = FileDataProvider::new(
            dir.path().join("absent.csv"),
            dir.path().join("users.json"),
            dir.path().join("cooc.json"),
        );

        let result = provider.load_catalogue().await;
        assert!(matches!(result, Err(AppError::DataLoad(_))));
    }

    #[tokio::test]
    async fn test_missing_interaction_file_means_no_tables() {
        let dir = TempDir::new().unwrap();
        let interactions = write_file(&dir, "users.json", r#"{"u1": ["Closer"]}"#);
        let provider = FileDataProvider::new(
            dir.path().join("songs.csv"),
            interactions,
            dir.path().join("cooc.json"),
        );

        let data = tokio_test::assert_ok!(provider.load_interactions().await);
        assert!(data.is_none());
    }

    #[tokio::test]
    async fn test_loads_both_tables() {
        let dir = TempDir::new().unwrap();
        let interactions = write_file(&dir, "users.json", r#"{"u1": ["Closer"]}"#);
        let cooccurrences = write_file(
            &dir,
            "cooc.json",
            r#"{"Closer": {"Sorry": 2}, "Sorry": {"Closer": 2}}"#,
        );
        let provider =
            FileDataProvider::new(dir.path().join("songs.csv"), interactions, cooccurrences);

        let data = provider.load_interactions().await.unwrap().unwrap();
        assert_eq!(data.interactions.liked("u1").unwrap(), ["Closer"]);
        assert_eq!(
            data.cooccurrences.related("Closer").collect::<Vec<_>>(),
            vec![("Sorry", 2)]
        );
    }

    #[tokio::test]
    async fn test_malformed_table_is_an_error() {
        let dir = TempDir::new().unwrap();
        let interactions = write_file(&dir, "users.json", r#"["not", "a", "map"]"#);
        let cooccurrences = write_file(&dir, "cooc.json", "{}");
        let provider =
            FileDataProvider::new(dir.path().join("songs.csv"), interactions, cooccurrences);

        let result = provider.load_interactions().await;
        assert!(matches!(result, Err(AppError::Json(_))));
    }
}

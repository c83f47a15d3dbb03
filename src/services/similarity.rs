use crate::{
    error::{AppError, AppResult},
    models::{Catalogue, FeatureWeights, ScoredSong},
};

use super::normalizer::FeatureMatrix;

/// Cosine similarity of two vectors; 0 when either has zero length
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a * norm_b)
}

/// Symmetric song-to-song cosine similarity over catalogue positions
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    size: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    pub fn from_features(features: &FeatureMatrix) -> Self {
        let size = features.len();
        let mut values = vec![0.0; size * size];

        for i in 0..size {
            for j in i..size {
                let similarity = cosine_similarity(features.row(i), features.row(j));
                values[i * size + j] = similarity;
                values[j * size + i] = similarity;
            }
        }

        Self { size, values }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size + j]
    }

    pub fn row(&self, position: usize) -> &[f64] {
        &self.values[position * self.size..(position + 1) * self.size]
    }
}

/// Content-based recommendations from normalized song features
#[derive(Debug, Clone)]
pub struct SimilarityEngine {
    features: FeatureMatrix,
    matrix: SimilarityMatrix,
}

impl SimilarityEngine {
    /// Normalizes the catalogue and precomputes the unweighted similarity matrix
    pub fn new(catalogue: &Catalogue) -> Self {
        let features = FeatureMatrix::normalize(catalogue.songs());
        let matrix = SimilarityMatrix::from_features(&features);
        Self { features, matrix }
    }

    pub fn features(&self) -> &FeatureMatrix {
        &self.features
    }

    pub fn matrix(&self) -> &SimilarityMatrix {
        &self.matrix
    }

    /// Songs most similar to `title`, best first, never including `title` itself.
    ///
    /// With non-empty `weights` the scores come from a reweighted copy of the
    /// feature matrix that lives only for this call. Equal scores keep
    /// catalogue order.
    pub fn similar_songs(
        &self,
        catalogue: &Catalogue,
        title: &str,
        limit: usize,
        weights: Option<&FeatureWeights>,
    ) -> AppResult<Vec<ScoredSong>> {
        let target = catalogue
            .position(title)
            .ok_or_else(|| AppError::NotFound("Song not found".to_string()))?;

        let scores: Vec<f64> = match weights.filter(|w| !w.is_empty()) {
            Some(weights) => {
                let weighted = self.features.reweighted(weights);
                let target_row = weighted.row(target);
                weighted
                    .rows()
                    .iter()
                    .map(|row| cosine_similarity(target_row, row))
                    .collect()
            }
            None => self.matrix.row(target).to_vec(),
        };

        let mut ranked: Vec<(usize, f64)> = scores
            .into_iter()
            .enumerate()
            .filter(|(position, _)| *position != target)
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(limit);

        Ok(ranked
            .into_iter()
            .filter_map(|(position, score)| {
                catalogue
                    .get(position)
                    .map(|song| ScoredSong::new(song.clone(), score))
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{song::fixtures::song_with_features, Feature};

    fn catalogue() -> Catalogue {
        Catalogue::new(vec![
            song_with_features("Seed", 100.0, 90.0, 10.0),
            song_with_features("Twin", 100.0, 90.0, 10.0),
            song_with_features("Near", 110.0, 80.0, 20.0),
            song_with_features("Far", 180.0, 10.0, 90.0),
            song_with_features("Middle", 140.0, 50.0, 50.0),
        ])
    }

    fn titles(results: &[ScoredSong]) -> Vec<&str> {
        results.iter().map(ScoredSong::title).collect()
    }

    #[test]
    fn test_cosine_similarity_basics() {
        assert!((cosine_similarity(&[1.0, 0.0], &[1.0, 0.0]) - 1.0).abs() < 1e-12);
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    #[test]
    fn test_matrix_is_symmetric() {
        let engine = SimilarityEngine::new(&catalogue());
        let matrix = engine.matrix();
        for i in 0..matrix.size() {
            for j in 0..matrix.size() {
                assert_eq!(matrix.get(i, j), matrix.get(j, i));
            }
        }
    }

    #[test]
    fn test_similar_songs_rank_by_similarity() {
        let catalogue = catalogue();
        let engine = SimilarityEngine::new(&catalogue);

        let results = engine.similar_songs(&catalogue, "Seed", 3, None).unwrap();

        assert_eq!(titles(&results), vec!["Twin", "Near", "Middle"]);
        assert!(results[0].score >= results[1].score);
        assert!(results[1].score >= results[2].score);
    }

    #[test]
    fn test_similar_songs_never_include_seed() {
        let catalogue = catalogue();
        let engine = SimilarityEngine::new(&catalogue);

        for song in catalogue.songs() {
            let results = engine
                .similar_songs(&catalogue, &song.title, catalogue.len(), None)
                .unwrap();
            assert_eq!(results.len(), catalogue.len() - 1);
            assert!(results.iter().all(|r| r.title() != song.title));
        }
    }

    #[test]
    fn test_unknown_title_is_not_found() {
        let catalogue = catalogue();
        let engine = SimilarityEngine::new(&catalogue);

        let result = engine.similar_songs(&catalogue, "Missing", 5, None);
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_ties_keep_catalogue_order() {
        let catalogue = Catalogue::new(vec![
            song_with_features("Seed", 100.0, 90.0, 10.0),
            song_with_features("Other", 150.0, 10.0, 90.0),
            song_with_features("CopyOne", 100.0, 90.0, 10.0),
            song_with_features("CopyTwo", 100.0, 90.0, 10.0),
        ]);
        let engine = SimilarityEngine::new(&catalogue);

        let results = engine.similar_songs(&catalogue, "Seed", 2, None).unwrap();
        assert_eq!(titles(&results), vec!["CopyOne", "CopyTwo"]);
    }

    #[test]
    fn test_empty_weights_match_precomputed_matrix() {
        let catalogue = catalogue();
        let engine = SimilarityEngine::new(&catalogue);

        let plain = engine.similar_songs(&catalogue, "Seed", 4, None).unwrap();
        let empty = engine
            .similar_songs(&catalogue, "Seed", 4, Some(&FeatureWeights::new()))
            .unwrap();
        assert_eq!(plain, empty);
    }

    #[test]
    fn test_weights_change_the_ranking() {
        let catalogue = catalogue();
        let engine = SimilarityEngine::new(&catalogue);

        // Only danceability survives; Seed and Twin are 0 on that axis
        let weights = FeatureWeights::new()
            .with(Feature::Tempo, 0.0)
            .with(Feature::Energy, 0.0);
        let results = engine
            .similar_songs(&catalogue, "Near", 4, Some(&weights))
            .unwrap();

        assert_eq!(titles(&results)[..2], ["Far", "Middle"]);
        assert!((results[0].score - 1.0).abs() < 1e-12);
        assert_eq!(results[2].score, 0.0);

        // The precomputed matrix is unaffected by the weighted request
        let plain = engine.similar_songs(&catalogue, "Seed", 1, None).unwrap();
        assert_eq!(titles(&plain), vec!["Twin"]);
    }
}

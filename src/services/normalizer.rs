use crate::models::{Feature, FeatureWeights, Song, FEATURE_COUNT};

/// Feature rows of a catalogue, one per song, in catalogue order
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    rows: Vec<[f64; FEATURE_COUNT]>,
}

impl FeatureMatrix {
    /// Min-max scales every feature column to [0, 1] over the given songs.
    ///
    /// A constant column (min == max) maps to 0 for every row.
    pub fn normalize(songs: &[Song]) -> Self {
        let raw: Vec<[f64; FEATURE_COUNT]> = songs.iter().map(Song::feature_vector).collect();

        let mut min = [f64::INFINITY; FEATURE_COUNT];
        let mut max = [f64::NEG_INFINITY; FEATURE_COUNT];
        for row in &raw {
            for (column, value) in row.iter().enumerate() {
                min[column] = min[column].min(*value);
                max[column] = max[column].max(*value);
            }
        }

        let rows = raw
            .into_iter()
            .map(|row| {
                let mut scaled = [0.0; FEATURE_COUNT];
                for (column, value) in row.iter().enumerate() {
                    let range = max[column] - min[column];
                    if range > 0.0 {
                        scaled[column] = (value - min[column]) / range;
                    }
                }
                scaled
            })
            .collect();

        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, position: usize) -> &[f64; FEATURE_COUNT] {
        &self.rows[position]
    }

    pub fn rows(&self) -> &[[f64; FEATURE_COUNT]] {
        &self.rows
    }

    pub fn column(&self, feature: Feature) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(move |row| row[feature.index()])
    }

    /// Copy of the matrix with each column multiplied by its weight
    pub fn reweighted(&self, weights: &FeatureWeights) -> FeatureMatrix {
        let factors = Feature::ALL.map(|feature| weights.get(feature));
        let rows = self
            .rows
            .iter()
            .map(|row| {
                let mut weighted = *row;
                for (value, factor) in weighted.iter_mut().zip(factors) {
                    *value *= factor;
                }
                weighted
            })
            .collect();

        FeatureMatrix { rows }
    }
}

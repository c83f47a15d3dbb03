pub mod collaborative;
pub mod engine;
pub mod hybrid;
pub mod normalizer;
pub mod popularity;
pub mod similarity;

pub use collaborative::{
    CollaborativeMode, CollaborativePolicy, CollaborativeScorer, CollaborativeSource,
    DegradedCollaborativeSource, InteractionSource,
};
pub use engine::RecommendationEngine;
pub use normalizer::FeatureMatrix;
pub use similarity::{cosine_similarity, SimilarityEngine, SimilarityMatrix};

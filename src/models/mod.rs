pub mod catalogue;
pub mod feature;
pub mod recommendation;
pub mod song;

pub use catalogue::Catalogue;
pub use feature::{Feature, FeatureWeights, FEATURE_COUNT};
pub use recommendation::{
    CollaborativeRecommendations, HybridRecommendations, HybridScoredSong, HybridWeights,
    ProfileSource, ScoredSong, SongInfo, UserInfo,
};
pub use song::Song;

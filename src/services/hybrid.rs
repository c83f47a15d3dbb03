use std::collections::{HashMap, HashSet};

use crate::models::{HybridScoredSong, HybridWeights, ScoredSong, Song};

/// Scores divided by their maximum. A non-positive maximum leaves them as is.
fn normalize_by_max(results: &[ScoredSong]) -> HashMap<&str, f64> {
    let max = results
        .iter()
        .map(|r| r.score)
        .fold(f64::NEG_INFINITY, f64::max);

    results
        .iter()
        .map(|r| {
            let score = if max > 0.0 { r.score / max } else { r.score };
            (r.title(), score)
        })
        .collect()
}

/// Blends content and collaborative results into one ranking.
///
/// Each input is normalized against its own maximum, then every title in
/// either input gets `content_weight * content + collab_weight * collab`
/// (absent = 0). Equal combined scores keep union order, which walks the
/// more heavily weighted input first (content on a tie), so a (1, 0)
/// weighting reproduces the content ranking and (0, 1) the collaborative one.
pub fn combine(
    content: &[ScoredSong],
    collaborative: &[ScoredSong],
    weights: HybridWeights,
    limit: usize,
) -> Vec<HybridScoredSong> {
    let content_scores = normalize_by_max(content);
    let collab_scores = normalize_by_max(collaborative);

    let (first, second) = if weights.collab_weight > weights.content_weight {
        (collaborative, content)
    } else {
        (content, collaborative)
    };

    let mut seen = HashSet::new();
    let union: Vec<&Song> = first
        .iter()
        .chain(second)
        .filter(|r| seen.insert(r.title()))
        .map(|r| &r.song)
        .collect();

    let mut combined: Vec<HybridScoredSong> = union
        .into_iter()
        .map(|song| {
            let title = song.title.as_str();
            let content_score =
                weights.content_weight * content_scores.get(title).copied().unwrap_or(0.0);
            let collab_score =
                weights.collab_weight * collab_scores.get(title).copied().unwrap_or(0.0);

            HybridScoredSong {
                song: song.clone(),
                score: content_score + collab_score,
                content_score,
                collab_score,
                content_weight: weights.content_weight,
                collab_weight: weights.collab_weight,
            }
        })
        .collect();

    combined.sort_by(|a, b| b.score.total_cmp(&a.score));
    combined.truncate(limit);
    combined
}

use crate::{
    error::{AppError, AppResult},
    models::{Catalogue, Song},
};

/// Most popular first; equal popularity keeps catalogue order
fn rank_by_popularity(mut songs: Vec<&Song>, limit: usize) -> Vec<Song> {
    songs.sort_by(|a, b| b.popularity.total_cmp(&a.popularity));
    songs.into_iter().take(limit).cloned().collect()
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Most popular songs, optionally narrowed by year and genre.
///
/// Filters that cannot apply are dropped rather than reported: a year that
/// does not parse as an integer, or a genre no song in the catalogue has.
/// If the remaining filters match nothing, the whole catalogue is ranked.
pub fn popular(
    catalogue: &Catalogue,
    year: Option<&str>,
    genre: Option<&str>,
    limit: usize,
) -> Vec<Song> {
    let year = non_blank(year).and_then(|raw| match raw.parse::<i32>() {
        Ok(year) => Some(year),
        Err(_) => {
            tracing::debug!(year = raw, "Ignoring non-numeric year filter");
            None
        }
    });

    let genre = non_blank(genre).filter(|genre| {
        let known = catalogue.has_genre(genre);
        if !known {
            tracing::debug!(genre, "Ignoring unknown genre filter");
        }
        known
    });

    let filtered: Vec<&Song> = catalogue
        .songs()
        .iter()
        .filter(|song| year.map_or(true, |year| song.year == year))
        .filter(|song| genre.map_or(true, |genre| song.genre == genre))
        .collect();

    let candidates = if filtered.is_empty() {
        tracing::debug!(?year, ?genre, "Filters matched nothing, ranking whole catalogue");
        catalogue.songs().iter().collect()
    } else {
        filtered
    };

    rank_by_popularity(candidates, limit)
}

/// Most popular songs matching a genre and/or artist exactly.
///
/// Blank values are treated as absent. Fails with `NotFound` when nothing
/// matches.
pub fn by_genre_artist(
    catalogue: &Catalogue,
    genre: Option<&str>,
    artist: Option<&str>,
    limit: usize,
) -> AppResult<Vec<Song>> {
    let genre = non_blank(genre);
    let artist = non_blank(artist);

    let matches: Vec<&Song> = catalogue
        .songs()
        .iter()
        .filter(|song| genre.map_or(true, |genre| song.genre == genre))
        .filter(|song| artist.map_or(true, |artist| song.artist == artist))
        .collect();

    if matches.is_empty() {
        return Err(AppError::NotFound("No matches".to_string()));
    }

    Ok(rank_by_popularity(matches, limit))
}

use std::collections::HashMap;

use super::Song;

/// Ordered, index-addressable set of songs.
///
/// Positions are fixed for the lifetime of the catalogue and line up with the
/// rows of the feature and similarity matrices built from it.
#[derive(Debug, Clone, Default)]
pub struct Catalogue {
    songs: Vec<Song>,
    positions: HashMap<String, usize>,
}

impl Catalogue {
    /// Builds a catalogue, indexing each title at its first occurrence
    pub fn new(songs: Vec<Song>) -> Self {
        let mut positions = HashMap::with_capacity(songs.len());
        for (position, song) in songs.iter().enumerate() {
            if positions.contains_key(&song.title) {
                tracing::warn!(title = %song.title, position, "Duplicate title in catalogue");
                continue;
            }
            positions.insert(song.title.clone(), position);
        }

        Self { songs, positions }
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn get(&self, position: usize) -> Option<&Song> {
        self.songs.get(position)
    }

    /// Catalogue position of a title
    pub fn position(&self, title: &str) -> Option<usize> {
        self.positions.get(title).copied()
    }

    pub fn find(&self, title: &str) -> Option<&Song> {
        self.position(title).map(|position| &self.songs[position])
    }

    pub fn contains_title(&self, title: &str) -> bool {
        self.positions.contains_key(title)
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.songs.iter().any(|song| song.genre == genre)
    }

    /// Titles in catalogue order
    pub fn titles(&self) -> Vec<&str> {
        self.songs.iter().map(|song| song.title.as_str()).collect()
    }
}

use serde::{
    de::{MapAccess, Visitor},
    Deserialize, Deserializer,
};
use std::collections::HashMap;
use std::fmt;

/// User → liked song titles, as produced by the interaction generator
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "HashMap<String, Vec<String>>")]
pub struct InteractionTable {
    users: HashMap<String, Vec<String>>,
    /// User ids in lexicographic order, the basis for deterministic fallback picks
    sorted_ids: Vec<String>,
}

impl From<HashMap<String, Vec<String>>> for InteractionTable {
    fn from(users: HashMap<String, Vec<String>>) -> Self {
        let mut sorted_ids: Vec<String> = users.keys().cloned().collect();
        sorted_ids.sort();
        Self { users, sorted_ids }
    }
}

impl InteractionTable {
    pub fn liked(&self, user_id: &str) -> Option<&[String]> {
        self.users.get(user_id).map(Vec::as_slice)
    }

    pub fn user_ids(&self) -> &[String] {
        &self.sorted_ids
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl<U: Into<String>, S: Into<String>> FromIterator<(U, Vec<S>)> for InteractionTable {
    fn from_iter<T: IntoIterator<Item = (U, Vec<S>)>>(iter: T) -> Self {
        iter.into_iter()
            .map(|(user, liked)| (user.into(), liked.into_iter().map(Into::into).collect()))
            .collect::<HashMap<String, Vec<String>>>()
            .into()
    }
}

/// Related songs of one song with their co-occurrence counts, in source order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelatedCounts(Vec<(String, u32)>);

impl RelatedCounts {
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.0.iter().map(|(title, count)| (title.as_str(), *count))
    }

    pub fn count_for(&self, title: &str) -> Option<u32> {
        self.0
            .iter()
            .find(|(related, _)| related == title)
            .map(|(_, count)| *count)
    }
}

impl<'de> Deserialize<'de> for RelatedCounts {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RelatedCountsVisitor;

        impl<'de> Visitor<'de> for RelatedCountsVisitor {
            type Value = RelatedCounts;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of related song titles to co-occurrence counts")
            }

            // Walks entries in document order; a HashMap would lose the order
            // that collaborative tie-breaking depends on.
            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((title, count)) = map.next_entry::<String, u32>()? {
                    entries.push((title, count));
                }
                Ok(RelatedCounts(entries))
            }
        }

        deserializer.deserialize_map(RelatedCountsVisitor)
    }
}

/// Song → related songs with co-occurrence counts
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct CooccurrenceTable {
    entries: HashMap<String, RelatedCounts>,
}

impl CooccurrenceTable {
    /// Builds a table from `(song, [(related, count)])` entries, keeping related order
    pub fn from_entries<I, S, R>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<(R, u32)>)>,
        S: Into<String>,
        R: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(song, related)| {
                let related = related
                    .into_iter()
                    .map(|(title, count)| (title.into(), count))
                    .collect();
                (song.into(), RelatedCounts(related))
            })
            .collect();

        Self { entries }
    }

    /// Related entries of a song; empty when the song has none
    pub fn related(&self, title: &str) -> impl Iterator<Item = (&str, u32)> {
        self.entries
            .get(title)
            .into_iter()
            .flat_map(|related| related.iter())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pairs `(a, b)` where the count for a→b differs from b→a (a missing
    /// reverse entry counts as 0). Each mismatched pair is reported once.
    pub fn asymmetric_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        for (song, related) in &self.entries {
            for (other, count) in related.iter() {
                let reverse = self
                    .entries
                    .get(other)
                    .and_then(|back| back.count_for(song));
                if reverse.unwrap_or(0) == count {
                    continue;
                }

                // Report from the lexicographically smaller side, or from the only
                // side that exists when the reverse entry is missing.
                if reverse.is_none() || song.as_str() < other {
                    pairs.push((song.clone(), other.to_string()));
                }
            }
        }

        pairs.sort();
        pairs
    }
}

/// The two collaborative lookup tables, loaded together or not at all
#[derive(Debug, Clone, Default)]
pub struct InteractionData {
    pub interactions: InteractionTable,
    pub cooccurrences: CooccurrenceTable,
}

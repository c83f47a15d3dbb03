pub mod catalogue;
pub mod interactions;
pub mod provider;

pub use catalogue::read_catalogue;
pub use interactions::{CooccurrenceTable, InteractionData, InteractionTable, RelatedCounts};
pub use provider::{DataProvider, FileDataProvider};

#[cfg(test)]
pub use provider::MockDataProvider;

//! Event search: provider aggregation and prompt phrasing.

pub mod aggregator;
pub mod prompt;

pub use aggregator::EventAggregator;
pub use prompt::event_search_prompt;

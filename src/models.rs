//! Data models for the event aggregator.
//!
//! This module contains the request, record and response structures shared
//! by the providers, the HTTP routes and the agent tool.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream provider that produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// Ticketing marketplace (Discovery API v2).
    Ticketmaster,
    /// Generic event platform (API v3).
    Eventbrite,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Ticketmaster => write!(f, "Ticketmaster"),
            Source::Eventbrite => write!(f, "Eventbrite"),
        }
    }
}

/// A search for events in a city.
///
/// Empty optional fields are treated as absent. Dates are passed upstream
/// verbatim and never validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// City to search in (free text).
    pub city: String,
    /// Genre or classification filter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    /// First day of the range (inclusive), `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    /// Last day of the range (inclusive), `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
}

impl SearchRequest {
    /// Create a request, dropping blank optional fields.
    pub fn new(
        city: impl Into<String>,
        genre: Option<String>,
        start_date: Option<String>,
        end_date: Option<String>,
    ) -> Self {
        Self {
            city: city.into(),
            genre: non_blank(genre),
            start_date: non_blank(start_date),
            end_date: non_blank(end_date),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// A single event listing in the shared record shape.
///
/// Every text field is always a string, whatever the upstream value was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedEvent {
    pub source: Source,
    pub name: String,
    /// Local start date/time as given upstream. Formats differ per provider.
    pub date: String,
    pub venue: String,
    pub url: String,
    pub genre: String,
    pub description: String,
}

/// A provider failure in the legacy flat sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub source: Source,
    pub error: String,
}

/// Entry of the flat record sequence: an event or a failure notice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Record {
    Error(ErrorRecord),
    Event(NormalizedEvent),
}

/// What a single provider call produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ProviderOutcome {
    Success { events: Vec<NormalizedEvent> },
    Failure { error: String },
}

/// Outcome of one provider, tagged with its source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderResult {
    pub source: Source,
    #[serde(flatten)]
    pub outcome: ProviderOutcome,
}

impl ProviderResult {
    pub fn success(source: Source, events: Vec<NormalizedEvent>) -> Self {
        Self {
            source,
            outcome: ProviderOutcome::Success { events },
        }
    }

    pub fn failure(source: Source, error: impl Into<String>) -> Self {
        Self {
            source,
            outcome: ProviderOutcome::Failure {
                error: error.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ProviderOutcome::Success { .. })
    }
}

/// Merged result of a search across all configured providers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResponse {
    /// The request that produced this response.
    pub request: SearchRequest,
    /// Per-provider results, Ticketmaster first.
    pub results: Vec<ProviderResult>,
}

impl SearchResponse {
    /// All events in provider order, then upstream order.
    pub fn events(&self) -> impl Iterator<Item = &NormalizedEvent> {
        self.results.iter().flat_map(|r| match &r.outcome {
            ProviderOutcome::Success { events } => events.as_slice(),
            ProviderOutcome::Failure { .. } => &[][..],
        })
    }

    /// Providers whose call failed.
    pub fn errors(&self) -> Vec<ErrorRecord> {
        self.results
            .iter()
            .filter_map(|r| match &r.outcome {
                ProviderOutcome::Failure { error } => Some(ErrorRecord {
                    source: r.source,
                    error: error.clone(),
                }),
                ProviderOutcome::Success { .. } => None,
            })
            .collect()
    }

    /// Flatten into the single ordered sequence of events and error notices.
    pub fn records(&self) -> Vec<Record> {
        let mut records = Vec::new();

        for result in &self.results {
            match &result.outcome {
                ProviderOutcome::Success { events } => {
                    records.extend(events.iter().cloned().map(Record::Event));
                }
                ProviderOutcome::Failure { error } => {
                    records.push(Record::Error(ErrorRecord {
                        source: result.source,
                        error: error.clone(),
                    }));
                }
            }
        }

        records
    }

    /// Number of events returned by the given source.
    pub fn count_for(&self, source: Source) -> usize {
        self.events().filter(|e| e.source == source).count()
    }
}

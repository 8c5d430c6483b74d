//! Eventbrite API v3 client.
//!
//! Eventbrite has no classification taxonomy comparable to Ticketmaster's,
//! so the genre filter is sent as a free-text query term and echoed back on
//! every returned event.

use super::normalize::{
    date_range_end, date_range_start, display_string, display_string_or, field,
};
use super::{event_array, fetch_json, http_client};
use crate::config::EventbriteConfig;
use crate::error::ProviderError;
use crate::models::{NormalizedEvent, SearchRequest, Source};
use serde_json::Value;
use tracing::{debug, info};

const SEARCH_PATH: &str = "/v3/events/search/";

/// Venue placeholder when an event has no venue or the venue has no name.
pub const UNKNOWN_VENUE: &str = "Unknown";

/// Client for the generic event platform.
pub struct EventbriteClient {
    config: EventbriteConfig,
    api_key: String,
    http_client: reqwest::Client,
}

impl EventbriteClient {
    /// Build a client, or `None` when no API key is configured.
    pub fn from_config(config: &EventbriteConfig) -> Result<Option<Self>, ProviderError> {
        let Some(api_key) = config.api_key.clone().filter(|k| !k.trim().is_empty()) else {
            return Ok(None);
        };

        let http_client = http_client(config.timeout_seconds)?;
        Ok(Some(Self {
            config: config.clone(),
            api_key,
            http_client,
        }))
    }

    /// Fetch the first page of events matching the request.
    pub async fn search(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<NormalizedEvent>, ProviderError> {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), SEARCH_PATH);
        let query = self.build_query(request);
        debug!("Eventbrite query: city={} params={}", request.city, query.len());

        let body = fetch_json(
            self.http_client
                .get(&url)
                .bearer_auth(&self.api_key)
                .query(&query),
            &self.config.base_url,
            self.config.timeout_seconds,
        )
        .await?;

        let events = normalize_events(&body, request.genre.as_deref())?;
        info!("Eventbrite returned {} events", events.len());
        Ok(events)
    }

    fn build_query(&self, request: &SearchRequest) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("location.address", request.city.clone()),
            ("expand", "venue".to_string()),
            ("sort_by", "date".to_string()),
            ("page_size", self.config.page_size.to_string()),
        ];

        if let Some(ref genre) = request.genre {
            query.push(("q", genre.clone()));
        }
        if let Some(ref start) = request.start_date {
            query.push(("start_date.range_start", date_range_start(start)));
        }
        if let Some(ref end) = request.end_date {
            query.push(("start_date.range_end", date_range_end(end)));
        }

        query
    }
}

/// Map an event search response body into normalized events.
///
/// `genre` is the request's filter; it is copied onto every event.
pub fn normalize_events(
    body: &Value,
    genre: Option<&str>,
) -> Result<Vec<NormalizedEvent>, ProviderError> {
    let genre = genre.unwrap_or_default();

    Ok(event_array(body, "/events")?
        .iter()
        .map(|event| NormalizedEvent {
            source: Source::Eventbrite,
            name: display_string(field(event, "/name/text")),
            date: display_string(field(event, "/start/local")),
            venue: display_string_or(field(event, "/venue/name"), UNKNOWN_VENUE),
            url: display_string(field(event, "/url")),
            genre: genre.to_string(),
            description: display_string(field(event, "/description/text")),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Value {
        serde_json::from_str(include_str!("../../fixtures/eventbrite_events.json")).unwrap()
    }

    fn configured() -> EventbriteConfig {
        EventbriteConfig {
            api_key: Some("eb-token".to_string()),
            ..EventbriteConfig::default()
        }
    }

    #[test]
    fn test_unconfigured_client_is_skipped() {
        assert!(EventbriteClient::from_config(&EventbriteConfig::default())
            .unwrap()
            .is_none());

        let blank = EventbriteConfig {
            api_key: Some("  ".to_string()),
            ..EventbriteConfig::default()
        };
        assert!(EventbriteClient::from_config(&blank).unwrap().is_none());
        assert!(EventbriteClient::from_config(&configured()).unwrap().is_some());
    }

    #[test]
    fn test_normalize_events() {
        let events = normalize_events(&fixture(), Some("arts")).unwrap();
        assert_eq!(events.len(), 2);

        let first = &events[0];
        assert_eq!(first.source, Source::Eventbrite);
        assert_eq!(first.name, "Queen West Art Crawl");
        assert_eq!(first.date, "2024-06-15T11:00:00");
        assert_eq!(first.venue, "Trinity Bellwoods Park");
        assert_eq!(first.url, "https://www.eventbrite.ca/e/queen-west-art-crawl-123");
        assert_eq!(first.genre, "arts");
        assert_eq!(first.description, "Open-air gallery walk");
    }

    #[test]
    fn test_missing_venue_defaults_to_unknown() {
        let events = normalize_events(&fixture(), None).unwrap();

        let second = &events[1];
        assert_eq!(second.venue, UNKNOWN_VENUE);
        assert_eq!(second.name, "");
        assert_eq!(second.description, "");
        assert_eq!(second.genre, "");
    }

    #[test]
    fn test_build_query() {
        let client = EventbriteClient::from_config(&configured()).unwrap().unwrap();
        let request = SearchRequest::new(
            "Montreal",
            Some("jazz".to_string()),
            Some("2024-07-01".to_string()),
            None,
        );
        let query = client.build_query(&request);

        assert_eq!(query[0], ("location.address", "Montreal".to_string()));
        assert!(query.contains(&("expand", "venue".to_string())));
        assert!(query.contains(&("page_size", "10".to_string())));
        assert!(query.contains(&("q", "jazz".to_string())));
        assert!(query.contains(&("start_date.range_start", "2024-07-01T00:00:00Z".to_string())));
        assert!(!query.iter().any(|(k, _)| *k == "start_date.range_end"));
    }
}

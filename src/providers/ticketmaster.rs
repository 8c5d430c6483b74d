//! Ticketmaster Discovery API v2 client.

use super::normalize::{date_range_end, date_range_start, display_string, field};
use super::{event_array, fetch_json, http_client};
use crate::config::TicketmasterConfig;
use crate::error::ProviderError;
use crate::models::{NormalizedEvent, SearchRequest, Source};
use serde_json::Value;
use tracing::{debug, info};

const EVENTS_PATH: &str = "/discovery/v2/events.json";

/// Client for the ticketing marketplace.
pub struct TicketmasterClient {
    config: TicketmasterConfig,
    http_client: reqwest::Client,
}

impl TicketmasterClient {
    pub fn new(config: TicketmasterConfig) -> Result<Self, ProviderError> {
        let http_client = http_client(config.timeout_seconds)?;
        Ok(Self {
            config,
            http_client,
        })
    }

    /// Fetch the first page of events matching the request.
    pub async fn search(
        &self,
        request: &SearchRequest,
    ) -> Result<Vec<NormalizedEvent>, ProviderError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ProviderError::MissingApiKey("Ticketmaster"))?;

        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), EVENTS_PATH);
        let query = self.build_query(api_key, request);
        debug!("Ticketmaster query: city={} params={}", request.city, query.len());

        let body = fetch_json(
            self.http_client.get(&url).query(&query),
            &self.config.base_url,
            self.config.timeout_seconds,
        )
        .await?;

        let events = normalize_events(&body)?;
        info!("Ticketmaster returned {} events", events.len());
        Ok(events)
    }

    fn build_query(&self, api_key: &str, request: &SearchRequest) -> Vec<(&'static str, String)> {
        let mut query = vec![
            ("apikey", api_key.to_string()),
            ("city", request.city.clone()),
            ("countryCode", self.config.country_code.clone()),
            ("size", self.config.page_size.to_string()),
        ];

        if let Some(ref genre) = request.genre {
            query.push(("classificationName", genre.clone()));
        }
        if let Some(ref start) = request.start_date {
            query.push(("startDateTime", date_range_start(start)));
        }
        if let Some(ref end) = request.end_date {
            query.push(("endDateTime", date_range_end(end)));
        }

        query
    }
}

/// Map a Discovery API response body into normalized events.
pub fn normalize_events(body: &Value) -> Result<Vec<NormalizedEvent>, ProviderError> {
    Ok(event_array(body, "/_embedded/events")?
        .iter()
        .map(normalize_event)
        .collect())
}

fn normalize_event(event: &Value) -> NormalizedEvent {
    let description = match field(event, "/info") {
        None | Some(Value::Null) => display_string(field(event, "/description")),
        info => display_string(info),
    };

    NormalizedEvent {
        source: Source::Ticketmaster,
        name: display_string(field(event, "/name")),
        date: display_string(field(event, "/dates/start/localDate")),
        venue: display_string(field(event, "/_embedded/venues/0/name")),
        url: display_string(field(event, "/url")),
        genre: classification_names(event),
        description,
    }
}

/// Join the names of classification entries that carry one.
fn classification_names(event: &Value) -> String {
    let Some(Value::Array(classifications)) = field(event, "/classifications") else {
        return String::new();
    };

    classifications
        .iter()
        .filter_map(|c| c.get("name"))
        .map(|name| display_string(Some(name)))
        .collect::<Vec<_>>()
        .join(", ")
}

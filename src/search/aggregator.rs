//! Event aggregation across providers.
//!
//! Providers are queried one after another, Ticketmaster first. Each call is
//! isolated: a failure becomes a failure result for that provider and never
//! stops the next one.

use crate::config::Config;
use crate::error::ProviderError;
use crate::models::{NormalizedEvent, ProviderResult, SearchRequest, SearchResponse, Source};
use crate::providers::{EventbriteClient, TicketmasterClient};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Searches every configured provider and merges the results.
pub struct EventAggregator {
    ticketmaster: TicketmasterClient,
    /// `None` when Eventbrite has no API key.
    eventbrite: Option<EventbriteClient>,
    surface_timeouts: bool,
}

impl EventAggregator {
    /// Build the provider clients from configuration.
    pub fn new(config: &Config) -> Result<Self, ProviderError> {
        let ticketmaster = TicketmasterClient::new(config.ticketmaster.clone())?;
        let eventbrite = EventbriteClient::from_config(&config.eventbrite)?;

        let has_ticketmaster_key = config
            .ticketmaster
            .api_key
            .as_deref()
            .is_some_and(|k| !k.trim().is_empty());
        if !has_ticketmaster_key {
            warn!("TICKETMASTER_API_KEY is not set; Ticketmaster searches will fail");
        }
        if eventbrite.is_none() {
            info!("EVENTBRITE_API_KEY is not set; Eventbrite will be skipped");
        }

        Ok(Self {
            ticketmaster,
            eventbrite,
            surface_timeouts: config.search.surface_timeouts,
        })
    }

    /// Whether Eventbrite will be queried.
    pub fn eventbrite_enabled(&self) -> bool {
        self.eventbrite.is_some()
    }

    /// Run a search against all providers, in order.
    pub async fn search(&self, request: &SearchRequest) -> SearchResponse {
        let start_time = Instant::now();
        info!(
            city = %request.city,
            genre = ?request.genre,
            start_date = ?request.start_date,
            end_date = ?request.end_date,
            "Searching events"
        );

        let mut results = Vec::with_capacity(2);

        let outcome = self.ticketmaster.search(request).await;
        results.extend(self.settle(Source::Ticketmaster, outcome));

        match self.eventbrite {
            Some(ref eventbrite) => {
                let outcome = eventbrite.search(request).await;
                results.extend(self.settle(Source::Eventbrite, outcome));
            }
            None => debug!("Eventbrite not configured, skipping"),
        }

        let response = SearchResponse {
            request: request.clone(),
            results,
        };

        info!(
            "Search finished: {} events, {} provider errors in {:.2}s",
            response.events().count(),
            response.errors().len(),
            start_time.elapsed().as_secs_f64()
        );

        response
    }

    /// Turn a provider outcome into a result entry.
    ///
    /// Returns `None` for a timeout when timeouts are not surfaced.
    fn settle(
        &self,
        source: Source,
        outcome: Result<Vec<NormalizedEvent>, ProviderError>,
    ) -> Option<ProviderResult> {
        match outcome {
            Ok(events) => Some(ProviderResult::success(source, events)),
            Err(e) if e.is_timeout() && !self.surface_timeouts => {
                warn!("{} {}; dropping from results", source, e);
                None
            }
            Err(e) => {
                warn!("{} search failed: {}", source, e);
                Some(ProviderResult::failure(source, e.to_string()))
            }
        }
    }
}

//! Markdown and JSON rendering of search results.

use crate::models::{
    NormalizedEvent, ProviderOutcome, ProviderResult, SearchRequest, SearchResponse, Source,
};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Metadata printed at the top of a report.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    pub generated_at: DateTime<Utc>,
    pub duration_seconds: f64,
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(response: &SearchResponse, metadata: &ReportMetadata) -> String {
    let mut output = String::new();

    output.push_str(&format!("# Events in {}\n\n", response.request.city));
    output.push_str(&generate_query_section(&response.request, metadata));

    for result in &response.results {
        output.push_str(&generate_provider_section(result));
    }

    output.push_str(&generate_summary_section(response));
    output.push_str(&generate_footer());

    output
}

/// Generate the query/metadata section.
fn generate_query_section(request: &SearchRequest, metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Query\n\n");
    section.push_str(&format!("- **City:** {}\n", request.city));
    if let Some(ref genre) = request.genre {
        section.push_str(&format!("- **Genre:** {}\n", genre));
    }
    match (&request.start_date, &request.end_date) {
        (Some(start), Some(end)) => {
            section.push_str(&format!("- **Dates:** {} to {}\n", start, end))
        }
        (Some(start), None) => section.push_str(&format!("- **Dates:** from {}\n", start)),
        (None, Some(end)) => section.push_str(&format!("- **Dates:** until {}\n", end)),
        (None, None) => {}
    }
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Duration:** {:.1}s\n\n", metadata.duration_seconds));

    section
}

/// Generate the section for one provider.
fn generate_provider_section(result: &ProviderResult) -> String {
    let mut section = format!("## {}\n\n", result.source);

    match &result.outcome {
        ProviderOutcome::Failure { error } => {
            section.push_str(&format!("> ⚠️ **Unavailable:** {}\n\n", error));
        }
        ProviderOutcome::Success { events } if events.is_empty() => {
            section.push_str("No events found.\n\n");
        }
        ProviderOutcome::Success { events } => {
            section.push_str("| Event | Date | Venue | Genre |\n");
            section.push_str("|:---|:---|:---|:---|\n");
            for event in events {
                section.push_str(&generate_event_row(event));
            }
            section.push_str("\n");
        }
    }

    section
}

/// Generate a single table row, linking the name when a URL is present.
fn generate_event_row(event: &NormalizedEvent) -> String {
    let name = escape_cell(&event.name);
    let name = if event.url.is_empty() {
        name
    } else {
        format!("[{}]({})", name, event.url)
    };

    format!(
        "| {} | {} | {} | {} |\n",
        name,
        escape_cell(&event.date),
        escape_cell(&event.venue),
        escape_cell(&event.genre)
    )
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}

/// Generate the summary section.
fn generate_summary_section(response: &SearchResponse) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Source | Events | Status |\n");
    section.push_str("|:---|:---:|:---|\n");

    for result in &response.results {
        let status = if result.is_success() { "ok" } else { "failed" };
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            result.source,
            response.count_for(result.source),
            status
        ));
    }

    let total = response.count_for(Source::Ticketmaster) + response.count_for(Source::Eventbrite);
    section.push_str(&format!("\n**Total events:** {}\n\n", total));

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Generated by FestivalRadar*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(response: &SearchResponse) -> Result<String> {
    serde_json::to_string_pretty(response).map_err(Into::into)
}

//! Natural-language phrasing of a search, for language-driven agents.

/// Phrase a search as a single request sentence.
///
/// Absent fields drop their clause entirely.
pub fn event_search_prompt(
    city: Option<&str>,
    genre: Option<&str>,
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> String {
    fn present(v: Option<&str>) -> Option<&str> {
        v.map(str::trim).filter(|v| !v.is_empty())
    }

    let mut parts = vec!["Find".to_string()];

    if let Some(genre) = present(genre) {
        parts.push(genre.to_string());
    }
    parts.push("events".to_string());

    if let Some(city) = present(city) {
        parts.push(format!("in {}", city));
    }

    match (present(start_date), present(end_date)) {
        (Some(start), Some(end)) => parts.push(format!("between {} and {}", start, end)),
        (Some(start), None) => parts.push(format!("after {}", start)),
        (None, Some(end)) => parts.push(format!("before {}", end)),
        (None, None) => {}
    }

    format!(
        "{}. List top results with date, venue, and ticket link.",
        parts.join(" ")
    )
}

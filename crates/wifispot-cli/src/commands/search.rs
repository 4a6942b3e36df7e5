//! Search, near, and filter command handlers.

use anyhow::Result;
use tracing::info;

use wifispot_lib::{FilterCriteria, GeoPoint, ResultsPage, SearchOrigin, Session, SpotCatalog};

use super::{AppContext, FilterArgs, PageArgs};

const SUGGESTION_LIMIT: usize = 3;

/// Search box: geocode the query and list nearby spots, or fall back to
/// matching the text against the dataset.
pub fn handle_search(
    context: &AppContext,
    query: &str,
    radius: Option<f64>,
    page: PageArgs,
) -> Result<()> {
    let mut session = context.session()?;
    session.set_radius(radius);

    let geocoder = context.geocoder()?;
    if !session.search(geocoder.as_ref(), query) {
        info!("empty query; listing every spot");
    }

    render(context, &mut session, page)
}

/// Near-me: list spots around an explicit position.
pub fn handle_near(
    context: &AppContext,
    lat: f64,
    lng: f64,
    radius: Option<f64>,
    page: PageArgs,
) -> Result<()> {
    let mut session = context.session()?;
    session.set_radius(radius);
    session.search_near(GeoPoint::new(lat, lng))?;
    render(context, &mut session, page)
}

/// Borough/type/text filters over the full dataset.
pub fn handle_filter(context: &AppContext, filters: FilterArgs, page: PageArgs) -> Result<()> {
    let mut session = context.session()?;
    let criteria = FilterCriteria::from(filters);
    session.apply_filters(criteria.clone());

    if session.total() == 0 {
        suggest_vocabulary(session.catalog(), &criteria);
    }

    render(context, &mut session, page)
}

fn render(context: &AppContext, session: &mut Session, page: PageArgs) -> Result<()> {
    page.apply(session);
    let heading = heading(&session.query().origin);
    context
        .format
        .render_results(&heading, &ResultsPage::from_session(session))
}

fn heading(origin: &SearchOrigin) -> String {
    match origin {
        SearchOrigin::All => "All WiFi spots".to_string(),
        SearchOrigin::Text { query } => format!("Spots matching \"{query}\""),
        SearchOrigin::Proximity {
            center,
            radius_miles,
        } => format!(
            "Spots within {radius_miles:.1} mi of {:.4}, {:.4}",
            center.lat, center.lng
        ),
        SearchOrigin::Filters { criteria } => {
            let mut parts = Vec::new();
            if let Some(borough) = criteria.borough.as_deref().filter(|v| !v.trim().is_empty()) {
                parts.push(format!("borough={borough}"));
            }
            if let Some(kind) = criteria.kind.as_deref().filter(|v| !v.trim().is_empty()) {
                parts.push(format!("type={kind}"));
            }
            if let Some(text) = criteria.text.as_deref().filter(|v| !v.trim().is_empty()) {
                parts.push(format!("text={text}"));
            }
            if parts.is_empty() {
                "All WiFi spots".to_string()
            } else {
                format!("Spots filtered by {}", parts.join(", "))
            }
        }
    }
}

/// Offer close vocabulary matches when a borough or type filter matched nothing.
fn suggest_vocabulary(catalog: &SpotCatalog, criteria: &FilterCriteria) {
    let checks = [
        ("borough", criteria.borough.as_deref(), catalog.boroughs()),
        ("type", criteria.kind.as_deref(), catalog.types()),
    ];

    for (label, value, vocabulary) in checks {
        let Some(value) = value.map(str::trim).filter(|v| !v.is_empty()) else {
            continue;
        };
        if vocabulary.iter().any(|known| known.eq_ignore_ascii_case(value)) {
            continue;
        }
        let suggestions =
            SpotCatalog::fuzzy_vocabulary_matches(value, &vocabulary, SUGGESTION_LIMIT);
        if suggestions.is_empty() {
            eprintln!("Unknown {label} '{value}'.");
        } else {
            eprintln!(
                "Unknown {label} '{value}'. Did you mean: {}?",
                suggestions.join(", ")
            );
        }
    }
}

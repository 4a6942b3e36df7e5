//! Text and JSON rendering for command results.
//!
//! Every renderer builds a `String` so the formatting can be tested without
//! capturing stdout; [`OutputFormat`] decides which one a command uses.

use std::fmt::Write as _;

use anyhow::Result;
use clap::ValueEnum;
use serde::Serialize;

use wifispot_lib::{ResultsPage, RouteSummary, SpotCard};

use crate::terminal::{format_miles, ColorPalette};

/// How command output is written to stdout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable cards.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

impl OutputFormat {
    /// Print `page` under `heading`, or as JSON.
    pub fn render_results(&self, heading: &str, page: &ResultsPage) -> Result<()> {
        match self {
            OutputFormat::Text => {
                print!("{}", results_text(heading, page, &ColorPalette::detect()))
            }
            OutputFormat::Json => println!("{}", to_json(page)?),
        }
        Ok(())
    }

    pub fn render_route(&self, summary: &RouteSummary) -> Result<()> {
        match self {
            OutputFormat::Text => print!("{}", route_text(summary, &ColorPalette::detect())),
            OutputFormat::Json => println!("{}", to_json(summary)?),
        }
        Ok(())
    }

    pub fn render_vocabulary(&self, vocabulary: &Vocabulary) -> Result<()> {
        match self {
            OutputFormat::Text => print!("{}", vocabulary_text(vocabulary)),
            OutputFormat::Json => println!("{}", to_json(vocabulary)?),
        }
        Ok(())
    }

    pub fn render_download(&self, dataset_path: &str, spot_count: usize) -> Result<()> {
        match self {
            OutputFormat::Text => {
                println!("Dataset available at {dataset_path}");
                println!("{spot_count} WiFi spots loaded");
            }
            OutputFormat::Json => {
                let payload = serde_json::json!({
                    "dataset_path": dataset_path,
                    "spots": spot_count,
                });
                println!("{}", to_json(&payload)?);
            }
        }
        Ok(())
    }
}

/// Borough and type values available for filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Vocabulary {
    pub boroughs: Vec<String>,
    pub types: Vec<String>,
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Render a results page as text cards.
pub fn results_text(heading: &str, page: &ResultsPage, palette: &ColorPalette) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{heading}");

    if page.is_empty() {
        let _ = writeln!(out, "No spots found");
        return out;
    }

    let _ = writeln!(
        out,
        "Showing {} of {} spots (page {})",
        page.shown, page.total, page.page
    );
    for card in &page.cards {
        out.push('\n');
        write_card(&mut out, card, palette);
    }

    if page.has_more {
        let _ = writeln!(
            out,
            "\n{}More spots available: rerun with --page {}{}",
            palette.yellow,
            page.page.saturating_add(1),
            palette.reset
        );
    }
    out
}

fn write_card(out: &mut String, card: &SpotCard, palette: &ColorPalette) {
    let marker = if card.selected {
        format!(" {}[route]{}", palette.green, palette.reset)
    } else {
        String::new()
    };
    let _ = writeln!(
        out,
        "#{id} {bold}{name}{reset} {badge} {kind} {reset}{marker}",
        id = card.id,
        bold = palette.white_bold,
        name = card.name,
        reset = palette.reset,
        badge = palette.tag_type,
        kind = card.kind,
    );
    let _ = writeln!(out, "    {}", card.location);
    let _ = writeln!(out, "    {} {}", card.borough, card.zipcode);
    let _ = writeln!(out, "    {}", card.provider);
    if let Some(distance) = card.distance_miles {
        let _ = writeln!(
            out,
            "    {}{} away{}",
            palette.cyan,
            format_miles(distance),
            palette.reset
        );
    }
    let _ = writeln!(
        out,
        "    {}Directions: {}{}",
        palette.gray, card.directions_url, palette.reset
    );
}

/// Render a route summary with lettered stops and turn-by-turn steps.
pub fn route_text(summary: &RouteSummary, palette: &ColorPalette) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Route ({}): {:.1} mi, {} mins",
        summary.profile, summary.distance_miles, summary.duration_minutes
    );
    if summary.alternatives > 0 {
        let _ = writeln!(out, "{} alternative route(s) available", summary.alternatives);
    }

    for stop in &summary.stops {
        let _ = writeln!(
            out,
            "{tag} {label} {reset} {id} {bold}{name}{reset}",
            tag = palette.tag_stop,
            label = stop.label,
            reset = palette.reset,
            id = stop.id,
            bold = palette.white_bold,
            name = stop.name,
        );
    }

    if !summary.steps.is_empty() {
        let _ = writeln!(out, "\nDirections:");
        for (index, step) in summary.steps.iter().enumerate() {
            let _ = writeln!(
                out,
                "{:>3}. {} {}({:.0} m){}",
                index + 1,
                step.instruction,
                palette.gray,
                step.distance_meters,
                palette.reset
            );
        }
    }
    out
}

fn vocabulary_text(vocabulary: &Vocabulary) -> String {
    let mut out = String::from("Boroughs:\n");
    for borough in &vocabulary.boroughs {
        let _ = writeln!(out, "  {borough}");
    }
    out.push_str("Types:\n");
    for kind in &vocabulary.types {
        let _ = writeln!(out, "  {kind}");
    }
    out
}

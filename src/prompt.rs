//! Question enrichment: pull a place out of a weather question, geocode it, and
//! append the coordinates to the prompt handed to an agent.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, info};

use crate::location::{Coordinate, LocationResolver, Resolution, Transport};

/// A preposition followed by capitalised words, optionally with a
/// `, Region` suffix: "in New York City", "for Paris, France".
static LOCATION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(?i:in|for|at|near|around)\s+(\p{Lu}[\p{L}.'-]*(?:\s+\p{Lu}[\p{L}.'-]*)*(?:,\s*\p{Lu}[\p{L}.'-]*(?:\s+\p{Lu}[\p{L}.'-]*)*)?)",
    )
    .expect("location pattern is valid")
});

/// A question after enrichment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedQuestion {
    pub question: String,
    /// Location phrase found in the question, if any.
    pub location: Option<String>,
    /// Present only when a location phrase was looked up.
    pub resolution: Option<Resolution>,
    /// Text to hand to the agent. Equal to `question` when nothing resolved.
    pub prompt: String,
}

/// Find the first location phrase in a question.
pub fn extract_location(question: &str) -> Option<&str> {
    let caps = LOCATION_PATTERN.captures(question)?;
    let phrase = strip_sentence_period(caps.get(1)?.as_str().trim_end_matches(['\'', '-']));
    (!phrase.is_empty()).then_some(phrase)
}

/// Drop one sentence-ending period unless the last word is a dotted
/// abbreviation such as "D.C.".
fn strip_sentence_period(phrase: &str) -> &str {
    let Some(body) = phrase.strip_suffix('.') else {
        return phrase;
    };
    let last_word = body.rsplit([' ', ',']).next().unwrap_or(body);
    if last_word.contains('.') {
        phrase
    } else {
        body
    }
}

/// Append the resolved coordinate to the question.
pub fn augment_prompt(question: &str, place: &str, coordinate: Coordinate) -> String {
    format!(
        "{question}\n\n(Location: {place} is at latitude {}, longitude {}.)",
        coordinate.latitude, coordinate.longitude
    )
}

/// Extract, resolve and augment. Falls back to the original question when no
/// place is found or it does not resolve.
pub async fn enrich<T: Transport>(resolver: &LocationResolver<T>, question: &str) -> EnrichedQuestion {
    let Some(place) = extract_location(question) else {
        debug!("no location phrase in question");
        return EnrichedQuestion {
            question: question.to_string(),
            location: None,
            resolution: None,
            prompt: question.to_string(),
        };
    };

    let resolution = resolver.resolve(place).await;
    let prompt = match resolution {
        Resolution::Resolved(coordinate) => {
            info!(place, %coordinate, "enriched question with coordinates");
            augment_prompt(question, place, coordinate)
        }
        Resolution::Unresolved => {
            info!(place, "location unresolved, using question as-is");
            question.to_string()
        }
    };

    EnrichedQuestion {
        question: question.to_string(),
        location: Some(place.to_string()),
        resolution: Some(resolution),
        prompt,
    }
}

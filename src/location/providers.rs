//! Nominatim geocoding provider: request construction and response parsing.

use serde::Deserialize;

use super::config::ResolverConfig;
use super::transport::{GeocodeRequest, TransportResponse};
use super::types::{Coordinate, LocationError};

/// Only the first match is ever consulted, so only one is requested.
const RESULT_LIMIT: &str = "1";

// ─── Nominatim provider ─────────────────────────────────────────

/// One `format=json` candidate record. Every field other than the
/// coordinates is ignored.
#[derive(Deserialize, Debug, Clone)]
pub struct NominatimResult {
    pub lat: Degrees,
    pub lon: Degrees,
}

/// Nominatim quotes coordinates, but compatible geocoders send bare numbers.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum Degrees {
    Text(String),
    Number(f64),
}

/// Build the search request for `query`.
pub fn search_request(config: &ResolverConfig, query: &str) -> GeocodeRequest {
    GeocodeRequest {
        url: config.endpoint.clone(),
        query: vec![
            ("q".to_string(), query.to_string()),
            ("format".to_string(), "json".to_string()),
            ("limit".to_string(), RESULT_LIMIT.to_string()),
        ],
        user_agent: config.user_agent.clone(),
    }
}

/// Turn a search response into the first candidate's coordinate.
pub fn parse_search_response(
    query: &str,
    response: &TransportResponse,
) -> Result<Coordinate, LocationError> {
    if !response.is_success() {
        return Err(LocationError::Status {
            status: response.status,
        });
    }

    let results: Vec<NominatimResult> = serde_json::from_str(&response.body)?;
    let first = results
        .first()
        .ok_or_else(|| LocationError::NotFound(query.to_string()))?;

    Ok(Coordinate {
        latitude: parse_degrees("latitude", &first.lat)?,
        longitude: parse_degrees("longitude", &first.lon)?,
    })
}

fn parse_degrees(field: &'static str, raw: &Degrees) -> Result<f64, LocationError> {
    let invalid = |value: String| LocationError::InvalidCoordinate { field, value };
    let value = match raw {
        Degrees::Number(n) => *n,
        Degrees::Text(text) => text.trim().parse().map_err(|_| invalid(text.clone()))?,
    };
    // "NaN" and "inf" parse fine but are not positions.
    if !value.is_finite() {
        return Err(invalid(value.to_string()));
    }
    Ok(value)
}

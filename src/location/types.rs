//! Core types for the location subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::transport::TransportError;

/// A point on Earth's surface, in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.latitude, self.longitude)
    }
}

/// Outcome of resolving a place name.
///
/// Every failure collapses into `Unresolved`; callers proceed without
/// coordinates in that case.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Resolution {
    Resolved(Coordinate),
    Unresolved,
}

impl Resolution {
    pub fn coordinate(&self) -> Option<Coordinate> {
        match self {
            Self::Resolved(c) => Some(*c),
            Self::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }
}

impl From<Option<Coordinate>> for Resolution {
    fn from(value: Option<Coordinate>) -> Self {
        value.map_or(Self::Unresolved, Self::Resolved)
    }
}

/// Why a lookup produced no coordinate. Never surfaced past
/// [`LocationResolver::resolve`](super::LocationResolver::resolve).
#[derive(Debug, thiserror::Error)]
pub enum LocationError {
    #[error("empty place name")]
    EmptyQuery,

    #[error("no geocoding match for '{0}'")]
    NotFound(String),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("geocoder returned HTTP {status}")]
    Status { status: u16 },

    #[error("malformed geocoder response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("invalid {field} value '{value}'")]
    InvalidCoordinate { field: &'static str, value: String },
}

impl LocationError {
    /// Short label for the failure class, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EmptyQuery => "empty_query",
            Self::NotFound(_) => "not_found",
            Self::Transport(_) => "transport",
            Self::Status { .. } => "status",
            Self::Malformed(_) => "malformed",
            Self::InvalidCoordinate { .. } => "invalid_coordinate",
        }
    }
}

//! Geocoding front end for weather agents.
//!
//! Resolves a place named in a user's question to coordinates through
//! OpenStreetMap Nominatim and folds them into the prompt handed to an agent.

pub mod location;
pub mod prompt;

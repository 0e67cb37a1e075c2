//! Place-name resolution for weather questions.
//!
//! Provides the Nominatim lookup, the transport seam it runs over, and the
//! two-variant result callers consume.

pub mod config;
pub mod providers;
pub mod resolver;
pub mod transport;
pub mod types;

pub use config::ResolverConfig;
pub use resolver::LocationResolver;
pub use transport::{GeocodeRequest, Transport, TransportError, TransportResponse, UreqTransport};
pub use types::{Coordinate, LocationError, Resolution};

//! Location resolver: one geocoding lookup per call, failures collapse to
//! [`Resolution::Unresolved`].

use tracing::{debug, warn};

use super::config::ResolverConfig;
use super::providers;
use super::transport::{Transport, UreqTransport};
use super::types::{Coordinate, LocationError, Resolution};

/// Resolves place names to coordinates through a [`Transport`].
pub struct LocationResolver<T = UreqTransport> {
    transport: T,
    config: ResolverConfig,
}

impl LocationResolver<UreqTransport> {
    /// Resolver against public Nominatim over `ureq`.
    pub fn new() -> Self {
        Self::with_transport(UreqTransport::new(), ResolverConfig::default())
    }
}

impl Default for LocationResolver<UreqTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> LocationResolver<T> {
    pub fn with_transport(transport: T, config: ResolverConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolve a place name. Never fails: every error is logged and reported
    /// as `Unresolved`.
    pub async fn resolve(&self, place_name: &str) -> Resolution {
        match self.try_resolve(place_name).await {
            Ok(coordinate) => Resolution::Resolved(coordinate),
            Err(LocationError::NotFound(query)) => {
                debug!(%query, "no geocoding match");
                Resolution::Unresolved
            }
            Err(e) => {
                warn!(place = place_name, kind = e.kind(), error = %e, "geocoding failed");
                Resolution::Unresolved
            }
        }
    }

    /// Resolve a place name, keeping the reason for a miss.
    pub async fn try_resolve(&self, place_name: &str) -> Result<Coordinate, LocationError> {
        let query = place_name.trim();
        if query.is_empty() {
            return Err(LocationError::EmptyQuery);
        }

        let request = providers::search_request(&self.config, query);
        debug!(url = %request.url, %query, "geocoding lookup");

        let response = self.transport.get(&request).await?;
        let coordinate = providers::parse_search_response(query, &response)?;

        debug!(%query, lat = coordinate.latitude, lon = coordinate.longitude, "resolved");
        Ok(coordinate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::transport::fake::FakeTransport;
    use crate::location::transport::TransportError;
    use approx::assert_abs_diff_eq;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn resolver(transport: FakeTransport) -> LocationResolver<FakeTransport> {
        LocationResolver::with_transport(transport, ResolverConfig::default())
    }

    /// In-memory log sink for asserting on emitted diagnostics.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    #[tokio::test]
    async fn test_resolve_paris() {
        let r = resolver(FakeTransport::ok(r#"[{"lat": "48.8566", "lon": "2.3522"}]"#));
        let res = r.resolve("Paris").await;
        assert_eq!(res, Resolution::Resolved(Coordinate::new(48.8566, 2.3522)));
    }

    #[tokio::test]
    async fn test_resolve_numeric_fields() {
        let r = resolver(FakeTransport::ok(r#"[{"lat": 48.8566, "lon": 2.3522}]"#));
        let res = r.resolve("Paris").await;
        assert_eq!(res, Resolution::Resolved(Coordinate::new(48.8566, 2.3522)));
    }

    #[test]
    fn test_resolve_outside_tokio_runtime() {
        let r = LocationResolver::with_transport(UreqTransport::new(), ResolverConfig::default());
        let res = futures::executor::block_on(r.resolve("Paris"));
        assert_eq!(res, Resolution::Unresolved);
        assert!(matches!(
            futures::executor::block_on(r.try_resolve("Paris")),
            Err(LocationError::Transport(TransportError::Task(_)))
        ));
    }

    #[tokio::test]
    async fn test_failure_logs_warning() {
        let (logs, _guard) = capture_logs();
        let r = resolver(FakeTransport::refused());
        assert_eq!(r.resolve("Paris").await, Resolution::Unresolved);

        let out = logs.contents();
        assert!(out.contains("WARN"), "{out}");
        assert!(out.contains("geocoding failed"), "{out}");
        assert!(out.contains("transport"), "{out}");
        assert!(out.contains("connection refused"), "{out}");
    }

    #[tokio::test]
    async fn test_empty_result_logs_debug_only() {
        let (logs, _guard) = capture_logs();
        let r = resolver(FakeTransport::ok("[]"));
        assert_eq!(r.resolve("Qwkxyzplace").await, Resolution::Unresolved);

        let out = logs.contents();
        assert!(out.contains("no geocoding match"), "{out}");
        assert!(!out.contains("WARN"), "{out}");
    }

    #[tokio::test]
    async fn test_resolve_empty_result() {
        let r = resolver(FakeTransport::ok("[]"));
        assert_eq!(r.resolve("Qwkxyzplace").await, Resolution::Unresolved);
        assert!(matches!(
            r.try_resolve("Qwkxyzplace").await,
            Err(LocationError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_connection_refused() {
        let r = resolver(FakeTransport::refused());
        assert_eq!(r.resolve("Paris").await, Resolution::Unresolved);
        assert!(matches!(
            r.try_resolve("Paris").await,
            Err(LocationError::Transport(_))
        ));
    }

    #[tokio::test]
    async fn test_resolve_server_error() {
        let r = resolver(FakeTransport::respond(503, "Service Unavailable"));
        assert_eq!(r.resolve("Paris").await, Resolution::Unresolved);
    }

    #[tokio::test]
    async fn test_resolve_non_numeric() {
        let r = resolver(FakeTransport::ok(r#"[{"lat": "abc", "lon": "2.3522"}]"#));
        assert_eq!(r.resolve("Paris").await, Resolution::Unresolved);
    }

    #[tokio::test]
    async fn test_resolve_malformed_payload() {
        let r = resolver(FakeTransport::ok(r#"[{"name": "Paris"}]"#));
        assert_eq!(r.resolve("Paris").await, Resolution::Unresolved);
    }

    #[tokio::test]
    async fn test_one_request_per_call() {
        let r = resolver(FakeTransport::ok(r#"[{"lat": "59.3293", "lon": "18.0686"}]"#));
        r.resolve("Stockholm").await;
        r.resolve("Stockholm").await;

        // No caching between calls.
        let requests = r.transport.requests();
        assert_eq!(requests.len(), 2);
        let req = &requests[0];
        assert_eq!(req.param("q"), Some("Stockholm"));
        assert_eq!(req.param("format"), Some("json"));
        assert_eq!(req.param("limit"), Some("1"));
        assert_eq!(req.user_agent, "WeatherMCP/1.0");
    }

    #[tokio::test]
    async fn test_query_trimmed() {
        let r = resolver(FakeTransport::ok(r#"[{"lat": "35.6762", "lon": "139.6503"}]"#));
        let c = r.try_resolve("  Tokyo \n").await.unwrap();
        assert_abs_diff_eq!(c.latitude, 35.6762);
        assert_abs_diff_eq!(c.longitude, 139.6503);
        assert_eq!(r.transport.requests()[0].param("q"), Some("Tokyo"));
    }

    #[tokio::test]
    async fn test_blank_query_skips_network() {
        let r = resolver(FakeTransport::ok(r#"[{"lat": "1", "lon": "1"}]"#));
        assert_eq!(r.resolve("   ").await, Resolution::Unresolved);
        assert!(matches!(r.try_resolve("").await, Err(LocationError::EmptyQuery)));
        assert!(r.transport.requests().is_empty());
    }

    #[tokio::test]
    async fn test_custom_config_used() {
        let config = ResolverConfig::default()
            .with_endpoint("http://geocoder.internal/search")
            .with_user_agent("WeatherAgent/2.0");
        let r = LocationResolver::with_transport(FakeTransport::ok("[]"), config);
        r.resolve("Oslo").await;
        let req = &r.transport.requests()[0];
        assert_eq!(req.url, "http://geocoder.internal/search");
        assert_eq!(req.user_agent, "WeatherAgent/2.0");
    }

    #[tokio::test]
    async fn test_dyn_transport() {
        let transport: Box<dyn Transport> =
            Box::new(FakeTransport::ok(r#"[{"lat": "-1.2921", "lon": "36.8219"}]"#));
        let r = LocationResolver::with_transport(transport, ResolverConfig::default());
        let res = r.resolve("Nairobi").await;
        assert_eq!(res.coordinate(), Some(Coordinate::new(-1.2921, 36.8219)));
    }
}

//! Best-effort contract reporting for the live analysis path.
//!
//! Each discovered contract becomes one HTTP POST: the metadata rides as
//! query parameters, the synthesized schema as a text/plain body, and the
//! endpoint is the configured base URL plus a per-direction route suffix.
//! Delivery is at-most-once: a failure is handed to the injected
//! [`ReportObserver`] and dropped -- never retried, never propagated to the
//! analysis that triggered it.

use std::time::Duration;

use msgmap_core::{ContractRecord, Direction};

/// Default ingest endpoint of a locally running catalog server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/messages";

const BASE_URL_VAR: &str = "MSGMAP_BASE_URL";
const PUBLISH_ROUTE_VAR: &str = "MSGMAP_PUBLISH_ROUTE";
const SUBSCRIBE_ROUTE_VAR: &str = "MSGMAP_SUBSCRIBE_ROUTE";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Reporter endpoint configuration.
///
/// Constructed once and owned by the reporter; nothing here is ambient
/// process state. Route suffixes append verbatim to the base URL, so they
/// default to `?direction=...` -- or `&direction=...` when the base already
/// carries a query string.
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    pub base_url: String,
    pub publish_route: String,
    pub subscribe_route: String,
}

impl ReporterConfig {
    /// Derives the per-direction routes for `base_url`.
    pub fn for_base_url(base_url: &str) -> Self {
        let separator = if base_url.contains('?') { '&' } else { '?' };
        ReporterConfig {
            base_url: base_url.to_string(),
            publish_route: format!("{}direction=publish", separator),
            subscribe_route: format!("{}direction=subscribe", separator),
        }
    }

    /// Reads `MSGMAP_BASE_URL`, `MSGMAP_PUBLISH_ROUTE` and
    /// `MSGMAP_SUBSCRIBE_ROUTE`, falling back to the defaults above.
    pub fn from_env() -> Self {
        let base_url =
            std::env::var(BASE_URL_VAR).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let derived = ReporterConfig::for_base_url(&base_url);
        ReporterConfig {
            publish_route: std::env::var(PUBLISH_ROUTE_VAR).unwrap_or(derived.publish_route),
            subscribe_route: std::env::var(SUBSCRIBE_ROUTE_VAR).unwrap_or(derived.subscribe_route),
            base_url: derived.base_url,
        }
    }
}

impl Default for ReporterConfig {
    fn default() -> Self {
        ReporterConfig::for_base_url(DEFAULT_BASE_URL)
    }
}

/// Receives the outcome of each report attempt.
pub trait ReportObserver: Send + Sync {
    fn sent(&self, _message_name: &str) {}
    fn failed(&self, message_name: &str, error: &dyn std::error::Error);
}

/// Default observer: logs outcomes through `tracing`.
pub struct LogObserver;

impl ReportObserver for LogObserver {
    fn sent(&self, message_name: &str) {
        tracing::debug!(message = message_name, "contract reported");
    }

    fn failed(&self, message_name: &str, error: &dyn std::error::Error) {
        tracing::warn!(message = message_name, %error, "contract report failed");
    }
}

/// Posts discovered contracts to the catalog server.
pub struct ContractReporter {
    client: reqwest::blocking::Client,
    config: ReporterConfig,
    observer: Box<dyn ReportObserver>,
}

impl ContractReporter {
    pub fn new(config: ReporterConfig) -> Self {
        ContractReporter::with_observer(config, Box::new(LogObserver))
    }

    pub fn with_observer(config: ReporterConfig, observer: Box<dyn ReportObserver>) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        ContractReporter {
            client,
            config,
            observer,
        }
    }

    /// Reports one contract, best-effort. The outcome goes to the observer;
    /// the caller never sees a failure.
    pub fn send(&self, record: &ContractRecord, compilation_id: Option<&str>) {
        let route = match record.direction {
            Direction::Publish => &self.config.publish_route,
            Direction::Subscribe => &self.config.subscribe_route,
        };
        let url = format!("{}{}", self.config.base_url, route);
        let result = self
            .client
            .post(&url)
            .query(&[
                ("messageName", record.name.as_str()),
                ("messageDescription", record.description.as_deref().unwrap_or_default()),
                ("moduleName", record.module.as_deref().unwrap_or_default()),
                ("assemblyName", record.assembly.as_str()),
                ("compilationId", compilation_id.unwrap_or_default()),
                ("location", record.location.as_str()),
            ])
            .header(reqwest::header::CONTENT_TYPE, "text/plain")
            .body(record.schema.clone().unwrap_or_default())
            .send()
            .and_then(|response| response.error_for_status());
        match result {
            Ok(_) => self.observer.sent(&record.name),
            Err(error) => self.observer.failed(&record.name, &error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct RecordingObserver {
        sent: Mutex<Vec<String>>,
        failed: Mutex<Vec<String>>,
    }

    impl ReportObserver for Arc<RecordingObserver> {
        fn sent(&self, message_name: &str) {
            self.as_ref().sent.lock().unwrap().push(message_name.to_string());
        }

        fn failed(&self, message_name: &str, _error: &dyn std::error::Error) {
            self.as_ref().failed.lock().unwrap().push(message_name.to_string());
        }
    }

    fn record(direction: Direction) -> ContractRecord {
        ContractRecord {
            name: "order.created".to_string(),
            schema: None,
            description: Some("an order".to_string()),
            module: None,
            assembly: "Shop.Sales".to_string(),
            location: "src/Orders.cs:11".to_string(),
            direction,
        }
    }

    #[test]
    fn routes_derive_from_base_url_query_shape() {
        let plain = ReporterConfig::for_base_url("http://localhost:3000/messages");
        assert_eq!(plain.publish_route, "?direction=publish");
        assert_eq!(plain.subscribe_route, "?direction=subscribe");

        let with_query = ReporterConfig::for_base_url("http://host/ingest?tenant=a");
        assert_eq!(with_query.publish_route, "&direction=publish");
        assert_eq!(with_query.subscribe_route, "&direction=subscribe");
    }

    #[test]
    fn send_posts_direction_route_and_query_parameters() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut buf = [0u8; 4096];
            let mut request = String::new();
            loop {
                let n = stream.read(&mut buf).unwrap();
                request.push_str(&String::from_utf8_lossy(&buf[..n]));
                if request.contains("\r\n\r\n") || n == 0 {
                    break;
                }
            }
            stream
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-length: 0\r\n\r\n")
                .unwrap();
            request
        });

        let observer = Arc::new(RecordingObserver::default());
        let config = ReporterConfig::for_base_url(&format!("http://{}/messages", addr));
        let reporter = ContractReporter::with_observer(config, Box::new(observer.clone()));
        reporter.send(&record(Direction::Publish), Some("c1"));

        let request = server.join().unwrap();
        let request_line = request.lines().next().unwrap();
        assert!(request_line.starts_with("POST /messages?direction=publish&"));
        assert!(request_line.contains("messageName=order.created"));
        assert!(request_line.contains("assemblyName=Shop.Sales"));
        assert!(request_line.contains("compilationId=c1"));
        assert!(request_line.contains("location=src%2FOrders.cs%3A11"));
        assert_eq!(observer.sent.lock().unwrap().as_slice(), ["order.created"]);
        assert!(observer.failed.lock().unwrap().is_empty());
    }

    #[test]
    fn transport_failure_reaches_observer_and_nothing_else() {
        let observer = Arc::new(RecordingObserver::default());
        // Nothing listens here; connection is refused immediately.
        let config = ReporterConfig::for_base_url("http://127.0.0.1:1/messages");
        let reporter = ContractReporter::with_observer(config, Box::new(observer.clone()));
        reporter.send(&record(Direction::Subscribe), None);
        assert_eq!(observer.failed.lock().unwrap().as_slice(), ["order.created"]);
        assert!(observer.sent.lock().unwrap().is_empty());
    }
}

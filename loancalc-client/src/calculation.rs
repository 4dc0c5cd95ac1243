//! Calculation services.
//!
//! The `CalculationService` trait abstracts over where a schedule comes
//! from: the live HTTP endpoint, or canned outcomes for tests and demos.
//!
//! Every failure is reported as a [`TransportFailure`], which carries the
//! HTTP status (0 when no response arrived) so the controller can pick the
//! banner text.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use loancalc::config::ControllerConfig;
use loancalc::schedule::{CalculationResponse, LoanRequest, TransportFailure};

/// Trait for requesting an amortization schedule.
#[async_trait::async_trait]
pub trait CalculationService: Send + Sync {
    /// Submits one calculation request.
    async fn calculate(
        &self,
        request: &LoanRequest,
    ) -> Result<CalculationResponse, TransportFailure>;

    /// Probes the server's health endpoint, returning its body text.
    async fn health(&self) -> Result<String, TransportFailure>;
}

/// A service that answers every request with the same outcome.
///
/// Useful when you want to:
/// - Run controller and TUI tests without a server
/// - Demonstrate the screens offline
#[derive(Debug, Clone)]
pub struct StaticCalculationService {
    outcome: Result<CalculationResponse, TransportFailure>,
    received: Arc<Mutex<Vec<LoanRequest>>>,
}

impl StaticCalculationService {
    pub fn new(outcome: Result<CalculationResponse, TransportFailure>) -> Self {
        Self {
            outcome,
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn succeeding(response: CalculationResponse) -> Self {
        Self::new(Ok(response))
    }

    pub fn failing(failure: TransportFailure) -> Self {
        Self::new(Err(failure))
    }

    /// Requests seen so far, oldest first.
    pub fn received(&self) -> Vec<LoanRequest> {
        self.received
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl CalculationService for StaticCalculationService {
    async fn calculate(
        &self,
        request: &LoanRequest,
    ) -> Result<CalculationResponse, TransportFailure> {
        if let Ok(mut guard) = self.received.lock() {
            guard.push(request.clone());
        }
        self.outcome.clone()
    }

    async fn health(&self) -> Result<String, TransportFailure> {
        match &self.outcome {
            Err(failure) if failure.status == 0 => Err(failure.clone()),
            _ => Ok("static".to_string()),
        }
    }
}

/// Network configuration for the HTTP service.
#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub timeout_seconds: u64,
    pub connect_timeout_seconds: u64,
    pub user_agent: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 10,
            connect_timeout_seconds: 5,
            user_agent: format!("loancalc/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl From<&ControllerConfig> for NetworkConfig {
    fn from(config: &ControllerConfig) -> Self {
        let timeout_seconds = config.request_timeout_secs;
        Self {
            timeout_seconds,
            connect_timeout_seconds: timeout_seconds.min(5),
            ..Self::default()
        }
    }
}

impl NetworkConfig {
    fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

// =============================================================================
// HTTP Implementation (using reqwest)
// =============================================================================

/// Posts requests to the configured calculation endpoint.
#[cfg(feature = "http")]
#[derive(Debug, Clone)]
pub struct HttpCalculationService {
    client: reqwest::Client,
    calculate_url: String,
    health_url: String,
    wire_format: loancalc::schedule::WireFormat,
}

#[cfg(feature = "http")]
impl HttpCalculationService {
    pub fn new(
        config: &ControllerConfig,
        network: &NetworkConfig,
    ) -> Result<Self, loancalc::LoanError> {
        config.validate()?;
        let client = reqwest::Client::builder()
            .timeout(network.timeout())
            .connect_timeout(network.connect_timeout())
            .user_agent(network.user_agent.clone())
            .build()
            .map_err(|e| {
                loancalc::LoanError::Configuration(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            calculate_url: config.calculate_url(),
            health_url: config.health_url(),
            wire_format: config.wire_format,
        })
    }

    /// Builds a service from the controller configuration alone.
    pub fn from_config(config: &ControllerConfig) -> Result<Self, loancalc::LoanError> {
        Self::new(config, &NetworkConfig::from(config))
    }

    pub fn calculate_url(&self) -> &str {
        &self.calculate_url
    }
}

#[cfg(feature = "http")]
fn no_response(error: reqwest::Error) -> TransportFailure {
    let description = if error.is_timeout() {
        format!("timeout: {}", error)
    } else {
        error.to_string()
    };
    TransportFailure::no_response(description)
}

#[cfg(feature = "http")]
async fn read_body(
    response: reqwest::Response,
) -> Result<(reqwest::StatusCode, String), TransportFailure> {
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| TransportFailure::with_status(status.as_u16(), e.to_string(), None))?;
    Ok((status, text))
}

#[cfg(feature = "http")]
fn status_failure(status: reqwest::StatusCode, body: String) -> TransportFailure {
    let description = status.canonical_reason().unwrap_or("Unknown Status");
    let body = (!body.is_empty()).then_some(body);
    TransportFailure::with_status(status.as_u16(), description, body)
}

#[cfg(feature = "http")]
#[async_trait::async_trait]
impl CalculationService for HttpCalculationService {
    async fn calculate(
        &self,
        request: &LoanRequest,
    ) -> Result<CalculationResponse, TransportFailure> {
        let body = request.to_json(self.wire_format);
        tracing::debug!(url = %self.calculate_url, "posting calculation request");

        let response = self
            .client
            .post(&self.calculate_url)
            .json(&body)
            .send()
            .await
            .map_err(no_response)?;
        let (status, text) = read_body(response).await?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "calculation endpoint returned an error status");
            return Err(status_failure(status, text));
        }

        match serde_json::from_str::<CalculationResponse>(&text) {
            Ok(response) => Ok(response),
            Err(e) => Err(TransportFailure::with_status(
                status.as_u16(),
                format!("invalid response body: {}", e),
                Some(text),
            )),
        }
    }

    async fn health(&self) -> Result<String, TransportFailure> {
        let response = self
            .client
            .get(&self.health_url)
            .send()
            .await
            .map_err(no_response)?;
        let (status, text) = read_body(response).await?;
        if status.is_success() {
            Ok(text)
        } else {
            Err(status_failure(status, text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loancalc::types::messages;
    use rust_decimal_macros::dec;

    fn request() -> LoanRequest {
        LoanRequest {
            start_date: "2024-01-10".into(),
            end_date: "2024-06-10".into(),
            first_payment_date: "2024-01-15".into(),
            loan_amount: dec!(10000),
            interest_rate: dec!(2),
            installment_count: None,
        }
    }

    #[tokio::test]
    async fn test_static_service_records_requests() {
        let service = StaticCalculationService::succeeding(CalculationResponse::succeeded(vec![]));
        let response = service.calculate(&request()).await.unwrap();
        assert!(response.success);
        assert_eq!(service.received(), vec![request()]);
    }

    #[tokio::test]
    async fn test_static_service_health_follows_outcome() {
        let down = StaticCalculationService::failing(TransportFailure::no_response("refused"));
        assert!(down.health().await.is_err());
        let up = StaticCalculationService::failing(TransportFailure::with_status(500, "x", None));
        assert_eq!(up.health().await.unwrap(), "static");
    }

    #[test]
    fn test_network_config_from_controller() {
        let config = ControllerConfig {
            request_timeout_secs: 3,
            ..Default::default()
        };
        let network = NetworkConfig::from(&config);
        assert_eq!(network.timeout_seconds, 3);
        assert_eq!(network.connect_timeout_seconds, 3);
        assert!(network.user_agent.starts_with("loancalc/"));
    }

    #[cfg(feature = "http")]
    mod http {
        use super::*;
        use loancalc::schedule::WireFormat;
        use tokio::io::{AsyncReadExt, AsyncWriteExt};
        use tokio::net::TcpListener;
        use tokio::task::JoinHandle;

        fn http_response(status_line: &str, body: &str) -> String {
            format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
        }

        /// Reads one request, answers with `response`, returns the request body.
        async fn serve_once(response: String) -> (String, JoinHandle<String>) {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            let handle = tokio::spawn(async move {
                let (mut socket, _) = listener.accept().await.unwrap();
                let mut buf = Vec::new();
                let mut chunk = [0u8; 1024];
                let body = loop {
                    let n = socket.read(&mut chunk).await.unwrap();
                    buf.extend_from_slice(&chunk[..n]);
                    let text = String::from_utf8_lossy(&buf).to_string();
                    if let Some(split) = text.find("\r\n\r\n") {
                        let headers = text[..split].to_ascii_lowercase();
                        let length = headers
                            .lines()
                            .find_map(|l| l.strip_prefix("content-length:"))
                            .and_then(|v| v.trim().parse::<usize>().ok())
                            .unwrap_or(0);
                        let body = &text[split + 4..];
                        if body.len() >= length || n == 0 {
                            break body.to_string();
                        }
                    }
                    if n == 0 {
                        break String::new();
                    }
                };
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.ok();
                body
            });
            (format!("http://{addr}"), handle)
        }

        fn service(base_url: &str, wire_format: WireFormat) -> HttpCalculationService {
            let config = ControllerConfig::default()
                .with_base_url(base_url)
                .with_wire_format(wire_format);
            HttpCalculationService::from_config(&config).unwrap()
        }

        #[tokio::test]
        async fn test_success_response_is_decoded() {
            let body = r#"{"success":true,"rows":[{"competenceDate":[2024,3,1],"loanAmount":10000}]}"#;
            let (url, server) = serve_once(http_response("200 OK", body)).await;

            let response = service(&url, WireFormat::Standard)
                .calculate(&request())
                .await
                .unwrap();
            assert!(response.success);
            let rows = response.rows.unwrap();
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].loan_amount, Some(dec!(10000)));

            let sent: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
            assert_eq!(sent["startDate"], "2024-01-10");
            assert_eq!(sent["loanAmount"], serde_json::json!(10000.0));
        }

        #[tokio::test]
        async fn test_legacy_wire_names_are_sent() {
            let (url, server) =
                serve_once(http_response("200 OK", r#"{"success":true,"rows":[]}"#)).await;
            service(&url, WireFormat::Legacy)
                .calculate(&request())
                .await
                .unwrap();
            let sent: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
            assert_eq!(sent["dataInicial"], "2024-01-10");
            assert_eq!(sent["taxaJuros"], serde_json::json!(2.0));
        }

        #[tokio::test]
        async fn test_business_failure_with_bad_request_status() {
            let body = r#"{"success":false,"message":"insufficient data"}"#;
            let (url, _server) = serve_once(http_response("400 Bad Request", body)).await;

            let failure = service(&url, WireFormat::Standard)
                .calculate(&request())
                .await
                .unwrap_err();
            assert_eq!(failure.status, 400);
            assert_eq!(failure.description, "Bad Request");
            assert_eq!(failure.user_message(), "insufficient data");
        }

        #[tokio::test]
        async fn test_status_without_message() {
            let (url, _server) =
                serve_once(http_response("503 Service Unavailable", "")).await;
            let failure = service(&url, WireFormat::Standard)
                .calculate(&request())
                .await
                .unwrap_err();
            assert_eq!(failure.body, None);
            assert_eq!(failure.user_message(), "Error 503: Service Unavailable");
        }

        #[tokio::test]
        async fn test_undecodable_success_body() {
            let (url, _server) = serve_once(http_response("200 OK", "<html>")).await;
            let failure = service(&url, WireFormat::Standard)
                .calculate(&request())
                .await
                .unwrap_err();
            assert_eq!(failure.status, 200);
            assert!(failure.description.starts_with("invalid response body"));
        }

        #[tokio::test]
        async fn test_refused_connection_has_status_zero() {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            let addr = listener.local_addr().unwrap();
            drop(listener);

            let failure = service(&format!("http://{addr}"), WireFormat::Standard)
                .calculate(&request())
                .await
                .unwrap_err();
            assert_eq!(failure.status, 0);
            assert_eq!(failure.user_message(), messages::CONNECTION_FAILED);
        }

        #[tokio::test]
        async fn test_health() {
            let (url, _server) = serve_once(http_response("200 OK", "Loan API is running")).await;
            let body = service(&url, WireFormat::Standard).health().await.unwrap();
            assert_eq!(body, "Loan API is running");
        }
    }
}

//! CVE Database Client.

use crate::error::Result;
use crate::matcher::{filter_matching, MatchQuery};
use crate::nvd;
use cvescan_core::CveRecord;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, warn};

const NVD_BASE_URL: &str = "https://services.nvd.nist.gov/rest/json/cves/2.0";
const RESULTS_PER_PAGE: u32 = 50;
const NO_KEY_INTERVAL_SECS: f64 = 6.0;
const WITH_KEY_INTERVAL_SECS: f64 = 0.6;
const REQUEST_TIMEOUT_SECS: u64 = 15;

/// Single-writer, monotonic-clock rate limiter: sleeps the remainder of the
/// minimum interval before letting a request through.
struct RateLimiter {
    last_request: Instant,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: Instant::now() - min_interval,
            min_interval,
        }
    }

    async fn wait_if_needed(&mut self) {
        let elapsed = self.last_request.elapsed();
        if elapsed < self.min_interval {
            let wait = self.min_interval - elapsed;
            debug!("rate limiting CVE lookup: sleeping {:?}", wait);
            tokio::time::sleep(wait).await;
        }
        self.last_request = Instant::now();
    }
}

/// Client for the NVD CVE REST API, with the keyword search + normalization
/// + applicability filtering pipeline (§4.B + §4.C) folded into `search`.
pub struct CveClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    rate_limiter: Arc<Mutex<RateLimiter>>,
}

fn build_http(timeout_secs: u64) -> Client {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("cvescan/", env!("CARGO_PKG_VERSION")))
        .build()
        .expect("failed to build HTTP client")
}

impl CveClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(NVD_BASE_URL, api_key)
    }

    pub fn with_base_url(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        let interval = if api_key.is_some() {
            WITH_KEY_INTERVAL_SECS
        } else {
            NO_KEY_INTERVAL_SECS
        };

        Self {
            http: build_http(REQUEST_TIMEOUT_SECS),
            base_url: base_url.into(),
            api_key,
            rate_limiter: Arc::new(Mutex::new(RateLimiter::new(Duration::from_secs_f64(interval)))),
        }
    }

    /// Override the per-request timeout (default `REQUEST_TIMEOUT_SECS`),
    /// rebuilding the underlying HTTP client. Lets `cvescan.toml`'s
    /// `[nvd].timeout_secs` actually reach the wire instead of being a
    /// config knob nothing reads.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.http = build_http(timeout_secs);
        self
    }

    /// Query by vendor/product/version, returning only the CVEs whose CPE
    /// applicability matches the query. Fails soft: any network, HTTP, or deserialization error yields an
    /// empty result rather than aborting the run.
    pub async fn search(&self, vendor: Option<&str>, product: &str, version: &str) -> Vec<CveRecord> {
        let keyword = match vendor {
            Some(v) => format!("{v} {product}"),
            None => product.to_string(),
        };

        let raw = match self.fetch(&keyword).await {
            Ok(records) => records,
            Err(e) => {
                warn!("CVE lookup failed for '{keyword}': {e}");
                return Vec::new();
            }
        };

        let query = MatchQuery { vendor, product, version };
        filter_matching(raw, &query)
    }

    async fn fetch(&self, keyword: &str) -> Result<Vec<CveRecord>> {
        self.rate_limiter.lock().await.wait_if_needed().await;

        let mut request = self
            .http
            .get(&self.base_url)
            .query(&[
                ("keywordSearch", keyword.to_string()),
                ("resultsPerPage", RESULTS_PER_PAGE.to_string()),
            ]);

        if let Some(key) = &self.api_key {
            request = request.header("apiKey", key.as_str());
        }

        debug!("querying NVD for keyword '{keyword}'");
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                crate::error::AdvisoryError::Timeout
            } else {
                crate::error::AdvisoryError::RequestFailed(e)
            }
        })?;

        if !response.status().is_success() {
            return Err(crate::error::AdvisoryError::ApiError(response.status().as_u16()));
        }

        let body = response.text().await?;
        Ok(nvd::parse_response(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SAMPLE_RESPONSE: &str = r#"{
        "vulnerabilities": [{
            "cve": {
                "id": "CVE-2024-9999",
                "metrics": {
                    "cvssMetricV31": [{"cvssData": {"baseScore": 7.5}, "baseSeverity": "HIGH"}]
                },
                "configurations": [{
                    "nodes": [{
                        "cpeMatch": [{
                            "vulnerable": true,
                            "criteria": "cpe:2.3:a:openssl:openssl:1.0.0:*:*:*:*:*:*:*"
                        }]
                    }]
                }]
            }
        }]
    }"#;

    #[tokio::test]
    async fn search_returns_matching_cves_from_mock_server() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_RESPONSE))
            .mount(&server)
            .await;

        let client = CveClient::with_base_url(server.uri(), None);
        let results = client.search(Some("openssl"), "openssl", "1.0.0").await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, "CVE-2024-9999");
    }

    #[tokio::test]
    async fn search_fails_soft_to_empty_on_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = CveClient::with_base_url(server.uri(), None);
        let results = client.search(Some("openssl"), "openssl", "1.0.0").await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn search_fails_soft_to_empty_on_malformed_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = CveClient::with_base_url(server.uri(), None);
        let results = client.search(None, "openssl", "1.0.0").await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn search_fails_soft_to_empty_on_request_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_string(SAMPLE_RESPONSE).set_delay(Duration::from_millis(50)))
            .mount(&server)
            .await;

        let client = CveClient::with_base_url(server.uri(), None).with_timeout(0);
        let results = client.search(Some("openssl"), "openssl", "1.0.0").await;
        assert!(results.is_empty());
    }
}

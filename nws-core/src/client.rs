use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use reqwest::{
    Client,
    header::{self, HeaderMap, HeaderValue},
};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use crate::{
    error::{NwsError, truncate_body},
    model::{Forecast, GridReference},
};

pub const DEFAULT_BASE_URL: &str = "https://api.weather.gov";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

const GEO_JSON: &str = "application/geo+json";

/// Everything needed to build an [`NwsClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientOptions {
    /// Sent as `User-Agent` on every request. The NWS API rejects anonymous callers.
    pub user_agent: Option<String>,
    pub base_url: String,
    /// Whole-request timeout. `0` disables it.
    pub timeout_secs: u64,
}

impl ClientOptions {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            user_agent: Some(user_agent.into()),
            ..Self::default()
        }
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            user_agent: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[async_trait]
pub trait WeatherService: Send + Sync + Debug {
    /// Resolve a latitude/longitude pair to the forecast grid covering it.
    async fn resolve_grid_reference(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<GridReference, NwsError>;

    /// Fetch the multi-period forecast for a grid point.
    async fn fetch_forecast(
        &self,
        office: &str,
        grid_x: i32,
        grid_y: i32,
    ) -> Result<Forecast, NwsError>;
}

/// Client for the `/points` and `/gridpoints/.../forecast` endpoints of api.weather.gov.
///
/// Stateless apart from its configuration; clones share the underlying connection pool
/// and calls may be issued concurrently.
#[derive(Debug, Clone)]
pub struct NwsClient {
    http: Client,
    base_url: String,
    user_agent: String,
}

impl NwsClient {
    /// Build a client against the public API.
    ///
    /// `user_agent` should identify the application and a contact,
    /// e.g. `"my-weather-app, contact@example.com"`.
    pub fn new(user_agent: impl Into<String>) -> Result<Self, NwsError> {
        Self::from_options(ClientOptions::new(user_agent))
    }

    pub fn from_options(options: ClientOptions) -> Result<Self, NwsError> {
        let user_agent = options
            .user_agent
            .filter(|ua| !ua.is_empty())
            .ok_or_else(NwsError::missing_user_agent)?;

        let user_agent_value = HeaderValue::from_str(&user_agent).map_err(|e| {
            NwsError::InvalidConfiguration(format!("user agent is not a valid header value: {e}"))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(header::USER_AGENT, user_agent_value);
        headers.insert(header::ACCEPT, HeaderValue::from_static(GEO_JSON));

        let mut builder = Client::builder().default_headers(headers);
        if options.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(options.timeout_secs));
        }

        let http = builder
            .build()
            .map_err(|e| NwsError::InvalidConfiguration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: options.base_url.trim_end_matches('/').to_string(),
            user_agent,
        })
    }

    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn points_url(&self, latitude: f64, longitude: f64) -> String {
        format!("{}/points/{}", self.base_url, format_coordinates(latitude, longitude))
    }

    pub fn forecast_url(&self, office: &str, grid_x: i32, grid_y: i32) -> String {
        format!("{}/gridpoints/{office}/{grid_x},{grid_y}/forecast", self.base_url)
    }

    #[instrument(skip(self))]
    pub async fn resolve_grid_reference(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<GridReference, NwsError> {
        let url = self.points_url(latitude, longitude);
        self.get_json(&url).await
    }

    #[instrument(skip(self))]
    pub async fn fetch_forecast(
        &self,
        office: &str,
        grid_x: i32,
        grid_y: i32,
    ) -> Result<Forecast, NwsError> {
        let url = self.forecast_url(office, grid_x, grid_y);
        self.get_json(&url).await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, NwsError> {
        debug!(%url, "sending request");

        let res = self.http.get(url).send().await.map_err(|e| {
            warn!(%url, error = %e, "request failed before a response was received");
            NwsError::UpstreamRequestFailed {
                status: None,
                body: None,
                message: format!("GET {url} failed: {e}"),
            }
        })?;

        let status = res.status();
        debug!(%url, status = status.as_u16(), "received response");

        let body = res.text().await.map_err(|e| NwsError::UpstreamRequestFailed {
            status: Some(status.as_u16()),
            body: None,
            message: format!("failed to read response body from {url}: {e}"),
        })?;

        if !status.is_success() {
            warn!(%url, status = status.as_u16(), "upstream returned an error status");
            return Err(NwsError::UpstreamRequestFailed {
                status: Some(status.as_u16()),
                message: format!("GET {url} returned {status}: {}", truncate_body(&body)),
                body: Some(body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!(%url, error = %e, "failed to decode response body");
            NwsError::UpstreamRequestFailed {
                status: Some(status.as_u16()),
                message: format!("failed to parse response from {url}: {e}"),
                body: Some(body),
            }
        })
    }
}

#[async_trait]
impl WeatherService for NwsClient {
    async fn resolve_grid_reference(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<GridReference, NwsError> {
        NwsClient::resolve_grid_reference(self, latitude, longitude).await
    }

    async fn fetch_forecast(
        &self,
        office: &str,
        grid_x: i32,
        grid_y: i32,
    ) -> Result<Forecast, NwsError> {
        NwsClient::fetch_forecast(self, office, grid_x, grid_y).await
    }
}

/// Path segment for `/points`: shortest decimal that round-trips each `f64`, comma separated.
///
/// `Display` for `f64` never switches to exponent notation, so the path is stable for
/// any input. No range checks; the API answers out-of-range points with a 4xx.
pub fn format_coordinates(latitude: f64, longitude: f64) -> String {
    format!("{latitude},{longitude}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_user_agent_is_rejected() {
        let err = NwsClient::new("").unwrap_err();

        assert!(matches!(err, NwsError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("a user agent is required"));
    }

    #[test]
    fn whitespace_user_agent_is_accepted() {
        let client = NwsClient::new("   ").expect("non-empty user agent should build");
        assert_eq!(client.user_agent(), "   ");
    }

    #[test]
    fn non_ascii_user_agent_is_accepted() {
        assert!(NwsClient::new("Météo-Québec, contact@exemple.ca").is_ok());
    }

    #[test]
    fn zero_timeout_builds_client() {
        let client = NwsClient::from_options(ClientOptions {
            timeout_secs: 0,
            ..ClientOptions::new("test-app")
        });
        assert!(client.is_ok());
    }

    #[test]
    fn absent_user_agent_is_rejected() {
        let err = NwsClient::from_options(ClientOptions::default()).unwrap_err();
        assert!(matches!(err, NwsError::InvalidConfiguration(_)));
    }

    #[test]
    fn user_agent_with_control_characters_is_rejected() {
        let err = NwsClient::new("app\r\nX-Injected: 1").unwrap_err();

        assert!(matches!(err, NwsError::InvalidConfiguration(_)));
        assert!(err.to_string().contains("not a valid header value"));
    }

    #[test]
    fn valid_user_agent_builds_client() {
        let client = NwsClient::new("test-app, test@example.com").expect("client should build");

        assert_eq!(client.user_agent(), "test-app, test@example.com");
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = NwsClient::from_options(ClientOptions {
            base_url: "http://localhost:8080/".to_string(),
            ..ClientOptions::new("test-app")
        })
        .expect("client should build");

        assert_eq!(client.points_url(1.5, 2.5), "http://localhost:8080/points/1.5,2.5");
    }

    #[test]
    fn points_url_keeps_coordinates_verbatim() {
        let client = NwsClient::new("test-app").expect("client should build");

        assert_eq!(
            client.points_url(39.7456, -97.0892),
            "https://api.weather.gov/points/39.7456,-97.0892"
        );
    }

    #[test]
    fn forecast_url_uses_office_and_grid() {
        let client = NwsClient::new("test-app").expect("client should build");

        assert_eq!(
            client.forecast_url("TOP", 31, 80),
            "https://api.weather.gov/gridpoints/TOP/31,80/forecast"
        );
    }

    #[test]
    fn coordinates_use_shortest_decimal_form() {
        assert_eq!(format_coordinates(40.0, -105.0), "40,-105");
        assert_eq!(format_coordinates(0.1, -0.25), "0.1,-0.25");
        assert_eq!(format_coordinates(1e-7, 123.456789), "0.0000001,123.456789");
    }

    #[test]
    fn out_of_range_coordinates_are_not_validated() {
        assert_eq!(format_coordinates(91.0, 200.5), "91,200.5");
    }
}

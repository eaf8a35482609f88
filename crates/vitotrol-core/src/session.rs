//! Authenticated connection to the Vitotrol SOAP service.
//!
//! # Example
//!
//! ```no_run
//! use vitotrol_core::Session;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let session = Session::new(vitotrol_core::MAIN_URL)?;
//! session.login("user@example.com", "secret").await?;
//! assert!(session.is_logged_in().await);
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, COOKIE, HeaderMap, SET_COOKIE};
use tokio::sync::RwLock;
use tracing::debug;

use vitotrol_types::{ActionStatus, AttrId, RefreshId};

use crate::device::Device;
use crate::error::{Error, Result};
use crate::soap::{self, ResultFields, SoapAction, SoapRequest};
use crate::traits::VitotrolApi;

/// Production endpoint of the Vitotrol web service.
pub const MAIN_URL: &str =
    "https://www.viessmann.com/app_vitodata/VIIWebService-1.16.0.0/iPhoneWebService.asmx";

/// Default HTTP timeout for a single SOAP round trip.
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

const APP_ID: &str = "prod";
const APP_VERSION: &str = "4.3.1";
const OS_NAME: &str = "Android";

/// A connection to the Vitotrol service.
///
/// Cloning is cheap: clones share the HTTP connection pool and the session
/// cookie, which is what the background status polls rely on.
#[derive(Debug, Clone)]
pub struct Session {
    client: Client,
    url: Arc<str>,
    cookie: Arc<RwLock<Option<String>>>,
}

impl Session {
    /// Create a session for the service at `url`.
    pub fn new(url: &str) -> Result<Self> {
        let client = Client::builder().timeout(DEFAULT_HTTP_TIMEOUT).build()?;
        Self::with_client(url, client)
    }

    /// Create a session with a custom reqwest Client.
    pub fn with_client(url: &str, client: Client) -> Result<Self> {
        let url = url.trim_end_matches('/');

        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(Error::InvalidUrl(format!(
                "URL must start with http:// or https://, got: {}",
                url
            )));
        }

        Ok(Self {
            client,
            url: Arc::from(url),
            cookie: Arc::new(RwLock::new(None)),
        })
    }

    /// The service URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether the server has handed out a session cookie.
    pub async fn is_logged_in(&self) -> bool {
        self.cookie.read().await.is_some()
    }

    /// Authenticate with the service.
    ///
    /// The session cookie returned by the server is sent with every later call.
    pub async fn login(&self, user: &str, password: &str) -> Result<()> {
        let request = SoapRequest::new(SoapAction::Login)
            .field("AppId", APP_ID)
            .field("AppVersion", APP_VERSION)
            .field("Benutzer", user)
            .field("Betriebssystem", OS_NAME)
            .field("Passwort", password);

        let result = self.call(request).await?;
        debug!(
            user,
            tech_version = result.text("TechVersion").unwrap_or_default(),
            "Logged in"
        );
        Ok(())
    }

    async fn call(&self, request: SoapRequest) -> Result<ResultFields> {
        let action = request.action();
        debug!(action = action.name(), url = %self.url, "Sending SOAP request");

        let mut builder = self
            .client
            .post(&*self.url)
            .header(CONTENT_TYPE, soap::CONTENT_TYPE)
            .header("SOAPAction", action.soap_action_url())
            .body(request.envelope());

        if let Some(cookie) = self.cookie.read().await.as_deref() {
            builder = builder.header(COOKIE, cookie);
        }

        let response = builder.send().await?;

        let received = set_cookie_pairs(response.headers());
        if !received.is_empty() {
            let mut cookie = self.cookie.write().await;
            *cookie = Some(merge_cookies(cookie.as_deref(), &received));
        }

        let status = response.status();
        let body = response.text().await?;

        // SOAP faults come back as HTTP 500 with a parseable body
        if !status.is_success() && !body.contains("Fault") {
            return Err(Error::invalid_response(
                action.name(),
                format!("HTTP status {}", status),
            ));
        }

        soap::parse_result(action, &body)
    }

    async fn request_status(
        &self,
        action: SoapAction,
        refresh_id: &RefreshId,
    ) -> Result<ActionStatus> {
        let request = SoapRequest::new(action).field("AktualisierungsId", refresh_id);
        let result = self.call(request).await?;
        let code: i32 = result.parse("Status")?;
        Ok(ActionStatus::from_code(code))
    }
}

/// Name/value pairs of the `Set-Cookie` headers, attributes dropped.
fn set_cookie_pairs(headers: &HeaderMap) -> Vec<(&str, &str)> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, value)| (name.trim(), value.trim()))
        .filter(|(name, _)| !name.is_empty())
        .collect()
}

/// Update the stored `Cookie` header value with newly received cookies.
///
/// Cookies are keyed by name: a received cookie replaces the stored one with
/// the same name, others are kept in their original order.
fn merge_cookies(stored: Option<&str>, received: &[(&str, &str)]) -> String {
    let mut pairs: Vec<(String, String)> = stored
        .unwrap_or_default()
        .split(';')
        .filter_map(|pair| pair.split_once('='))
        .map(|(name, value)| (name.trim().to_string(), value.trim().to_string()))
        .filter(|(name, _)| !name.is_empty())
        .collect();

    for &(name, value) in received {
        match pairs.iter_mut().find(|(existing, _)| existing == name) {
            Some(pair) => pair.1 = value.to_string(),
            None => pairs.push((name.to_string(), value.to_string())),
        }
    }

    pairs
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("; ")
}

#[async_trait]
impl VitotrolApi for Session {
    async fn write_data(&self, device: &Device, attr: AttrId, value: &str) -> Result<RefreshId> {
        let request = SoapRequest::new(SoapAction::WriteData)
            .field("GeraetId", device.device_id)
            .field("AnlageId", device.location_id)
            .field("DatapunktId", attr)
            .field("Wert", value);

        let result = self.call(request).await?;
        Ok(RefreshId::new(result.require("AktualisierungsId")?))
    }

    async fn request_write_status(&self, refresh_id: &RefreshId) -> Result<ActionStatus> {
        self.request_status(SoapAction::RequestWriteStatus, refresh_id)
            .await
    }

    async fn refresh_data(&self, device: &Device, attrs: &[AttrId]) -> Result<RefreshId> {
        if attrs.is_empty() {
            return Err(Error::invalid_config("no attributes to refresh"));
        }

        let request = SoapRequest::new(SoapAction::RefreshData)
            .field("GeraetId", device.device_id)
            .field("AnlageId", device.location_id)
            .int_list("DatapunktIds", attrs);

        let result = self.call(request).await?;
        Ok(RefreshId::new(result.require("AktualisierungsId")?))
    }

    async fn request_refresh_status(&self, refresh_id: &RefreshId) -> Result<ActionStatus> {
        self.request_status(SoapAction::RequestRefreshStatus, refresh_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_session_creation() {
        let session = Session::new("http://localhost:8080").unwrap();
        assert_eq!(session.url(), "http://localhost:8080");
    }

    #[test]
    fn test_session_normalizes_url() {
        let session = Session::new("http://localhost:8080/").unwrap();
        assert_eq!(session.url(), "http://localhost:8080");
    }

    #[test]
    fn test_session_invalid_url() {
        let result = Session::new("localhost:8080");
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_set_cookie_pairs_strip_attributes() {
        let mut headers = HeaderMap::new();
        headers.append(
            SET_COOKIE,
            HeaderValue::from_static("ASP.NET_SessionId=abc; path=/; HttpOnly"),
        );
        headers.append(SET_COOKIE, HeaderValue::from_static("lb=node2; Secure"));

        assert_eq!(
            set_cookie_pairs(&headers),
            vec![("ASP.NET_SessionId", "abc"), ("lb", "node2")]
        );
        assert!(set_cookie_pairs(&HeaderMap::new()).is_empty());
    }

    #[test]
    fn test_merge_cookies_keeps_unrelated_cookies() {
        let merged = merge_cookies(Some("ASP.NET_SessionId=abc"), &[("lb", "node2")]);
        assert_eq!(merged, "ASP.NET_SessionId=abc; lb=node2");
    }

    #[test]
    fn test_merge_cookies_replaces_by_name() {
        let merged = merge_cookies(
            Some("ASP.NET_SessionId=abc; lb=node1"),
            &[("lb", "node2"), ("ASP.NET_SessionId", "def")],
        );
        assert_eq!(merged, "ASP.NET_SessionId=def; lb=node2");
    }

    #[test]
    fn test_merge_cookies_from_empty() {
        assert_eq!(merge_cookies(None, &[("a", "1")]), "a=1");
    }

    #[tokio::test]
    async fn test_new_session_is_not_logged_in() {
        let session = Session::new(MAIN_URL).unwrap();
        assert!(!session.is_logged_in().await);
    }
}

//! Request signer/builder for the BigBlueButton API.
//!
//! Builds checksummed action URLs and executes them as HTTP GET requests,
//! returning the parsed XML response.
//!
//! # Security
//!
//! - The shared secret never leaves the process; only its checksum is sent
//! - Signed URLs carry meeting passwords, so they are never logged
//! - Error bodies are truncated before being returned
//! - HTTP timeouts prevent hanging connections

use crate::checksum::{checksum, encode_params};
use crate::config::{ConfigError, ConnectionConfig};
use crate::errors::{truncate_error_body, BbbError};
use crate::xml::XmlElement;
use reqwest::Client;
use secrecy::SecretString;
use tracing::{debug, instrument, warn};

/// Client for the BigBlueButton HTTP API.
///
/// Holds no mutable state after construction and can be cloned or shared
/// read-only across tasks.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ConnectionConfig,
    http_client: Client,
}

impl ApiClient {
    /// Create a client from a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::HttpClient` if the HTTP client cannot be built.
    pub fn new(config: ConnectionConfig) -> Result<Self, ConfigError> {
        let http_client = Client::builder()
            .timeout(config.http_timeout())
            .build()
            .map_err(|e| ConfigError::HttpClient(e.to_string()))?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Create a client from a base URL, shared secret and hash algorithm name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidBaseUrl` if the URL is not http(s).
    pub fn from_parts(
        base_url: &str,
        secret: &str,
        hash_algorithm: &str,
    ) -> Result<Self, ConfigError> {
        let config = ConnectionConfig::new(base_url, SecretString::from(secret), hash_algorithm)?;
        Self::new(config)
    }

    /// Get the connection configuration.
    #[must_use]
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// Build the signed URL for an action.
    ///
    /// Produces `{base}{action}?{params}&checksum={checksum}`, or
    /// `{base}{action}?checksum={checksum}` when there are no parameters.
    #[must_use]
    pub fn build_url(&self, action: &str, params: &[(&str, &str)]) -> String {
        let query = encode_params(params);
        let checksum = checksum(
            action,
            &query,
            self.config.secret(),
            self.config.hash_algorithm(),
        );

        if query.is_empty() {
            format!("{}{action}?checksum={checksum}", self.config.base_url())
        } else {
            format!("{}{action}?{query}&checksum={checksum}", self.config.base_url())
        }
    }

    /// Execute an action and return the root element of the XML response.
    ///
    /// # Errors
    ///
    /// - `BbbError::Transport` - network failure or timeout
    /// - `BbbError::RequestFailed` - non-2xx status
    /// - `BbbError::Parse` - body is not well-formed UTF-8 XML
    #[instrument(skip_all, fields(action = %action))]
    pub async fn execute(
        &self,
        action: &str,
        params: &[(&str, &str)],
    ) -> Result<XmlElement, BbbError> {
        let url = self.build_url(action, params);

        debug!(
            target: "bbb.api",
            action = %action,
            param_count = params.len(),
            "Sending API request"
        );

        let response = self.http_client.get(&url).send().await.map_err(|e| {
            // reqwest errors embed the URL, which carries passwords and the checksum
            let e = e.without_url();
            warn!(target: "bbb.api", action = %action, error = %e, "HTTP request failed");
            BbbError::Transport(e.to_string())
        })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(
                target: "bbb.api",
                action = %action,
                status = %status,
                "API returned non-success status"
            );
            return Err(BbbError::RequestFailed {
                status: status.as_u16(),
                body: truncate_error_body(&body),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| BbbError::Transport(e.without_url().to_string()))?;

        let document = XmlElement::parse_bytes(&body).map_err(|e| {
            warn!(target: "bbb.api", action = %action, error = %e, "Failed to parse API response");
            e
        })?;

        debug!(
            target: "bbb.api",
            action = %action,
            return_code = document.return_code().unwrap_or("<none>"),
            "API request completed"
        );

        Ok(document)
    }

    /// Create a meeting.
    ///
    /// # Endpoint
    ///
    /// `GET {base}create?meetingID=..&name=..&moderatorPW=..&attendeePW=..`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn create(
        &self,
        meeting_id: &str,
        name: &str,
        moderator_password: &str,
        attendee_password: &str,
    ) -> Result<XmlElement, BbbError> {
        let params = [
            ("meetingID", meeting_id),
            ("name", name),
            ("moderatorPW", moderator_password),
            ("attendeePW", attendee_password),
        ];
        self.execute("create", &params).await
    }

    /// End a meeting.
    ///
    /// # Endpoint
    ///
    /// `GET {base}end?meetingID=..&password=..`
    ///
    /// # Errors
    ///
    /// See [`ApiClient::execute`].
    pub async fn end(&self, meeting_id: &str, password: &str) -> Result<XmlElement, BbbError> {
        let params = [("meetingID", meeting_id), ("password", password)];
        self.execute("end", &params).await
    }

    /// Join a meeting and return the client URL from the response.
    ///
    /// # Endpoint
    ///
    /// `GET {base}join?meetingID=..&fullName=..&password=..`
    ///
    /// # Errors
    ///
    /// Returns `BbbError::Protocol` if the response has no non-empty `url`
    /// element, otherwise see [`ApiClient::execute`].
    pub async fn join(
        &self,
        meeting_id: &str,
        full_name: &str,
        password: &str,
    ) -> Result<String, BbbError> {
        let params = [
            ("meetingID", meeting_id),
            ("fullName", full_name),
            ("password", password),
        ];
        let document = self.execute("join", &params).await?;

        match document.find_text("url").map(str::trim) {
            Some(url) if !url.is_empty() => Ok(url.to_string()),
            _ => {
                warn!(
                    target: "bbb.api",
                    meeting_id = %meeting_id,
                    return_code = document.return_code().unwrap_or("<none>"),
                    "Join response did not contain a URL"
                );
                Err(BbbError::Protocol(
                    "join response did not contain a URL".to_string(),
                ))
            }
        }
    }
}

//! Mock BigBlueButton server for integration tests.

use bbb_client::checksum::checksum;
use bbb_client::{ApiClient, HashAlgorithm, Session};
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Match, Mock, MockServer, Request, ResponseTemplate};

/// Matches requests whose `checksum` parameter is valid for the action and
/// query string under the given secret.
///
/// The checksum must be the last query parameter, as the client sends it.
#[derive(Debug, Clone)]
pub struct ValidChecksum {
    secret: String,
    algorithm: HashAlgorithm,
}

impl ValidChecksum {
    pub fn new(secret: impl Into<String>, algorithm: HashAlgorithm) -> Self {
        Self {
            secret: secret.into(),
            algorithm,
        }
    }
}

impl Match for ValidChecksum {
    fn matches(&self, request: &Request) -> bool {
        let Some(action) = request.url.path().rsplit('/').next() else {
            return false;
        };
        let Some(query) = request.url.query() else {
            return false;
        };

        let (params, provided) = match query.rsplit_once("&checksum=") {
            Some(split) => split,
            None => match query.strip_prefix("checksum=") {
                Some(provided) => ("", provided),
                None => return false,
            },
        };

        checksum(action, params, &self.secret, self.algorithm) == provided
    }
}

/// Wiremock server standing in for a BigBlueButton API endpoint.
///
/// Mounted responses are served under `/api/{action}` and only to requests
/// carrying a valid checksum; anything else gets wiremock's default 404.
pub struct MockBbbServer {
    server: MockServer,
    secret: String,
    algorithm: HashAlgorithm,
}

impl MockBbbServer {
    /// Start a server that verifies checksums with `secret` and `algorithm`.
    pub async fn start(secret: &str, algorithm: HashAlgorithm) -> Self {
        Self {
            server: MockServer::start().await,
            secret: secret.to_string(),
            algorithm,
        }
    }

    /// Server root, e.g. `http://127.0.0.1:41234`. Normalizes to [`Self::api_url`].
    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Normalized API base URL.
    pub fn api_url(&self) -> String {
        format!("{}/api/", self.server.uri())
    }

    /// Underlying wiremock server, for custom mocks.
    pub fn inner(&self) -> &MockServer {
        &self.server
    }

    /// API client configured with this server's URL, secret and algorithm.
    pub fn api_client(&self) -> ApiClient {
        ApiClient::from_parts(&self.uri(), &self.secret, self.algorithm.name())
            .expect("mock server URL is valid")
    }

    /// Session configured with this server's URL, secret and algorithm.
    pub fn session(&self) -> Session {
        Session::new(self.api_client())
    }

    fn action_mock(&self, action: &str) -> wiremock::MockBuilder {
        Mock::given(method("GET"))
            .and(path(format!("/api/{action}")))
            .and(ValidChecksum::new(self.secret.clone(), self.algorithm))
    }

    /// Serve `body` as XML with `status` for a signed `action`.
    pub async fn mount_xml(&self, action: &str, status: u16, body: &str) {
        self.action_mock(action)
            .respond_with(ResponseTemplate::new(status).set_body_raw(body, "text/xml"))
            .mount(&self.server)
            .await;
    }

    /// Serve `body` for a signed `action` and assert it is requested exactly
    /// `times` times when the server is dropped.
    pub async fn mount_xml_expect(&self, action: &str, body: &str, times: u64) {
        self.action_mock(action)
            .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/xml"))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Serve `body` for a signed `action` after `delay`.
    pub async fn mount_delayed(&self, action: &str, body: &str, delay: Duration) {
        self.action_mock(action)
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(body, "text/xml")
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    /// Actions of all requests received so far, in order.
    pub async fn received_actions(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter_map(|request| request.url.path().rsplit('/').next().map(str::to_string))
            .collect()
    }

    /// Raw query strings of all requests received so far, in order.
    pub async fn received_queries(&self) -> Vec<String> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| request.url.query().unwrap_or_default().to_string())
            .collect()
    }
}

/// `SUCCESS` response with the given child elements.
pub fn success_response(fields: &[(&str, &str)]) -> String {
    let children: String = fields
        .iter()
        .map(|(name, value)| format!("<{name}>{value}</{name}>"))
        .collect();
    format!("<response><returncode>SUCCESS</returncode>{children}</response>")
}

/// `FAILED` response with a message key and message.
pub fn failed_response(message_key: &str, message: &str) -> String {
    format!(
        "<response><returncode>FAILED</returncode><messageKey>{message_key}</messageKey><message>{message}</message></response>"
    )
}

/// Successful join response carrying `url`.
pub fn join_response(url: &str) -> String {
    success_response(&[
        ("messageKey", "successfullyJoined"),
        ("message", "You have joined successfully."),
        ("url", url),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_response_shape() {
        assert_eq!(
            success_response(&[("meetingID", "m1")]),
            "<response><returncode>SUCCESS</returncode><meetingID>m1</meetingID></response>"
        );
    }

    #[test]
    fn test_join_response_contains_url() {
        let body = join_response("https://x/y");
        let root = bbb_client::XmlElement::parse(&body).unwrap();
        assert_eq!(root.find_text("url"), Some("https://x/y"));
        assert_eq!(root.return_code(), Some("SUCCESS"));
    }

    #[test]
    fn test_failed_response_is_well_formed() {
        let root = bbb_client::XmlElement::parse(&failed_response("notFound", "No meeting"))
            .unwrap();
        assert_eq!(root.return_code(), Some("FAILED"));
        assert_eq!(root.find_text("messageKey"), Some("notFound"));
    }

    #[tokio::test]
    async fn test_mount_xml_requires_valid_checksum() {
        let server = MockBbbServer::start("right-secret", HashAlgorithm::Sha1).await;
        server.mount_xml("end", 200, &success_response(&[])).await;

        let good = server.api_client();
        assert!(good.end("m1", "pw").await.is_ok());

        let bad = ApiClient::from_parts(&server.uri(), "wrong-secret", "SHA1").unwrap();
        let result = bad.end("m1", "pw").await;
        assert!(matches!(
            result,
            Err(bbb_client::BbbError::RequestFailed { status: 404, .. })
        ));
    }
}

//! Session wrapper around [`ApiClient`].
//!
//! A [`Session`] exposes the create/join/end operations and remembers the URL
//! returned by the last successful join. Leaving a meeting has no network
//! effect on the API; it clears the stored URL and notifies the session's
//! [`LiveTransport`], which is where a real-time connection opened from the
//! join URL gets closed.

use crate::api::ApiClient;
use crate::errors::BbbError;
use std::fmt;
use tracing::{debug, info, instrument};

/// Real-time connection hook notified when a session leaves its meeting.
pub trait LiveTransport: Send + Sync {
    /// Close whatever connection was opened for `join_url`.
    fn disconnect(&mut self, join_url: &str);
}

/// Default hook for sessions without a real-time connection.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoLiveTransport;

impl LiveTransport for NoLiveTransport {
    fn disconnect(&mut self, _join_url: &str) {}
}

/// A client connection to one BigBlueButton server.
///
/// `join` and `leave` take `&mut self`; share a session between tasks only
/// behind a lock.
pub struct Session {
    api: ApiClient,
    join_url: Option<String>,
    live_transport: Box<dyn LiveTransport>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("api", &self.api)
            .field("join_url", &self.join_url.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}

impl Session {
    /// Wrap an existing API client.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            join_url: None,
            live_transport: Box::new(NoLiveTransport),
        }
    }

    /// Build a session from a base URL, shared secret and hash algorithm name
    /// (`SHA1` or `SHA256`; anything else selects SHA256).
    ///
    /// # Errors
    ///
    /// Returns `BbbError::Config` if the base URL is not http(s).
    pub fn from_config(
        base_url: &str,
        secret: &str,
        hash_algorithm: &str,
    ) -> Result<Self, BbbError> {
        Ok(Self::new(ApiClient::from_parts(
            base_url,
            secret,
            hash_algorithm,
        )?))
    }

    /// Replace the hook invoked by [`Session::leave`].
    #[must_use]
    pub fn with_live_transport(mut self, live_transport: impl LiveTransport + 'static) -> Self {
        self.live_transport = Box::new(live_transport);
        self
    }

    /// The underlying API client.
    #[must_use]
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// URL returned by the last successful join, if still held.
    #[must_use]
    pub fn join_url(&self) -> Option<&str> {
        self.join_url.as_deref()
    }

    /// Create a meeting. The response document is discarded.
    ///
    /// # Errors
    ///
    /// Transport and parse errors from [`ApiClient::create`].
    #[instrument(skip_all, fields(meeting_id = %meeting_id))]
    pub async fn create(
        &self,
        meeting_id: &str,
        name: &str,
        moderator_password: &str,
        attendee_password: &str,
    ) -> Result<(), BbbError> {
        self.api
            .create(meeting_id, name, moderator_password, attendee_password)
            .await?;

        info!(target: "bbb.session", meeting_id = %meeting_id, "Meeting created");
        Ok(())
    }

    /// Join a meeting, remembering and returning the join URL.
    ///
    /// On failure the previously stored URL, if any, is kept.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::join`].
    #[instrument(skip_all, fields(meeting_id = %meeting_id))]
    pub async fn join(
        &mut self,
        meeting_id: &str,
        full_name: &str,
        password: &str,
    ) -> Result<String, BbbError> {
        let url = self.api.join(meeting_id, full_name, password).await?;
        self.join_url = Some(url.clone());

        info!(target: "bbb.session", meeting_id = %meeting_id, "Joined meeting");
        Ok(url)
    }

    /// End a meeting. The response document is discarded.
    ///
    /// # Errors
    ///
    /// Transport and parse errors from [`ApiClient::end`].
    #[instrument(skip_all, fields(meeting_id = %meeting_id))]
    pub async fn end(&self, meeting_id: &str, password: &str) -> Result<(), BbbError> {
        self.api.end(meeting_id, password).await?;

        info!(target: "bbb.session", meeting_id = %meeting_id, "Meeting ended");
        Ok(())
    }

    /// Forget the join URL, disconnecting the live transport if one was held.
    pub fn leave(&mut self) {
        if let Some(url) = self.join_url.take() {
            self.live_transport.disconnect(&url);
            debug!(target: "bbb.session", "Left meeting");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct RecordingTransport {
        disconnected: Arc<Mutex<Vec<String>>>,
    }

    impl LiveTransport for RecordingTransport {
        fn disconnect(&mut self, join_url: &str) {
            self.disconnected.lock().unwrap().push(join_url.to_string());
        }
    }

    #[test]
    fn test_from_config_normalizes_base_url() {
        let session = Session::from_config("https://example.com", "s", "SHA256").unwrap();
        assert_eq!(session.api().config().base_url(), "https://example.com/api/");
        assert_eq!(session.join_url(), None);
    }

    #[test]
    fn test_from_config_rejects_invalid_scheme() {
        let result = Session::from_config("ftp://example.com", "s", "SHA256");
        assert!(matches!(result, Err(BbbError::Config(_))));
    }

    #[test]
    fn test_leave_without_join_does_not_disconnect() {
        let transport = RecordingTransport::default();
        let mut session = Session::from_config("https://example.com", "s", "SHA256")
            .unwrap()
            .with_live_transport(transport.clone());

        session.leave();

        assert!(transport.disconnected.lock().unwrap().is_empty());
        assert_eq!(session.join_url(), None);
    }

    #[test]
    fn test_leave_clears_url_and_disconnects_once() {
        let transport = RecordingTransport::default();
        let mut session = Session::from_config("https://example.com", "s", "SHA256")
            .unwrap()
            .with_live_transport(transport.clone());
        session.join_url = Some("https://example.com/client?token=abc".to_string());

        session.leave();
        session.leave();

        assert_eq!(session.join_url(), None);
        assert_eq!(
            *transport.disconnected.lock().unwrap(),
            vec!["https://example.com/client?token=abc".to_string()]
        );
    }

    #[test]
    fn test_debug_redacts_join_url() {
        let mut session = Session::from_config("https://example.com", "s", "SHA256").unwrap();
        session.join_url = Some("https://example.com/client?sessionToken=tok".to_string());

        let debug_output = format!("{session:?}");
        assert!(!debug_output.contains("sessionToken"));
        assert!(debug_output.contains("[REDACTED]"));
    }
}

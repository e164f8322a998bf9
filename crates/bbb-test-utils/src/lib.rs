//! Test utilities for the BigBlueButton API client.
//!
//! Provides [`MockBbbServer`], a wiremock server that only answers requests
//! whose checksum verifies under its shared secret, plus builders for the XML
//! documents the real server returns.
//!
//! # Example
//!
//! ```rust,ignore
//! use bbb_client::HashAlgorithm;
//! use bbb_test_utils::{join_response, MockBbbServer};
//!
//! let server = MockBbbServer::start("secret", HashAlgorithm::Sha256).await;
//! server.mount_xml("join", 200, &join_response("https://bbb/client?token=t")).await;
//!
//! let mut session = server.session();
//! let url = session.join("m1", "Alice", "pw").await?;
//! ```

pub mod mock_server;

pub use mock_server::{
    failed_response, join_response, success_response, MockBbbServer, ValidChecksum,
};

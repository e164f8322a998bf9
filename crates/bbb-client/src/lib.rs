//! BigBlueButton control API client.
//!
//! Builds checksummed request URLs for the BigBlueButton HTTP API, issues the
//! requests and parses the XML responses. Only the actions a basic bot needs
//! (`create`, `join` and `end`) are wrapped, but [`ApiClient::execute`] accepts
//! any action name.
//!
//! # Layers
//!
//! - [`ApiClient`]: stateless request signer/builder. Cheap to clone and safe
//!   to share across tasks once constructed.
//! - [`Session`]: owns an `ApiClient` and remembers the last join URL.
//!
//! # Example
//!
//! ```rust,ignore
//! use bbb_client::Session;
//!
//! let mut session = Session::from_config("https://bbb.example.com/bigbluebutton", "secret", "SHA256")?;
//! session.create("standup", "Daily Standup", "mod-pw", "att-pw").await?;
//! let url = session.join("standup", "Alice", "mod-pw").await?;
//! println!("open {url} in a browser");
//! session.leave();
//! ```

#![warn(clippy::pedantic)]

pub mod api;
pub mod checksum;
pub mod config;
pub mod errors;
pub mod observability;
pub mod session;
pub mod xml;

pub use api::ApiClient;
pub use checksum::HashAlgorithm;
pub use config::{ConfigError, ConnectionConfig};
pub use errors::BbbError;
pub use session::{LiveTransport, NoLiveTransport, Session};
pub use xml::XmlElement;

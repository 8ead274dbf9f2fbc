//! Twilio REST client.
//!
//! # Example
//!
//! ```no_run
//! use twilio_client::rest::CreateMessage;
//! use twilio_client::TwilioClient;
//!
//! # async fn example() -> twilio_client::Result<()> {
//! let client = TwilioClient::new("ACXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXXX", "your_auth_token")?;
//!
//! let message = client
//!     .messages()
//!     .create(
//!         CreateMessage::new("+15558675310")
//!             .with_from("+15017122661")
//!             .with_body("Hello from Rust"),
//!     )
//!     .await?;
//!
//! println!("Sent {} (etag: {:?})", message.sid, message.etag());
//! # Ok(())
//! # }
//! ```
//!
//! Authentication is chosen per client: basic credentials by default, or
//! any [`auth::CredentialProvider`] (for example OAuth client credentials
//! through [`auth::OrgsCredentialProvider`]).

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod auth;
mod client;
pub mod config;
mod error;
pub mod hostname;
pub mod http;
pub mod rest;
#[cfg(feature = "testing")]
pub mod testing;

pub use client::TwilioClient;
pub use config::ClientConfig;
pub use error::{Result, TwilioError, ValidationError};
pub use twilio_core::{AuthType, Credential, Resource, ResponseHeaders};

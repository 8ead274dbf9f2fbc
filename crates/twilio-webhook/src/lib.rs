//! Twilio webhook verification.
//!
//! This crate provides:
//!
//! - [`RequestValidator`]: checks `X-Twilio-Signature` for form callbacks
//!   and the `bodySHA256` hash for raw (JSON) callbacks
//! - [`params::ParamSource`]: adapters so any map or pair list can be signed
//! - An axum middleware and router that reject forged callbacks
//!
//! # Example
//!
//! ```
//! use std::collections::HashMap;
//! use twilio_webhook::{RequestValidator, WebhookParams};
//!
//! let validator = RequestValidator::new("12345");
//! let params = HashMap::from([
//!     ("CallSid", "CA1234567890ABCDE"),
//!     ("Caller", "+12349013030"),
//!     ("Digits", "1234"),
//!     ("From", "+12349013030"),
//!     ("To", "+18005551212"),
//! ]);
//!
//! assert!(validator.validate(
//!     "https://mycompany.com/myapp.php?foo=1&bar=2",
//!     WebhookParams::form(&params),
//!     "0/KCTR6DLpKmkAf8muzZqo1nDgQ=",
//! ));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
// Axum handlers and middleware all return Result
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::unused_async)]

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod params;
pub mod routes;
pub mod state;
pub mod validator;

pub use config::WebhookConfig;
pub use error::WebhookError;
pub use params::{ParamSource, ParamValues};
pub use routes::create_router;
pub use state::WebhookState;
pub use validator::{compare, compute_hash, RequestValidator, WebhookParams};

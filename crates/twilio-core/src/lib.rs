//! Core types and utilities for the Twilio Rust SDK.
//!
//! This crate provides the foundational types shared by the REST client and
//! the webhook validator:
//!
//! - **Credentials**: `Credential`, `AuthType`
//! - **Response metadata**: `ResponseHeaders`, `Resource` (ETag access)
//! - **URIs**: `UriParts`, `with_port`, `without_port`
//!
//! Nothing in here performs I/O.

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod credential;
pub mod error;
pub mod headers;
pub mod uri;

pub use credential::{AuthType, Credential};
pub use error::{CoreError, Result};
pub use headers::{Resource, ResponseHeaders};
pub use uri::{with_port, without_port, UriParts};

//! Outgoing request authentication.
//!
//! A [`CredentialProvider`] resolves once into an [`AuthStrategy`], which the
//! client asks for per-request credentials:
//!
//! - **Basic**: account SID + auth token, or API key + secret
//! - **Token**: OAuth client credentials exchanged for a bearer token by a
//!   [`TokenManager`]

mod provider;
mod strategy;
mod token_manager;

pub use provider::{
    provider_for, BasicCredentialProvider, CredentialProvider, OrgsCredentialProvider,
};
pub use strategy::{AuthStrategy, TokenAuth};
pub use token_manager::{OrgTokenManager, TokenManager, DEFAULT_TOKEN_URL};

//! Typed resource operations.
//!
//! Only a handful of resources are modelled; anything else can be reached
//! through [`TwilioClient::request`](crate::TwilioClient::request).

mod calls;
mod domain_config;
mod messages;

pub use calls::{Call, Calls, CreateCall};
pub use domain_config::{DomainConfig, DomainConfigContext, Messaging, UpdateDomainConfig};
pub use messages::{CreateMessage, Message, Messages};

/// Version segment of the core REST API.
pub const API_VERSION: &str = "2010-04-01";

/// Push `(name, value)` when `value` is set.
fn push_opt(form: &mut Vec<(String, String)>, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        form.push((name.to_string(), value.to_string()));
    }
}

//! In-process test double for the REST client.
//!
//! [`FakeTwilioClient`] wraps a real [`TwilioClient`](crate::TwilioClient)
//! whose transport never touches the network. Requests are classified into
//! operations such as `messages.create`, checked against the parameter
//! contract of that operation, logged, and answered with a canned payload.
//!
//! ```no_run
//! # async fn demo() -> twilio_client::Result<()> {
//! use twilio_client::rest::CreateMessage;
//! use twilio_client::testing::FakeTwilioClient;
//!
//! let fake = FakeTwilioClient::new();
//! let message = fake
//!     .messages()
//!     .create(CreateMessage::new("+15558675310").with_from("+15017122661").with_body("hi"))
//!     .await?;
//! assert_eq!(message.body.as_deref(), Some("hi"));
//! fake.assert_called_with("messages.create", &[("To", "+15558675310")])
//!     .expect("message was sent");
//! # Ok(())
//! # }
//! ```

mod fake;

pub use fake::{
    AssertionFailure, FakeCall, FakeTransport, FakeTwilioClient, DEFAULT_ACCOUNT_SID,
    DEFAULT_AUTH_TOKEN,
};

//! Fake client behaviour as seen by application tests.

#![cfg(feature = "testing")]

use serde_json::json;

use twilio_client::rest::{CreateCall, CreateMessage};
use twilio_client::testing::{FakeTwilioClient, DEFAULT_ACCOUNT_SID};
use twilio_client::{TwilioError, ValidationError};

#[tokio::test]
async fn message_without_sender_is_missing_alternative() {
    let fake = FakeTwilioClient::new();

    let err = fake
        .messages()
        .create(CreateMessage::new("+15551234567").with_body("hi"))
        .await
        .unwrap_err();

    match err {
        TwilioError::Validation(ValidationError::MissingAlternative { operation, fields }) => {
            assert_eq!(operation, "messages.create");
            assert_eq!(fields, ["From", "MessagingServiceSid"]);
        }
        other => panic!("expected missing alternative, got {other:?}"),
    }
}

#[tokio::test]
async fn messaging_service_sid_is_an_accepted_sender_and_is_echoed() {
    let fake = FakeTwilioClient::new();

    let message = fake
        .messages()
        .create(
            CreateMessage::new("+15551234567")
                .with_messaging_service_sid("MG123")
                .with_body("hi"),
        )
        .await
        .unwrap();

    assert_eq!(message.to.as_deref(), Some("+15551234567"));
    assert_eq!(message.body.as_deref(), Some("hi"));
    assert_eq!(message.messaging_service_sid.as_deref(), Some("MG123"));
    assert_eq!(message.sid, "SMtest123456789");
    assert_eq!(message.account_sid.as_deref(), Some(DEFAULT_ACCOUNT_SID));
}

#[tokio::test]
async fn message_without_content_is_missing_alternative() {
    let fake = FakeTwilioClient::new();

    let err = fake
        .messages()
        .create(CreateMessage::new("+15551234567").with_from("+15559876543"))
        .await
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        "At least one of Body, MediaUrl, or ContentSid must be provided"
    );
}

#[tokio::test]
async fn media_url_counts_as_content() {
    let fake = FakeTwilioClient::new();

    fake.messages()
        .create(
            CreateMessage::new("+15551234567")
                .with_from("+15559876543")
                .with_media_url("https://example.com/cat.png"),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn call_requires_instructions() {
    let fake = FakeTwilioClient::new();

    let err = fake
        .calls()
        .create(CreateCall::new("+15551234567", "+15559876543"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TwilioError::Validation(ValidationError::MissingAlternative {
            operation: "calls.create",
            ..
        })
    ));

    let err = fake
        .calls()
        .create(CreateCall::new("+15551234567", "").with_twiml("<Response/>"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        TwilioError::Validation(ValidationError::MissingRequired {
            operation: "calls.create",
            field: "From",
        })
    ));
}

#[tokio::test]
async fn rejected_calls_are_still_logged() {
    let fake = FakeTwilioClient::new();

    let _ = fake
        .messages()
        .create(CreateMessage::new("+15551234567"))
        .await;

    let calls = fake.recorded_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].resource, "messages.create");
    assert_eq!(calls[0].method, "POST");
}

#[tokio::test]
async fn call_log_keeps_order_and_clears() {
    let fake = FakeTwilioClient::new();

    for i in 0..3 {
        fake.messages()
            .create(
                CreateMessage::new(format!("+1555000000{i}"))
                    .with_from("+15559876543")
                    .with_body(format!("message {i}")),
            )
            .await
            .unwrap();
    }
    fake.calls()
        .create(CreateCall::new("+15551234567", "+15559876543").with_url("https://example.com/twiml"))
        .await
        .unwrap();

    let calls = fake.recorded_calls();
    assert_eq!(calls.len(), 4);
    for (i, call) in calls.iter().take(3).enumerate() {
        assert_eq!(call.param("Body"), Some(format!("message {i}").as_str()));
    }
    assert!(calls.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
    assert_eq!(fake.calls_by_resource("messages.create").len(), 3);
    assert_eq!(fake.calls_by_resource("calls.create").len(), 1);

    fake.clear_calls();
    assert!(fake.recorded_calls().is_empty());
}

#[tokio::test]
async fn configured_response_is_merged_with_request_fields() {
    let fake = FakeTwilioClient::new();
    fake.configure_response(
        "messages.create",
        json!({
            "sid": "SMcustom",
            "status": "queued",
            "body": "configured body",
        }),
    );

    let message = fake
        .messages()
        .create(
            CreateMessage::new("+15551234567")
                .with_from("+15559876543")
                .with_body("request body"),
        )
        .await
        .unwrap();

    assert_eq!(message.sid, "SMcustom");
    assert_eq!(message.status.as_deref(), Some("queued"));
    assert_eq!(message.body.as_deref(), Some("request body"));
    assert_eq!(message.from.as_deref(), Some("+15559876543"));
}

#[tokio::test]
async fn fetch_uses_defaults_without_echoing() {
    let fake = FakeTwilioClient::new();

    let call = fake.calls().fetch("CAtest123456789").await.unwrap();
    assert_eq!(call.sid, "CAtest123456789");
    assert_eq!(call.status.as_deref(), Some("queued"));
    assert_eq!(fake.calls_by_resource("calls.fetch").len(), 1);
}

#[tokio::test]
async fn assert_called_with_reports_missing_and_mismatched_calls() {
    let fake = FakeTwilioClient::new();

    let err = fake
        .assert_called_with("messages.create", &[("To", "+15551234567")])
        .unwrap_err();
    assert!(err.to_string().contains("No calls made to messages.create"));

    fake.messages()
        .create(
            CreateMessage::new("+15551234567")
                .with_from("+15559876543")
                .with_body("hi"),
        )
        .await
        .unwrap();

    fake.assert_called_with("messages.create", &[("To", "+15551234567"), ("Body", "hi")])
        .unwrap();

    let err = fake
        .assert_called_with("messages.create", &[("Body", "bye")])
        .unwrap_err();
    let message = err.message();
    assert!(message.starts_with(r#"No call to messages.create found with parameters {"Body": "bye"}"#));
    assert!(message.contains(r#"Actual calls: [{"To": "+15551234567""#));
}

#[tokio::test]
async fn instances_do_not_share_logs() {
    let first = FakeTwilioClient::new();
    let second = FakeTwilioClient::with_credentials("ACother", "other_token").unwrap();

    first
        .messages()
        .create(
            CreateMessage::new("+15551234567")
                .with_from("+15559876543")
                .with_body("hi"),
        )
        .await
        .unwrap();

    assert_eq!(first.recorded_calls().len(), 1);
    assert!(second.recorded_calls().is_empty());
    assert_eq!(second.account_sid(), Some("ACother"));
    assert!(FakeTwilioClient::with_credentials("", "token").is_err());
}

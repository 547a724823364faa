//! Tests for payload construction and encoding.

use chrono::{DateTime, TimeZone, Utc};

use super::{Attachment, FILE_FIELD, RequestBody, ValidationError, WebhookPayload};
use crate::pricing::{DEFAULT_PRICE, ToolMeta};

fn timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 17, 9, 30, 0).unwrap()
}

fn slip() -> Attachment {
    Attachment::new("slip.jpg", "image/jpeg", vec![0xFF, 0xD8, 0xFF])
}

fn build(
    message: Option<&str>,
    tool_id: Option<&str>,
    file: Option<Attachment>,
    user_id: &str,
) -> Result<WebhookPayload, ValidationError> {
    WebhookPayload::build(
        message,
        tool_id,
        &ToolMeta::default(),
        file,
        user_id,
        timestamp(),
    )
}

mod validation {
    use super::*;

    #[test]
    fn message_only_is_accepted() {
        let payload = build(Some("Who wins tonight?"), Some("odds-analyzer"), None, "u-1").unwrap();

        assert_eq!(payload.message(), "Who wins tonight?");
        assert!(payload.file().is_none());
    }

    #[test]
    fn file_only_is_accepted() {
        let payload = build(None, Some("slip-scanner"), Some(slip()), "u-1").unwrap();

        assert_eq!(payload.message(), "");
        assert_eq!(payload.file().unwrap().file_name(), "slip.jpg");
    }

    #[test]
    fn tool_only_is_accepted() {
        let payload = build(None, Some("quick-tip"), None, "u-1").unwrap();

        assert_eq!(payload.message(), "");
        assert!(payload.file().is_none());
        assert_eq!(payload.tool().id, "quick-tip");
    }

    #[test]
    fn message_without_tool_gets_default_price() {
        let payload = build(Some("Who wins?"), None, None, "u-1").unwrap();

        assert_eq!(payload.tool().id, "");
        assert_eq!(payload.tool().price, DEFAULT_PRICE);

        let payload = build(Some("Who wins?"), Some(" "), None, "u-1").unwrap();
        assert_eq!(payload.tool().price, DEFAULT_PRICE);
    }

    #[test]
    fn file_without_tool_is_accepted() {
        let payload = build(None, None, Some(slip()), "u-1").unwrap();
        assert_eq!(payload.tool().price, DEFAULT_PRICE);
    }

    #[test]
    fn nothing_at_all_is_rejected() {
        assert_eq!(
            build(None, None, None, "u-1"),
            Err(ValidationError::EmptySubmission)
        );
        assert_eq!(
            build(Some("   "), Some(" "), None, "u-1"),
            Err(ValidationError::EmptySubmission)
        );
    }

    #[test]
    fn empty_user_is_rejected() {
        assert_eq!(
            build(Some("hi"), Some("odds-analyzer"), None, ""),
            Err(ValidationError::MissingUser)
        );
        assert_eq!(
            build(Some("hi"), Some("odds-analyzer"), None, " \t"),
            Err(ValidationError::MissingUser)
        );
    }

    #[test]
    fn inputs_are_trimmed() {
        let payload = build(Some("  hi \n"), Some(" quick-tip "), None, " u-1 ").unwrap();

        assert_eq!(payload.message(), "hi");
        assert_eq!(payload.tool().id, "quick-tip");
        assert_eq!(payload.user_id(), "u-1");
    }
}

mod pricing_stamp {
    use super::*;

    #[test]
    fn registered_tool_is_priced_from_registry() {
        let payload = build(Some("hi"), Some("image-insight"), None, "u-1").unwrap();
        assert_eq!(payload.tool().price, 15);
    }

    #[test]
    fn free_tool_keeps_zero_price() {
        let payload = build(Some("hi"), Some("quick-tip"), None, "u-1").unwrap();
        assert_eq!(payload.tool().price, 0);
    }

    #[test]
    fn unknown_tool_gets_default_price() {
        let payload = build(Some("hi"), Some("beta-tool"), None, "u-1").unwrap();
        assert_eq!(payload.tool().price, DEFAULT_PRICE);
    }
}

mod encoding {
    use super::*;

    fn url() -> url::Url {
        url::Url::parse("https://n8n.example.com/webhook/odds").unwrap()
    }

    #[test]
    fn timestamp_is_iso_8601_utc() {
        let payload = build(Some("hi"), Some("quick-tip"), None, "u-1").unwrap();
        assert_eq!(payload.timestamp_iso(), "2024-05-17T09:30:00.000Z");
    }

    #[test]
    fn json_body_carries_all_fields() {
        let payload = build(Some("hi"), Some("odds-analyzer"), None, "u-1").unwrap();
        let json = payload.to_json();

        assert_eq!(json["message"], "hi");
        assert_eq!(json["toolId"], "odds-analyzer");
        assert_eq!(json["tool"]["name"], "Odds Analyzer");
        assert_eq!(json["tool"]["price"], 10);
        assert_eq!(json["userId"], "u-1");
        assert_eq!(json["timestamp"], "2024-05-17T09:30:00.000Z");
    }

    #[test]
    fn request_without_file_is_json() {
        let payload = build(Some("hi"), Some("odds-analyzer"), None, "u-1").unwrap();
        let request = payload.to_request(url());

        assert_eq!(request.method, http::Method::POST);
        assert_eq!(request.url, url());
        assert_eq!(
            request.headers.get(http::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        let body: serde_json::Value = serde_json::from_slice(request.body_bytes().unwrap()).unwrap();
        assert_eq!(body, payload.to_json());
    }

    #[test]
    fn request_with_file_is_multipart() {
        let payload = build(Some("check this"), Some("slip-scanner"), Some(slip()), "u-1").unwrap();
        let request = payload.to_request(url());

        let Some(RequestBody::Multipart(form)) = &request.body else {
            panic!("expected multipart body, got {:?}", request.body);
        };
        assert_eq!(form.text_value("message"), Some("check this"));
        assert_eq!(form.text_value("toolId"), Some("slip-scanner"));
        assert_eq!(form.text_value("price"), Some("8"));
        assert_eq!(form.text_value("userId"), Some("u-1"));
        assert_eq!(form.text_value("timestamp"), Some("2024-05-17T09:30:00.000Z"));
        assert_eq!(form.files.len(), 1);
        assert_eq!(form.files[0].field, FILE_FIELD);
        assert_eq!(form.files[0].content_type, "image/jpeg");
        assert_eq!(form.files[0].bytes, vec![0xFF, 0xD8, 0xFF]);
        assert!(!request.headers.contains_key(http::header::CONTENT_TYPE));
    }
}

mod attachment {
    use super::*;
    use std::io::Write;

    #[test]
    fn from_path_reads_bytes_and_guesses_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ticket.png");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"\x89PNG")
            .unwrap();

        let attachment = Attachment::from_path(&path).unwrap();

        assert_eq!(attachment.file_name(), "ticket.png");
        assert_eq!(attachment.content_type(), "image/png");
        assert_eq!(attachment.bytes(), b"\x89PNG");
    }

    #[test]
    fn unknown_extension_is_octet_stream() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blob.zzzunknown");
        std::fs::write(&path, b"data").unwrap();

        let attachment = Attachment::from_path(&path).unwrap();

        assert_eq!(attachment.content_type(), "application/octet-stream");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Attachment::from_path(&dir.path().join("absent.png")).is_err());
    }
}

use base64::Engine as _;
use base64::alphabet::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

use crate::domain::email::Email;
use crate::mail::gmail::{GmailMessage, MessagePart};

pub const NO_SUBJECT: &str = "No Subject";
pub const UNKNOWN_SENDER: &str = "Unknown Sender";

/// Gmail emits base64url both with and without padding.
const BASE64URL: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

pub fn header_value<'a>(part: &'a MessagePart, name: &str) -> Option<&'a str> {
    part.headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.as_str())
}

/// Decode a base64url body, replacing invalid UTF-8.
pub fn decode_body_data(data: &str) -> Option<String> {
    match BASE64URL.decode(data.trim()) {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(e) => {
            log::warn!("undecodable message body: {e}");
            None
        }
    }
}

/// Depth-first search for the first text/plain part carrying data.
fn first_plain_text(part: &MessagePart) -> Option<&str> {
    if part.mime_type.eq_ignore_ascii_case("text/plain")
        && let Some(data) = part.body.as_ref().and_then(|b| b.data.as_deref())
    {
        return Some(data);
    }
    part.parts.iter().find_map(first_plain_text)
}

pub fn plain_text_body(payload: &MessagePart) -> String {
    first_plain_text(payload)
        .and_then(decode_body_data)
        .unwrap_or_default()
}

pub fn to_email(msg: GmailMessage) -> Email {
    let Some(payload) = msg.payload else {
        return Email {
            id: msg.id,
            subject: NO_SUBJECT.to_string(),
            sender: UNKNOWN_SENDER.to_string(),
            body: String::new(),
        };
    };

    Email {
        subject: header_value(&payload, "Subject")
            .unwrap_or(NO_SUBJECT)
            .to_string(),
        sender: header_value(&payload, "From")
            .unwrap_or(UNKNOWN_SENDER)
            .to_string(),
        body: plain_text_body(&payload),
        id: msg.id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> GmailMessage {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn multipart_message_uses_first_plain_part() {
        // "Hello" / "Second"
        let msg = parse(
            r#"{
              "id": "18c1",
              "payload": {
                "mimeType": "multipart/alternative",
                "headers": [
                  {"name": "Subject", "value": "Your order"},
                  {"name": "From", "value": "Deliveroo <noreply@deliveroo.com>"}
                ],
                "parts": [
                  {"mimeType": "text/html", "body": {"data": "PGI-aGk8L2I-"}},
                  {"mimeType": "text/plain", "body": {"data": "SGVsbG8="}},
                  {"mimeType": "text/plain", "body": {"data": "U2Vjb25k"}}
                ]
              }
            }"#,
        );
        let email = to_email(msg);
        assert_eq!(email.id, "18c1");
        assert_eq!(email.subject, "Your order");
        assert_eq!(email.sender, "Deliveroo <noreply@deliveroo.com>");
        assert_eq!(email.body, "Hello");
    }

    #[test]
    fn nested_and_single_part_bodies_are_found() {
        let nested = parse(
            r#"{"id": "a", "payload": {"mimeType": "multipart/mixed", "parts": [
                {"mimeType": "multipart/alternative", "parts": [
                    {"mimeType": "text/plain", "body": {"data": "bmVzdGVk"}}
                ]},
                {"mimeType": "application/pdf", "body": {"attachmentId": "x"}}
            ]}}"#,
        );
        assert_eq!(to_email(nested).body, "nested");

        let single = parse(
            r#"{"id": "b", "payload": {"mimeType": "text/plain", "body": {"data": "b25l"}}}"#,
        );
        assert_eq!(to_email(single).body, "one");
    }

    #[test]
    fn missing_headers_and_body_use_defaults() {
        let msg = parse(
            r#"{"id": "c", "payload": {"mimeType": "text/html", "headers": [
                {"name": "To", "value": "me@example.com"}
            ], "body": {"data": "PHA-aGk8L3A-"}}}"#,
        );
        let email = to_email(msg);
        assert_eq!(email.subject, NO_SUBJECT);
        assert_eq!(email.sender, UNKNOWN_SENDER);
        assert_eq!(email.body, "");

        let bare = to_email(parse(r#"{"id": "d"}"#));
        assert_eq!(bare.subject, NO_SUBJECT);
        assert_eq!(bare.body, "");
    }

    #[test]
    fn header_names_match_case_insensitively() {
        let msg = parse(
            r#"{"id": "e", "payload": {"mimeType": "text/plain", "headers": [
                {"name": "subject", "value": "lower"},
                {"name": "FROM", "value": "upper@example.com"}
            ]}}"#,
        );
        let email = to_email(msg);
        assert_eq!(email.subject, "lower");
        assert_eq!(email.sender, "upper@example.com");
    }

    #[test]
    fn body_decoding_is_lossy_and_padding_agnostic() {
        // "héllo" with padding stripped
        assert_eq!(decode_body_data("aMOpbGxv").as_deref(), Some("héllo"));
        assert_eq!(decode_body_data("aGk=").as_deref(), Some("hi"));
        // 0xff is not valid UTF-8
        assert_eq!(decode_body_data("_w").as_deref(), Some("\u{fffd}"));
        assert_eq!(decode_body_data("***"), None);
    }
}

use crate::subscriber::message_envelope::MessageEnvelope;

use ps_core::Message;

use bytes::Bytes;

#[test]
fn given_message_when_enveloped_then_json_has_channel_and_text() {
    let message = Message {
        id: 3,
        tag: 1,
        event: Some("update".into()),
        payload: Bytes::from_static(b"hello"),
        time: 1_700_000_000,
        expires: None,
    };

    let json: serde_json::Value =
        serde_json::from_str(&MessageEnvelope::new("news", &message).to_json()).unwrap();

    assert_eq!(json["id"], 3);
    assert_eq!(json["channel"], "news");
    assert_eq!(json["tag"], 1);
    assert_eq!(json["time"], 1_700_000_000);
    assert_eq!(json["event"], "update");
    assert_eq!(json["text"], "hello");
}

#[test]
fn given_no_event_when_enveloped_then_event_omitted() {
    let message = Message {
        id: 1,
        tag: 0,
        event: None,
        payload: Bytes::from_static(b"x"),
        time: 0,
        expires: None,
    };

    let json: serde_json::Value =
        serde_json::from_str(&MessageEnvelope::new("news", &message).to_json()).unwrap();

    assert!(json.get("event").is_none());
}

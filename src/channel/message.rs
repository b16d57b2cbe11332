//! Wire Message Module
//!
//! Every frame on the push channel is a JSON object with exactly two
//! top-level fields: `type` (string) and `data` (arbitrary JSON). There
//! is no envelope versioning; unknown inbound types must be tolerated.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::error::{ChannelError, Result};

// == Push Message ==
/// One frame on the channel, in either direction.
///
/// Transient and never persisted: a message lost while disconnected is
/// not redelivered (at-most-once delivery).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushMessage {
    /// Message type discriminator
    #[serde(rename = "type")]
    pub kind: String,
    /// Opaque payload
    #[serde(default)]
    pub data: Value,
}

impl PushMessage {
    /// Parses an inbound frame.
    ///
    /// Accepts any `type` string so new server-side message types
    /// degrade to a logged no-op instead of an error.
    pub fn decode(raw: &str) -> Result<Self> {
        let msg: PushMessage = serde_json::from_str(raw)?;
        if msg.kind.is_empty() {
            return Err(ChannelError::InvalidFrame("empty message type".into()));
        }
        Ok(msg)
    }

    /// Serializes the frame for the wire.
    pub fn encode(&self) -> String {
        // PushMessage contains no non-serializable types, so this cannot
        // fail for any constructible value.
        serde_json::to_string(self).unwrap_or_else(|_| r#"{"type":"","data":null}"#.to_string())
    }
}

// == Inbound Message Types ==
/// Server-to-client message types the update router acts on.
pub mod inbound {
    pub const PROCTORING_ALERT: &str = "proctoring_alert";
    pub const ANALYTICS_UPDATE: &str = "analytics_update";
    pub const QUIZ_UPDATE: &str = "quiz_update";
    pub const EXAM_PROGRESS: &str = "exam_progress";
    pub const NOTIFICATION: &str = "notification";
    pub const DASHBOARD_STATS_UPDATE: &str = "dashboard_stats_update";
}

// == Client Message ==
/// Client-to-server messages.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    /// Identify the session right after the transport opens
    Authenticate { user_id: String, role: String },
    /// Heartbeat no-op
    Ping,
    /// Ask the server to push current analytics
    RequestAnalytics,
    /// Ask the server to push open proctoring alerts
    RequestAlerts,
    /// Declare the channels this session is interested in
    Subscribe { channels: Vec<String> },
}

impl ClientMessage {
    /// Builds the wire frame for this message.
    pub fn to_frame(&self) -> PushMessage {
        match self {
            ClientMessage::Authenticate { user_id, role } => PushMessage {
                kind: "authenticate".to_string(),
                data: json!({ "userId": user_id, "role": role }),
            },
            ClientMessage::Ping => PushMessage {
                kind: "ping".to_string(),
                data: json!({}),
            },
            ClientMessage::RequestAnalytics => PushMessage {
                kind: "request_analytics".to_string(),
                data: json!({}),
            },
            ClientMessage::RequestAlerts => PushMessage {
                kind: "request_alerts".to_string(),
                data: json!({}),
            },
            ClientMessage::Subscribe { channels } => PushMessage {
                kind: "subscribe".to_string(),
                data: json!({ "channels": channels }),
            },
        }
    }

    /// Serializes the message for the wire.
    pub fn encode(&self) -> String {
        self.to_frame().encode()
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_known_type() {
        let msg = PushMessage::decode(r#"{"type":"quiz_update","data":{"quizId":"q1"}}"#).unwrap();
        assert_eq!(msg.kind, "quiz_update");
        assert_eq!(msg.data["quizId"], "q1");
    }

    #[test]
    fn test_decode_unknown_type_is_accepted() {
        let msg = PushMessage::decode(r#"{"type":"totally_unknown","data":{}}"#).unwrap();
        assert_eq!(msg.kind, "totally_unknown");
    }

    #[test]
    fn test_decode_missing_data_defaults_to_null() {
        let msg = PushMessage::decode(r#"{"type":"notification"}"#).unwrap();
        assert_eq!(msg.kind, "notification");
        assert!(msg.data.is_null());
    }

    #[test]
    fn test_decode_malformed_json() {
        assert!(PushMessage::decode(r#"{"type": "x""#).is_err());
        assert!(PushMessage::decode("not json at all").is_err());
    }

    #[test]
    fn test_decode_rejects_non_string_type() {
        assert!(PushMessage::decode(r#"{"type":42,"data":{}}"#).is_err());
        assert!(PushMessage::decode(r#"{"data":{}}"#).is_err());
    }

    #[test]
    fn test_decode_rejects_empty_type() {
        assert!(matches!(
            PushMessage::decode(r#"{"type":"","data":{}}"#),
            Err(ChannelError::InvalidFrame(_))
        ));
    }

    #[test]
    fn test_encode_has_exactly_two_fields() {
        let frame = ClientMessage::Ping.encode();
        let value: Value = serde_json::from_str(&frame).unwrap();
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(obj["type"], "ping");
        assert_eq!(obj["data"], json!({}));
    }

    #[test]
    fn test_authenticate_frame_shape() {
        let frame = ClientMessage::Authenticate {
            user_id: "u1".to_string(),
            role: "teacher".to_string(),
        }
        .to_frame();

        assert_eq!(frame.kind, "authenticate");
        assert_eq!(frame.data["userId"], "u1");
        assert_eq!(frame.data["role"], "teacher");
    }

    #[test]
    fn test_subscribe_frame_shape() {
        let frame = ClientMessage::Subscribe {
            channels: vec!["proctoring".to_string(), "analytics".to_string()],
        }
        .to_frame();

        assert_eq!(frame.kind, "subscribe");
        assert_eq!(frame.data["channels"], json!(["proctoring", "analytics"]));
    }

    #[test]
    fn test_request_frames() {
        assert_eq!(ClientMessage::RequestAnalytics.to_frame().kind, "request_analytics");
        assert_eq!(ClientMessage::RequestAlerts.to_frame().kind, "request_alerts");
    }
}

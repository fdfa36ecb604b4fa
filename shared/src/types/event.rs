// shared/src/types/event.rs
// Realtime wire frames pushed over the WebSocket channel.

use serde::{Deserialize, Serialize};

/// One pushed event, exactly as the server frames it:
/// a JSON text frame of shape `{ "event": "...", "data": { ... } }`.
///
/// `data` is opaque at this layer. The channel only signals that something
/// changed; consumers re-fetch authoritative state over REST instead of
/// trusting the payload, so nothing here is typed beyond the envelope.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RealtimeEvent {
    pub event: String,
    /// Absent on heartbeat replies (`{"event":"pong"}`) — defaults to null.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Known event names. Anything unrecognised maps to [`EventKind::Other`]
/// so new server-side events pass through without a client update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    /// A new SOS alert names the receiving user as a recipient.
    SosCreated,
    /// A recipient accepted or declined; sent to the alert owner.
    SosRecipientUpdated,
    /// The owner closed the alert; sent to owner and all recipients.
    SosClosed,
    /// Heartbeat reply to the client's `"ping"` text frame.
    Pong,
    Other,
}

impl RealtimeEvent {
    /// Parse a raw text frame.
    ///
    /// Returns `None` for anything malformed: non-JSON, non-object, or a
    /// missing/non-string `event` field. Malformed frames are dropped by the
    /// connection layer without reaching subscribers.
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }

    pub fn kind(&self) -> EventKind {
        match self.event.as_str() {
            "sos.created" => EventKind::SosCreated,
            "sos.recipient_updated" => EventKind::SosRecipientUpdated,
            "sos.closed" => EventKind::SosClosed,
            "pong" => EventKind::Pong,
            _ => EventKind::Other,
        }
    }

    /// True for any `sos.*` event — the signal that alert state is stale.
    pub fn is_sos(&self) -> bool {
        matches!(
            self.kind(),
            EventKind::SosCreated | EventKind::SosRecipientUpdated | EventKind::SosClosed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_envelope() {
        let ev = RealtimeEvent::parse(r#"{"event":"sos.created","data":{"id":7}}"#).unwrap();
        assert_eq!(ev.kind(), EventKind::SosCreated);
        assert_eq!(ev.data["id"], 7);
    }

    #[test]
    fn pong_without_data_defaults_to_null() {
        let ev = RealtimeEvent::parse(r#"{"event":"pong"}"#).unwrap();
        assert_eq!(ev.kind(), EventKind::Pong);
        assert!(ev.data.is_null());
    }

    #[test]
    fn rejects_frames_without_event_field() {
        assert!(RealtimeEvent::parse(r#"{"data":{}}"#).is_none());
        assert!(RealtimeEvent::parse("not json").is_none());
        assert!(RealtimeEvent::parse("[1,2,3]").is_none());
        assert!(RealtimeEvent::parse(r#"{"event":42}"#).is_none());
    }

    #[test]
    fn unknown_events_map_to_other() {
        let ev = RealtimeEvent::parse(r#"{"event":"buddy.typing","data":{}}"#).unwrap();
        assert_eq!(ev.kind(), EventKind::Other);
        assert!(!ev.is_sos());
    }
}

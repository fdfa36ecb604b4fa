// shared/src/types/sos.rs
// SOS alert wire types — creation, recipient responses, inbox views.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Status enums
// ---------------------------------------------------------------------------

/// Overall alert state. CLOSED is terminal; ESCALATED is still "open" for
/// every client affordance (recipients can respond, the owner can close).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SosStatus {
    Open,
    Escalated,
    Closed,
}

impl SosStatus {
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Closed)
    }
}

/// Per-recipient state. A recipient moves from NOTIFIED to ACCEPTED or
/// DECLINED; re-responding overwrites the prior response server-side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecipientStatus {
    Notified,
    Accepted,
    Declined,
    NoResponse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Low,
    Med,
    High,
}

/// What raised the alert: a low/company-seeking mood check-in, or the
/// manual SOS button.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TriggerType {
    Mood,
    Manual,
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct SosCreateRequest {
    pub severity: Severity,
    /// Target specific buddies; when `None` and not broadcasting the server
    /// auto-selects from accepted buddies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buddy_ids: Option<Vec<i64>>,
    /// Send to every accepted buddy instead of a selection.
    #[serde(default)]
    pub broadcast: bool,
}

/// Buddy response to an alert. Only ACCEPTED / DECLINED are submittable;
/// the other [`RecipientStatus`] values are server-assigned.
#[derive(Debug, Clone, Serialize)]
pub struct SosRespondRequest {
    pub status: RecipientStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Minutes until the buddy can be there (server bounds: 1..=120).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub eta_minutes: Option<u32>,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SosRecipient {
    pub id: i64,
    pub sos_alert_id: i64,
    pub buddy_id: i64,
    pub status: RecipientStatus,
    pub message: Option<String>,
    pub eta_minutes: Option<u32>,
    pub responded_at: Option<String>,
    #[serde(default)]
    pub buddy_email: String,
    #[serde(default)]
    pub buddy_name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SosAlert {
    pub id: i64,
    pub veteran_id: i64,
    pub trigger_type: TriggerType,
    pub severity: Severity,
    pub status: SosStatus,
    pub created_at: String,
    pub closed_at: Option<String>,
    #[serde(default)]
    pub recipients: Vec<SosRecipient>,
}

/// An alert as seen from the receiving buddy's inbox — flattened with that
/// buddy's own recipient row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingSosAlert {
    pub alert_id: i64,
    pub veteran_id: i64,
    pub veteran_name: String,
    pub trigger_type: TriggerType,
    pub severity: Severity,
    pub alert_status: SosStatus,
    pub created_at: String,
    pub recipient_id: i64,
    pub my_status: RecipientStatus,
    pub my_message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_use_backend_casing() {
        assert_eq!(
            serde_json::to_string(&RecipientStatus::NoResponse).unwrap(),
            "\"NO_RESPONSE\""
        );
        assert_eq!(serde_json::to_string(&SosStatus::Escalated).unwrap(), "\"ESCALATED\"");
        assert_eq!(serde_json::to_string(&Severity::Med).unwrap(), "\"MED\"");
        assert_eq!(serde_json::to_string(&TriggerType::Mood).unwrap(), "\"MOOD\"");
    }

    #[test]
    fn respond_request_omits_absent_fields() {
        let req = SosRespondRequest {
            status: RecipientStatus::Declined,
            message: None,
            eta_minutes: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "DECLINED" }));
    }

    #[test]
    fn closed_is_the_only_terminal_status() {
        assert!(SosStatus::Closed.is_closed());
        assert!(!SosStatus::Open.is_closed());
        assert!(!SosStatus::Escalated.is_closed());
    }
}

// shared/src/types/checkin.rs

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct MoodCheckinCreate {
    /// 1 (worst) ..= 5 (best). A score of 1-2, or `wants_company`, makes the
    /// check-in eligible as an SOS trigger.
    pub mood_score: u8,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub wants_company: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodCheckin {
    pub id: i64,
    pub veteran_id: i64,
    pub mood_score: u8,
    #[serde(default)]
    pub tags: Vec<String>,
    pub note: Option<String>,
    pub wants_company: bool,
    pub created_at: String,
}

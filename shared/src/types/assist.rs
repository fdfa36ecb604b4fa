// shared/src/types/assist.rs
// AI-backed endpoints: translation layer, journey generation, speech-to-text.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Translation layer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct TranslateRequest {
    /// The military-framed text to re-express in civilian-friendly language.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateResponse {
    pub empathetic_personalized_answer: String,
    /// "none" or an escalation marker when crisis keywords were detected.
    pub safety_flag: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateHistoryItem {
    pub empathetic_personalized_answer: String,
    pub safety_flag: String,
    pub created_at: String,
    pub user_id: i64,
    pub question: String,
    pub response: String,
    pub context: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Journey (exposure ladder)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct JourneyGenerateRequest {
    /// 1..=10.
    pub anxiety_level: u8,
    pub interests: Vec<String>,
    #[serde(default)]
    pub triggers: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_since_comfortable: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_goal: Option<String>,
    #[serde(default)]
    pub energy_times: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avoid_situations: Option<String>,
    /// 1..=12 rungs; the server defaults to 6.
    pub challenge_count: u8,
}

/// One rung of the exposure ladder. The structured coaching fields are
/// optional — older challenges carry them folded into `description` only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyChallenge {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub difficulty: String,
    pub xp_reward: u32,
    pub is_completed: bool,
    pub sort_order: i32,
    pub created_at: String,
    pub completed_at: Option<String>,
    pub challenge_number: Option<i32>,
    pub duration: Option<String>,
    #[serde(default)]
    pub recommended_times: Vec<String>,
    #[serde(default)]
    pub suggested_locations: Vec<String>,
    pub interaction_required: Option<String>,
    pub comfort_zone: Option<String>,
    pub what_this_builds: Option<String>,
    pub why_this_works: Option<String>,
    pub exit_strategy: Option<String>,
    #[serde(default)]
    pub you_can_also: Vec<String>,
    pub modifications: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyGenerateResponse {
    pub challenges: Vec<JourneyChallenge>,
    /// Trigger terms the generator refused to build challenges around.
    #[serde(default)]
    pub blocked_terms: Vec<String>,
    pub provider: String,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct JourneyProgressSave {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub challenge_id: Option<i64>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub xp_earned: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_feeling: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_step: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avoidance_list: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyProgress {
    pub user_id: i64,
    pub active_challenge_id: Option<i64>,
    pub xp_total: u32,
    pub level: u32,
    pub current_streak: u32,
    pub best_streak: u32,
    pub current_feeling: Option<String>,
    pub next_step: Option<String>,
    #[serde(default)]
    pub avoidance_list: Vec<String>,
    pub updated_at: String,
}

/// Progress plus the ladder it applies to, as `/api/journey/progress` returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JourneyProgressWithChallenges {
    #[serde(flatten)]
    pub progress: JourneyProgress,
    #[serde(default)]
    pub challenges: Vec<JourneyChallenge>,
}

// ---------------------------------------------------------------------------
// Speech-to-text
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SttResponse {
    pub transcript: String,
}

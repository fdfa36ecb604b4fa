// shared/src/types/settings.rs
// User settings + abuse reports.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize)]
pub struct SettingsUpdate {
    /// "HH:MM", e.g. "22:00". Alerts are muted inside quiet hours.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiet_hours_start: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quiet_hours_end: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_precise_location: Option<bool>,
    /// 5..=500 km — how far an SOS may fan out.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sos_radius_km: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    pub user_id: i64,
    pub quiet_hours_start: Option<String>,
    pub quiet_hours_end: Option<String>,
    pub share_precise_location: bool,
    pub sos_radius_km: Option<f64>,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportCreate {
    pub reported_user_id: i64,
    pub reason: String,
}

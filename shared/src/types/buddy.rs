// shared/src/types/buddy.rs
// Buddy links, presence, and nearby lookup.

use serde::{Deserialize, Serialize};

/// Link lifecycle. Invites start PENDING; the invited side accepts or
/// blocks. Either side can block later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BuddyLinkStatus {
    Pending,
    Accepted,
    Blocked,
}

/// Self-reported availability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PresenceStatus {
    Available,
    Busy,
    Offline,
}

#[derive(Debug, Clone, Serialize)]
pub struct BuddyInviteRequest {
    /// Invite by email or by id — exactly one should be set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buddy_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buddy_id: Option<i64>,
    /// 1..=5; weighs into nearby-buddy ranking.
    pub trust_level: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuddyLink {
    pub id: i64,
    pub veteran_id: i64,
    pub buddy_id: i64,
    pub status: BuddyLinkStatus,
    pub trust_level: u8,
    pub created_at: String,
}

/// A link joined with the other party's profile — the buddy when you are
/// the veteran, the veteran when you are the buddy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuddyLinkWithUser {
    #[serde(flatten)]
    pub link: BuddyLink,
    #[serde(default)]
    pub other_email: String,
    #[serde(default)]
    pub other_name: String,
    pub other_latitude: Option<f64>,
    pub other_longitude: Option<f64>,
    pub other_location_label: Option<String>,
    pub other_presence_status: Option<PresenceStatus>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PresenceUpdate {
    pub status: PresenceStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Presence {
    pub user_id: i64,
    pub status: PresenceStatus,
    pub updated_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LocationUpdate {
    pub latitude: f64,
    pub longitude: f64,
}

/// Acknowledgement echoed back by `POST /location`.
#[derive(Debug, Clone, Deserialize)]
pub struct LocationAck {
    pub status: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Ranked nearby buddy: available first, then trust desc, then distance asc.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NearbyBuddy {
    pub buddy_id: i64,
    pub buddy_name: String,
    pub buddy_email: String,
    pub trust_level: u8,
    pub presence_status: PresenceStatus,
    /// None when either side has no stored location.
    pub distance_km: Option<f64>,
}

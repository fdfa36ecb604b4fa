// client/src/api/buddies.rs

use shared::types::buddy::{BuddyInviteRequest, BuddyLink, BuddyLinkWithUser, NearbyBuddy};

use super::{ApiClient, ApiError};

impl ApiClient {
    /// `POST /buddies/invite` — invite by email or id; link starts PENDING.
    pub async fn invite_buddy(&self, req: &BuddyInviteRequest) -> Result<BuddyLink, ApiError> {
        self.post_json("/buddies/invite", req).await
    }

    /// `POST /buddies/{id}/accept`
    pub async fn accept_buddy(&self, link_id: i64) -> Result<BuddyLink, ApiError> {
        self.post_empty(&format!("/buddies/{}/accept", link_id)).await
    }

    /// `POST /buddies/{id}/block`
    pub async fn block_buddy(&self, link_id: i64) -> Result<BuddyLink, ApiError> {
        self.post_empty(&format!("/buddies/{}/block", link_id)).await
    }

    /// `GET /buddies` — all links with the other party's profile attached.
    pub async fn buddies(&self) -> Result<Vec<BuddyLinkWithUser>, ApiError> {
        self.get_json("/buddies").await
    }

    /// `GET /buddies/nearby` — accepted buddies ranked available-first,
    /// then trust desc, then distance asc. `limit` is clamped server-side
    /// to 1..=50.
    pub async fn nearby_buddies(&self, limit: u32) -> Result<Vec<NearbyBuddy>, ApiError> {
        self.get_json(&format!("/buddies/nearby?limit={}", limit)).await
    }
}

// client/src/api/presence.rs

use shared::types::buddy::{LocationAck, LocationUpdate, Presence, PresenceStatus, PresenceUpdate};

use super::{ApiClient, ApiError};

impl ApiClient {
    /// `GET /presence/me` — the server answers OFFLINE when nothing was
    /// ever reported.
    pub async fn my_presence(&self) -> Result<Presence, ApiError> {
        self.get_json("/presence/me").await
    }

    /// `POST /presence`
    pub async fn set_presence(&self, status: PresenceStatus) -> Result<Presence, ApiError> {
        self.post_json("/presence", &PresenceUpdate { status }).await
    }

    /// `POST /location`
    pub async fn update_location(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<LocationAck, ApiError> {
        self.post_json(
            "/location",
            &LocationUpdate {
                latitude,
                longitude,
            },
        )
        .await
    }
}

// client/src/api/checkins.rs

use shared::types::checkin::{MoodCheckin, MoodCheckinCreate};

use super::{ApiClient, ApiError};

impl ApiClient {
    /// `POST /checkins`
    pub async fn create_checkin(&self, req: &MoodCheckinCreate) -> Result<MoodCheckin, ApiError> {
        self.post_json("/checkins", req).await
    }

    /// `GET /checkins/me` — own check-ins, newest first.
    pub async fn my_checkins(&self, limit: u32) -> Result<Vec<MoodCheckin>, ApiError> {
        self.get_json(&format!("/checkins/me?limit={}", limit)).await
    }
}

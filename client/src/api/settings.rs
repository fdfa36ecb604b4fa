// client/src/api/settings.rs

use shared::types::settings::{ReportCreate, SettingsUpdate, UserSettings};

use super::{ApiClient, ApiError};

impl ApiClient {
    /// `GET /settings/me`
    pub async fn my_settings(&self) -> Result<UserSettings, ApiError> {
        self.get_json("/settings/me").await
    }

    /// `PUT /settings/me` — sparse update; unset fields keep their values.
    pub async fn update_settings(&self, req: &SettingsUpdate) -> Result<UserSettings, ApiError> {
        self.put_json("/settings/me", req).await
    }

    /// `POST /report` — flag another user for review.
    pub async fn report_user(&self, req: &ReportCreate) -> Result<(), ApiError> {
        self.post_json_unit("/report", req).await
    }
}

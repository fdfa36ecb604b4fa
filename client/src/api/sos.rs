// client/src/api/sos.rs
//
// SOS alert endpoints. The accept/decline/close state machine is enforced
// server-side; these calls submit transitions and report rejections as
// `ApiError::Rejected`. For the push-driven buddy view see `crate::inbox`.

use shared::types::sos::{
    IncomingSosAlert, SosAlert, SosCreateRequest, SosRecipient, SosRespondRequest,
};

use super::{ApiClient, ApiError};

impl ApiClient {
    /// `POST /sos` — raise a manual alert. Veterans only; recipients are
    /// picked from accepted buddies (targeted, broadcast, or auto-selected).
    pub async fn create_sos(&self, req: &SosCreateRequest) -> Result<SosAlert, ApiError> {
        self.post_json("/sos", req).await
    }

    /// `POST /sos/from-checkin/{id}` — raise an alert off a low or
    /// company-seeking mood check-in.
    pub async fn create_sos_from_checkin(
        &self,
        checkin_id: i64,
        req: &SosCreateRequest,
    ) -> Result<SosAlert, ApiError> {
        self.post_json(&format!("/sos/from-checkin/{}", checkin_id), req)
            .await
    }

    /// `GET /sos/me` — own alerts, newest first.
    pub async fn my_sos_alerts(&self, limit: u32) -> Result<Vec<SosAlert>, ApiError> {
        self.get_json(&format!("/sos/me?limit={}", limit)).await
    }

    /// `GET /sos/incoming` — alerts where this user is a recipient.
    pub async fn incoming_sos_alerts(&self) -> Result<Vec<IncomingSosAlert>, ApiError> {
        self.get_json("/sos/incoming").await
    }

    /// `GET /sos/{id}` — owner-only status/timeline view.
    pub async fn get_sos(&self, sos_id: i64) -> Result<SosAlert, ApiError> {
        self.get_json(&format!("/sos/{}", sos_id)).await
    }

    /// `POST /sos/{id}/close` — owner closes; terminal.
    pub async fn close_sos(&self, sos_id: i64) -> Result<SosAlert, ApiError> {
        self.post_empty(&format!("/sos/{}/close", sos_id)).await
    }

    /// `POST /sos/{id}/escalate` — widen the recipient set while nobody
    /// has accepted.
    pub async fn escalate_sos(&self, sos_id: i64) -> Result<SosAlert, ApiError> {
        self.post_empty(&format!("/sos/{}/escalate", sos_id)).await
    }

    /// `POST /sos/{id}/respond` — recipient accepts or declines.
    /// Re-responding overwrites the prior response.
    pub async fn respond_sos(
        &self,
        sos_id: i64,
        req: &SosRespondRequest,
    ) -> Result<SosRecipient, ApiError> {
        self.post_json(&format!("/sos/{}/respond", sos_id), req).await
    }
}

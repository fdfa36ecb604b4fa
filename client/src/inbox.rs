// client/src/inbox.rs
//
// The buddy's SOS inbox — the workflow consumer sitting on top of the
// realtime layer. Push events carry no authoritative state, so every
// `sos.*` event (and a fixed-interval polling fallback) triggers a re-fetch
// of `/sos/incoming`. The accept/decline/close state machine lives
// server-side; the only local check is the UI affordance of refusing to
// submit a response for an alert already known to be closed.

use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use thiserror::Error;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use shared::types::RealtimeEvent;
use shared::types::sos::{IncomingSosAlert, RecipientStatus, SosRecipient, SosRespondRequest};

use crate::api::{ApiClient, ApiError};
use crate::realtime::Realtime;

#[derive(Error, Debug)]
pub enum InboxError {
    /// Local gate only — the server would reject this anyway.
    #[error("alert {0} is closed")]
    AlertClosed(i64),

    /// Only ACCEPTED or DECLINED are submittable decisions.
    #[error("invalid decision: {0:?}")]
    InvalidDecision(RecipientStatus),

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Incoming-alert list for the logged-in buddy, kept fresh by the event
/// pump in [`SosInbox::run`].
pub struct SosInbox {
    api: ApiClient,
    alerts: RwLock<Vec<IncomingSosAlert>>,
    /// None disables the polling fallback (push events only).
    poll_interval: Option<Duration>,
}

impl SosInbox {
    pub fn new(api: ApiClient, poll_interval: Option<Duration>) -> Self {
        Self {
            api,
            alerts: RwLock::new(Vec::new()),
            poll_interval,
        }
    }

    /// Re-fetch the authoritative inbox. Returns the number of alerts held.
    pub async fn refresh(&self) -> Result<usize, ApiError> {
        let alerts = self.api.incoming_sos_alerts().await?;
        let count = alerts.len();
        debug!("inbox refreshed: {} alerts", count);
        *self.write_alerts() = alerts;
        Ok(count)
    }

    /// Current snapshot, newest first as the server returns it.
    pub fn alerts(&self) -> Vec<IncomingSosAlert> {
        self.read_alerts().clone()
    }

    /// Alerts still accepting responses.
    pub fn open_alerts(&self) -> Vec<IncomingSosAlert> {
        self.read_alerts()
            .iter()
            .filter(|a| !a.alert_status.is_closed())
            .cloned()
            .collect()
    }

    /// Submit an accept/decline for an alert. Re-responding overwrites the
    /// prior response server-side. Fails locally, without a request, when
    /// the alert is already known to be closed.
    pub async fn respond(
        &self,
        alert_id: i64,
        decision: RecipientStatus,
        message: Option<String>,
        eta_minutes: Option<u32>,
    ) -> Result<SosRecipient, InboxError> {
        if !matches!(
            decision,
            RecipientStatus::Accepted | RecipientStatus::Declined
        ) {
            return Err(InboxError::InvalidDecision(decision));
        }
        ensure_respondable(&self.read_alerts(), alert_id)?;

        let req = SosRespondRequest {
            status: decision,
            message,
            eta_minutes,
        };
        let recipient = self.api.respond_sos(alert_id, &req).await?;
        info!("responded {:?} to alert {}", decision, alert_id);

        // Mirror the submitted response locally until the next refresh.
        let mut alerts = self.write_alerts();
        if let Some(alert) = alerts.iter_mut().find(|a| a.alert_id == alert_id) {
            alert.my_status = recipient.status;
            alert.my_message = recipient.message.clone();
        }
        Ok(recipient)
    }

    /// Event pump: refresh on every `sos.*` event, plus the polling
    /// fallback. Runs until the realtime layer is dropped; typically
    /// spawned. Transient refresh failures are logged and retried on the
    /// next trigger; the view goes stale, never wrong for long.
    pub async fn run(self: Arc<Self>, realtime: Realtime) {
        let mut sub = realtime.subscribe();

        if let Err(e) = self.refresh().await {
            warn!("initial inbox refresh failed: {}", e);
        }

        // A dummy interval keeps the select arm well-formed when polling is
        // disabled; the guard stops it from ever firing a refresh.
        let mut poll =
            tokio::time::interval(self.poll_interval.unwrap_or(Duration::from_secs(3600)));
        poll.set_missed_tick_behavior(MissedTickBehavior::Delay);
        poll.tick().await;

        loop {
            let refresh_needed = tokio::select! {
                ev = sub.recv() => match ev {
                    Some(ev) => needs_refresh(&ev),
                    None => break,
                },
                _ = poll.tick(), if self.poll_interval.is_some() => {
                    debug!("inbox poll tick");
                    true
                }
            };

            if refresh_needed {
                if let Err(e) = self.refresh().await {
                    warn!("inbox refresh failed: {}", e);
                }
            }
        }
        debug!("inbox pump exited");
    }

    fn read_alerts(&self) -> std::sync::RwLockReadGuard<'_, Vec<IncomingSosAlert>> {
        self.alerts.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_alerts(&self) -> std::sync::RwLockWriteGuard<'_, Vec<IncomingSosAlert>> {
        self.alerts.write().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Any `sos.*` event means the inbox is stale. Payload bodies are ignored
/// on purpose: the channel signals change, REST is the source of truth.
fn needs_refresh(ev: &RealtimeEvent) -> bool {
    ev.is_sos()
}

fn ensure_respondable(alerts: &[IncomingSosAlert], alert_id: i64) -> Result<(), InboxError> {
    // An alert we have never seen is submitted as-is; the server is the
    // authority on membership and state.
    match alerts.iter().find(|a| a.alert_id == alert_id) {
        Some(alert) if alert.alert_status.is_closed() => Err(InboxError::AlertClosed(alert_id)),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::types::sos::{Severity, SosStatus, TriggerType};

    fn alert(id: i64, status: SosStatus) -> IncomingSosAlert {
        IncomingSosAlert {
            alert_id: id,
            veteran_id: 1,
            veteran_name: "Alex".to_string(),
            trigger_type: TriggerType::Manual,
            severity: Severity::Med,
            alert_status: status,
            created_at: "2026-08-01T10:00:00Z".to_string(),
            recipient_id: 10,
            my_status: RecipientStatus::Notified,
            my_message: None,
        }
    }

    #[test]
    fn closed_alerts_are_not_respondable() {
        let alerts = vec![alert(1, SosStatus::Open), alert(2, SosStatus::Closed)];
        assert!(ensure_respondable(&alerts, 1).is_ok());
        assert!(matches!(
            ensure_respondable(&alerts, 2),
            Err(InboxError::AlertClosed(2))
        ));
    }

    #[test]
    fn escalated_alerts_still_accept_responses() {
        let alerts = vec![alert(3, SosStatus::Escalated)];
        assert!(ensure_respondable(&alerts, 3).is_ok());
    }

    #[test]
    fn unknown_alerts_are_left_to_the_server() {
        assert!(ensure_respondable(&[], 99).is_ok());
    }

    #[test]
    fn only_sos_events_trigger_refresh() {
        let sos = RealtimeEvent {
            event: "sos.closed".to_string(),
            data: serde_json::Value::Null,
        };
        let pong = RealtimeEvent {
            event: "pong".to_string(),
            data: serde_json::Value::Null,
        };
        assert!(needs_refresh(&sos));
        assert!(!needs_refresh(&pong));
    }
}

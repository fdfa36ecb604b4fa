//! Integration tests for the REST wrappers and the SOS inbox, run against a
//! small in-process hyper server returning canned backend responses.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use client::inbox::{InboxError, SosInbox};
use client::{ApiClient, ApiError, TokenCell};
use shared::types::RecipientStatus;

// ---------------------------------------------------------------------------
// Canned backend
// ---------------------------------------------------------------------------

const TOKEN: &str = "tok-1";

fn json_response(status: StatusCode, body: serde_json::Value) -> Response<Full<Bytes>> {
    Response::builder()
        .status(status)
        .header("content-type", "application/json")
        .body(Full::new(Bytes::from(body.to_string())))
        .unwrap()
}

fn detail(status: StatusCode, text: &str) -> Response<Full<Bytes>> {
    json_response(status, serde_json::json!({ "detail": text }))
}

fn incoming_alerts() -> serde_json::Value {
    serde_json::json!([
        {
            "alert_id": 5,
            "veteran_id": 1,
            "veteran_name": "Alex",
            "trigger_type": "MANUAL",
            "severity": "HIGH",
            "alert_status": "OPEN",
            "created_at": "2026-08-01T10:00:00Z",
            "recipient_id": 50,
            "my_status": "NOTIFIED",
            "my_message": null
        },
        {
            "alert_id": 6,
            "veteran_id": 1,
            "veteran_name": "Alex",
            "trigger_type": "MOOD",
            "severity": "LOW",
            "alert_status": "CLOSED",
            "created_at": "2026-07-30T08:00:00Z",
            "recipient_id": 51,
            "my_status": "NOTIFIED",
            "my_message": null
        }
    ])
}

async fn route(req: Request<Incoming>) -> Result<Response<Full<Bytes>>, Infallible> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let authed = req
        .headers()
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", TOKEN));
    let body = req.into_body().collect().await.unwrap().to_bytes();

    let resp = match (method, path.as_str()) {
        (Method::POST, "/auth/login") => {
            let creds: serde_json::Value = serde_json::from_slice(&body).unwrap();
            if creds["password"] == "correct horse" {
                json_response(
                    StatusCode::OK,
                    serde_json::json!({ "access_token": TOKEN, "token_type": "bearer" }),
                )
            } else {
                detail(StatusCode::UNAUTHORIZED, "Incorrect email or password")
            }
        }
        (Method::GET, "/auth/me") if authed => json_response(
            StatusCode::OK,
            serde_json::json!({
                "id": 7,
                "email": "buddy@example.org",
                "full_name": "Sam",
                "role": "buddy",
                "is_active": true,
                "latitude": null,
                "longitude": null,
                "created_at": "2026-01-01T00:00:00Z"
            }),
        ),
        (Method::GET, "/sos/incoming") if authed => {
            json_response(StatusCode::OK, incoming_alerts())
        }
        (Method::POST, "/sos/5/respond") if authed => {
            let req_body: serde_json::Value = serde_json::from_slice(&body).unwrap();
            json_response(
                StatusCode::OK,
                serde_json::json!({
                    "id": 50,
                    "sos_alert_id": 5,
                    "buddy_id": 7,
                    "status": req_body["status"],
                    "message": req_body.get("message").cloned().unwrap_or(serde_json::Value::Null),
                    "eta_minutes": req_body.get("eta_minutes").cloned().unwrap_or(serde_json::Value::Null),
                    "responded_at": "2026-08-01T10:05:00Z"
                }),
            )
        }
        (Method::POST, "/sos/6/respond") if authed => {
            // The inbox must never let this request through for a closed
            // alert; reaching here is a test failure surfaced as a 500.
            detail(StatusCode::INTERNAL_SERVER_ERROR, "responded to closed alert")
        }
        (Method::GET, "/sos/404") if authed => detail(StatusCode::NOT_FOUND, "SOS not found"),
        _ if !authed => detail(StatusCode::UNAUTHORIZED, "Not authenticated"),
        _ => detail(StatusCode::NOT_FOUND, "Not Found"),
    };
    Ok(resp)
}

async fn spawn_api_server() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        while let Ok((stream, _)) = listener.accept().await {
            let io = TokioIo::new(stream);
            tokio::spawn(async move {
                let _ = http1::Builder::new()
                    .serve_connection(io, service_fn(route))
                    .await;
            });
        }
    });
    addr
}

fn api_for(addr: SocketAddr) -> ApiClient {
    ApiClient::new(format!("http://{}", addr), TokenCell::new())
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[tokio::test]
async fn login_stores_the_token_for_later_calls() {
    let addr = spawn_api_server().await;
    let api = api_for(addr);

    api.login("buddy@example.org", "correct horse").await.unwrap();
    assert_eq!(api.token().get().as_deref(), Some(TOKEN));

    let me = api.me().await.unwrap();
    assert_eq!(me.role, "buddy");
}

#[tokio::test]
async fn rejected_login_surfaces_backend_detail() {
    let addr = spawn_api_server().await;
    let api = api_for(addr);

    let err = api.login("buddy@example.org", "wrong").await.unwrap_err();
    match err {
        ApiError::Rejected { status, detail } => {
            assert_eq!(status, 401);
            assert_eq!(detail, "Incorrect email or password");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(api.token().get().is_none());
}

#[tokio::test]
async fn authenticated_calls_fail_fast_without_a_token() {
    let addr = spawn_api_server().await;
    let api = api_for(addr);

    // No request goes out; the error is local.
    let err = api.incoming_sos_alerts().await.unwrap_err();
    assert!(matches!(err, ApiError::NotAuthenticated));
}

#[tokio::test]
async fn not_found_maps_to_rejected_with_status() {
    let addr = spawn_api_server().await;
    let api = api_for(addr);
    api.token().set(TOKEN);

    let err = api.get_sos(404).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

// ---------------------------------------------------------------------------
// Inbox workflow
// ---------------------------------------------------------------------------

#[tokio::test]
async fn inbox_refresh_pulls_incoming_alerts() {
    let addr = spawn_api_server().await;
    let api = api_for(addr);
    api.token().set(TOKEN);

    let inbox = SosInbox::new(api, None);
    assert_eq!(inbox.refresh().await.unwrap(), 2);
    assert_eq!(inbox.alerts().len(), 2);
    // Only the OPEN alert is still actionable.
    let open = inbox.open_alerts();
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].alert_id, 5);
}

#[tokio::test]
async fn responding_to_an_open_alert_updates_the_local_view() {
    let addr = spawn_api_server().await;
    let api = api_for(addr);
    api.token().set(TOKEN);

    let inbox = SosInbox::new(api, None);
    inbox.refresh().await.unwrap();

    let recipient = inbox
        .respond(
            5,
            RecipientStatus::Accepted,
            Some("on my way".to_string()),
            Some(15),
        )
        .await
        .unwrap();
    assert_eq!(recipient.status, RecipientStatus::Accepted);
    assert_eq!(recipient.eta_minutes, Some(15));

    let alert = inbox
        .alerts()
        .into_iter()
        .find(|a| a.alert_id == 5)
        .unwrap();
    assert_eq!(alert.my_status, RecipientStatus::Accepted);
    assert_eq!(alert.my_message.as_deref(), Some("on my way"));
}

#[tokio::test]
async fn responding_to_a_closed_alert_fails_without_a_request() {
    let addr = spawn_api_server().await;
    let api = api_for(addr);
    api.token().set(TOKEN);

    let inbox = SosInbox::new(api, None);
    inbox.refresh().await.unwrap();

    let err = inbox
        .respond(6, RecipientStatus::Declined, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, InboxError::AlertClosed(6)));
}

#[tokio::test]
async fn notified_is_not_a_submittable_decision() {
    let addr = spawn_api_server().await;
    let api = api_for(addr);
    api.token().set(TOKEN);

    let inbox = SosInbox::new(api, None);
    let err = inbox
        .respond(5, RecipientStatus::Notified, None, None)
        .await
        .unwrap_err();
    assert!(matches!(err, InboxError::InvalidDecision(_)));
}

// ---------------------------------------------------------------------------
// Inbox pump (polling fallback)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn polling_fallback_refreshes_without_push_events() {
    let addr = spawn_api_server().await;
    let api = api_for(addr);
    api.token().set(TOKEN);

    // Realtime layer pointed at a dead endpoint: the pump must rely on the
    // polling interval alone.
    let realtime = client::Realtime::new(
        client::RealtimeConfig {
            url: "ws://127.0.0.1:1/ws".to_string(),
            keepalive: Duration::from_secs(30),
            reconnect_delay: Duration::from_secs(30),
            channel_capacity: 16,
        },
        api.token().clone(),
    );

    let inbox = std::sync::Arc::new(SosInbox::new(api, Some(Duration::from_millis(50))));
    tokio::spawn(std::sync::Arc::clone(&inbox).run(realtime.clone()));

    tokio::time::timeout(Duration::from_secs(2), async {
        while inbox.alerts().is_empty() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    })
    .await
    .expect("inbox never populated via polling");
    assert_eq!(inbox.alerts().len(), 2);
}

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header},
    routing::post,
};
use serde_json::{Value, json};
use stock_watch::AlertError;
use stock_watch::services::line::api_error;
use stock_watch::services::{LineNotifier, Notifier};

#[derive(Clone, Default)]
struct Endpoint {
    reply: Arc<Mutex<Option<(StatusCode, Value)>>>,
    requests: Arc<Mutex<Vec<(HeaderMap, Value)>>>,
}

async fn push(
    State(ep): State<Endpoint>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    ep.requests.lock().unwrap().push((headers, body));
    let reply = ep.reply.lock().unwrap().clone();
    let (status, body) = reply.unwrap_or((StatusCode::OK, json!({})));
    (status, Json(body))
}

async fn spawn_line(ep: Endpoint) -> String {
    let app = Router::new()
        .route("/v2/bot/message/push", post(push))
        .with_state(ep);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{addr}/v2/bot/message/push")
}

#[tokio::test]
async fn send_posts_text_message_with_bearer_token() {
    let ep = Endpoint::default();
    let url = spawn_line(ep.clone()).await;
    let notifier = LineNotifier::new("uuu_id", "c_a_token").with_url(url);

    notifier.send("test message").await.unwrap();

    let requests = ep.requests.lock().unwrap();
    assert_eq!(requests.len(), 1);

    let (headers, body) = &requests[0];
    assert_eq!(headers[header::AUTHORIZATION], "Bearer c_a_token");
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(
        *body,
        json!({
            "to": "uuu_id",
            "messages": [{ "type": "text", "text": "test message" }]
        })
    );
}

#[tokio::test]
async fn multi_line_text_is_sent_verbatim() {
    let ep = Endpoint::default();
    let url = spawn_line(ep.clone()).await;
    let notifier = LineNotifier::new("uuu_id", "c_a_token").with_url(url);

    notifier.send("alert 56789\nalert 24680").await.unwrap();

    let requests = ep.requests.lock().unwrap();
    assert_eq!(
        requests[0].1["messages"][0]["text"],
        "alert 56789\nalert 24680"
    );
}

#[tokio::test]
async fn rejected_push_carries_status_and_message() {
    let ep = Endpoint::default();
    *ep.reply.lock().unwrap() = Some((
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "message": "api error detail" }),
    ));
    let url = spawn_line(ep.clone()).await;
    let notifier = LineNotifier::new("uuu_id", "c_a_token").with_url(url);

    let err = notifier.send("test message").await.unwrap_err();

    match &err {
        AlertError::Api {
            status_code,
            message,
        } => {
            assert_eq!(*status_code, 500);
            assert_eq!(message, "api error detail");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "api error: status_code => 500 message => api error detail"
    );
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let notifier = LineNotifier::new("uuu_id", "c_a_token")
        .with_url(format!("http://{addr}/v2/bot/message/push"));

    let err = notifier.send("test message").await.unwrap_err();
    assert!(matches!(err, AlertError::Transport(_)));
}

#[test]
fn api_error_falls_back_to_raw_body() {
    let err = api_error(401, "Authentication failed\n");
    assert_eq!(
        err.to_string(),
        "api error: status_code => 401 message => Authentication failed"
    );
}

#[test]
fn payload_shape() {
    let notifier = LineNotifier::new("uuu_id", "c_a_token");
    let payload = serde_json::to_value(notifier.payload("hello")).unwrap();
    assert_eq!(
        payload,
        json!({ "to": "uuu_id", "messages": [{ "type": "text", "text": "hello" }] })
    );
}

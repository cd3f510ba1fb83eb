//! End-to-end requests against an in-process HTTP server

use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use icinga_core::events::{EventType, SubscribeRequest};
use icinga_core::actions::Target;
use icinga_core::objects::{ListOptions, ObjectType};
use icinga_core::{ApiError, Client, ClientConfig};
use serde_json::{json, Value};

/// What the server saw
struct Captured {
    url: String,
    method_override: Option<String>,
    authorization: Option<String>,
    body: Value,
}

/// Serve exactly one request with `status` and `body`, reporting what was received
fn serve_once(status: u16, body: &'static str) -> (String, mpsc::Receiver<Captured>) {
    let server = tiny_http::Server::http("127.0.0.1:0").unwrap();
    let addr = server.server_addr().to_ip().unwrap();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let mut request = server.recv().unwrap();

        let header = |name: &'static str| {
            request
                .headers()
                .iter()
                .find(|h| h.field.equiv(name))
                .map(|h| h.value.as_str().to_string())
        };
        let method_override = header("X-HTTP-Method-Override");
        let authorization = header("Authorization");

        let mut raw = String::new();
        request.as_reader().read_to_string(&mut raw).unwrap();
        let received = if raw.is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&raw).unwrap()
        };

        tx.send(Captured {
            url: request.url().to_string(),
            method_override,
            authorization,
            body: received,
        })
        .unwrap();

        let response = tiny_http::Response::from_string(body).with_status_code(status);
        request.respond(response).unwrap();
    });

    (format!("http://{addr}"), rx)
}

fn client(url: String) -> Client {
    Client::new(ClientConfig {
        username: Some("root".to_string()),
        password: Some("icinga".to_string()),
        ..ClientConfig::new(url)
    })
    .unwrap()
}

#[tokio::test]
async fn test_subscribe_streams_events() {
    let (url, captured) = serve_once(
        200,
        "{\"type\":\"CheckResult\",\"host\":\"web01\",\"check_result\":{\"exit_status\":2}}\n\
         {\"type\":\"StateChange\",\"host\":\"web01\",\"state\":2}\n\
         {\"type\":\"Check",
    );
    let client = client(url);

    let request = SubscribeRequest::new([EventType::CheckResult, EventType::StateChange], "michi")
        .with_filters("event.check_result.exit_status==2");
    let mut subscription = client.events().subscribe(request).await.unwrap();

    let first = subscription.next().await.unwrap().unwrap();
    assert_eq!(first.event_type, EventType::CheckResult);
    assert_eq!(first.attr("check_result").unwrap()["exit_status"], 2);

    let second = subscription.next().await.unwrap().unwrap();
    assert_eq!(second.event_type, EventType::StateChange);

    // The unterminated tail is not an event
    assert!(subscription.next().await.is_none());
    assert!(subscription.is_closed());

    let captured = captured.recv().unwrap();
    assert_eq!(captured.url, "/v1/events");
    assert_eq!(captured.method_override.as_deref(), Some("POST"));
    assert!(captured.authorization.unwrap().starts_with("Basic "));
    assert_eq!(
        captured.body,
        json!({
            "types": ["CheckResult", "StateChange"],
            "queue": "michi",
            "filters": "event.check_result.exit_status==2"
        })
    );
}

#[tokio::test]
async fn test_subscribe_rejected_by_server() {
    let (url, _captured) = serve_once(403, "{\"error\":403,\"status\":\"No permission\"}");
    let client = client(url);

    let request = SubscribeRequest::new([EventType::Other("Bogus".into())], "michi");
    match client.events().subscribe(request).await {
        Err(err @ ApiError::Http { status: 403, .. }) => assert!(err.is_connection_error()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("subscription should have been rejected"),
    }
}

#[tokio::test]
async fn test_objects_list_uses_method_override() {
    let (url, captured) = serve_once(200, "{\"results\":[{\"name\":\"web01\",\"type\":\"Host\"}]}");
    let client = client(url);

    let options = ListOptions {
        attrs: vec!["address".to_string()],
        filter: Some("match(\"web*\", host.name)".to_string()),
        joins: None,
    };
    let result = client
        .objects()
        .list(ObjectType::Host, None, &options)
        .await
        .unwrap();
    assert_eq!(result["results"][0]["name"], "web01");

    let captured = captured.recv().unwrap();
    assert_eq!(captured.url, "/v1/objects/hosts");
    assert_eq!(captured.method_override.as_deref(), Some("GET"));
    assert_eq!(
        captured.body,
        json!({"attrs": ["address"], "filter": "match(\"web*\", host.name)"})
    );
}

#[tokio::test]
async fn test_status_error_body_is_reported() {
    let (url, _captured) = serve_once(404, "no such component");
    let client = client(url);

    match client.status().list(Some("Nope")).await {
        Err(ApiError::Http { status, body, url }) => {
            assert_eq!(status, 404);
            assert_eq!(body, "no such component");
            assert!(url.ends_with("/v1/status/Nope"));
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_subscribe_times_out_without_response_headers() {
    // Accepts the connection and never answers
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    thread::spawn(move || {
        let (_socket, _) = listener.accept().unwrap();
        thread::sleep(Duration::from_secs(30));
    });

    let client = Client::new(ClientConfig {
        timeout: Some(1),
        stream_idle_timeout: Some(1),
        ..ClientConfig::new(format!("http://{addr}"))
    })
    .unwrap();

    let request = SubscribeRequest::new([EventType::CheckResult], "michi");
    let result = tokio::time::timeout(Duration::from_secs(5), client.events().subscribe(request))
        .await
        .expect("subscribe should give up after the configured timeout");
    match result {
        Err(err @ ApiError::Timeout(_)) => assert!(err.is_connection_error()),
        Err(other) => panic!("expected timeout, got {other}"),
        Ok(_) => panic!("silent server produced a subscription"),
    }
}

#[tokio::test]
async fn test_objects_update_wraps_attrs() {
    let (url, captured) = serve_once(200, "{\"results\":[{\"code\":200,\"status\":\"Attributes updated.\"}]}");
    let client = client(url);

    client
        .objects()
        .update(ObjectType::Host, "web01", &json!({"address": "192.168.1.10"}))
        .await
        .unwrap();

    let captured = captured.recv().unwrap();
    assert_eq!(captured.url, "/v1/objects/hosts/web01");
    assert_eq!(captured.method_override.as_deref(), Some("POST"));
    assert_eq!(captured.body, json!({"attrs": {"address": "192.168.1.10"}}));
}

#[tokio::test]
async fn test_remove_downtime_by_filter() {
    let (url, captured) = serve_once(200, "{\"results\":[]}");
    let client = client(url);

    client
        .actions()
        .remove_downtime("Service", None, Some("service.name==\"ping4\""))
        .await
        .unwrap();

    let captured = captured.recv().unwrap();
    assert_eq!(captured.url, "/v1/actions/remove-downtime");
    assert_eq!(captured.method_override.as_deref(), Some("POST"));
    assert_eq!(
        captured.body,
        json!({"type": "Service", "filter": "service.name==\"ping4\""})
    );
}

#[tokio::test]
async fn test_reschedule_check_sends_target() {
    let (url, captured) = serve_once(200, "{\"results\":[]}");
    let client = client(url);

    client
        .actions()
        .reschedule_check(&Target::hosts("host.name==\"web01\""), None, true)
        .await
        .unwrap();

    let captured = captured.recv().unwrap();
    assert_eq!(captured.url, "/v1/actions/reschedule-check");
    assert_eq!(
        captured.body,
        json!({"type": "Host", "filter": "host.name==\"web01\"", "force_check": true})
    );
}

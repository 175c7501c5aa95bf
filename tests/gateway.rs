//! End-to-end tests: client → gateway → mock RPC backend.

use axum::{
    extract::Request,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};

mod common;

use common::Recorder;

fn json_reply(status: StatusCode, body: Value) -> Response {
    (status, Json(body)).into_response()
}

#[tokio::test]
async fn test_get_converts_backend_base64_to_hex() {
    let backend = common::start_mock_backend(Router::new().route(
        "/eth/v1/beacon/genesis",
        get(|| async {
            json_reply(
                StatusCode::OK,
                json!({"data": {
                    "genesis_time": "1606824023",
                    "genesis_validators_root": "AQID",
                    "genesis_fork_version": "AAAAAA==",
                    "unlisted": "dropped"
                }}),
            )
        }),
    ))
    .await;
    let (gateway, _shutdown) = common::start_gateway(backend).await;

    let response = common::client()
        .get(format!("http://{gateway}/eth/v1/beacon/genesis"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");
    assert!(response.headers().contains_key("x-request-id"));
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({"data": {
            "genesis_time": "1606824023",
            "genesis_validators_root": "0x010203",
            "genesis_fork_version": "0x00000000"
        }})
    );
}

#[tokio::test]
async fn test_path_and_query_hex_rewritten_for_backend() {
    let recorder = Recorder::default();
    let rec = recorder.clone();
    let backend = common::start_mock_backend(Router::new().route(
        "/eth/v1/beacon/states/{state_id}/root",
        get(move |request: Request| {
            let rec = rec.clone();
            async move {
                rec.record(request).await;
                json_reply(StatusCode::OK, json!({"data": {"root": "3q2+7w=="}}))
            }
        }),
    ))
    .await;
    let (gateway, _shutdown) = common::start_gateway(backend).await;

    let body: Value = common::client()
        .get(format!("http://{gateway}/eth/v1/beacon/states/0xdeadbeef/root"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body, json!({"data": {"root": "0xdeadbeef"}}));
    let seen = recorder.last();
    assert_eq!(seen.method, "GET");
    assert_eq!(seen.uri, "/eth/v1/beacon/states/3q2-7w==/root");
}

#[tokio::test]
async fn test_malformed_path_hex_never_reaches_backend() {
    let recorder = Recorder::default();
    let rec = recorder.clone();
    let backend = common::start_mock_backend(Router::new().route(
        "/eth/v1/beacon/states/{state_id}/root",
        get(move |request: Request| {
            let rec = rec.clone();
            async move {
                rec.record(request).await;
                StatusCode::OK
            }
        }),
    ))
    .await;
    let (gateway, _shutdown) = common::start_gateway(backend).await;

    let response = common::client()
        .get(format!("http://{gateway}/eth/v1/beacon/states/0xzz/root"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], 400);
    assert_eq!(recorder.count(), 0);
}

#[tokio::test]
async fn test_encoded_slashes_stay_in_one_segment() {
    let recorder = Recorder::default();
    let rec = recorder.clone();
    let backend = common::start_mock_backend(Router::new().fallback(move |request: Request| {
        let rec = rec.clone();
        async move {
            rec.record(request).await;
            json_reply(StatusCode::OK, json!({"data": {"root": "AQ=="}}))
        }
    }))
    .await;
    let (gateway, _shutdown) = common::start_gateway(backend).await;

    let response = common::client()
        .get(format!(
            "http://{gateway}/eth/v1/beacon/states/head%2F..%2F..%2Fadmin%3Fx=/root"
        ))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(
        recorder.last().uri,
        "/eth/v1/beacon/states/head%2F..%2F..%2Fadmin%3Fx%3D/root"
    );
}

#[tokio::test]
async fn test_status_override_and_metadata_stripping() {
    let backend = common::start_mock_backend(Router::new().route(
        "/eth/v1/node/syncing",
        get(|| async {
            let mut response = json_reply(
                StatusCode::OK,
                json!({"data": {"head_slot": "12", "sync_distance": "3", "is_syncing": true}}),
            );
            let headers = response.headers_mut();
            headers.insert("grpc-metadata-status-code", "206".parse().unwrap());
            headers.insert("grpc-metadata-trace", "abc".parse().unwrap());
            headers.insert("x-backend", "yes".parse().unwrap());
            response
        }),
    ))
    .await;
    let (gateway, _shutdown) = common::start_gateway(backend).await;

    let response = common::client()
        .get(format!("http://{gateway}/eth/v1/node/syncing"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 206);
    assert_eq!(response.headers()["x-backend"], "yes");
    assert!(response
        .headers()
        .keys()
        .all(|name| !name.as_str().starts_with("grpc-metadata-")));
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["data"]["head_slot"], "12");
}

#[tokio::test]
async fn test_post_array_wrapped_and_encoded_for_backend() {
    let recorder = Recorder::default();
    let rec = recorder.clone();
    let backend = common::start_mock_backend(Router::new().route(
        "/eth/v1/beacon/pool/attestations",
        post(move |request: Request| {
            let rec = rec.clone();
            async move {
                rec.record(request).await;
                StatusCode::OK
            }
        }),
    ))
    .await;
    let (gateway, _shutdown) = common::start_gateway(backend).await;

    let response = common::client()
        .post(format!("http://{gateway}/eth/v1/beacon/pool/attestations"))
        .json(&json!([{
            "aggregation_bits": "0x01",
            "data": {
                "slot": "1",
                "index": "0",
                "beacon_block_root": "0x0102",
                "source": {"epoch": "0", "root": "0x03"},
                "target": {"epoch": "1", "root": "0x04"}
            },
            "signature": "0x05"
        }]))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert!(response.bytes().await.unwrap().is_empty());

    let seen = recorder.last();
    assert_eq!(seen.method, "POST");
    let forwarded: Value = serde_json::from_slice(&seen.body).unwrap();
    assert_eq!(
        forwarded,
        json!({"data": [{
            "aggregation_bits": "AQ==",
            "data": {
                "slot": "1",
                "index": "0",
                "beacon_block_root": "AQI=",
                "source": {"epoch": "0", "root": "Aw=="},
                "target": {"epoch": "1", "root": "BA=="}
            },
            "signature": "BQ=="
        }]})
    );
}

#[tokio::test]
async fn test_backend_error_uses_endpoint_error_shape() {
    let backend = common::start_mock_backend(Router::new().route(
        "/eth/v1/beacon/pool/attestations",
        post(|| async {
            json_reply(
                StatusCode::BAD_REQUEST,
                json!({
                    "message": "some failed",
                    "failures": [{"index": "0", "message": "bad signature"}],
                    "details": ["internal"]
                }),
            )
        }),
    ))
    .await;
    let (gateway, _shutdown) = common::start_gateway(backend).await;

    let response = common::client()
        .post(format!("http://{gateway}/eth/v1/beacon/pool/attestations"))
        .json(&json!([]))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "code": 400,
            "message": "some failed",
            "failures": [{"index": "0", "message": "bad signature"}]
        })
    );
}

#[tokio::test]
async fn test_binary_passthrough() {
    let recorder = Recorder::default();
    let rec = recorder.clone();
    let backend = common::start_mock_backend(Router::new().route(
        "/eth/v1/beacon/blocks/{block_id}/ssz",
        get(move |request: Request| {
            let rec = rec.clone();
            async move {
                rec.record(request).await;
                json_reply(StatusCode::OK, json!({"data": "3q2+7w=="}))
            }
        }),
    ))
    .await;
    let (gateway, _shutdown) = common::start_gateway(backend).await;

    let response = common::client()
        .get(format!("http://{gateway}/eth/v1/beacon/blocks/head"))
        .header(header::ACCEPT, "application/octet-stream")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/octet-stream");
    assert_eq!(response.headers()[header::CONTENT_LENGTH], "4");
    assert!(response.headers()[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("beacon_block.ssz"));
    assert_eq!(response.bytes().await.unwrap().as_ref(), &[0xde, 0xad, 0xbe, 0xef]);
    assert_eq!(recorder.last().uri, "/eth/v1/beacon/blocks/head/ssz");
}

#[tokio::test]
async fn test_unknown_path_is_not_forwarded() {
    let recorder = Recorder::default();
    let rec = recorder.clone();
    let backend = common::start_mock_backend(Router::new().fallback(move |request: Request| {
        let rec = rec.clone();
        async move {
            rec.record(request).await;
            StatusCode::OK
        }
    }))
    .await;
    let (gateway, _shutdown) = common::start_gateway(backend).await;

    let response = common::client()
        .get(format!("http://{gateway}/eth/v1/not/a/route"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], 404);
    assert_eq!(recorder.count(), 0);
}

#[tokio::test]
async fn test_unreachable_backend_is_bad_gateway() {
    let closed = {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };
    let (gateway, _shutdown) = common::start_gateway(closed).await;

    let response = common::client()
        .get(format!("http://{gateway}/eth/v1/node/version"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 502);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], 502);
}

#[tokio::test]
async fn test_event_stream_end_to_end() {
    let recorder = Recorder::default();
    let rec = recorder.clone();
    let backend = common::start_mock_backend(Router::new().route(
        "/eth/v1/events",
        get(move |request: Request| {
            let rec = rec.clone();
            async move {
                rec.record(request).await;
                (
                    [(header::CONTENT_TYPE, "text/event-stream")],
                    concat!(
                        ": keepalive\n\n",
                        "event: head\n",
                        "data: {\"slot\":\"10\",\"block\":\"AQI=\",\"state\":\"AwQ=\",\"epoch_transition\":false}\n\n",
                        "event: finalized_checkpoint\n",
                        "data: {\"block\":\"BQ==\",\"state\":\"Bg==\",\"epoch\":\"2\"}\n\n",
                    ),
                )
            }
        }),
    ))
    .await;
    let (gateway, _shutdown) = common::start_gateway(backend).await;

    let response = common::client()
        .get(format!("http://{gateway}/eth/v1/events?topics=head,finalized_checkpoint"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 200);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
    let text = response.text().await.unwrap();
    assert_eq!(
        text,
        concat!(
            "event: head\n",
            "data: {\"slot\":\"10\",\"block\":\"0x0102\",\"state\":\"0x0304\",\"epoch_transition\":false}\n\n",
            "event: finalized_checkpoint\n",
            "data: {\"block\":\"0x05\",\"state\":\"0x06\",\"epoch\":\"2\"}\n\n",
        )
    );
    assert!(recorder.last().uri.contains("stream=events"));
}

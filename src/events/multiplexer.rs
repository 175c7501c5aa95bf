//! Event stream multiplexer.
//!
//! Per client connection: `SUBSCRIBING → STREAMING → CLOSED`.
//!
//! One upstream subscription is opened per client. Each envelope is routed
//! by tag to its topic schema, re-encoded for the client and written as a
//! `text/event-stream` frame. The client going away cancels the stream
//! quietly; an unknown tag or an unwritable client ends it with an error.

use std::convert::Infallible;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, StatusCode};
use axum::response::Response;
use bytes::{BufMut, Bytes, BytesMut};
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tokio_util::sync::CancellationToken;

use crate::error::{GatewayError, GatewayResult};
use crate::events::envelope::EventEnvelope;
use crate::events::source::{PushSource, Subscription, SUBSCRIPTION_TOPIC};
use crate::events::topic::Topic;
use crate::observability::metrics;
use crate::transform::{transform, Direction};

#[derive(Clone)]
pub struct Multiplexer {
    source: Arc<dyn PushSource>,
    buffer_size: usize,
    /// Parent of every stream's cancellation token.
    shutdown: CancellationToken,
}

impl Multiplexer {
    pub fn new(source: Arc<dyn PushSource>, buffer_size: usize) -> Self {
        Self {
            source,
            buffer_size: buffer_size.max(1),
            shutdown: CancellationToken::new(),
        }
    }

    /// End every open stream; streams opened afterwards end immediately.
    pub fn close_all(&self) {
        self.shutdown.cancel();
    }

    /// Subscribe upstream and return the streaming response.
    ///
    /// A failed subscription is returned as an error before any byte of
    /// the stream is produced.
    pub async fn open(&self, uri: &str) -> GatewayResult<Response> {
        let subscription = self.source.subscribe(uri, SUBSCRIPTION_TOPIC).await?;

        let (tx, rx) = mpsc::channel(self.buffer_size);
        let cancel = self.shutdown.child_token();
        // Dropped together with the response body when the client goes away.
        let guard = cancel.clone().drop_guard();
        tokio::spawn(serve(subscription, tx, cancel));

        let frames = ReceiverStream::new(rx).map(move |frame| {
            let _guard = &guard;
            Ok::<_, Infallible>(frame)
        });
        Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, "text/event-stream")
            .header(header::CACHE_CONTROL, "no-cache")
            .body(Body::from_stream(frames))
            .map_err(|e| GatewayError::Internal(format!("could not build event stream response: {e}")))
    }
}

/// Pump `subscription` into `sink` until cancelled, ended or failed.
///
/// The subscription is released on every exit path. A failure is reported
/// to the client as a final JSON error chunk.
pub async fn serve(mut subscription: Subscription, sink: mpsc::Sender<Bytes>, cancel: CancellationToken) {
    metrics::stream_opened();
    let outcome = stream_events(&mut subscription, &sink, &cancel).await;
    subscription.unsubscribe();

    match outcome {
        Ok(()) => tracing::debug!("Event stream closed"),
        Err(e) => {
            tracing::warn!(error = %e, kind = e.kind(), "Event stream terminated");
            let _ = sink.send(e.body()).await;
        }
    }
    metrics::stream_closed();
}

async fn stream_events(
    subscription: &mut Subscription,
    sink: &mpsc::Sender<Bytes>,
    cancel: &CancellationToken,
) -> GatewayResult<()> {
    loop {
        let envelope = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(()),
            next = subscription.recv() => match next {
                Some(envelope) => envelope,
                None => return Ok(()),
            },
        };

        let (topic, frame) = encode_frame(&envelope)?;
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return Ok(()),
            sent = sink.send(frame) => sent.map_err(|_| {
                GatewayError::UnsupportedOperation("client stream can no longer be written".to_string())
            })?,
        }
        metrics::record_event_frame(topic.tag());
    }
}

/// `event: <tag>\ndata: <json>\n\n` for one envelope.
pub fn encode_frame(envelope: &EventEnvelope) -> GatewayResult<(Topic, Bytes)> {
    let tag = envelope.tag();
    let topic = Topic::from_tag(tag).ok_or_else(|| GatewayError::UnsupportedStreamTopic(tag.to_string()))?;
    let payload = topic.payload(&envelope.data)?;
    let data = serde_json::to_vec(&transform(topic.schema(), payload, Direction::ToClient)?)?;

    let mut frame = BytesMut::with_capacity(tag.len() + data.len() + 16);
    frame.put_slice(b"event: ");
    frame.put_slice(tag.as_bytes());
    frame.put_slice(b"\ndata: ");
    frame.put_slice(&data);
    frame.put_slice(b"\n\n");
    Ok((topic, frame.freeze()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Hands out subscriptions fed by the test and records their tokens.
    #[derive(Default)]
    struct TestSource {
        feeds: Mutex<Vec<mpsc::Sender<EventEnvelope>>>,
        tokens: Mutex<Vec<CancellationToken>>,
        topics: Mutex<Vec<String>>,
    }

    impl TestSource {
        fn feed(&self) -> mpsc::Sender<EventEnvelope> {
            self.feeds.lock().unwrap()[0].clone()
        }

        fn token(&self) -> CancellationToken {
            self.tokens.lock().unwrap()[0].clone()
        }
    }

    #[async_trait]
    impl PushSource for TestSource {
        async fn subscribe(&self, _uri: &str, topic: &str) -> GatewayResult<Subscription> {
            let (tx, rx) = mpsc::channel(8);
            let token = CancellationToken::new();
            self.feeds.lock().unwrap().push(tx);
            self.tokens.lock().unwrap().push(token.clone());
            self.topics.lock().unwrap().push(topic.to_string());
            Ok(Subscription::new(rx, token))
        }
    }

    struct FailingSource;

    #[async_trait]
    impl PushSource for FailingSource {
        async fn subscribe(&self, _uri: &str, _topic: &str) -> GatewayResult<Subscription> {
            Err(GatewayError::BackendUnreachable("refused".to_string()))
        }
    }

    async fn wait_released(token: &CancellationToken) {
        tokio::time::timeout(Duration::from_secs(2), token.cancelled())
            .await
            .expect("subscription was not released");
    }

    fn text(frame: &Bytes) -> &str {
        std::str::from_utf8(frame).unwrap()
    }

    #[test]
    fn test_frame_format() {
        let envelope = EventEnvelope::new("block", r#"{"slot":"7","block":"3q2+7w=="}"#);
        let (topic, frame) = encode_frame(&envelope).unwrap();
        assert_eq!(topic, Topic::Block);
        assert_eq!(text(&frame), "event: block\ndata: {\"slot\":\"7\",\"block\":\"0xdeadbeef\"}\n\n");
    }

    #[test]
    fn test_tag_whitespace_trimmed() {
        let padded = EventEnvelope::new("block \n", r#"{"slot":"7"}"#);
        let plain = EventEnvelope::new("block", r#"{"slot":"7"}"#);
        assert_eq!(encode_frame(&padded).unwrap(), encode_frame(&plain).unwrap());
    }

    #[test]
    fn test_aggregate_unwrapped() {
        let envelope = EventEnvelope::new(
            "attestation",
            r#"{"aggregate":{"data":{"slot":"1","beacon_block_root":"3q2+7w=="}}}"#,
        );
        let (_, frame) = encode_frame(&envelope).unwrap();
        assert_eq!(
            text(&frame),
            "event: attestation\ndata: {\"data\":{\"slot\":\"1\",\"beacon_block_root\":\"0xdeadbeef\"}}\n\n"
        );
    }

    #[test]
    fn test_unknown_topic() {
        let err = encode_frame(&EventEnvelope::new("light_client_update", "{}")).unwrap_err();
        assert!(matches!(err, GatewayError::UnsupportedStreamTopic(ref tag) if tag == "light_client_update"));
    }

    #[tokio::test]
    async fn test_cancellation_releases_without_error() {
        let source = Arc::new(TestSource::default());
        let subscription = source.subscribe("http://backend/eth/v1/events", SUBSCRIPTION_TOPIC).await.unwrap();
        let (tx, mut rx) = mpsc::channel(4);
        let cancel = CancellationToken::new();
        let task = tokio::spawn(serve(subscription, tx, cancel.clone()));

        source.feed().send(EventEnvelope::new("head", r#"{"slot":"1"}"#)).await.unwrap();
        let frame = rx.recv().await.unwrap();
        assert!(text(&frame).starts_with("event: head\n"));

        cancel.cancel();
        task.await.unwrap();
        assert!(source.token().is_cancelled());
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn test_unknown_topic_ends_stream_with_error() {
        let source = Arc::new(TestSource::default());
        let subscription = source.subscribe("http://backend/eth/v1/events", SUBSCRIPTION_TOPIC).await.unwrap();
        let (tx, mut rx) = mpsc::channel(4);
        let task = tokio::spawn(serve(subscription, tx, CancellationToken::new()));

        let feed = source.feed();
        feed.send(EventEnvelope::new("bogus", "{}")).await.unwrap();

        let error: serde_json::Value = serde_json::from_slice(&rx.recv().await.unwrap()).unwrap();
        assert_eq!(error["code"], 500);
        assert!(error["message"].as_str().unwrap().contains("bogus"));
        assert!(rx.recv().await.is_none());
        task.await.unwrap();
        assert!(source.token().is_cancelled());
    }

    #[tokio::test]
    async fn test_upstream_end_is_clean() {
        let source = Arc::new(TestSource::default());
        let subscription = source.subscribe("http://backend/eth/v1/events", SUBSCRIPTION_TOPIC).await.unwrap();
        let (tx, mut rx) = mpsc::channel(4);
        let task = tokio::spawn(serve(subscription, tx, CancellationToken::new()));

        source.feeds.lock().unwrap().clear();
        task.await.unwrap();
        assert!(rx.recv().await.is_none());
        assert!(source.token().is_cancelled());
    }

    #[tokio::test]
    async fn test_open_streams_in_order_and_releases_on_disconnect() {
        let source = Arc::new(TestSource::default());
        let multiplexer = Multiplexer::new(source.clone(), 4);
        let response = multiplexer.open("http://backend/eth/v1/events?topics=head").await.unwrap();
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
        assert_eq!(source.topics.lock().unwrap().as_slice(), ["events"]);

        let feed = source.feed();
        feed.send(EventEnvelope::new("head", r#"{"slot":"1"}"#)).await.unwrap();
        feed.send(EventEnvelope::new("head", r#"{"slot":"2"}"#)).await.unwrap();

        let mut body = response.into_body().into_data_stream();
        let first = body.next().await.unwrap().unwrap();
        let second = body.next().await.unwrap().unwrap();
        assert!(text(&first).contains(r#""slot":"1""#));
        assert!(text(&second).contains(r#""slot":"2""#));

        drop(body);
        wait_released(&source.token()).await;
    }

    #[tokio::test]
    async fn test_close_all_ends_streams() {
        let source = Arc::new(TestSource::default());
        let multiplexer = Multiplexer::new(source.clone(), 4);
        let response = multiplexer.open("http://backend/eth/v1/events").await.unwrap();

        multiplexer.close_all();
        wait_released(&source.token()).await;
        let mut body = response.into_body().into_data_stream();
        assert!(body.next().await.is_none());
    }

    #[tokio::test]
    async fn test_open_subscription_failure() {
        let multiplexer = Multiplexer::new(Arc::new(FailingSource), 4);
        let err = multiplexer.open("http://backend/eth/v1/events").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
    }
}

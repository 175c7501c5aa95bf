//! Upstream push subscriptions.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::error::{GatewayError, GatewayResult};
use crate::events::envelope::EventEnvelope;
use crate::events::sse::SseDecoder;

/// Placeholder topic for the one subscription opened per client stream.
///
/// The backend cannot filter topics on this path; every topic arrives on
/// the same channel and is told apart by tag.
pub const SUBSCRIPTION_TOPIC: &str = "events";

/// Opens push subscriptions against the backend.
#[async_trait]
pub trait PushSource: Send + Sync {
    async fn subscribe(&self, uri: &str, topic: &str) -> GatewayResult<Subscription>;
}

/// A live upstream feed.
///
/// [`Subscription::unsubscribe`] stops the feed; dropping it does too.
#[derive(Debug)]
pub struct Subscription {
    events: mpsc::Receiver<EventEnvelope>,
    cancel: CancellationToken,
}

impl Subscription {
    pub fn new(events: mpsc::Receiver<EventEnvelope>, cancel: CancellationToken) -> Self {
        Self { events, cancel }
    }

    /// Next envelope, or `None` once the upstream feed has ended.
    pub async fn recv(&mut self) -> Option<EventEnvelope> {
        self.events.recv().await
    }

    pub fn unsubscribe(&mut self) {
        if !self.cancel.is_cancelled() {
            tracing::debug!("Releasing upstream subscription");
        }
        self.cancel.cancel();
        self.events.close();
    }

    pub fn is_released(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// [`PushSource`] reading a backend `text/event-stream` endpoint.
#[derive(Clone)]
pub struct SseSource {
    client: reqwest::Client,
    buffer: usize,
}

impl SseSource {
    pub fn new(connect_timeout: Duration, buffer: usize) -> GatewayResult<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .build()
            .map_err(|e| GatewayError::Internal(format!("could not build event client: {e}")))?;
        Ok(Self { client, buffer })
    }
}

#[async_trait]
impl PushSource for SseSource {
    async fn subscribe(&self, uri: &str, topic: &str) -> GatewayResult<Subscription> {
        let mut url = Url::parse(uri)
            .map_err(|e| GatewayError::Internal(format!("invalid event source uri '{uri}': {e}")))?;
        url.query_pairs_mut().append_pair("stream", topic);

        tracing::debug!(url = %url, "Opening upstream event stream");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(|e| GatewayError::BackendUnreachable(format!("event stream connection failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::BackendUnreachable(format!(
                "event stream endpoint returned {status}"
            )));
        }

        let (tx, rx) = mpsc::channel(self.buffer);
        let cancel = CancellationToken::new();
        tokio::spawn(pump(response, tx, cancel.clone()));
        Ok(Subscription::new(rx, cancel))
    }
}

async fn pump(response: reqwest::Response, tx: mpsc::Sender<EventEnvelope>, cancel: CancellationToken) {
    let mut stream = response.bytes_stream();
    let mut decoder = SseDecoder::new();
    loop {
        let chunk = tokio::select! {
            _ = cancel.cancelled() => break,
            chunk = stream.next() => chunk,
        };
        let chunk = match chunk {
            Some(Ok(chunk)) => chunk,
            Some(Err(e)) => {
                tracing::warn!(error = %e, "Upstream event stream failed");
                break;
            }
            None => {
                tracing::debug!("Upstream event stream ended");
                break;
            }
        };
        for envelope in decoder.feed(&chunk) {
            if tx.send(envelope).await.is_err() {
                return;
            }
        }
    }
}

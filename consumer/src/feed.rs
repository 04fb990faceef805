use std::{
    pin::Pin,
    sync::atomic::{AtomicU64, Ordering},
    time::Duration,
};

use crate::error::{
    TransportError,
    transport_error::{FailedRequestSnafu, FramingSnafu, RequestSnafu, StreamClosedSnafu},
};
use futures::{StreamExt, TryStreamExt};
use reqwest::{Client, Url, header};
use snafu::{IntoError, ResultExt};
use tokio::{io::AsyncRead, sync::oneshot};
use tokio_util::codec::{FramedRead, LinesCodec};
use tracing::{debug, info, instrument};

pub type FeedReader = Pin<Box<dyn AsyncRead + Send>>;

static CONNECTION_ID: AtomicU64 = AtomicU64::new(1);

/// Client for the server-sent event stream relaying live AIS positions.
pub struct AisFeedClient {
    url: Url,
    client: Client,
}

/// A single open subscription to the live feed.
///
/// Yields the payload of every `message` event in the order it was received. Dropping the
/// connection releases the underlying transport and emits its close notification.
pub struct FeedConnection<R> {
    id: u64,
    lines: FramedRead<R, LinesCodec>,
    data: Option<String>,
    event_type: Option<String>,
    retry: Option<Duration>,
    events_received: u64,
    close_listener: Option<oneshot::Sender<ConnectionClosed>>,
}

/// Sent exactly once when a [FeedConnection] is released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionClosed {
    pub connection_id: u64,
    pub events_received: u64,
}

impl AisFeedClient {
    pub fn new(url: Url) -> AisFeedClient {
        AisFeedClient {
            url,
            client: Client::new(),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Opens a new subscription, the returned connection does not reconnect by itself.
    #[instrument(skip(self), fields(url = %self.url))]
    pub async fn connect(
        &self,
        max_line_length: usize,
    ) -> Result<FeedConnection<FeedReader>, TransportError> {
        let response = self
            .client
            .get(self.url.clone())
            .header(header::ACCEPT, "text/event-stream")
            .header(header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .with_context(|_| RequestSnafu {
                url: self.url.clone(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return FailedRequestSnafu {
                url: self.url.clone(),
                status,
                body: response.text().await.with_context(|_| RequestSnafu {
                    url: self.url.clone(),
                })?,
            }
            .fail();
        }

        let stream = response
            .bytes_stream()
            .map(|result| result.map_err(|e| std::io::Error::other(format!("{e:?}"))))
            .into_async_read();

        let compat = tokio_util::compat::FuturesAsyncReadCompatExt::compat(stream);

        Ok(FeedConnection::new(Box::pin(compat), max_line_length))
    }
}

impl<R: AsyncRead + Unpin> FeedConnection<R> {
    pub fn new(source: R, max_line_length: usize) -> FeedConnection<R> {
        let id = CONNECTION_ID.fetch_add(1, Ordering::Relaxed);
        info!(connection_id = id, "ais feed connection opened");

        FeedConnection {
            id,
            lines: FramedRead::new(source, LinesCodec::new_with_max_length(max_line_length)),
            data: None,
            event_type: None,
            retry: None,
            events_received: 0,
            close_listener: None,
        }
    }

    /// Waits for the payload of the next event.
    ///
    /// Cancel safe, partially received events are kept in the connection and not in the
    /// returned future.
    pub async fn next_message(&mut self) -> Result<String, TransportError> {
        loop {
            match self.lines.next().await {
                Some(Ok(line)) => {
                    if let Some(message) = self.process_line(&line) {
                        self.events_received += 1;
                        return Ok(message);
                    }
                }
                Some(Err(e)) => return Err(FramingSnafu.into_error(e)),
                None => return StreamClosedSnafu.fail(),
            }
        }
    }

    fn process_line(&mut self, line: &str) -> Option<String> {
        if line.is_empty() {
            return self.dispatch();
        }
        if line.starts_with(':') {
            return None;
        }

        let (field, value) = match line.split_once(':') {
            Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
            None => (line, ""),
        };

        match field {
            "data" => match &mut self.data {
                Some(data) => {
                    data.push('\n');
                    data.push_str(value);
                }
                None => self.data = Some(value.to_string()),
            },
            "event" => self.event_type = Some(value.to_string()),
            "retry" => {
                if let Ok(millis) = value.parse::<u64>() {
                    self.retry = Some(Duration::from_millis(millis));
                }
            }
            _ => (),
        }

        None
    }

    fn dispatch(&mut self) -> Option<String> {
        let event_type = self.event_type.take();
        let data = self.data.take()?;

        match event_type.as_deref() {
            None | Some("") | Some("message") => Some(data),
            Some(other) => {
                debug!(connection_id = self.id, "ignoring '{other}' event");
                None
            }
        }
    }
}

impl<R> FeedConnection<R> {
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Reconnect delay advised by the server through the `retry` field.
    pub fn retry_hint(&self) -> Option<Duration> {
        self.retry
    }

    pub fn events_received(&self) -> u64 {
        self.events_received
    }

    /// Notifies the returned receiver once the connection is released, replacing any earlier
    /// listener.
    pub fn on_close(&mut self) -> oneshot::Receiver<ConnectionClosed> {
        let (sender, receiver) = oneshot::channel();
        self.close_listener = Some(sender);
        receiver
    }

    pub fn close(self) {}
}

impl<R> Drop for FeedConnection<R> {
    fn drop(&mut self) {
        info!(
            connection_id = self.id,
            events_received = self.events_received,
            "ais feed connection closed"
        );

        if let Some(listener) = self.close_listener.take() {
            let _ = listener.send(ConnectionClosed {
                connection_id: self.id,
                events_received: self.events_received,
            });
        }
    }
}

use std::time::Duration;

use crate::{
    consumer::Consumer,
    error::{
        Result,
        error::{InvalidEmitIntervalSnafu, InvalidFeedUrlSnafu},
    },
    feed::{AisFeedClient, FeedConnection},
    settings::{ReconnectSettings, Settings},
};
use ais_core::{Coalescer, Snapshot};
use async_channel::{Receiver, Sender};
use backon::{BackoffBuilder, ExponentialBuilder};
use reqwest::Url;
use snafu::ensure;
use tokio::{io::AsyncRead, sync::watch};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, instrument, warn};

/// A session against the live feed, owning all vessel state for its lifetime.
pub struct App {
    client: AisFeedClient,
    consumer: Consumer,
    state: Coalescer,
    sender: Sender<Snapshot>,
    receiver: Option<Receiver<Snapshot>>,
    unique_vessels: watch::Receiver<usize>,
    cancellation: CancellationToken,
    reconnect: ReconnectSettings,
    max_line_length: usize,
}

/// Stops a running [App], calling it more than once has no further effect.
#[derive(Clone)]
pub struct ShutdownHandle(CancellationToken);

impl App {
    pub fn build(settings: &Settings) -> Result<App> {
        let url = Url::parse(&settings.feed_url).map_err(|e| {
            InvalidFeedUrlSnafu {
                url: settings.feed_url.clone(),
                error_stringified: e.to_string(),
            }
            .build()
        })?;

        ensure!(!settings.emit_interval.is_zero(), InvalidEmitIntervalSnafu);

        let (sender, receiver) = async_channel::bounded(settings.snapshot_buffer_size.max(1));
        let (unique_sender, unique_vessels) = watch::channel(0);

        Ok(App {
            client: AisFeedClient::new(url),
            consumer: Consumer::new(settings.emit_interval, unique_sender),
            state: Coalescer::new(settings.vessel_ttl),
            sender,
            receiver: Some(receiver),
            unique_vessels,
            cancellation: CancellationToken::new(),
            reconnect: settings.reconnect,
            max_line_length: settings.max_line_length,
        })
    }

    /// Hands out the receiving end of the snapshot channel, there is only ever one subscriber.
    pub fn subscribe(&mut self) -> Option<Receiver<Snapshot>> {
        self.receiver.take()
    }

    /// Number of distinct vessels observed during the session so far.
    pub fn unique_vessels(&self) -> watch::Receiver<usize> {
        self.unique_vessels.clone()
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle(self.cancellation.clone())
    }

    /// Runs until shut down, reconnecting with backoff whenever the feed fails.
    ///
    /// Only returns an error if the snapshot subscriber has gone away.
    pub async fn run(mut self) -> Result<()> {
        self.receiver = None;

        let mut backoff = self.backoff();
        let mut retry_hint = None;

        loop {
            if self.cancellation.is_cancelled() {
                return Ok(());
            }

            let connection = tokio::select! {
                _ = self.cancellation.cancelled() => return Ok(()),
                connection = self.client.connect(self.max_line_length) => connection,
            };

            match connection {
                Ok(mut connection) => {
                    let outcome = self.run_connection(&mut connection).await;

                    if connection.events_received() > 0 {
                        backoff = self.backoff();
                    }
                    retry_hint = connection.retry_hint().or(retry_hint);
                    connection.close();

                    match outcome {
                        Ok(()) => return Ok(()),
                        Err(e) if e.is_transport() => {
                            error!("ais feed connection failed: {e:?}");
                        }
                        Err(e) => return Err(e),
                    }
                }
                Err(e) => error!("failed to connect to ais feed: {e:?}"),
            }

            let delay = backoff
                .next()
                .unwrap_or(self.reconnect.max_delay)
                .max(retry_hint.unwrap_or_default());

            warn!("reconnecting to {} in {delay:?}", self.client.url());

            tokio::select! {
                _ = self.cancellation.cancelled() => return Ok(()),
                _ = tokio::time::sleep(delay) => (),
            }
        }
    }

    /// Consumes a single externally provided source without reconnecting, returns once the
    /// source fails or the session is shut down.
    pub async fn run_with_source(mut self, source: impl AsyncRead + Unpin) -> Result<()> {
        self.receiver = None;

        let mut connection = FeedConnection::new(source, self.max_line_length);
        let outcome = self.run_connection(&mut connection).await;
        connection.close();
        outcome
    }

    #[instrument(skip_all, fields(connection_id = connection.id()))]
    async fn run_connection<R>(&mut self, connection: &mut FeedConnection<R>) -> Result<()>
    where
        R: AsyncRead + Unpin,
    {
        self.consumer
            .run(connection, &mut self.state, &self.sender, &self.cancellation)
            .await
    }

    fn backoff(&self) -> impl Iterator<Item = Duration> + use<> {
        ExponentialBuilder::default()
            .with_min_delay(self.reconnect.min_delay)
            .with_max_delay(self.reconnect.max_delay)
            .without_max_times()
            .build()
    }
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        if !self.0.is_cancelled() {
            info!("shutting down ais consumer");
        }
        self.0.cancel();
    }

    pub fn is_shutdown(&self) -> bool {
        self.0.is_cancelled()
    }
}

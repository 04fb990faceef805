use std::time::{Duration, Instant};

use crate::{
    error::{
        Result,
        error::{InternalChannelClosedSnafu, TransportSnafu},
    },
    feed::FeedConnection,
    models::decode,
};
use ais_core::{Coalescer, Snapshot};
use async_channel::{Sender, TrySendError};
use snafu::ResultExt;
use tokio::{io::AsyncRead, sync::watch, time::MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{instrument, warn};

/// Drives ingestion of a single feed connection and emits coalesced snapshots.
pub struct Consumer {
    emit_interval: Duration,
    unique_vessels: watch::Sender<usize>,
}

impl Consumer {
    pub fn new(emit_interval: Duration, unique_vessels: watch::Sender<usize>) -> Consumer {
        Consumer {
            emit_interval,
            unique_vessels,
        }
    }

    /// Consumes `connection` until it fails or `cancellation` fires.
    ///
    /// Messages and emission ticks are handled by the same loop, a snapshot can therefore never
    /// observe a partially applied update. Pending updates are flushed before a transport error
    /// is returned.
    pub async fn run<R>(
        &self,
        connection: &mut FeedConnection<R>,
        state: &mut Coalescer,
        sender: &Sender<Snapshot>,
        cancellation: &CancellationToken,
    ) -> Result<()>
    where
        R: AsyncRead + Unpin,
    {
        let mut interval = tokio::time::interval(self.emit_interval);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancellation.cancelled() => return Ok(()),
                message = connection.next_message() => {
                    match message {
                        Ok(message) => self.process_message(&message, state),
                        Err(e) => {
                            emit(state, sender)?;
                            return Err(e).context(TransportSnafu);
                        }
                    }
                }
                _ = interval.tick() => emit(state, sender)?,
            }
        }
    }

    fn process_message(&self, message: &str, state: &mut Coalescer) {
        match decode(message) {
            Err(e) => warn!("dropping ais message: {e:?}"),
            Ok(position) => {
                if state.apply(position, Instant::now()).new_vessel {
                    self.unique_vessels.send_replace(state.unique_vessels());
                }
            }
        }
    }
}

#[instrument(skip_all, fields(app.sequence, app.num_vessels))]
fn emit(state: &mut Coalescer, sender: &Sender<Snapshot>) -> Result<()> {
    let Some(snapshot) = state.tick(Instant::now()) else {
        return Ok(());
    };

    let span = tracing::Span::current();
    span.record("app.sequence", snapshot.sequence);
    span.record("app.num_vessels", snapshot.vessels.features.len());

    match sender.try_send(snapshot) {
        Ok(()) => Ok(()),
        Err(TrySendError::Full(snapshot)) => {
            warn!(
                "snapshot subscriber is lagging, dropped snapshot {}",
                snapshot.sequence
            );
            state.mark_dirty();
            Ok(())
        }
        Err(TrySendError::Closed(_)) => InternalChannelClosedSnafu.fail(),
    }
}

use std::time::Duration;

use ais_consumer::{
    error::Result,
    models::AisMessage,
    settings::{Environment, LogLevel, MapSettings, ReconnectSettings, Settings},
    startup::{App, ShutdownHandle},
};
use ais_core::Snapshot;
use async_channel::Receiver;
use futures::{Future, TryStreamExt};
use tokio::{sync::watch, task::JoinHandle};
use tokio_stream::wrappers::ReceiverStream;

pub struct TestHelper {
    pub ais_source: AisSource,
    pub snapshots: Receiver<Snapshot>,
    pub unique_vessels: watch::Receiver<usize>,
    pub shutdown: ShutdownHandle,
    pub emit_interval: Duration,
    pub app: JoinHandle<Result<()>>,
}

pub struct AisSource {
    out: tokio::sync::mpsc::Sender<std::result::Result<String, std::io::Error>>,
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn test_settings(feed_url: &str) -> Settings {
    Settings {
        environment: Environment::Test,
        log_level: LogLevel::Debug,
        feed_url: feed_url.to_string(),
        emit_interval: Duration::from_millis(20),
        vessel_ttl: None,
        snapshot_buffer_size: 100,
        max_line_length: 64 * 1024,
        reconnect: ReconnectSettings {
            min_delay: Duration::from_millis(10),
            max_delay: Duration::from_millis(50),
        },
        map: MapSettings::default(),
    }
}

pub async fn test<T, Fut>(test_closure: T)
where
    T: FnOnce(TestHelper) -> Fut,
    Fut: Future<Output = ()>,
{
    init_tracing();

    let settings = test_settings("http://localhost/api/ships");

    let mut app = App::build(&settings).unwrap();
    let snapshots = app.subscribe().unwrap();
    let unique_vessels = app.unique_vessels();
    let shutdown = app.shutdown_handle();

    let (sender, recv) = tokio::sync::mpsc::channel(100);

    let receiver_stream = ReceiverStream::new(recv);
    let compat = tokio_util::compat::FuturesAsyncReadCompatExt::compat(
        receiver_stream.into_async_read(),
    );

    let app = tokio::spawn(app.run_with_source(compat));

    let helper = TestHelper {
        ais_source: AisSource { out: sender },
        snapshots,
        unique_vessels,
        shutdown,
        emit_interval: settings.emit_interval,
        app,
    };

    test_closure(helper).await;
}

impl TestHelper {
    pub async fn next_snapshot(&self) -> Snapshot {
        tokio::time::timeout(self.emit_interval * 50, self.snapshots.recv())
            .await
            .expect("no snapshot was emitted in time")
            .unwrap()
    }

    /// Waits for the first snapshot satisfying `predicate`, skipping intermediate ones.
    pub async fn snapshot_where<P>(&self, predicate: P) -> Snapshot
    where
        P: Fn(&Snapshot) -> bool,
    {
        loop {
            let snapshot = self.next_snapshot().await;
            if predicate(&snapshot) {
                return snapshot;
            }
        }
    }

    pub async fn assert_no_snapshot(&self) {
        tokio::time::sleep(self.emit_interval * 5).await;
        assert!(self.snapshots.try_recv().is_err());
    }
}

impl AisSource {
    pub async fn send_message(&self, message: &AisMessage) {
        let string = serde_json::to_string(message).unwrap();
        self.send_raw(format!("data: {string}\n\n")).await
    }

    pub async fn send_raw(&self, val: String) {
        self.out.send(Ok(val)).await.unwrap();
    }

    /// Ends the stream as if the remote side had closed the connection.
    pub fn close(self) {}
}

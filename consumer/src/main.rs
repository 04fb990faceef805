use ais_consumer::{settings::Settings, startup::App, telemetry::init_tracer};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::new()?;

    init_tracer(&settings.log_level);

    info!(
        "starting ais consumer in {}, map center {:?}",
        settings.environment.as_str(),
        settings.map.center
    );

    let mut app = App::build(&settings)?;

    let shutdown = app.shutdown_handle();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => shutdown.shutdown(),
            Err(e) => error!("failed to listen for shutdown signal: {e:?}"),
        }
    });

    if let Some(snapshots) = app.subscribe() {
        tokio::spawn(async move {
            while let Ok(snapshot) = snapshots.recv().await {
                info!(
                    sequence = snapshot.sequence,
                    num_vessels = snapshot.vessels.features.len(),
                    unique_vessels = snapshot.unique_vessels,
                    "received snapshot"
                );
            }
        });
    }

    app.run().await?;

    Ok(())
}

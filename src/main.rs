use std::sync::Arc;

use anyhow::Result;
use drive_status::{
    config::{PollerConfig, SourceKind},
    externals::{
        broadcast::adapters::EmitToBroadcastAdapter,
        event_logging::task::task_status_event_logging,
        hardware::adapters::DriveStatusSource,
        parameter_store::{adapters::ParameterStatusSource, services::InMemoryParameterStore},
        simulation::{
            adapters::{RandomStatusSource, ReplayStatusSource},
            services::SimulatedDriveService,
            task::task_feed_parameter_store,
        },
    },
    internals::core::{
        poller::StatusPoller,
        ports::{MultiPort, StatusSource},
    },
};
use tokio::{signal, sync::broadcast};
use tokio_util::{sync::CancellationToken, task::TaskTracker};
use tracing::{info, level_filters::LevelFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .compact()
        .with_file(true)
        .with_line_number(true)
        .with_thread_ids(true)
        .with_target(false)
        .with_max_level(LevelFilter::DEBUG)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = PollerConfig::from_env()?;
    info!("Loaded configuration: {:?}", config);

    let tracker = TaskTracker::new();
    let token = CancellationToken::new();

    let (tx_status_event, rx_status_event) = broadcast::channel(32);

    let token_clone = token.clone();
    tracker.spawn(async { task_status_event_logging(token_clone, rx_status_event).await });

    let source: Box<dyn StatusSource> = match config.source {
        SourceKind::Parameter => {
            // NOTE: The host normally owns this store. Feed it ourselves here.
            let store = Arc::new(InMemoryParameterStore::new());
            let token_clone = token.clone();
            tracker.spawn(task_feed_parameter_store(
                token_clone,
                store.clone(),
                config.parameter_key.clone(),
                config.interval,
            ));
            Box::new(ParameterStatusSource::new(store, config.parameter_key.clone()))
        }
        SourceKind::Drive => Box::new(DriveStatusSource::new(
            SimulatedDriveService::new(config.zero_offset_mm),
            config.zero_offset_mm,
        )),
        SourceKind::Random => Box::new(RandomStatusSource::default()),
        SourceKind::Replay => Box::new(ReplayStatusSource::recorded_descent()),
    };

    let ports: MultiPort = vec![Box::new(EmitToBroadcastAdapter::new(tx_status_event))];
    let mut poller = StatusPoller::new(source, ports, config.interval);
    poller.start()?;

    let token_clone = token.clone();
    tokio::select! {
        _ = token_clone.cancelled() => {}
        res = signal::ctrl_c() => {
            match res {
                Ok(_) => {
                    info!("Received ctrl_c. Shutting down.");
                    token.cancel();
                },
                Err(e)=>{
                    tracing::error!("Failed to listen for ctrl_c. Error: {}", e);
                    token.cancel();
                }
            };
        },
    }

    // Joining the worker blocks, keep it off the runtime threads.
    tokio::task::spawn_blocking(move || poller.stop()).await?;

    tracker.close();
    tracker.wait().await;

    Ok(())
}

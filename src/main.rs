use anyhow::Result;
use sensor_averages::*;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    let zone = app_config.time.tz()?;
    let codec = averages::TimestampCodec::new(zone);

    let repo = Arc::new(
        readings_repo::ReadingsRepo::connect(
            &app_config.database.path,
            app_config.database.max_pool_size,
        )
        .await?,
    );
    repo.init().await?;
    tracing::info!(
        zone = %zone,
        readings = repo.count_readings().await?,
        "readings store ready"
    );

    let cache = Arc::new(snapshot_cache::SnapshotCache::new(
        repo.clone(),
        averages::BucketGenerator::new(codec, app_config.averages.on_malformed),
        app_config.averages.refresh_threshold(),
    ));

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let scheduler_handle = scheduler::spawn(
        cache.clone(),
        scheduler::SchedulerConfig {
            poll_interval: app_config.averages.poll_interval(),
        },
        shutdown_rx,
    );

    let app = routes::app(cache, codec);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = shutdown_signal() => {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
            let _ = scheduler_handle.await;
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm = match tokio::signal::unix::signal(
            tokio::signal::unix::SignalKind::terminate(),
        ) {
            Ok(s) => s,
            Err(_) => {
                let _ = tokio::signal::ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

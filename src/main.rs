use anyhow::Result;
use hostmon::*;
use std::path::PathBuf;
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
    let history_path = PathBuf::from(&app_config.storage.path);

    let history = Arc::new(history_repo::HistoryStore::new(
        history_repo::file::load(&history_path),
        app_config.storage.retention(),
    ));
    tracing::info!(
        samples_retained = history.len(),
        retention_hours = app_config.storage.retention_hours,
        "history ready"
    );
    let sysinfo_repo = Arc::new(sysinfo_repo::SysinfoRepo::new());

    let (worker_shutdown_tx, worker_shutdown_rx) = tokio::sync::oneshot::channel();
    let (persist_shutdown_tx, persist_shutdown_rx) = tokio::sync::oneshot::channel();

    let worker_handle = worker::spawn(
        worker::WorkerDeps {
            source: sysinfo_repo,
            history: history.clone(),
            shutdown_rx: worker_shutdown_rx,
        },
        worker::WorkerConfig {
            sample_interval_ms: app_config.monitoring.sample_interval_ms,
            stats_log_interval_secs: app_config.monitoring.stats_log_interval_secs,
        },
    );
    let persist_handle = persist_worker::spawn(
        history.clone(),
        persist_worker::PersistWorkerConfig {
            path: history_path,
            persist_interval_secs: app_config.storage.persist_interval_secs,
        },
        persist_shutdown_rx,
    );

    let app = routes::app(history, app_config.resampling.step_table());
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    let served = tokio::select! {
        result = axum::serve(listener, app) => {
            if let Err(e) = &result {
                tracing::error!(error = %e, "HTTP server stopped");
            }
            result
        }
        _ = shutdown_signal() => {
            tracing::info!("Received shutdown signal");
            Ok(())
        }
    };

    // Stop sampling first so the final save holds everything recorded.
    let _ = worker_shutdown_tx.send(());
    let _ = worker_handle.await;
    let _ = persist_shutdown_tx.send(());
    let _ = persist_handle.await;

    served?;
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
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

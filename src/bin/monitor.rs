use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use dotenvy::dotenv;
use log::{info, warn};

use wakewatch::core::Config;
use wakewatch::features::{get_features, get_version};
use wakewatch::platform::{
    AlertPresenter, IndicatorContent, JsonEventSource, PlatformError, ProcessRegistrar,
    TokioWakeScheduler,
};
use wakewatch::service::MonitorService;

/// Registrar for running the monitor as a plain desktop process: shown
/// indicators live in a map, and the process trivially counts as
/// registered because we are it.
struct LocalRegistrar {
    indicators: DashMap<u32, IndicatorContent>,
    wake_lock: AtomicBool,
}

impl LocalRegistrar {
    fn new() -> Self {
        LocalRegistrar {
            indicators: DashMap::new(),
            wake_lock: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl ProcessRegistrar for LocalRegistrar {
    async fn start_foreground(
        &self,
        indicator_id: u32,
        content: &IndicatorContent,
    ) -> Result<(), PlatformError> {
        self.indicators.insert(indicator_id, content.clone());
        info!("[indicator {indicator_id}] {}: {}", content.title, content.body);
        Ok(())
    }

    async fn is_indicator_present(&self, indicator_id: u32) -> Result<bool, PlatformError> {
        Ok(self.indicators.contains_key(&indicator_id))
    }

    async fn is_process_registered(&self, _name: &str) -> bool {
        true
    }

    async fn start_process(&self, name: &str) -> Result<(), PlatformError> {
        warn!("Restart requested for {name}, but this host has no process launcher");
        Ok(())
    }

    async fn acquire_wake_lock(&self, tag: &str) -> Result<(), PlatformError> {
        self.wake_lock.store(true, Ordering::SeqCst);
        info!("Wake lock acquired ({tag})");
        Ok(())
    }

    async fn release_wake_lock(&self) {
        self.wake_lock.store(false, Ordering::SeqCst);
        info!("Wake lock released");
    }
}

/// Presents alerts on the terminal
struct ConsolePresenter;

#[async_trait]
impl AlertPresenter for ConsolePresenter {
    async fn show(
        &self,
        indicator_id: u32,
        content: &IndicatorContent,
    ) -> Result<(), PlatformError> {
        info!("⏰ [alert {indicator_id}] {}: {}", content.title, content.body);
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenv().ok();

    let config = Config::from_env()?;

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.log_level))
        .init();

    info!("Starting wakewatch monitor v{}...", get_version());
    for feature in get_features() {
        info!("  feature: {} v{}", feature.name, feature.version);
    }

    let (scheduler, mut deliveries) = TokioWakeScheduler::new();
    let source = Arc::new(JsonEventSource::new(config.events_path.clone()));
    let registrar = Arc::new(LocalRegistrar::new());
    let presenter = Arc::new(ConsolePresenter);

    let mut handle = MonitorService::start(
        source,
        Arc::new(scheduler.clone()),
        registrar,
        &config,
    )
    .await;
    handle.ready().await;
    info!("Monitoring {} every 30s", config.events_path);

    // Route fired wakes back into the service
    let router = handle.wake_router(presenter);
    let routing = tokio::spawn(async move {
        while let Some(delivery) = deliveries.recv().await {
            router.route(delivery.payload).await;
        }
    });

    tokio::signal::ctrl_c().await?;
    info!("Shutting down...");
    handle.shutdown();
    scheduler.cancel_all();
    routing.abort();

    Ok(())
}

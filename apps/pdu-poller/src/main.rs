//! PDU 轮询服务：周期性轮询全部设备并写入存储，附带诊断 HTTP 接口。

mod handlers;
mod routes;

use pdu_config::AppConfig;
use pdu_normalize::OutletNormalizer;
use pdu_pipeline::{BatchPoller, LatestTick, PollOptions, PollScheduler};
use pdu_protocol::V2cConnector;
use pdu_storage::{
    DeviceSource, InMemoryResultStore, JsonFileDeviceSource, PgDeviceSource, PgResultStore,
    ResultSink, connect_pool,
};
use pdu_telemetry::init_tracing;
use pdu_vendor::Dispatcher;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

#[derive(Clone)]
pub struct AppState {
    pub latest: LatestTick,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 加载本地 .env（如存在）
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;
    init_tracing();

    // OID 注册表启动时加载一次，之后只读
    let registry = Arc::new(config.load_registry()?);

    let (source, sink) = build_storage(&config).await?;
    let connector = Arc::new(V2cConnector::new());
    let dispatcher = Arc::new(Dispatcher::new(connector, registry.clone()));
    let poller = Arc::new(BatchPoller::new(
        dispatcher,
        OutletNormalizer::new(registry.vocabulary.clone()),
        sink,
        PollOptions {
            log_table: config.poll_log_table,
            debug: config.poll_debug,
        },
    ));
    let latest = LatestTick::new();
    let scheduler = PollScheduler::new(
        source,
        poller,
        Duration::from_millis(config.poll_interval_ms),
        latest.clone(),
    );

    let app = routes::create_router().with_state(AppState { latest });
    let listener = tokio::net::TcpListener::bind(&config.http_addr).await?;
    info!(
        http_addr = %config.http_addr,
        poll_interval_ms = config.poll_interval_ms,
        "pdu_poller_started"
    );
    let server = tokio::spawn(async move { axum::serve(listener, app).await });

    scheduler.run_until(shutdown_signal()).await;
    info!("pdu_poller_stopped");
    server.abort();
    Ok(())
}

/// 有数据库时设备与结果都走 Postgres；否则读设备清单文件，结果写入内存。
async fn build_storage(
    config: &AppConfig,
) -> Result<(Arc<dyn DeviceSource>, Arc<dyn ResultSink>), Box<dyn std::error::Error>> {
    if let Some(database_url) = &config.database_url {
        let pool = connect_pool(database_url).await?;
        let source: Arc<dyn DeviceSource> = Arc::new(PgDeviceSource::new(pool.clone()));
        let sink: Arc<dyn ResultSink> =
            Arc::new(PgResultStore::new(pool, config.usage_current_threshold));
        return Ok((source, sink));
    }
    let path = config
        .devices_path
        .clone()
        .ok_or("PDU_DATABASE_URL or PDU_DEVICES_PATH is required")?;
    warn!(devices_path = %path, "database not configured, results kept in memory");
    let source: Arc<dyn DeviceSource> = Arc::new(JsonFileDeviceSource::new(path));
    let sink: Arc<dyn ResultSink> =
        Arc::new(InMemoryResultStore::new(config.usage_current_threshold));
    Ok((source, sink))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        // 无法监听信号时保持运行
        std::future::pending::<()>().await;
    }
}

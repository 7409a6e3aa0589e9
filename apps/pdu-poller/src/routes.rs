//! 路由定义
//!
//! - 健康检查：/health
//! - 轮询计数：/metrics
//! - 最近一次轮询结果：/api/poll/latest

use super::AppState;
use super::handlers::*;
use axum::{Router, routing::get};

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(get_metrics))
        .route("/api/poll/latest", get(get_latest_poll))
}

//! 数据库连接管理
//!
//! - connect_pool：建立 Postgres 连接池
//!
//! 设备来源与结果写入共享同一个连接池；一个轮询周期内各设备并发写入，
//! 最大连接数限制为 8，超出的写入在池上排队。

use crate::error::StorageError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// 建立 Postgres 连接池
///
/// `database_url` 来自 `PDU_DATABASE_URL`。
pub async fn connect_pool(database_url: &str) -> Result<PgPool, StorageError> {
    let pool = PgPoolOptions::new()
        .max_connections(8)
        .connect(database_url)
        .await?;
    Ok(pool)
}

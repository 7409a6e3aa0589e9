//! Postgres 结果写入实现

use crate::error::StorageError;
use crate::models::OutletStatusRecord;
use crate::traits::ResultSink;
use crate::usage::{UsageTransition, plan_usage_transition};
use domain::{DeviceDescriptor, NormalizedResult};
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::debug;

pub struct PgResultStore {
    pub pool: PgPool,
    usage_threshold: f64,
}

impl PgResultStore {
    pub fn new(pool: PgPool, usage_threshold: f64) -> Self {
        Self {
            pool,
            usage_threshold,
        }
    }

    pub async fn connect(database_url: &str, usage_threshold: f64) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self::new(pool, usage_threshold))
    }
}

async fn write_readings(
    tx: &mut Transaction<'_, Postgres>,
    device_id: i64,
    result: &NormalizedResult,
    ts: f64,
) -> Result<(), StorageError> {
    sqlx::query(
        "insert into pdu_status_current (pdu_id, voltage, current, power, energy, updated_at) \
         values ($1, $2, $3, $4, $5, to_timestamp($6 / 1000.0)) \
         on conflict (pdu_id) do update set \
         voltage = excluded.voltage, current = excluded.current, power = excluded.power, \
         energy = excluded.energy, updated_at = excluded.updated_at",
    )
    .bind(device_id)
    .bind(result.voltage)
    .bind(result.current)
    .bind(result.power)
    .bind(result.energy)
    .bind(ts)
    .execute(&mut **tx)
    .await?;
    sqlx::query(
        "insert into pdu_status_history (pdu_id, voltage, current, power, energy, polled_at) \
         values ($1, $2, $3, $4, $5, to_timestamp($6 / 1000.0))",
    )
    .bind(device_id)
    .bind(result.voltage)
    .bind(result.current)
    .bind(result.power)
    .bind(result.energy)
    .bind(ts)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn write_outlets(
    tx: &mut Transaction<'_, Postgres>,
    device_id: i64,
    result: &NormalizedResult,
    ts: f64,
) -> Result<(), StorageError> {
    for (outlet_no, status) in result.outlet_detail.iter() {
        let row = sqlx::query(
            "insert into pdu_outlets (pdu_id, outlet_no, name) values ($1, $2, $3) \
             on conflict (pdu_id, outlet_no) \
             do update set name = coalesce(pdu_outlets.name, excluded.name) \
             returning id::bigint as id",
        )
        .bind(device_id)
        .bind(outlet_no as i32)
        .bind(OutletStatusRecord::default_name(outlet_no))
        .fetch_one(&mut **tx)
        .await?;
        let outlet_id: i64 = row.try_get("id")?;
        let status = status.map(|state| state.as_str());
        sqlx::query(
            "insert into pdu_outlet_status_current (outlet_id, status, updated_at) \
             values ($1, $2, to_timestamp($3 / 1000.0)) \
             on conflict (outlet_id) do update set \
             status = excluded.status, updated_at = excluded.updated_at",
        )
        .bind(outlet_id)
        .bind(status)
        .bind(ts)
        .execute(&mut **tx)
        .await?;
        sqlx::query(
            "insert into pdu_outlet_status_history (outlet_id, status, polled_at) \
             values ($1, $2, to_timestamp($3 / 1000.0))",
        )
        .bind(outlet_id)
        .bind(status)
        .bind(ts)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn update_usage_session(
    tx: &mut Transaction<'_, Postgres>,
    device_id: i64,
    current: Option<f64>,
    threshold: f64,
    ts: f64,
) -> Result<(), StorageError> {
    let active = sqlx::query(
        "select id::bigint as id from pdu_usage_sessions \
         where pdu_id = $1 and is_active = true \
         order by started_at desc limit 1 for update",
    )
    .bind(device_id)
    .fetch_optional(&mut **tx)
    .await?;
    let active_id: Option<i64> = match active {
        Some(row) => Some(row.try_get("id")?),
        None => None,
    };

    let transition = plan_usage_transition(active_id.is_some(), current, threshold);
    match (transition, active_id) {
        (UsageTransition::Open { current }, _) => {
            sqlx::query(
                "insert into pdu_usage_sessions \
                 (pdu_id, started_at, ended_at, duration_seconds, is_active, last_current, \
                 created_at, updated_at) \
                 values ($1, to_timestamp($2 / 1000.0), null, null, true, $3, now(), now())",
            )
            .bind(device_id)
            .bind(ts)
            .bind(current)
            .execute(&mut **tx)
            .await?;
        }
        (UsageTransition::Refresh { current }, Some(id)) => {
            sqlx::query(
                "update pdu_usage_sessions set last_current = $1, updated_at = now() \
                 where id = $2",
            )
            .bind(current)
            .bind(id)
            .execute(&mut **tx)
            .await?;
        }
        (UsageTransition::Close { current }, Some(id)) => {
            sqlx::query(
                "update pdu_usage_sessions set \
                 ended_at = to_timestamp($1 / 1000.0), \
                 duration_seconds = greatest(0, extract(epoch from (to_timestamp($1 / 1000.0) - started_at))::int), \
                 is_active = false, last_current = $2, updated_at = now() \
                 where id = $3",
            )
            .bind(ts)
            .bind(current)
            .bind(id)
            .execute(&mut **tx)
            .await?;
        }
        _ => return Ok(()),
    }
    debug!(
        target: "pdu.storage",
        device_id,
        transition = ?transition,
        "usage_session_updated"
    );
    Ok(())
}

#[async_trait::async_trait]
impl ResultSink for PgResultStore {
    async fn write(
        &self,
        device: &DeviceDescriptor,
        result: &NormalizedResult,
    ) -> Result<(), StorageError> {
        let ts = result.polled_at_ms as f64;
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "update pdu_devices set status = $2::varchar, \
             last_seen = case when $2::varchar = 'ONLINE' then to_timestamp($3 / 1000.0) else last_seen end \
             where id = $1",
        )
        .bind(device.id)
        .bind(result.status.as_str())
        .bind(ts)
        .execute(&mut *tx)
        .await?;

        if !result.is_online() {
            update_usage_session(&mut tx, device.id, Some(0.0), self.usage_threshold, ts).await?;
            tx.commit().await?;
            return Ok(());
        }

        write_readings(&mut tx, device.id, result, ts).await?;
        write_outlets(&mut tx, device.id, result, ts).await?;
        update_usage_session(&mut tx, device.id, result.current, self.usage_threshold, ts)
            .await?;
        tx.commit().await?;
        Ok(())
    }
}

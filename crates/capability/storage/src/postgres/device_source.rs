//! Postgres 设备清单实现

use crate::error::StorageError;
use crate::traits::DeviceSource;
use domain::DeviceDescriptor;
use sqlx::{PgPool, Row};

pub struct PgDeviceSource {
    pub pool: PgPool,
}

impl PgDeviceSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self, StorageError> {
        let pool = crate::connection::connect_pool(database_url).await?;
        Ok(Self { pool })
    }
}

#[async_trait::async_trait]
impl DeviceSource for PgDeviceSource {
    async fn list_devices(&self) -> Result<Vec<DeviceDescriptor>, StorageError> {
        let rows = sqlx::query(
            "select id::bigint as id, coalesce(name, '') as name, \
             coalesce(brand, '') as brand, coalesce(model, '') as model, \
             split_part(ip_address::text, '/', 1) as ip_address, \
             coalesce(nullif(snmp_version, ''), '2c') as snmp_version, \
             coalesce(snmp_port, 161)::int as snmp_port, \
             coalesce(snmp_community, '') as snmp_community, \
             coalesce(snmp_timeout_ms, 2000)::bigint as snmp_timeout_ms, \
             coalesce(snmp_retries, 1)::int as snmp_retries \
             from pdu_devices where coalesce(is_active, true) = true order by id",
        )
        .fetch_all(&self.pool)
        .await?;
        let mut devices = Vec::with_capacity(rows.len());
        for row in rows {
            let port: i32 = row.try_get("snmp_port")?;
            let timeout_ms: i64 = row.try_get("snmp_timeout_ms")?;
            let retries: i32 = row.try_get("snmp_retries")?;
            devices.push(DeviceDescriptor {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                brand: row.try_get("brand")?,
                model: row.try_get("model")?,
                ip: row.try_get("ip_address")?,
                snmp_community: row.try_get("snmp_community")?,
                snmp_version: row.try_get("snmp_version")?,
                snmp_port: u16::try_from(port).ok(),
                snmp_timeout_ms: u64::try_from(timeout_ms).ok(),
                snmp_retries: u32::try_from(retries).ok(),
                voltage_override: None,
            });
        }
        Ok(devices)
    }
}

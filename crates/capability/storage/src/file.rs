//! JSON 文件设备清单。

use crate::error::StorageError;
use crate::traits::DeviceSource;
use domain::DeviceDescriptor;

/// 从 JSON 数组文件读取设备；每次调用重新读取，便于不重启修改清单。
pub struct JsonFileDeviceSource {
    path: String,
}

impl JsonFileDeviceSource {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

/// 解析设备清单，按 id 升序排列。`id` 必填且不得重复。
pub fn parse_devices(raw: &str) -> Result<Vec<DeviceDescriptor>, StorageError> {
    let mut devices: Vec<DeviceDescriptor> = serde_json::from_str(raw)
        .map_err(|err| StorageError::new(format!("invalid device list: {}", err)))?;
    devices.sort_by_key(|device| device.id);
    if let Some(pair) = devices.windows(2).find(|pair| pair[0].id == pair[1].id) {
        return Err(StorageError::new(format!(
            "invalid device list: duplicate id {}",
            pair[0].id
        )));
    }
    Ok(devices)
}

#[async_trait::async_trait]
impl DeviceSource for JsonFileDeviceSource {
    async fn list_devices(&self) -> Result<Vec<DeviceDescriptor>, StorageError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| StorageError::new(format!("{}: {}", self.path, err)))?;
        parse_devices(&raw)
    }
}

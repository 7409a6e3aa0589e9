//! 设备清单内存实现。

use crate::error::StorageError;
use crate::traits::DeviceSource;
use domain::DeviceDescriptor;
use std::sync::RwLock;

pub struct InMemoryDeviceSource {
    devices: RwLock<Vec<DeviceDescriptor>>,
}

impl InMemoryDeviceSource {
    pub fn new(devices: Vec<DeviceDescriptor>) -> Self {
        Self {
            devices: RwLock::new(devices),
        }
    }

    /// 替换清单，下一周期生效。
    pub fn replace(&self, devices: Vec<DeviceDescriptor>) -> Result<(), StorageError> {
        let mut current = self
            .devices
            .write()
            .map_err(|_| StorageError::new("lock failed"))?;
        *current = devices;
        Ok(())
    }
}

#[async_trait::async_trait]
impl DeviceSource for InMemoryDeviceSource {
    async fn list_devices(&self) -> Result<Vec<DeviceDescriptor>, StorageError> {
        let devices = self
            .devices
            .read()
            .map_err(|_| StorageError::new("lock failed"))?;
        let mut items = devices.clone();
        items.sort_by_key(|device| device.id);
        Ok(items)
    }
}

use serde::Serialize;
use serde::ser::{SerializeMap, Serializer};

/// 插座的规范化状态。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutletState {
    On,
    Off,
}

impl OutletState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }
}

/// 规范化插座明细：`Port1..PortN -> "ON" | "OFF" | null`，键连续且从 1 开始。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutletDetail {
    ports: Vec<Option<OutletState>>,
}

impl OutletDetail {
    pub fn new(ports: Vec<Option<OutletState>>) -> Self {
        Self { ports }
    }

    pub fn port_key(port: usize) -> String {
        format!("Port{}", port)
    }

    pub fn len(&self) -> usize {
        self.ports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ports.is_empty()
    }

    /// 按端口号（从 1 开始）取状态；越界返回 `None`。
    pub fn port(&self, port: usize) -> Option<Option<OutletState>> {
        port.checked_sub(1)
            .and_then(|index| self.ports.get(index))
            .copied()
    }

    /// 遍历 `(端口号, 状态)`。
    pub fn iter(&self) -> impl Iterator<Item = (usize, Option<OutletState>)> + '_ {
        self.ports
            .iter()
            .enumerate()
            .map(|(index, state)| (index + 1, *state))
    }
}

impl Serialize for OutletDetail {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.ports.len()))?;
        for (port, state) in self.iter() {
            map.serialize_entry(&Self::port_key(port), &state.map(|s| s.as_str()))?;
        }
        map.end()
    }
}

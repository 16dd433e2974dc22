//! 端口与线缆
//!
//! 端口属于一个设备，最多与一个对端端口点对点相连。

use std::fmt;

use serde::{Deserialize, Serialize};

use super::id::{DeviceId, PortId};

/// 端口介质类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PortMedium {
    Ethernet,
    Rs232,
    Console,
    Serial,
    Wireless,
    Power,
}

impl fmt::Display for PortMedium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PortMedium::Ethernet => "Ethernet",
            PortMedium::Rs232 => "RS232",
            PortMedium::Console => "Console",
            PortMedium::Serial => "Serial",
            PortMedium::Wireless => "Wireless",
            PortMedium::Power => "Power",
        };
        f.write_str(s)
    }
}

impl PortMedium {
    /// 两种介质能否用线缆相连。无线口永远不走线缆。
    pub fn compatible_with(self, other: PortMedium) -> bool {
        use PortMedium::*;
        match (self, other) {
            (Wireless, _) | (_, Wireless) => false,
            (Power, b) | (b, Power) => b == Power,
            (Ethernet, b) | (b, Ethernet) => b == Ethernet,
            (Serial, b) | (b, Serial) => b == Serial,
            (Rs232, Console) | (Console, Rs232) => true,
            _ => false,
        }
    }
}

/// 线缆类型；`Auto` 表示按两端自动选择推荐线缆。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CableType {
    #[default]
    Auto,
    CopperStraightThrough,
    CopperCrossover,
    ConsoleRollover,
    SerialDce,
    SerialDte,
}

impl fmt::Display for CableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CableType::Auto => "Auto",
            CableType::CopperStraightThrough => "Copper Straight-Through",
            CableType::CopperCrossover => "Copper Crossover",
            CableType::ConsoleRollover => "Console (Rollover)",
            CableType::SerialDce => "Serial DCE",
            CableType::SerialDte => "Serial DTE",
        };
        f.write_str(s)
    }
}

impl CableType {
    pub fn allowed_for(self, medium: PortMedium) -> bool {
        match self {
            CableType::Auto => true,
            CableType::CopperStraightThrough | CableType::CopperCrossover => {
                medium == PortMedium::Ethernet
            }
            CableType::SerialDce | CableType::SerialDte => medium == PortMedium::Serial,
            CableType::ConsoleRollover => {
                matches!(medium, PortMedium::Console | PortMedium::Rs232)
            }
        }
    }
}

/// 已建立的链路（两端各保存一份，`peer` 指向对端）。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    pub peer: PortId,
    pub cable: CableType,
    /// 线缆选错时链路存在但不可用
    pub up: bool,
    /// 串口链路中本端是否为 DCE
    pub dce: bool,
}

/// 物理端口
#[derive(Debug, Clone)]
pub struct Port {
    pub id: PortId,
    pub owner: DeviceId,
    /// 面板短名，如 `Gi0/0`
    pub port_name: String,
    /// 逻辑接口名，如 `GigabitEthernet0/0`
    pub interface_name: String,
    pub medium: PortMedium,
    pub link: Option<Link>,
}

impl Port {
    pub fn is_connected(&self) -> bool {
        self.link.is_some()
    }

    pub fn peer(&self) -> Option<PortId> {
        self.link.map(|l| l.peer)
    }
}

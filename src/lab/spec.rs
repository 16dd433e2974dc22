//! 实验描述（JSON）
//!
//! 一个实验由设备、连线和一串按顺序执行的步骤组成：
//!
//! ```json
//! {
//!   "devices": [
//!     { "name": "R1", "kind": "router" },
//!     { "name": "PC1", "kind": "pc", "config": ["set ip 10.0.0.2 255.255.255.0 10.0.0.1"] }
//!   ],
//!   "links": [ { "a": "R1", "a_if": "Gi0/0", "b": "PC1", "b_if": "FastEthernet0" } ],
//!   "steps": [
//!     { "kind": "cli", "device": "R1", "commands": ["enable", "show ip interface brief"] },
//!     { "kind": "advance", "ms": 1000 }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};

use crate::device::router::ModuleKind;
use crate::device::{WifiBand, WifiSecurity};
use crate::net::{CableType, Position};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabSpec {
    #[serde(default)]
    pub name: Option<String>,
    pub devices: Vec<DeviceSpec>,
    #[serde(default)]
    pub links: Vec<LinkSpec>,
    #[serde(default)]
    pub steps: Vec<StepSpec>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceKindSpec {
    Router,
    Switch,
    Pc,
    AccessPoint,
    PowerDistribution,
    PowerOutlet,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSpec {
    pub name: String,
    pub kind: DeviceKindSpec,
    #[serde(default)]
    pub position: Position,
    #[serde(default)]
    pub requires_external_power: bool,
    /// 路由器插槽模块，断电安装
    #[serde(default)]
    pub modules: Vec<ModuleSpec>,
    /// PC 是否装无线网卡
    #[serde(default)]
    pub wireless: bool,
    #[serde(default)]
    pub access_point: Option<AccessPointSpec>,
    /// 建好拓扑后回放到设备 CLI 的命令
    #[serde(default)]
    pub config: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ModuleSpec {
    pub slot: u8,
    pub module: ModuleKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessPointSpec {
    pub ssid: String,
    #[serde(default)]
    pub band: WifiBand,
    #[serde(default)]
    pub security: WifiSecurity,
    #[serde(default)]
    pub passphrase: Option<String>,
    #[serde(default)]
    pub range_m: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkSpec {
    pub a: String,
    pub a_if: String,
    pub b: String,
    pub b_if: String,
    #[serde(default)]
    pub cable: CableType,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepSpec {
    /// 在设备的持久会话里依次执行命令
    Cli { device: String, commands: Vec<String> },
    /// 推进虚拟时钟
    Advance { ms: u64 },
    Power { device: String, on: bool },
    Connect {
        a: String,
        a_if: String,
        b: String,
        b_if: String,
        #[serde(default)]
        cable: CableType,
    },
    Disconnect { device: String, interface: String },
}

//! 网络拓扑模块
//!
//! 此模块包含拓扑图的核心组件：设备、端口、链路、电源传播以及地址/接口名工具。

// 子模块声明
mod device;
mod error;
mod hash;
mod id;
pub mod ifname;
pub mod ipv4;
mod network;
mod port;

// 重新导出公共接口
pub use device::{Device, DeviceKind, Position};
pub use error::TopologyError;
pub use hash::{derive_mac, hash_str, mix64};
pub use id::{DeviceId, PortId};
pub use network::{LinkStates, Network};
pub use port::{CableType, Link, Port, PortMedium};

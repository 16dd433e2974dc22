//! 设备控制面模块
//!
//! 此模块包含各类设备的控制面状态：路由器、交换机、PC、无线接入点，
//! 以及它们共用的 MAC 表、ARP 缓存、VLAN 列表和二层端口配置。

// 子模块声明
pub mod access_point;
pub mod arp;
pub mod mac_table;
pub mod pc;
pub mod router;
pub mod service;
pub mod switch;
pub mod switchport;
pub mod vlan_list;

// 重新导出公共接口
pub use access_point::{AccessPoint, WifiBand, WifiSecurity, WirelessSettings};
pub use arp::{ArpEntry, ArpTable};
pub use mac_table::{MacEntry, MacTable};
pub use pc::{Association, Pc, WifiAdapter};
pub use router::Router;
pub use service::Service;
pub use switch::Switch;
pub use switchport::{L2Config, SwitchportMode};
pub use vlan_list::VlanSet;

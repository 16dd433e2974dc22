//! 转发模拟模块
//!
//! 不逐包排队，而是沿拓扑同步走一遍：二层在交换机之间泛洪/单播，
//! 三层在路由器之间逐跳查表，途中执行 ACL、NAT 与 ARP 学习。

// 子模块声明
mod error;
mod host;
mod l2;
mod l3;
mod packet;
pub mod wireless;

// 重新导出公共接口
pub use error::DropReason;
pub use host::{DhcpError, deliver, dhcp_release, dhcp_renew, find_destination, nic_port, ping, telnet};
pub use l2::{Visited, access_vlan, reach_device, reach_from_remote};
pub use l3::{MAX_HOPS, route_from_router, router_owning};
pub use packet::{BROADCAST_MAC, Flow, Frame, Protocol};
pub use wireless::{ApVisibility, ScanEntry, WifiError};

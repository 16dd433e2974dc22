//! 仿真流
//!
//! 不携带真实字节，只有路由、ACL、NAT 判定需要的字段。

use std::fmt;
use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Icmp,
    Tcp,
    Udp,
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Protocol::Icmp => "icmp",
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
        })
    }
}

/// 一条三层流；ICMP 的端口为 0。NAT 改写后 `src`/`src_port` 随之变化。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flow {
    pub protocol: Protocol,
    pub src: Ipv4Addr,
    pub src_port: u16,
    pub dst: Ipv4Addr,
    pub dst_port: u16,
}

impl Flow {
    pub fn icmp(src: Ipv4Addr, dst: Ipv4Addr) -> Self {
        Self {
            protocol: Protocol::Icmp,
            src,
            src_port: 0,
            dst,
            dst_port: 0,
        }
    }

    pub fn tcp(src: Ipv4Addr, src_port: u16, dst: Ipv4Addr, dst_port: u16) -> Self {
        Self {
            protocol: Protocol::Tcp,
            src,
            src_port,
            dst,
            dst_port,
        }
    }
}

/// 二层帧：源/目的 MAC 和最终要到达的设备
#[derive(Debug, Clone)]
pub struct Frame {
    pub src_mac: String,
    pub dst_mac: String,
    pub destination: crate::net::DeviceId,
}

/// 广播地址，从不会被学习，查表必然未命中而泛洪。
pub const BROADCAST_MAC: &str = "FFFF.FFFF.FFFF";

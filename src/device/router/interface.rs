//! 路由器接口
//!
//! 三层接口与 802.1Q 子接口。

use std::net::Ipv4Addr;

use crate::net::{ifname, ipv4};

/// NAT 方向；同一接口 inside/outside 互斥。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NatSide {
    #[default]
    None,
    Inside,
    Outside,
}

/// 接口地址
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IfAddr {
    pub ip: Ipv4Addr,
    pub mask: Ipv4Addr,
}

impl IfAddr {
    pub fn network(&self) -> Ipv4Addr {
        ipv4::network_of(self.ip, self.mask)
    }

    pub fn contains(&self, ip: Ipv4Addr) -> bool {
        ipv4::same_subnet(self.ip, ip, self.mask)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interface {
    /// 规范名，如 `GigabitEthernet0/0.10`
    pub name: String,
    pub addr: Option<IfAddr>,
    pub admin_up: bool,
    pub protocol_up: bool,
    /// 子接口的父接口名
    pub parent: Option<String>,
    pub dot1q: Option<u16>,
    pub description: Option<String>,
    pub acl_in: Option<String>,
    pub acl_out: Option<String>,
    pub nat: NatSide,
}

impl Interface {
    /// 新建接口（管理性关闭，未分配地址）；子接口名会自动识别父接口。
    pub fn new(name: &str) -> Self {
        let name = ifname::normalize(name);
        let parent = ifname::split_subinterface(&name).map(|(p, _)| p.to_string());
        Self {
            name,
            addr: None,
            admin_up: false,
            protocol_up: false,
            parent,
            dot1q: None,
            description: None,
            acl_in: None,
            acl_out: None,
            nat: NatSide::None,
        }
    }

    pub fn is_subinterface(&self) -> bool {
        self.parent.is_some()
    }

    /// 承载链路的物理接口名
    pub fn physical_name(&self) -> &str {
        self.parent.as_deref().unwrap_or(&self.name)
    }

    /// 子接口未配 `encapsulation` 时按子接口号打标签。
    pub fn vlan_tag(&self) -> Option<u16> {
        if !self.is_subinterface() {
            return None;
        }
        self.dot1q
            .or_else(|| ifname::split_subinterface(&self.name).map(|(_, sub)| sub))
    }

    /// 用于路由的地址：接口 up 且已配置地址
    pub fn usable_addr(&self) -> Option<IfAddr> {
        if self.protocol_up { self.addr } else { None }
    }

    pub fn ip_text(&self) -> String {
        self.addr
            .map(|a| a.ip.to_string())
            .unwrap_or_else(|| "unassigned".to_string())
    }

    /// 伪 MAC：`R:<设备>:<接口>`
    pub fn pseudo_mac(&self, device: &str) -> String {
        format!("R:{device}:{}", self.name)
    }
}

//! PC 主机状态
//!
//! 地址配置、ARP 缓存、监听服务与可选的无线网卡。

use std::collections::HashMap;
use std::net::Ipv4Addr;

use super::arp::ArpTable;
use super::service::Service;
use crate::net::{DeviceId, PortId};

/// 与接入点的关联
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Association {
    pub ap: DeviceId,
    /// 接入点上为本客户端生成的 `Wlan0/nn` 口
    pub ap_port: PortId,
}

/// 无线网卡
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiAdapter {
    pub supports_2_4: bool,
    pub supports_5: bool,
    pub auto_join: bool,
    /// 为空表示任意 SSID
    pub desired_ssid: String,
    pub stored_key: String,
    pub associated: Option<Association>,
}

impl Default for WifiAdapter {
    fn default() -> Self {
        Self {
            supports_2_4: true,
            supports_5: true,
            auto_join: true,
            desired_ssid: "AP".to_string(),
            stored_key: String::new(),
            associated: None,
        }
    }
}

const FIRST_SOURCE_PORT: u16 = 1024;

#[derive(Debug, Clone)]
pub struct Pc {
    pub ip: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub gateway: Ipv4Addr,
    pub dns: Ipv4Addr,
    /// 地址由 DHCP 获得
    pub dhcp: bool,
    /// 大写 MAC
    pub mac: String,
    pub arp: ArpTable,
    pub services: Vec<Service>,
    pub wifi: Option<WifiAdapter>,
    source_ports: HashMap<(Ipv4Addr, u16), u16>,
    next_source_port: u16,
}

impl Pc {
    pub fn new(mac: impl Into<String>) -> Self {
        Self {
            ip: Ipv4Addr::UNSPECIFIED,
            mask: Ipv4Addr::new(255, 255, 255, 0),
            gateway: Ipv4Addr::UNSPECIFIED,
            dns: Ipv4Addr::UNSPECIFIED,
            dhcp: false,
            mac: mac.into(),
            arp: ArpTable::default(),
            services: vec![Service::telnet("Welcome to the PC telnet service.")],
            wifi: None,
            source_ports: HashMap::new(),
            next_source_port: FIRST_SOURCE_PORT,
        }
    }

    pub fn has_address(&self) -> bool {
        !self.ip.is_unspecified()
    }

    /// 同一 (目的地址, 目的端口) 始终使用同一个源端口，NAT 转换因此可以复用。
    pub fn source_port(&mut self, dst: Ipv4Addr, dst_port: u16) -> u16 {
        if let Some(p) = self.source_ports.get(&(dst, dst_port)) {
            return *p;
        }
        let port = self.next_source_port;
        self.next_source_port = match self.next_source_port.checked_add(1) {
            Some(next) => next,
            None => FIRST_SOURCE_PORT,
        };
        self.source_ports.insert((dst, dst_port), port);
        port
    }

    /// `ipconfig /release`
    pub fn release(&mut self) {
        self.dhcp = false;
        self.ip = Ipv4Addr::UNSPECIFIED;
        self.mask = Ipv4Addr::UNSPECIFIED;
        self.gateway = Ipv4Addr::UNSPECIFIED;
        self.dns = Ipv4Addr::UNSPECIFIED;
    }
}

//! 源地址转换（PAT / overload）
//!
//! 每台路由器一条 `ip nat inside source list N interface IF overload` 规则，
//! 转换表按 (协议, inside local, outside global) 复用。

use std::fmt;
use std::net::Ipv4Addr;

use super::Router;
use super::acl::standard_acl_permits;
use super::interface::NatSide;
use crate::forward::Protocol;
use crate::net::ifname;
use tracing::debug;

const PAT_PORT_MIN: u16 = 10000;
const PAT_PORT_MAX: u16 = 60000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NatRule {
    pub acl_number: u32,
    pub outside_interface: String,
    pub overload: bool,
}

/// `ip` 或 `ip:port`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NatEndpoint {
    pub ip: Ipv4Addr,
    pub port: u16,
}

impl NatEndpoint {
    pub fn new(ip: Ipv4Addr, port: u16) -> Self {
        Self { ip, port }
    }
}

impl fmt::Display for NatEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.port > 0 {
            write!(f, "{}:{}", self.ip, self.port)
        } else {
            write!(f, "{}", self.ip)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NatTranslation {
    pub protocol: Protocol,
    pub inside_local: NatEndpoint,
    pub inside_global: NatEndpoint,
    pub outside_local: NatEndpoint,
    pub outside_global: NatEndpoint,
}

#[derive(Debug, Clone, Default)]
pub struct NatState {
    pub rule: Option<NatRule>,
    pub translations: Vec<NatTranslation>,
}

impl NatState {
    /// 同协议下第一个未被占用的端口
    fn allocate_port(&self, protocol: Protocol) -> Option<u16> {
        (PAT_PORT_MIN..=PAT_PORT_MAX).find(|p| {
            !self
                .translations
                .iter()
                .any(|t| t.protocol == protocol && t.inside_global.port == *p)
        })
    }

    pub fn clear(&mut self) {
        self.translations.clear();
    }
}

impl Router {
    /// 设置接口 NAT 方向；inside 与 outside 互斥。
    pub fn set_nat_side(&mut self, interface: &str, side: NatSide) -> bool {
        match self.interface_mut(interface) {
            Some(itf) => {
                itf.nat = side;
                true
            }
            None => false,
        }
    }

    pub fn nat_side(&self, interface: &str) -> NatSide {
        self.interface(interface).map(|i| i.nat).unwrap_or_default()
    }

    /// 出方向源 NAT。满足条件时返回（可能复用的）inside global 端点。
    pub fn apply_source_nat(
        &mut self,
        protocol: Protocol,
        ingress: &str,
        egress: &str,
        inside_local: NatEndpoint,
        outside_global: NatEndpoint,
    ) -> Option<NatEndpoint> {
        let rule = self.nat.rule.clone()?;
        if self.nat_side(ingress) != NatSide::Inside || self.nat_side(egress) != NatSide::Outside {
            return None;
        }
        if !standard_acl_permits(&self.standard_acls, rule.acl_number, inside_local.ip) {
            return None;
        }
        let outside_ip = self
            .interface(&ifname::normalize(&rule.outside_interface))?
            .addr?
            .ip;

        if let Some(t) = self.nat.translations.iter().find(|t| {
            t.protocol == protocol
                && t.inside_local == inside_local
                && t.outside_global == outside_global
        }) {
            return Some(t.inside_global);
        }

        let port = if inside_local.port > 0 {
            self.nat.allocate_port(protocol)?
        } else {
            0
        };
        let inside_global = NatEndpoint::new(outside_ip, port);
        debug!(%protocol, %inside_local, %inside_global, %outside_global, "🔁 新建 NAT 转换");
        self.nat.translations.push(NatTranslation {
            protocol,
            inside_local,
            inside_global,
            outside_local: outside_global,
            outside_global,
        });
        Some(inside_global)
    }
}

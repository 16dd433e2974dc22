//! 路由表
//!
//! 直连路由 + 静态路由；直连优先，静态按最长前缀匹配。

use std::net::Ipv4Addr;

use super::Router;
use super::interface::Interface;
use crate::net::{ifname, ipv4};

/// 静态路由：下一跳与出接口至少有一个。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticRoute {
    pub network: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub next_hop: Option<Ipv4Addr>,
    pub exit_interface: Option<String>,
}

impl StaticRoute {
    pub fn matches(&self, dst: Ipv4Addr) -> bool {
        ipv4::same_subnet(dst, self.network, self.mask)
    }

    pub fn prefix_len(&self) -> u32 {
        ipv4::mask_to_prefix(self.mask)
            .map(u32::from)
            .unwrap_or_else(|| ipv4::count_mask_bits(self.mask))
    }

    pub fn is_default(&self) -> bool {
        u32::from(self.mask) == 0
    }
}

/// 路由查找结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteDecision {
    pub egress: String,
    pub next_hop: Ipv4Addr,
}

/// 路由表中的一行（用于 `show ip route`）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteEntry {
    Connected { network: Ipv4Addr, prefix: u8, interface: String },
    Local { ip: Ipv4Addr, interface: String },
    Static(StaticRoute),
}

impl Router {
    /// 覆盖目的地址、前缀最长的 up 接口
    pub fn best_connected_interface(&self, dst: Ipv4Addr) -> Option<&Interface> {
        let mut best: Option<(&Interface, u32)> = None;
        for itf in &self.interfaces {
            let Some(addr) = itf.usable_addr() else {
                continue;
            };
            if !addr.contains(dst) {
                continue;
            }
            let bits = ipv4::count_mask_bits(addr.mask);
            if best.is_none_or(|(_, b)| bits > b) {
                best = Some((itf, bits));
            }
        }
        best.map(|(itf, _)| itf)
    }

    /// 添加静态路由；完全相同的路由视为成功。
    pub fn add_static_route(
        &mut self,
        network: Ipv4Addr,
        mask: Ipv4Addr,
        next_hop: Option<Ipv4Addr>,
        exit_interface: Option<&str>,
    ) -> bool {
        if next_hop.is_none() && exit_interface.is_none() {
            return false;
        }
        let route = StaticRoute {
            network,
            mask,
            next_hop,
            exit_interface: exit_interface.map(ifname::normalize),
        };
        if !self.static_routes.iter().any(|r| r.same_key(&route)) {
            self.static_routes.push(route);
        }
        true
    }

    /// 删除与四元组完全一致的静态路由
    pub fn remove_static_route(
        &mut self,
        network: Ipv4Addr,
        mask: Ipv4Addr,
        next_hop: Option<Ipv4Addr>,
        exit_interface: Option<&str>,
    ) -> bool {
        let key = StaticRoute {
            network,
            mask,
            next_hop,
            exit_interface: exit_interface.map(ifname::normalize),
        };
        match self.static_routes.iter().rposition(|r| r.same_key(&key)) {
            Some(i) => {
                self.static_routes.remove(i);
                true
            }
            None => false,
        }
    }

    /// 路由查找：直连优先；否则取最长前缀的静态路由。
    pub fn try_route(&self, dst: Ipv4Addr) -> Option<RouteDecision> {
        if let Some(itf) = self.best_connected_interface(dst) {
            return Some(RouteDecision {
                egress: itf.name.clone(),
                next_hop: dst,
            });
        }

        let mut best: Option<&StaticRoute> = None;
        for r in self.static_routes.iter().filter(|r| r.matches(dst)) {
            if best.is_none_or(|b| r.prefix_len() > b.prefix_len()) {
                best = Some(r);
            }
        }
        let route = best?;

        if let Some(exit) = &route.exit_interface {
            let itf = self.interface(exit)?;
            if !itf.protocol_up {
                return None;
            }
            return Some(RouteDecision {
                egress: itf.name.clone(),
                next_hop: route.next_hop.unwrap_or(dst),
            });
        }

        let nh = route.next_hop?;
        let out = self.best_connected_interface(nh)?;
        Some(RouteDecision {
            egress: out.name.clone(),
            next_hop: nh,
        })
    }

    /// 默认路由的下一跳（`Gateway of last resort`）
    pub fn gateway_of_last_resort(&self) -> Option<String> {
        self.static_routes.iter().find(|r| r.is_default()).map(|r| {
            r.next_hop
                .map(|nh| nh.to_string())
                .or_else(|| r.exit_interface.clone())
                .unwrap_or_default()
        })
    }

    /// 当前路由表（直连、本地、静态）
    pub fn route_entries(&self) -> Vec<RouteEntry> {
        let mut out = Vec::new();
        for itf in &self.interfaces {
            let Some(addr) = itf.usable_addr() else {
                continue;
            };
            let Some(prefix) = ipv4::mask_to_prefix(addr.mask) else {
                continue;
            };
            out.push(RouteEntry::Connected {
                network: addr.network(),
                prefix,
                interface: itf.name.clone(),
            });
            out.push(RouteEntry::Local {
                ip: addr.ip,
                interface: itf.name.clone(),
            });
        }
        out.extend(self.static_routes.iter().cloned().map(RouteEntry::Static));
        out
    }
}

impl StaticRoute {
    fn same_key(&self, other: &StaticRoute) -> bool {
        let exit_eq = match (&self.exit_interface, &other.exit_interface) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            (None, None) => true,
            _ => false,
        };
        self.network == other.network
            && self.mask == other.mask
            && self.next_hop == other.next_hop
            && exit_eq
    }
}

//! DHCP 服务
//!
//! 地址池、租约分配与 offer。

use std::net::Ipv4Addr;

use super::Router;
use crate::sim::SimTime;
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhcpLease {
    /// 大写 MAC
    pub mac: String,
    pub ip: Ipv4Addr,
    pub pool: String,
    pub issued_at: SimTime,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhcpPool {
    pub name: String,
    pub network: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub default_router: Ipv4Addr,
    pub dns_server: Ipv4Addr,
    /// 主机号范围（含两端）
    pub start_host: u8,
    pub end_host: u8,
    pub leases: Vec<DhcpLease>,
}

impl DhcpPool {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            network: Ipv4Addr::UNSPECIFIED,
            mask: Ipv4Addr::new(255, 255, 255, 0),
            default_router: Ipv4Addr::UNSPECIFIED,
            dns_server: Ipv4Addr::UNSPECIFIED,
            start_host: 10,
            end_host: 200,
            leases: Vec::new(),
        }
    }

    fn lease_for(&self, mac: &str) -> Option<&DhcpLease> {
        self.leases.iter().find(|l| l.mac == mac)
    }

    /// 在范围内找第一个空闲地址；跳过主机号 0 与 255 以及排除区间。
    fn next_free(&self, excluded: &[(Ipv4Addr, Ipv4Addr)]) -> Option<Ipv4Addr> {
        let base = u32::from(self.network) & u32::from(self.mask);
        (self.start_host..=self.end_host)
            .filter(|h| *h != 0 && *h != 255)
            .map(|h| Ipv4Addr::from(base | u32::from(h)))
            .filter(|ip| !excluded.iter().any(|(lo, hi)| lo <= ip && ip <= hi))
            .find(|ip| !self.leases.iter().any(|l| l.ip == *ip))
    }
}

/// 发给客户端的配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DhcpOffer {
    pub ip: Ipv4Addr,
    pub mask: Ipv4Addr,
    pub gateway: Ipv4Addr,
    pub dns: Ipv4Addr,
    pub pool: String,
}

#[derive(Debug, Clone, Default)]
pub struct DhcpServer {
    pub pools: Vec<DhcpPool>,
    /// `ip dhcp excluded-address lo [hi]`
    pub excluded: Vec<(Ipv4Addr, Ipv4Addr)>,
}

impl DhcpServer {
    pub fn pool(&self, name: &str) -> Option<&DhcpPool> {
        self.pools.iter().find(|p| p.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn pool_mut(&mut self, name: &str) -> Option<&mut DhcpPool> {
        self.pools
            .iter_mut()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
    }

    /// 取得或新建地址池，返回其下标
    pub fn ensure_pool(&mut self, name: &str) -> usize {
        if let Some(i) = self
            .pools
            .iter()
            .position(|p| p.name.eq_ignore_ascii_case(name.trim()))
        {
            return i;
        }
        self.pools.push(DhcpPool::new(name));
        self.pools.len() - 1
    }

    pub fn remove_pool(&mut self, name: &str) -> bool {
        let before = self.pools.len();
        self.pools.retain(|p| !p.name.eq_ignore_ascii_case(name.trim()));
        self.pools.len() != before
    }

    /// 按池顺序分配：已有租约直接复用；池满则尝试下一个池。
    pub fn request(&mut self, mac: &str, now: SimTime) -> Option<DhcpOffer> {
        let mac = mac.trim().to_ascii_uppercase();
        if mac.is_empty() {
            return None;
        }
        let excluded = self.excluded.clone();
        for pool in &mut self.pools {
            if let Some(l) = pool.lease_for(&mac) {
                return Some(offer_from(pool, l.ip));
            }
            let Some(ip) = pool.next_free(&excluded) else {
                continue;
            };
            debug!(pool = %pool.name, %mac, %ip, "📝 分配 DHCP 租约");
            pool.leases.push(DhcpLease {
                mac: mac.clone(),
                ip,
                pool: pool.name.clone(),
                issued_at: now,
            });
            return Some(offer_from(pool, ip));
        }
        None
    }

    pub fn leases(&self) -> impl Iterator<Item = &DhcpLease> {
        self.pools.iter().flat_map(|p| p.leases.iter())
    }
}

fn offer_from(pool: &DhcpPool, ip: Ipv4Addr) -> DhcpOffer {
    DhcpOffer {
        ip,
        mask: pool.mask,
        gateway: pool.default_router,
        dns: pool.dns_server,
        pool: pool.name.clone(),
    }
}

impl Router {
    pub fn dhcp_request(&mut self, mac: &str, now: SimTime) -> Option<DhcpOffer> {
        self.dhcp.request(mac, now)
    }
}

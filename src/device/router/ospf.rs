//! OSPF 配置记录
//!
//! 只保存进程、network 语句与被动接口，不交换报文；邻居由拓扑直接推出。

use std::net::Ipv4Addr;

use super::Router;
use super::interface::Interface;
use crate::net::ifname;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OspfNetwork {
    pub network: Ipv4Addr,
    pub wildcard: Ipv4Addr,
    pub area: u32,
}

impl OspfNetwork {
    /// 通配符为 0 的位必须一致
    pub fn covers(&self, ip: Ipv4Addr) -> bool {
        let care = !u32::from(self.wildcard);
        u32::from(ip) & care == u32::from(self.network) & care
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OspfProcess {
    pub pid: u32,
    pub router_id: Option<Ipv4Addr>,
    pub networks: Vec<OspfNetwork>,
    /// 规范化接口名
    pub passive: Vec<String>,
}

impl OspfProcess {
    pub fn new(pid: u32) -> Self {
        Self {
            pid,
            router_id: None,
            networks: Vec::new(),
            passive: Vec::new(),
        }
    }

    pub fn is_passive(&self, interface: &str) -> bool {
        let norm = ifname::normalize(interface);
        self.passive.iter().any(|p| p.eq_ignore_ascii_case(&norm))
    }

    /// 被某条 network 语句覆盖的接口
    pub fn covers_interface(&self, itf: &Interface) -> bool {
        itf.addr
            .is_some_and(|a| self.networks.iter().any(|n| n.covers(a.ip)))
    }
}

impl Router {
    pub fn ospf_process(&self, pid: u32) -> Option<&OspfProcess> {
        self.ospf.iter().find(|p| p.pid == pid)
    }

    pub fn ospf_ensure_process(&mut self, pid: u32) -> &mut OspfProcess {
        // 按 pid 有序
        let at = self.ospf.partition_point(|p| p.pid < pid);
        if self.ospf.get(at).is_none_or(|p| p.pid != pid) {
            self.ospf.insert(at, OspfProcess::new(pid));
        }
        &mut self.ospf[at]
    }

    pub fn ospf_remove_process(&mut self, pid: u32) -> bool {
        let before = self.ospf.len();
        self.ospf.retain(|p| p.pid != pid);
        self.ospf.len() != before
    }

    /// 重复的 network 语句视为成功
    pub fn ospf_add_network(&mut self, pid: u32, network: Ipv4Addr, wildcard: Ipv4Addr, area: u32) -> bool {
        let Some(p) = self.ospf.iter_mut().find(|p| p.pid == pid) else {
            return false;
        };
        let entry = OspfNetwork { network, wildcard, area };
        if !p.networks.contains(&entry) {
            p.networks.push(entry);
        }
        true
    }

    pub fn ospf_set_passive(&mut self, pid: u32, interface: &str, passive: bool) -> bool {
        let Some(p) = self.ospf.iter_mut().find(|p| p.pid == pid) else {
            return false;
        };
        let norm = ifname::normalize(interface);
        p.passive.retain(|n| !n.eq_ignore_ascii_case(&norm));
        if passive {
            p.passive.push(norm);
        }
        true
    }

    /// 实际生效的 Router ID：手工配置优先，否则取 up 接口中最大的地址。
    pub fn ospf_router_id(&self, pid: u32) -> Option<Ipv4Addr> {
        let p = self.ospf_process(pid)?;
        p.router_id.or_else(|| {
            self.interfaces
                .iter()
                .filter_map(|i| i.usable_addr())
                .map(|a| a.ip)
                .max()
        })
    }

    /// 参与 OSPF 且非被动的 up 接口 `(pid, 接口名)`
    pub fn ospf_active_interfaces(&self) -> Vec<(u32, String)> {
        let mut out = Vec::new();
        for p in &self.ospf {
            for itf in &self.interfaces {
                if itf.protocol_up && p.covers_interface(itf) && !p.is_passive(&itf.name) {
                    out.push((p.pid, itf.name.clone()));
                }
            }
        }
        out
    }
}

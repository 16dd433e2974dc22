//! 内嵌交换口（HWIC-4ESW）
//!
//! 交换口既是三层接口表中的一项（承载 shutdown），又有独立的二层配置与 MAC 表。

use super::Router;
use crate::device::switchport::L2Config;
use crate::net::ifname;
use crate::sim::SimTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouterSwitchPort {
    pub name: String,
    pub config: L2Config,
}

impl Router {
    pub fn switchport(&self, name: &str) -> Option<&RouterSwitchPort> {
        let norm = ifname::normalize(name);
        self.switchports
            .iter()
            .find(|s| s.name.eq_ignore_ascii_case(&norm))
    }

    pub fn switchport_mut(&mut self, name: &str) -> Option<&mut RouterSwitchPort> {
        let norm = ifname::normalize(name);
        self.switchports
            .iter_mut()
            .find(|s| s.name.eq_ignore_ascii_case(&norm))
    }

    pub fn is_switchport_capable(&self, name: &str) -> bool {
        self.switchport(name).is_some()
    }

    pub fn ensure_switchport(&mut self, name: &str) -> &mut RouterSwitchPort {
        let norm = ifname::normalize(name);
        let idx = match self
            .switchports
            .iter()
            .position(|s| s.name.eq_ignore_ascii_case(&norm))
        {
            Some(i) => i,
            None => {
                self.switchports.push(RouterSwitchPort {
                    name: norm,
                    config: L2Config::default(),
                });
                self.switchports.len() - 1
            }
        };
        &mut self.switchports[idx]
    }

    /// 删除交换口及其学到的 MAC
    pub fn remove_switchport(&mut self, name: &str) {
        let norm = ifname::normalize(name);
        self.switchports
            .retain(|s| !s.name.eq_ignore_ascii_case(&norm));
        self.mac_table.remove_interface(&norm);
    }

    /// 非交换口按 VLAN 1 处理
    pub fn ingress_vlan(&self, name: &str) -> u16 {
        self.switchport(name)
            .map(|s| s.config.ingress_vlan())
            .unwrap_or(1)
    }

    pub fn switchport_allows(&self, name: &str, vlan: u16) -> bool {
        self.switchport(name).is_some_and(|s| s.config.allows(vlan))
    }

    pub fn learn_mac(&mut self, mac: &str, vlan: u16, interface: &str, now: SimTime) {
        self.mac_table
            .learn(mac, vlan, &ifname::normalize(interface), now);
    }

    /// 老化时间下限 5 秒
    pub fn purge_macs(&mut self, now: SimTime) {
        let age = SimTime::from_secs(self.mac_aging_secs.max(5));
        self.mac_table.purge(now, Some(age));
    }
}

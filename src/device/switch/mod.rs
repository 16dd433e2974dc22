//! 交换机控制面
//!
//! 端口、VLAN 数据库、MAC 表、Port-channel 与 STP 优先级。成组判断需要对端信息，
//! 由 `stp` 模块在每次刷新时写回 `PortChannel::formed`。

// 子模块声明
mod port;

// 重新导出公共接口
pub use port::{ChannelMode, PortChannel, StpRole, StpState, SwitchPort, Vlan};

use std::collections::BTreeMap;

use super::mac_table::MacTable;
use super::switchport::L2Config;
use crate::net::{LinkStates, hash_str, ifname, mix64};
use crate::sim::SimTime;

pub const DEFAULT_STP_PRIORITY: u32 = 32768;

#[derive(Debug, Clone)]
pub struct Switch {
    pub ports: Vec<SwitchPort>,
    pub vlans: BTreeMap<u16, Vlan>,
    pub mac_table: MacTable,
    /// `<= 0` 关闭老化
    pub mac_aging_secs: i64,
    pub stp_priority: u32,
    pub is_root: bool,
    /// 当前根桥 (priority, MAC)
    pub root_bridge: Option<(u32, String)>,
    pub port_channels: Vec<PortChannel>,
}

impl Default for Switch {
    fn default() -> Self {
        Self::new()
    }
}

impl Switch {
    pub fn new() -> Self {
        let mut vlans = BTreeMap::new();
        vlans.insert(
            1,
            Vlan {
                id: 1,
                name: "default".to_string(),
                active: true,
            },
        );
        Self {
            ports: Vec::new(),
            vlans,
            mac_table: MacTable::default(),
            mac_aging_secs: 30,
            stp_priority: DEFAULT_STP_PRIORITY,
            is_root: false,
            root_bridge: None,
            port_channels: Vec::new(),
        }
    }

    pub fn add_port(&mut self, name: &str) {
        if self.port(name).is_none() {
            self.ports.push(SwitchPort::new(name));
        }
    }

    pub fn remove_port(&mut self, name: &str) {
        let norm = ifname::normalize(name);
        self.ports.retain(|p| !p.name.eq_ignore_ascii_case(&norm));
        self.mac_table.remove_interface(&norm);
    }

    pub fn port(&self, name: &str) -> Option<&SwitchPort> {
        let norm = ifname::normalize(name);
        self.ports.iter().find(|p| p.name.eq_ignore_ascii_case(&norm))
    }

    pub fn port_mut(&mut self, name: &str) -> Option<&mut SwitchPort> {
        let norm = ifname::normalize(name);
        self.ports
            .iter_mut()
            .find(|p| p.name.eq_ignore_ascii_case(&norm))
    }

    /// 协议状态 = 上电 && 管理 up && 有链路；down 的口 STP 置为 Disabled。
    pub fn refresh_port_states(&mut self, powered: bool, links: &LinkStates) {
        for p in &mut self.ports {
            p.protocol_up = powered && p.admin_up && links.is_up(&p.name);
            if !p.protocol_up {
                p.set_stp(StpState::Disabled, StpRole::Disabled);
            }
        }
    }

    pub fn port_channel(&self, id: u32) -> Option<&PortChannel> {
        self.port_channels.iter().find(|pc| pc.id == id)
    }

    pub fn port_channel_mut(&mut self, id: u32) -> Option<&mut PortChannel> {
        self.port_channels.iter_mut().find(|pc| pc.id == id)
    }

    pub fn ensure_port_channel(&mut self, id: u32) -> &mut PortChannel {
        let id = id.max(1);
        let idx = match self.port_channels.iter().position(|pc| pc.id == id) {
            Some(i) => i,
            None => {
                self.port_channels.push(PortChannel::new(id));
                self.port_channels.len() - 1
            }
        };
        &mut self.port_channels[idx]
    }

    /// 所有配置了成员口的组号（升序去重）
    pub fn channel_groups(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.ports.iter().filter_map(SwitchPort::channel).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    /// 组成员，按接口名排序
    pub fn channel_members(&self, group: u32) -> Vec<&SwitchPort> {
        let mut members: Vec<&SwitchPort> = self
            .ports
            .iter()
            .filter(|p| p.channel() == Some(group))
            .collect();
        members.sort_by_key(|p| p.name.to_ascii_lowercase());
        members
    }

    pub fn channel_member_names(&self, group: u32) -> Vec<String> {
        self.channel_members(group)
            .into_iter()
            .map(|p| p.name.clone())
            .collect()
    }

    pub fn is_channel_formed(&self, group: u32) -> bool {
        self.port_channel(group).is_some_and(|pc| pc.formed)
    }

    /// 物理口所在的已成组 channel
    pub fn formed_channel_of(&self, name: &str) -> Option<u32> {
        let gid = self.port(name)?.channel()?;
        self.is_channel_formed(gid).then_some(gid)
    }

    /// 成组后由排序最靠前的成员代表整个 channel
    pub fn is_channel_representative(&self, name: &str) -> bool {
        let Some(gid) = self.formed_channel_of(name) else {
            return false;
        };
        self.channel_members(gid)
            .first()
            .is_some_and(|m| ifname::same_interface(&m.name, name))
    }

    /// STP 使用的逻辑接口；非代表成员返回 `None`。
    pub fn logical_interface(&self, name: &str) -> Option<String> {
        match self.formed_channel_of(name) {
            Some(gid) if self.is_channel_representative(name) => {
                Some(ifname::port_channel_name(gid))
            }
            Some(_) => None,
            None => Some(ifname::normalize(name)),
        }
    }

    /// 生效的二层配置：成组成员继承 Port-channel，否则用端口自己的。
    pub fn effective_l2(&self, name: &str) -> Option<&L2Config> {
        if let Some(id) = ifname::port_channel_id(name) {
            return self.port_channel(id).map(|pc| &pc.l2);
        }
        if let Some(gid) = self.formed_channel_of(name) {
            if let Some(pc) = self.port_channel(gid) {
                return Some(&pc.l2);
            }
        }
        self.port(name).map(|p| &p.l2)
    }

    pub fn ingress_vlan(&self, name: &str) -> u16 {
        self.effective_l2(name).map(L2Config::ingress_vlan).unwrap_or(1)
    }

    pub fn vlan_allowed(&self, name: &str, vlan: u16) -> bool {
        self.effective_l2(name).is_some_and(|c| c.allows(vlan))
    }

    /// 出口解析：Port-channel 或成组成员按 (srcMac, dstMac) 哈希选一个可用成员。
    pub fn resolve_egress(&self, requested: &str, src_mac: &str, dst_mac: &str) -> Option<String> {
        if let Some(id) = ifname::port_channel_id(requested) {
            return self.choose_active_member(id, src_mac, dst_mac);
        }
        if let Some(gid) = self.formed_channel_of(requested) {
            return self.choose_active_member(gid, src_mac, dst_mac);
        }
        Some(ifname::normalize(requested))
    }

    fn choose_active_member(&self, group: u32, src_mac: &str, dst_mac: &str) -> Option<String> {
        let up: Vec<&SwitchPort> = self
            .channel_members(group)
            .into_iter()
            .filter(|m| m.protocol_up && !m.channel_suspended && m.stp_state != StpState::Blocking)
            .collect();
        match up.len() {
            0 => None,
            1 => Some(up[0].name.clone()),
            n => {
                let h = mix64(hash_str(src_mac) ^ (hash_str(dst_mac) << 1));
                Some(up[(h % n as u64) as usize].name.clone())
            }
        }
    }

    /// 成组 channel 的 STP 状态下发给成员；down 的成员保持 Disabled。
    pub fn apply_channel_stp_to_members(&mut self) {
        for gid in self.channel_groups() {
            let Some(pc) = self.port_channel(gid).filter(|pc| pc.formed) else {
                continue;
            };
            let (state, role) = (pc.stp_state, pc.stp_role);
            for p in self.ports.iter_mut().filter(|p| p.channel() == Some(gid)) {
                if p.protocol_up {
                    p.set_stp(state, role);
                } else {
                    p.set_stp(StpState::Disabled, StpRole::Disabled);
                }
            }
        }
    }

    pub fn ensure_vlan(&mut self, id: u16) -> &mut Vlan {
        self.vlans.entry(id).or_insert_with(|| Vlan {
            id,
            name: format!("VLAN{id}"),
            active: true,
        })
    }

    /// VLAN 1 不可删除
    pub fn remove_vlan(&mut self, id: u16) -> bool {
        id != 1 && self.vlans.remove(&id).is_some()
    }

    pub fn learn_mac(&mut self, mac: &str, vlan: u16, interface: &str, now: SimTime) {
        self.mac_table
            .learn(mac, vlan, &ifname::normalize(interface), now);
    }

    pub fn lookup_mac(&self, mac: &str, vlan: u16) -> Option<&str> {
        self.mac_table.lookup(mac, vlan)
    }

    pub fn purge_macs(&mut self, now: SimTime) {
        let age = (self.mac_aging_secs > 0).then(|| SimTime::from_secs(self.mac_aging_secs as u64));
        self.mac_table.purge(now, age);
    }
}

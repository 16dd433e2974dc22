//! EtherChannel 组建
//!
//! 成员口状态需要看链路对端的配置，所以在网络层面统一计算，
//! 再把结果写回各交换机的 `PortChannel::formed` 与成员的 `channel_suspended`。

use std::fmt;

use crate::device::switch::{ChannelMode, SwitchPort};
use crate::net::{DeviceId, Network, ifname};
use tracing::{debug, trace};

/// 成员口标志：`show etherchannel summary` 里的 D / s / P
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberFlag {
    Down,
    Suspended,
    Bundled,
}

impl fmt::Display for MemberFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MemberFlag::Down => "D",
            MemberFlag::Suspended => "s",
            MemberFlag::Bundled => "P",
        })
    }
}

/// 成员口运行状态及原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberState {
    pub flag: MemberFlag,
    pub reason: Option<&'static str>,
}

impl MemberState {
    fn down(reason: &'static str) -> Self {
        Self {
            flag: MemberFlag::Down,
            reason: Some(reason),
        }
    }

    fn suspended(reason: &'static str) -> Self {
        Self {
            flag: MemberFlag::Suspended,
            reason: Some(reason),
        }
    }

    pub fn is_bundled(&self) -> bool {
        self.flag == MemberFlag::Bundled
    }
}

/// 对端信息，缺失字段为 `-`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartnerInfo {
    pub system_id: String,
    pub port: String,
    pub mode: String,
}

impl Default for PartnerInfo {
    fn default() -> Self {
        Self {
            system_id: "-".to_string(),
            port: "-".to_string(),
            mode: "-".to_string(),
        }
    }
}

/// 链路对端的交换口配置
fn partner_of<'a>(
    net: &'a Network,
    dev: DeviceId,
    name: &str,
) -> Result<(DeviceId, &'a SwitchPort), &'static str> {
    let peer = net
        .find_port(dev, name)
        .and_then(|p| net.peer(p))
        .ok_or("No partner connected")?;
    let remote = net.port(peer);
    let sw = net.switch(remote.owner).ok_or("Partner is not a switch")?;
    let cfg = sw
        .port(&remote.interface_name)
        .ok_or("Partner port not found")?;
    Ok((remote.owner, cfg))
}

/// 成员口运行状态：本端 down 记 D，对端不配合记 s，否则 P。
pub fn member_state(net: &Network, dev: DeviceId, group: u32, member: &SwitchPort) -> MemberState {
    if !member.admin_up {
        return MemberState::down("Administratively down");
    }
    if !net.interface_has_link(dev, &member.name) {
        return MemberState::down("Link down");
    }
    let (remote_dev, remote) = match partner_of(net, dev, &member.name) {
        Ok(p) => p,
        Err(reason) => return MemberState::suspended(reason),
    };
    if remote.channel_group != group || remote.channel_mode == ChannelMode::None {
        return MemberState::suspended("Partner not in channel-group");
    }
    if !remote.admin_up {
        return MemberState::suspended("Partner admin down");
    }
    if !net.interface_has_link(remote_dev, &remote.name) {
        return MemberState::suspended("Partner link down");
    }
    if !member.channel_mode.compatible_with(remote.channel_mode) {
        if member.channel_mode == ChannelMode::Passive && remote.channel_mode == ChannelMode::Passive {
            return MemberState::suspended("LACP passive/passive");
        }
        return MemberState::suspended("Mode mismatch");
    }
    MemberState {
        flag: MemberFlag::Bundled,
        reason: None,
    }
}

pub fn partner_info(net: &Network, dev: DeviceId, member: &SwitchPort) -> PartnerInfo {
    let mut info = PartnerInfo::default();
    let Some(peer) = net.find_port(dev, &member.name).and_then(|p| net.peer(p)) else {
        return info;
    };
    let remote = net.port(peer);
    let Some(sw) = net.switch(remote.owner) else {
        return info;
    };
    info.system_id = super::bridge_mac(net, remote.owner);
    info.port = ifname::short(&remote.interface_name);
    if let Some(cfg) = sw.port(&remote.interface_name) {
        info.mode = cfg.channel_mode.to_string();
    }
    info
}

/// 至少一个成员与对端兼容即成组
pub fn channel_formed(net: &Network, dev: DeviceId, group: u32) -> bool {
    let Some(sw) = net.switch(dev) else {
        return false;
    };
    sw.channel_members(group)
        .into_iter()
        .any(|m| member_state(net, dev, group, m).is_bundled())
}

/// 任一成员为 on 时视为静态聚合
pub fn protocol_name(net: &Network, dev: DeviceId, group: u32) -> &'static str {
    let any_on = net.switch(dev).is_some_and(|sw| {
        sw.channel_members(group)
            .iter()
            .any(|m| m.channel_mode == ChannelMode::On)
    });
    if any_on { "NONE(static)" } else { "LACP" }
}

/// 第一个被挂起成员的原因
pub fn suspend_reason(net: &Network, dev: DeviceId, group: u32) -> &'static str {
    net.switch(dev)
        .and_then(|sw| {
            sw.channel_members(group).into_iter().find_map(|m| {
                let st = member_state(net, dev, group, m);
                (st.flag == MemberFlag::Suspended).then_some(st.reason).flatten()
            })
        })
        .unwrap_or("No compatible partner")
}

struct ChannelUpdate {
    group: u32,
    formed: bool,
    up: bool,
}

/// 重新计算所有交换机（含接入点）的 channel 组建情况并写回。
pub fn refresh_etherchannels(net: &mut Network) {
    for dev in net.device_ids() {
        let Some(sw) = net.switch(dev) else {
            continue;
        };
        let updates: Vec<ChannelUpdate> = sw
            .channel_groups()
            .into_iter()
            .map(|group| {
                let formed = channel_formed(net, dev, group);
                let up = formed
                    && sw
                        .channel_members(group)
                        .iter()
                        .any(|m| m.admin_up && net.interface_has_link(dev, &m.name));
                ChannelUpdate { group, formed, up }
            })
            .collect();

        let Some(sw) = net.switch_mut(dev) else {
            continue;
        };
        // 没有成员的 Port-channel 保持未成组
        for pc in &mut sw.port_channels {
            if !updates.iter().any(|u| u.group == pc.id) {
                pc.formed = false;
                pc.protocol_up = false;
            }
        }
        for u in updates {
            let pc = sw.ensure_port_channel(u.group);
            if pc.formed != u.formed {
                debug!(device = ?dev, group = u.group, formed = u.formed, "🔗 EtherChannel 状态变化");
            }
            pc.formed = u.formed;
            pc.protocol_up = u.up;
            for m in sw.ports.iter_mut().filter(|p| p.channel() == Some(u.group)) {
                m.channel_suspended = !u.formed;
            }
        }
    }
    trace!("EtherChannel 刷新完成");
}

//! 交换机端口与 Port-channel

use std::fmt;

use crate::device::switchport::L2Config;
use crate::net::ifname;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StpState {
    #[default]
    Forwarding,
    Blocking,
    Disabled,
}

impl StpState {
    /// `show spanning-tree` 中的缩写
    pub fn short(self) -> &'static str {
        match self {
            StpState::Forwarding => "FWD",
            StpState::Blocking => "BLK",
            StpState::Disabled => "DSB",
        }
    }
}

impl fmt::Display for StpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StpRole {
    Root,
    #[default]
    Designated,
    Alternate,
    Disabled,
}

impl StpRole {
    pub fn short(self) -> &'static str {
        match self {
            StpRole::Root => "Root",
            StpRole::Designated => "Desg",
            StpRole::Alternate => "Altn",
            StpRole::Disabled => "----",
        }
    }
}

impl fmt::Display for StpRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// EtherChannel 协商模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelMode {
    #[default]
    None,
    On,
    Active,
    Passive,
}

impl ChannelMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "on" => Some(ChannelMode::On),
            "active" => Some(ChannelMode::Active),
            "passive" => Some(ChannelMode::Passive),
            _ => None,
        }
    }

    pub fn is_lacp(self) -> bool {
        matches!(self, ChannelMode::Active | ChannelMode::Passive)
    }

    /// on 只和 on 成组；LACP 至少一端 active。
    pub fn compatible_with(self, other: ChannelMode) -> bool {
        if self == ChannelMode::On || other == ChannelMode::On {
            return self == ChannelMode::On && other == ChannelMode::On;
        }
        self.is_lacp() && other.is_lacp() && !(self == ChannelMode::Passive && other == ChannelMode::Passive)
    }
}

impl fmt::Display for ChannelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChannelMode::None => "none",
            ChannelMode::On => "on",
            ChannelMode::Active => "active",
            ChannelMode::Passive => "passive",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwitchPort {
    pub name: String,
    pub admin_up: bool,
    pub protocol_up: bool,
    pub l2: L2Config,
    pub stp_state: StpState,
    pub stp_role: StpRole,
    /// 0 表示不属于任何组
    pub channel_group: u32,
    pub channel_mode: ChannelMode,
    pub channel_suspended: bool,
    pub description: Option<String>,
}

impl SwitchPort {
    pub fn new(name: &str) -> Self {
        Self {
            name: ifname::normalize(name),
            admin_up: true,
            protocol_up: false,
            l2: L2Config::default(),
            stp_state: StpState::Forwarding,
            stp_role: StpRole::Designated,
            channel_group: 0,
            channel_mode: ChannelMode::None,
            channel_suspended: false,
            description: None,
        }
    }

    /// 配置了 channel-group 的成员口
    pub fn channel(&self) -> Option<u32> {
        (self.channel_group > 0 && self.channel_mode != ChannelMode::None).then_some(self.channel_group)
    }

    pub fn set_stp(&mut self, state: StpState, role: StpRole) {
        self.stp_state = state;
        self.stp_role = role;
    }
}

/// 逻辑聚合口，新建时默认 trunk。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortChannel {
    pub id: u32,
    pub l2: L2Config,
    pub stp_state: StpState,
    pub stp_role: StpRole,
    pub protocol_up: bool,
    /// 最近一次刷新时是否成组
    pub formed: bool,
}

impl PortChannel {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            l2: L2Config::trunk(),
            stp_state: StpState::Forwarding,
            stp_role: StpRole::Designated,
            protocol_up: false,
            formed: false,
        }
    }

    pub fn name(&self) -> String {
        ifname::port_channel_name(self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vlan {
    pub id: u16,
    pub name: String,
    pub active: bool,
}

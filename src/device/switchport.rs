//! 二层端口配置
//!
//! 交换机端口、Port-channel 以及路由器内嵌交换口共用的 access/trunk 配置。

use std::fmt;

use super::vlan_list::VlanSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwitchportMode {
    #[default]
    Access,
    Trunk,
}

impl fmt::Display for SwitchportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SwitchportMode::Access => "access",
            SwitchportMode::Trunk => "trunk",
        })
    }
}

/// access VLAN 或 native VLAN + 允许列表
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct L2Config {
    pub mode: SwitchportMode,
    pub access_vlan: u16,
    pub allowed: VlanSet,
    pub native_vlan: u16,
}

impl Default for L2Config {
    fn default() -> Self {
        Self {
            mode: SwitchportMode::Access,
            access_vlan: 1,
            allowed: VlanSet::single(1),
            native_vlan: 1,
        }
    }
}

impl L2Config {
    pub fn trunk() -> Self {
        Self {
            mode: SwitchportMode::Trunk,
            ..Self::default()
        }
    }

    /// 未打标签帧进入时归属的 VLAN
    pub fn ingress_vlan(&self) -> u16 {
        match self.mode {
            SwitchportMode::Access => self.access_vlan,
            SwitchportMode::Trunk if self.native_vlan == 0 => 1,
            SwitchportMode::Trunk => self.native_vlan,
        }
    }

    /// access 口只放行自身 VLAN；trunk 口放行 native 与允许列表。
    pub fn allows(&self, vlan: u16) -> bool {
        match self.mode {
            SwitchportMode::Access => self.access_vlan == vlan,
            SwitchportMode::Trunk => self.native_vlan == vlan || self.allowed.contains(vlan),
        }
    }
}

//! switchport 命令
//!
//! 交换机端口、Port-channel 与路由器内嵌交换口共用的二层配置解析。

use super::error::CliError;
use super::tokens::Args;
use crate::device::switchport::{L2Config, SwitchportMode};
use crate::device::vlan_list::VlanSet;

/// 一条 `switchport …` 命令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchportCommand {
    Mode(SwitchportMode),
    AccessVlan(u16),
    NativeVlan(u16),
    AllowedSet(VlanSet),
    AllowedAdd(VlanSet),
    AllowedRemove(VlanSet),
}

impl SwitchportCommand {
    /// 解析 `switchport` 之后的参数
    pub fn parse(args: Args<'_>) -> Result<Self, CliError> {
        let kw = args.req(0)?.to_ascii_lowercase();
        match kw.as_str() {
            "mode" => match args.req(1)?.to_ascii_lowercase().as_str() {
                "access" => Ok(Self::Mode(SwitchportMode::Access)),
                "trunk" => Ok(Self::Mode(SwitchportMode::Trunk)),
                _ => Err(CliError::Invalid("switchport mode")),
            },
            "access" if args.keyword(1, "vlan") => Ok(Self::AccessVlan(args.vlan(2)?)),
            "trunk" if args.keyword(1, "native") && args.keyword(2, "vlan") => {
                Ok(Self::NativeVlan(args.vlan(3)?))
            }
            "trunk" if args.keyword(1, "allowed") && args.keyword(2, "vlan") => {
                let first = args.req(3)?;
                if first.eq_ignore_ascii_case("add") {
                    Ok(Self::AllowedAdd(VlanSet::parse(&args.rest(4))))
                } else if first.eq_ignore_ascii_case("remove") {
                    Ok(Self::AllowedRemove(VlanSet::parse(&args.rest(4))))
                } else if first.eq_ignore_ascii_case("none") {
                    Ok(Self::AllowedSet(VlanSet::default()))
                } else {
                    Ok(Self::AllowedSet(VlanSet::parse(&args.rest(3))))
                }
            }
            _ => Err(CliError::InvalidSyntax),
        }
    }

    /// 需要自动加入 VLAN 数据库的 VLAN（允许列表不自动创建）
    pub fn referenced_vlan(&self) -> Option<u16> {
        match self {
            Self::AccessVlan(v) | Self::NativeVlan(v) => Some(*v),
            _ => None,
        }
    }

    pub fn apply(&self, cfg: &mut L2Config) {
        match self {
            Self::Mode(m) => cfg.mode = *m,
            Self::AccessVlan(v) => cfg.access_vlan = *v,
            Self::NativeVlan(v) => cfg.native_vlan = *v,
            Self::AllowedSet(s) => cfg.allowed = s.clone(),
            Self::AllowedAdd(s) => cfg.allowed.extend(s),
            Self::AllowedRemove(s) => cfg.allowed.remove_all(s),
        }
    }
}

//! 交换机配置命令

use super::{Selection, SwitchSession};
use crate::cli::error::{CliError, CliResult};
use crate::cli::l2::SwitchportCommand;
use crate::cli::mode::Mode;
use crate::cli::tokens::Args;
use crate::device::Switch;
use crate::device::switch::ChannelMode;
use crate::net::{Network, ifname};
use crate::stp;
use tracing::info;

fn ok() -> CliResult {
    Ok(String::new())
}

/// `gi0/1-3`、`gi0/1 - gi0/3` 这类同槽位的连续区间
fn dash_range(sw: &Switch, expr: &str) -> Option<Vec<String>> {
    let (left, right) = expr.split_once('-')?;
    let left = ifname::normalize(left);
    let lslash = left.rfind('/')?;
    let prefix = &left[..=lslash];
    let right = match right.parse::<u32>() {
        Ok(n) if !right.contains('/') => format!("{prefix}{n}"),
        _ => ifname::normalize(right),
    };
    let rslash = right.rfind('/')?;
    if !prefix.eq_ignore_ascii_case(&right[..=rslash]) {
        return None;
    }
    let a: u32 = left[lslash + 1..].parse().ok()?;
    let b: u32 = right[rslash + 1..].parse().ok()?;
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    Some(
        (lo..=hi)
            .filter_map(|i| sw.port(&format!("{prefix}{i}")).map(|p| p.name.clone()))
            .collect(),
    )
}

/// 解析 `interface range` 表达式：逗号分隔，每段可以是单口或同槽位区间。
/// 返回存在的端口规范名（去重、保持出现顺序）；一个都没有时为 `None`。
pub fn parse_interface_range(sw: &Switch, expr: &str) -> Option<Vec<String>> {
    let compact: String = expr.split_whitespace().collect();
    let mut out: Vec<String> = Vec::new();
    for part in compact.split(',').filter(|p| !p.is_empty()) {
        let names = if part.contains('-') && ifname::port_channel_id(part).is_none() {
            dash_range(sw, part)?
        } else {
            sw.port(part).map(|p| vec![p.name.clone()]).unwrap_or_default()
        };
        for n in names {
            if !out.contains(&n) {
                out.push(n);
            }
        }
    }
    (!out.is_empty()).then_some(out)
}

impl SwitchSession {
    /// 当前选中的物理口；Port-channel 上下文中为其成员口。
    fn selected_ports(&self, net: &Network) -> Result<Vec<String>, CliError> {
        match &self.selection {
            Selection::Ports(p) => Ok(p.clone()),
            Selection::PortChannel(id) => Ok(self.switch(net)?.channel_member_names(*id)),
            Selection::None => Err(CliError::Unsupported("No interface selected.")),
        }
    }

    pub(super) fn hostname(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let name = args.req(0)?;
        info!(old = %net.device(self.device).name, new = name, "📛 修改主机名");
        net.device_mut(self.device).name = name.to_string();
        ok()
    }

    pub(super) fn select_interface(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        if args.is_empty() {
            return Err(CliError::IncompleteCommand);
        }
        if args.keyword(0, "range") {
            let ports = parse_interface_range(self.switch(net)?, &args.rest(1))
                .ok_or(CliError::Invalid("interface range"))?;
            self.clear_bound();
            self.selection = Selection::Ports(ports);
            self.mode = Mode::InterfaceConfig;
            return ok();
        }
        let compact: String = args.rest(0).split_whitespace().collect();
        if let Some(id) = ifname::port_channel_id(&compact) {
            if id < 1 {
                return Err(CliError::Invalid("interface"));
            }
            self.switch_mut(net)?.ensure_port_channel(id);
            self.clear_bound();
            self.selection = Selection::PortChannel(id);
            self.mode = Mode::InterfaceConfig;
            return ok();
        }
        let name = self
            .switch(net)?
            .port(&compact)
            .map(|p| p.name.clone())
            .ok_or(CliError::Invalid("interface"))?;
        self.clear_bound();
        self.selection = Selection::Ports(vec![name]);
        self.mode = Mode::InterfaceConfig;
        ok()
    }

    pub(super) fn vlan(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let id = args.vlan(0)?;
        self.switch_mut(net)?.ensure_vlan(id);
        self.clear_bound();
        self.vlan = Some(id);
        self.mode = Mode::VlanConfig;
        ok()
    }

    pub(super) fn no_vlan(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let id = args.vlan(0)?;
        if self.switch_mut(net)?.remove_vlan(id) {
            ok()
        } else {
            Err(CliError::NotFound("VLAN"))
        }
    }

    pub(super) fn vlan_name(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let id = self.vlan.ok_or(CliError::DeviceNotReady)?;
        let name = args.rest(0);
        if name.is_empty() {
            return Err(CliError::IncompleteCommand);
        }
        self.switch_mut(net)?.ensure_vlan(id).name = name;
        ok()
    }

    fn set_priority(&mut self, net: &mut Network, raw: &str) -> CliResult {
        let priority: u32 = raw.parse().map_err(|_| CliError::Invalid("priority"))?;
        self.switch_mut(net)?.stp_priority = priority;
        stp::recompute(net);
        ok()
    }

    pub(super) fn stp_priority(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let raw = args.req(0)?;
        self.set_priority(net, raw)
    }

    /// `spanning-tree vlan 1 priority <n>`：只有一个生成树实例。
    pub(super) fn stp_vlan_priority(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        args.vlan(0)?;
        if !args.keyword(1, "priority") {
            return Err(CliError::InvalidSyntax);
        }
        let raw = args.req(2)?;
        self.set_priority(net, raw)
    }

    pub(super) fn mac_aging(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let secs: i64 = args.number(0)?;
        self.switch_mut(net)?.mac_aging_secs = secs;
        ok()
    }

    fn set_admin(&mut self, net: &mut Network, up: bool) -> CliResult {
        let ports = self.selected_ports(net)?;
        let sw = self.switch_mut(net)?;
        for name in &ports {
            if let Some(p) = sw.port_mut(name) {
                p.admin_up = up;
            }
        }
        net.refresh_links();
        ok()
    }

    pub(super) fn shutdown(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        self.set_admin(net, false)
    }

    pub(super) fn no_shutdown(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        self.set_admin(net, true)
    }

    /// Port-channel 上下文改 channel 自己的配置，否则改选中的每个物理口。
    pub(super) fn switchport(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let cmd = SwitchportCommand::parse(args)?;
        let selection = self.selection.clone();
        let sw = self.switch_mut(net)?;
        if let Some(v) = cmd.referenced_vlan() {
            sw.ensure_vlan(v);
        }
        match selection {
            Selection::PortChannel(id) => cmd.apply(&mut sw.ensure_port_channel(id).l2),
            Selection::Ports(ports) => {
                for name in &ports {
                    if let Some(p) = sw.port_mut(name) {
                        cmd.apply(&mut p.l2);
                    }
                }
            }
            Selection::None => return Err(CliError::Unsupported("No interface selected.")),
        }
        ok()
    }

    /// `channel-group <n> mode on|active|passive`
    pub(super) fn channel_group(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let group: u32 = args.number(0)?;
        if group < 1 || !args.keyword(1, "mode") {
            return Err(CliError::InvalidSyntax);
        }
        let mode = ChannelMode::parse(args.req(2)?).ok_or(CliError::InvalidSyntax)?;
        let Selection::Ports(ports) = self.selection.clone() else {
            return Err(CliError::InvalidSyntax);
        };
        let sw = self.switch_mut(net)?;
        for name in &ports {
            if let Some(p) = sw.port_mut(name) {
                p.channel_group = group;
                p.channel_mode = mode;
                p.channel_suspended = false;
            }
        }
        sw.ensure_port_channel(group);
        info!(group, %mode, members = ports.len(), "🔗 配置 channel-group");
        net.refresh_links();
        ok()
    }

    pub(super) fn no_channel_group(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        let ports = self.selected_ports(net)?;
        let sw = self.switch_mut(net)?;
        for name in &ports {
            if let Some(p) = sw.port_mut(name) {
                p.channel_group = 0;
                p.channel_mode = ChannelMode::None;
                p.channel_suspended = false;
            }
        }
        net.refresh_links();
        ok()
    }

    pub(super) fn description(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let text = args.rest(0);
        if text.is_empty() {
            return Err(CliError::IncompleteCommand);
        }
        let ports = self.selected_ports(net)?;
        let sw = self.switch_mut(net)?;
        for name in &ports {
            if let Some(p) = sw.port_mut(name) {
                p.description = Some(text.clone());
            }
        }
        ok()
    }

    pub(super) fn no_description(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        let ports = self.selected_ports(net)?;
        let sw = self.switch_mut(net)?;
        for name in &ports {
            if let Some(p) = sw.port_mut(name) {
                p.description = None;
            }
        }
        ok()
    }

    pub(super) fn write_memory(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        let text = crate::config::serialize_switch(net, self.device).ok_or(CliError::DeviceNotReady)?;
        net.device_mut(self.device).startup_config = Some(text);
        Ok("Building configuration...\n[OK]".to_string())
    }

    pub(super) fn clear_mac_table(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        self.switch_mut(net)?.mac_table.clear();
        ok()
    }
}

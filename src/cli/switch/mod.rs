//! 交换机会话
//!
//! 与路由器会话相同的模式机，接口模式下可以选中单个端口、一组端口（`interface range`）
//! 或一个 Port-channel。

// 子模块声明
mod config;
mod show;

pub use config::parse_interface_range;

use tracing::debug;

use super::error::{CliError, CliResult};
use super::mode::{CONFIG_BANNER, Mode};
use super::tokens::{Command, Line, dispatch};
use super::{TerminalSession, render};
use crate::device::Switch;
use crate::net::{DeviceId, Network};

/// 接口模式下选中的对象
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    /// 一个或多个物理口（规范名）
    Ports(Vec<String>),
    PortChannel(u32),
}

#[derive(Debug, Clone)]
pub struct SwitchSession {
    device: DeviceId,
    mode: Mode,
    selection: Selection,
    vlan: Option<u16>,
}

const EXEC: &[Command<SwitchSession>] = &[
    Command { keywords: &["show", "vlan", "brief"], handler: SwitchSession::show_vlan_brief },
    Command { keywords: &["show", "vlan"], handler: SwitchSession::show_vlan_brief },
    Command { keywords: &["show", "mac", "address-table"], handler: SwitchSession::show_mac_table },
    Command { keywords: &["show", "interfaces"], handler: SwitchSession::show_interfaces },
    Command { keywords: &["show", "interfaces", "trunk"], handler: SwitchSession::show_trunks },
    Command { keywords: &["show", "etherchannel", "summary"], handler: SwitchSession::show_etherchannel_summary },
    Command { keywords: &["show", "etherchannel", "port-channel"], handler: SwitchSession::show_etherchannel_port_channel },
    Command { keywords: &["show", "lacp", "neighbor"], handler: SwitchSession::show_lacp_neighbor },
    Command { keywords: &["show", "spanning-tree"], handler: SwitchSession::show_spanning_tree },
    Command { keywords: &["show", "running-config"], handler: SwitchSession::show_running_config },
    Command { keywords: &["show", "startup-config"], handler: SwitchSession::show_startup_config },
];

const PRIV: &[Command<SwitchSession>] = &[
    Command { keywords: &["write", "memory"], handler: SwitchSession::write_memory },
    Command { keywords: &["clear", "mac", "address-table"], handler: SwitchSession::clear_mac_table },
];

const GLOBAL: &[Command<SwitchSession>] = &[
    Command { keywords: &["hostname"], handler: SwitchSession::hostname },
    Command { keywords: &["interface"], handler: SwitchSession::select_interface },
    Command { keywords: &["vlan"], handler: SwitchSession::vlan },
    Command { keywords: &["no", "vlan"], handler: SwitchSession::no_vlan },
    Command { keywords: &["spanning-tree", "priority"], handler: SwitchSession::stp_priority },
    Command { keywords: &["spanning-tree", "vlan"], handler: SwitchSession::stp_vlan_priority },
    Command { keywords: &["mac", "address-table", "aging-time"], handler: SwitchSession::mac_aging },
];

const INTERFACE: &[Command<SwitchSession>] = &[
    Command { keywords: &["interface"], handler: SwitchSession::select_interface },
    Command { keywords: &["shutdown"], handler: SwitchSession::shutdown },
    Command { keywords: &["no", "shutdown"], handler: SwitchSession::no_shutdown },
    Command { keywords: &["switchport"], handler: SwitchSession::switchport },
    Command { keywords: &["channel-group"], handler: SwitchSession::channel_group },
    Command { keywords: &["no", "channel-group"], handler: SwitchSession::no_channel_group },
    Command { keywords: &["description"], handler: SwitchSession::description },
    Command { keywords: &["no", "description"], handler: SwitchSession::no_description },
];

const VLAN: &[Command<SwitchSession>] = &[
    Command { keywords: &["name"], handler: SwitchSession::vlan_name },
];

impl SwitchSession {
    pub fn new(device: DeviceId) -> Self {
        Self {
            device,
            mode: Mode::UserExec,
            selection: Selection::None,
            vlan: None,
        }
    }

    pub fn device(&self) -> DeviceId {
        self.device
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    fn switch<'a>(&self, net: &'a Network) -> Result<&'a Switch, CliError> {
        net.switch(self.device).ok_or(CliError::DeviceNotReady)
    }

    fn switch_mut<'a>(&self, net: &'a mut Network) -> Result<&'a mut Switch, CliError> {
        net.switch_mut(self.device).ok_or(CliError::DeviceNotReady)
    }

    fn clear_bound(&mut self) {
        self.selection = Selection::None;
        self.vlan = None;
    }

    fn run(&mut self, net: &mut Network, line: &Line) -> CliResult {
        if line.is("enable") {
            self.mode = Mode::PrivExec;
            return Ok(String::new());
        }
        if line.is("disable") {
            self.mode = Mode::UserExec;
            return Ok(String::new());
        }
        if line.is("configure terminal") {
            if self.mode != Mode::PrivExec {
                return Err(CliError::InvalidSyntax);
            }
            self.mode = Mode::GlobalConfig;
            return Ok(CONFIG_BANNER.to_string());
        }
        if line.is("end") {
            if self.mode.is_exec() {
                return Err(CliError::InvalidSyntax);
            }
            self.mode = Mode::PrivExec;
            self.clear_bound();
            return Ok(String::new());
        }
        if line.is("exit") {
            return Ok(match self.mode {
                Mode::UserExec | Mode::PrivExec => "logout".to_string(),
                Mode::GlobalConfig => {
                    self.mode = Mode::PrivExec;
                    String::new()
                }
                _ => {
                    self.mode = Mode::GlobalConfig;
                    self.clear_bound();
                    String::new()
                }
            });
        }

        let result = match self.mode {
            Mode::UserExec => dispatch(EXEC, self, net, line),
            Mode::PrivExec => match dispatch(EXEC, self, net, line) {
                Some(r) => Some(r),
                None => dispatch(PRIV, self, net, line),
            },
            Mode::GlobalConfig => dispatch(GLOBAL, self, net, line),
            Mode::InterfaceConfig => dispatch(INTERFACE, self, net, line),
            Mode::VlanConfig => dispatch(VLAN, self, net, line),
            _ => None,
        };
        result.unwrap_or(Err(CliError::InvalidSyntax))
    }
}

impl TerminalSession for SwitchSession {
    fn execute(&mut self, net: &mut Network, input: &str) -> String {
        if !net.is_powered(self.device) {
            return CliError::PowerOff.to_string();
        }
        let line = Line::parse(input.trim());
        if line.is_empty() {
            return String::new();
        }
        let out = render(self.run(net, &line));
        debug!(device = %net.device(self.device).name, mode = ?self.mode, input = %line.raw, "⌨️  交换机命令");
        out
    }

    fn prompt(&self, net: &Network) -> String {
        format!("{}{}", net.device(self.device).name, self.mode.prompt_suffix())
    }
}

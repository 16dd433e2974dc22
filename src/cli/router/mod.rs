//! 路由器会话
//!
//! IOS 模式机：UserExec → PrivExec → GlobalConfig → 各配置子模式。
//! 通过 console 线打开的会话在启用 `login` 时先要求输入密码。

// 子模块声明
mod config;
mod show;

use tracing::debug;

use super::error::{CliError, CliResult};
use super::mode::{CONFIG_BANNER, Mode};
use super::tokens::{Command, Line, dispatch};
use super::{TerminalSession, render};
use crate::device::Router;
use crate::net::{DeviceId, Network};

/// 一个路由器终端会话
#[derive(Debug, Clone)]
pub struct RouterSession {
    device: DeviceId,
    mode: Mode,
    interface: Option<String>,
    pool: Option<String>,
    acl: Option<String>,
    ospf: Option<u32>,
    awaiting_password: bool,
}

const EXEC: &[Command<RouterSession>] = &[
    Command { keywords: &["show", "ip", "interface", "brief"], handler: RouterSession::show_ip_interface_brief },
    Command { keywords: &["show", "ip", "route"], handler: RouterSession::show_ip_route },
    Command { keywords: &["show", "running-config"], handler: RouterSession::show_running_config },
    Command { keywords: &["show", "startup-config"], handler: RouterSession::show_startup_config },
    Command { keywords: &["show", "access-lists"], handler: RouterSession::show_access_lists },
    Command { keywords: &["show", "ip", "nat", "translations"], handler: RouterSession::show_nat_translations },
    Command { keywords: &["show", "ip", "nat", "statistics"], handler: RouterSession::show_nat_statistics },
    Command { keywords: &["show", "ip", "arp"], handler: RouterSession::show_arp },
    Command { keywords: &["show", "arp"], handler: RouterSession::show_arp },
    Command { keywords: &["show", "ip", "dhcp", "binding"], handler: RouterSession::show_dhcp_binding },
    Command { keywords: &["show", "ip", "dhcp", "pool"], handler: RouterSession::show_dhcp_pool },
    Command { keywords: &["show", "ip", "protocols"], handler: RouterSession::show_ip_protocols },
    Command { keywords: &["show", "ip", "ospf", "neighbor"], handler: RouterSession::show_ospf_neighbor },
    Command { keywords: &["show", "mac", "address-table"], handler: RouterSession::show_mac_table },
    Command { keywords: &["show", "version"], handler: RouterSession::show_version },
];

const PRIV: &[Command<RouterSession>] = &[
    Command { keywords: &["write", "memory"], handler: RouterSession::write_memory },
    Command { keywords: &["clear", "ip", "nat", "translation"], handler: RouterSession::clear_nat },
    Command { keywords: &["clear", "arp"], handler: RouterSession::clear_arp },
    Command { keywords: &["clear", "arp-cache"], handler: RouterSession::clear_arp },
    Command { keywords: &["clear", "mac", "address-table"], handler: RouterSession::clear_mac_table },
];

const GLOBAL: &[Command<RouterSession>] = &[
    Command { keywords: &["hostname"], handler: RouterSession::hostname },
    Command { keywords: &["interface"], handler: RouterSession::select_interface },
    Command { keywords: &["ip", "route"], handler: RouterSession::ip_route },
    Command { keywords: &["no", "ip", "route"], handler: RouterSession::no_ip_route },
    Command { keywords: &["ip", "dhcp", "pool"], handler: RouterSession::dhcp_pool },
    Command { keywords: &["no", "ip", "dhcp", "pool"], handler: RouterSession::no_dhcp_pool },
    Command { keywords: &["ip", "dhcp", "excluded-address"], handler: RouterSession::dhcp_excluded },
    Command { keywords: &["no", "ip", "dhcp", "excluded-address"], handler: RouterSession::no_dhcp_excluded },
    Command { keywords: &["ip", "access-list", "extended"], handler: RouterSession::access_list_extended },
    Command { keywords: &["no", "ip", "access-list", "extended"], handler: RouterSession::no_access_list_extended },
    Command { keywords: &["access-list"], handler: RouterSession::access_list_standard },
    Command { keywords: &["no", "access-list"], handler: RouterSession::no_access_list_standard },
    Command { keywords: &["ip", "nat", "inside", "source", "list"], handler: RouterSession::nat_rule },
    Command { keywords: &["no", "ip", "nat", "inside", "source", "list"], handler: RouterSession::no_nat_rule },
    Command { keywords: &["router", "ospf"], handler: RouterSession::router_ospf },
    Command { keywords: &["no", "router", "ospf"], handler: RouterSession::no_router_ospf },
    Command { keywords: &["line", "console"], handler: RouterSession::line_console },
    Command { keywords: &["mac", "address-table", "aging-time"], handler: RouterSession::mac_aging },
];

const INTERFACE: &[Command<RouterSession>] = &[
    Command { keywords: &["interface"], handler: RouterSession::select_interface },
    Command { keywords: &["ip", "address"], handler: RouterSession::ip_address },
    Command { keywords: &["no", "ip", "address"], handler: RouterSession::no_ip_address },
    Command { keywords: &["shutdown"], handler: RouterSession::shutdown },
    Command { keywords: &["no", "shutdown"], handler: RouterSession::no_shutdown },
    Command { keywords: &["encapsulation"], handler: RouterSession::encapsulation },
    Command { keywords: &["ip", "access-group"], handler: RouterSession::access_group },
    Command { keywords: &["no", "ip", "access-group"], handler: RouterSession::no_access_group },
    Command { keywords: &["ip", "nat", "inside"], handler: RouterSession::nat_inside },
    Command { keywords: &["ip", "nat", "outside"], handler: RouterSession::nat_outside },
    Command { keywords: &["no", "ip", "nat", "inside"], handler: RouterSession::no_nat_inside },
    Command { keywords: &["no", "ip", "nat", "outside"], handler: RouterSession::no_nat_outside },
    Command { keywords: &["description"], handler: RouterSession::description },
    Command { keywords: &["no", "description"], handler: RouterSession::no_description },
    Command { keywords: &["switchport"], handler: RouterSession::switchport },
];

const DHCP_POOL: &[Command<RouterSession>] = &[
    Command { keywords: &["network"], handler: RouterSession::pool_network },
    Command { keywords: &["default-router"], handler: RouterSession::pool_default_router },
    Command { keywords: &["dns-server"], handler: RouterSession::pool_dns_server },
    Command { keywords: &["range"], handler: RouterSession::pool_range },
    Command { keywords: &["address", "range"], handler: RouterSession::pool_range },
];

const ACL: &[Command<RouterSession>] = &[
    Command { keywords: &["permit"], handler: RouterSession::ace_permit },
    Command { keywords: &["deny"], handler: RouterSession::ace_deny },
    Command { keywords: &["no"], handler: RouterSession::no_ace },
];

const OSPF: &[Command<RouterSession>] = &[
    Command { keywords: &["network"], handler: RouterSession::ospf_network },
    Command { keywords: &["passive-interface"], handler: RouterSession::ospf_passive },
    Command { keywords: &["no", "passive-interface"], handler: RouterSession::ospf_no_passive },
    Command { keywords: &["router-id"], handler: RouterSession::ospf_router_id },
    Command { keywords: &["no", "router-id"], handler: RouterSession::ospf_no_router_id },
];

const LINE_CONSOLE: &[Command<RouterSession>] = &[
    Command { keywords: &["password"], handler: RouterSession::line_password },
    Command { keywords: &["login"], handler: RouterSession::line_login },
    Command { keywords: &["no", "login"], handler: RouterSession::line_no_login },
];

impl RouterSession {
    pub fn new(device: DeviceId) -> Self {
        Self {
            device,
            mode: Mode::UserExec,
            interface: None,
            pool: None,
            acl: None,
            ospf: None,
            awaiting_password: false,
        }
    }

    /// 经 console 线打开：启用 `login` 时先进入密码提示。
    pub fn console(net: &Network, device: DeviceId) -> Self {
        let mut s = Self::new(device);
        s.awaiting_password = net.router(device).is_some_and(|r| r.console.login);
        s
    }

    pub fn device(&self) -> DeviceId {
        self.device
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    fn router<'a>(&self, net: &'a Network) -> Result<&'a Router, CliError> {
        net.router(self.device).ok_or(CliError::DeviceNotReady)
    }

    fn router_mut<'a>(&self, net: &'a mut Network) -> Result<&'a mut Router, CliError> {
        net.router_mut(self.device).ok_or(CliError::DeviceNotReady)
    }

    fn clear_bound(&mut self) {
        self.interface = None;
        self.pool = None;
        self.acl = None;
        self.ospf = None;
    }

    fn login(&mut self, net: &Network, input: &str) -> CliResult {
        if input.is_empty() {
            return Ok(String::new());
        }
        let expected = self.router(net)?.console.password.as_str();
        if input == expected {
            self.awaiting_password = false;
            self.mode = Mode::UserExec;
            Ok(String::new())
        } else {
            Err(CliError::AuthFailure)
        }
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
            return Ok(self.exit());
        }

        let result = match self.mode {
            Mode::UserExec => dispatch(EXEC, self, net, line),
            Mode::PrivExec => match dispatch(EXEC, self, net, line) {
                Some(r) => Some(r),
                None => dispatch(PRIV, self, net, line),
            },
            Mode::GlobalConfig => dispatch(GLOBAL, self, net, line),
            Mode::InterfaceConfig => dispatch(INTERFACE, self, net, line),
            Mode::DhcpPoolConfig => dispatch(DHCP_POOL, self, net, line),
            Mode::AclConfig => self.acl_line(net, line),
            Mode::RouterOspfConfig => dispatch(OSPF, self, net, line),
            Mode::LineConsoleConfig => dispatch(LINE_CONSOLE, self, net, line),
            Mode::VlanConfig => None,
        };
        result.unwrap_or(Err(CliError::InvalidSyntax))
    }

    /// ACL 模式下允许以序号开头：`20 permit tcp any any eq 23`。
    fn acl_line(&mut self, net: &mut Network, line: &Line) -> Option<CliResult> {
        if line.words.first().is_some_and(|w| w.parse::<u32>().is_ok()) {
            return Some(self.ace_with_sequence(net, line));
        }
        dispatch(ACL, self, net, line)
    }

    /// 返回上一级；在 exec 模式下注销。
    fn exit(&mut self) -> String {
        match self.mode {
            Mode::UserExec | Mode::PrivExec => return "logout".to_string(),
            Mode::GlobalConfig => self.mode = Mode::PrivExec,
            _ => self.mode = Mode::GlobalConfig,
        }
        self.clear_bound();
        String::new()
    }
}

impl TerminalSession for RouterSession {
    fn execute(&mut self, net: &mut Network, input: &str) -> String {
        if !net.is_powered(self.device) {
            return CliError::PowerOff.to_string();
        }
        let input = input.trim();
        if self.awaiting_password {
            return render(self.login(net, input));
        }
        let line = Line::parse(input);
        if line.is_empty() {
            return String::new();
        }
        let out = render(self.run(net, &line));
        debug!(device = %net.device(self.device).name, mode = ?self.mode, input = %line.raw, "⌨️  路由器命令");
        out
    }

    fn prompt(&self, net: &Network) -> String {
        if self.awaiting_password {
            return "Password:".to_string();
        }
        format!("{}{}", net.device(self.device).name, self.mode.prompt_suffix())
    }
}

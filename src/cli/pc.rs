//! PC 终端
//!
//! 主机命令（ipconfig、ping、telnet、arp、wifi）加上 `terminal`：经 RS232
//! console 线打开对端设备的会话，之后的输入都转交给它，直到对端返回 `logout`。

use std::net::Ipv4Addr;

use tracing::{debug, info};

use super::error::{CliError, CliResult};
use super::tokens::{Args, Command, Line, dispatch, parse_ip};
use super::{RouterSession, SwitchSession, TerminalSession};
use crate::device::{Pc, WifiAdapter};
use crate::forward::{self, wireless};
use crate::net::{DeviceId, DeviceKind, Network, PortId, PortMedium};

const UNKNOWN: &str = "Unknown command. Type 'help'.";
const NO_ADAPTER: &str =
    "No WirelessAdapter found on this PC.\n(Add a wireless adapter to the PC to use wifi commands.)";

const HELP: &str = "Commands:\n  ipconfig\n  ipconfig /renew | /release\n  set ip <ip> <mask> [gw]\n  \
set dns <ip>\n  ping <ip>\n  telnet <ip> [port]\n  arp -a\n  arp -d *\n  wifi help\n  \
terminal   (open console cable session)";

const WIFI_HELP: &str = "WiFi Commands:\n  wifi scan\n  wifi status\n  wifi connect <ssid> [password]\n  \
wifi disconnect\n  wifi setkey <password>\n  wifi forget";

pub struct PcSession {
    device: DeviceId,
    console: Option<Box<dyn TerminalSession>>,
}

const COMMANDS: &[Command<PcSession>] = &[
    Command { keywords: &["help"], handler: PcSession::help },
    Command { keywords: &["ipconfig"], handler: PcSession::ipconfig },
    Command { keywords: &["ipconfig", "/renew"], handler: PcSession::renew },
    Command { keywords: &["ipconfig", "/release"], handler: PcSession::release },
    Command { keywords: &["ip", "dhcp"], handler: PcSession::renew },
    Command { keywords: &["set", "ip", "dhcp"], handler: PcSession::renew },
    Command { keywords: &["set", "ip"], handler: PcSession::set_ip },
    Command { keywords: &["set", "dns"], handler: PcSession::set_dns },
    Command { keywords: &["ping"], handler: PcSession::ping },
    Command { keywords: &["telnet"], handler: PcSession::telnet },
    Command { keywords: &["arp", "-a"], handler: PcSession::arp_show },
    Command { keywords: &["arp", "-d"], handler: PcSession::arp_clear },
    Command { keywords: &["wifi"], handler: PcSession::wifi_help },
    Command { keywords: &["wifi", "help"], handler: PcSession::wifi_help },
    Command { keywords: &["wifi", "scan"], handler: PcSession::wifi_scan },
    Command { keywords: &["wifi", "status"], handler: PcSession::wifi_status },
    Command { keywords: &["wifi", "connect"], handler: PcSession::wifi_connect },
    Command { keywords: &["wifi", "disconnect"], handler: PcSession::wifi_disconnect },
    Command { keywords: &["wifi", "setkey"], handler: PcSession::wifi_setkey },
    Command { keywords: &["wifi", "forget"], handler: PcSession::wifi_forget },
    Command { keywords: &["terminal"], handler: PcSession::terminal },
];

fn ping_text(ip: &str, ok: bool) -> String {
    if ok {
        format!(
            "Pinging {ip} with 32 bytes of data:\nReply from {ip}: bytes=32 time<1ms TTL=128\n\n\
             Ping statistics for {ip}:\n    Packets: Sent = 1, Received = 1, Lost = 0 (0% loss)"
        )
    } else {
        format!(
            "Pinging {ip} with 32 bytes of data:\nRequest timed out.\n\n\
             Ping statistics for {ip}:\n    Packets: Sent = 1, Received = 0, Lost = 1 (100% loss)"
        )
    }
}

fn link_text(net: &Network, port: Option<PortId>) -> &'static str {
    if port.is_some_and(|p| net.port(p).is_connected()) {
        "Connected"
    } else {
        "Disconnected"
    }
}

fn yes_no(b: bool) -> &'static str {
    if b { "Yes" } else { "No" }
}

impl PcSession {
    pub fn new(device: DeviceId) -> Self {
        Self { device, console: None }
    }

    pub fn device(&self) -> DeviceId {
        self.device
    }

    /// 是否正通过 console 线操作另一台设备
    pub fn in_console(&self) -> bool {
        self.console.is_some()
    }

    fn pc<'a>(&self, net: &'a Network) -> Result<&'a Pc, CliError> {
        net.pc(self.device).ok_or(CliError::DeviceNotReady)
    }

    fn pc_mut<'a>(&self, net: &'a mut Network) -> Result<&'a mut Pc, CliError> {
        net.pc_mut(self.device).ok_or(CliError::DeviceNotReady)
    }

    fn port_by_medium(&self, net: &Network, medium: PortMedium) -> Option<PortId> {
        net.ports_of(self.device)
            .iter()
            .copied()
            .find(|&p| net.port(p).medium == medium)
    }

    fn adapter<'a>(&self, net: &'a Network) -> Option<&'a WifiAdapter> {
        net.pc(self.device).and_then(|p| p.wifi.as_ref())
    }

    fn help(&mut self, _net: &mut Network, _args: Args<'_>) -> CliResult {
        Ok(HELP.to_string())
    }

    fn ipconfig(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        if !args.is_empty() {
            return Ok(UNKNOWN.to_string());
        }
        let pc = self.pc(net)?;
        let active = match forward::nic_port(net, self.device).map(|p| net.port(p).medium) {
            Some(PortMedium::Ethernet) => "Ethernet",
            Some(PortMedium::Wireless) => "Wireless",
            Some(_) => "Other",
            None => "None",
        };
        Ok(format!(
            "   IP Address. . . . . . . . . . . . : {}\n   \
             Subnet Mask . . . . . . . . . . . : {}\n   \
             Default Gateway . . . . . . . . . : {}\n   \
             DNS Server . . . . . . . . . . . .: {}\n   \
             Link (Ethernet). . . . . . . . . . : {}\n   \
             Link (Wireless). . . . . . . . . . : {}\n   \
             Link (Console) . . . . . . . . . . : {}\n   \
             Active NIC . . . . . . . . . . . . : {active}",
            pc.ip,
            pc.mask,
            pc.gateway,
            pc.dns,
            link_text(net, self.port_by_medium(net, PortMedium::Ethernet)),
            link_text(net, self.port_by_medium(net, PortMedium::Wireless)),
            link_text(net, self.port_by_medium(net, PortMedium::Rs232)),
        ))
    }

    fn renew(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        Ok(match forward::dhcp_renew(net, self.device) {
            Ok(offer) => format!(
                "DHCP configured:\n  IP Address . . . . . . . . . . . : {}\n  \
                 Subnet Mask  . . . . . . . . . . . : {}\n  \
                 Default Gateway . . . . . . . . . : {}\n  \
                 DNS Server . . . . . . . . . . .  : {}",
                offer.ip, offer.mask, offer.gateway, offer.dns
            ),
            Err(e) => e.to_string(),
        })
    }

    fn release(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        forward::dhcp_release(net, self.device);
        Ok("DHCP released. IP configuration cleared.".to_string())
    }

    /// `set ip <ip> <mask> [gateway]`，静态地址会关掉 DHCP 标志。
    fn set_ip(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        if args.len() < 2 {
            return Ok("Usage: set ip <ip> <mask> [gateway]".to_string());
        }
        let parsed = (|| -> Result<(Ipv4Addr, Ipv4Addr, Option<Ipv4Addr>), CliError> {
            let gw = args.get(2).map(parse_ip).transpose()?;
            Ok((args.ip(0)?, args.ip(1)?, gw))
        })();
        let Ok((ip, mask, gw)) = parsed else {
            return Ok("Invalid IP address.".to_string());
        };
        let pc = self.pc_mut(net)?;
        pc.ip = ip;
        pc.mask = mask;
        if let Some(gw) = gw {
            pc.gateway = gw;
        }
        pc.dhcp = false;
        info!(%ip, %mask, "🖥️  PC 静态地址");
        Ok("OK".to_string())
    }

    fn set_dns(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let Ok(dns) = args.ip(0) else {
            return Ok("Usage: set dns <ip>".to_string());
        };
        self.pc_mut(net)?.dns = dns;
        Ok("OK".to_string())
    }

    fn ping(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let target = args.rest(0);
        if target.is_empty() {
            return Ok("Usage: ping <ip>".to_string());
        }
        let ok = match parse_ip(&target) {
            Ok(dst) => forward::ping(net, self.device, dst).is_ok(),
            Err(_) => false,
        };
        Ok(ping_text(&target, ok))
    }

    fn telnet(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let Some(target) = args.get(0) else {
            return Ok("Usage: telnet <ip> [port]".to_string());
        };
        let port = match args.get(1) {
            None => 23,
            Some(raw) => match raw.parse::<u16>() {
                Ok(p) if p > 0 => p,
                _ => return Ok("Invalid port.".to_string()),
            },
        };
        let Ok(dst) = parse_ip(target) else {
            return Ok(format!("Telnet to {target}:{port} failed (host unreachable)."));
        };
        Ok(match forward::telnet(net, self.device, dst, port) {
            Ok(banner) if banner.trim().is_empty() => format!("Connected to {dst} on port {port}."),
            Ok(banner) => format!("Connected to {dst} on port {port}.\n{banner}"),
            Err(reason) => format!("Telnet to {dst}:{port} failed ({reason})."),
        })
    }

    fn arp_show(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        let pc = self.pc(net)?;
        if pc.arp.is_empty() {
            return Ok("No ARP Entries Found.".to_string());
        }
        let mut out = format!(
            "Interface: {} --- 0x1\n  Internet Address      Physical Address      Type\n",
            pc.ip
        );
        for e in pc.arp.entries() {
            out.push_str(&format!(
                "  {:<20} {:<20} dynamic\n",
                e.ip.to_string(),
                e.mac.replace(':', "-")
            ));
        }
        Ok(out.trim_end().to_string())
    }

    fn arp_clear(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        if args.len() > 1 || args.get(0).is_some_and(|a| a != "*") {
            return Ok(UNKNOWN.to_string());
        }
        self.pc_mut(net)?.arp.clear();
        Ok("ARP cache cleared.".to_string())
    }

    fn wifi_help(&mut self, _net: &mut Network, args: Args<'_>) -> CliResult {
        if !args.is_empty() {
            return Ok(UNKNOWN.to_string());
        }
        Ok(WIFI_HELP.to_string())
    }

    fn wifi_scan(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        let Ok(list) = wireless::scan(net, self.device) else {
            return Ok(NO_ADAPTER.to_string());
        };
        let mut out = String::from("Scanning for WiFi networks...\n");
        for e in list.iter().take(25) {
            out.push_str(&format!(
                "  SSID: {:<18} Sec: {:<4} Band: {:<6} Dist: {:>5.1}m  Sig: {:>3.0}%  {:<12} {}\n",
                e.ssid,
                e.security.short(),
                e.band.to_string(),
                e.distance,
                e.signal,
                e.visibility.to_string(),
                if e.supported { "OK" } else { "UNSUPPORTED" }
            ));
        }
        if list.is_empty() {
            out.push_str("  (No access points found)\n");
        }
        out.push_str("\nTip: wifi connect <ssid> [password]   |   wifi setkey <password>");
        Ok(out)
    }

    fn wifi_status(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        let Some(wa) = self.adapter(net) else {
            return Ok(NO_ADAPTER.to_string());
        };
        let desired = if wa.desired_ssid.trim().is_empty() { "(any)" } else { wa.desired_ssid.as_str() };
        let mut out = format!(
            "Wireless Adapter Status:\n  Supports 2.4 GHz : {}\n  Supports 5 GHz   : {}\n  \
             Auto-Join        : {}\n  Desired SSID     : {desired}\n  Stored Key Set   : {}\n\n",
            yes_no(wa.supports_2_4),
            yes_no(wa.supports_5),
            if wa.auto_join { "On" } else { "Off" },
            yes_no(!wa.stored_key.trim().is_empty())
        );
        let Some((assoc, ap)) = wa
            .associated
            .and_then(|a| net.access_point(a.ap).map(|ap| (a, ap)))
        else {
            out.push_str("  Connected        : No");
            return Ok(out);
        };
        let dist = wireless::distance(net, self.device, assoc.ap);
        out.push_str(&format!(
            "  Connected        : Yes\n  SSID             : {}\n  Band             : {}\n  \
             Security         : {}\n  AP Device        : {}\n  Distance         : {dist:.1} m\n  \
             Signal           : {:.0}%\n  In Range         : {}\n  Link (Wireless0) : {}",
            ap.wireless.ssid,
            ap.wireless.band,
            ap.wireless.security,
            net.device(assoc.ap).name,
            ap.wireless.signal_percent(dist),
            yes_no(wireless::can_see(net, assoc.ap, self.device)),
            link_text(net, self.port_by_medium(net, PortMedium::Wireless))
        ));
        Ok(out)
    }

    fn wifi_connect(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let Some(ssid) = args.get(0) else {
            return Ok("Usage: wifi connect <ssid> [password]".to_string());
        };
        let password = args.rest(1);
        Ok(match wireless::connect(net, self.device, ssid, &password) {
            Ok(ap) => match net.access_point(ap) {
                Some(a) => format!(
                    "Connected to '{}' ({}, {}) via {}.",
                    a.wireless.ssid,
                    a.wireless.band,
                    a.wireless.security,
                    net.device(ap).name
                ),
                None => format!("Connected to '{ssid}'."),
            },
            Err(wireless::WifiError::NoAdapter) => NO_ADAPTER.to_string(),
            Err(e) => e.to_string(),
        })
    }

    fn wifi_disconnect(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        if self.adapter(net).is_none() {
            return Ok(NO_ADAPTER.to_string());
        }
        Ok(match wireless::disconnect(net, self.device) {
            Some(ssid) => format!("Disconnected from '{ssid}'."),
            None => wireless::WifiError::NotConnected.to_string(),
        })
    }

    fn wifi_setkey(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let key = args.rest(0);
        let Some(wa) = self.pc_mut(net)?.wifi.as_mut() else {
            return Ok(NO_ADAPTER.to_string());
        };
        if key.trim().is_empty() {
            return Ok("Usage: wifi setkey <password>".to_string());
        }
        wa.stored_key = key.trim().to_string();
        Ok("WiFi key saved.".to_string())
    }

    fn wifi_forget(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        let Some(wa) = self.pc_mut(net)?.wifi.as_mut() else {
            return Ok(NO_ADAPTER.to_string());
        };
        wa.stored_key.clear();
        Ok("WiFi key cleared.".to_string())
    }

    /// 经 RS232 口连接的对端设备打开 console 会话
    fn terminal(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        let Some(rs232) = self.port_by_medium(net, PortMedium::Rs232) else {
            return Ok("No console port on this PC.".to_string());
        };
        let Some(peer) = net.port(rs232).peer() else {
            return Ok("No console cable connected.".to_string());
        };
        let remote = net.port(peer).owner;
        let (session, label): (Box<dyn TerminalSession>, &str) = match &net.device(remote).kind {
            DeviceKind::Router(_) => (Box::new(RouterSession::console(net, remote)), "router"),
            DeviceKind::Switch(_) => (Box::new(SwitchSession::new(remote)), "switch"),
            _ => return Ok("Connected device has no supported console.".to_string()),
        };
        self.console = Some(session);
        info!(pc = %net.device(self.device).name, remote = %net.device(remote).name, "🔌 打开 console 会话");
        Ok(format!(
            "Connected to {label} console. (Type 'exit' at the {label} prompt to close)"
        ))
    }

    /// console 线被拔掉后会话随之关闭
    fn console_cable_present(&self, net: &Network) -> bool {
        self.port_by_medium(net, PortMedium::Rs232)
            .is_some_and(|p| net.port(p).is_connected())
    }
}

impl TerminalSession for PcSession {
    fn execute(&mut self, net: &mut Network, input: &str) -> String {
        if !net.is_powered(self.device) {
            return CliError::PowerOff.to_string();
        }
        let input = input.trim();

        if self.console.is_some() && !self.console_cable_present(net) {
            self.console = None;
            return "Connection closed.".to_string();
        }
        if let Some(console) = self.console.as_mut() {
            let out = console.execute(net, input);
            if out == "logout" {
                self.console = None;
                return "Connection closed.".to_string();
            }
            return out;
        }

        let line = Line::parse(input);
        if line.is_empty() {
            return String::new();
        }
        let out = match dispatch(COMMANDS, self, net, &line) {
            Some(result) => super::render(result),
            None => UNKNOWN.to_string(),
        };
        debug!(device = %net.device(self.device).name, input = %line.raw, "⌨️  PC 命令");
        out
    }

    fn prompt(&self, net: &Network) -> String {
        match &self.console {
            Some(console) => console.prompt(net),
            None => format!("{}> ", net.device(self.device).name),
        }
    }
}

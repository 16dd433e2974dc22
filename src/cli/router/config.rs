//! 路由器配置命令
//!
//! 全局配置与各子模式的处理函数。所有校验先于修改；改动接口状态后刷新链路。

use std::net::Ipv4Addr;

use super::RouterSession;
use crate::cli::error::{CliError, CliResult};
use crate::cli::l2::SwitchportCommand;
use crate::cli::mode::Mode;
use crate::cli::tokens::{Args, Line, parse_ip};
use crate::device::router::{AclAction, AclAddress, AclProtocol, AclRule, IfAddr, NatRule, NatSide};
use crate::net::{Network, ifname, ipv4};
use tracing::info;

fn ok() -> CliResult {
    Ok(String::new())
}

/// `ip route` 参数里的下一跳与出接口。
/// 三个参数时 IP 视作下一跳，否则视作出接口；四个参数时依次为出接口、下一跳。
fn route_target(args: &Args<'_>) -> Result<(Option<Ipv4Addr>, Option<String>), CliError> {
    match (args.get(2), args.get(3)) {
        (Some(a), None) => match parse_ip(a) {
            Ok(ip) => Ok((Some(ip), None)),
            Err(_) => Ok((None, Some(ifname::normalize(a)))),
        },
        (Some(a), Some(b)) => Ok((Some(parse_ip(b)?), Some(ifname::normalize(a)))),
        _ => Err(CliError::IncompleteCommand),
    }
}

/// 主机号：既接受 `50` 也接受 `192.168.1.50`。
fn host_number(s: &str) -> Result<u8, CliError> {
    if let Ok(n) = s.parse::<u8>() {
        return Ok(n);
    }
    Ok(parse_ip(s)?.octets()[3])
}

/// ACL 地址：`any`、`host x` 或裸 IP，返回地址与下一个参数下标。
fn acl_address(args: &Args<'_>, i: usize) -> Result<(AclAddress, usize), CliError> {
    let word = args.req(i)?;
    if word.eq_ignore_ascii_case("any") {
        Ok((AclAddress::Any, i + 1))
    } else if word.eq_ignore_ascii_case("host") {
        Ok((AclAddress::Host(args.ip(i + 1)?), i + 2))
    } else {
        Ok((AclAddress::Host(parse_ip(word)?), i + 1))
    }
}

impl RouterSession {
    fn bound_interface(&self) -> Result<String, CliError> {
        self.interface
            .clone()
            .ok_or(CliError::Unsupported("No interface selected."))
    }

    fn bound_pool(&self) -> Result<String, CliError> {
        self.pool.clone().ok_or(CliError::DeviceNotReady)
    }

    fn bound_ospf(&self) -> Result<u32, CliError> {
        self.ospf.ok_or(CliError::DeviceNotReady)
    }

    pub(super) fn hostname(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let name = args.req(0)?;
        info!(old = %net.device(self.device).name, new = name, "📛 修改主机名");
        net.device_mut(self.device).name = name.to_string();
        ok()
    }

    pub(super) fn select_interface(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let raw = args.rest(0);
        if raw.is_empty() {
            return Err(CliError::IncompleteCommand);
        }
        let router = self.router_mut(net)?;
        let name = router
            .ensure_interface(&raw)
            .map(|itf| itf.name.clone())
            .ok_or(CliError::Invalid("interface"))?;
        self.clear_bound();
        self.interface = Some(name);
        self.mode = Mode::InterfaceConfig;
        net.refresh_links();
        ok()
    }

    pub(super) fn ip_route(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let network = args.ip(0)?;
        let mask = args.ip(1)?;
        let (next_hop, exit) = route_target(&args)?;
        let router = self.router_mut(net)?;
        if let Some(e) = &exit {
            if router.interface(e).is_none() {
                return Err(CliError::InvalidSyntax);
            }
        }
        if !router.add_static_route(network, mask, next_hop, exit.as_deref()) {
            return Err(CliError::InvalidSyntax);
        }
        ok()
    }

    pub(super) fn no_ip_route(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let network = args.ip(0)?;
        let mask = args.ip(1)?;
        let (next_hop, exit) = route_target(&args)?;
        if self
            .router_mut(net)?
            .remove_static_route(network, mask, next_hop, exit.as_deref())
        {
            ok()
        } else {
            Err(CliError::NotFound("Route"))
        }
    }

    pub(super) fn dhcp_pool(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let name = args.req(0)?;
        let router = self.router_mut(net)?;
        let idx = router.dhcp.ensure_pool(name);
        let name = router.dhcp.pools[idx].name.clone();
        self.clear_bound();
        self.pool = Some(name);
        self.mode = Mode::DhcpPoolConfig;
        ok()
    }

    pub(super) fn no_dhcp_pool(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let name = args.req(0)?;
        if self.router_mut(net)?.dhcp.remove_pool(name) {
            ok()
        } else {
            Err(CliError::NotFound("Pool"))
        }
    }

    fn excluded_range(args: &Args<'_>) -> Result<(Ipv4Addr, Ipv4Addr), CliError> {
        let lo = args.ip(0)?;
        let hi = match args.get(1) {
            Some(s) => parse_ip(s)?,
            None => lo,
        };
        if hi < lo {
            return Err(CliError::Invalid("address range"));
        }
        Ok((lo, hi))
    }

    pub(super) fn dhcp_excluded(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let range = Self::excluded_range(&args)?;
        let dhcp = &mut self.router_mut(net)?.dhcp;
        if !dhcp.excluded.contains(&range) {
            dhcp.excluded.push(range);
        }
        ok()
    }

    pub(super) fn no_dhcp_excluded(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let range = Self::excluded_range(&args)?;
        let dhcp = &mut self.router_mut(net)?.dhcp;
        let before = dhcp.excluded.len();
        dhcp.excluded.retain(|r| *r != range);
        if dhcp.excluded.len() == before {
            return Err(CliError::NotFound("Excluded range"));
        }
        ok()
    }

    pub(super) fn access_list_extended(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let name = args.req(0)?;
        let name = self.router_mut(net)?.ensure_acl(name).name.clone();
        self.clear_bound();
        self.acl = Some(name);
        self.mode = Mode::AclConfig;
        ok()
    }

    pub(super) fn no_access_list_extended(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let name = args.req(0)?;
        let router = self.router_mut(net)?;
        let before = router.acls.len();
        router.acls.retain(|a| !a.name.eq_ignore_ascii_case(name));
        if router.acls.len() == before {
            return Err(CliError::NotFound("Access-list"));
        }
        ok()
    }

    /// `access-list <n> permit|deny any | host <ip> | <net> [wildcard]`
    pub(super) fn access_list_standard(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let number: u32 = args.number(0)?;
        if !(1..=99).contains(&number) && !(1300..=1999).contains(&number) {
            return Err(CliError::Invalid("access list number"));
        }
        let action = AclAction::parse(args.req(1)?).ok_or(CliError::InvalidSyntax)?;
        let source = args.req(2)?;
        let (network, wildcard) = if source.eq_ignore_ascii_case("any") {
            (Ipv4Addr::UNSPECIFIED, Ipv4Addr::BROADCAST)
        } else if source.eq_ignore_ascii_case("host") {
            (args.ip(3)?, Ipv4Addr::UNSPECIFIED)
        } else {
            let wildcard = match args.get(3) {
                Some(w) => parse_ip(w)?,
                None => Ipv4Addr::UNSPECIFIED,
            };
            (parse_ip(source)?, wildcard)
        };
        self.router_mut(net)?
            .add_standard_acl(number, action, network, wildcard);
        ok()
    }

    pub(super) fn no_access_list_standard(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let number: u32 = args.number(0)?;
        if self.router_mut(net)?.remove_standard_acl(number) {
            ok()
        } else {
            Err(CliError::NotFound("Access-list"))
        }
    }

    /// `ip nat inside source list <n> interface <if> overload`
    pub(super) fn nat_rule(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let acl_number: u32 = args.number(0)?;
        if !args.keyword(1, "interface") {
            return Err(CliError::InvalidSyntax);
        }
        let outside = args.req(2)?;
        if !args.keyword(3, "overload") {
            return Err(CliError::Unsupported("Only interface overload (PAT) is supported."));
        }
        let router = self.router_mut(net)?;
        let outside_interface = router
            .interface(outside)
            .map(|i| i.name.clone())
            .ok_or(CliError::Invalid("interface"))?;
        router.nat.rule = Some(NatRule {
            acl_number,
            outside_interface,
            overload: true,
        });
        ok()
    }

    pub(super) fn no_nat_rule(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        let router = self.router_mut(net)?;
        if router.nat.rule.take().is_none() {
            return Err(CliError::NotFound("NAT rule"));
        }
        router.nat.clear();
        ok()
    }

    pub(super) fn router_ospf(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let pid: u32 = args.number(0)?;
        if pid == 0 {
            return Err(CliError::Invalid("process id"));
        }
        self.router_mut(net)?.ospf_ensure_process(pid);
        self.clear_bound();
        self.ospf = Some(pid);
        self.mode = Mode::RouterOspfConfig;
        ok()
    }

    pub(super) fn no_router_ospf(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let pid: u32 = args.number(0)?;
        if self.router_mut(net)?.ospf_remove_process(pid) {
            ok()
        } else {
            Err(CliError::NotFound("OSPF process"))
        }
    }

    pub(super) fn line_console(&mut self, _net: &mut Network, args: Args<'_>) -> CliResult {
        if args.req(0)? != "0" {
            return Err(CliError::InvalidSyntax);
        }
        self.clear_bound();
        self.mode = Mode::LineConsoleConfig;
        ok()
    }

    pub(super) fn mac_aging(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let secs: u64 = args.number(0)?;
        self.router_mut(net)?.mac_aging_secs = secs;
        ok()
    }

    // ---- interface ----

    pub(super) fn ip_address(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let name = self.bound_interface()?;
        let ip = args.ip(0)?;
        let mask = args.ip(1)?;
        if ipv4::mask_to_prefix(mask).is_none() {
            return Err(CliError::Invalid("subnet mask"));
        }
        let router = self.router_mut(net)?;
        if router.is_switchport_capable(&name) {
            return Err(CliError::Unsupported("IP addresses cannot be assigned to switchports."));
        }
        let itf = router.interface_mut(&name).ok_or(CliError::NotFound("Interface"))?;
        itf.addr = Some(IfAddr { ip, mask });
        net.refresh_links();
        ok()
    }

    pub(super) fn no_ip_address(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        let name = self.bound_interface()?;
        let itf = self
            .router_mut(net)?
            .interface_mut(&name)
            .ok_or(CliError::NotFound("Interface"))?;
        itf.addr = None;
        net.refresh_links();
        ok()
    }

    fn set_admin(&mut self, net: &mut Network, up: bool) -> CliResult {
        let name = self.bound_interface()?;
        let itf = self
            .router_mut(net)?
            .interface_mut(&name)
            .ok_or(CliError::NotFound("Interface"))?;
        itf.admin_up = up;
        net.refresh_links();
        ok()
    }

    pub(super) fn shutdown(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        self.set_admin(net, false)
    }

    pub(super) fn no_shutdown(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        self.set_admin(net, true)
    }

    pub(super) fn encapsulation(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let name = self.bound_interface()?;
        if !args.req(0)?.eq_ignore_ascii_case("dot1q") {
            return Err(CliError::Invalid("encapsulation type"));
        }
        let vlan = args.vlan(1)?;
        let itf = self
            .router_mut(net)?
            .interface_mut(&name)
            .ok_or(CliError::NotFound("Interface"))?;
        if !itf.is_subinterface() {
            return Err(CliError::Unsupported(
                "Encapsulation is only supported on subinterfaces (e.g., Gi0/0.10).",
            ));
        }
        itf.dot1q = Some(vlan);
        ok()
    }

    pub(super) fn access_group(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let name = self.bound_interface()?;
        let acl = args.req(0)?;
        let inbound = match args.req(1)?.to_ascii_lowercase().as_str() {
            "in" => true,
            "out" => false,
            _ => return Err(CliError::InvalidSyntax),
        };
        let router = self.router_mut(net)?;
        let acl = router
            .acl(acl)
            .map(|a| a.name.clone())
            .ok_or(CliError::NotFound("Access-list"))?;
        let itf = router.interface_mut(&name).ok_or(CliError::NotFound("Interface"))?;
        if inbound {
            itf.acl_in = Some(acl);
        } else {
            itf.acl_out = Some(acl);
        }
        ok()
    }

    /// `no ip access-group [<acl>] in|out`
    pub(super) fn no_access_group(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let name = self.bound_interface()?;
        let dir = args.req(args.len().saturating_sub(1))?.to_ascii_lowercase();
        let itf = self
            .router_mut(net)?
            .interface_mut(&name)
            .ok_or(CliError::NotFound("Interface"))?;
        match dir.as_str() {
            "in" => itf.acl_in = None,
            "out" => itf.acl_out = None,
            _ => return Err(CliError::InvalidSyntax),
        }
        ok()
    }

    fn set_nat(&mut self, net: &mut Network, side: NatSide, enable: bool) -> CliResult {
        let name = self.bound_interface()?;
        let router = self.router_mut(net)?;
        let current = router.nat_side(&name);
        let target = match (enable, current == side) {
            (true, _) => side,
            (false, true) => NatSide::None,
            (false, false) => current,
        };
        if !router.set_nat_side(&name, target) {
            return Err(CliError::NotFound("Interface"));
        }
        ok()
    }

    pub(super) fn nat_inside(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        self.set_nat(net, NatSide::Inside, true)
    }

    pub(super) fn nat_outside(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        self.set_nat(net, NatSide::Outside, true)
    }

    pub(super) fn no_nat_inside(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        self.set_nat(net, NatSide::Inside, false)
    }

    pub(super) fn no_nat_outside(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        self.set_nat(net, NatSide::Outside, false)
    }

    pub(super) fn description(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let name = self.bound_interface()?;
        let text = args.rest(0);
        if text.is_empty() {
            return Err(CliError::IncompleteCommand);
        }
        let itf = self
            .router_mut(net)?
            .interface_mut(&name)
            .ok_or(CliError::NotFound("Interface"))?;
        itf.description = Some(text);
        ok()
    }

    pub(super) fn no_description(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        let name = self.bound_interface()?;
        if let Some(itf) = self.router_mut(net)?.interface_mut(&name) {
            itf.description = None;
        }
        ok()
    }

    /// 只作用于 HWIC-4ESW 交换口，不影响三层接口状态。
    pub(super) fn switchport(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let name = self.bound_interface()?;
        let cmd = SwitchportCommand::parse(args)?;
        let port = self
            .router_mut(net)?
            .switchport_mut(&name)
            .ok_or(CliError::Unsupported(
                "Switchport commands are only supported on HWIC-4ESW ports.",
            ))?;
        cmd.apply(&mut port.config);
        ok()
    }

    // ---- dhcp pool ----

    pub(super) fn pool_network(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let pool = self.bound_pool()?;
        let network = args.ip(0)?;
        let mask = args.ip(1)?;
        if ipv4::mask_to_prefix(mask).is_none() {
            return Err(CliError::Invalid("subnet mask"));
        }
        let p = self
            .router_mut(net)?
            .dhcp
            .pool_mut(&pool)
            .ok_or(CliError::NotFound("Pool"))?;
        p.network = ipv4::network_of(network, mask);
        p.mask = mask;
        ok()
    }

    pub(super) fn pool_default_router(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let pool = self.bound_pool()?;
        let ip = args.ip(0)?;
        self.router_mut(net)?
            .dhcp
            .pool_mut(&pool)
            .ok_or(CliError::NotFound("Pool"))?
            .default_router = ip;
        ok()
    }

    pub(super) fn pool_dns_server(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let pool = self.bound_pool()?;
        let ip = args.ip(0)?;
        self.router_mut(net)?
            .dhcp
            .pool_mut(&pool)
            .ok_or(CliError::NotFound("Pool"))?
            .dns_server = ip;
        ok()
    }

    /// 主机号范围 2..=254，起点不大于终点
    pub(super) fn pool_range(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let pool = self.bound_pool()?;
        let start = host_number(args.req(0)?)?;
        let end = host_number(args.req(1)?)?;
        if !(2..=254).contains(&start) || !(2..=254).contains(&end) || start > end {
            return Err(CliError::Invalid("range"));
        }
        let p = self
            .router_mut(net)?
            .dhcp
            .pool_mut(&pool)
            .ok_or(CliError::NotFound("Pool"))?;
        p.start_host = start;
        p.end_host = end;
        ok()
    }

    // ---- extended acl ----

    fn add_ace(&mut self, net: &mut Network, sequence: Option<u32>, action: AclAction, args: Args<'_>) -> CliResult {
        let acl = self.acl.clone().ok_or(CliError::DeviceNotReady)?;
        let protocol = AclProtocol::parse(args.req(0)?).ok_or(CliError::InvalidSyntax)?;
        let (src, i) = acl_address(&args, 1)?;
        let (dst, i) = acl_address(&args, i)?;
        let dst_port = if args.keyword(i, "eq") {
            if !protocol.has_ports() {
                return Err(CliError::Unsupported("'eq' is only valid for tcp/udp."));
            }
            Some(args.number::<u16>(i + 1)?)
        } else if args.get(i).is_some() {
            return Err(CliError::InvalidSyntax);
        } else {
            None
        };
        let rule = AclRule {
            sequence: 0,
            action,
            protocol,
            src,
            dst,
            dst_port,
        };
        self.router_mut(net)?.ensure_acl(&acl).add_rule(rule, sequence);
        ok()
    }

    pub(super) fn ace_permit(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        self.add_ace(net, None, AclAction::Permit, args)
    }

    pub(super) fn ace_deny(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        self.add_ace(net, None, AclAction::Deny, args)
    }

    /// `<seq> permit|deny …`
    pub(super) fn ace_with_sequence(&mut self, net: &mut Network, line: &Line) -> CliResult {
        let sequence = line.words[0].parse::<u32>().map_err(|_| CliError::InvalidSyntax)?;
        let action = line
            .words
            .get(1)
            .and_then(|w| AclAction::parse(w))
            .ok_or(CliError::InvalidSyntax)?;
        self.add_ace(net, Some(sequence), action, Args::new(&line.words[2..]))
    }

    pub(super) fn no_ace(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let acl = self.acl.clone().ok_or(CliError::DeviceNotReady)?;
        let sequence: u32 = args.number(0)?;
        if self.router_mut(net)?.ensure_acl(&acl).remove_sequence(sequence) {
            ok()
        } else {
            Err(CliError::NotFound("Sequence"))
        }
    }

    // ---- ospf ----

    pub(super) fn ospf_network(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let pid = self.bound_ospf()?;
        let network = args.ip(0)?;
        let wildcard = args.ip(1)?;
        if !args.keyword(2, "area") {
            return Err(CliError::IncompleteCommand);
        }
        let area_text = args.req(3)?;
        let area = match area_text.parse::<u32>() {
            Ok(a) => a,
            Err(_) => u32::from(parse_ip(area_text)?),
        };
        if area != 0 {
            return Err(CliError::Unsupported("Only area 0 is supported."));
        }
        if self.router_mut(net)?.ospf_add_network(pid, network, wildcard, area) {
            ok()
        } else {
            Err(CliError::NotFound("OSPF process"))
        }
    }

    fn ospf_passive_set(&mut self, net: &mut Network, args: Args<'_>, passive: bool) -> CliResult {
        let pid = self.bound_ospf()?;
        let raw = args.rest(0);
        if raw.is_empty() {
            return Err(CliError::IncompleteCommand);
        }
        let router = self.router_mut(net)?;
        let name = router
            .interface(&raw)
            .map(|i| i.name.clone())
            .ok_or(CliError::Invalid("interface"))?;
        router.ospf_set_passive(pid, &name, passive);
        ok()
    }

    pub(super) fn ospf_passive(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        self.ospf_passive_set(net, args, true)
    }

    pub(super) fn ospf_no_passive(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        self.ospf_passive_set(net, args, false)
    }

    pub(super) fn ospf_router_id(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let pid = self.bound_ospf()?;
        let id = args.ip(0)?;
        self.router_mut(net)?.ospf_ensure_process(pid).router_id = Some(id);
        ok()
    }

    pub(super) fn ospf_no_router_id(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        let pid = self.bound_ospf()?;
        self.router_mut(net)?.ospf_ensure_process(pid).router_id = None;
        ok()
    }

    // ---- line console ----

    /// 密码取整行剩余部分，可以带空格
    pub(super) fn line_password(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        let pw = args.rest(0);
        if pw.is_empty() {
            return Err(CliError::IncompleteCommand);
        }
        self.router_mut(net)?.console.password = pw;
        ok()
    }

    pub(super) fn line_login(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        self.router_mut(net)?.console.login = true;
        ok()
    }

    pub(super) fn line_no_login(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        self.router_mut(net)?.console.login = false;
        ok()
    }

    // ---- priv exec ----

    pub(super) fn write_memory(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        let text = crate::config::serialize_router(net, self.device).ok_or(CliError::DeviceNotReady)?;
        net.device_mut(self.device).startup_config = Some(text);
        Ok("Building configuration...\n[OK]".to_string())
    }

    pub(super) fn clear_nat(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        self.router_mut(net)?.nat.clear();
        Ok("NAT translations cleared.".to_string())
    }

    pub(super) fn clear_arp(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        self.router_mut(net)?.arp.clear();
        ok()
    }

    pub(super) fn clear_mac_table(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        self.router_mut(net)?.mac_table.clear();
        ok()
    }
}

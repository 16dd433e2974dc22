//! 路由器配置序列化

use super::{script, switchport_lines};
use crate::device::Router;
use crate::device::router::NatSide;
use crate::net::{DeviceId, Network};

/// 路由器内嵌交换机 MAC 老化的出厂值
const DEFAULT_MAC_AGING_SECS: u64 = 30;

/// ACL 在接口之前输出：`ip access-group` 只接受已定义的 ACL。
fn acls(out: &mut Vec<String>, r: &Router) {
    for e in &r.standard_acls {
        out.push(format!(
            "access-list {} {} {} {}",
            e.number, e.action, e.network, e.wildcard
        ));
    }
    for acl in &r.acls {
        out.push(format!("ip access-list extended {}", acl.name));
        let mut rules: Vec<_> = acl.rules.iter().collect();
        rules.sort_by_key(|rule| rule.sequence);
        out.extend(rules.into_iter().map(|rule| format!(" {rule}")));
        out.push(" exit".to_string());
    }
}

fn interfaces(out: &mut Vec<String>, r: &Router) {
    for itf in &r.interfaces {
        out.push(format!("interface {}", itf.name));
        if let Some(desc) = &itf.description {
            out.push(format!(" description {desc}"));
        }
        if let Some(vlan) = itf.dot1q {
            out.push(format!(" encapsulation dot1Q {vlan}"));
        }
        if let Some(a) = itf.addr {
            out.push(format!(" ip address {} {}", a.ip, a.mask));
        }
        match itf.nat {
            NatSide::Inside => out.push(" ip nat inside".to_string()),
            NatSide::Outside => out.push(" ip nat outside".to_string()),
            NatSide::None => {}
        }
        if let Some(acl) = &itf.acl_in {
            out.push(format!(" ip access-group {acl} in"));
        }
        if let Some(acl) = &itf.acl_out {
            out.push(format!(" ip access-group {acl} out"));
        }
        if let Some(sp) = r.switchport(&itf.name) {
            switchport_lines(out, &sp.config);
        }
        out.push(if itf.admin_up { " no shutdown" } else { " shutdown" }.to_string());
        out.push(" exit".to_string());
    }
}

fn routes(out: &mut Vec<String>, r: &Router) {
    for route in &r.static_routes {
        let target = match (&route.exit_interface, route.next_hop) {
            (Some(exit), Some(nh)) => format!("{exit} {nh}"),
            (Some(exit), None) => exit.clone(),
            (None, Some(nh)) => nh.to_string(),
            (None, None) => continue,
        };
        out.push(format!("ip route {} {} {target}", route.network, route.mask));
    }
}

fn dhcp(out: &mut Vec<String>, r: &Router) {
    for (lo, hi) in &r.dhcp.excluded {
        if lo == hi {
            out.push(format!("ip dhcp excluded-address {lo}"));
        } else {
            out.push(format!("ip dhcp excluded-address {lo} {hi}"));
        }
    }
    for p in &r.dhcp.pools {
        out.push(format!("ip dhcp pool {}", p.name));
        if !p.network.is_unspecified() {
            out.push(format!(" network {} {}", p.network, p.mask));
        }
        if !p.default_router.is_unspecified() {
            out.push(format!(" default-router {}", p.default_router));
        }
        if !p.dns_server.is_unspecified() {
            out.push(format!(" dns-server {}", p.dns_server));
        }
        out.push(format!(" address range {} {}", p.start_host, p.end_host));
        out.push(" exit".to_string());
    }
}

fn ospf(out: &mut Vec<String>, r: &Router) {
    for p in &r.ospf {
        out.push(format!("router ospf {}", p.pid));
        if let Some(id) = p.router_id {
            out.push(format!(" router-id {id}"));
        }
        for n in &p.networks {
            out.push(format!(" network {} {} area {}", n.network, n.wildcard, n.area));
        }
        for i in &p.passive {
            out.push(format!(" passive-interface {i}"));
        }
        out.push(" exit".to_string());
    }
}

/// 路由器的运行配置脚本；设备不是路由器时返回 `None`。
pub fn serialize_router(net: &Network, dev: DeviceId) -> Option<String> {
    let r = net.router(dev)?;
    let mut out = vec![
        "enable".to_string(),
        "configure terminal".to_string(),
        format!("hostname {}", net.device(dev).name),
    ];
    acls(&mut out, r);
    interfaces(&mut out, r);
    routes(&mut out, r);
    dhcp(&mut out, r);
    if let Some(rule) = &r.nat.rule {
        out.push(format!(
            "ip nat inside source list {} interface {} overload",
            rule.acl_number, rule.outside_interface
        ));
    }
    ospf(&mut out, r);

    out.push("line console 0".to_string());
    if !r.console.password.is_empty() {
        out.push(format!(" password {}", r.console.password));
    }
    out.push(if r.console.login { " login" } else { " no login" }.to_string());
    out.push(" exit".to_string());

    if r.mac_aging_secs != DEFAULT_MAC_AGING_SECS {
        out.push(format!("mac address-table aging-time {}", r.mac_aging_secs));
    }
    out.push("end".to_string());
    out.push("write memory".to_string());
    Some(script(out))
}

//! 路由器 show 命令

use super::RouterSession;
use crate::cli::error::{CliError, CliResult};
use crate::cli::mac_address_table;
use crate::cli::tokens::Args;
use crate::device::router::RouteEntry;
use crate::net::{DeviceId, Network};

fn route_lines(entries: Vec<RouteEntry>) -> Vec<String> {
    let mut rows: Vec<(u32, u8, String)> = entries
        .into_iter()
        .map(|e| match e {
            RouteEntry::Connected { network, prefix, interface } => (
                u32::from(network),
                0,
                format!("C    {network}/{prefix} is directly connected, {interface}"),
            ),
            RouteEntry::Local { ip, interface } => (
                u32::from(ip),
                1,
                format!("L    {ip}/32 is directly connected, {interface}"),
            ),
            RouteEntry::Static(r) => {
                let prefix = r.prefix_len();
                let text = match (&r.next_hop, &r.exit_interface) {
                    (Some(nh), _) => format!("S    {}/{prefix} [1/0] via {nh}", r.network),
                    (None, Some(exit)) => {
                        format!("S    {}/{prefix} is directly connected, {exit}", r.network)
                    }
                    (None, None) => format!("S    {}/{prefix}", r.network),
                };
                (u32::from(r.network), 2, text)
            }
        })
        .collect();
    rows.sort();
    rows.into_iter().map(|(_, _, t)| t).collect()
}

/// 与本路由器直连、同在 OSPF 中的邻居：`(neighbor id, 地址, 本端接口)`
fn ospf_neighbors(net: &Network, dev: DeviceId) -> Vec<(String, String, String)> {
    let Some(router) = net.router(dev) else {
        return Vec::new();
    };
    let mut out = Vec::new();
    for (_, local_if) in router.ospf_active_interfaces() {
        let Some(local_addr) = router.interface(&local_if).and_then(|i| i.usable_addr()) else {
            continue;
        };
        let Some(port) = net.find_port(dev, &local_if) else {
            continue;
        };
        if !net.has_link(port) {
            continue;
        }
        let Some(peer_port) = net.peer(port) else {
            continue;
        };
        let peer_dev = net.port(peer_port).owner;
        let Some(peer) = net.router(peer_dev) else {
            continue;
        };
        let phys = net.port(peer_port).interface_name.as_str();
        for (pid, peer_if) in peer.ospf_active_interfaces() {
            let Some(itf) = peer.interface(&peer_if) else {
                continue;
            };
            let Some(addr) = itf.usable_addr() else {
                continue;
            };
            if !itf.physical_name().eq_ignore_ascii_case(phys) || !local_addr.contains(addr.ip) {
                continue;
            }
            let rid = peer
                .ospf_router_id(pid)
                .map(|ip| ip.to_string())
                .unwrap_or_else(|| addr.ip.to_string());
            out.push((rid, addr.ip.to_string(), local_if.clone()));
        }
    }
    out
}

impl RouterSession {
    pub(super) fn show_ip_interface_brief(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        let router = self.router(net)?;
        let mut out = String::from(
            "Interface              IP-Address      OK? Method Status                Protocol\n",
        );
        for itf in &router.interfaces {
            let method = if itf.addr.is_some() { "manual" } else { "unset" };
            let status = if itf.admin_up { "up" } else { "administratively down" };
            let proto = if itf.protocol_up { "up" } else { "down" };
            out.push_str(&format!(
                "{:<22} {:<15} YES {method:<6} {status:<20} {proto}\n",
                itf.name,
                itf.ip_text()
            ));
        }
        Ok(out.trim_end_matches('\n').to_string())
    }

    pub(super) fn show_ip_route(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        let router = self.router(net)?;
        let mut out = String::from("Codes: C - connected, S - static, L - local\n\n");
        match router.gateway_of_last_resort() {
            Some(via) => out.push_str(&format!("Gateway of last resort is {via} to network 0.0.0.0\n")),
            None => out.push_str("Gateway of last resort is not set\n"),
        }
        let lines = route_lines(router.route_entries());
        if !lines.is_empty() {
            out.push('\n');
            out.push_str(&lines.join("\n"));
        }
        Ok(out.trim_end_matches('\n').to_string())
    }

    pub(super) fn show_running_config(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        crate::config::serialize_router(net, self.device).ok_or(CliError::DeviceNotReady)
    }

    pub(super) fn show_startup_config(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        Ok(net
            .device(self.device)
            .startup_config
            .clone()
            .unwrap_or_else(|| "startup-config is not present".to_string()))
    }

    pub(super) fn show_access_lists(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        let router = self.router(net)?;
        if router.acls.is_empty() && router.standard_acls.is_empty() {
            return Ok("No access lists configured.".to_string());
        }
        let mut blocks = Vec::new();
        let mut numbers: Vec<u32> = router.standard_acls.iter().map(|e| e.number).collect();
        numbers.sort_unstable();
        numbers.dedup();
        for n in numbers {
            let mut block = format!("Standard IP access list {n}");
            for e in router.standard_acls.iter().filter(|e| e.number == n) {
                block.push_str(&format!("\n  {} {} {}", e.action, e.network, e.wildcard));
            }
            blocks.push(block);
        }
        for acl in &router.acls {
            let mut block = format!("Extended IP access list {}", acl.name);
            if acl.rules.is_empty() {
                block.push_str("\n  (empty)");
            }
            for r in &acl.rules {
                block.push_str(&format!("\n  {r}"));
            }
            blocks.push(block);
        }
        Ok(blocks.join("\n\n"))
    }

    pub(super) fn show_arp(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        let now = net.now();
        let router = self.router(net)?;
        if router.arp.is_empty() {
            return Ok("No ARP entries.".to_string());
        }
        let mut out = String::from(
            "Protocol  Address          Age (min)  Hardware Addr   Type   Interface\n",
        );
        for e in router.arp.entries() {
            let age = now.since(e.last_seen).as_secs() / 60;
            out.push_str(&format!(
                "Internet  {:<15} {age:<9}  {:<14}  ARPA   {}\n",
                e.ip.to_string(),
                e.mac,
                e.interface.as_deref().unwrap_or("")
            ));
        }
        Ok(out.trim_end_matches('\n').to_string())
    }

    pub(super) fn show_nat_translations(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        let router = self.router(net)?;
        if router.nat.translations.is_empty() {
            return Ok("No NAT translations.".to_string());
        }
        let mut out = String::from(
            "Pro  Inside global      Inside local       Outside global     Outside local\n\
             ---  ----------------  ----------------  ----------------  ----------------\n",
        );
        for t in &router.nat.translations {
            out.push_str(&format!(
                "{:<3}  {:<16}  {:<16}  {:<16}  {:<16}\n",
                t.protocol.to_string(),
                t.inside_global.to_string(),
                t.inside_local.to_string(),
                t.outside_global.to_string(),
                t.outside_local.to_string()
            ));
        }
        Ok(out.trim_end().to_string())
    }

    pub(super) fn show_nat_statistics(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        let router = self.router(net)?;
        let rule = match &router.nat.rule {
            Some(r) => format!(
                "Inside source list {} interface {} overload",
                r.acl_number, r.outside_interface
            ),
            None => "NAT is not configured.".to_string(),
        };
        Ok(format!(
            "NAT statistics:\n  Total active translations: {}\n  Rule: {rule}",
            router.nat.translations.len()
        ))
    }

    pub(super) fn show_dhcp_binding(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        let router = self.router(net)?;
        let mut leases: Vec<_> = router.dhcp.leases().collect();
        if leases.is_empty() {
            return Ok("Bindings from all pools are empty.".to_string());
        }
        leases.sort_by_key(|l| l.ip);
        let mut out = String::from(
            "IP address      Client-ID/MAC        Pool        Issued\n\
             --------------- -------------------- ----------- ------------------------\n",
        );
        for l in leases {
            out.push_str(&format!(
                "{:<15} {:<20} {:<11} {}\n",
                l.ip.to_string(),
                l.mac,
                l.pool,
                l.issued_at
            ));
        }
        Ok(out.trim_end_matches('\n').to_string())
    }

    pub(super) fn show_dhcp_pool(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        let router = self.router(net)?;
        if router.dhcp.pools.is_empty() {
            return Ok("No DHCP pools configured.".to_string());
        }
        let blocks: Vec<String> = router
            .dhcp
            .pools
            .iter()
            .map(|p| {
                format!(
                    "Pool {} :\n  Network: {} {}\n  Default-router: {}\n  DNS-server: {}\n  Range: host {} - {}\n  Active leases: {}",
                    p.name,
                    p.network,
                    p.mask,
                    p.default_router,
                    p.dns_server,
                    p.start_host,
                    p.end_host,
                    p.leases.len()
                )
            })
            .collect();
        Ok(blocks.join("\n\n"))
    }

    pub(super) fn show_ip_protocols(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        let router = self.router(net)?;
        if router.ospf.is_empty() {
            return Ok("No routing protocols configured.".to_string());
        }
        let blocks: Vec<String> = router
            .ospf
            .iter()
            .map(|p| {
                let rid = router
                    .ospf_router_id(p.pid)
                    .map(|ip| ip.to_string())
                    .unwrap_or_else(|| "0.0.0.0".to_string());
                let mut block = format!(
                    "Routing Protocol is \"ospf {}\"\n  Router ID {rid}\n  Routing for Networks:",
                    p.pid
                );
                for n in &p.networks {
                    block.push_str(&format!("\n    {} {} area {}", n.network, n.wildcard, n.area));
                }
                if !p.passive.is_empty() {
                    block.push_str("\n  Passive Interface(s):");
                    for i in &p.passive {
                        block.push_str(&format!("\n    {i}"));
                    }
                }
                block
            })
            .collect();
        Ok(blocks.join("\n\n"))
    }

    pub(super) fn show_ospf_neighbor(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        self.router(net)?;
        let neighbors = ospf_neighbors(net, self.device);
        let mut out = String::from(
            "Neighbor ID     Pri   State           Dead Time   Address         Interface\n",
        );
        for (rid, addr, itf) in neighbors {
            out.push_str(&format!(
                "{rid:<15} {:<5} {:<15} {:<11} {addr:<15} {itf}\n",
                1, "FULL/  -", "00:00:35"
            ));
        }
        Ok(out.trim_end_matches('\n').to_string())
    }

    pub(super) fn show_mac_table(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        let now = net.now();
        let router = self.router_mut(net)?;
        router.purge_macs(now);
        Ok(mac_address_table(router.mac_table.entries()))
    }

    pub(super) fn show_version(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        let device = net.device(self.device);
        let router = self.router(net)?;
        let mut out = format!(
            "Cisco IOS Software, iossim router\n{} uptime is {}\n",
            device.name,
            net.now()
        );
        for s in &router.slots {
            let module = s
                .installed
                .map(|m| m.to_string())
                .unwrap_or_else(|| "empty".to_string());
            out.push_str(&format!("Slot {} ({}): {module}\n", s.index, s.slot_type));
        }
        out.push_str(&format!("{} interfaces", router.interfaces.len()));
        Ok(out)
    }
}

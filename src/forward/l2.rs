//! 二层转发
//!
//! 从某个入口端口出发，在交换机（含接入点与路由器内嵌交换口）之间递归转发一帧：
//! 入口学习源 MAC，已知目的 MAC 单播，未知则泛洪。访问集合
//! (设备, VLAN, 入接口) 保证在成环拓扑中也能终止。

use std::collections::HashSet;

use super::packet::{BROADCAST_MAC, Frame};
use crate::device::switch::StpState;
use crate::net::{DeviceId, Network, PortId, ifname};
use tracing::trace;

/// 已访问的 (设备, VLAN, 入接口)
pub type Visited = HashSet<(DeviceId, u16, String)>;

fn visit(visited: &mut Visited, dev: DeviceId, vlan: u16, ingress: &str) -> bool {
    visited.insert((dev, vlan, ifname::normalize(ingress).to_ascii_lowercase()))
}

/// 端口链路对端：(设备, 接口名)
fn remote_of(net: &Network, port: PortId) -> Option<(DeviceId, String)> {
    let peer = net.peer(port)?;
    let remote = net.port(peer);
    Some((remote.owner, remote.interface_name.clone()))
}

/// 主机网卡所连接入口的 VLAN；直连路由口或主机时为 `None`。
pub fn access_vlan(net: &Network, nic: PortId) -> Option<u16> {
    let (owner, rif) = remote_of(net, nic)?;
    if let Some(sw) = net.switch(owner) {
        return Some(sw.ingress_vlan(&rif));
    }
    net.router(owner)
        .filter(|r| r.is_switchport_capable(&rif))
        .map(|r| r.ingress_vlan(&rif))
}

/// 帧从 `remote` 口进入对端设备后能否到达目的设备。`out_vlan` 为上游打的 802.1Q 标签。
pub fn reach_from_remote(
    net: &mut Network,
    remote: PortId,
    out_vlan: Option<u16>,
    frame: &Frame,
    visited: &mut Visited,
) -> bool {
    let owner = net.port(remote).owner;
    let rif = net.port(remote).interface_name.clone();
    if owner == frame.destination {
        return true;
    }
    if let Some(sw) = net.switch(owner) {
        let vlan = out_vlan.unwrap_or_else(|| sw.ingress_vlan(&rif));
        let admitted = sw.port(&rif).is_some_and(|p| p.admin_up) && sw.vlan_allowed(&rif, vlan);
        if !admitted {
            return false;
        }
        return forward_at_switch(net, owner, &rif, vlan, frame, visited);
    }
    if let Some(r) = net.router(owner).filter(|r| r.is_switchport_capable(&rif)) {
        let vlan = out_vlan.unwrap_or_else(|| r.ingress_vlan(&rif));
        return forward_at_router_switch(net, owner, &rif, vlan, frame, visited);
    }
    false
}

/// 从主机网卡出发能否到达目的设备（用于确认网关或 DHCP 服务器可达）。
pub fn reach_device(net: &mut Network, nic: PortId, src_mac: &str, destination: DeviceId) -> bool {
    if !net.has_link(nic) {
        return false;
    }
    let Some(peer) = net.peer(nic) else {
        return false;
    };
    let frame = Frame {
        src_mac: src_mac.to_string(),
        dst_mac: BROADCAST_MAC.to_string(),
        destination,
    };
    reach_from_remote(net, peer, None, &frame, &mut Visited::new())
}

#[tracing::instrument(skip(net, frame, visited), fields(dst = %frame.dst_mac))]
fn forward_at_switch(
    net: &mut Network,
    dev: DeviceId,
    ingress: &str,
    vlan: u16,
    frame: &Frame,
    visited: &mut Visited,
) -> bool {
    if !visit(visited, dev, vlan, ingress) {
        return false;
    }
    let now = net.now();
    let Some(sw) = net.switch_mut(dev) else {
        return false;
    };
    sw.purge_macs(now);
    sw.learn_mac(&frame.src_mac, vlan, ingress, now);
    if let Some(out) = sw.lookup_mac(&frame.dst_mac, vlan).map(str::to_string) {
        trace!(%out, "已知 MAC，单播");
        return send_out_switch_port(net, dev, &out, vlan, frame, visited);
    }

    let links = net.link_states(dev);
    let Some(sw) = net.switch(dev) else {
        return false;
    };
    let mut flooded = HashSet::new();
    let mut candidates = Vec::new();
    for p in &sw.ports {
        if ifname::same_interface(&p.name, ingress)
            || !p.admin_up
            || !links.is_up(&p.name)
            || p.stp_state == StpState::Blocking
            || !sw.vlan_allowed(&p.name, vlan)
        {
            continue;
        }
        // 成组 channel 只泛洪一次
        let logical = match sw.formed_channel_of(&p.name) {
            Some(gid) => ifname::port_channel_name(gid),
            None => p.name.clone(),
        };
        if flooded.insert(logical.to_ascii_lowercase()) {
            candidates.push(logical);
        }
    }
    candidates
        .iter()
        .any(|out| send_out_switch_port(net, dev, out, vlan, frame, visited))
}

fn send_out_switch_port(
    net: &mut Network,
    dev: DeviceId,
    egress: &str,
    vlan: u16,
    frame: &Frame,
    visited: &mut Visited,
) -> bool {
    let Some(sw) = net.switch(dev) else {
        return false;
    };
    let Some(phys) = sw.resolve_egress(egress, &frame.src_mac, &frame.dst_mac) else {
        return false;
    };
    let Some(cfg) = sw.port(&phys) else {
        return false;
    };
    if !cfg.admin_up || cfg.stp_state == StpState::Blocking || !sw.vlan_allowed(&cfg.name, vlan) {
        return false;
    }
    let Some(port) = net.find_port(dev, &cfg.name).filter(|&p| net.has_link(p)) else {
        return false;
    };
    let Some((owner, rif)) = remote_of(net, port) else {
        return false;
    };
    if owner == frame.destination {
        return true;
    }
    if let Some(next) = net.switch(owner) {
        let Some(next_cfg) = next.port(&rif) else {
            return false;
        };
        if !next_cfg.admin_up
            || next_cfg.stp_state == StpState::Blocking
            || !next.vlan_allowed(&rif, vlan)
        {
            return false;
        }
        return forward_at_switch(net, owner, &rif, vlan, frame, visited);
    }
    if net.router(owner).is_some_and(|r| r.is_switchport_capable(&rif)) {
        return forward_at_router_switch(net, owner, &rif, vlan, frame, visited);
    }
    false
}

fn forward_at_router_switch(
    net: &mut Network,
    dev: DeviceId,
    ingress: &str,
    vlan: u16,
    frame: &Frame,
    visited: &mut Visited,
) -> bool {
    if !visit(visited, dev, vlan, ingress) {
        return false;
    }
    let now = net.now();
    let Some(r) = net.router_mut(dev) else {
        return false;
    };
    r.purge_macs(now);
    r.learn_mac(&frame.src_mac, vlan, ingress, now);
    if let Some(out) = r.mac_table.lookup(&frame.dst_mac, vlan).map(str::to_string) {
        return send_out_router_switchport(net, dev, &out, vlan, frame, visited);
    }

    let candidates: Vec<String> = net
        .router(dev)
        .map(|r| {
            r.switchports
                .iter()
                .filter(|sp| !ifname::same_interface(&sp.name, ingress))
                .map(|sp| sp.name.clone())
                .collect()
        })
        .unwrap_or_default();
    candidates
        .iter()
        .any(|out| send_out_router_switchport(net, dev, out, vlan, frame, visited))
}

fn send_out_router_switchport(
    net: &mut Network,
    dev: DeviceId,
    egress: &str,
    vlan: u16,
    frame: &Frame,
    visited: &mut Visited,
) -> bool {
    let Some(r) = net.router(dev) else {
        return false;
    };
    if !r.switchport_allows(egress, vlan) || !r.interface(egress).is_some_and(|i| i.admin_up) {
        return false;
    }
    let Some(port) = net.find_port(dev, egress).filter(|&p| net.has_link(p)) else {
        return false;
    };
    let Some((owner, rif)) = remote_of(net, port) else {
        return false;
    };
    if owner == frame.destination {
        return true;
    }
    if let Some(next) = net.switch(owner) {
        if !next.vlan_allowed(&rif, vlan) {
            return false;
        }
        return forward_at_switch(net, owner, &rif, vlan, frame, visited);
    }
    if net.router(owner).is_some_and(|r| r.is_switchport_capable(&rif)) {
        return forward_at_router_switch(net, owner, &rif, vlan, frame, visited);
    }
    false
}

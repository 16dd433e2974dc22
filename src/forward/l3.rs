//! 三层转发
//!
//! 逐台路由器查路由表：入口 ACL、出口 ACL，inside→outside 时做源 NAT，
//! 再确认二层能到达下一跳或目的主机。跳数上限 16，每台路由器只经过一次。

use std::collections::HashSet;
use std::net::Ipv4Addr;

use super::error::DropReason;
use super::l2::{Visited, reach_from_remote};
use super::packet::{Flow, Frame};
use crate::device::router::{AclPacket, NatEndpoint};
use crate::net::{DeviceId, Network};
use tracing::debug;

pub const MAX_HOPS: u32 = 16;

/// 持有该地址且接口 up 的已上电路由器，以及接口名
pub fn router_owning(net: &Network, ip: Ipv4Addr) -> Option<(DeviceId, String)> {
    net.device_ids().into_iter().find_map(|d| {
        if !net.is_powered(d) {
            return None;
        }
        let itf = net
            .router(d)?
            .interfaces
            .iter()
            .find(|i| i.usable_addr().is_some_and(|a| a.ip == ip))?;
        Some((d, itf.name.clone()))
    })
}

fn acl_packet(flow: &Flow) -> AclPacket {
    AclPacket {
        protocol: flow.protocol,
        src: flow.src,
        dst: flow.dst,
        dst_port: flow.dst_port,
    }
}

/// 从 `router` 继续转发 `flow`，`ingress` 为流进入该路由器的接口。
#[tracing::instrument(skip(net, visited), fields(dst = %flow.dst))]
pub fn route_from_router(
    net: &mut Network,
    router: DeviceId,
    flow: Flow,
    ingress: Option<&str>,
    destination: DeviceId,
    ttl: u32,
    visited: &mut HashSet<DeviceId>,
) -> Result<(), DropReason> {
    if !net.is_powered(router) {
        return Err(DropReason::HostUnreachable);
    }
    if ttl == 0 {
        return Err(DropReason::TtlExpired);
    }
    if !visited.insert(router) {
        return Err(DropReason::RoutingLoop);
    }
    let device_name = net.device(router).name.clone();
    let now = net.now();
    let Some(r) = net.router(router) else {
        return Err(DropReason::NoRoute);
    };
    let pkt = acl_packet(&flow);

    // 目的地址就在本机
    if router == destination && r.owns_ip(flow.dst) {
        return r
            .acl_permits_routed(&pkt, ingress, None)
            .map_err(DropReason::AclBlocked);
    }

    let decision = r.try_route(flow.dst).ok_or(DropReason::NoRoute)?;
    r.acl_permits_routed(&pkt, ingress, Some(&decision.egress))
        .map_err(DropReason::AclBlocked)?;
    let egress = r
        .interface(&decision.egress)
        .ok_or(DropReason::NoRoute)?
        .clone();
    let src_mac = egress.pseudo_mac(&device_name);

    let port = net
        .find_port(router, egress.physical_name())
        .filter(|&p| net.has_link(p))
        .ok_or(DropReason::NoRoute)?;
    let remote = net.peer(port).ok_or(DropReason::NoRoute)?;

    let mut flow = flow;
    if let Some(in_if) = ingress {
        let translated = net.router_mut(router).and_then(|r| {
            r.apply_source_nat(
                flow.protocol,
                in_if,
                &egress.name,
                NatEndpoint::new(flow.src, flow.src_port),
                NatEndpoint::new(flow.dst, flow.dst_port),
            )
        });
        if let Some(global) = translated {
            flow.src = global.ip;
            flow.src_port = global.port;
        }
    }

    // 直连目的主机
    let dest_is_pc = net.pc(destination).is_some();
    if decision.next_hop == flow.dst && dest_is_pc {
        let dst_mac = net.pc(destination).map(|p| p.mac.clone()).unwrap_or_default();
        let frame = Frame {
            src_mac,
            dst_mac: dst_mac.clone(),
            destination,
        };
        if !reach_from_remote(net, remote, egress.vlan_tag(), &frame, &mut Visited::new()) {
            return Err(DropReason::HostUnreachable);
        }
        if let Some(r) = net.router_mut(router) {
            r.arp.upsert(flow.dst, &dst_mac, Some(&egress.name), now);
        }
        return Ok(());
    }

    // 下一跳路由器（目的是路由器接口时，下一跳就是它自己）
    let (next, next_if) = router_owning(net, decision.next_hop).ok_or(DropReason::NoRoute)?;
    let nh_mac = net
        .router(next)
        .and_then(|r| r.interface(&next_if))
        .map(|i| i.pseudo_mac(&net.device(next).name))
        .unwrap_or_default();
    let frame = Frame {
        src_mac,
        dst_mac: nh_mac.clone(),
        destination: next,
    };
    if !reach_from_remote(net, remote, egress.vlan_tag(), &frame, &mut Visited::new()) {
        return Err(DropReason::HostUnreachable);
    }
    if let Some(r) = net.router_mut(router) {
        r.arp.upsert(decision.next_hop, &nh_mac, Some(&egress.name), now);
    }
    debug!(from = %device_name, next_hop = %decision.next_hop, "➡️  转发到下一跳路由器");
    route_from_router(net, next, flow, Some(&next_if), destination, ttl - 1, visited)
}

//! 主机侧操作
//!
//! PC 发起的 ping、telnet 与 DHCP。同网段直接走二层；跨网段先确认网关可达，
//! 再交给三层逐跳转发。

use std::collections::HashSet;
use std::net::Ipv4Addr;

use super::error::DropReason;
use super::l2::{Visited, access_vlan, reach_device, reach_from_remote};
use super::l3::{MAX_HOPS, route_from_router, router_owning};
use super::packet::{Flow, Frame, Protocol};
use crate::device::router::{AclPacket, DhcpOffer};
use crate::device::service::find_open;
use crate::net::{DeviceId, DeviceKind, Network, PortId, PortMedium, ipv4};
use tracing::{debug, info};

fn first_port(net: &Network, pc: DeviceId, medium: PortMedium, connected: bool) -> Option<PortId> {
    net.ports_of(pc).iter().copied().find(|&p| {
        let port = net.port(p);
        port.medium == medium && (!connected || port.is_connected())
    })
}

/// 当前使用的网卡：已连接的以太口优先，其次已关联的无线口，最后任意以太口。
pub fn nic_port(net: &Network, pc: DeviceId) -> Option<PortId> {
    first_port(net, pc, PortMedium::Ethernet, true)
        .or_else(|| first_port(net, pc, PortMedium::Wireless, true))
        .or_else(|| first_port(net, pc, PortMedium::Ethernet, false))
}

/// 持有目标地址的设备：已上电的 PC，其次 up 的路由器接口。
pub fn find_destination(net: &Network, ip: Ipv4Addr) -> Option<DeviceId> {
    net.device_ids()
        .into_iter()
        .find(|&d| net.is_powered(d) && net.pc(d).is_some_and(|p| p.ip == ip))
        .or_else(|| router_owning(net, ip).map(|(d, _)| d))
}

/// 目的 PC 所在接入口的 VLAN
fn pc_access_vlan(net: &Network, pc: DeviceId) -> Option<u16> {
    let nic = nic_port(net, pc)?;
    access_vlan(net, nic)
}

/// 同网段投递
fn deliver_local(
    net: &mut Network,
    pc: DeviceId,
    nic: PortId,
    flow: &Flow,
    destination: DeviceId,
) -> Result<(), DropReason> {
    let now = net.now();
    let (src_mac, cached) = match net.pc(pc) {
        Some(p) => (p.mac.clone(), p.arp.get(flow.dst).map(|e| e.mac.clone())),
        None => return Err(DropReason::HostUnreachable),
    };

    let dst_mac = match cached {
        Some(mac) => mac,
        None => {
            // ARP 广播出不了本 VLAN
            if let (Some(local), Some(remote)) = (access_vlan(net, nic), pc_access_vlan(net, destination)) {
                if local != remote {
                    return Err(DropReason::HostUnreachable);
                }
            }
            let mac = match (net.pc(destination), router_owning(net, flow.dst)) {
                (Some(p), _) => p.mac.clone(),
                (None, Some((r, itf))) => net
                    .router(r)
                    .and_then(|rt| rt.interface(&itf))
                    .map(|i| i.pseudo_mac(&net.device(r).name))
                    .unwrap_or_default(),
                _ => return Err(DropReason::HostUnreachable),
            };
            if let Some(p) = net.pc_mut(pc) {
                p.arp.upsert(flow.dst, &mac, None, now);
            }
            mac
        }
    };

    let Some(peer) = net.peer(nic) else {
        return Err(DropReason::NoLink);
    };
    let frame = Frame {
        src_mac,
        dst_mac,
        destination,
    };
    if !reach_from_remote(net, peer, None, &frame, &mut Visited::new()) {
        return Err(DropReason::HostUnreachable);
    }
    // 发往路由器自身地址时检查入方向 ACL
    if let Some((r, itf)) = router_owning(net, flow.dst).filter(|(r, _)| *r == destination) {
        if let Some(router) = net.router(r) {
            let pkt = AclPacket {
                protocol: flow.protocol,
                src: flow.src,
                dst: flow.dst,
                dst_port: flow.dst_port,
            };
            router
                .acl_permits_routed(&pkt, Some(&itf), None)
                .map_err(DropReason::AclBlocked)?;
        }
    }
    Ok(())
}

/// 把流从 PC 送到目的设备，成功时返回目的设备。
#[tracing::instrument(skip(net, flow), fields(dst = %flow.dst, protocol = %flow.protocol))]
pub fn deliver(net: &mut Network, pc: DeviceId, flow: Flow) -> Result<DeviceId, DropReason> {
    let nic = nic_port(net, pc)
        .filter(|&p| net.has_link(p))
        .ok_or(DropReason::NoLink)?;
    let (ip, mask, gateway, mac) = match net.pc(pc) {
        Some(p) if p.has_address() => (p.ip, p.mask, p.gateway, p.mac.clone()),
        _ => return Err(DropReason::NoAddress),
    };
    let destination = find_destination(net, flow.dst).ok_or(DropReason::HostUnreachable)?;

    if ipv4::same_subnet(ip, flow.dst, mask) {
        deliver_local(net, pc, nic, &flow, destination)?;
        return Ok(destination);
    }

    if gateway.is_unspecified() {
        return Err(DropReason::NoDefaultGateway);
    }
    if !ipv4::same_subnet(ip, gateway, mask) {
        return Err(DropReason::GatewayOffSubnet);
    }
    let (gw, gw_if) = router_owning(net, gateway).ok_or(DropReason::NoGatewayRouter)?;

    let now = net.now();
    let gw_mac = net
        .router(gw)
        .and_then(|r| r.interface(&gw_if))
        .map(|i| i.pseudo_mac(&net.device(gw).name))
        .unwrap_or_default();
    if let Some(p) = net.pc_mut(pc) {
        p.arp.upsert(gateway, &gw_mac, None, now);
    }
    if let Some(r) = net.router_mut(gw) {
        r.arp.upsert(ip, &mac, Some(&gw_if), now);
    }
    if !reach_device(net, nic, &mac, gw) {
        return Err(DropReason::GatewayUnreachable);
    }

    let mut visited = HashSet::new();
    route_from_router(net, gw, flow, Some(&gw_if), destination, MAX_HOPS, &mut visited)?;
    Ok(destination)
}

pub fn ping(net: &mut Network, pc: DeviceId, dst: Ipv4Addr) -> Result<(), DropReason> {
    let src = net.pc(pc).map(|p| p.ip).unwrap_or(Ipv4Addr::UNSPECIFIED);
    let result = deliver(net, pc, Flow::icmp(src, dst)).map(|_| ());
    if let Err(reason) = &result {
        debug!(%dst, %reason, "❌ ping 失败");
    }
    result
}

/// telnet：可达且目的端口有服务时返回欢迎横幅。
pub fn telnet(net: &mut Network, pc: DeviceId, dst: Ipv4Addr, port: u16) -> Result<String, DropReason> {
    let Some(p) = net.pc_mut(pc) else {
        return Err(DropReason::NoAddress);
    };
    let src_port = p.source_port(dst, port);
    let flow = Flow::tcp(p.ip, src_port, dst, port);
    let target = deliver(net, pc, flow)?;

    let services = match &net.device(target).kind {
        DeviceKind::Pc(host) => &host.services,
        DeviceKind::Router(r) => &r.services,
        _ => return Err(DropReason::ConnectionRefused),
    };
    find_open(services, Protocol::Tcp, port)
        .map(|s| s.banner.clone())
        .ok_or(DropReason::ConnectionRefused)
}

/// DHCP 失败原因
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum DhcpError {
    #[error("DHCP failed: no active NIC link.")]
    NoLink,
    #[error("DHCP failed: no DHCP server reachable on the local network.")]
    NoServer,
}

/// 路由器有某个 up 接口的网段覆盖了某个地址池
fn serves_local_pool(net: &Network, router: DeviceId) -> bool {
    net.router(router).is_some_and(|r| {
        r.dhcp.pools.iter().any(|pool| {
            r.interfaces
                .iter()
                .filter_map(|i| i.usable_addr())
                .any(|a| a.contains(pool.network))
        })
    })
}

/// `ipconfig /renew`：向二层可达的路由器请求租约。
#[tracing::instrument(skip(net))]
pub fn dhcp_renew(net: &mut Network, pc: DeviceId) -> Result<DhcpOffer, DhcpError> {
    let nic = nic_port(net, pc)
        .filter(|&p| net.port(p).is_connected())
        .ok_or(DhcpError::NoLink)?;
    let Some(mac) = net.pc_mut(pc).map(|p| {
        p.dhcp = true;
        p.mac.clone()
    }) else {
        return Err(DhcpError::NoLink);
    };
    let now = net.now();

    let routers: Vec<DeviceId> = net
        .device_ids()
        .into_iter()
        .filter(|&d| net.is_powered(d) && serves_local_pool(net, d))
        .collect();
    for r in routers {
        if !reach_device(net, nic, &mac, r) {
            continue;
        }
        let Some(offer) = net.router_mut(r).and_then(|rt| rt.dhcp_request(&mac, now)) else {
            continue;
        };
        if let Some(p) = net.pc_mut(pc) {
            p.ip = offer.ip;
            p.mask = offer.mask;
            p.gateway = offer.gateway;
            p.dns = offer.dns;
        }
        info!(%mac, ip = %offer.ip, pool = %offer.pool, "📡 DHCP 获得地址");
        return Ok(offer);
    }
    Err(DhcpError::NoServer)
}

pub fn dhcp_release(net: &mut Network, pc: DeviceId) {
    if let Some(p) = net.pc_mut(pc) {
        p.release();
    }
}

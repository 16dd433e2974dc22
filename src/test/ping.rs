use std::net::Ipv4Addr;

use super::{configure_router, router_and_pc, run, set_pc_ip};
use crate::cli::{PcSession, RouterSession};
use crate::forward::{self, DropReason};
use crate::net::{CableType, Network};

#[test]
fn pc_pings_its_gateway_until_the_interface_is_shut() {
    let (mut net, r, pc) = router_and_pc();
    let gw = Ipv4Addr::new(10, 0, 0, 1);
    assert_eq!(forward::ping(&mut net, pc, gw), Ok(()));
    assert!(net.pc(pc).is_some_and(|p| p.arp.get(gw).is_some()));

    configure_router(&mut net, r, &["interface Gi0/0", "shutdown"]);
    assert!(forward::ping(&mut net, pc, gw).is_err());

    configure_router(&mut net, r, &["interface Gi0/0", "no shutdown"]);
    assert_eq!(forward::ping(&mut net, pc, gw), Ok(()));
}

#[test]
fn ping_output_matches_host_console() {
    let (mut net, _r, pc) = router_and_pc();
    let mut s = PcSession::new(pc);
    let out = run(&mut s, &mut net, &["ping 10.0.0.1", "ping 10.0.0.99"]);
    assert!(out[0].contains("Reply from 10.0.0.1: bytes=32 time<1ms TTL=128"));
    assert!(out[0].contains("Received = 1"));
    assert!(out[1].contains("Request timed out."));
    assert!(out[1].contains("(100% loss)"));
}

#[test]
fn unconfigured_or_unplugged_pc_cannot_ping() {
    let mut net = Network::new();
    let pc = net.add_pc("PC1");
    assert_eq!(
        forward::ping(&mut net, pc, Ipv4Addr::new(10, 0, 0, 1)),
        Err(DropReason::NoLink)
    );

    let (mut net, _r, pc) = router_and_pc();
    set_pc_ip(&mut net, pc, "10.0.0.2", "255.255.255.0", "10.0.0.1");
    if let Some(p) = net.pc_mut(pc) {
        p.ip = Ipv4Addr::UNSPECIFIED;
    }
    assert_eq!(
        forward::ping(&mut net, pc, Ipv4Addr::new(10, 0, 0, 1)),
        Err(DropReason::NoAddress)
    );
}

/// PC1 ↔ R1 ↔ (serial-less Ethernet) ↔ R2 ↔ PC2，两边靠静态路由互通
#[test]
fn two_routers_with_static_routes() {
    let mut net = Network::new();
    let r1 = net.add_router("R1");
    let r2 = net.add_router("R2");
    let pc1 = net.add_pc("PC1");
    let pc2 = net.add_pc("PC2");
    net.connect_by_name("PC1", "FastEthernet0", "R1", "Gi0/0", CableType::Auto)
        .expect("PC1-R1");
    net.connect_by_name("R1", "Gi0/1", "R2", "Gi0/1", CableType::Auto)
        .expect("R1-R2");
    net.connect_by_name("R2", "Gi0/0", "PC2", "FastEthernet0", CableType::Auto)
        .expect("R2-PC2");

    configure_router(
        &mut net,
        r1,
        &[
            "interface Gi0/0",
            "ip address 192.168.1.1 255.255.255.0",
            "no shutdown",
            "interface Gi0/1",
            "ip address 10.0.12.1 255.255.255.252",
            "no shutdown",
            "exit",
        ],
    );
    configure_router(
        &mut net,
        r2,
        &[
            "interface Gi0/0",
            "ip address 192.168.2.1 255.255.255.0",
            "no shutdown",
            "interface Gi0/1",
            "ip address 10.0.12.2 255.255.255.252",
            "no shutdown",
            "exit",
            "ip route 192.168.1.0 255.255.255.0 10.0.12.1",
        ],
    );
    set_pc_ip(&mut net, pc1, "192.168.1.10", "255.255.255.0", "192.168.1.1");
    set_pc_ip(&mut net, pc2, "192.168.2.10", "255.255.255.0", "192.168.2.1");

    let dst = Ipv4Addr::new(192, 168, 2, 10);
    assert_eq!(forward::ping(&mut net, pc1, dst), Err(DropReason::NoRoute));

    configure_router(&mut net, r1, &["ip route 192.168.2.0 255.255.255.0 10.0.12.2"]);
    assert_eq!(forward::ping(&mut net, pc1, dst), Ok(()));
    assert_eq!(
        forward::ping(&mut net, pc2, Ipv4Addr::new(192, 168, 1, 10)),
        Ok(())
    );

    let mut s = RouterSession::new(r1);
    let out = run(&mut s, &mut net, &["show ip route"]);
    assert!(out[0].contains("S    192.168.2.0/24 [1/0] via 10.0.12.2"));
    assert!(out[0].contains("C    192.168.1.0/24 is directly connected, GigabitEthernet0/0"));
    assert!(out[0].contains("Gateway of last resort is not set"));
}

#[test]
fn telnet_reaches_router_banner_and_refuses_closed_ports() {
    let (mut net, _r, pc) = router_and_pc();
    let mut s = PcSession::new(pc);
    let out = run(&mut s, &mut net, &["telnet 10.0.0.1", "telnet 10.0.0.1 80", "telnet 10.0.0.1 0"]);
    assert!(out[0].starts_with("Connected to 10.0.0.1 on port 23."));
    assert!(out[0].contains("User Access Verification"));
    assert_eq!(out[1], "Telnet to 10.0.0.1:80 failed (connection refused).");
    assert_eq!(out[2], "Invalid port.");
}

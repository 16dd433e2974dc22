use std::net::Ipv4Addr;

use super::{configure_router, run, set_pc_ip};
use crate::cli::{PcSession, RouterSession};
use crate::device::router::NatEndpoint;
use crate::forward::Protocol;
use crate::net::{CableType, DeviceId, Network};

/// PC1 192.168.1.10 ↔ Gi0/0 (inside) R1 Gi0/1 (outside) 203.0.113.1 ↔ PC2 203.0.113.5
fn nat_lab() -> (Network, DeviceId, DeviceId) {
    let mut net = Network::new();
    let r = net.add_router("R1");
    let inside = net.add_pc("PC1");
    let outside = net.add_pc("PC2");
    net.connect_by_name("PC1", "FastEthernet0", "R1", "Gi0/0", CableType::Auto)
        .expect("PC1-R1");
    net.connect_by_name("R1", "Gi0/1", "PC2", "FastEthernet0", CableType::Auto)
        .expect("R1-PC2");
    configure_router(
        &mut net,
        r,
        &[
            "interface Gi0/0",
            "ip address 192.168.1.1 255.255.255.0",
            "ip nat inside",
            "no shutdown",
            "interface Gi0/1",
            "ip address 203.0.113.1 255.255.255.0",
            "ip nat outside",
            "no shutdown",
            "exit",
            "access-list 1 permit 192.168.1.0 0.0.0.255",
            "ip nat inside source list 1 interface Gi0/1 overload",
        ],
    );
    set_pc_ip(&mut net, inside, "192.168.1.10", "255.255.255.0", "192.168.1.1");
    set_pc_ip(&mut net, outside, "203.0.113.5", "255.255.255.0", "203.0.113.1");
    (net, r, inside)
}

#[test]
fn overload_translates_to_outside_address_and_reuses_mapping() {
    let (mut net, r, pc) = nat_lab();
    let mut s = PcSession::new(pc);
    let out = run(&mut s, &mut net, &["telnet 203.0.113.5", "telnet 203.0.113.5"]);
    assert!(out[0].starts_with("Connected to 203.0.113.5 on port 23."), "{}", out[0]);
    assert!(out[1].starts_with("Connected to 203.0.113.5 on port 23."));

    let router = net.router(r).expect("router");
    assert_eq!(router.nat.translations.len(), 1);
    let t = &router.nat.translations[0];
    assert_eq!(t.protocol, Protocol::Tcp);
    assert_eq!(t.inside_global.ip, Ipv4Addr::new(203, 0, 113, 1));
    assert!(t.inside_global.port >= 10000);
    assert_eq!(t.inside_local.ip, Ipv4Addr::new(192, 168, 1, 10));
    assert_eq!(t.outside_global, NatEndpoint::new(Ipv4Addr::new(203, 0, 113, 5), 23));
}

#[test]
fn show_and_clear_translations() {
    let (mut net, r, pc) = nat_lab();
    let mut host = PcSession::new(pc);
    run(&mut host, &mut net, &["telnet 203.0.113.5"]);

    let mut s = RouterSession::new(r);
    let out = run(
        &mut s,
        &mut net,
        &[
            "enable",
            "show ip nat translations",
            "show ip nat statistics",
            "clear ip nat translation *",
            "show ip nat translations",
        ],
    );
    assert!(out[1].contains("203.0.113.1:10000"), "{}", out[1]);
    assert!(out[1].contains("192.168.1.10:"));
    assert!(out[2].contains("Total active translations: 1"));
    assert!(out[2].contains("Inside source list 1 interface GigabitEthernet0/1 overload"));
    assert_eq!(out[3], "NAT translations cleared.");
    assert_eq!(out[4], "No NAT translations.");
}

#[test]
fn sources_outside_the_acl_are_not_translated() {
    let (mut net, r, _pc) = nat_lab();
    let router = net.router_mut(r).expect("router");
    let translated = router.apply_source_nat(
        Protocol::Tcp,
        "GigabitEthernet0/0",
        "GigabitEthernet0/1",
        NatEndpoint::new(Ipv4Addr::new(172, 16, 0, 9), 1025),
        NatEndpoint::new(Ipv4Addr::new(203, 0, 113, 5), 23),
    );
    assert!(translated.is_none());

    // 方向反了也不转换
    let reversed = router.apply_source_nat(
        Protocol::Tcp,
        "GigabitEthernet0/1",
        "GigabitEthernet0/0",
        NatEndpoint::new(Ipv4Addr::new(192, 168, 1, 10), 1025),
        NatEndpoint::new(Ipv4Addr::new(203, 0, 113, 5), 23),
    );
    assert!(reversed.is_none());
}

#[test]
fn distinct_flows_get_distinct_ports() {
    let (mut net, r, _pc) = nat_lab();
    let router = net.router_mut(r).expect("router");
    let dst = NatEndpoint::new(Ipv4Addr::new(203, 0, 113, 5), 23);
    let a = router
        .apply_source_nat(
            Protocol::Tcp,
            "GigabitEthernet0/0",
            "GigabitEthernet0/1",
            NatEndpoint::new(Ipv4Addr::new(192, 168, 1, 10), 1025),
            dst,
        )
        .expect("first");
    let b = router
        .apply_source_nat(
            Protocol::Tcp,
            "GigabitEthernet0/0",
            "GigabitEthernet0/1",
            NatEndpoint::new(Ipv4Addr::new(192, 168, 1, 11), 1025),
            dst,
        )
        .expect("second");
    assert_eq!(a.port, 10000);
    assert_eq!(b.port, 10001);
}

#[test]
fn nat_rule_requires_overload() {
    let (mut net, r, _pc) = nat_lab();
    let mut s = RouterSession::new(r);
    let out = run(
        &mut s,
        &mut net,
        &["enable", "configure terminal", "ip nat inside source list 1 interface Gi0/1"],
    );
    assert_eq!(out[2], "% Only interface overload (PAT) is supported.");
}

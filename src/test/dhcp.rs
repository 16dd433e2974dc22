use std::net::Ipv4Addr;

use super::{configure_router, run};
use crate::cli::PcSession;
use crate::device::router::{DhcpPool, DhcpServer};
use crate::forward::{self, DhcpError};
use crate::net::{CableType, Network};
use crate::sim::SimTime;

fn server(start: u8, end: u8) -> DhcpServer {
    let mut pool = DhcpPool::new("LAN");
    pool.network = Ipv4Addr::new(192, 168, 1, 0);
    pool.default_router = Ipv4Addr::new(192, 168, 1, 1);
    pool.start_host = start;
    pool.end_host = end;
    DhcpServer {
        pools: vec![pool],
        excluded: Vec::new(),
    }
}

#[test]
fn same_mac_gets_same_lease() {
    let mut s = server(10, 20);
    let a = s.request("aa:aa", SimTime::ZERO).expect("lease");
    let again = s.request("AA:AA", SimTime::from_secs(5)).expect("lease");
    assert_eq!(a.ip, Ipv4Addr::new(192, 168, 1, 10));
    assert_eq!(again.ip, a.ip);
    assert_eq!(a.gateway, Ipv4Addr::new(192, 168, 1, 1));
    assert_eq!(s.leases().count(), 1);
}

#[test]
fn addresses_are_not_reused_and_exhaustion_fails() {
    let mut s = server(10, 11);
    let a = s.request("m1", SimTime::ZERO).expect("first");
    let b = s.request("m2", SimTime::ZERO).expect("second");
    assert_ne!(a.ip, b.ip);
    assert!(s.request("m3", SimTime::ZERO).is_none());
    assert!(s.request("", SimTime::ZERO).is_none());
}

#[test]
fn excluded_ranges_are_skipped() {
    let mut s = server(10, 20);
    s.excluded
        .push((Ipv4Addr::new(192, 168, 1, 10), Ipv4Addr::new(192, 168, 1, 12)));
    let a = s.request("m1", SimTime::ZERO).expect("lease");
    assert_eq!(a.ip, Ipv4Addr::new(192, 168, 1, 13));
}

#[test]
fn pc_renews_from_router_pool_over_a_switch() {
    let mut net = Network::new();
    let r = net.add_router("R1");
    net.add_switch("SW1");
    let pc = net.add_pc("PC1");
    net.connect_by_name("R1", "Gi0/0", "SW1", "Gi0/1", CableType::Auto)
        .expect("R1-SW1");
    net.connect_by_name("SW1", "Gi0/2", "PC1", "FastEthernet0", CableType::Auto)
        .expect("SW1-PC1");
    configure_router(
        &mut net,
        r,
        &[
            "interface Gi0/0",
            "ip address 192.168.1.1 255.255.255.0",
            "no shutdown",
            "exit",
            "ip dhcp excluded-address 192.168.1.10",
            "ip dhcp pool LAN",
            "network 192.168.1.0 255.255.255.0",
            "default-router 192.168.1.1",
            "dns-server 8.8.8.8",
        ],
    );

    let offer = forward::dhcp_renew(&mut net, pc).expect("dhcp offer");
    assert_eq!(offer.ip, Ipv4Addr::new(192, 168, 1, 11));
    assert_eq!(offer.pool, "LAN");
    let host = net.pc(pc).expect("pc");
    assert!(host.dhcp);
    assert_eq!(host.gateway, Ipv4Addr::new(192, 168, 1, 1));
    assert_eq!(host.dns, Ipv4Addr::new(8, 8, 8, 8));

    let mut s = PcSession::new(pc);
    let out = run(&mut s, &mut net, &["ipconfig /release"]);
    assert!(!out[0].starts_with('%'));
    assert!(net.pc(pc).is_some_and(|p| !p.has_address()));
    assert!(forward::ping(&mut net, pc, Ipv4Addr::new(192, 168, 1, 1)).is_err());
}

#[test]
fn renew_without_cable_fails() {
    let mut net = Network::new();
    let pc = net.add_pc("PC1");
    assert_eq!(forward::dhcp_renew(&mut net, pc), Err(DhcpError::NoLink));
}

#[test]
fn renew_without_server_fails() {
    let mut net = Network::new();
    net.add_router("R1");
    let pc = net.add_pc("PC1");
    net.connect_by_name("R1", "Gi0/0", "PC1", "FastEthernet0", CableType::Auto)
        .expect("cable");
    assert_eq!(forward::dhcp_renew(&mut net, pc), Err(DhcpError::NoServer));
}

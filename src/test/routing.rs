use std::net::Ipv4Addr;

use crate::device::Router;
use crate::device::router::{IfAddr, RouteEntry};

fn ip(s: &str) -> Ipv4Addr {
    s.parse().expect("ip literal")
}

/// Gi0/0 10.0.0.1/24 已 up
fn router() -> Router {
    let mut r = Router::new();
    r.add_physical_interface("Gi0/0");
    r.add_physical_interface("Gi0/1");
    let itf = r.interface_mut("Gi0/0").expect("Gi0/0");
    itf.addr = Some(IfAddr {
        ip: ip("10.0.0.1"),
        mask: ip("255.255.255.0"),
    });
    itf.admin_up = true;
    itf.protocol_up = true;
    r
}

#[test]
fn longest_static_prefix_wins() {
    let mut r = router();
    assert!(r.add_static_route(ip("172.16.0.0"), ip("255.255.0.0"), Some(ip("10.0.0.2")), None));
    assert!(r.add_static_route(ip("172.16.5.0"), ip("255.255.255.0"), Some(ip("10.0.0.3")), None));

    let d = r.try_route(ip("172.16.5.9")).expect("route");
    assert_eq!(d.next_hop, ip("10.0.0.3"));
    assert_eq!(d.egress, "GigabitEthernet0/0");

    let d = r.try_route(ip("172.16.9.9")).expect("route");
    assert_eq!(d.next_hop, ip("10.0.0.2"));
    assert!(r.try_route(ip("8.8.8.8")).is_none());
}

#[test]
fn connected_beats_static() {
    let mut r = router();
    r.add_static_route(ip("10.0.0.0"), ip("255.255.255.0"), Some(ip("10.0.0.254")), None);
    let d = r.try_route(ip("10.0.0.7")).expect("route");
    assert_eq!(d.next_hop, ip("10.0.0.7"));
    assert_eq!(d.egress, "GigabitEthernet0/0");
}

#[test]
fn down_interfaces_provide_no_connected_route() {
    let mut r = router();
    if let Some(itf) = r.interface_mut("Gi0/0") {
        itf.protocol_up = false;
    }
    assert!(r.try_route(ip("10.0.0.7")).is_none());
    assert!(r.route_entries().is_empty());
}

#[test]
fn exit_interface_route_requires_protocol_up() {
    let mut r = router();
    assert!(r.add_static_route(ip("0.0.0.0"), ip("0.0.0.0"), None, Some("gi0/1")));
    assert!(r.try_route(ip("8.8.8.8")).is_none());
    if let Some(itf) = r.interface_mut("Gi0/1") {
        itf.protocol_up = true;
    }
    let d = r.try_route(ip("8.8.8.8")).expect("default route");
    assert_eq!(d.egress, "GigabitEthernet0/1");
    assert_eq!(d.next_hop, ip("8.8.8.8"));
    assert_eq!(r.gateway_of_last_resort().as_deref(), Some("GigabitEthernet0/1"));
}

#[test]
fn route_needs_next_hop_or_exit_and_duplicates_collapse() {
    let mut r = router();
    assert!(!r.add_static_route(ip("1.0.0.0"), ip("255.0.0.0"), None, None));
    assert!(r.add_static_route(ip("1.0.0.0"), ip("255.0.0.0"), Some(ip("10.0.0.2")), None));
    assert!(r.add_static_route(ip("1.0.0.0"), ip("255.0.0.0"), Some(ip("10.0.0.2")), None));
    assert_eq!(r.static_routes.len(), 1);
    assert!(r.remove_static_route(ip("1.0.0.0"), ip("255.0.0.0"), Some(ip("10.0.0.2")), None));
    assert!(r.static_routes.is_empty());
}

#[test]
fn route_entries_list_connected_local_and_static() {
    let mut r = router();
    r.add_static_route(ip("192.168.0.0"), ip("255.255.0.0"), Some(ip("10.0.0.2")), None);
    let entries = r.route_entries();
    assert!(entries.iter().any(|e| matches!(
        e,
        RouteEntry::Connected { prefix: 24, .. }
    )));
    assert!(entries.iter().any(|e| matches!(e, RouteEntry::Local { ip: a, .. } if *a == ip("10.0.0.1"))));
    assert!(entries.iter().any(|e| matches!(e, RouteEntry::Static(_))));
}

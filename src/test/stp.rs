use super::configure_router;
use crate::cli::{SwitchSession, TerminalSession};
use crate::device::switch::StpState;
use crate::net::{CableType, DeviceId, Network};
use crate::stp::{self, compare_bridge_id};
use std::cmp::Ordering;

/// SW1 / SW2 / SW3 两两相连成环
fn triangle() -> (Network, [DeviceId; 3]) {
    let mut net = Network::new();
    let a = net.add_switch("SW1");
    let b = net.add_switch("SW2");
    let c = net.add_switch("SW3");
    net.connect_by_name("SW1", "Gi0/1", "SW2", "Gi0/1", CableType::Auto).expect("SW1-SW2");
    net.connect_by_name("SW2", "Gi0/2", "SW3", "Gi0/1", CableType::Auto).expect("SW2-SW3");
    net.connect_by_name("SW3", "Gi0/2", "SW1", "Gi0/2", CableType::Auto).expect("SW3-SW1");
    (net, [a, b, c])
}

fn blocking(net: &Network, dev: DeviceId) -> usize {
    net.switch(dev)
        .map(|s| s.ports.iter().filter(|p| p.stp_state == StpState::Blocking).count())
        .unwrap_or(0)
}

#[test]
fn bridge_id_orders_by_priority_then_mac() {
    let lo = (4096, "ff:ff:ff:ff:ff:ff".to_string());
    let hi = (32768, "00:00:00:00:00:01".to_string());
    assert_eq!(compare_bridge_id(&lo, &hi), Ordering::Less);
    let a = (32768, "00:00:00:00:00:01".to_string());
    let b = (32768, "00:00:00:00:00:02".to_string());
    assert_eq!(compare_bridge_id(&a, &b), Ordering::Less);
}

#[test]
fn loop_is_broken_by_exactly_one_blocked_port() {
    let (mut net, devs) = triangle();
    let mut s = SwitchSession::new(devs[0]);
    for l in ["enable", "configure terminal", "spanning-tree vlan 1 priority 4096"] {
        assert!(!s.execute(&mut net, l).starts_with('%'));
    }
    stp::recompute(&mut net);

    let total: usize = devs.iter().map(|&d| blocking(&net, d)).sum();
    assert_eq!(total, 1);
    assert_eq!(blocking(&net, devs[0]), 0);
    assert!(net.switch(devs[0]).is_some_and(|s| s.is_root));
    assert!(devs[1..].iter().all(|&d| net.switch(d).is_some_and(|s| !s.is_root)));
}

#[test]
fn recompute_is_deterministic() {
    let (mut net, devs) = triangle();
    stp::recompute(&mut net);
    let first: Vec<Vec<StpState>> = devs
        .iter()
        .map(|&d| net.switch(d).map(|s| s.ports.iter().map(|p| p.stp_state).collect()).unwrap_or_default())
        .collect();
    stp::recompute(&mut net);
    let second: Vec<Vec<StpState>> = devs
        .iter()
        .map(|&d| net.switch(d).map(|s| s.ports.iter().map(|p| p.stp_state).collect()).unwrap_or_default())
        .collect();
    assert_eq!(first, second);
}

#[test]
fn powered_off_switch_never_becomes_root() {
    let (mut net, devs) = triangle();
    let mut s = SwitchSession::new(devs[2]);
    for l in ["enable", "configure terminal", "spanning-tree priority 0"] {
        assert!(!s.execute(&mut net, l).starts_with('%'));
    }
    stp::recompute(&mut net);
    assert!(net.switch(devs[2]).is_some_and(|s| s.is_root));

    net.set_power(devs[2], false);
    stp::recompute(&mut net);
    assert!(net.switch(devs[2]).is_some_and(|s| !s.is_root));
    assert!(devs[..2].iter().any(|&d| net.switch(d).is_some_and(|s| s.is_root)));
}

#[test]
fn show_spanning_tree_marks_root_bridge() {
    let (mut net, devs) = triangle();
    // 路由器不参与生成树
    let r = net.add_router("R1");
    net.connect_by_name("R1", "Gi0/0", "SW1", "Gi0/3", CableType::Auto).expect("R1-SW1");
    configure_router(&mut net, r, &["interface Gi0/0", "no shutdown"]);
    stp::recompute(&mut net);

    let root = devs
        .iter()
        .copied()
        .find(|&d| net.switch(d).is_some_and(|s| s.is_root))
        .expect("one root");
    let mut s = SwitchSession::new(root);
    let out = s.execute(&mut net, "show spanning-tree");
    assert!(out.contains("This bridge is the root"), "{out}");
}

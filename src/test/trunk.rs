use std::net::Ipv4Addr;

use super::{run, run_ok};
use crate::cli::{PcSession, SwitchSession};
use crate::forward;
use crate::net::{CableType, DeviceId, Network};

/// PC1 ↔ SW1 ==trunk== SW2 ↔ PC2，两台 PC 都在 VLAN 10
fn vlan10_over_trunk(sw2_allowed: &str) -> (Network, DeviceId, DeviceId) {
    let mut net = Network::new();
    let s1 = net.add_switch("SW1");
    let s2 = net.add_switch("SW2");
    let pc1 = net.add_pc("PC1");
    let pc2 = net.add_pc("PC2");
    net.connect_by_name("PC1", "FastEthernet0", "SW1", "Gi0/1", CableType::Auto).expect("PC1");
    net.connect_by_name("PC2", "FastEthernet0", "SW2", "Gi0/1", CableType::Auto).expect("PC2");
    net.connect_by_name("SW1", "Gi0/2", "SW2", "Gi0/2", CableType::Auto).expect("trunk");

    for (dev, allowed) in [(s1, "10"), (s2, sw2_allowed)] {
        let mut s = SwitchSession::new(dev);
        let allow = format!("switchport trunk allowed vlan {allowed}");
        run_ok(
            &mut s,
            &mut net,
            &[
                "enable",
                "configure terminal",
                "interface gi0/1",
                "switchport access vlan 10",
                "interface gi0/2",
                "switchport mode trunk",
                &allow,
                "end",
            ],
        );
    }
    for (pc, ip) in [(pc1, "192.168.10.1"), (pc2, "192.168.10.2")] {
        let mut s = PcSession::new(pc);
        let out = run(&mut s, &mut net, &[&format!("set ip {ip} 255.255.255.0")]);
        assert_eq!(out[0], "OK");
    }
    (net, pc1, pc2)
}

#[test]
fn vlan_must_be_allowed_on_both_trunk_ends() {
    let (mut net, pc1, _) = vlan10_over_trunk("1");
    assert!(forward::ping(&mut net, pc1, Ipv4Addr::new(192, 168, 10, 2)).is_err());

    let (mut net, pc1, pc2) = vlan10_over_trunk("1,10");
    assert_eq!(forward::ping(&mut net, pc1, Ipv4Addr::new(192, 168, 10, 2)), Ok(()));
    assert_eq!(forward::ping(&mut net, pc2, Ipv4Addr::new(192, 168, 10, 1)), Ok(()));
}

#[test]
fn access_vlan_mismatch_isolates_hosts() {
    let (mut net, pc1, _) = vlan10_over_trunk("10");
    let sw2 = net.device_by_name("SW2").expect("SW2");
    let mut s = SwitchSession::new(sw2);
    run_ok(
        &mut s,
        &mut net,
        &["enable", "conf t", "int gi0/1", "switchport access vlan 20", "end"],
    );
    assert!(forward::ping(&mut net, pc1, Ipv4Addr::new(192, 168, 10, 2)).is_err());
}

#[test]
fn show_interfaces_trunk_lists_allowed_vlans() {
    let (mut net, _, _) = vlan10_over_trunk("1,10");
    crate::stp::recompute(&mut net);
    let sw2 = net.device_by_name("SW2").expect("SW2");
    let mut s = SwitchSession::new(sw2);
    let out = run(&mut s, &mut net, &["show interfaces trunk"]);
    assert!(out[0].contains("Gi0/2       on           802.1q         trunking"), "{}", out[0]);
    assert!(out[0].contains("Vlans allowed on trunk"));
    assert!(out[0].contains("1,10"));
}

#[test]
fn switches_learn_mac_addresses_on_the_path() {
    let (mut net, pc1, _) = vlan10_over_trunk("10");
    forward::ping(&mut net, pc1, Ipv4Addr::new(192, 168, 10, 2)).expect("ping");
    for (name, ingress) in [("SW1", "GigabitEthernet0/1"), ("SW2", "GigabitEthernet0/2")] {
        let dev = net.device_by_name(name).expect("switch");
        let table = net.switch(dev).map(|s| s.mac_table.entries().to_vec()).unwrap_or_default();
        assert!(
            table.iter().any(|e| e.vlan == 10 && e.interface == ingress),
            "{name} did not learn PC1 on {ingress}"
        );
    }
}

use super::{configure_router, run_ok};
use crate::cli::SwitchSession;
use crate::config::{self, Rejected, replay, replay_into, serialize_router, serialize_switch};
use crate::device::switch::ChannelMode;
use crate::net::Network;

#[test]
fn router_config_survives_replay() {
    let mut net = Network::new();
    let r = net.add_router("R1");
    configure_router(
        &mut net,
        r,
        &[
            "hostname EDGE",
            "access-list 1 permit 192.168.1.0 0.0.0.255",
            "ip access-list extended WEB",
            "permit tcp any host 192.168.1.1 eq 80",
            "deny ip any any",
            "exit",
            "interface Gi0/0",
            "description LAN side",
            "ip address 192.168.1.1 255.255.255.0",
            "ip nat inside",
            "ip access-group WEB out",
            "no shutdown",
            "interface Gi0/1",
            "ip address 203.0.113.2 255.255.255.252",
            "ip nat outside",
            "no shutdown",
            "interface Gi0/0.20",
            "encapsulation dot1Q 20",
            "ip address 192.168.20.1 255.255.255.0",
            "exit",
            "ip route 0.0.0.0 0.0.0.0 203.0.113.1",
            "ip dhcp excluded-address 192.168.1.1 192.168.1.10",
            "ip dhcp pool LAN",
            "network 192.168.1.0 255.255.255.0",
            "default-router 192.168.1.1",
            "dns-server 8.8.8.8",
            "address range 20 100",
            "exit",
            "ip nat inside source list 1 interface Gi0/1 overload",
            "router ospf 1",
            "router-id 1.1.1.1",
            "network 192.168.1.0 0.0.0.255 area 0",
            "passive-interface Gi0/0",
            "exit",
            "line console 0",
            "password cisco",
            "login",
            "exit",
            "mac address-table aging-time 120",
        ],
    );
    let first = serialize_router(&net, r).expect("router config");
    assert!(first.contains("interface GigabitEthernet0/0.20\n encapsulation dot1Q 20\n"));
    assert!(first.contains("ip nat inside source list 1 interface GigabitEthernet0/1 overload\n"));
    assert!(first.ends_with("end\nwrite memory\n"));

    let mut fresh = Network::new();
    let r2 = fresh.add_router("Router");
    let rejected = replay_into(&mut fresh, r2, &first).expect("router has a CLI");
    assert_eq!(rejected, Vec::<Rejected>::new());
    assert_eq!(fresh.device(r2).name, "EDGE");
    assert_eq!(serialize_router(&fresh, r2).as_deref(), Some(first.as_str()));
    assert_eq!(fresh.device(r2).startup_config.as_deref(), Some(first.as_str()));
}

#[test]
fn switch_config_survives_replay() {
    let mut net = Network::new();
    let sw = net.add_switch("SW1");
    let mut s = SwitchSession::new(sw);
    run_ok(
        &mut s,
        &mut net,
        &[
            "enable",
            "configure terminal",
            "hostname ACCESS",
            "spanning-tree vlan 1 priority 4096",
            "mac address-table aging-time 60",
            "vlan 10",
            "name SALES",
            "exit",
            "interface gi0/1",
            "description desk 12",
            "switchport access vlan 10",
            "interface range gi0/2-3",
            "channel-group 1 mode active",
            "interface po1",
            "switchport trunk allowed vlan 1,10",
            "interface gi0/4",
            "shutdown",
            "end",
        ],
    );
    let first = serialize_switch(&net, sw).expect("switch config");
    assert!(first.contains("vlan 10\n name SALES\n exit\n"));
    assert!(first.contains(" channel-group 1 mode active\n"));
    assert!(first.contains("interface Port-channel1\n switchport mode trunk\n"));

    let mut fresh = Network::new();
    let sw2 = fresh.add_switch("Switch");
    let rejected = replay_into(&mut fresh, sw2, &first).expect("switch has a CLI");
    assert!(rejected.is_empty(), "{rejected:?}");
    assert_eq!(serialize_switch(&fresh, sw2).as_deref(), Some(first.as_str()));
    let members = fresh.switch(sw2).expect("switch").channel_members(1);
    assert_eq!(members.len(), 2);
    assert!(members.iter().all(|m| m.channel_mode == ChannelMode::Active));
}

#[test]
fn replay_skips_comments_and_reports_rejections() {
    let mut net = Network::new();
    let r = net.add_router("R1");
    let text = "! exported\n\nenable\nconfigure terminal\n# note\ninterface Gi0/0\n ip address 10.0.0.1 255.0.255.0\n// x\nbogus command\nend\n";
    let rejected = replay_into(&mut net, r, text).expect("router");
    assert_eq!(rejected.len(), 2);
    assert_eq!(rejected[0].line_no, 7);
    assert_eq!(rejected[0].command, "ip address 10.0.0.1 255.0.255.0");
    assert_eq!(rejected[0].output, "% Invalid subnet mask.");
    assert_eq!(rejected[1].line_no, 9);
    assert_eq!(rejected[1].output, "% Invalid input detected at '^' marker.");
}

#[test]
fn running_config_dispatches_by_device_kind() {
    let mut net = Network::new();
    let r = net.add_router("R1");
    let sw = net.add_switch("SW1");
    let pc = net.add_pc("PC1");
    assert!(config::running_config(&net, r).is_some_and(|c| c.contains("hostname R1")));
    assert!(config::running_config(&net, sw).is_some_and(|c| c.contains("hostname SW1")));
    assert_eq!(config::running_config(&net, pc), None);

    let mut session = crate::cli::RouterSession::new(r);
    let rejected = replay(&mut session, &mut net, "enable\nshow version\n");
    assert!(rejected.is_empty());
}

use std::net::Ipv4Addr;

use super::{configure_router, router_and_pc, run};
use crate::cli::{CONFIG_BANNER, Mode, PcSession, RouterSession, TerminalSession};
use crate::forward::{self, DropReason};
use crate::net::{CableType, Network};

#[test]
fn mode_transitions_and_prompts() {
    let mut net = Network::new();
    let r = net.add_router("R1");
    let mut s = RouterSession::new(r);
    assert_eq!(s.prompt(&net), "R1>");
    assert_eq!(s.execute(&mut net, "configure terminal"), "% Invalid input detected at '^' marker.");
    assert_eq!(s.execute(&mut net, "en"), "");
    assert_eq!(s.prompt(&net), "R1#");
    assert_eq!(s.execute(&mut net, "end"), "% Invalid input detected at '^' marker.");
    assert_eq!(s.execute(&mut net, "conf t"), CONFIG_BANNER);
    run(&mut s, &mut net, &["int gi0/0"]);
    assert_eq!(s.mode(), Mode::InterfaceConfig);
    assert_eq!(s.prompt(&net), "R1(config-if)#");
    run(&mut s, &mut net, &["exit"]);
    assert_eq!(s.prompt(&net), "R1(config)#");
    run(&mut s, &mut net, &["hostname EDGE", "end"]);
    assert_eq!(s.prompt(&net), "EDGE#");
    assert_eq!(s.execute(&mut net, "exit"), "logout");
}

#[test]
fn unknown_and_incomplete_commands() {
    let mut net = Network::new();
    let r = net.add_router("R1");
    let mut s = RouterSession::new(r);
    let out = run(
        &mut s,
        &mut net,
        &["enable", "frobnicate", "configure terminal", "interface", "interface Gi9/9"],
    );
    assert_eq!(out[1], "% Invalid input detected at '^' marker.");
    assert_eq!(out[3], "% Incomplete command.");
    assert_eq!(out[4], "% Invalid interface.");
}

#[test]
fn interface_brief_reflects_admin_and_protocol_state() {
    let (mut net, r, _pc) = router_and_pc();
    let mut s = RouterSession::new(r);
    let out = run(&mut s, &mut net, &["show ip interface brief"]);
    let line = out[0]
        .lines()
        .find(|l| l.starts_with("GigabitEthernet0/0 "))
        .expect("Gi0/0 row");
    assert!(line.contains("10.0.0.1"));
    assert!(line.ends_with("up"));
    let unset = out[0]
        .lines()
        .find(|l| l.starts_with("GigabitEthernet0/1 "))
        .expect("Gi0/1 row");
    assert!(unset.contains("unassigned"));
    assert!(unset.contains("administratively down"));
}

#[test]
fn subinterfaces_and_switchport_rules() {
    let mut net = Network::new();
    let r = net.add_router("R1");
    let mut s = RouterSession::new(r);
    let out = run(
        &mut s,
        &mut net,
        &[
            "enable",
            "configure terminal",
            "interface Gi0/0.10",
            "encapsulation dot1Q 10",
            "ip address 192.168.10.1 255.255.255.0",
            "ip address 192.168.10.1 255.255.0.255",
            "switchport mode trunk",
        ],
    );
    assert_eq!(out[3], "");
    assert_eq!(out[4], "");
    assert_eq!(out[5], "% Invalid subnet mask.");
    assert_eq!(out[6], "% Switchport commands are only supported on HWIC-4ESW ports.");
    let itf = net
        .router(r)
        .and_then(|rt| rt.interface("Gi0/0.10"))
        .expect("subinterface");
    assert_eq!(itf.dot1q, Some(10));
    assert_eq!(itf.parent.as_deref(), Some("GigabitEthernet0/0"));
}

#[test]
fn standard_acl_numbers_and_access_group_validation() {
    let mut net = Network::new();
    let r = net.add_router("R1");
    let mut s = RouterSession::new(r);
    let out = run(
        &mut s,
        &mut net,
        &[
            "enable",
            "configure terminal",
            "access-list 100 permit any",
            "access-list 10 permit host 10.0.0.5",
            "interface Gi0/0",
            "ip access-group BLOCK in",
            "exit",
            "ip access-list extended BLOCK",
            "deny tcp any host 10.0.0.1 eq 23",
            "permit ip any any",
            "exit",
            "interface Gi0/0",
            "ip access-group BLOCK in",
            "end",
            "show access-lists",
        ],
    );
    assert_eq!(out[2], "% Invalid access list number.");
    assert_eq!(out[3], "");
    assert_eq!(out[5], "% Access-list not found.");
    assert_eq!(out[12], "");
    assert!(out[14].contains("Standard IP access list 10\n  permit 10.0.0.5 0.0.0.0"));
    assert!(out[14].contains("Extended IP access list BLOCK\n  10 deny tcp any host 10.0.0.1 eq 23\n  20 permit ip any any"));
}

#[test]
fn inbound_acl_blocks_telnet_but_not_ping() {
    let (mut net, r, pc) = router_and_pc();
    configure_router(
        &mut net,
        r,
        &[
            "ip access-list extended NO-TELNET",
            "deny tcp any any eq 23",
            "permit ip any any",
            "exit",
            "interface Gi0/0",
            "ip access-group NO-TELNET in",
        ],
    );
    assert_eq!(forward::ping(&mut net, pc, Ipv4Addr::new(10, 0, 0, 1)), Ok(()));
    let err = forward::telnet(&mut net, pc, Ipv4Addr::new(10, 0, 0, 1), 23).expect_err("blocked");
    assert!(matches!(err, DropReason::AclBlocked(_)));
}

#[test]
fn ospf_only_accepts_area_zero() {
    let mut net = Network::new();
    let r = net.add_router("R1");
    let mut s = RouterSession::new(r);
    let out = run(
        &mut s,
        &mut net,
        &[
            "enable",
            "configure terminal",
            "router ospf 1",
            "network 10.0.0.0 0.0.0.255 area 1",
            "network 10.0.0.0 0.0.0.255 area 0",
            "router-id 1.1.1.1",
            "end",
            "show ip protocols",
        ],
    );
    assert_eq!(out[3], "% Only area 0 is supported.");
    assert_eq!(out[4], "");
    assert!(out[7].contains("Routing Protocol is \"ospf 1\""));
    assert!(out[7].contains("Router ID 1.1.1.1"));
    assert!(out[7].contains("10.0.0.0 0.0.0.255 area 0"));
}

#[test]
fn console_login_through_pc_terminal() {
    let mut net = Network::new();
    let r = net.add_router("R1");
    let pc = net.add_pc("PC1");
    configure_router(&mut net, r, &["line console 0", "password cisco", "login"]);
    net.connect_by_name("PC1", "RS232", "R1", "Console", CableType::Auto)
        .expect("console cable");

    let mut s = PcSession::new(pc);
    let out = s.execute(&mut net, "terminal");
    assert_eq!(out, "Connected to router console. (Type 'exit' at the router prompt to close)");
    assert!(s.in_console());
    assert_eq!(s.prompt(&net), "Password:");
    assert_eq!(s.execute(&mut net, "wrong"), "% Bad passwords");
    assert_eq!(s.execute(&mut net, "cisco"), "");
    assert_eq!(s.prompt(&net), "R1>");
    assert_eq!(s.execute(&mut net, "exit"), "Connection closed.");
    assert!(!s.in_console());
    assert_eq!(s.prompt(&net), "PC1> ");
}

#[test]
fn console_password_keeps_the_whole_line() {
    let mut net = Network::new();
    let r = net.add_router("R1");
    configure_router(&mut net, r, &["line console 0", "password my secret", "login"]);
    let router = net.router(r).expect("router");
    assert_eq!(router.console.password, "my secret");

    let mut s = RouterSession::new(r);
    let out = run(&mut s, &mut net, &["enable", "conf t", "line console 0", "password"]);
    assert_eq!(out[3], "% Incomplete command.");
    assert_eq!(net.router(r).expect("router").console.password, "my secret");

    let mut console = RouterSession::console(&net, r);
    assert_eq!(console.prompt(&net), "Password:");
    assert_eq!(console.execute(&mut net, "my"), "% Bad passwords");
    assert_eq!(console.execute(&mut net, "my secret"), "");
    assert_eq!(console.prompt(&net), "R1>");
}

#[test]
fn powered_off_router_refuses_input() {
    let mut net = Network::new();
    let r = net.add_router("R1");
    let mut s = RouterSession::new(r);
    net.set_power(r, false);
    assert_eq!(
        s.execute(&mut net, "enable"),
        "% System is powered off. Flip the power switch to use the console."
    );
    net.set_power(r, true);
    assert_eq!(s.execute(&mut net, "enable"), "");
}

#[test]
fn write_memory_saves_startup_config() {
    let mut net = Network::new();
    let r = net.add_router("R1");
    let mut s = RouterSession::new(r);
    let out = run(
        &mut s,
        &mut net,
        &["enable", "show startup-config", "write memory", "show startup-config"],
    );
    assert_eq!(out[1], "startup-config is not present");
    assert_eq!(out[2], "Building configuration...\n[OK]");
    assert!(out[3].starts_with("enable\nconfigure terminal\nhostname R1\n"));
}

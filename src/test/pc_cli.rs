use super::{router_and_pc, run};
use crate::cli::{PcSession, TerminalSession};
use crate::net::{CableType, Network};

#[test]
fn help_and_unknown_commands() {
    let mut net = Network::new();
    let pc = net.add_pc("PC1");
    let mut s = PcSession::new(pc);
    assert_eq!(s.prompt(&net), "PC1> ");
    let out = run(&mut s, &mut net, &["help", "show run", "", "ipconfig extra"]);
    assert!(out[0].starts_with("Commands:\n  ipconfig"));
    assert!(out[0].contains("terminal"));
    assert_eq!(out[1], "Unknown command. Type 'help'.");
    assert_eq!(out[2], "");
    assert_eq!(out[3], "Unknown command. Type 'help'.");
}

#[test]
fn set_ip_validates_and_ipconfig_reports() {
    let mut net = Network::new();
    let pc = net.add_pc("PC1");
    let mut s = PcSession::new(pc);
    let out = run(
        &mut s,
        &mut net,
        &[
            "set ip 10.0.0.300 255.255.255.0",
            "set ip 10.0.0.5",
            "set ip 10.0.0.5 255.255.255.0 10.0.0.1",
            "set dns 8.8.8.8",
            "ipconfig",
        ],
    );
    assert_eq!(out[0], "Invalid IP address.");
    assert_eq!(out[1], "Usage: set ip <ip> <mask> [gateway]");
    assert_eq!(out[2], "OK");
    assert_eq!(out[3], "OK");
    assert!(out[4].contains("IP Address. . . . . . . . . . . . : 10.0.0.5"));
    assert!(out[4].contains("Default Gateway . . . . . . . . . : 10.0.0.1"));
    assert!(out[4].contains("DNS Server . . . . . . . . . . . .: 8.8.8.8"));
    // 没插线时仍回落到以太网口
    assert!(out[4].contains("Active NIC . . . . . . . . . . . . : Ethernet"));
    let p = net.pc(pc).expect("pc");
    assert!(!p.dhcp);
}

#[test]
fn arp_cache_fills_after_ping_and_clears() {
    let (mut net, _r, pc) = router_and_pc();
    let mut s = PcSession::new(pc);
    let out = run(&mut s, &mut net, &["arp -a", "ping 10.0.0.1", "arp -a", "arp -d *", "arp -a"]);
    assert_eq!(out[0], "No ARP Entries Found.");
    assert!(out[2].starts_with("Interface: 10.0.0.2 --- 0x1"));
    assert!(out[2].contains("10.0.0.1"));
    assert!(out[2].contains("dynamic"));
    assert_eq!(out[3], "ARP cache cleared.");
    assert_eq!(out[4], "No ARP Entries Found.");
}

#[test]
fn telnet_to_router_and_closed_port() {
    let (mut net, _r, pc) = router_and_pc();
    let mut s = PcSession::new(pc);
    let out = run(&mut s, &mut net, &["telnet 10.0.0.1", "telnet 10.0.0.1 0", "telnet 10.0.0.1 80"]);
    assert_eq!(out[0], "Connected to 10.0.0.1 on port 23.\nUser Access Verification");
    assert_eq!(out[1], "Invalid port.");
    assert_eq!(out[2], "Telnet to 10.0.0.1:80 failed (connection refused).");
}

#[test]
fn wifi_commands_need_an_adapter() {
    let mut net = Network::new();
    let pc = net.add_pc("PC1");
    let mut s = PcSession::new(pc);
    let no_adapter =
        "No WirelessAdapter found on this PC.\n(Add a wireless adapter to the PC to use wifi commands.)";
    let out = run(&mut s, &mut net, &["wifi scan", "wifi status", "wifi setkey secret"]);
    assert!(out.iter().all(|o| o == no_adapter));
    assert!(run(&mut s, &mut net, &["wifi"])[0].starts_with("WiFi Commands:"));
}

#[test]
fn terminal_requires_console_cable() {
    let mut net = Network::new();
    net.add_switch("SW1");
    let pc = net.add_pc("PC1");
    let mut s = PcSession::new(pc);
    assert_eq!(s.execute(&mut net, "terminal"), "No console cable connected.");

    net.connect_by_name("PC1", "RS232", "SW1", "Console", CableType::Auto)
        .expect("console cable");
    assert_eq!(
        s.execute(&mut net, "terminal"),
        "Connected to switch console. (Type 'exit' at the switch prompt to close)"
    );
    assert_eq!(s.prompt(&net), "SW1>");
    assert_eq!(s.execute(&mut net, "enable"), "");
    assert_eq!(s.prompt(&net), "SW1#");

    let port = net.lookup_port("SW1", "Console").expect("console port");
    net.disconnect(port).expect("disconnect console");
    assert_eq!(s.execute(&mut net, "show vlan brief"), "Connection closed.");
    assert!(!s.in_console());
}

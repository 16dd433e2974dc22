mod acl;
mod config_roundtrip;
mod dhcp;
mod etherchannel;
mod ifname;
mod lab;
mod nat;
mod pc_cli;
mod ping;
mod power;
mod router_cli;
mod routing;
mod simulator;
mod stp;
mod trunk;

use crate::cli::{PcSession, RouterSession, TerminalSession};
use crate::net::{CableType, DeviceId, Network};

/// 逐行执行，返回每行输出
pub(crate) fn run(session: &mut dyn TerminalSession, net: &mut Network, lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| session.execute(net, l)).collect()
}

/// 逐行执行并断言没有任何一行被拒绝
pub(crate) fn run_ok(session: &mut dyn TerminalSession, net: &mut Network, lines: &[&str]) {
    for l in lines {
        let out = session.execute(net, l);
        assert!(!out.starts_with('%'), "`{l}` rejected: {out}");
    }
}

pub(crate) fn configure_router(net: &mut Network, dev: DeviceId, lines: &[&str]) {
    let mut s = RouterSession::new(dev);
    run_ok(&mut s, net, &["enable", "configure terminal"]);
    run_ok(&mut s, net, lines);
    run_ok(&mut s, net, &["end"]);
}

pub(crate) fn set_pc_ip(net: &mut Network, pc: DeviceId, ip: &str, mask: &str, gw: &str) {
    let mut s = PcSession::new(pc);
    let out = s.execute(net, &format!("set ip {ip} {mask} {gw}"));
    assert_eq!(out, "OK");
}

/// R1 Gi0/0 10.0.0.1/24 ↔ PC1 10.0.0.2/24（网关 10.0.0.1）
pub(crate) fn router_and_pc() -> (Network, DeviceId, DeviceId) {
    let mut net = Network::new();
    let r = net.add_router("R1");
    let pc = net.add_pc("PC1");
    net.connect_by_name("R1", "Gi0/0", "PC1", "FastEthernet0", CableType::Auto)
        .expect("cable R1-PC1");
    configure_router(
        &mut net,
        r,
        &["interface Gi0/0", "ip address 10.0.0.1 255.255.255.0", "no shutdown"],
    );
    set_pc_ip(&mut net, pc, "10.0.0.2", "255.255.255.0", "10.0.0.1");
    (net, r, pc)
}

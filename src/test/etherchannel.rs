use super::run_ok;
use crate::cli::{SwitchSession, TerminalSession};
use crate::net::{CableType, DeviceId, Network};
use crate::stp::{self, MemberFlag};

/// SW1 与 SW2 之间两根线（Gi0/1、Gi0/2），两端按给定模式配置 channel-group 1
fn bundle(mode_a: &str, mode_b: &str) -> (Network, DeviceId, DeviceId) {
    let mut net = Network::new();
    let a = net.add_switch("SW1");
    let b = net.add_switch("SW2");
    net.connect_by_name("SW1", "Gi0/1", "SW2", "Gi0/1", CableType::Auto).expect("link 1");
    net.connect_by_name("SW1", "Gi0/2", "SW2", "Gi0/2", CableType::Auto).expect("link 2");
    for (dev, mode) in [(a, mode_a), (b, mode_b)] {
        let mut s = SwitchSession::new(dev);
        let group = format!("channel-group 1 mode {mode}");
        run_ok(
            &mut s,
            &mut net,
            &["enable", "configure terminal", "interface range gi0/1-2", &group, "end"],
        );
    }
    net.refresh_links();
    (net, a, b)
}

fn formed(net: &Network, dev: DeviceId) -> bool {
    net.switch(dev)
        .and_then(|s| s.port_channel(1))
        .is_some_and(|pc| pc.formed)
}

#[test]
fn lacp_negotiation_matrix() {
    for (a, b, expect) in [
        ("active", "active", true),
        ("active", "passive", true),
        ("passive", "active", true),
        ("passive", "passive", false),
        ("on", "on", true),
        ("on", "active", false),
    ] {
        let (net, s1, s2) = bundle(a, b);
        assert_eq!(formed(&net, s1), expect, "{a}/{b} on SW1");
        assert_eq!(formed(&net, s2), expect, "{a}/{b} on SW2");
    }
}

#[test]
fn passive_pair_reports_suspension_reason() {
    let (net, s1, _) = bundle("passive", "passive");
    let sw = net.switch(s1).expect("switch");
    for m in sw.channel_members(1) {
        let st = stp::member_state(&net, s1, 1, m);
        assert_eq!(st.flag, MemberFlag::Suspended);
        assert_eq!(st.reason, Some("LACP passive/passive"));
        assert!(m.channel_suspended);
    }
    assert_eq!(stp::suspend_reason(&net, s1, 1), "LACP passive/passive");
}

#[test]
fn summary_and_protocol() {
    let (mut net, s1, _) = bundle("active", "passive");
    assert_eq!(stp::protocol_name(&net, s1, 1), "LACP");
    let mut s = SwitchSession::new(s1);
    let out = s.execute(&mut net, "show etherchannel summary");
    let row = out.lines().last().expect("group row");
    assert!(row.starts_with("1     Po1"));
    assert!(row.contains("LACP"));
    assert!(row.contains("Gi0/1(P) Gi0/2(P) (SU)"), "{row}");

    let (net, s1, _) = bundle("on", "on");
    assert_eq!(stp::protocol_name(&net, s1, 1), "NONE(static)");
}

#[test]
fn formed_channel_counts_as_one_stp_link() {
    let (mut net, s1, s2) = bundle("active", "active");
    stp::recompute(&mut net);
    for dev in [s1, s2] {
        let sw = net.switch(dev).expect("switch");
        assert!(
            sw.ports
                .iter()
                .all(|p| p.stp_state != crate::device::switch::StpState::Blocking),
            "parallel members must not block each other"
        );
    }
}

#[test]
fn shutting_the_port_channel_shuts_members() {
    let (mut net, s1, _) = bundle("active", "active");
    let mut s = SwitchSession::new(s1);
    run_ok(&mut s, &mut net, &["enable", "conf t", "interface po1", "shutdown", "end"]);
    let sw = net.switch(s1).expect("switch");
    assert!(sw.channel_members(1).iter().all(|m| !m.admin_up));
    assert!(!formed(&net, s1));

    run_ok(&mut s, &mut net, &["conf t", "interface range gi0/1-2", "no channel-group", "end"]);
    let sw = net.switch(s1).expect("switch");
    assert!(sw.channel_members(1).is_empty());
}

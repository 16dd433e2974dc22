use std::net::Ipv4Addr;

use super::router_and_pc;
use crate::cli::{RouterSession, TerminalSession};
use crate::device::router::{ModuleError, ModuleKind};
use crate::forward;
use crate::net::{CableType, Network};

const POWER_OFF: &str = "% System is powered off. Flip the power switch to use the console.";

#[test]
fn device_needing_external_power_waits_for_an_outlet() {
    let mut net = Network::new();
    let r = net.add_router("R1");
    net.add_power_outlet("Wall");
    net.set_requires_external_power(r, true);
    assert!(!net.is_powered(r));
    let mut s = RouterSession::new(r);
    assert_eq!(s.execute(&mut net, "enable"), POWER_OFF);

    net.connect_by_name("R1", "Power", "Wall", "Socket1", CableType::Auto)
        .expect("power cord");
    assert!(net.is_powered(r));
    assert_eq!(s.execute(&mut net, "enable"), "");

    let cord = net.lookup_port("R1", "Power").expect("power port");
    net.disconnect(cord).expect("unplug");
    assert!(!net.is_powered(r));
    assert_eq!(s.execute(&mut net, "show version"), POWER_OFF);
}

#[test]
fn power_distribution_unit_must_itself_be_fed() {
    let mut net = Network::new();
    let sw = net.add_switch("SW1");
    net.add_power_distribution("PDU");
    net.add_power_outlet("Wall");
    net.set_requires_external_power(sw, true);
    net.connect_by_name("SW1", "Power", "PDU", "Outlet1", CableType::Auto)
        .expect("switch to PDU");
    assert!(!net.is_powered(sw), "PDU has no feed yet");

    net.connect_by_name("PDU", "PowerIn", "Wall", "Socket2", CableType::Auto)
        .expect("PDU to wall");
    assert!(net.is_powered(sw));

    let pdu = net.device_by_name("PDU").expect("PDU");
    net.set_power(pdu, false);
    assert!(!net.is_powered(sw));
}

#[test]
fn power_and_data_ports_do_not_mix() {
    let mut net = Network::new();
    let r = net.add_router("R1");
    net.add_power_outlet("Wall");
    net.set_requires_external_power(r, true);
    assert!(
        net.connect_by_name("R1", "Gi0/0", "Wall", "Socket1", CableType::Auto)
            .is_err()
    );
}

#[test]
fn powering_off_a_peer_takes_the_link_down() {
    let (mut net, r, pc) = router_and_pc();
    let gw = Ipv4Addr::new(10, 0, 0, 1);
    assert_eq!(forward::ping(&mut net, pc, gw), Ok(()));

    net.set_power(r, false);
    let gi0 = net.lookup_port("PC1", "FastEthernet0").expect("nic");
    assert!(!net.has_link(gi0));
    assert!(forward::ping(&mut net, pc, gw).is_err());

    net.set_power(r, true);
    assert!(
        net.router(r)
            .and_then(|x| x.interface("Gi0/0"))
            .is_some_and(|i| i.protocol_up)
    );
    assert_eq!(forward::ping(&mut net, pc, gw), Ok(()));
}

#[test]
fn modules_change_only_while_powered_off() {
    let mut net = Network::new();
    let r = net.add_router("R1");
    assert!(matches!(
        net.install_module(r, 0, ModuleKind::Hwic4Esw),
        Err(ModuleError::PoweredOn { .. })
    ));

    net.set_power(r, false);
    net.install_module(r, 0, ModuleKind::Hwic4Esw).expect("HWIC in HWIC slot");
    assert_eq!(
        net.install_module(r, 2, ModuleKind::Hwic2T),
        Err(ModuleError::Incompatible {
            module: ModuleKind::Hwic2T,
            slot_type: crate::device::router::SlotType::Wic,
            slot: 2,
        })
    );
    assert_eq!(net.install_module(r, 9, ModuleKind::Wic1T), Err(ModuleError::UnknownSlot(9)));
    net.install_module(r, 2, ModuleKind::Wic2T).expect("WIC-2T");
    net.set_power(r, true);

    let router = net.router(r).expect("router");
    assert!(router.switchport("FastEthernet0/0/3").is_some());
    assert!(router.interface("Serial0/2/1").is_some());
    assert!(net.lookup_port("R1", "Fa0/0/0").is_ok());

    let mut s = RouterSession::new(r);
    let version = s.execute(&mut net, "show version");
    assert!(version.contains("Slot 0 (HWIC): HWIC-4ESW"));
    assert!(version.contains("Slot 2 (WIC): WIC-2T"));
    assert!(version.contains("Slot 3 (EHWIC): empty"));

    net.set_power(r, false);
    net.remove_module(r, 0).expect("remove");
    assert!(net.router(r).is_some_and(|x| x.switchport("FastEthernet0/0/3").is_none()));
    assert!(net.lookup_port("R1", "Fa0/0/0").is_err());
}

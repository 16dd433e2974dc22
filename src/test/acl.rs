use std::net::Ipv4Addr;

use crate::device::router::{
    AclAction, AclAddress, AclPacket, AclProtocol, AclRule, ExtendedAcl, StandardAclEntry,
    standard_acl_permits,
};
use crate::forward::Protocol;

fn rule(action: AclAction, protocol: AclProtocol, dst: AclAddress, dst_port: Option<u16>) -> AclRule {
    AclRule {
        sequence: 0,
        action,
        protocol,
        src: AclAddress::Any,
        dst,
        dst_port,
    }
}

fn tcp(dst: [u8; 4], port: u16) -> AclPacket {
    AclPacket {
        protocol: Protocol::Tcp,
        src: Ipv4Addr::new(192, 168, 1, 10),
        dst: Ipv4Addr::from(dst),
        dst_port: port,
    }
}

#[test]
fn empty_acl_denies_everything() {
    let acl = ExtendedAcl::new("EMPTY");
    let v = acl.evaluate(&tcp([10, 0, 0, 1], 23));
    assert!(!v.permit);
    assert_eq!(v.hit, "(implicit deny)");
}

#[test]
fn first_matching_rule_wins() {
    let server = Ipv4Addr::new(10, 0, 0, 5);
    let mut acl = ExtendedAcl::new("WEB");
    acl.add_rule(
        rule(AclAction::Deny, AclProtocol::Tcp, AclAddress::Host(server), Some(23)),
        None,
    );
    acl.add_rule(rule(AclAction::Permit, AclProtocol::Ip, AclAddress::Any, None), None);

    assert!(!acl.evaluate(&tcp([10, 0, 0, 5], 23)).permit);
    assert!(acl.evaluate(&tcp([10, 0, 0, 5], 80)).permit);
    assert!(acl.evaluate(&tcp([10, 0, 0, 6], 23)).permit);
    assert_eq!(
        acl.rules.iter().map(|r| r.sequence).collect::<Vec<_>>(),
        vec![10, 20]
    );
}

#[test]
fn explicit_sequence_orders_and_replaces() {
    let mut acl = ExtendedAcl::new("SEQ");
    acl.add_rule(rule(AclAction::Permit, AclProtocol::Ip, AclAddress::Any, None), Some(20));
    acl.add_rule(rule(AclAction::Deny, AclProtocol::Icmp, AclAddress::Any, None), Some(5));
    assert_eq!(acl.rules[0].sequence, 5);
    assert_eq!(acl.rules[0].to_string(), "5 deny icmp any any");

    acl.add_rule(rule(AclAction::Deny, AclProtocol::Ip, AclAddress::Any, None), Some(20));
    assert_eq!(acl.rules.len(), 2);
    assert_eq!(acl.rules[1].action, AclAction::Deny);
    assert!(acl.remove_sequence(5));
    assert!(!acl.remove_sequence(5));
}

#[test]
fn rule_text_includes_port_only_for_tcp_and_udp() {
    let r = rule(
        AclAction::Permit,
        AclProtocol::Tcp,
        AclAddress::Host(Ipv4Addr::new(10, 0, 0, 5)),
        Some(23),
    );
    let mut acl = ExtendedAcl::new("T");
    acl.add_rule(r, None);
    assert_eq!(acl.rules[0].to_string(), "10 permit tcp any host 10.0.0.5 eq 23");
}

#[test]
fn standard_acl_uses_wildcards_and_denies_by_default() {
    let entries = vec![
        StandardAclEntry {
            number: 1,
            action: AclAction::Deny,
            network: Ipv4Addr::new(192, 168, 1, 66),
            wildcard: Ipv4Addr::UNSPECIFIED,
        },
        StandardAclEntry {
            number: 1,
            action: AclAction::Permit,
            network: Ipv4Addr::new(192, 168, 1, 0),
            wildcard: Ipv4Addr::new(0, 0, 0, 255),
        },
    ];
    assert!(standard_acl_permits(&entries, 1, Ipv4Addr::new(192, 168, 1, 10)));
    assert!(!standard_acl_permits(&entries, 1, Ipv4Addr::new(192, 168, 1, 66)));
    assert!(!standard_acl_permits(&entries, 1, Ipv4Addr::new(10, 0, 0, 1)));
    assert!(!standard_acl_permits(&entries, 2, Ipv4Addr::new(192, 168, 1, 10)));
}

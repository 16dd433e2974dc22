//! 访问控制列表
//!
//! 命名扩展 ACL（按序号排序、首条匹配、隐式拒绝）与编号标准 ACL（供 NAT 使用）。

use std::fmt;
use std::net::Ipv4Addr;

use crate::forward::Protocol;
use crate::net::ipv4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AclAction {
    Permit,
    Deny,
}

impl fmt::Display for AclAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AclAction::Permit => "permit",
            AclAction::Deny => "deny",
        })
    }
}

impl AclAction {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "permit" => Some(AclAction::Permit),
            "deny" => Some(AclAction::Deny),
            _ => None,
        }
    }
}

/// 规则协议；`ip` 匹配任意协议。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AclProtocol {
    Ip,
    Icmp,
    Tcp,
    Udp,
}

impl fmt::Display for AclProtocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AclProtocol::Ip => "ip",
            AclProtocol::Icmp => "icmp",
            AclProtocol::Tcp => "tcp",
            AclProtocol::Udp => "udp",
        })
    }
}

impl AclProtocol {
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "ip" => Some(AclProtocol::Ip),
            "icmp" => Some(AclProtocol::Icmp),
            "tcp" => Some(AclProtocol::Tcp),
            "udp" => Some(AclProtocol::Udp),
            _ => None,
        }
    }

    pub fn has_ports(self) -> bool {
        matches!(self, AclProtocol::Tcp | AclProtocol::Udp)
    }

    fn matches(self, pkt: Protocol) -> bool {
        match self {
            AclProtocol::Ip => true,
            AclProtocol::Icmp => pkt == Protocol::Icmp,
            AclProtocol::Tcp => pkt == Protocol::Tcp,
            AclProtocol::Udp => pkt == Protocol::Udp,
        }
    }
}

/// 规则中的地址：`any` 或单个主机
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AclAddress {
    Any,
    Host(Ipv4Addr),
}

impl fmt::Display for AclAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AclAddress::Any => f.write_str("any"),
            AclAddress::Host(ip) => write!(f, "host {ip}"),
        }
    }
}

impl AclAddress {
    pub fn matches(&self, ip: Ipv4Addr) -> bool {
        match self {
            AclAddress::Any => true,
            AclAddress::Host(h) => *h == ip,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclRule {
    pub sequence: u32,
    pub action: AclAction,
    pub protocol: AclProtocol,
    pub src: AclAddress,
    pub dst: AclAddress,
    pub dst_port: Option<u16>,
}

impl fmt::Display for AclRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {}",
            self.sequence, self.action, self.protocol, self.src, self.dst
        )?;
        match self.dst_port {
            Some(p) if self.protocol.has_ports() => write!(f, " eq {p}"),
            _ => Ok(()),
        }
    }
}

impl AclRule {
    fn matches(&self, pkt: &AclPacket) -> bool {
        if !self.protocol.matches(pkt.protocol) {
            return false;
        }
        if !self.src.matches(pkt.src) || !self.dst.matches(pkt.dst) {
            return false;
        }
        if matches!(pkt.protocol, Protocol::Tcp | Protocol::Udp) {
            if let Some(p) = self.dst_port {
                return p == pkt.dst_port;
            }
        }
        true
    }
}

/// ACL 判定所需的报文字段
#[derive(Debug, Clone, Copy)]
pub struct AclPacket {
    pub protocol: Protocol,
    pub src: Ipv4Addr,
    pub dst: Ipv4Addr,
    pub dst_port: u16,
}

/// 判定结果：是否放行，以及命中的规则文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AclVerdict {
    pub permit: bool,
    pub hit: String,
}

/// 命名扩展 ACL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendedAcl {
    pub name: String,
    pub rules: Vec<AclRule>,
    next_seq: u32,
}

impl ExtendedAcl {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_string(),
            rules: Vec::new(),
            next_seq: 10,
        }
    }

    /// 追加规则；未给序号时自动取下一个（步长 10）。同序号的旧规则被替换。
    pub fn add_rule(&mut self, mut rule: AclRule, sequence: Option<u32>) {
        rule.sequence = sequence.unwrap_or(self.next_seq);
        self.rules.retain(|r| r.sequence != rule.sequence);
        self.next_seq = self.next_seq.max(rule.sequence + 10);
        self.rules.push(rule);
        self.rules.sort_by_key(|r| r.sequence);
    }

    pub fn remove_sequence(&mut self, sequence: u32) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.sequence != sequence);
        self.rules.len() != before
    }

    /// 首条匹配；都不匹配时隐式拒绝。
    pub fn evaluate(&self, pkt: &AclPacket) -> AclVerdict {
        match self.rules.iter().find(|r| r.matches(pkt)) {
            Some(r) => AclVerdict {
                permit: r.action == AclAction::Permit,
                hit: r.to_string(),
            },
            None => AclVerdict {
                permit: false,
                hit: "(implicit deny)".to_string(),
            },
        }
    }
}

/// 编号标准 ACL 的一条（network + wildcard）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StandardAclEntry {
    pub number: u32,
    pub action: AclAction,
    pub network: Ipv4Addr,
    pub wildcard: Ipv4Addr,
}

impl StandardAclEntry {
    pub fn matches(&self, ip: Ipv4Addr) -> bool {
        let mask = ipv4::wildcard_to_mask(self.wildcard);
        ipv4::same_subnet(ip, self.network, mask)
    }
}

/// 标准 ACL 判定：编号内首条匹配生效，没有匹配则拒绝。
pub fn standard_acl_permits(entries: &[StandardAclEntry], number: u32, ip: Ipv4Addr) -> bool {
    entries
        .iter()
        .filter(|e| e.number == number)
        .find(|e| e.matches(ip))
        .is_some_and(|e| e.action == AclAction::Permit)
}

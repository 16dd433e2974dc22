//! IPv4 工具函数
//!
//! 地址解析、掩码与前缀转换、同网段判断。

use std::net::Ipv4Addr;

/// 解析点分十进制地址，四段都必须是 0..=255。
pub fn parse_ipv4(s: &str) -> Option<Ipv4Addr> {
    let parts: Vec<&str> = s.trim().split('.').collect();
    if parts.len() != 4 {
        return None;
    }
    let mut octets = [0u8; 4];
    for (slot, part) in octets.iter_mut().zip(parts) {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *slot = part.parse::<u8>().ok()?;
    }
    Some(Ipv4Addr::from(octets))
}

/// 掩码转前缀长度；仅接受连续的掩码。
pub fn mask_to_prefix(mask: Ipv4Addr) -> Option<u8> {
    let m = u32::from(mask);
    let ones = m.leading_ones();
    if m.checked_shl(ones).unwrap_or(0) != 0 {
        return None;
    }
    Some(ones as u8)
}

/// 前缀长度转掩码
pub fn prefix_to_mask(prefix: u8) -> Ipv4Addr {
    let p = u32::from(prefix.min(32));
    let m = if p == 0 { 0 } else { u32::MAX << (32 - p) };
    Ipv4Addr::from(m)
}

/// 掩码中置位的个数（非连续掩码也能计数）。
pub fn count_mask_bits(mask: Ipv4Addr) -> u32 {
    u32::from(mask).count_ones()
}

/// 网络地址
pub fn network_of(ip: Ipv4Addr, mask: Ipv4Addr) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(ip) & u32::from(mask))
}

pub fn same_subnet(a: Ipv4Addr, b: Ipv4Addr, mask: Ipv4Addr) -> bool {
    network_of(a, mask) == network_of(b, mask)
}

/// 通配符掩码取反得到普通掩码。
pub fn wildcard_to_mask(wildcard: Ipv4Addr) -> Ipv4Addr {
    Ipv4Addr::from(!u32::from(wildcard))
}

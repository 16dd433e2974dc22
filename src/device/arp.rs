//! ARP 缓存
//!
//! IP → MAC（可带出接口），按地址排序。

use std::collections::BTreeMap;
use std::net::Ipv4Addr;

use crate::sim::SimTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArpEntry {
    pub ip: Ipv4Addr,
    pub mac: String,
    pub interface: Option<String>,
    pub last_seen: SimTime,
}

#[derive(Debug, Clone, Default)]
pub struct ArpTable {
    entries: BTreeMap<Ipv4Addr, ArpEntry>,
}

impl ArpTable {
    /// 新增或刷新条目；未给出接口时保留原接口。
    pub fn upsert(&mut self, ip: Ipv4Addr, mac: &str, interface: Option<&str>, now: SimTime) {
        if mac.trim().is_empty() {
            return;
        }
        let entry = self.entries.entry(ip).or_insert_with(|| ArpEntry {
            ip,
            mac: String::new(),
            interface: None,
            last_seen: now,
        });
        entry.mac = mac.to_string();
        if let Some(i) = interface {
            entry.interface = Some(i.to_string());
        }
        entry.last_seen = now;
    }

    pub fn get(&self, ip: Ipv4Addr) -> Option<&ArpEntry> {
        self.entries.get(&ip)
    }

    pub fn entries(&self) -> impl Iterator<Item = &ArpEntry> {
        self.entries.values()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

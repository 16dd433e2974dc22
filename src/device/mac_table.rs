//! MAC 地址表
//!
//! (MAC, VLAN) → 接口，带老化时间。

use crate::sim::SimTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacEntry {
    /// 统一为大写
    pub mac: String,
    pub vlan: u16,
    pub interface: String,
    pub last_seen: SimTime,
}

#[derive(Debug, Clone, Default)]
pub struct MacTable {
    entries: Vec<MacEntry>,
}

impl MacTable {
    /// 学习源 MAC；同一 (MAC, VLAN) 只保留一条，刷新接口和时间。
    pub fn learn(&mut self, mac: &str, vlan: u16, interface: &str, now: SimTime) {
        let mac = mac.trim().to_ascii_uppercase();
        if mac.is_empty() || interface.trim().is_empty() {
            return;
        }
        if let Some(e) = self
            .entries
            .iter_mut()
            .find(|e| e.mac == mac && e.vlan == vlan)
        {
            e.interface = interface.to_string();
            e.last_seen = now;
            return;
        }
        self.entries.push(MacEntry {
            mac,
            vlan,
            interface: interface.to_string(),
            last_seen: now,
        });
    }

    pub fn lookup(&self, mac: &str, vlan: u16) -> Option<&str> {
        let mac = mac.trim().to_ascii_uppercase();
        self.entries
            .iter()
            .find(|e| e.mac == mac && e.vlan == vlan)
            .map(|e| e.interface.as_str())
    }

    /// 删除早于 `now - max_age` 的条目；`max_age` 为 `None` 时不老化。
    pub fn purge(&mut self, now: SimTime, max_age: Option<SimTime>) {
        let Some(age) = max_age else {
            return;
        };
        let cutoff = now.0.saturating_sub(age.0);
        self.entries.retain(|e| e.last_seen.0 >= cutoff);
    }

    pub fn remove_interface(&mut self, interface: &str) {
        self.entries
            .retain(|e| !e.interface.eq_ignore_ascii_case(interface));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> &[MacEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

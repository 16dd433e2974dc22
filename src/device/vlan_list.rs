//! VLAN 列表
//!
//! 解析与输出 Cisco 风格的 VLAN 列表（`1,10-20`、`all`）。

use std::collections::BTreeSet;
use std::fmt;

pub const MIN_VLAN: u16 = 1;
pub const MAX_VLAN: u16 = 4094;

pub fn is_valid_vlan(v: i64) -> bool {
    (i64::from(MIN_VLAN)..=i64::from(MAX_VLAN)).contains(&v)
}

/// 有序 VLAN 集合
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VlanSet(BTreeSet<u16>);

impl VlanSet {
    pub fn single(v: u16) -> Self {
        Self(BTreeSet::from([v]))
    }

    pub fn all() -> Self {
        Self((MIN_VLAN..=MAX_VLAN).collect())
    }

    /// 宽松解析：忽略无法识别的片段，数值夹到 1..=4094，区间端点可颠倒。
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if text.eq_ignore_ascii_case("all") {
            return Self::all();
        }
        let clamp = |v: i64| v.clamp(i64::from(MIN_VLAN), i64::from(MAX_VLAN)) as u16;
        let mut set = BTreeSet::new();
        for token in text.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            if let Some((a, b)) = token.split_once('-') {
                let (Ok(a), Ok(b)) = (a.trim().parse::<i64>(), b.trim().parse::<i64>()) else {
                    continue;
                };
                let (lo, hi) = if a > b { (b, a) } else { (a, b) };
                set.extend(clamp(lo)..=clamp(hi));
            } else if let Ok(v) = token.parse::<i64>() {
                set.insert(clamp(v));
            }
        }
        Self(set)
    }

    pub fn contains(&self, v: u16) -> bool {
        self.0.contains(&v)
    }

    pub fn extend(&mut self, other: &VlanSet) {
        self.0.extend(other.0.iter().copied());
    }

    pub fn remove_all(&mut self, other: &VlanSet) {
        self.0.retain(|v| !other.0.contains(v));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = u16> + '_ {
        self.0.iter().copied()
    }
}

/// 连续的 VLAN 合并为区间：`1,10-12`。
impl fmt::Display for VlanSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut ranges: Vec<String> = Vec::new();
        let mut iter = self.0.iter().copied();
        let Some(first) = iter.next() else {
            return Ok(());
        };
        let (mut start, mut prev) = (first, first);
        let mut push = |start: u16, prev: u16| {
            ranges.push(if start == prev {
                start.to_string()
            } else {
                format!("{start}-{prev}")
            })
        };
        for v in iter {
            if v == prev + 1 {
                prev = v;
                continue;
            }
            push(start, prev);
            start = v;
            prev = v;
        }
        push(start, prev);
        f.write_str(&ranges.join(","))
    }
}

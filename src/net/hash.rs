//! 稳定哈希
//!
//! 基于 splitmix64 的确定性哈希，用于 EtherChannel 成员选择与桥 MAC 推导。

/// splitmix64 混合函数
pub fn mix64(mut x: u64) -> u64 {
    // splitmix64
    x = x.wrapping_add(0x9E3779B97F4A7C15);
    let mut z = x;
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58476D1CE4E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D049BB133111EB);
    z ^ (z >> 31)
}

/// 对字符串做稳定哈希（逐字节折叠进 mix64）。
pub fn hash_str(s: &str) -> u64 {
    s.bytes()
        .fold(0xcbf2_9ce4_8422_2325, |h, b| mix64(h ^ u64::from(b)))
}

/// 由设备名推导出稳定的伪 MAC（`xxxx.xxxx.xxxx`）。
pub fn derive_mac(name: &str) -> String {
    let h = hash_str(name);
    let a = (h >> 16) & 0xffff;
    let b = h & 0xffff;
    let c = (name.len() as u64).wrapping_mul(313) & 0xffff;
    format!("{a:04x}.{b:04x}.{c:04x}")
}

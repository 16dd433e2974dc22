//! 接口名规范化
//!
//! 把 `gi0/1`、`Fa0/1`、`po1` 等缩写展开为规范名称，并提供短名与子接口解析。

/// (小写前缀, 规范前缀)，较长的前缀排在前面。
const PREFIXES: &[(&str, &str)] = &[
    ("port-channel", "Port-channel"),
    ("po", "Port-channel"),
    ("gigabitethernet", "GigabitEthernet"),
    ("gig", "GigabitEthernet"),
    ("gi", "GigabitEthernet"),
    ("g", "GigabitEthernet"),
    ("fastethernet", "FastEthernet"),
    ("fast", "FastEthernet"),
    ("fa", "FastEthernet"),
    ("f", "FastEthernet"),
    ("serial", "Serial"),
    ("se", "Serial"),
    ("s", "Serial"),
];

const SHORT: &[(&str, &str)] = &[
    ("Port-channel", "Po"),
    ("GigabitEthernet", "Gi"),
    ("FastEthernet", "Fa"),
    ("Serial", "Se"),
];

/// 规范化接口名；无法识别的名字原样返回（去掉首尾空白）。
pub fn normalize(raw: &str) -> String {
    let raw = raw.trim();
    let lower = raw.to_ascii_lowercase();
    for (prefix, canonical) in PREFIXES {
        if let Some(rest) = lower.strip_prefix(prefix) {
            let rest = rest.trim_start();
            if rest.starts_with(|c: char| c.is_ascii_digit()) {
                let tail: String = raw[raw.len() - rest.len()..]
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                return format!("{canonical}{tail}");
            }
        }
    }
    raw.to_string()
}

/// 规范名转短名（`GigabitEthernet0/1` → `Gi0/1`）。
pub fn short(name: &str) -> String {
    let full = normalize(name);
    for (long, abbr) in SHORT {
        if let Some(rest) = full.strip_prefix(long) {
            return format!("{abbr}{rest}");
        }
    }
    full
}

/// 解析子接口：返回 (父接口, 子接口号)，子接口号在 1..=4094。
pub fn split_subinterface(name: &str) -> Option<(&str, u16)> {
    let dot = name.rfind('.')?;
    if dot == 0 || dot + 1 >= name.len() {
        return None;
    }
    let sub: u16 = name[dot + 1..].parse().ok()?;
    if !(1..=4094).contains(&sub) {
        return None;
    }
    Some((&name[..dot], sub))
}

/// `Port-channel<n>` 中的 n
pub fn port_channel_id(name: &str) -> Option<u32> {
    let full = normalize(name);
    full.strip_prefix("Port-channel")?.parse().ok()
}

pub fn port_channel_name(id: u32) -> String {
    format!("Port-channel{id}")
}

/// 两个接口名在规范化后是否相同（大小写不敏感）。
pub fn same_interface(a: &str, b: &str) -> bool {
    normalize(a).eq_ignore_ascii_case(&normalize(b))
}

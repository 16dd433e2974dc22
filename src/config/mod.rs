//! 配置序列化模块
//!
//! 把设备的控制面状态写成可回放的命令脚本（`show running-config` / `write memory`
//! 的内容），以及把这样的脚本逐行喂回一个终端会话。
//!
//! 脚本以 `enable` / `configure terminal` 开头、以 `end` / `write memory` 结尾，
//! 回放到一台同型号的新设备后再序列化，得到的文本与原文相同。

// 子模块声明
mod replay;
mod router;
mod switch;

// 重新导出公共接口
pub use replay::{Rejected, replay, replay_into};
pub use router::serialize_router;
pub use switch::serialize_switch;

use crate::device::{L2Config, SwitchportMode};
use crate::net::{DeviceId, DeviceKind, Network};

/// 按设备类型序列化；没有 CLI 配置的设备返回 `None`。
pub fn running_config(net: &Network, dev: DeviceId) -> Option<String> {
    match &net.device(dev).kind {
        DeviceKind::Router(_) => serialize_router(net, dev),
        DeviceKind::Switch(_) => serialize_switch(net, dev),
        _ => None,
    }
}

/// 交换口、Port-channel 与路由器内嵌交换口共用的 switchport 行
pub(crate) fn switchport_lines(out: &mut Vec<String>, l2: &L2Config) {
    match l2.mode {
        SwitchportMode::Access => {
            out.push(" switchport mode access".to_string());
            out.push(format!(" switchport access vlan {}", l2.access_vlan));
        }
        SwitchportMode::Trunk => {
            out.push(" switchport mode trunk".to_string());
            out.push(format!(" switchport trunk native vlan {}", l2.native_vlan));
            if l2.allowed.is_empty() {
                out.push(" switchport trunk allowed vlan none".to_string());
            } else {
                out.push(format!(" switchport trunk allowed vlan {}", l2.allowed));
            }
        }
    }
}

/// 把行拼成以换行结尾的脚本
pub(crate) fn script(lines: Vec<String>) -> String {
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

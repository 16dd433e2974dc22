//! 交换机配置序列化

use super::{script, switchport_lines};
use crate::device::switch::{ChannelMode, DEFAULT_STP_PRIORITY};
use crate::net::{DeviceId, Network};

const DEFAULT_MAC_AGING_SECS: i64 = 30;

/// 交换机的运行配置脚本；设备不是交换机时返回 `None`。
pub fn serialize_switch(net: &Network, dev: DeviceId) -> Option<String> {
    let sw = net.switch(dev)?;
    let mut out = vec![
        "enable".to_string(),
        "configure terminal".to_string(),
        format!("hostname {}", net.device(dev).name),
    ];
    if sw.stp_priority != DEFAULT_STP_PRIORITY {
        out.push(format!("spanning-tree vlan 1 priority {}", sw.stp_priority));
    }
    if sw.mac_aging_secs != DEFAULT_MAC_AGING_SECS {
        out.push(format!("mac address-table aging-time {}", sw.mac_aging_secs));
    }

    // VLAN 1 保持出厂名字时不输出
    for v in sw.vlans.values() {
        if v.id == 1 && v.name.eq_ignore_ascii_case("default") {
            continue;
        }
        out.push(format!("vlan {}", v.id));
        out.push(format!(" name {}", v.name));
        out.push(" exit".to_string());
    }

    for p in &sw.ports {
        out.push(format!("interface {}", p.name));
        if let Some(desc) = &p.description {
            out.push(format!(" description {desc}"));
        }
        switchport_lines(&mut out, &p.l2);
        if let Some(group) = p.channel() {
            if p.channel_mode != ChannelMode::None {
                out.push(format!(" channel-group {group} mode {}", p.channel_mode));
            }
        }
        out.push(if p.admin_up { " no shutdown" } else { " shutdown" }.to_string());
        out.push(" exit".to_string());
    }

    for pc in &sw.port_channels {
        out.push(format!("interface {}", pc.name()));
        switchport_lines(&mut out, &pc.l2);
        out.push(" exit".to_string());
    }

    out.push("end".to_string());
    out.push("write memory".to_string());
    Some(script(out))
}

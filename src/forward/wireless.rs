//! 无线关联
//!
//! PC 的无线网卡按 SSID、频段、覆盖距离和 WPA2 口令选择接入点；
//! 关联后在接入点内部交换机上生成一个 `Wlan0/nn` 口并与网卡直接相连。

use std::fmt;

use thiserror::Error;

use crate::device::access_point::{WifiBand, WifiSecurity};
use crate::device::pc::{Association, WifiAdapter};
use crate::net::{DeviceId, Network, PortId, PortMedium};
use tracing::{debug, info};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WifiError {
    #[error("No WirelessAdapter found on this PC.")]
    NoAdapter,
    #[error("No reachable AP found for SSID '{0}'.\nRun: wifi scan")]
    NoAccessPoint(String),
    #[error("Network '{0}' requires a password.\nUse: wifi connect {0} <password>  OR  wifi setkey <password>")]
    KeyRequired(String),
    #[error("Failed to connect to '{0}': Wrong password (WPA2-PSK).")]
    WrongKey(String),
    #[error("Failed to connect to '{0}'. (Band unsupported or out of range)")]
    Unreachable(String),
    #[error("Not connected.")]
    NotConnected,
}

/// 扫描结果中的接入点状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApVisibility {
    Off,
    OutOfRange,
    InRange,
}

impl fmt::Display for ApVisibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ApVisibility::Off => "OFF",
            ApVisibility::OutOfRange => "OUT OF RANGE",
            ApVisibility::InRange => "IN RANGE",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScanEntry {
    pub ap: DeviceId,
    pub ssid: String,
    pub band: WifiBand,
    pub security: WifiSecurity,
    pub distance: f64,
    pub signal: f64,
    pub visibility: ApVisibility,
    pub supported: bool,
}

fn supports_band(adapter: &WifiAdapter, band: WifiBand) -> bool {
    match band {
        WifiBand::Band2_4GHz => adapter.supports_2_4,
        WifiBand::Band5GHz => adapter.supports_5,
    }
}

fn adapter(net: &Network, pc: DeviceId) -> Result<&WifiAdapter, WifiError> {
    net.pc(pc)
        .and_then(|p| p.wifi.as_ref())
        .ok_or(WifiError::NoAdapter)
}

fn wireless_port(net: &Network, pc: DeviceId) -> Option<PortId> {
    net.ports_of(pc)
        .iter()
        .copied()
        .find(|&p| net.port(p).medium == PortMedium::Wireless)
}

pub fn distance(net: &Network, a: DeviceId, b: DeviceId) -> f64 {
    net.device(a).position.distance(&net.device(b).position)
}

/// 接入点已上电且客户端在覆盖范围内
pub fn can_see(net: &Network, ap: DeviceId, pc: DeviceId) -> bool {
    net.is_powered(ap)
        && net
            .access_point(ap)
            .is_some_and(|a| distance(net, ap, pc) <= a.wireless.range_m)
}

fn access_points(net: &Network) -> Vec<DeviceId> {
    net.device_ids()
        .into_iter()
        .filter(|&d| net.access_point(d).is_some())
        .collect()
}

/// 按距离排序的扫描结果
pub fn scan(net: &Network, pc: DeviceId) -> Result<Vec<ScanEntry>, WifiError> {
    let wa = adapter(net, pc)?;
    let mut list: Vec<ScanEntry> = access_points(net)
        .into_iter()
        .filter_map(|ap| {
            let a = net.access_point(ap)?;
            let d = distance(net, ap, pc);
            let visibility = if !net.is_powered(ap) {
                ApVisibility::Off
            } else if can_see(net, ap, pc) {
                ApVisibility::InRange
            } else {
                ApVisibility::OutOfRange
            };
            Some(ScanEntry {
                ap,
                ssid: a.wireless.ssid.clone(),
                band: a.wireless.band,
                security: a.wireless.security,
                distance: d,
                signal: a.wireless.signal_percent(d),
                visibility,
                supported: supports_band(wa, a.wireless.band),
            })
        })
        .collect();
    list.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    Ok(list)
}

/// 最近的符合条件的接入点
fn nearest(net: &Network, pc: DeviceId, accept: impl Fn(DeviceId) -> bool) -> Option<DeviceId> {
    let wa = adapter(net, pc).ok()?;
    access_points(net)
        .into_iter()
        .filter(|&ap| {
            net.access_point(ap)
                .is_some_and(|a| supports_band(wa, a.wireless.band))
                && can_see(net, ap, pc)
                && accept(ap)
        })
        .min_by(|&a, &b| distance(net, a, pc).total_cmp(&distance(net, b, pc)))
}

/// 与指定接入点关联。未给出口令时使用已保存的口令。
pub fn associate(net: &mut Network, pc: DeviceId, ap: DeviceId, key: Option<&str>) -> bool {
    let Ok(wa) = adapter(net, pc) else {
        return false;
    };
    let Some(settings) = net.access_point(ap).map(|a| a.wireless.clone()) else {
        return false;
    };
    if !supports_band(wa, settings.band) || !can_see(net, ap, pc) {
        return false;
    }
    let provided = key.map(str::trim).unwrap_or_default();
    let key = if provided.is_empty() { wa.stored_key.trim().to_string() } else { provided.to_string() };
    if settings.requires_key() && !settings.validate_key(&key) {
        return false;
    }
    let Some(client_port) = wireless_port(net, pc) else {
        return false;
    };

    disconnect(net, pc);

    let Some(name) = net.access_point_mut(ap).map(|a| a.next_client_port_name()) else {
        return false;
    };
    let ap_port = net.add_port(ap, &name, PortMedium::Wireless);
    if let Some(a) = net.access_point_mut(ap) {
        a.clients.push((pc, ap_port));
    }
    net.associate(client_port, ap_port);
    if let Some(wa) = net.pc_mut(pc).and_then(|p| p.wifi.as_mut()) {
        wa.associated = Some(Association { ap, ap_port });
    }
    info!(pc = %net.device(pc).name, ap = %net.device(ap).name, port = %name, "📶 无线已关联");
    true
}

/// `wifi connect <ssid> [password]`，成功时返回接入点。
pub fn connect(net: &mut Network, pc: DeviceId, ssid: &str, password: &str) -> Result<DeviceId, WifiError> {
    let stored = adapter(net, pc)?.stored_key.trim().to_string();
    let best = nearest(net, pc, |ap| {
        net.access_point(ap)
            .is_some_and(|a| a.wireless.ssid.eq_ignore_ascii_case(ssid))
    })
    .ok_or_else(|| WifiError::NoAccessPoint(ssid.to_string()))?;

    let requires_key = net
        .access_point(best)
        .is_some_and(|a| a.wireless.requires_key());
    let mut key = password.trim().to_string();
    if requires_key && key.is_empty() {
        key = stored;
    }
    if requires_key && key.is_empty() {
        return Err(WifiError::KeyRequired(ssid.to_string()));
    }
    if associate(net, pc, best, Some(&key)) {
        return Ok(best);
    }
    if requires_key {
        Err(WifiError::WrongKey(ssid.to_string()))
    } else {
        Err(WifiError::Unreachable(ssid.to_string()))
    }
}

/// 断开关联并回收接入点上的 Wlan 口。返回原来的 SSID。
pub fn disconnect(net: &mut Network, pc: DeviceId) -> Option<String> {
    let assoc = net
        .pc_mut(pc)
        .and_then(|p| p.wifi.as_mut())
        .and_then(|wa| wa.associated.take())?;
    let ssid = net
        .access_point(assoc.ap)
        .map(|a| a.wireless.ssid.clone())
        .unwrap_or_default();
    let ap_if = net.port(assoc.ap_port).interface_name.clone();
    net.remove_port(assoc.ap_port);
    if let Some(a) = net.access_point_mut(assoc.ap) {
        a.forget_client(pc);
        a.switch.remove_port(&ap_if);
    }
    debug!(pc = ?pc, %ssid, "无线已断开");
    Some(ssid)
}

/// 周期性自动关联：离开覆盖范围则断开；未关联时连到最近的可用接入点。
pub fn auto_join(net: &mut Network) {
    for pc in net.device_ids() {
        let Ok(wa) = adapter(net, pc) else {
            continue;
        };
        if !wa.auto_join {
            continue;
        }
        if let Some(assoc) = wa.associated {
            if !can_see(net, assoc.ap, pc) {
                disconnect(net, pc);
            }
            continue;
        }
        if !net.is_powered(pc) {
            continue;
        }
        let desired = wa.desired_ssid.trim().to_string();
        let stored = wa.stored_key.clone();
        let best = nearest(net, pc, |ap| {
            net.access_point(ap).is_some_and(|a| {
                (desired.is_empty() || a.wireless.ssid.eq_ignore_ascii_case(&desired))
                    && (!a.wireless.requires_key() || a.wireless.validate_key(&stored))
            })
        });
        if let Some(ap) = best {
            associate(net, pc, ap, None);
        }
    }
}

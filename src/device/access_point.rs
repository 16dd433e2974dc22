//! 无线接入点
//!
//! 一台交换机加上无线参数。每个关联的客户端在内部交换机上占一个 `Wlan0/nn` 口。

use std::fmt;

use serde::{Deserialize, Serialize};

use super::switch::Switch;
use crate::net::{DeviceId, PortId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WifiBand {
    #[serde(rename = "2.4ghz", alias = "2.4")]
    Band2_4GHz,
    #[default]
    #[serde(rename = "5ghz", alias = "5")]
    Band5GHz,
}

impl fmt::Display for WifiBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WifiBand::Band2_4GHz => "2.4 GHz",
            WifiBand::Band5GHz => "5 GHz",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WifiSecurity {
    #[default]
    Open,
    #[serde(alias = "wpa2")]
    Wpa2Psk,
}

impl WifiSecurity {
    /// 扫描结果里的短写
    pub fn short(self) -> &'static str {
        match self {
            WifiSecurity::Open => "OPEN",
            WifiSecurity::Wpa2Psk => "WPA2",
        }
    }
}

impl fmt::Display for WifiSecurity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            WifiSecurity::Open => "OPEN",
            WifiSecurity::Wpa2Psk => "WPA2-PSK",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WirelessSettings {
    pub ssid: String,
    pub band: WifiBand,
    /// 覆盖半径（米）
    pub range_m: f64,
    pub security: WifiSecurity,
    pub passphrase: String,
}

impl Default for WirelessSettings {
    fn default() -> Self {
        Self {
            ssid: "AP".to_string(),
            band: WifiBand::Band5GHz,
            range_m: 12.0,
            security: WifiSecurity::Open,
            passphrase: "password123".to_string(),
        }
    }
}

impl WirelessSettings {
    pub fn requires_key(&self) -> bool {
        self.security == WifiSecurity::Wpa2Psk
    }

    /// 开放网络任何 key 都通过；WPA2 要求精确匹配且口令非空。
    pub fn validate_key(&self, key: &str) -> bool {
        if !self.requires_key() {
            return true;
        }
        let actual = self.passphrase.trim();
        !actual.is_empty() && key.trim() == actual
    }

    /// 信号强度百分比：距离越近越强，超出覆盖为 0。
    pub fn signal_percent(&self, distance: f64) -> f64 {
        let range = self.range_m.max(0.001);
        (1.0 - distance / range).clamp(0.0, 1.0) * 100.0
    }
}

#[derive(Debug, Clone)]
pub struct AccessPoint {
    pub switch: Switch,
    pub wireless: WirelessSettings,
    next_client: u32,
    /// (客户端设备, 本机上的 Wlan 口)
    pub clients: Vec<(DeviceId, PortId)>,
}

impl Default for AccessPoint {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessPoint {
    pub fn new() -> Self {
        Self {
            switch: Switch::new(),
            wireless: WirelessSettings::default(),
            next_client: 1,
            clients: Vec::new(),
        }
    }

    pub fn client_port(&self, client: DeviceId) -> Option<PortId> {
        self.clients
            .iter()
            .find(|(c, _)| *c == client)
            .map(|(_, p)| *p)
    }

    /// 下一个客户端口名 `Wlan0/01`、`Wlan0/02`……
    pub fn next_client_port_name(&mut self) -> String {
        let name = format!("Wlan0/{:02}", self.next_client);
        self.next_client += 1;
        name
    }

    pub fn forget_client(&mut self, client: DeviceId) -> Option<PortId> {
        let idx = self.clients.iter().position(|(c, _)| *c == client)?;
        Some(self.clients.remove(idx).1)
    }
}

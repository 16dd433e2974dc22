//! 主机上的监听服务
//!
//! telnet 等 TCP/UDP 服务，用于判断连接是否被拒绝。

use crate::forward::Protocol;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Service {
    pub name: String,
    pub protocol: Protocol,
    pub port: u16,
    pub banner: String,
    pub enabled: bool,
}

impl Service {
    pub fn telnet(banner: impl Into<String>) -> Self {
        Self {
            name: "telnet".to_string(),
            protocol: Protocol::Tcp,
            port: 23,
            banner: banner.into(),
            enabled: true,
        }
    }
}

/// 查找在 (protocol, port) 上开放的服务
pub fn find_open(services: &[Service], protocol: Protocol, port: u16) -> Option<&Service> {
    services
        .iter()
        .find(|s| s.enabled && s.protocol == protocol && s.port == port)
}

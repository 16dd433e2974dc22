//! 丢弃原因
//!
//! 转发失败不是错误，而是带原因的结果；`Display` 即 PC 端显示的原因文本。

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DropReason {
    #[error("no active NIC link")]
    NoLink,
    #[error("no IP address configured")]
    NoAddress,
    #[error("host unreachable")]
    HostUnreachable,
    #[error("connection refused")]
    ConnectionRefused,
    #[error("no default gateway")]
    NoDefaultGateway,
    #[error("default gateway unreachable")]
    GatewayOffSubnet,
    #[error("no gateway router")]
    NoGatewayRouter,
    #[error("gateway unreachable")]
    GatewayUnreachable,
    #[error("no route")]
    NoRoute,
    #[error("{0}")]
    AclBlocked(String),
    #[error("TTL expired in transit")]
    TtlExpired,
    #[error("routing loop")]
    RoutingLoop,
}

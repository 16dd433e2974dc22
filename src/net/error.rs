//! 拓扑错误
//!
//! 连线、断线与设备查找的失败原因。

use thiserror::Error;

use super::port::PortMedium;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TopologyError {
    #[error("Cannot connect port to itself")]
    SelfLoop,
    #[error("Same device (owner == other.owner)")]
    SameDevice,
    #[error("This port is already connected")]
    ThisPortConnected,
    #[error("Other port is already connected")]
    OtherPortConnected,
    #[error("Incompatible cable/port types: {a} ↔ {b}")]
    IncompatibleMedia { a: PortMedium, b: PortMedium },
    #[error("That cable type does not work for {0} ports.")]
    CableNotAllowed(PortMedium),
    #[error("Port is not connected")]
    NotConnected,
    #[error("Unknown device '{0}'")]
    UnknownDevice(String),
    #[error("Unknown interface '{interface}' on {device}")]
    UnknownInterface { device: String, interface: String },
}

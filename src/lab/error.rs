//! 实验加载与执行错误

use thiserror::Error;

use crate::device::router::ModuleError;
use crate::net::TopologyError;

#[derive(Debug, Error)]
pub enum LabError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("topology: {0}")]
    Topology(#[from] TopologyError),
    #[error("module: {0}")]
    Module(#[from] ModuleError),
    #[error("duplicate device name '{0}'")]
    DuplicateDevice(String),
    #[error("unknown device '{0}'")]
    UnknownDevice(String),
    #[error("{0} has no command line")]
    NoCli(String),
    #[error("{device} is not a {expected}")]
    WrongKind { device: String, expected: &'static str },
}

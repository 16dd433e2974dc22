//! CLI 错误
//!
//! `Display` 即 IOS 风格的提示文本，会话在边界处把错误直接转成输出。

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CliError {
    #[error("% Invalid input detected at '^' marker.")]
    InvalidSyntax,
    #[error("% Incomplete command.")]
    IncompleteCommand,
    #[error("% Device not ready.")]
    DeviceNotReady,
    #[error("% {0} not found.")]
    NotFound(&'static str),
    #[error("% Bad passwords")]
    AuthFailure,
    #[error("% System is powered off. Flip the power switch to use the console.")]
    PowerOff,
    /// `% Invalid VLAN id.` 之类
    #[error("% Invalid {0}.")]
    Invalid(&'static str),
    #[error("% {0}")]
    Unsupported(&'static str),
}

pub type CliResult = Result<String, CliError>;

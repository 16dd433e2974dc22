//! 实验模块
//!
//! 从 JSON 描述建立拓扑，并在虚拟时钟上执行一串 CLI / 电源 / 连线步骤。

// 子模块声明
mod error;
mod runner;
mod spec;

// 重新导出公共接口
pub use error::LabError;
pub use runner::{DeviceReport, Lab, LabReport, TranscriptEntry};
pub use spec::{AccessPointSpec, DeviceKindSpec, DeviceSpec, LabSpec, LinkSpec, ModuleSpec, StepSpec};

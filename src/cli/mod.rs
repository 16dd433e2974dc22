//! CLI 引擎
//!
//! 每个终端会话是一台设备上的模式状态机：输入先展开缩写、切词，再按当前模式的
//! 命令表分派。处理函数返回 `Result<String, CliError>`，错误在会话边界转成 IOS 文本。

// 子模块声明
mod error;
mod l2;
mod mode;
pub mod pc;
pub mod router;
pub mod switch;
mod tokens;

// 重新导出公共接口
pub use error::{CliError, CliResult};
pub use l2::SwitchportCommand;
pub use mode::{CONFIG_BANNER, Mode};
pub use pc::PcSession;
pub use router::RouterSession;
pub use switch::{SwitchSession, parse_interface_range};
pub use tokens::{Args, Command, Line, dispatch, expand_aliases, parse_ip, parse_vlan};

use crate::device::MacEntry;
use crate::net::{DeviceId, DeviceKind, Network, ifname};

/// 终端会话：一次执行一行命令，返回要显示的文本。
pub trait TerminalSession {
    fn execute(&mut self, net: &mut Network, input: &str) -> String;
    fn prompt(&self, net: &Network) -> String;
}

/// 按设备类型打开会话（接入点没有 CLI）。
pub fn open_session(net: &Network, dev: DeviceId) -> Option<Box<dyn TerminalSession>> {
    match &net.device(dev).kind {
        DeviceKind::Router(_) => Some(Box::new(RouterSession::new(dev))),
        DeviceKind::Switch(_) => Some(Box::new(SwitchSession::new(dev))),
        DeviceKind::Pc(_) => Some(Box::new(PcSession::new(dev))),
        _ => None,
    }
}

/// 把结果转成输出文本
pub(crate) fn render(result: CliResult) -> String {
    result.unwrap_or_else(|e| e.to_string())
}

/// `show mac address-table` 的表格（路由器内嵌交换口与交换机共用）
pub(crate) fn mac_address_table(entries: &[MacEntry]) -> String {
    let mut out = String::from("Vlan    Mac Address       Type        Ports\n");
    out.push_str("----    -----------       --------    -----\n");
    for e in entries {
        out.push_str(&format!(
            "{:<8}{:<18}DYNAMIC     {}\n",
            e.vlan,
            e.mac,
            ifname::short(&e.interface)
        ));
    }
    out.trim_end_matches('\n').to_string()
}

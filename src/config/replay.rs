//! 配置回放

use tracing::{info, warn};

use crate::cli::{TerminalSession, open_session};
use crate::net::{DeviceId, Network};

/// 被设备拒绝的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejected {
    /// 从 1 开始
    pub line_no: usize,
    pub command: String,
    pub output: String,
}

fn is_comment(line: &str) -> bool {
    line.starts_with('!') || line.starts_with('#') || line.starts_with("//")
}

/// 把脚本逐行送入会话，返回输出以 `%` 开头的行。
pub fn replay(session: &mut dyn TerminalSession, net: &mut Network, text: &str) -> Vec<Rejected> {
    let mut rejected = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || is_comment(line) {
            continue;
        }
        let output = session.execute(net, line);
        if output.starts_with('%') {
            warn!(line_no = idx + 1, command = line, output = %output, "⚠️  配置行被拒绝");
            rejected.push(Rejected {
                line_no: idx + 1,
                command: line.to_string(),
                output,
            });
        }
    }
    rejected
}

/// 为设备开一个新会话回放脚本，结束后刷新链路状态。
/// 没有 CLI 的设备返回 `None`。
#[tracing::instrument(skip(net, text))]
pub fn replay_into(net: &mut Network, dev: DeviceId, text: &str) -> Option<Vec<Rejected>> {
    let mut session = open_session(net, dev)?;
    let rejected = replay(session.as_mut(), net, text);
    net.refresh_links();
    info!(
        device = %net.device(dev).name,
        rejected = rejected.len(),
        "📜 配置回放完成"
    );
    Some(rejected)
}

//! 生成树 / EtherChannel 引擎
//!
//! 此模块包含 channel 组建判断、成员状态诊断以及确定性的生成树计算。

// 子模块声明
mod etherchannel;
mod spanning_tree;
mod union_find;

// 重新导出公共接口
pub use etherchannel::{
    MemberFlag, MemberState, PartnerInfo, channel_formed, member_state, partner_info,
    protocol_name, refresh_etherchannels, suspend_reason,
};
pub use spanning_tree::{BridgeId, compare_bridge_id, recompute};
pub use union_find::UnionFind;

use crate::device::switch::DEFAULT_STP_PRIORITY;
use crate::net::{DeviceId, Network, derive_mac};

/// 桥 MAC 由设备名推导
pub fn bridge_mac(net: &Network, dev: DeviceId) -> String {
    derive_mac(&net.device(dev).name)
}

pub fn bridge_id(net: &Network, dev: DeviceId) -> BridgeId {
    let priority = net
        .switch(dev)
        .map(|s| s.stp_priority)
        .unwrap_or(DEFAULT_STP_PRIORITY);
    (priority, bridge_mac(net, dev))
}

//! 生成树计算
//!
//! 不交换 BPDU，直接从拓扑推出结果：最小桥 ID 为根；按发现顺序对逻辑链路做并查集，
//! 树边两端转发，成环边由桥 ID 较大的一端阻塞；非根交换机把通往桥 ID 最小邻居的
//! 转发口标为 Root 口。

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use super::etherchannel::refresh_etherchannels;
use super::union_find::UnionFind;
use crate::device::switch::{StpRole, StpState, Switch};
use crate::net::{DeviceId, LinkStates, Network, ifname};
use tracing::{debug, info};

/// 桥 ID：(优先级, MAC)
pub type BridgeId = (u32, String);

pub fn compare_bridge_id(a: &BridgeId, b: &BridgeId) -> Ordering {
    a.0.cmp(&b.0)
        .then_with(|| a.1.to_ascii_lowercase().cmp(&b.1.to_ascii_lowercase()))
}

/// 两台交换机之间的一条逻辑链路
#[derive(Debug, Clone)]
struct Edge {
    a: usize,
    a_if: String,
    b: usize,
    b_if: String,
}

impl Edge {
    fn key(&self) -> (String, String) {
        let left = format!("{}:{}", self.a, self.a_if.to_ascii_lowercase());
        let right = format!("{}:{}", self.b, self.b_if.to_ascii_lowercase());
        if left <= right { (left, right) } else { (right, left) }
    }
}

struct Bridge {
    dev: DeviceId,
    id: BridgeId,
    links: LinkStates,
}

/// 对端口所在的远端交换机上，对应的逻辑接口（任意成组成员都映射到 Port-channel）。
fn remote_logical(sw: &Switch, phys: &str) -> String {
    if let Some(gid) = sw.formed_channel_of(phys) {
        return ifname::port_channel_name(gid);
    }
    sw.logical_interface(phys)
        .unwrap_or_else(|| ifname::normalize(phys))
}

fn discover_edges(net: &Network, bridges: &[Bridge], index: &HashMap<DeviceId, usize>) -> Vec<Edge> {
    let mut edges = Vec::new();
    let mut seen = HashSet::new();
    for (i, br) in bridges.iter().enumerate() {
        let Some(sw) = net.switch(br.dev) else {
            continue;
        };
        for cfg in &sw.ports {
            if !cfg.admin_up || !br.links.is_up(&cfg.name) {
                continue;
            }
            let Some(peer) = net.find_port(br.dev, &cfg.name).and_then(|p| net.peer(p)) else {
                continue;
            };
            let remote = net.port(peer);
            let (Some(&j), Some(other)) = (index.get(&remote.owner), net.switch(remote.owner)) else {
                continue;
            };
            let Some(remote_cfg) = other.port(&remote.interface_name) else {
                continue;
            };
            let Some(a_if) = sw.logical_interface(&cfg.name) else {
                continue;
            };
            let edge = Edge {
                a: i,
                a_if,
                b: j,
                b_if: remote_logical(other, &remote_cfg.name),
            };
            if seen.insert(edge.key()) {
                edges.push(edge);
            }
        }
    }
    edges
}

/// 给逻辑接口设置状态；down 的接口一律 Disabled。
fn set_port(sw: &mut Switch, links: &LinkStates, name: &str, state: StpState, role: StpRole) {
    if let Some(id) = ifname::port_channel_id(name) {
        let pc = sw.ensure_port_channel(id);
        if pc.formed && pc.protocol_up {
            pc.stp_state = state;
            pc.stp_role = role;
        } else {
            pc.stp_state = StpState::Disabled;
            pc.stp_role = StpRole::Disabled;
        }
        return;
    }
    let Some(cfg) = sw.port_mut(name) else {
        return;
    };
    if cfg.admin_up && links.is_up(&cfg.name) {
        cfg.set_stp(state, role);
    } else {
        cfg.set_stp(StpState::Disabled, StpRole::Disabled);
    }
}

fn set_role_only(sw: &mut Switch, name: &str, role: StpRole) {
    if let Some(id) = ifname::port_channel_id(name) {
        let pc = sw.ensure_port_channel(id);
        pc.stp_role = if pc.stp_state == StpState::Disabled { StpRole::Disabled } else { role };
        return;
    }
    if let Some(cfg) = sw.port_mut(name) {
        cfg.stp_role = if cfg.stp_state == StpState::Disabled { StpRole::Disabled } else { role };
    }
}

/// 所有逻辑接口先复位：up 的为 Designated/Forwarding，其余 Disabled。
fn reset_ports(sw: &mut Switch, links: &LinkStates) {
    for p in &mut sw.ports {
        if p.admin_up && links.is_up(&p.name) {
            p.set_stp(StpState::Forwarding, StpRole::Designated);
        } else {
            p.set_stp(StpState::Disabled, StpRole::Disabled);
        }
    }
    for pc in sw.port_channels.iter_mut().filter(|pc| pc.formed) {
        if pc.protocol_up {
            pc.stp_state = StpState::Forwarding;
            pc.stp_role = StpRole::Designated;
        } else {
            pc.stp_state = StpState::Disabled;
            pc.stp_role = StpRole::Disabled;
        }
    }
}

/// 非根交换机的 Root 口：通往桥 ID 最小邻居的转发口。
fn pick_root_port(net: &Network, br: &Bridge) -> Option<String> {
    let sw = net.switch(br.dev)?;
    let mut best: Option<(String, BridgeId)> = None;
    for cfg in &sw.ports {
        let Some(logical) = sw.logical_interface(&cfg.name) else {
            continue;
        };
        // 成组 channel 由代表成员探测对端
        let eligible = match ifname::port_channel_id(&logical) {
            Some(id) => sw.port_channel(id).is_some_and(|pc| {
                pc.formed && pc.protocol_up && pc.stp_state == StpState::Forwarding
            }),
            None => cfg.stp_state == StpState::Forwarding && br.links.is_up(&cfg.name),
        };
        if !eligible {
            continue;
        }
        let Some(peer) = net.find_port(br.dev, &cfg.name).and_then(|p| net.peer(p)) else {
            continue;
        };
        let owner = net.port(peer).owner;
        if net.switch(owner).is_none() {
            continue;
        }
        let nb = super::bridge_id(net, owner);
        let better = match &best {
            None => true,
            Some((_, cur)) => compare_bridge_id(&nb, cur) == Ordering::Less,
        };
        if better {
            best = Some((logical, nb));
        }
    }
    best.map(|(logical, _)| logical)
}

/// 完整的一轮 STP 计算。
#[tracing::instrument(skip(net))]
pub fn recompute(net: &mut Network) {
    refresh_etherchannels(net);

    let bridges: Vec<Bridge> = net
        .device_ids()
        .into_iter()
        .filter(|&d| net.switch(d).is_some())
        .map(|dev| Bridge {
            dev,
            id: super::bridge_id(net, dev),
            links: net.link_states(dev),
        })
        .collect();
    if bridges.is_empty() {
        return;
    }
    let index: HashMap<DeviceId, usize> = bridges.iter().enumerate().map(|(i, b)| (b.dev, i)).collect();

    // 断电的交换机不参与选根
    let root = bridges
        .iter()
        .enumerate()
        .filter(|(_, b)| net.is_powered(b.dev))
        .min_by(|(_, a), (_, b)| compare_bridge_id(&a.id, &b.id))
        .map(|(i, _)| i);

    let edges = discover_edges(net, &bridges, &index);

    for br in &bridges {
        if let Some(sw) = net.switch_mut(br.dev) {
            reset_ports(sw, &br.links);
        }
    }

    let mut uf = UnionFind::new(bridges.len());
    let in_tree: Vec<bool> = edges.iter().map(|e| uf.union(e.a, e.b)).collect();

    for (e, tree) in edges.iter().zip(in_tree) {
        let (a, b) = (&bridges[e.a], &bridges[e.b]);
        if tree {
            if let Some(sw) = net.switch_mut(a.dev) {
                set_port(sw, &a.links, &e.a_if, StpState::Forwarding, StpRole::Designated);
            }
            if let Some(sw) = net.switch_mut(b.dev) {
                set_port(sw, &b.links, &e.b_if, StpState::Forwarding, StpRole::Designated);
            }
            continue;
        }
        let ((fwd, fwd_if), (blk, blk_if)) = if compare_bridge_id(&a.id, &b.id) != Ordering::Greater {
            ((a, &e.a_if), (b, &e.b_if))
        } else {
            ((b, &e.b_if), (a, &e.a_if))
        };
        debug!(blocked = ?blk.dev, interface = %blk_if, "⛔ 成环链路，阻塞桥 ID 较大的一端");
        if let Some(sw) = net.switch_mut(fwd.dev) {
            set_port(sw, &fwd.links, fwd_if, StpState::Forwarding, StpRole::Designated);
        }
        if let Some(sw) = net.switch_mut(blk.dev) {
            set_port(sw, &blk.links, blk_if, StpState::Blocking, StpRole::Alternate);
        }
    }

    let root_id = root.map(|i| bridges[i].id.clone());
    for (i, br) in bridges.iter().enumerate() {
        if let Some(sw) = net.switch_mut(br.dev) {
            sw.is_root = root == Some(i);
            sw.root_bridge = root_id.clone();
        }
    }

    let root_ports: Vec<(DeviceId, String)> = bridges
        .iter()
        .enumerate()
        .filter(|(i, _)| root != Some(*i))
        .filter_map(|(_, br)| pick_root_port(net, br).map(|p| (br.dev, p)))
        .collect();
    for (dev, logical) in root_ports {
        if let Some(sw) = net.switch_mut(dev) {
            set_role_only(sw, &logical, StpRole::Root);
        }
    }

    for br in &bridges {
        if let Some(sw) = net.switch_mut(br.dev) {
            sw.apply_channel_stp_to_members();
        }
    }

    if let Some(i) = root {
        info!(root = %net.device(bridges[i].dev).name, edges = edges.len(), "🌳 生成树已收敛");
    }
}

//! 周期维护事件
//!
//! 三个自我续期的事件：链路刷新（顺带无线自动关联）、MAC 表老化、生成树重算。
//! 用 [`schedule_maintenance`] 在某个时刻一次性挂上全部三个。

use super::event::Event;
use super::net_world::net_of;
use super::simulator::Simulator;
use super::time::SimTime;
use super::world::World;
use crate::forward::wireless;
use crate::net::{DeviceKind, Network};
use tracing::{trace, warn};

pub const REFRESH_LINKS_PERIOD: SimTime = SimTime(250_000_000);
pub const PURGE_MACS_PERIOD: SimTime = SimTime(1_000_000_000);
pub const RECOMPUTE_STP_PERIOD: SimTime = SimTime(1_000_000_000);

/// 接口协议状态、EtherChannel 组建与无线自动关联
#[derive(Debug, Clone, Copy)]
pub struct RefreshLinks;

#[derive(Debug, Clone, Copy)]
pub struct PurgeMacTables;

#[derive(Debug, Clone, Copy)]
pub struct RecomputeSpanningTree;

fn with_net(sim: &Simulator, world: &mut dyn World, f: impl FnOnce(&mut Network)) -> bool {
    let Some(net) = net_of(world) else {
        warn!("维护事件需要 NetWorld，停止续期");
        return false;
    };
    net.set_now(sim.now());
    f(net);
    true
}

impl Event for RefreshLinks {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        let alive = with_net(sim, world, |net| {
            wireless::auto_join(net);
            net.refresh_links();
        });
        if alive {
            sim.schedule(sim.now() + REFRESH_LINKS_PERIOD, *self);
        }
    }
}

/// 老化路由器内嵌交换口、交换机与接入点的 MAC 表
pub fn purge_mac_tables(net: &mut Network) {
    let now = net.now();
    for id in net.device_ids() {
        match &mut net.device_mut(id).kind {
            DeviceKind::Router(r) => r.purge_macs(now),
            DeviceKind::Switch(s) => s.purge_macs(now),
            DeviceKind::AccessPoint(ap) => ap.switch.purge_macs(now),
            _ => {}
        }
    }
    trace!(now = %now, "MAC 表老化完成");
}

impl Event for PurgeMacTables {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        if with_net(sim, world, purge_mac_tables) {
            sim.schedule(sim.now() + PURGE_MACS_PERIOD, *self);
        }
    }
}

impl Event for RecomputeSpanningTree {
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World) {
        if with_net(sim, world, crate::stp::recompute) {
            sim.schedule(sim.now() + RECOMPUTE_STP_PERIOD, *self);
        }
    }
}

/// 从 `start` 起挂上三个周期事件
pub fn schedule_maintenance(sim: &mut Simulator, start: SimTime) {
    sim.schedule(start, RefreshLinks);
    sim.schedule(start, PurgeMacTables);
    sim.schedule(start, RecomputeSpanningTree);
}

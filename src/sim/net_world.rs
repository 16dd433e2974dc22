//! 网络世界
//!
//! 持有 `Network` 的仿真世界；每执行完一个事件就把网络时钟拨到仿真器当前时刻。

use super::simulator::Simulator;
use super::world::World;
use crate::net::Network;
use std::any::Any;

#[derive(Debug, Default)]
pub struct NetWorld {
    pub net: Network,
}

impl NetWorld {
    pub fn new(net: Network) -> Self {
        Self { net }
    }
}

impl World for NetWorld {
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn on_tick(&mut self, sim: &mut Simulator) {
        self.net.set_now(sim.now());
    }
}

/// 事件里取回 `NetWorld`；别的世界类型返回 `None`。
pub(crate) fn net_of(world: &mut dyn World) -> Option<&mut Network> {
    world
        .as_any_mut()
        .downcast_mut::<NetWorld>()
        .map(|w| &mut w.net)
}

//! 仿真世界
//!
//! 事件执行时拿到的可变状态。实验里只有 [`NetWorld`](super::NetWorld) 一种，
//! 维护事件通过 `as_any_mut` 向下转型取回网络。

use super::simulator::Simulator;
use std::any::Any;

pub trait World: Any {
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// 每执行完一个事件调用一次，`run_until` 结束时再调一次。
    fn on_tick(&mut self, _sim: &mut Simulator) {}
}

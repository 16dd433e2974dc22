//! 定时事件
//!
//! 周期维护（链路刷新、MAC 老化、生成树重算）都实现这个 trait，
//! 执行时按需把自己重新挂回队列。

use super::simulator::Simulator;
use super::world::World;

pub trait Event: Send + 'static {
    /// 按值消费事件；续期的事件把 `*self` 再交给 [`Simulator::schedule`]。
    fn execute(self: Box<Self>, sim: &mut Simulator, world: &mut dyn World);
}

//! 仿真核心模块
//!
//! 离散事件仿真器与虚拟时钟。设备的周期维护（链路刷新、MAC 老化、生成树重算）
//! 作为自我续期的事件跑在这个时钟上。

// 子模块声明
mod event;
mod maintenance;
mod net_world;
mod simulator;
mod time;
mod world;

// 重新导出公共接口
pub use event::Event;
pub use maintenance::{
    PURGE_MACS_PERIOD, PurgeMacTables, RECOMPUTE_STP_PERIOD, REFRESH_LINKS_PERIOD,
    RecomputeSpanningTree, RefreshLinks, purge_mac_tables, schedule_maintenance,
};
pub use net_world::NetWorld;
pub use simulator::Simulator;
pub use time::SimTime;
pub use world::World;

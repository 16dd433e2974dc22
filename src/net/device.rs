//! 设备
//!
//! 拓扑中的设备：公共的名称/电源/端口信息，加上按类型区分的控制面状态。

use serde::{Deserialize, Serialize};

use super::id::{DeviceId, PortId};
use crate::device::{AccessPoint, Pc, Router, Switch};

/// 设备在场景中的位置（米），用于无线覆盖计算。
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn distance(&self, other: &Position) -> f64 {
        let (dx, dy, dz) = (self.x - other.x, self.y - other.y, self.z - other.z);
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// 按设备类型区分的控制面状态
#[derive(Debug)]
pub enum DeviceKind {
    Router(Box<Router>),
    Switch(Box<Switch>),
    Pc(Box<Pc>),
    AccessPoint(Box<AccessPoint>),
    /// 配电单元：自身需要外部供电，开机后向外供电
    PowerDistribution,
    /// 墙上插座：始终供电
    PowerOutlet,
}

impl DeviceKind {
    pub fn label(&self) -> &'static str {
        match self {
            DeviceKind::Router(_) => "router",
            DeviceKind::Switch(_) => "switch",
            DeviceKind::Pc(_) => "pc",
            DeviceKind::AccessPoint(_) => "access_point",
            DeviceKind::PowerDistribution => "pdu",
            DeviceKind::PowerOutlet => "outlet",
        }
    }
}

/// 设备
#[derive(Debug)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    /// 前面板电源开关
    pub switch_on: bool,
    pub requires_external_power: bool,
    pub receiving_external_power: bool,
    pub ports: Vec<PortId>,
    pub position: Position,
    /// `write memory` 保存的配置文本
    pub startup_config: Option<String>,
    pub kind: DeviceKind,
}

impl Device {
    pub fn new(id: DeviceId, name: impl Into<String>, kind: DeviceKind) -> Self {
        Self {
            id,
            name: name.into(),
            switch_on: true,
            requires_external_power: matches!(kind, DeviceKind::PowerDistribution),
            receiving_external_power: false,
            ports: Vec::new(),
            position: Position::default(),
            startup_config: None,
            kind,
        }
    }

    /// 实际是否上电：开关打开且（不需要外部供电或正在接收外部供电）。
    pub fn is_powered(&self) -> bool {
        self.switch_on && (!self.requires_external_power || self.receiving_external_power)
    }

    /// 是否向 Power 口另一端供电
    pub fn provides_power(&self) -> bool {
        match self.kind {
            DeviceKind::PowerOutlet => true,
            DeviceKind::PowerDistribution => self.is_powered(),
            _ => false,
        }
    }

    pub fn is_switch_like(&self) -> bool {
        matches!(self.kind, DeviceKind::Switch(_) | DeviceKind::AccessPoint(_))
    }

    pub fn router(&self) -> Option<&Router> {
        match &self.kind {
            DeviceKind::Router(r) => Some(r),
            _ => None,
        }
    }

    pub fn router_mut(&mut self) -> Option<&mut Router> {
        match &mut self.kind {
            DeviceKind::Router(r) => Some(r),
            _ => None,
        }
    }

    /// 交换机状态；接入点内部也是一台交换机。
    pub fn switch(&self) -> Option<&Switch> {
        match &self.kind {
            DeviceKind::Switch(s) => Some(s),
            DeviceKind::AccessPoint(ap) => Some(&ap.switch),
            _ => None,
        }
    }

    pub fn switch_mut(&mut self) -> Option<&mut Switch> {
        match &mut self.kind {
            DeviceKind::Switch(s) => Some(s),
            DeviceKind::AccessPoint(ap) => Some(&mut ap.switch),
            _ => None,
        }
    }

    pub fn pc(&self) -> Option<&Pc> {
        match &self.kind {
            DeviceKind::Pc(p) => Some(p),
            _ => None,
        }
    }

    pub fn pc_mut(&mut self) -> Option<&mut Pc> {
        match &mut self.kind {
            DeviceKind::Pc(p) => Some(p),
            _ => None,
        }
    }

    pub fn access_point(&self) -> Option<&AccessPoint> {
        match &self.kind {
            DeviceKind::AccessPoint(ap) => Some(ap),
            _ => None,
        }
    }

    pub fn access_point_mut(&mut self) -> Option<&mut AccessPoint> {
        match &mut self.kind {
            DeviceKind::AccessPoint(ap) => Some(ap),
            _ => None,
        }
    }
}

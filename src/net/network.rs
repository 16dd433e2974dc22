//! 网络拓扑管理
//!
//! 设备与端口的 arena、点对点链路、电源传播以及链路状态刷新。

use std::collections::HashMap;

use super::device::{Device, DeviceKind};
use super::error::TopologyError;
use super::hash::derive_mac;
use super::id::{DeviceId, PortId};
use super::ifname;
use super::port::{CableType, Link, Port, PortMedium};
use crate::device::{AccessPoint, Pc, Router, Switch};
use crate::sim::SimTime;
use tracing::{debug, info, trace, warn};

/// 某台设备各接口的链路可用情况，按规范化接口名索引。
#[derive(Debug, Default, Clone)]
pub struct LinkStates(HashMap<String, bool>);

impl LinkStates {
    fn key(name: &str) -> String {
        let norm = ifname::normalize(name);
        let phys = match ifname::split_subinterface(&norm) {
            Some((parent, _)) => parent.to_string(),
            None => norm,
        };
        phys.to_ascii_lowercase()
    }

    /// 子接口沿用父接口的链路状态。
    pub fn is_up(&self, name: &str) -> bool {
        self.0.get(&Self::key(name)).copied().unwrap_or(false)
    }
}

/// 网络拓扑：所有设备和端口的唯一所有者。
#[derive(Debug, Default)]
pub struct Network {
    devices: Vec<Device>,
    ports: Vec<Port>,
    now: SimTime,
}

impl Network {
    pub fn new() -> Self {
        Self::default()
    }

    /// 虚拟时钟
    pub fn now(&self) -> SimTime {
        self.now
    }

    pub fn set_now(&mut self, now: SimTime) {
        self.now = now;
    }

    pub fn devices(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    pub fn device_ids(&self) -> Vec<DeviceId> {
        (0..self.devices.len()).map(DeviceId).collect()
    }

    pub fn device(&self, id: DeviceId) -> &Device {
        &self.devices[id.0]
    }

    pub fn device_mut(&mut self, id: DeviceId) -> &mut Device {
        &mut self.devices[id.0]
    }

    pub fn port(&self, id: PortId) -> &Port {
        &self.ports[id.0]
    }

    /// 设备名查找（大小写不敏感）
    pub fn device_by_name(&self, name: &str) -> Option<DeviceId> {
        self.devices
            .iter()
            .find(|d| d.name.eq_ignore_ascii_case(name.trim()))
            .map(|d| d.id)
    }

    pub fn is_powered(&self, id: DeviceId) -> bool {
        self.devices[id.0].is_powered()
    }

    pub fn router(&self, id: DeviceId) -> Option<&Router> {
        self.devices.get(id.0).and_then(Device::router)
    }

    pub fn router_mut(&mut self, id: DeviceId) -> Option<&mut Router> {
        self.devices.get_mut(id.0).and_then(Device::router_mut)
    }

    /// 交换机（接入点内部的交换机也算）
    pub fn switch(&self, id: DeviceId) -> Option<&Switch> {
        self.devices.get(id.0).and_then(Device::switch)
    }

    pub fn switch_mut(&mut self, id: DeviceId) -> Option<&mut Switch> {
        self.devices.get_mut(id.0).and_then(Device::switch_mut)
    }

    pub fn pc(&self, id: DeviceId) -> Option<&Pc> {
        self.devices.get(id.0).and_then(Device::pc)
    }

    pub fn pc_mut(&mut self, id: DeviceId) -> Option<&mut Pc> {
        self.devices.get_mut(id.0).and_then(Device::pc_mut)
    }

    pub fn access_point(&self, id: DeviceId) -> Option<&AccessPoint> {
        self.devices.get(id.0).and_then(Device::access_point)
    }

    pub fn access_point_mut(&mut self, id: DeviceId) -> Option<&mut AccessPoint> {
        self.devices.get_mut(id.0).and_then(Device::access_point_mut)
    }

    fn push_device(&mut self, name: impl Into<String>, kind: DeviceKind) -> DeviceId {
        let id = DeviceId(self.devices.len());
        let device = Device::new(id, name, kind);
        debug!(device = ?id, name = %device.name, kind = device.kind.label(), "➕ 添加设备");
        self.devices.push(device);
        id
    }

    /// 添加路由器：Gi0/0、Gi0/1 两个以太口和一个 Console 口。
    pub fn add_router(&mut self, name: impl Into<String>) -> DeviceId {
        let id = self.push_device(name, DeviceKind::Router(Box::new(Router::new())));
        self.add_port(id, "Gi0/0", PortMedium::Ethernet);
        self.add_port(id, "Gi0/1", PortMedium::Ethernet);
        self.add_port(id, "Console", PortMedium::Console);
        id
    }

    /// 添加交换机：Gi0/1..Gi0/4 和一个 Console 口。
    pub fn add_switch(&mut self, name: impl Into<String>) -> DeviceId {
        let id = self.push_device(name, DeviceKind::Switch(Box::new(Switch::new())));
        for n in 1..=4 {
            self.add_port(id, &format!("Gi0/{n}"), PortMedium::Ethernet);
        }
        self.add_port(id, "Console", PortMedium::Console);
        id
    }

    /// 添加 PC：FastEthernet0 与 RS232 口。MAC 由设备名推导。
    pub fn add_pc(&mut self, name: impl Into<String>) -> DeviceId {
        let name = name.into();
        let mac = derive_mac(&name).to_ascii_uppercase();
        let id = self.push_device(name, DeviceKind::Pc(Box::new(Pc::new(mac))));
        self.add_port(id, "FastEthernet0", PortMedium::Ethernet);
        self.add_port(id, "RS232", PortMedium::Rs232);
        id
    }

    /// 给 PC 装上无线网卡（添加 Wireless0 口）。
    pub fn add_wireless_adapter(&mut self, pc: DeviceId) -> Option<PortId> {
        let has_adapter = self.pc(pc)?.wifi.is_some();
        if has_adapter {
            return self.find_port(pc, "Wireless0");
        }
        if let Some(p) = self.pc_mut(pc) {
            p.wifi = Some(Default::default());
        }
        Some(self.add_port(pc, "Wireless0", PortMedium::Wireless))
    }

    /// 添加无线接入点：内部是一台带 Gi0/1..Gi0/4 的交换机。
    pub fn add_access_point(&mut self, name: impl Into<String>) -> DeviceId {
        let id = self.push_device(name, DeviceKind::AccessPoint(Box::new(AccessPoint::new())));
        for n in 1..=4 {
            self.add_port(id, &format!("Gi0/{n}"), PortMedium::Ethernet);
        }
        id
    }

    /// 添加配电单元（PDU）：一个进线口和四个出线口。
    pub fn add_power_distribution(&mut self, name: impl Into<String>) -> DeviceId {
        let id = self.push_device(name, DeviceKind::PowerDistribution);
        self.add_port(id, "PowerIn", PortMedium::Power);
        for n in 1..=4 {
            self.add_port(id, &format!("Outlet{n}"), PortMedium::Power);
        }
        id
    }

    /// 添加墙上插座：两个插孔，始终供电。
    pub fn add_power_outlet(&mut self, name: impl Into<String>) -> DeviceId {
        let id = self.push_device(name, DeviceKind::PowerOutlet);
        self.add_port(id, "Socket1", PortMedium::Power);
        self.add_port(id, "Socket2", PortMedium::Power);
        id
    }

    /// 添加端口，并在设备控制面登记对应的接口/交换口。
    pub fn add_port(&mut self, dev: DeviceId, port_name: &str, medium: PortMedium) -> PortId {
        let interface_name = match medium {
            PortMedium::Ethernet | PortMedium::Serial => ifname::normalize(port_name),
            _ => port_name.to_string(),
        };
        let id = PortId(self.ports.len());
        self.ports.push(Port {
            id,
            owner: dev,
            port_name: port_name.to_string(),
            interface_name: interface_name.clone(),
            medium,
            link: None,
        });
        let device = &mut self.devices[dev.0];
        device.ports.push(id);
        match (&mut device.kind, medium) {
            (DeviceKind::Router(r), PortMedium::Ethernet | PortMedium::Serial) => {
                r.add_physical_interface(&interface_name);
            }
            (DeviceKind::Switch(s), PortMedium::Ethernet) => s.add_port(&interface_name),
            (DeviceKind::AccessPoint(ap), PortMedium::Ethernet | PortMedium::Wireless) => {
                ap.switch.add_port(&interface_name)
            }
            _ => {}
        }
        trace!(device = ?dev, port = ?id, %interface_name, ?medium, "添加端口");
        id
    }

    /// 从设备上摘除端口（先断开链路）。端口留在 arena 中但不再属于设备。
    pub fn remove_port(&mut self, port: PortId) {
        if self.ports[port.0].link.is_some() {
            if let Err(e) = self.disconnect(port) {
                warn!(port = ?port, error = %e, "摘除端口时断链失败");
            }
        }
        let owner = self.ports[port.0].owner;
        self.devices[owner.0].ports.retain(|p| *p != port);
    }

    /// 按接口名查找设备上的物理端口；子接口映射到父接口所在端口。
    pub fn find_port(&self, dev: DeviceId, name: &str) -> Option<PortId> {
        let norm = ifname::normalize(name);
        let lookup = match ifname::split_subinterface(&norm) {
            Some((parent, _)) => parent.to_string(),
            None => norm,
        };
        let lookup_short = ifname::short(&lookup);
        self.devices[dev.0].ports.iter().copied().find(|&p| {
            let port = &self.ports[p.0];
            ifname::normalize(&port.interface_name).eq_ignore_ascii_case(&lookup)
                || ifname::normalize(&port.port_name).eq_ignore_ascii_case(&lookup)
                || port.port_name.eq_ignore_ascii_case(&lookup_short)
        })
    }

    /// 同 `find_port`，找不到时给出错误。
    pub fn require_port(&self, dev: DeviceId, name: &str) -> Result<PortId, TopologyError> {
        self.find_port(dev, name)
            .ok_or_else(|| TopologyError::UnknownInterface {
                device: self.devices[dev.0].name.clone(),
                interface: name.to_string(),
            })
    }

    pub fn ports_of(&self, dev: DeviceId) -> &[PortId] {
        &self.devices[dev.0].ports
    }

    pub fn peer(&self, port: PortId) -> Option<PortId> {
        self.ports[port.0].peer()
    }

    /// 链路可用：已连接、线缆正确、两端设备都已上电。
    pub fn has_link(&self, port: PortId) -> bool {
        let p = &self.ports[port.0];
        let Some(link) = p.link else {
            return false;
        };
        let peer_owner = self.ports[link.peer.0].owner;
        link.up && self.devices[p.owner.0].is_powered() && self.devices[peer_owner.0].is_powered()
    }

    /// 设备某接口是否有可用链路
    pub fn interface_has_link(&self, dev: DeviceId, name: &str) -> bool {
        self.find_port(dev, name).is_some_and(|p| self.has_link(p))
    }

    pub fn link_states(&self, dev: DeviceId) -> LinkStates {
        let map = self.devices[dev.0]
            .ports
            .iter()
            .map(|&p| {
                let key = LinkStates::key(&self.ports[p.0].interface_name);
                (key, self.has_link(p))
            })
            .collect();
        LinkStates(map)
    }

    /// 连线前检查
    pub fn can_connect(&self, a: PortId, b: PortId) -> Result<(), TopologyError> {
        if a == b {
            return Err(TopologyError::SelfLoop);
        }
        let (pa, pb) = (&self.ports[a.0], &self.ports[b.0]);
        if pa.owner == pb.owner {
            return Err(TopologyError::SameDevice);
        }
        if pa.is_connected() {
            return Err(TopologyError::ThisPortConnected);
        }
        if pb.is_connected() {
            return Err(TopologyError::OtherPortConnected);
        }
        if !pa.medium.compatible_with(pb.medium) {
            return Err(TopologyError::IncompatibleMedia {
                a: pa.medium,
                b: pb.medium,
            });
        }
        Ok(())
    }

    /// 以太网推荐线缆：同类设备（交换机对交换机、非交换机对非交换机）用交叉线。
    pub fn recommended_cable(&self, a: PortId, b: PortId) -> CableType {
        let medium = self.ports[a.0].medium;
        match medium {
            PortMedium::Ethernet => {
                let a_mdix = self.devices[self.ports[a.0].owner.0].is_switch_like();
                let b_mdix = self.devices[self.ports[b.0].owner.0].is_switch_like();
                if a_mdix == b_mdix {
                    CableType::CopperCrossover
                } else {
                    CableType::CopperStraightThrough
                }
            }
            PortMedium::Serial => CableType::SerialDce,
            PortMedium::Console | PortMedium::Rs232 => CableType::ConsoleRollover,
            _ => CableType::Auto,
        }
    }

    /// 用指定线缆连接两个端口。以太网选错线缆时链路建立但保持 down。
    #[tracing::instrument(skip(self))]
    pub fn connect(&mut self, a: PortId, b: PortId, cable: CableType) -> Result<(), TopologyError> {
        self.can_connect(a, b)?;
        let medium = self.ports[a.0].medium;

        let (effective, up, a_dce) = if medium == PortMedium::Power {
            (CableType::Auto, true, false)
        } else {
            let recommended = self.recommended_cable(a, b);
            let effective = if cable == CableType::Auto { recommended } else { cable };
            if !effective.allowed_for(medium) {
                return Err(TopologyError::CableNotAllowed(medium));
            }
            let up = medium != PortMedium::Ethernet || effective == recommended;
            let a_dce = medium == PortMedium::Serial && effective == CableType::SerialDce;
            (effective, up, a_dce)
        };

        if !up {
            info!(cable = %effective, "⚠️  线缆类型不推荐，链路保持 down");
        }
        self.ports[a.0].link = Some(Link {
            peer: b,
            cable: effective,
            up,
            dce: a_dce,
        });
        self.ports[b.0].link = Some(Link {
            peer: a,
            cable: effective,
            up,
            dce: medium == PortMedium::Serial && !a_dce,
        });
        debug!(cable = %effective, up, "🔌 链路已建立");
        self.after_topology_change();
        Ok(())
    }

    /// 按设备名 + 接口名连线
    pub fn connect_by_name(
        &mut self,
        dev_a: &str,
        if_a: &str,
        dev_b: &str,
        if_b: &str,
        cable: CableType,
    ) -> Result<(), TopologyError> {
        let a = self.lookup_port(dev_a, if_a)?;
        let b = self.lookup_port(dev_b, if_b)?;
        self.connect(a, b, cable)
    }

    pub fn lookup_port(&self, dev: &str, interface: &str) -> Result<PortId, TopologyError> {
        let id = self
            .device_by_name(dev)
            .ok_or_else(|| TopologyError::UnknownDevice(dev.to_string()))?;
        self.require_port(id, interface)
    }

    /// 断开端口上的链路（两端同时清除）。
    pub fn disconnect(&mut self, port: PortId) -> Result<(), TopologyError> {
        let link = self.ports[port.0].link.take().ok_or(TopologyError::NotConnected)?;
        self.ports[link.peer.0].link = None;
        debug!(port = ?port, peer = ?link.peer, "✂️  链路已断开");
        self.after_topology_change();
        Ok(())
    }

    /// 无线关联：不经过线缆校验直接建立链路。
    pub(crate) fn associate(&mut self, client: PortId, ap_port: PortId) {
        self.ports[client.0].link = Some(Link {
            peer: ap_port,
            cable: CableType::Auto,
            up: true,
            dce: false,
        });
        self.ports[ap_port.0].link = Some(Link {
            peer: client,
            cable: CableType::Auto,
            up: true,
            dce: false,
        });
        self.after_topology_change();
    }

    /// 打开/关闭设备电源开关
    pub fn set_power(&mut self, dev: DeviceId, on: bool) {
        if self.devices[dev.0].switch_on == on {
            return;
        }
        self.devices[dev.0].switch_on = on;
        info!(device = %self.devices[dev.0].name, on, "🔋 电源开关切换");
        self.after_topology_change();
    }

    /// 设置设备是否需要外部供电；需要时补一个 Power 口。
    pub fn set_requires_external_power(&mut self, dev: DeviceId, required: bool) {
        self.devices[dev.0].requires_external_power = required;
        let has_power_port = self.devices[dev.0]
            .ports
            .iter()
            .any(|p| self.ports[p.0].medium == PortMedium::Power);
        if required && !has_power_port {
            self.add_port(dev, "Power", PortMedium::Power);
        }
        self.after_topology_change();
    }

    /// 外部供电传播：从“全部未供电”出发迭代到不动点。
    pub fn recompute_power(&mut self) {
        for d in &mut self.devices {
            d.receiving_external_power = false;
        }
        loop {
            let mut changed = false;
            for i in 0..self.devices.len() {
                let dev = &self.devices[i];
                if !dev.requires_external_power || dev.receiving_external_power {
                    continue;
                }
                let fed = dev.ports.iter().any(|&p| {
                    let port = &self.ports[p.0];
                    port.medium == PortMedium::Power
                        && port.link.is_some_and(|l| {
                            let owner = self.ports[l.peer.0].owner;
                            self.devices[owner.0].provides_power()
                        })
                });
                if fed {
                    self.devices[i].receiving_external_power = true;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
    }

    /// 刷新所有设备的接口协议状态与 EtherChannel 组建情况。
    #[tracing::instrument(skip(self))]
    pub fn refresh_links(&mut self) {
        for i in 0..self.devices.len() {
            let id = DeviceId(i);
            let powered = self.devices[i].is_powered();
            let links = self.link_states(id);
            match &mut self.devices[i].kind {
                DeviceKind::Router(r) => r.refresh_protocol_states(powered, &links),
                DeviceKind::Switch(s) => s.refresh_port_states(powered, &links),
                DeviceKind::AccessPoint(ap) => ap.switch.refresh_port_states(powered, &links),
                _ => {}
            }
        }
        crate::stp::refresh_etherchannels(self);
        trace!("链路状态刷新完成");
    }

    fn after_topology_change(&mut self) {
        self.recompute_power();
        self.refresh_links();
    }
}

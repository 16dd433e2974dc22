//! 路由器控制面
//!
//! 此模块包含路由器的全部状态：接口、路由、ACL、NAT、DHCP、内嵌交换口、ARP、OSPF、
//! console 线路与模块插槽。

// 子模块声明
mod acl;
mod dhcp;
mod interface;
mod module_slot;
mod nat;
mod ospf;
mod routing;
mod switchport;

// 重新导出公共接口
pub use acl::{
    AclAction, AclAddress, AclPacket, AclProtocol, AclRule, AclVerdict, ExtendedAcl,
    StandardAclEntry, standard_acl_permits,
};
pub use dhcp::{DhcpLease, DhcpOffer, DhcpPool, DhcpServer};
pub use interface::{IfAddr, Interface, NatSide};
pub use module_slot::{ModuleError, ModuleKind, ModuleSlot, SlotType, default_slots};
pub use nat::{NatEndpoint, NatRule, NatState, NatTranslation};
pub use ospf::{OspfNetwork, OspfProcess};
pub use routing::{RouteDecision, RouteEntry, StaticRoute};
pub use switchport::RouterSwitchPort;

use std::net::Ipv4Addr;

use super::arp::ArpTable;
use super::mac_table::MacTable;
use super::service::Service;
use crate::net::{LinkStates, ifname};
use tracing::trace;

/// `line console 0`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsoleLine {
    pub login: bool,
    pub password: String,
}

impl Default for ConsoleLine {
    fn default() -> Self {
        Self {
            login: false,
            password: "cisco".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Router {
    pub interfaces: Vec<Interface>,
    pub static_routes: Vec<StaticRoute>,
    pub acls: Vec<ExtendedAcl>,
    pub standard_acls: Vec<StandardAclEntry>,
    pub nat: NatState,
    pub dhcp: DhcpServer,
    pub switchports: Vec<RouterSwitchPort>,
    pub mac_table: MacTable,
    pub mac_aging_secs: u64,
    pub arp: ArpTable,
    pub ospf: Vec<OspfProcess>,
    pub console: ConsoleLine,
    pub slots: Vec<ModuleSlot>,
    pub services: Vec<Service>,
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self {
            interfaces: Vec::new(),
            static_routes: Vec::new(),
            acls: Vec::new(),
            standard_acls: Vec::new(),
            nat: NatState::default(),
            dhcp: DhcpServer::default(),
            switchports: Vec::new(),
            mac_table: MacTable::default(),
            mac_aging_secs: 30,
            arp: ArpTable::default(),
            ospf: Vec::new(),
            console: ConsoleLine::default(),
            slots: default_slots(),
            services: vec![Service::telnet("User Access Verification")],
        }
    }

    /// 物理端口对应的接口；已存在则忽略。
    pub fn add_physical_interface(&mut self, name: &str) {
        if self.interface(name).is_none() {
            self.interfaces.push(Interface::new(name));
        }
    }

    pub fn interface(&self, name: &str) -> Option<&Interface> {
        let norm = ifname::normalize(name);
        self.interfaces
            .iter()
            .find(|i| i.name.eq_ignore_ascii_case(&norm))
    }

    pub fn interface_mut(&mut self, name: &str) -> Option<&mut Interface> {
        let norm = ifname::normalize(name);
        self.interfaces
            .iter_mut()
            .find(|i| i.name.eq_ignore_ascii_case(&norm))
    }

    /// 取得接口；不存在时只允许按 `<父接口>.<n>` 新建子接口。
    pub fn ensure_interface(&mut self, name: &str) -> Option<&mut Interface> {
        let norm = ifname::normalize(name);
        if self.interface(&norm).is_none() {
            let (parent, _) = ifname::split_subinterface(&norm)?;
            self.interface(parent)?;
            trace!(interface = %norm, "新建子接口");
            self.interfaces.push(Interface::new(&norm));
        }
        self.interface_mut(&norm)
    }

    pub fn remove_interface(&mut self, name: &str) {
        let norm = ifname::normalize(name);
        self.interfaces
            .retain(|i| !i.name.eq_ignore_ascii_case(&norm));
    }

    /// 重新计算每个接口的协议状态：管理 up、父接口管理 up、链路存在且设备上电。
    pub fn refresh_protocol_states(&mut self, powered: bool, links: &LinkStates) {
        if !powered {
            for itf in &mut self.interfaces {
                itf.protocol_up = false;
            }
            return;
        }
        let parent_admin: Vec<bool> = self
            .interfaces
            .iter()
            .map(|itf| match &itf.parent {
                Some(p) => self.interface(p).is_some_and(|p| p.admin_up),
                None => true,
            })
            .collect();
        for (itf, parent_up) in self.interfaces.iter_mut().zip(parent_admin) {
            let linked = links.is_up(itf.physical_name());
            itf.protocol_up = itf.admin_up && parent_up && linked;
        }
    }

    /// 配置了该地址的接口
    pub fn interface_by_ip(&self, ip: Ipv4Addr) -> Option<&Interface> {
        self.interfaces
            .iter()
            .find(|i| i.addr.is_some_and(|a| a.ip == ip))
    }

    /// 本路由器 up 接口上的地址
    pub fn owns_ip(&self, ip: Ipv4Addr) -> bool {
        self.interfaces
            .iter()
            .any(|i| i.usable_addr().is_some_and(|a| a.ip == ip))
    }

    pub fn acl(&self, name: &str) -> Option<&ExtendedAcl> {
        self.acls
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name.trim()))
    }

    pub fn ensure_acl(&mut self, name: &str) -> &mut ExtendedAcl {
        let idx = match self
            .acls
            .iter()
            .position(|a| a.name.eq_ignore_ascii_case(name.trim()))
        {
            Some(i) => i,
            None => {
                self.acls.push(ExtendedAcl::new(name));
                self.acls.len() - 1
            }
        };
        &mut self.acls[idx]
    }

    /// 绑定到接口的 ACL 若未定义则放行。
    fn acl_check(&self, acl_name: Option<&str>, pkt: &AclPacket) -> Option<String> {
        let name = acl_name?;
        let acl = self.acl(name)?;
        let verdict = acl.evaluate(pkt);
        if verdict.permit { None } else { Some(verdict.hit) }
    }

    /// 入接口 inbound ACL 与出接口 outbound ACL；拒绝时返回原因文本。
    pub fn acl_permits_routed(&self, pkt: &AclPacket, ingress: Option<&str>, egress: Option<&str>) -> Result<(), String> {
        if let Some(in_if) = ingress.and_then(|n| self.interface(n)) {
            if let Some(hit) = self.acl_check(in_if.acl_in.as_deref(), pkt) {
                return Err(format!(
                    "Blocked by ACL {} (in) on {}. Rule: {hit}",
                    in_if.acl_in.as_deref().unwrap_or_default(),
                    in_if.name
                ));
            }
        }
        if let Some(out_if) = egress.and_then(|n| self.interface(n)) {
            if let Some(hit) = self.acl_check(out_if.acl_out.as_deref(), pkt) {
                return Err(format!(
                    "Blocked by ACL {} (out) on {}. Rule: {hit}",
                    out_if.acl_out.as_deref().unwrap_or_default(),
                    out_if.name
                ));
            }
        }
        Ok(())
    }

    /// `access-list <n> permit|deny <net> [wildcard]`
    pub fn add_standard_acl(&mut self, number: u32, action: AclAction, network: Ipv4Addr, wildcard: Ipv4Addr) {
        let entry = StandardAclEntry {
            number,
            action,
            network,
            wildcard,
        };
        if !self.standard_acls.contains(&entry) {
            self.standard_acls.push(entry);
        }
    }

    pub fn remove_standard_acl(&mut self, number: u32) -> bool {
        let before = self.standard_acls.len();
        self.standard_acls.retain(|e| e.number != number);
        self.standard_acls.len() != before
    }
}

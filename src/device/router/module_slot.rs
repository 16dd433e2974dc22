//! 模块插槽
//!
//! WIC / HWIC / EHWIC 插槽。安装模块会生成端口与接口，只允许在断电时操作。

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::net::{DeviceId, Network, PortId, PortMedium};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotType {
    Wic,
    Hwic,
    Ehwic,
}

impl fmt::Display for SlotType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SlotType::Wic => "WIC",
            SlotType::Hwic => "HWIC",
            SlotType::Ehwic => "EHWIC",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModuleKind {
    /// 空槽盖板
    #[serde(rename = "WIC-COVER")]
    WicCover,
    #[serde(rename = "WIC-1T")]
    Wic1T,
    #[serde(rename = "WIC-2T")]
    Wic2T,
    #[serde(rename = "HWIC-2T")]
    Hwic2T,
    #[serde(rename = "HWIC-4ESW")]
    Hwic4Esw,
    #[serde(rename = "HWIC-1GE-SFP")]
    Hwic1GeSfp,
    #[serde(rename = "EHWIC-2T")]
    Ehwic2T,
}

impl fmt::Display for ModuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ModuleKind::WicCover => "WIC-COVER",
            ModuleKind::Wic1T => "WIC-1T",
            ModuleKind::Wic2T => "WIC-2T",
            ModuleKind::Hwic2T => "HWIC-2T",
            ModuleKind::Hwic4Esw => "HWIC-4ESW",
            ModuleKind::Hwic1GeSfp => "HWIC-1GE-SFP",
            ModuleKind::Ehwic2T => "EHWIC-2T",
        })
    }
}

impl ModuleKind {
    /// 接受 `HWIC-4ESW`、`hwic_4esw` 等写法
    pub fn parse(s: &str) -> Option<Self> {
        let key = s.trim().to_ascii_uppercase().replace('_', "-");
        Some(match key.as_str() {
            "WIC-COVER" => ModuleKind::WicCover,
            "WIC-1T" => ModuleKind::Wic1T,
            "WIC-2T" => ModuleKind::Wic2T,
            "HWIC-2T" => ModuleKind::Hwic2T,
            "HWIC-4ESW" => ModuleKind::Hwic4Esw,
            "HWIC-1GE-SFP" => ModuleKind::Hwic1GeSfp,
            "EHWIC-2T" => ModuleKind::Ehwic2T,
            _ => return None,
        })
    }

    pub fn fits(self, slot: SlotType) -> bool {
        match slot {
            SlotType::Wic => matches!(
                self,
                ModuleKind::WicCover | ModuleKind::Wic1T | ModuleKind::Wic2T
            ),
            SlotType::Hwic => matches!(
                self,
                ModuleKind::Hwic2T | ModuleKind::Hwic4Esw | ModuleKind::Hwic1GeSfp
            ),
            SlotType::Ehwic => self == ModuleKind::Ehwic2T,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSlot {
    pub index: u8,
    pub slot_type: SlotType,
    pub installed: Option<ModuleKind>,
    /// 模块生成的端口与接口名，拆除时一并删除
    pub ports: Vec<PortId>,
    pub interfaces: Vec<String>,
}

impl ModuleSlot {
    pub fn new(index: u8, slot_type: SlotType) -> Self {
        Self {
            index,
            slot_type,
            installed: None,
            ports: Vec::new(),
            interfaces: Vec::new(),
        }
    }
}

/// 默认机箱：0、1 为 HWIC，2 为 WIC，3 为 EHWIC。
pub fn default_slots() -> Vec<ModuleSlot> {
    vec![
        ModuleSlot::new(0, SlotType::Hwic),
        ModuleSlot::new(1, SlotType::Hwic),
        ModuleSlot::new(2, SlotType::Wic),
        ModuleSlot::new(3, SlotType::Ehwic),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModuleError {
    #[error("{0} is not a router")]
    NotARouter(String),
    #[error("{device}: Cannot change modules while powered ON. Power off first.")]
    PoweredOn { device: String },
    #[error("No slot {0}")]
    UnknownSlot(u8),
    #[error("Module {module} is not compatible with slot type {slot_type} (slot {slot})")]
    Incompatible {
        module: ModuleKind,
        slot_type: SlotType,
        slot: u8,
    },
}

impl Network {
    fn slot_position(&self, dev: DeviceId, slot: u8) -> Result<usize, ModuleError> {
        let device = self.device(dev);
        let router = device
            .router()
            .ok_or_else(|| ModuleError::NotARouter(device.name.clone()))?;
        if device.is_powered() {
            return Err(ModuleError::PoweredOn {
                device: device.name.clone(),
            });
        }
        router
            .slots
            .iter()
            .position(|s| s.index == slot)
            .ok_or(ModuleError::UnknownSlot(slot))
    }

    /// 安装模块（先拆除槽内原有模块）
    #[tracing::instrument(skip(self))]
    pub fn install_module(&mut self, dev: DeviceId, slot: u8, module: ModuleKind) -> Result<(), ModuleError> {
        let pos = self.slot_position(dev, slot)?;
        let slot_type = self.router(dev).map(|r| r.slots[pos].slot_type);
        if let Some(slot_type) = slot_type {
            if !module.fits(slot_type) {
                return Err(ModuleError::Incompatible {
                    module,
                    slot_type,
                    slot,
                });
            }
        }
        self.remove_module(dev, slot)?;

        let spawned: Vec<(String, String, PortMedium, bool)> = match module {
            ModuleKind::WicCover => Vec::new(),
            ModuleKind::Wic1T => serial_ports(slot, 1),
            ModuleKind::Wic2T | ModuleKind::Hwic2T | ModuleKind::Ehwic2T => serial_ports(slot, 2),
            ModuleKind::Hwic4Esw => (0..4)
                .map(|n| {
                    (
                        format!("Fa0/{slot}/{n}"),
                        format!("FastEthernet0/{slot}/{n}"),
                        PortMedium::Ethernet,
                        true,
                    )
                })
                .collect(),
            ModuleKind::Hwic1GeSfp => vec![(
                format!("Gi0/{slot}/0"),
                format!("GigabitEthernet0/{slot}/0"),
                PortMedium::Ethernet,
                false,
            )],
        };

        let mut ports = Vec::new();
        let mut interfaces = Vec::new();
        for (label, ifname, medium, switchport) in spawned {
            ports.push(self.add_port(dev, &label, medium));
            if switchport {
                if let Some(r) = self.router_mut(dev) {
                    r.ensure_switchport(&ifname);
                }
            }
            interfaces.push(ifname);
        }
        if let Some(r) = self.router_mut(dev) {
            let s = &mut r.slots[pos];
            s.installed = Some(module);
            s.ports = ports;
            s.interfaces = interfaces;
        }
        info!(%module, slot, "🧩 模块已安装");
        self.refresh_links();
        Ok(())
    }

    /// 拆除模块：断开并删除端口，删除接口、交换口和相关 MAC。
    pub fn remove_module(&mut self, dev: DeviceId, slot: u8) -> Result<(), ModuleError> {
        let pos = self.slot_position(dev, slot)?;
        let Some(r) = self.router_mut(dev) else {
            return Ok(());
        };
        let s = &mut r.slots[pos];
        let ports = std::mem::take(&mut s.ports);
        let interfaces = std::mem::take(&mut s.interfaces);
        let removed = s.installed.take();

        for name in &interfaces {
            r.remove_interface(name);
            r.remove_switchport(name);
        }
        for p in ports {
            self.remove_port(p);
        }
        if let Some(module) = removed {
            debug!(%module, slot, "模块已拆除");
        }
        self.refresh_links();
        Ok(())
    }
}

fn serial_ports(slot: u8, count: u8) -> Vec<(String, String, PortMedium, bool)> {
    (0..count)
        .map(|n| {
            (
                format!("Se0/{slot}/{n}"),
                format!("Serial0/{slot}/{n}"),
                PortMedium::Serial,
                false,
            )
        })
        .collect()
}

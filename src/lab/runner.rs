//! 实验执行
//!
//! 把 [`LabSpec`] 建成网络，挂上周期维护事件，然后按顺序执行步骤。
//! 每台设备的 CLI 会话在整个实验中保持，模式状态跨步骤延续。

use std::collections::HashMap;
use std::path::Path;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::error::LabError;
use super::spec::{DeviceKindSpec, DeviceSpec, LabSpec, StepSpec};
use crate::cli::{TerminalSession, open_session};
use crate::config;
use crate::device::WirelessSettings;
use crate::net::{CableType, DeviceId, Network};
use crate::sim::{NetWorld, SimTime, Simulator, schedule_maintenance};

/// 一条已执行命令的记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    pub at_ms: u64,
    pub device: String,
    pub prompt: String,
    pub command: String,
    pub output: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeviceReport {
    pub name: String,
    pub kind: &'static str,
    pub powered: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running_config: Option<String>,
}

/// `--json-out` 写出的结果
#[derive(Debug, Clone, Serialize)]
pub struct LabReport {
    pub name: Option<String>,
    pub now_ms: u64,
    pub transcript: Vec<TranscriptEntry>,
    pub devices: Vec<DeviceReport>,
}

pub struct Lab {
    name: Option<String>,
    sim: Simulator,
    world: NetWorld,
    sessions: HashMap<DeviceId, Box<dyn TerminalSession>>,
    transcript: Vec<TranscriptEntry>,
    steps: Vec<StepSpec>,
}

fn add_device(net: &mut Network, spec: &DeviceSpec) -> Result<DeviceId, LabError> {
    let id = match spec.kind {
        DeviceKindSpec::Router => net.add_router(spec.name.as_str()),
        DeviceKindSpec::Switch => net.add_switch(spec.name.as_str()),
        DeviceKindSpec::Pc => net.add_pc(spec.name.as_str()),
        DeviceKindSpec::AccessPoint => net.add_access_point(spec.name.as_str()),
        DeviceKindSpec::PowerDistribution => net.add_power_distribution(spec.name.as_str()),
        DeviceKindSpec::PowerOutlet => net.add_power_outlet(spec.name.as_str()),
    };
    net.device_mut(id).position = spec.position;

    if !spec.modules.is_empty() {
        net.set_power(id, false);
        for m in &spec.modules {
            net.install_module(id, m.slot, m.module)?;
        }
        net.set_power(id, true);
    }
    if spec.wireless && net.add_wireless_adapter(id).is_none() {
        return Err(LabError::WrongKind {
            device: spec.name.clone(),
            expected: "pc",
        });
    }
    if let Some(ap_spec) = &spec.access_point {
        let ap = net.access_point_mut(id).ok_or_else(|| LabError::WrongKind {
            device: spec.name.clone(),
            expected: "access point",
        })?;
        let defaults = WirelessSettings::default();
        ap.wireless = WirelessSettings {
            ssid: ap_spec.ssid.clone(),
            band: ap_spec.band,
            range_m: ap_spec.range_m.unwrap_or(defaults.range_m),
            security: ap_spec.security,
            passphrase: ap_spec.passphrase.clone().unwrap_or(defaults.passphrase),
        };
    }
    if spec.requires_external_power {
        net.set_requires_external_power(id, true);
    }
    Ok(id)
}

impl Lab {
    pub fn load(path: &Path) -> Result<Self, LabError> {
        let raw = std::fs::read_to_string(path)?;
        let spec: LabSpec = serde_json::from_str(&raw)?;
        Self::build(spec)
    }

    /// 建拓扑、回放设备初始配置，并从 0 时刻起挂上维护事件。
    #[tracing::instrument(skip(spec), fields(devices = spec.devices.len(), links = spec.links.len()))]
    pub fn build(spec: LabSpec) -> Result<Self, LabError> {
        let mut net = Network::new();
        for d in &spec.devices {
            if net.device_by_name(&d.name).is_some() {
                return Err(LabError::DuplicateDevice(d.name.clone()));
            }
            add_device(&mut net, d)?;
        }
        for l in &spec.links {
            net.connect_by_name(&l.a, &l.a_if, &l.b, &l.b_if, l.cable)?;
        }
        net.refresh_links();

        let mut lab = Self {
            name: spec.name,
            sim: Simulator::default(),
            world: NetWorld::new(net),
            sessions: HashMap::new(),
            transcript: Vec::new(),
            steps: spec.steps,
        };
        for d in &spec.devices {
            if d.config.is_empty() {
                continue;
            }
            let id = lab.device_id(&d.name)?;
            let text = d.config.join("\n");
            let rejected = config::replay_into(&mut lab.world.net, id, &text)
                .ok_or_else(|| LabError::NoCli(d.name.clone()))?;
            for r in rejected {
                warn!(device = %d.name, line = r.line_no, command = %r.command, output = %r.output, "初始配置行被拒绝");
            }
        }
        crate::stp::recompute(&mut lab.world.net);
        schedule_maintenance(&mut lab.sim, SimTime::ZERO);
        info!(name = ?lab.name, "🧪 实验已建立");
        Ok(lab)
    }

    pub fn net(&self) -> &Network {
        &self.world.net
    }

    pub fn net_mut(&mut self) -> &mut Network {
        &mut self.world.net
    }

    pub fn now(&self) -> SimTime {
        self.sim.now()
    }

    pub fn transcript(&self) -> &[TranscriptEntry] {
        &self.transcript
    }

    fn device_id(&self, name: &str) -> Result<DeviceId, LabError> {
        self.world
            .net
            .device_by_name(name)
            .ok_or_else(|| LabError::UnknownDevice(name.to_string()))
    }

    /// 推进虚拟时钟，期间执行到期的维护事件。
    pub fn advance(&mut self, by: SimTime) {
        let until = self.sim.now() + by;
        self.sim.run_until(until, &mut self.world);
        self.world.net.set_now(self.sim.now());
    }

    /// 在设备的持久会话里执行一行命令并记入记录
    pub fn exec(&mut self, device: &str, command: &str) -> Result<String, LabError> {
        let id = self.device_id(device)?;
        if !self.sessions.contains_key(&id) {
            let session = open_session(&self.world.net, id).ok_or_else(|| LabError::NoCli(device.to_string()))?;
            self.sessions.insert(id, session);
        }
        let Some(session) = self.sessions.get_mut(&id) else {
            return Err(LabError::NoCli(device.to_string()));
        };
        let prompt = session.prompt(&self.world.net);
        let output = session.execute(&mut self.world.net, command);
        debug!(device, command, "实验命令");
        self.transcript.push(TranscriptEntry {
            at_ms: self.sim.now().as_millis(),
            device: device.to_string(),
            prompt,
            command: command.to_string(),
            output: output.clone(),
        });
        Ok(output)
    }

    pub fn step(&mut self, step: &StepSpec) -> Result<(), LabError> {
        match step {
            StepSpec::Cli { device, commands } => {
                for c in commands {
                    self.exec(device, c)?;
                }
            }
            StepSpec::Advance { ms } => self.advance(SimTime::from_millis(*ms)),
            StepSpec::Power { device, on } => {
                let id = self.device_id(device)?;
                self.world.net.set_power(id, *on);
            }
            StepSpec::Connect { a, a_if, b, b_if, cable } => {
                self.world.net.connect_by_name(a, a_if, b, b_if, *cable)?;
            }
            StepSpec::Disconnect { device, interface } => {
                let port = self.world.net.lookup_port(device, interface)?;
                self.world.net.disconnect(port)?;
            }
        }
        Ok(())
    }

    /// 依次执行全部步骤；给了 `until` 且时钟尚未到达时再推进到 `until`。
    #[tracing::instrument(skip(self))]
    pub fn run(&mut self, until: Option<SimTime>) -> Result<(), LabError> {
        let steps = std::mem::take(&mut self.steps);
        for (i, step) in steps.iter().enumerate() {
            debug!(index = i, ?step, "执行步骤");
            self.step(step)?;
        }
        if let Some(until) = until {
            let now = self.sim.now();
            if until > now {
                self.advance(until.since(now));
            }
        }
        info!(now = %self.sim.now(), commands = self.transcript.len(), "✅ 实验完成");
        Ok(())
    }

    pub fn report(&self) -> LabReport {
        let net = &self.world.net;
        let devices = net
            .devices()
            .map(|d| DeviceReport {
                name: d.name.clone(),
                kind: d.kind.label(),
                powered: d.is_powered(),
                running_config: config::running_config(net, d.id),
            })
            .collect();
        LabReport {
            name: self.name.clone(),
            now_ms: self.sim.now().as_millis(),
            transcript: self.transcript.clone(),
            devices,
        }
    }

    /// 连一条线，线缆自动选择
    pub fn connect(&mut self, a: &str, a_if: &str, b: &str, b_if: &str) -> Result<(), LabError> {
        self.world.net.connect_by_name(a, a_if, b, b_if, CableType::Auto)?;
        Ok(())
    }
}

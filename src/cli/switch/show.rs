//! 交换机 show 命令

use super::SwitchSession;
use crate::cli::error::{CliError, CliResult};
use crate::cli::mac_address_table;
use crate::cli::tokens::Args;
use crate::device::L2Config;
use crate::device::switch::{PortChannel, StpState};
use crate::device::{Switch, SwitchportMode};
use crate::net::{DeviceId, Network, ifname};
use crate::stp::{self, MemberFlag};

fn l2_lines(l2: &L2Config, indent: &str) -> String {
    let mut out = format!("{indent}switchport mode: {}\n", l2.mode);
    match l2.mode {
        SwitchportMode::Access => out.push_str(&format!("{indent}access vlan: {}\n", l2.access_vlan)),
        SwitchportMode::Trunk => out.push_str(&format!(
            "{indent}native vlan: {}\n{indent}allowed vlans: {}\n",
            l2.native_vlan, l2.allowed
        )),
    }
    out
}

fn bundle_state(formed: bool, pc: &PortChannel) -> &'static str {
    if formed && pc.protocol_up { "(SU)" } else { "(SD)" }
}

/// 成组 channel 的物理成员在很多输出里由 Po 代替
fn hidden_by_channel(sw: &Switch, name: &str) -> bool {
    sw.formed_channel_of(name).is_some()
}

fn members_column(net: &Network, dev: DeviceId, sw: &Switch, group: u32) -> String {
    sw.channel_members(group)
        .into_iter()
        .map(|m| {
            let st = stp::member_state(net, dev, group, m);
            format!("{}({})", ifname::short(&m.name), st.flag)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `po1`、`port-channel 1`、`Po1` 里的组号
fn parse_group(args: &Args<'_>) -> Option<u32> {
    let compact: String = args.rest(0).split_whitespace().collect();
    if compact.is_empty() {
        return None;
    }
    ifname::port_channel_id(&compact).or_else(|| compact.parse().ok())
}

impl SwitchSession {
    pub(super) fn show_vlan_brief(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        let sw = self.switch(net)?;
        let mut out = String::from(
            "VLAN  Name                             Status    Ports\n\
             ----  -------------------------------  --------  -------------------------------\n",
        );
        for v in sw.vlans.values() {
            let status = if v.active { "active" } else { "suspended" };
            let ports: Vec<String> = sw
                .ports
                .iter()
                .filter(|p| p.l2.mode == SwitchportMode::Access && p.l2.access_vlan == v.id)
                .map(|p| ifname::short(&p.name))
                .collect();
            out.push_str(&format!(
                "{:<4}  {:<31}  {status:<8}  {}\n",
                v.id,
                v.name,
                ports.join(" ")
            ));
        }
        Ok(out.trim_end_matches('\n').to_string())
    }

    pub(super) fn show_mac_table(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        let now = net.now();
        let sw = self.switch_mut(net)?;
        sw.purge_macs(now);
        Ok(mac_address_table(sw.mac_table.entries()))
    }

    /// 无参数列出全部端口；`po N` 显示 Port-channel；其它参数只显示该口。
    pub(super) fn show_interfaces(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        stp::refresh_etherchannels(net);
        if args.is_empty() {
            return self.interfaces_listing(net, None);
        }
        let compact: String = args.rest(0).split_whitespace().collect();
        let lower = compact.to_ascii_lowercase();
        if lower == "po" || lower == "port-channel" {
            return Err(CliError::IncompleteCommand);
        }
        if let Some(id) = ifname::port_channel_id(&compact) {
            return self.port_channel_interface(net, id);
        }
        let name = self
            .switch(net)?
            .port(&compact)
            .map(|p| p.name.clone())
            .ok_or(CliError::Invalid("interface"))?;
        self.interfaces_listing(net, Some(&name))
    }

    fn interfaces_listing(&self, net: &Network, only: Option<&str>) -> CliResult {
        let sw = self.switch(net)?;
        let mut blocks: Vec<String> = Vec::new();
        for p in &sw.ports {
            if only.is_some_and(|n| !ifname::same_interface(n, &p.name)) {
                continue;
            }
            let admin = if p.admin_up { "up" } else { "administratively down" };
            let proto = if p.admin_up && p.protocol_up { "up" } else { "down" };
            let mut block = format!("{} is {admin}, line protocol is {proto}\n", p.name);
            match sw.formed_channel_of(&p.name) {
                Some(gid) => {
                    let flag = if !p.admin_up || !net.interface_has_link(self.device, &p.name) {
                        "down"
                    } else if p.channel_suspended {
                        "suspended"
                    } else {
                        "bundled"
                    };
                    block.push_str(&format!("  Member of Port-channel{gid} ({flag})\n"));
                }
                None => {
                    block.push_str(&l2_lines(&p.l2, "  "));
                    if let Some(gid) = p.channel() {
                        let state = if p.channel_suspended { "suspended" } else { "bundled/standalone" };
                        block.push_str(&format!(
                            "  etherchannel: group {gid}, mode {}, {state}\n",
                            p.channel_mode
                        ));
                    }
                }
            }
            block.push_str(&format!("  STP: {} / {}", p.stp_role, p.stp_state));
            blocks.push(block);
        }
        if only.is_none() {
            for pc in &sw.port_channels {
                let up = if pc.protocol_up { "up" } else { "down" };
                blocks.push(format!(
                    "{} is {up}, line protocol is {up}\n{}  STP: {} / {}",
                    pc.name(),
                    l2_lines(&pc.l2, "  "),
                    pc.stp_role,
                    pc.stp_state
                ));
            }
        }
        Ok(blocks.join("\n\n"))
    }

    fn port_channel_interface(&mut self, net: &mut Network, id: u32) -> CliResult {
        if id < 1 {
            return Err(CliError::Invalid("interface"));
        }
        self.switch_mut(net)?.ensure_port_channel(id);
        let sw = self.switch(net)?;
        let Some(pc) = sw.port_channel(id) else {
            return Err(CliError::NotFound("Port-channel"));
        };
        let formed = sw.is_channel_formed(id);
        let up = if pc.protocol_up { "up" } else { "down" };
        let mut out = format!(
            "Port-channel{id} is {up}, line protocol is {up}\n  Protocol: {}\n  Bundle State: {}\n",
            stp::protocol_name(net, self.device, id),
            bundle_state(formed, pc)
        );
        if !formed {
            out.push_str(&format!(
                "  Suspend Reason: {}\n",
                stp::suspend_reason(net, self.device, id)
            ));
        }
        out.push_str(&l2_lines(&pc.l2, "  "));
        out.push_str(
            "  Members:\n    Port        LocalMode  PartnerMode  Flags  Reason\n    \
             ----------  ---------  ----------   -----  -------------------------\n",
        );
        for m in sw.channel_members(id) {
            let st = stp::member_state(net, self.device, id, m);
            let partner = stp::partner_info(net, self.device, m);
            out.push_str(&format!(
                "    {:<10}  {:<9}  {:<10}  {:<5}  {}\n",
                ifname::short(&m.name),
                m.channel_mode.to_string(),
                partner.mode,
                st.flag.to_string(),
                st.reason.unwrap_or("")
            ));
        }
        out.push_str(&format!("  STP: {} / {}", pc.stp_role, pc.stp_state));
        Ok(out)
    }

    pub(super) fn show_trunks(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        stp::refresh_etherchannels(net);
        let sw = self.switch(net)?;
        let mut rows: Vec<(String, &L2Config, bool)> = Vec::new();
        for p in &sw.ports {
            if p.l2.mode != SwitchportMode::Trunk || hidden_by_channel(sw, &p.name) {
                continue;
            }
            let trunking = p.admin_up && p.protocol_up && p.stp_state == StpState::Forwarding;
            rows.push((ifname::short(&p.name), &p.l2, trunking));
        }
        for pc in &sw.port_channels {
            if !pc.formed || pc.l2.mode != SwitchportMode::Trunk {
                continue;
            }
            let trunking = pc.protocol_up && pc.stp_state == StpState::Forwarding;
            rows.push((format!("Po{}", pc.id), &pc.l2, trunking));
        }

        let mut out = String::from(
            "Port        Mode         Encapsulation  Status        Native vlan\n\
             ----------  -----------  -------------  ------------  ----------\n",
        );
        for (name, l2, trunking) in &rows {
            let status = if *trunking { "trunking" } else { "not-trunking" };
            out.push_str(&format!(
                "{name:<10}  {:<11}  {:<13}  {status:<12}  {}\n",
                "on", "802.1q", l2.native_vlan
            ));
        }
        out.push_str("\nPort        Vlans allowed on trunk\n----------  ---------------------\n");
        for (name, l2, _) in &rows {
            let list = if l2.allowed.is_empty() {
                "none".to_string()
            } else {
                l2.allowed.to_string()
            };
            out.push_str(&format!("{name:<10}  {list}\n"));
        }
        Ok(out.trim_end_matches('\n').to_string())
    }

    pub(super) fn show_etherchannel_summary(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        stp::refresh_etherchannels(net);
        let sw = self.switch(net)?;
        let mut out = String::from(
            "Flags:  D - down        P - bundled in port-channel\n        \
             s - suspended   I - stand-alone\n\n\
             Group  Port-channel  Protocol    Ports\n\
             -----  -----------   --------    -----------------------------\n",
        );
        for pc in &sw.port_channels {
            let members = members_column(net, self.device, sw, pc.id);
            let members = if members.is_empty() { String::new() } else { format!("{members} ") };
            out.push_str(&format!(
                "{:<5} {:<11} {:<11} {members}{}\n",
                pc.id,
                format!("Po{}", pc.id),
                stp::protocol_name(net, self.device, pc.id),
                bundle_state(pc.formed, pc)
            ));
        }
        Ok(out.trim_end_matches('\n').to_string())
    }

    pub(super) fn show_etherchannel_port_channel(&mut self, net: &mut Network, args: Args<'_>) -> CliResult {
        stp::refresh_etherchannels(net);
        if let Some(id) = parse_group(&args).filter(|id| *id > 0) {
            return self.etherchannel_detail(net, id);
        }
        let sw = self.switch(net)?;
        let mut out = String::from(
            "Port-channel Information\n\
             Group  Port-channel  Protocol     Status   Members\n\
             -----  -----------   ----------   ------   -----------------------------\n",
        );
        for pc in &sw.port_channels {
            let status = if pc.formed && pc.protocol_up { "Up" } else { "Down" };
            out.push_str(&format!(
                "{:<5}  {:<11}  {:<10}   {status:<6}   {}\n",
                pc.id,
                format!("Po{}", pc.id),
                stp::protocol_name(net, self.device, pc.id),
                members_column(net, self.device, sw, pc.id)
            ));
        }
        Ok(out.trim_end_matches('\n').to_string())
    }

    fn etherchannel_detail(&mut self, net: &mut Network, id: u32) -> CliResult {
        self.switch_mut(net)?.ensure_port_channel(id);
        let sw = self.switch(net)?;
        let Some(pc) = sw.port_channel(id) else {
            return Err(CliError::NotFound("Port-channel"));
        };
        let formed = sw.is_channel_formed(id);
        let status = if formed && pc.protocol_up { "Up" } else { "Down" };
        let mut out = format!(
            "Port-channel{id} (Po{id})\n  Protocol: {}\n  Status: {status}\n",
            stp::protocol_name(net, self.device, id)
        );
        if !formed {
            out.push_str(&format!(
                "  Suspend Reason: {}\n",
                stp::suspend_reason(net, self.device, id)
            ));
        }
        out.push_str(
            "\n  Members:\n  \
             Port        LocalMode  Flags  PartnerSystemID      PartnerPort  PartnerMode  Reason\n  \
             ----------  ---------  -----  -------------------  ----------   -----------  -------------------------\n",
        );
        for m in sw.channel_members(id) {
            let st = stp::member_state(net, self.device, id, m);
            let partner = stp::partner_info(net, self.device, m);
            out.push_str(&format!(
                "  {:<10}  {:<9}  {:<5}  {:<19}  {:<10}   {:<11}  {}\n",
                ifname::short(&m.name),
                m.channel_mode.to_string(),
                st.flag.to_string(),
                partner.system_id,
                partner.port,
                partner.mode,
                st.reason.unwrap_or("")
            ));
        }
        Ok(out.trim_end_matches('\n').to_string())
    }

    pub(super) fn show_lacp_neighbor(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        stp::refresh_etherchannels(net);
        let sw = self.switch(net)?;
        let mut out = String::from(
            "LACP Neighbors\n\
             Port        Group  Actor  PartnerSystemID      PartnerPort  Partner  State\n\
             ----------  -----  -----  -------------------  ----------   -------  ----------------\n",
        );
        let mut any = false;
        for p in sw.ports.iter().filter(|p| p.channel_mode.is_lacp()) {
            any = true;
            let group = p.channel().map(|g| g.to_string()).unwrap_or_else(|| "-".to_string());
            let mut partner = stp::PartnerInfo::default();
            let state = if !p.admin_up {
                "AdminDown".to_string()
            } else if !net.interface_has_link(self.device, &p.name) {
                "LinkDown".to_string()
            } else {
                partner = stp::partner_info(net, self.device, p);
                match p.channel() {
                    _ if partner.system_id == "-" => "NoPartner".to_string(),
                    None => "NoGroup".to_string(),
                    Some(gid) => {
                        let st = stp::member_state(net, self.device, gid, p);
                        let reason = st.reason.unwrap_or("");
                        match st.flag {
                            MemberFlag::Bundled => "Up (Bundled)".to_string(),
                            MemberFlag::Suspended => format!("Suspended ({reason})"),
                            MemberFlag::Down => format!("Down ({reason})"),
                        }
                    }
                }
            };
            out.push_str(&format!(
                "{:<10}  {group:<5}  {:<5}  {:<19}  {:<10}   {:<7}  {state}\n",
                ifname::short(&p.name),
                p.channel_mode.to_string(),
                partner.system_id,
                partner.port,
                partner.mode
            ));
        }
        if !any {
            return Ok("No LACP neighbors found.".to_string());
        }
        Ok(out.trim_end_matches('\n').to_string())
    }

    pub(super) fn show_spanning_tree(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        stp::refresh_etherchannels(net);
        let (priority, mac) = stp::bridge_id(net, self.device);
        let sw = self.switch(net)?;
        let (root_priority, root_mac) = match (&sw.root_bridge, sw.is_root) {
            (Some((p, m)), false) => (*p, m.clone()),
            _ => (priority, mac.clone()),
        };
        let mut out = format!(
            "VLAN0001\n  Spanning tree enabled protocol ieee\n  Root ID    Priority    {root_priority}\n             \
             Address     {root_mac}\n             Cost        {}\n             {}\n\n",
            if sw.is_root { 0 } else { 4 },
            if sw.is_root { "This bridge is the root" } else { "Root port is selected" }
        );
        out.push_str(&format!(
            "  Bridge ID  Priority    {priority}  (priority {priority})\n             Address     {mac}\n\n"
        ));
        out.push_str("Interface        Role Sts\n---------------- ---- ---\n");
        for p in sw.ports.iter().filter(|p| !hidden_by_channel(sw, &p.name)) {
            out.push_str(&format!(
                "{:<16} {:<4} {}\n",
                ifname::short(&p.name),
                p.stp_role.short(),
                p.stp_state.short()
            ));
        }
        for pc in sw.port_channels.iter().filter(|pc| pc.formed) {
            out.push_str(&format!(
                "{:<16} {:<4} {}\n",
                format!("Po{}", pc.id),
                pc.stp_role.short(),
                pc.stp_state.short()
            ));
        }
        Ok(out.trim_end_matches('\n').to_string())
    }

    pub(super) fn show_running_config(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        crate::config::serialize_switch(net, self.device).ok_or(CliError::DeviceNotReady)
    }

    pub(super) fn show_startup_config(&mut self, net: &mut Network, _args: Args<'_>) -> CliResult {
        Ok(net
            .device(self.device)
            .startup_config
            .clone()
            .unwrap_or_else(|| "startup-config is not present".to_string()))
    }
}

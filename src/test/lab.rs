use crate::lab::{Lab, LabError, LabSpec, StepSpec};
use crate::net::CableType;
use crate::sim::SimTime;

const ROUTER_PC: &str = r#"{
  "name": "edge",
  "devices": [
    { "name": "R1", "kind": "router",
      "config": ["enable", "configure terminal", "interface Gi0/0",
                 "ip address 10.0.0.1 255.255.255.0", "no shutdown", "end"] },
    { "name": "PC1", "kind": "pc", "config": ["set ip 10.0.0.2 255.255.255.0 10.0.0.1"] }
  ],
  "links": [ { "a": "R1", "a_if": "Gi0/0", "b": "PC1", "b_if": "FastEthernet0" } ],
  "steps": [
    { "kind": "cli", "device": "R1", "commands": ["enable", "show ip interface brief"] },
    { "kind": "advance", "ms": 1500 },
    { "kind": "cli", "device": "PC1", "commands": ["ping 10.0.0.1"] }
  ]
}"#;

fn parse(json: &str) -> LabSpec {
    serde_json::from_str(json).expect("lab json")
}

#[test]
fn spec_defaults_fill_missing_sections() {
    let spec = parse(r#"{ "devices": [ { "name": "SW1", "kind": "switch" } ] }"#);
    assert!(spec.name.is_none());
    assert!(spec.links.is_empty());
    assert!(spec.steps.is_empty());
    assert!(spec.devices[0].config.is_empty());
    assert!(!spec.devices[0].requires_external_power);

    let spec = parse(ROUTER_PC);
    assert_eq!(spec.links[0].cable, CableType::Auto);
    assert!(matches!(spec.steps[1], StepSpec::Advance { ms: 1500 }));
}

#[test]
fn run_records_prompts_and_clock() {
    let mut lab = Lab::build(parse(ROUTER_PC)).expect("build");
    lab.run(None).expect("run");

    let t = lab.transcript();
    assert_eq!(t.len(), 3);
    assert_eq!(t[0].prompt, "R1>");
    assert_eq!(t[0].command, "enable");
    assert_eq!(t[0].at_ms, 0);
    assert_eq!(t[1].prompt, "R1#");
    assert!(t[1].output.contains("GigabitEthernet0/0"));
    assert!(t[1].output.contains("10.0.0.1"));
    assert_eq!(t[2].device, "PC1");
    assert_eq!(t[2].prompt, "PC1> ");
    assert_eq!(t[2].at_ms, 1500);
    assert!(t[2].output.contains("Reply from 10.0.0.1"));
    assert_eq!(lab.now(), SimTime::from_millis(1500));
}

#[test]
fn run_until_advances_past_last_step() {
    let mut lab = Lab::build(parse(ROUTER_PC)).expect("build");
    lab.run(Some(SimTime::from_secs(5))).expect("run");
    assert_eq!(lab.report().now_ms, 5000);
}

#[test]
fn duplicate_device_names_are_rejected() {
    let spec = parse(
        r#"{ "devices": [ { "name": "R1", "kind": "router" }, { "name": "R1", "kind": "switch" } ] }"#,
    );
    assert!(matches!(Lab::build(spec), Err(LabError::DuplicateDevice(n)) if n == "R1"));
}

#[test]
fn unknown_devices_and_outlets_have_no_session() {
    let spec = parse(
        r#"{ "devices": [ { "name": "R1", "kind": "router" }, { "name": "WALL", "kind": "power_outlet" } ] }"#,
    );
    let mut lab = Lab::build(spec).expect("build");
    assert!(matches!(lab.exec("R9", "enable"), Err(LabError::UnknownDevice(_))));
    assert!(matches!(lab.exec("WALL", "help"), Err(LabError::NoCli(_))));
}

#[test]
fn sessions_persist_between_steps() {
    let mut lab = Lab::build(parse(ROUTER_PC)).expect("build");
    lab.exec("R1", "enable").expect("enable");
    lab.exec("R1", "configure terminal").expect("conf t");
    let prompt_after = lab.exec("R1", "hostname CORE").expect("hostname");
    assert_eq!(prompt_after, "");
    lab.exec("CORE", "end").expect("end");
    let last = lab.transcript().last().expect("entry");
    assert_eq!(last.prompt, "CORE(config)#");
}

#[test]
fn report_lists_devices_with_running_config() {
    let mut lab = Lab::build(parse(ROUTER_PC)).expect("build");
    lab.run(None).expect("run");
    let report = lab.report();
    assert_eq!(report.name.as_deref(), Some("edge"));

    let r1 = report.devices.iter().find(|d| d.name == "R1").expect("R1");
    assert_eq!(r1.kind, "router");
    assert!(r1.powered);
    let cfg = r1.running_config.as_deref().expect("router config");
    assert!(cfg.contains("ip address 10.0.0.1 255.255.255.0"));

    let pc = report.devices.iter().find(|d| d.name == "PC1").expect("PC1");
    assert_eq!(pc.kind, "pc");
    assert!(pc.running_config.is_none());

    let json = serde_json::to_value(&report).expect("serialize");
    assert_eq!(json["transcript"].as_array().map(|a| a.len()), Some(3));
}

#[test]
fn power_step_turns_device_off() {
    let mut lab = Lab::build(parse(ROUTER_PC)).expect("build");
    lab.step(&StepSpec::Power { device: "R1".into(), on: false }).expect("power");
    let out = lab.exec("R1", "enable").expect("exec");
    assert_eq!(out, "% System is powered off. Flip the power switch to use the console.");
    let r1 = lab.report().devices.into_iter().find(|d| d.name == "R1").expect("R1");
    assert!(!r1.powered);
}

#[test]
fn disconnect_step_breaks_reachability() {
    let mut lab = Lab::build(parse(ROUTER_PC)).expect("build");
    lab.step(&StepSpec::Disconnect { device: "PC1".into(), interface: "FastEthernet0".into() })
        .expect("disconnect");
    let out = lab.exec("PC1", "ping 10.0.0.1").expect("ping");
    assert!(!out.contains("Reply from"));
    lab.connect("R1", "Gi0/0", "PC1", "FastEthernet0").expect("reconnect");
    lab.advance(SimTime::from_secs(1));
    let out = lab.exec("PC1", "ping 10.0.0.1").expect("ping");
    assert!(out.contains("Reply from 10.0.0.1"));
}

use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn unique_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_nanos();
    let dir = std::env::temp_dir().join(format!(
        "iossim-rs-{prefix}-{}-{nanos}",
        std::process::id()
    ));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn write_file(dir: &PathBuf, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).expect("write temp file");
    path
}

const SWITCHED_LAB: &str = r#"
{
    "name": "two-pcs",
    "devices": [
        { "name": "SW1", "kind": "switch" },
        { "name": "PC1", "kind": "pc", "config": ["set ip 192.168.1.10 255.255.255.0"] },
        { "name": "PC2", "kind": "pc", "config": ["set ip 192.168.1.20 255.255.255.0"] }
    ],
    "links": [
        { "a": "PC1", "a_if": "FastEthernet0", "b": "SW1", "b_if": "Gi0/1" },
        { "a": "PC2", "a_if": "FastEthernet0", "b": "SW1", "b_if": "Gi0/2" }
    ],
    "steps": [
        { "kind": "cli", "device": "PC1", "commands": ["ping 192.168.1.20"] },
        { "kind": "cli", "device": "SW1", "commands": ["show mac address-table"] }
    ]
}
"#;

#[test]
fn iossim_prints_transcript_and_writes_report() {
    let dir = unique_temp_dir("lab");
    let lab = write_file(&dir, "lab.json", SWITCHED_LAB);
    let out_json = dir.join("report.json");

    let output = Command::new(env!("CARGO_BIN_EXE_iossim"))
        .args([
            "--lab",
            lab.to_str().unwrap(),
            "--json-out",
            out_json.to_str().unwrap(),
            "--until-ms",
            "2000",
        ])
        .output()
        .expect("run iossim");
    assert!(
        output.status.success(),
        "iossim failed: stderr={}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("PC1> ping 192.168.1.20"), "stdout={stdout}");
    assert!(stdout.contains("Reply from 192.168.1.20"), "stdout={stdout}");
    assert!(stdout.contains("SW1>show mac address-table"), "stdout={stdout}");
    assert!(stdout.contains("done @ 2.000s"), "stdout={stdout}");

    let raw = fs::read_to_string(&out_json).expect("read report.json");
    let v: Value = serde_json::from_str(&raw).expect("parse report.json");
    assert_eq!(v.get("name").and_then(|n| n.as_str()), Some("two-pcs"));
    assert_eq!(v.get("now_ms").and_then(|n| n.as_u64()), Some(2000));
    let transcript = v["transcript"].as_array().expect("transcript array");
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0]["device"].as_str(), Some("PC1"));
    let devices = v["devices"].as_array().expect("devices array");
    assert_eq!(devices.len(), 3);
    let sw = devices
        .iter()
        .find(|d| d["name"].as_str() == Some("SW1"))
        .expect("SW1 in report");
    assert_eq!(sw["kind"].as_str(), Some("switch"));
    assert!(sw["running_config"].as_str().is_some_and(|c| c.contains("hostname SW1")));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn iossim_fails_on_unknown_device() {
    let dir = unique_temp_dir("bad-lab");
    let lab = write_file(
        &dir,
        "lab.json",
        r#"{ "devices": [ { "name": "R1", "kind": "router" } ],
             "steps": [ { "kind": "cli", "device": "R2", "commands": ["enable"] } ] }"#,
    );

    let output = Command::new(env!("CARGO_BIN_EXE_iossim"))
        .args(["--lab", lab.to_str().unwrap()])
        .output()
        .expect("run iossim");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("unknown device 'R2'"), "stderr={stderr}");

    let _ = fs::remove_dir_all(&dir);
}

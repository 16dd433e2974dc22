use crate::net::ifname::{normalize, port_channel_id, same_interface, short, split_subinterface};

#[test]
fn abbreviations_expand_to_canonical_names() {
    assert_eq!(normalize("gi0/1"), "GigabitEthernet0/1");
    assert_eq!(normalize("G0/1"), "GigabitEthernet0/1");
    assert_eq!(normalize("gig 0/1"), "GigabitEthernet0/1");
    assert_eq!(normalize("GigabitEthernet0/1"), "GigabitEthernet0/1");
    assert_eq!(normalize("fa0/2"), "FastEthernet0/2");
    assert_eq!(normalize("f0/2"), "FastEthernet0/2");
    assert_eq!(normalize("s0/0/0"), "Serial0/0/0");
    assert_eq!(normalize("se0/1/1"), "Serial0/1/1");
    assert_eq!(normalize("po1"), "Port-channel1");
    assert_eq!(normalize("port-channel 2"), "Port-channel2");
}

#[test]
fn unknown_names_are_kept_trimmed() {
    assert_eq!(normalize("  Console "), "Console");
    assert_eq!(normalize("Wlan0/1"), "Wlan0/1");
}

#[test]
fn short_names_and_comparison() {
    assert_eq!(short("GigabitEthernet0/1"), "Gi0/1");
    assert_eq!(short("fa0/3"), "Fa0/3");
    assert_eq!(short("Port-channel1"), "Po1");
    assert!(same_interface("gi0/1", "GigabitEthernet0/1"));
    assert!(!same_interface("gi0/1", "gi0/2"));
}

#[test]
fn subinterfaces_and_port_channel_ids() {
    assert_eq!(
        split_subinterface("GigabitEthernet0/0.10"),
        Some(("GigabitEthernet0/0", 10))
    );
    assert_eq!(split_subinterface("GigabitEthernet0/0"), None);
    assert_eq!(split_subinterface("GigabitEthernet0/0.0"), None);
    assert_eq!(split_subinterface("GigabitEthernet0/0.5000"), None);
    assert_eq!(port_channel_id("po3"), Some(3));
    assert_eq!(port_channel_id("gi0/1"), None);
}

//! ExtremeXOS commands.
//!
//! EXOS has no configuration mode; every setting is a single top-level
//! command naming its ports.

use crate::types::{LldpDirection, VlanConfig};

/// QoS profiles `QP1`..`QP8`, one per traffic class.
pub const QOS_PROFILES: u8 = 8;

/// Name this crate gives the VLAN it creates for `vlan`.
pub fn vlan_name(vlan: u16) -> String {
    format!("VLAN_{vlan:04}")
}

pub fn configure_vlan(config: &VlanConfig) -> Vec<String> {
    let name = vlan_name(config.vlan);
    lines![
        format!("create vlan {name}"),
        format!("configure vlan {name} tag {}", config.vlan),
        format!(
            "configure vlan {name} add ports {} {}",
            config.ports, config.vlan_type
        ),
    ]
}

pub fn show_vlans(vlans: &[u16]) -> String {
    match vlans {
        [] => "show vlan".to_string(),
        [vlan] => format!("show vlan {}", vlan_name(*vlan)),
        _ => "show vlan".to_string(),
    }
}

pub fn delete_from_vlan(vlan: &str, ports: &str) -> String {
    format!("configure vlan {vlan} delete ports {ports}")
}

/// Back to the default VLAN, autonegotiation and admin up.
pub fn restore_defaults(ports: &str) -> Vec<String> {
    lines![
        format!("configure vlan Default add ports {ports} untagged"),
        format!("configure ports {ports} auto on"),
        format!("enable ports {ports}"),
    ]
}

pub fn shutdown(port: &str, shutdown: bool) -> String {
    let action = if shutdown { "disable" } else { "enable" };
    format!("{action} ports {port}")
}

pub fn flowcontrol(port: &str, rx: bool, tx: bool) -> Vec<String> {
    let action = |enabled: bool| if enabled { "enable" } else { "disable" };
    lines![
        format!("{} flow-control rx-pause ports {port}", action(rx)),
        format!("{} flow-control tx-pause ports {port}", action(tx)),
    ]
}

pub fn lldp(port: &str, directions: &[LldpDirection]) -> String {
    match directions {
        [LldpDirection::Receive] => format!("enable lldp ports {port} receive-only"),
        [LldpDirection::Transmit] => format!("enable lldp ports {port} transmit-only"),
        _ => format!("enable lldp ports {port}"),
    }
}

/// PFC for one priority: link-level pause off, pause frames for the
/// priority, honour received pause on its QoS profile.
pub fn enable_pfc(port: &str, priority: u8, profile: u8) -> Vec<String> {
    lines![
        format!("disable flow-control tx-pause ports {port}"),
        format!("enable flow-control tx-pause priority {priority} port {port}"),
        format!("enable flow-control rx-pause qosprofile QP{profile} port {port}"),
    ]
}

pub fn disable_pfc(port: &str, priority: u8, profile: u8) -> Vec<String> {
    lines![
        format!("disable flow-control rx-pause qosprofile QP{profile} port {port}"),
        format!("disable flow-control tx-pause priority {priority} port {port}"),
    ]
}

/// PFC off for every priority and profile.
pub fn delete_pfc(port: &str) -> Vec<String> {
    (0..QOS_PROFILES)
        .flat_map(|priority| disable_pfc(port, priority, priority + 1))
        .collect()
}

pub fn profile_bandwidth(port: &str, profile: u8, min_bw: u8) -> String {
    format!("configure qosprofile QP{profile} minbw {min_bw} maxbw 100 ports {port}")
}

pub fn reset_bandwidth(port: &str) -> Vec<String> {
    (1..=QOS_PROFILES)
        .map(|profile| profile_bandwidth(port, profile, 0))
        .collect()
}

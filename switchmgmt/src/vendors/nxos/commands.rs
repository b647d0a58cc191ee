//! NX-OS QoS, PFC and DCBX command sequences.

use crate::switch::{join, priorities_by_tc};
use crate::types::{DcbxVersion, PfcMode};
use crate::vendors::cisco::commands::on_interface;

/// Traffic classes a QoS policy may reference.
pub const QOS_PRIORITY: std::ops::Range<u8> = 0..8;

fn queuing_class(tc: u8) -> String {
    if tc == 0 {
        "class type queuing c-in-q-default".to_string()
    } else {
        format!("class type queuing c-in-q{tc}")
    }
}

/// Queuing policy `IN_<suffix>` with one bandwidth share per used class.
pub fn queuing_policy(bandwidth: &[u8], up2tc: &[u8], suffix: &str) -> Vec<String> {
    let mut commands = lines!["configure terminal", format!("policy-map type queuing IN_{suffix}")];
    for tc in priorities_by_tc(up2tc).keys() {
        let share = bandwidth.get(usize::from(*tc)).copied().unwrap_or(0);
        commands.push(queuing_class(*tc));
        commands.push(format!("bandwidth percent {share}"));
    }
    commands
}

/// Class maps `TC<n>_<suffix>` matching the priorities of each class.
pub fn class_maps(up2tc: &[u8], suffix: &str) -> Vec<String> {
    let mut commands = lines!["configure terminal"];
    for (tc, priorities) in priorities_by_tc(up2tc) {
        commands.push(format!("class-map type qos match-all TC{tc}_{suffix}"));
        commands.push(format!("match cos {}", join(&priorities, ",")));
    }
    commands
}

/// QoS policy `QOS_<suffix>` putting each class in its own qos-group.
pub fn qos_policy(up2tc: &[u8], suffix: &str) -> Vec<String> {
    let mut commands = lines!["configure terminal", format!("policy-map type qos QOS_{suffix}")];
    for tc in priorities_by_tc(up2tc).keys() {
        commands.push(format!("class TC{tc}_{suffix}"));
        commands.push(format!("set qos-group {tc}"));
    }
    commands
}

pub fn delete_qos_policy(suffix: &str) -> Vec<String> {
    let mut commands = lines![
        "configure terminal",
        format!("no policy-map type qos QOS_{suffix}"),
        format!("no policy-map type queuing IN_{suffix}"),
    ];
    commands.extend(QOS_PRIORITY.map(|tc| format!("no class-map type qos match-all TC{tc}_{suffix}")));
    commands
}

pub fn attach_policies(port: &str, suffix: &str) -> Vec<String> {
    on_interface(
        port,
        lines![
            format!("service-policy type qos input QOS_{suffix}"),
            format!("service-policy type queuing input IN_{suffix}"),
        ],
    )
}

pub fn detach_policies(port: &str, suffix: &str) -> Vec<String> {
    on_interface(
        port,
        lines![
            format!("no service-policy type qos input QOS_{suffix}"),
            format!("no service-policy type queuing input IN_{suffix}"),
        ],
    )
}

pub fn pfc_mode(port: &str, pfc: PfcMode) -> Vec<String> {
    on_interface(port, lines![format!("priority-flow-control mode {pfc}")])
}

pub fn no_pfc_mode(port: &str) -> Vec<String> {
    on_interface(port, lines!["no priority-flow-control mode"])
}

pub fn dcbx_version(port: &str, version: DcbxVersion) -> Vec<String> {
    on_interface(port, lines![format!("lldp dcbx version {version}")])
}

pub fn clear_dcbx(port: &str) -> Vec<String> {
    on_interface(
        port,
        lines!["no lldp dcbx version cee", "no lldp dcbx version ieee"],
    )
}

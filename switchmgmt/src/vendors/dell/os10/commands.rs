//! OS10 port naming and command builders.

use crate::switch::{join, priorities_by_tc};
use crate::types::{
    BreakOutMode, DcbxVersion, LldpDirection, PfcMode, QosClassType, QueueType, SwitchportMode,
    VlanConfig, VlanType,
};

/// Traffic classes cleaned up by [`delete_qos_policy`], highest first.
const QUEUES: std::ops::RangeInclusive<u8> = 0..=7;

/// Lowercase the port and spell `eth` out as `ethernet`.
pub fn convert_port_name(port: &str) -> String {
    let port = port.trim().to_ascii_lowercase();
    match port.strip_prefix("eth") {
        Some(rest) if !port.starts_with("ethernet") => format!("ethernet{rest}"),
        _ => port,
    }
}

/// `range ` when `port` names a range or list of ports.
pub fn port_range(port: &str) -> &'static str {
    if port.contains('-') || port.contains(',') {
        "range "
    } else {
        ""
    }
}

/// `interface [range ]<port>` with the port name converted.
pub fn interface(port: &str) -> String {
    format!("interface {}{}", port_range(port), convert_port_name(port))
}

fn on_interface<I>(port: &str, lines: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut commands = vec![interface(port)];
    commands.extend(lines);
    commands
}

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

/// Port membership lines of a VLAN assignment; access ports and untagged
/// trunks get the VLAN as access VLAN.
pub fn vlan_membership(config: &VlanConfig) -> Vec<String> {
    let vlan = config.vlan;
    match (config.mode, config.vlan_type) {
        (SwitchportMode::Trunk, VlanType::Tagged) => on_interface(
            &config.ports,
            lines![
                "no shutdown",
                "switchport mode trunk",
                format!("switchport trunk allowed vlan {vlan}"),
            ],
        ),
        _ => on_interface(
            &config.ports,
            lines!["no shutdown", format!("switchport access vlan {vlan}")],
        ),
    }
}

pub fn flowcontrol(port: &str, rx: bool, tx: bool) -> Vec<String> {
    on_interface(
        port,
        lines![
            format!("flowcontrol receive {}", on_off(rx)),
            format!("flowcontrol transmit {}", on_off(tx)),
        ],
    )
}

pub fn shutdown(shutdown: bool, port: &str) -> Vec<String> {
    let action = if shutdown { "shutdown" } else { "no shutdown" };
    on_interface(port, lines![action])
}

pub fn configure_lldp(port: &str, directions: &[LldpDirection]) -> Vec<String> {
    let directions = if directions.is_empty() {
        &[LldpDirection::Receive, LldpDirection::Transmit][..]
    } else {
        directions
    };
    on_interface(port, directions.iter().map(|d| format!("lldp {d}")))
}

pub fn dcbx_version(port: &str, version: DcbxVersion) -> Vec<String> {
    on_interface(port, lines![format!("dcbx version {version}")])
}

pub fn clear_dcbx(port: &str) -> Vec<String> {
    on_interface(port, lines!["no dcbx version", "no ets"])
}

pub fn ets_mode_on(port: &str) -> Vec<String> {
    on_interface(port, lines!["ets mode on"])
}

/// PFC replaces link-level pause on the port.
pub fn pfc_mode(port: &str, pfc: PfcMode) -> Vec<String> {
    on_interface(
        port,
        lines![
            "flowcontrol receive off",
            "flowcontrol transmit off",
            format!("priority-flow-control mode {pfc}"),
        ],
    )
}

pub fn no_pfc(port: &str) -> Vec<String> {
    on_interface(port, lines!["no priority-flow-control"])
}

pub fn attach_policies(port: &str, suffix: &str) -> Vec<String> {
    on_interface(
        port,
        lines![
            format!("trust-map dot1p TM_{suffix}"),
            format!("qos-map traffic-class QM_{suffix}"),
            format!("service-policy output type queuing PM_{suffix}"),
            format!("service-policy input type network-qos PMQ_{suffix}"),
        ],
    )
}

pub fn detach_policies(port: &str, suffix: &str) -> Vec<String> {
    on_interface(
        port,
        lines![
            format!("no service-policy input type network-qos PMQ_{suffix}"),
            format!("no service-policy output type queuing PM_{suffix}"),
            "no qos-map traffic-class",
            "no trust-map dot1p",
        ],
    )
}

/// Dot1p trust map putting each priority in the qos-group of its class.
pub fn trust_map(up2tc: &[u8], suffix: &str) -> Vec<String> {
    let mut commands = lines![format!("trust dot1p-map TM_{suffix}")];
    for (tc, priorities) in priorities_by_tc(up2tc) {
        commands.push(format!("qos-group {tc} dot1p {}", join(&priorities, ",")));
    }
    commands.push("exit".to_string());
    commands
}

/// One queue per distinct class in `queues`, each fed by its qos-group.
pub fn qos_map(queues: &[u8], name: &str, queue_type: QueueType) -> Vec<String> {
    let mut commands = lines![format!("qos-map traffic-class {name}")];
    for tc in priorities_by_tc(queues).keys() {
        commands.push(format!("queue {tc} qos-group {tc} type {queue_type}"));
    }
    commands
}

pub fn class_map(name: &str, matches: &str, class_type: QosClassType) -> Vec<String> {
    let criterion = match class_type {
        QosClassType::Queuing => "queue",
        QosClassType::NetworkQos => "qos-group",
    };
    lines![
        format!("class-map type {class_type} {name}"),
        format!("match {criterion} {matches}"),
    ]
}

pub fn queuing_policy_map(name: &str, class_bandwidth: &[(&str, u8)]) -> Vec<String> {
    let mut commands = lines![format!("policy-map type queuing {name}")];
    for (class, bandwidth) in class_bandwidth {
        commands.push(format!("class {class}"));
        commands.push(format!("bandwidth percent {bandwidth}"));
        commands.push("exit".to_string());
    }
    commands
}

/// Lossless classes: pause plus PFC on the paired CoS values.
pub fn network_qos_policy_map(name: &str, classes: &[&str], cos: &[&str]) -> Vec<String> {
    let mut commands = lines![format!("policy-map type network-qos {name}")];
    for (class, cos) in classes.iter().zip(cos) {
        commands.push(format!("class {class}"));
        commands.push("pause".to_string());
        commands.push(format!("pfc-cos {cos}"));
        commands.push("exit".to_string());
    }
    commands
}

pub fn delete_qos_policy(suffix: &str) -> Vec<String> {
    let mut commands = lines![format!("no policy-map type queuing PM_{suffix}")];
    commands.extend(
        QUEUES
            .rev()
            .map(|tc| format!("no class-map type queuing Q{tc}_{suffix}")),
    );
    commands.extend(lines![
        format!("no qos-map traffic-class QM_{suffix}"),
        format!("no trust dot1p-map TM_{suffix}"),
        format!("no policy-map type network-qos PMQ_{suffix}"),
        format!("no class-map type network-qos CMQ_{suffix}"),
    ]);
    commands
}

pub fn iscsi_policy_map(name: &str) -> Vec<String> {
    lines![
        format!("policy-map type application {name}"),
        "class class-iscsi",
        "set qos-group 4",
        "set cos 4",
        "exit",
    ]
}

/// The three interface blocks of a PFC-enabled iSCSI port.
pub fn qos_pfc_interface(
    port: &str,
    qos_policy: &str,
    traffic_policy: &str,
    trust_policy: &str,
    service_policy: &str,
) -> [Vec<String>; 3] {
    [
        on_interface(
            port,
            lines![
                format!("service-policy output type queuing {qos_policy}"),
                format!("qos-map traffic-class {traffic_policy}"),
                format!("trust-map dot1p {trust_policy}"),
                "flowcontrol transmit off",
                "flowcontrol receive off",
                format!("service-policy input type network-qos {service_policy}"),
            ],
        ),
        ets_mode_on(port),
        on_interface(
            port,
            lines!["priority-flow-control mode on", "lldp tlv-select dcbxp-appln iscsi"],
        ),
    ]
}

pub fn port_group_mode(port_group: &str, port: Option<&str>, mode: BreakOutMode) -> Vec<String> {
    let mode_line = match port {
        Some(port) => format!("port {port} mode {mode}"),
        None => format!("mode {mode}"),
    };
    lines![format!("port-group {port_group}"), mode_line]
}

pub fn start_mirroring(session: u32, source: &str, destination: &str) -> [Vec<String>; 3] {
    [
        lines!["interface range vlan 2-4049"],
        lines![format!("interface {destination}"), "no mtu", "no switchport"],
        lines![
            format!("monitor session {session}"),
            format!("source interface {source} direction rx"),
            format!("destination interface {destination}"),
        ],
    ]
}

pub fn stop_mirroring(session: u32, destination: &str, mtu: u32) -> Vec<String> {
    lines![
        format!("no monitor session {session}"),
        format!("interface {destination}"),
        format!("mtu {mtu}"),
        "switchport mode access",
    ]
}

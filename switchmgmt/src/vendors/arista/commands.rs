//! EOS command sequences.

use crate::types::{
    ChannelGroupMode, DcbxVersion, FecMode, LldpDirection, PfcMode, SwitchportMode, VlanConfig,
    VlanType,
};

/// Priorities made lossless by the userspace PFC profile, in EOS order.
pub const NO_DROP_PRIORITIES: [u8; 7] = [3, 0, 1, 2, 4, 5, 6];

/// CoS 3 goes to traffic class 1.
pub const DEFAULT_COS_TO_TC: [(u8, u8); 1] = [(3, 1)];

/// Traffic class 1 gets all the bandwidth.
pub const DEFAULT_TC_BANDWIDTH: [(u8, u8); 1] = [(1, 100)];

pub fn interface(port: &str) -> Vec<String> {
    lines!["configure terminal", format!("interface {port}")]
}

pub fn shutdown(shutdown: bool, port: &str) -> Vec<String> {
    let mut commands = interface(port);
    commands.push(if shutdown { "shutdown" } else { "no shutdown" }.to_string());
    commands
}

pub fn configure_vlan(config: &VlanConfig) -> Vec<String> {
    let vlan = config.vlan;
    let mut commands = lines![
        "configure terminal",
        format!("vlan {vlan}"),
        "exit",
        format!("interface {}", config.ports),
        "switchport",
    ];

    match (config.mode, config.vlan_type) {
        (SwitchportMode::Access, _) => commands.extend(lines![
            format!("switchport access vlan {vlan}"),
            "switchport mode access",
            "spanning-tree portfast",
        ]),
        (_, VlanType::Untagged) => commands.extend(lines![
            format!("switchport trunk native vlan {vlan}"),
            "switchport mode trunk",
            "spanning-tree portfast trunk",
        ]),
        (_, VlanType::Tagged) => {
            let allowed = if config.override_allowed {
                format!("switchport trunk allowed vlan {vlan}")
            } else {
                format!("switchport trunk allowed vlan add {vlan}")
            };
            commands.extend(lines![
                allowed,
                "switchport mode trunk",
                "spanning-tree portfast trunk",
            ]);
        }
    }

    commands.push("no shutdown".to_string());
    commands
}

/// Reset ports, then restore the speed line they had.
pub fn default_ports(ports: &str, speed: &str) -> Vec<String> {
    lines![
        "configure terminal",
        format!("default interface {ports}"),
        format!("interface {ports}"),
        "default switchport",
        "default mtu",
        speed,
    ]
}

pub fn show_vlans(vlans: &[u16]) -> String {
    if vlans.is_empty() {
        "show vlan".to_string()
    } else {
        format!("show vlan {}", crate::switch::join(vlans, ","))
    }
}

pub fn create_port_channel(number: u32) -> Vec<String> {
    lines!["configure terminal", format!("interface port-channel {number}"), "end"]
}

pub fn remove_port(port: &str) -> Vec<String> {
    lines!["configure terminal", format!("no interface {port}"), "end"]
}

pub fn add_to_channel_group(port: &str, number: u32, mode: ChannelGroupMode) -> Vec<String> {
    lines![
        "configure terminal",
        format!("interface {port}"),
        format!("channel-group {number} mode {mode}"),
        "end",
    ]
}

pub fn set_switchport_mode(port: &str, mode: SwitchportMode) -> Vec<String> {
    lines![format!("interface {port}"), format!("switchport mode {mode}")]
}

pub fn fec_encoding(mode: FecMode) -> &'static str {
    match mode {
        FecMode::RsFec => "error-correction encoding reed-solomon",
        FecMode::FcFec => "error-correction encoding fire-code",
        FecMode::NoFec => "no error-correction encoding",
        FecMode::Auto => "default error-correction encoding",
    }
}

pub fn show_fec(port: &str) -> Vec<String> {
    lines![format!("show interfaces {port} error-correction")]
}

/// LLDP in the given directions; both when none are given.
pub fn configure_lldp(port: &str, directions: &[LldpDirection]) -> Vec<String> {
    let directions = if directions.is_empty() {
        &[LldpDirection::Transmit, LldpDirection::Receive][..]
    } else {
        directions
    };
    let mut lines = lines![format!("interface {port}")];
    lines.extend(directions.iter().map(|d| format!("lldp {d}")));
    lines
}

pub fn configure_trunking(port: &str) -> Vec<String> {
    lines![
        format!("interface {port}"),
        "switchport mode trunk",
        "switchport trunk allowed vlan all",
    ]
}

pub fn dcbx_mode(port: &str, version: Option<DcbxVersion>) -> Vec<String> {
    match version {
        Some(version) => lines![format!("interface {port}"), format!("dcbx mode {version}")],
        None => lines![format!("interface {port}"), "no dcbx mode"],
    }
}

pub fn flowcontrol(port: &str, rx: bool, tx: bool) -> Vec<String> {
    let state = |on: bool| if on { "on" } else { "off" };
    lines![
        format!("interface {port}"),
        format!("flowcontrol send {}", state(tx)),
        format!("flowcontrol receive {}", state(rx)),
    ]
}

pub fn priority_flow_control(port: &str) -> Vec<String> {
    let mut lines = lines![
        format!("interface {port}"),
        "priority-flow-control mode on",
        "priority-flow-control on",
    ];
    lines.extend(
        NO_DROP_PRIORITIES
            .iter()
            .map(|p| format!("priority-flow-control priority {p} no-drop")),
    );
    lines
}

pub fn pfc_priority(port: &str, priority: u8, pfc: PfcMode) -> Vec<String> {
    let action = match pfc {
        PfcMode::On => "no-drop",
        _ => "drop",
    };
    lines![
        format!("interface {port}"),
        format!("priority-flow-control priority {priority} {action}"),
    ]
}

pub fn delete_pfc(port: &str) -> Vec<String> {
    lines![format!("interface {port}"), "no priority-flow-control mode"]
}

fn negate(line: String, disable: bool) -> String {
    if disable { format!("no {line}") } else { line }
}

pub fn dcbx_qos_map(cos_to_tc: &[(u8, u8)], disable: bool) -> Vec<String> {
    cos_to_tc
        .iter()
        .map(|(cos, tc)| negate(format!("dcbx ets qos map cos {cos} traffic-class {tc}"), disable))
        .collect()
}

pub fn dcbx_ets_traffic_class(class_bandwidth: &[(u8, u8)], disable: bool) -> Vec<String> {
    class_bandwidth
        .iter()
        .map(|(tc, bw)| negate(format!("dcbx ets traffic-class {tc} bandwidth {bw}"), disable))
        .collect()
}

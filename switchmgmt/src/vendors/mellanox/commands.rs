//! Onyx / MLNX-OS command sequences.
//!
//! Onyx accepts interface settings as single global-mode lines
//! (`interface ethernet 1/1 <setting>`), so most sequences are
//! `configure terminal`, a few such lines, then `exit`.

use crate::switch::join;
use crate::types::{EtsMode, FecMode, LldpDirection, State, SwitchportMode, VlanConfig, VlanType};

/// Share every unlisted traffic class gets of what the listed ones leave.
fn remaining_share(listed: &[(u8, u8)], classes: u8) -> u32 {
    let used: u32 = listed.iter().map(|(_, bw)| u32::from(*bw)).sum();
    let unlisted = (0..classes)
        .filter(|tc| !listed.iter().any(|(listed, _)| listed == tc))
        .count() as u32;
    if unlisted == 0 {
        0
    } else {
        100u32.saturating_sub(used) / unlisted
    }
}

fn global<I>(lines: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut commands = lines!["configure terminal"];
    commands.extend(lines);
    commands.push("exit".to_string());
    commands
}

fn on_port(number: &str, setting: impl std::fmt::Display) -> String {
    format!("interface ethernet {number} {setting}")
}

/// ETS weights for the listed classes; the unlisted ones split the rest.
pub fn dcb_qos(port: &str, tc_bandwidth: &[(u8, u8)], classes: u8) -> Vec<String> {
    let share = remaining_share(tc_bandwidth, classes);
    let mut commands = lines!["configure terminal", format!("interface {port}")];
    for tc in 0..classes {
        let bandwidth = tc_bandwidth
            .iter()
            .find(|(listed, _)| *listed == tc)
            .map_or(share, |(_, bw)| u32::from(*bw));
        commands.push(format!("traffic-class {tc} dcb ets wrr {bandwidth}"));
    }
    commands.extend(lines!["exit", "exit"]);
    commands
}

pub fn priority_flow_control(priority: u8, state: State) -> Vec<String> {
    global(lines![format!("dcb priority-flow-control priority {priority} {state}")])
}

pub fn enable_pfc() -> Vec<String> {
    global(lines!["dcb priority-flow-control enable force"])
}

/// Hybrid switchport on all VLANs with link-level pause off.
pub fn prepare_for_pfc(number: &str) -> Vec<String> {
    global(lines![
        on_port(number, "switchport mode hybrid"),
        on_port(number, "switchport hybrid allowed-vlan all"),
        on_port(number, "flowcontrol send off force"),
        on_port(number, "flowcontrol receive off force"),
    ])
}

pub fn ets(number: &str, traffic_class: u8, mode: EtsMode, bandwidth: Option<u8>) -> Vec<String> {
    let setting = match (mode, bandwidth) {
        (EtsMode::Wrr, Some(bandwidth)) => format!("traffic-class {traffic_class} dcb ets wrr {bandwidth}"),
        _ => format!("traffic-class {traffic_class} dcb ets strict"),
    };
    global(lines![on_port(number, setting)])
}

pub fn bind_switch_priority(number: &str, traffic_class: u8, priorities: &[u8]) -> Vec<String> {
    global(lines![on_port(
        number,
        format!(
            "traffic-class {traffic_class} bind switch-priority {}",
            join(priorities, " ")
        ),
    )])
}

pub fn lldp(number: &str, direction: LldpDirection) -> Vec<String> {
    global(lines![on_port(number, format!("lldp {direction}"))])
}

/// Remove PFC with the port held down.
pub fn disable_pfc(number: &str) -> Vec<String> {
    lines![
        on_port(number, "shutdown"),
        on_port(number, "no dcb-priority-flow-control mode"),
        on_port(number, "no shutdown"),
    ]
}

pub fn shutdown(number: &str, shutdown: bool) -> Vec<String> {
    let action = if shutdown { "shutdown" } else { "no shutdown" };
    global(lines![on_port(number, action)])
}

pub fn flowcontrol(number: &str, rx: bool, tx: bool) -> Vec<String> {
    let state = |enabled: bool| if enabled { "on" } else { "off" };
    global(lines![
        on_port(number, format!("flowcontrol receive {} force", state(rx))),
        on_port(number, format!("flowcontrol send {} force", state(tx))),
    ])
}

/// VLAN creation then membership; untagged membership in trunk mode is the
/// access VLAN.
pub fn configure_vlan(config: &VlanConfig) -> Vec<String> {
    let vlan = config.vlan;
    let port = format!("interface {}", config.ports);
    let membership = match (config.mode, config.vlan_type) {
        (SwitchportMode::Trunk, VlanType::Tagged) if config.override_allowed => {
            format!("{port} switchport trunk allowed-vlan {vlan}")
        }
        (SwitchportMode::Trunk, VlanType::Tagged) => {
            format!("{port} switchport trunk allowed-vlan add {vlan}")
        }
        _ => format!("{port} switchport access vlan {vlan}"),
    };
    let mode = match config.mode {
        SwitchportMode::Access => "access",
        _ => "trunk",
    };
    lines![
        "configure terminal",
        format!("vlan {vlan}"),
        "exit",
        format!("{port} switchport mode {mode}"),
        membership,
        "exit",
    ]
}

pub fn fec_override(mode: FecMode) -> Vec<String> {
    lines!["shutdown", format!("fec-override {mode}"), "no shutdown"]
}

//! OS9 configuration-mode line builders.

use crate::types::{SwitchportMode, VlanConfig, VlanType};

fn on_off(enabled: bool) -> &'static str {
    if enabled { "on" } else { "off" }
}

pub fn shutdown(shutdown: bool, port: &str) -> Vec<String> {
    let action = if shutdown { "shutdown" } else { "no shutdown" };
    lines![format!("interface {port}"), action]
}

/// Membership lines under the VLAN interface; access ports and untagged
/// trunks join untagged.
pub fn configure_vlan(config: &VlanConfig) -> Vec<String> {
    let membership = match (config.mode, config.vlan_type) {
        (SwitchportMode::Access, _) | (_, VlanType::Untagged) => "untagged",
        _ => "tagged",
    };
    lines![
        format!("interface vlan {}", config.vlan),
        format!("{membership} {}", config.ports),
    ]
}

pub fn show_vlans(vlans: &[u16]) -> String {
    if vlans.is_empty() {
        "show vlan".to_string()
    } else {
        format!("show vlan id {}", crate::switch::join(vlans, ","))
    }
}

pub fn flowcontrol(port: &str, rx: bool, tx: bool) -> Vec<String> {
    lines![
        format!("interface {port}"),
        format!("flowcontrol rx {} tx {}", on_off(rx), on_off(tx)),
    ]
}

/// Jumbo frames, hybrid switchport and LLDP management TLVs.
pub fn qos_port_profile(port: &str, mtu: u32) -> Vec<String> {
    lines![
        format!("interface {port}"),
        format!("mtu {mtu}"),
        "portmode hybrid",
        "switchport",
        "protocol lldp",
        "advertise management-tlv management-address system-capabilities system-description system-name",
    ]
}

pub fn remove_qos_port_profile(port: &str) -> Vec<String> {
    lines![format!("interface {port}"), "no protocol lldp"]
}

pub fn tagged_vlan(vlan: u16, port: &str) -> Vec<String> {
    lines![format!("interface vlan {vlan}"), format!("tagged {port}")]
}

pub fn disable_iscsi_tlv(port: &str) -> Vec<String> {
    lines![
        format!("interface {port}"),
        "protocol lldp",
        "no advertise DCBx-appln-tlv iscsi",
    ]
}

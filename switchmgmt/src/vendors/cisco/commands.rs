//! Command sequences shared by IOS and NX-OS.

use crate::switch::join;
use crate::types::{
    ChannelGroupMode, LacpRate, LldpDirection, SwitchportMode, VlanConfig, VlanType,
};

/// `configure terminal`, `interface <port>`, then `lines`.
pub fn on_interface<I>(port: &str, lines: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let mut commands = lines!["configure terminal", format!("interface {port}")];
    commands.extend(lines);
    commands
}

pub fn shutdown(shutdown: bool, port: &str) -> Vec<String> {
    let action = if shutdown { "shutdown" } else { "no shutdown" };
    on_interface(port, lines![action])
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
            "switchport mode access",
            format!("switchport access vlan {vlan}"),
        ]),
        (_, VlanType::Untagged) => commands.extend(lines![
            "switchport mode trunk",
            format!("switchport trunk native vlan {vlan}"),
        ]),
        (_, VlanType::Tagged) => {
            commands.push("switchport mode trunk".to_string());
            commands.push(if config.override_allowed {
                format!("switchport trunk allowed vlan {vlan}")
            } else {
                format!("switchport trunk allowed vlan add {vlan}")
            });
        }
    }

    commands.push("no shutdown".to_string());
    commands
}

pub fn default_ports(ports: &str) -> Vec<String> {
    lines!["configure terminal", format!("default interface {ports}")]
}

pub fn show_vlans(vlans: &[u16]) -> String {
    if vlans.is_empty() {
        "show vlan brief".to_string()
    } else {
        format!("show vlan id {}", join(vlans, ","))
    }
}

pub fn create_port_channel(number: u32) -> Vec<String> {
    lines!["configure terminal", format!("interface port-channel {number}")]
}

pub fn remove_port(port: &str) -> Vec<String> {
    lines!["configure terminal", format!("no interface {port}")]
}

pub fn show_port_channel_summary(number: Option<u32>) -> String {
    match number {
        Some(number) => format!("show port-channel summary interface port-channel {number}"),
        None => "show port-channel summary".to_string(),
    }
}

pub fn set_switchport_mode(port: &str, mode: SwitchportMode) -> Vec<String> {
    on_interface(port, lines![format!("switchport mode {mode}")])
}

pub fn channel_group(
    port: &str,
    number: u32,
    mode: Option<ChannelGroupMode>,
    force: bool,
) -> Vec<String> {
    let mut line = format!("channel-group {number}");
    if force {
        line.push_str(" force");
    }
    if let Some(mode) = mode {
        line.push_str(&format!(" mode {mode}"));
    }
    on_interface(port, [line])
}

pub fn remove_channel_group(port: &str) -> Vec<String> {
    on_interface(port, lines!["no channel-group"])
}

pub fn lacp_rate(port: &str, rate: LacpRate) -> Vec<String> {
    on_interface(port, lines![format!("lacp rate {rate}")])
}

pub fn no_lacp_rate(port: &str, rate: Option<LacpRate>) -> Vec<String> {
    let line = match rate {
        Some(rate) => format!("no lacp rate {rate}"),
        None => "no lacp rate".to_string(),
    };
    on_interface(port, [line])
}

pub fn flowcontrol(port: &str, rx: bool, tx: bool) -> Vec<String> {
    let state = |on: bool| if on { "on" } else { "off" };
    on_interface(
        port,
        lines![
            format!("flowcontrol receive {}", state(rx)),
            format!("flowcontrol send {}", state(tx)),
        ],
    )
}

/// Configuration-mode lines enabling LLDP in each direction; both when
/// none are given.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_group_variants() {
        assert_eq!(
            channel_group("Eth1/1/1", 1000, None, false)[2],
            "channel-group 1000"
        );
        assert_eq!(
            channel_group("Eth1/1/1", 1000, None, true)[2],
            "channel-group 1000 force"
        );
        assert_eq!(
            channel_group("Eth1/1/1", 1000, Some(ChannelGroupMode::On), false)[2],
            "channel-group 1000 mode on"
        );
    }

    #[test]
    fn test_configure_vlan_access() {
        let config = VlanConfig::new("Te1/0/1", 10, VlanType::Untagged, SwitchportMode::Access);
        assert_eq!(
            configure_vlan(&config),
            vec![
                "configure terminal",
                "vlan 10",
                "exit",
                "interface Te1/0/1",
                "switchport",
                "switchport mode access",
                "switchport access vlan 10",
                "no shutdown",
            ]
        );
    }

    #[test]
    fn test_port_channel_summary() {
        assert_eq!(show_port_channel_summary(None), "show port-channel summary");
        assert_eq!(
            show_port_channel_summary(Some(1024)),
            "show port-channel summary interface port-channel 1024"
        );
    }

    #[test]
    fn test_configure_lldp_single_direction() {
        assert_eq!(
            configure_lldp("Eth1/1", &[LldpDirection::Receive]),
            vec!["interface Eth1/1", "lldp receive"]
        );
    }
}

//! OS10 console output parsers.

use indexmap::IndexMap;
use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::parse;
use crate::types::LldpNeighbor;

static LINK_STATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)is (\S+), line protocol").expect("link state pattern is valid")
});
static LINE_SPEED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"LineSpeed (\w+)").expect("line speed pattern is valid"));
static VLAN_INTERFACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*interface (vlan\d+)\s*$").expect("vlan pattern is valid"));
/// Neighbour rows whose chassis id is a MAC address.
static LLDP_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(\S+)\s+(.+?)\s+(\S+)\s+((?:[0-9a-f]{2}:){5}[0-9a-f]{2})\s*$")
        .expect("lldp row pattern is valid")
});
static PORT_GROUP_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*port-group(\S+)\s+\S+\s+(\d+(?:/\d+)+)\s").expect("port-group pattern is valid")
});
static PORT_GROUP_MEMBER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s+(\d+(?:/\d+)+)\s").expect("member pattern is valid"));
static MONITOR_SESSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"monitor session (\d+)").expect("monitor pattern is valid"));

/// Admin state from `<port> is up, line protocol is ...`; `Some(None)` for
/// states other than up and down.
pub fn link_state(output: &str) -> Option<Option<bool>> {
    let caps = LINK_STATE.captures(output)?;
    let state = caps[1].to_ascii_lowercase();
    Some(match state.as_str() {
        "up" => Some(true),
        "down" => Some(false),
        other => {
            warn!("unrecognised interface state {other}");
            None
        }
    })
}

/// Speed from `LineSpeed 10G`.
pub fn line_speed(output: &str) -> Option<u32> {
    let caps = LINE_SPEED.captures(output)?;
    parse::speed_token(&caps[1])
}

/// `vlanN` for every `interface vlanN` line.
pub fn vlan_ids(output: &str) -> Vec<String> {
    VLAN_INTERFACE
        .captures_iter(output)
        .map(|caps| caps[1].to_string())
        .collect()
}

pub fn lldp_neighbors(output: &str) -> Vec<LldpNeighbor> {
    output
        .lines()
        .filter_map(|line| LLDP_ROW.captures(line.trim()))
        .map(|caps| LldpNeighbor {
            loc_portid: caps[1].to_string(),
            rem_sysname: Some(caps[2].to_string()),
            rem_portid: Some(caps[3].to_string()),
            rem_devid: Some(caps[4].to_string()),
        })
        .collect()
}

/// Member ports of each port group from `show port-group`, keyed by the
/// group id without its `port-group` prefix.
pub fn port_groups(output: &str) -> IndexMap<String, Vec<String>> {
    let mut groups: IndexMap<String, Vec<String>> = IndexMap::new();
    let mut current: Option<String> = None;
    for line in output.lines() {
        if let Some(caps) = PORT_GROUP_ROW.captures(line) {
            let group = caps[1].to_string();
            groups.entry(group.clone()).or_default().push(caps[2].to_string());
            current = Some(group);
        } else if let (Some(caps), Some(group)) = (PORT_GROUP_MEMBER.captures(line), &current) {
            groups.entry(group.clone()).or_default().push(caps[1].to_string());
        }
    }
    groups
}

/// Whether the `monitor session` lines of the running config define
/// `session`.
pub fn has_monitor_session(output: &str, session: u32) -> bool {
    MONITOR_SESSION
        .captures_iter(output)
        .any(|caps| caps[1].parse::<u32>().is_ok_and(|id| id == session))
}

//! Parsers for IOS and NX-OS console output.

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::parse;
use crate::types::LldpNeighbor;

static LINE_PROTOCOL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)line protocol is (\w+)").expect("line protocol pattern is valid")
});

const LLDP_HEADERS: [&str; 5] = ["Device ID", "Local Intf", "Hold-time", "Capability", "Port ID"];

/// `(vlan, port)` from a `Vlan Mac Address Type Ports` table.
pub fn mac_entry(output: &str, mac: &str) -> Option<(u16, String)> {
    output.lines().find_map(|line| {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        match tokens.as_slice() {
            [vlan, address, _kind, port, ..] if address.eq_ignore_ascii_case(mac) => {
                Some((vlan.parse().ok()?, port.to_string()))
            }
            _ => None,
        }
    })
}

/// State after `line protocol is`; `Some(None)` for states other than
/// up and down.
pub fn line_protocol(output: &str) -> Option<Option<bool>> {
    let caps = LINE_PROTOCOL.captures(output)?;
    let state = caps[1].to_ascii_lowercase();
    Some(match state.as_str() {
        "up" => Some(true),
        "down" => Some(false),
        other => {
            warn!("unrecognised line protocol state {other}");
            None
        }
    })
}

/// Speed from the first status row carrying a duplex column.
pub fn status_speed(output: &str) -> Option<u32> {
    output.lines().find_map(parse::duplex_speed)
}

pub fn lldp_neighbors(output: &str) -> Vec<LldpNeighbor> {
    parse::fixed_width_rows(output, &LLDP_HEADERS)
        .into_iter()
        .filter(|row| {
            row[0]
                .as_deref()
                .is_none_or(|device| !device.starts_with("Total entries"))
        })
        .filter_map(|mut row| {
            Some(LldpNeighbor {
                loc_portid: row[1].take()?,
                rem_devid: None,
                rem_portid: row[4].take(),
                rem_sysname: row[0].take(),
            })
        })
        .collect()
}

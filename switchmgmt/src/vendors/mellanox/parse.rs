//! Onyx console output parsers.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parse;
use crate::types::{FecMode, LldpNeighbor};

static PORT_NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^eth(?:ernet)? ?(\d+(?:/\d+)+)$").expect("port number pattern is valid")
});
static FEC_OVERRIDE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"fec-override (\S+)").expect("fec pattern is valid"));

const LLDP_HEADERS: [&str; 4] = ["Local Interface", "Device ID", "Port ID", "System Name"];

/// `1/1` from `ethernet 1/1` or `Eth1/1`.
pub fn port_number(port: &str) -> Option<&str> {
    PORT_NUMBER
        .captures(port.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Row of `show interfaces ethernet N status` for `Eth<number>`.
fn status_row<'a>(output: &'a str, number: &str) -> Option<Vec<&'a str>> {
    let row = parse::find_row(output, &format!("Eth{number}"))?;
    Some(row.split_whitespace().skip(1).collect())
}

/// Speed column of the status table, e.g. `25G`.
pub fn status_speed(output: &str, number: &str) -> Option<u32> {
    status_row(output, number)?
        .into_iter()
        .find_map(parse::speed_token)
}

/// Operational state column; `Some(None)` for states other than up and
/// down.
pub fn status_state(output: &str, number: &str) -> Option<Option<bool>> {
    let state = status_row(output, number)?.first()?.to_ascii_lowercase();
    Some(match state.as_str() {
        "up" => Some(true),
        "down" => Some(false),
        _ => None,
    })
}

pub fn lldp_neighbors(output: &str) -> Vec<LldpNeighbor> {
    parse::fixed_width_rows(output, &LLDP_HEADERS)
        .into_iter()
        .filter_map(|mut cells| {
            let sysname = cells.pop().flatten();
            let portid = cells.pop().flatten();
            let devid = cells.pop().flatten();
            let local = cells.pop().flatten()?;
            Some(LldpNeighbor {
                loc_portid: local,
                rem_devid: devid,
                rem_portid: portid,
                rem_sysname: sysname,
            })
        })
        .collect()
}

/// FEC override of the port's running config; `Some(None)` for a mode this
/// crate does not model.
pub fn fec_override(config: &str) -> Option<Option<FecMode>> {
    let caps = FEC_OVERRIDE.captures(config)?;
    Some(caps[1].parse().ok())
}

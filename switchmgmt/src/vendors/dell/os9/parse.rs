//! OS9 console output parsers.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parse;
use crate::types::LldpNeighbor;

static LINE_SPEED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"LineSpeed (\d+) Mbit").expect("line speed pattern is valid"));
static MBIT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s*Mbit").expect("Mbit pattern is valid"));
static DCB_MAP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"dcb-map (\S+)").expect("dcb-map pattern is valid"));

const LLDP_HEADERS: [&str; 4] = ["Loc PortID", "Rem Host Name", "Rem Port Id", "Rem Chassis Id"];

/// Speed from the `LineSpeed 10000 Mbit` line of `show interfaces`.
pub fn line_speed(output: &str) -> Option<u32> {
    let caps = LINE_SPEED.captures(output)?;
    caps[1].parse().ok().filter(|mbps| *mbps > 0)
}

/// Speed column of the port's row in `show interfaces <p> status`.
pub fn status_speed(output: &str, port: &str) -> Option<u32> {
    let row = parse::find_row(output, port)?;
    let caps = MBIT.captures(row)?;
    caps[1].parse().ok().filter(|mbps| *mbps > 0)
}

/// Status column of the port's row; `Some(None)` when the row carries
/// neither `Up` nor `Down`.
pub fn status_state(output: &str, port: &str) -> Option<Option<bool>> {
    let row = parse::find_row(output, port)?;
    let state = row
        .trim_start()
        .get(port.len()..)?
        .split_whitespace()
        .find_map(|token| match token.to_ascii_lowercase().as_str() {
            "up" => Some(true),
            "down" => Some(false),
            _ => None,
        });
    Some(state)
}

/// Counter of `priority` in `show interfaces <p> pfc statistics`.
pub fn pfc_statistic(output: &str, priority: u8) -> Option<String> {
    let counter = Regex::new(&format!(r"P{priority}\s+(\d+)")).ok()?;
    Some(counter.captures(output)?[1].to_string())
}

pub fn dcb_map(output: &str) -> Option<String> {
    Some(DCB_MAP.captures(output)?[1].to_string())
}

pub fn lldp_neighbors(output: &str) -> Vec<LldpNeighbor> {
    parse::fixed_width_rows(output, &LLDP_HEADERS)
        .into_iter()
        .filter_map(|mut row| {
            Some(LldpNeighbor {
                loc_portid: row[0].take()?,
                rem_sysname: row[1].take(),
                rem_portid: row[2].take(),
                rem_devid: row[3].take(),
            })
        })
        .collect()
}

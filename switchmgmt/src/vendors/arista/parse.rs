//! EOS output parsers.

use log::warn;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::parse;
use crate::types::FecMode;

static LINK_STATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\S+\s+\S+\s+(link\w+)\b").expect("link state pattern is valid")
});

/// `Some(true)` on `linkUp`, `Some(false)` on `linkDown`, `None` for other
/// `link*` states, nothing when no state column was found.
pub fn link_state(output: &str) -> Option<Option<bool>> {
    let caps = LINK_STATE.captures(output)?;
    Some(match &caps[1] {
        "linkUp" => Some(true),
        "linkDown" => Some(false),
        other => {
            warn!("unrecognised link state {other}");
            None
        }
    })
}

pub fn port_speed(output: &str, port: &str) -> Option<u32> {
    parse::find_row(output, port).and_then(parse::duplex_speed)
}

/// `(vlan, port)` of the address-table row for `mac` (dotted form).
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

/// The `speed ...` line of an interface running config, or empty.
pub fn speed_command(config: &str) -> String {
    config
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with("speed "))
        .unwrap_or_default()
        .to_string()
}

/// The `Operational` column of `show interfaces <p> error-correction`.
///
/// `None` when no row was found; `Some(None)` when the mode is not one EOS
/// is known to print.
pub fn operational_fec(output: &str) -> Option<Option<FecMode>> {
    let mut lines = output.lines().skip_while(|l| !l.trim_start().starts_with("Interface"));
    lines.next()?;
    let row = lines
        .map(str::trim)
        .find(|l| !l.is_empty() && !l.starts_with('-'))?;
    let operational = row.split_whitespace().last()?;
    Some(match operational {
        "Reed-Solomon" => Some(FecMode::RsFec),
        "Fire-Code" => Some(FecMode::FcFec),
        "Disabled" => Some(FecMode::NoFec),
        other => {
            warn!("unrecognised FEC mode {other}");
            None
        }
    })
}

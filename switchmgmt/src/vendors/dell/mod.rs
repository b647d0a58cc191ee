//! Dell Networking OS9 (FTOS) and OS10.

mod os10;
mod os9;

pub use os10::DellOs10;
pub use os9::{DellOs9, DellOs9Model};

use regex::Regex;

/// `(vlan, interface)` of the address-table row for `mac`.
///
/// Both OS generations print `VlanId  Mac Address  Type  Interface [State]`;
/// OS9 interfaces carry a space (`Te 0/32`), OS10 ones do not.
pub(crate) fn mac_entry(output: &str, mac: &str) -> Option<(u16, String)> {
    let row = Regex::new(&format!(
        r"(?im)^\s*(\d+)\s+{}\s+\S+\s+(\S+(?: \d\S*)?)",
        regex::escape(mac)
    ))
    .ok()?;
    let caps = row.captures(output)?;
    Some((caps[1].parse().ok()?, caps[2].to_string()))
}

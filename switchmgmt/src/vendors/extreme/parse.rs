//! ExtremeXOS output parsers.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::parse;
use crate::types::LldpNeighbor;

static VLAN_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^(\S+)\s+(\d+)\s+\S").expect("vlan row pattern is valid"));
static LLDP_ROW: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\S+)\s+(\S+)\s+(\S+)\s+\d+\s+\d+\s*$").expect("lldp row pattern is valid")
});
static INTERNAL_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Internal Tag = (\d+)").expect("tag pattern is valid"));
static LINK_STATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*Link State:\s+(\w+)").expect("link state pattern is valid"));
static DOT1P_ROW: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*(\d)\s+QP(\d)\b").expect("dot1p pattern is valid"));

/// `(name, vid)` rows of `show vlan`.
pub fn vlans(output: &str) -> Vec<(String, u16)> {
    VLAN_ROW
        .captures_iter(output)
        .filter_map(|caps| Some((caps[1].to_string(), caps[2].parse().ok()?)))
        .collect()
}

/// Port of the FDB entry for `mac`; the port list is the last column.
pub fn fdb_port(output: &str, mac: &str) -> Option<String> {
    output.lines().find_map(|line| {
        let mut tokens = line.split_whitespace();
        let address = tokens.next()?;
        if !address.eq_ignore_ascii_case(mac) {
            return None;
        }
        tokens.last().map(str::to_string)
    })
}

pub fn lldp_neighbors(output: &str) -> Vec<LldpNeighbor> {
    output
        .lines()
        .filter_map(|line| LLDP_ROW.captures(line.trim()))
        .map(|caps| LldpNeighbor {
            loc_portid: caps[1].to_string(),
            rem_devid: Some(caps[2].to_string()),
            rem_portid: Some(caps[3].to_string()),
            rem_sysname: None,
        })
        .collect()
}

/// Local port whose neighbour chassis id is `mac`.
pub fn lldp_port(output: &str, mac: &str) -> Option<String> {
    lldp_neighbors(output).into_iter().find_map(|neighbor| {
        neighbor
            .rem_devid
            .is_some_and(|devid| devid.eq_ignore_ascii_case(mac))
            .then_some(neighbor.loc_portid)
    })
}

/// VLAN tag from the `VLAN cfg` block of `show ports <p> information detail`.
pub fn internal_tag(output: &str) -> Option<u16> {
    INTERNAL_TAG.captures(output)?[1].parse().ok()
}

/// `Active` is up, `Ready` is down; `Some(None)` for other states.
pub fn link_state(output: &str) -> Option<Option<bool>> {
    let caps = LINK_STATE.captures(output)?;
    Some(match caps[1].to_ascii_lowercase().as_str() {
        "active" => Some(true),
        "ready" => Some(false),
        _ => None,
    })
}

/// Actual speed from a `show ports no-refresh` row; it precedes the duplex.
pub fn port_speed(output: &str, port: &str) -> Option<u32> {
    let row = parse::find_row(output, port)?;
    let tokens: Vec<&str> = row.split_whitespace().collect();
    let duplex = tokens
        .iter()
        .position(|t| t.eq_ignore_ascii_case("full") || t.eq_ignore_ascii_case("half"))?;
    parse::speed_token(tokens.get(duplex.checked_sub(1)?)?)
}

/// QoS profile number that 802.1p `priority` maps to in `show dot1p`.
pub fn dot1p_profile(output: &str, priority: u8) -> Option<u8> {
    DOT1P_ROW.captures_iter(output).find_map(|caps| {
        let mapped: u8 = caps[1].parse().ok()?;
        if mapped != priority {
            return None;
        }
        caps[2].parse().ok()
    })
}

/// Minimum bandwidth of `QP<tc>` from `show qosprofile port <p>`.
pub fn min_bandwidth(output: &str, traffic_class: u8) -> Option<u8> {
    let pattern = Regex::new(&format!(r"QP{traffic_class}\s+MinBw\s*=\s*(\d+)")).ok()?;
    pattern.captures(output)?[1].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHOW_VLAN: &str = "Untagged ports auto-move: Inform
-----------------------------------------------------------------------------------------------
Name            VID  Protocol Addr       Flags                         Proto  Ports  Virtual
                                                                              Active router
                                                                              /Total
-----------------------------------------------------------------------------------------------
Default         1    ------------------------------------------------  ANY    41/50 VR-Default
Mgmt            4095 1.3.3.1  /19  ----------------------------------  ANY    1 /1   VR-Mgmt
vlan100         100  ------------------------------------------------  ANY    0 /0   VR-Default
VLAN_0010       10   ------------------------------------------------  ANY    0 /0   VR-Default
-----------------------------------------------------------------------------------------------
Total number of VLAN(s) : 4";

    #[test]
    fn test_vlans() {
        let vlans = vlans(SHOW_VLAN);
        assert_eq!(
            vlans,
            vec![
                ("Default".to_string(), 1),
                ("Mgmt".to_string(), 4095),
                ("vlan100".to_string(), 100),
                ("VLAN_0010".to_string(), 10),
            ]
        );
    }

    #[test]
    fn test_fdb_port() {
        let output = "Mac                     Vlan       Age  Flags         Port / Virtual Port List
------------------------------------------------------------------------------
00:aa:bb:cc:d9:b9    Default(0001) 0015 d m            49
";
        assert_eq!(fdb_port(output, "00:AA:BB:CC:D9:B9"), Some("49".to_string()));
        assert_eq!(fdb_port(output, "f8:bc:aa:bb:cc:00"), None);
    }

    #[test]
    fn test_lldp_port() {
        let output = "Port     Neighbor Chassis ID        Neighbor Port ID           TTL     Age
=============================================================================
1        F8:BC:AA:BB:CC:00          F8:BC:AA:BB:CC:00          121     8
2        F8:BC:AA:BB:CC:02          F8:BC:AA:BB:CC:02          121     8
=============================================================================
NOTE: The Chassis ID and/or Port ID might be truncated to fit the screen.";
        assert_eq!(lldp_neighbors(output).len(), 2);
        assert_eq!(lldp_port(output, "f8:bc:aa:bb:cc:02"), Some("2".to_string()));
        assert_eq!(lldp_port(output, "f8:bc:aa:bb:cc:99"), None);
    }

    #[test]
    fn test_port_detail() {
        let output = "Port:   1
Admin state:    Enabled with  10G full-duplex
Link State:     Active, 10Gbps, full-duplex
VLAN cfg:
         Name: VLAN-ML, Internal Tag = 100, MAC-limit = No-limit, Virtual router:   VR-Default";
        assert_eq!(internal_tag(output), Some(100));
        assert_eq!(link_state(output), Some(Some(true)));
        assert_eq!(link_state("Link State:     Ready"), Some(Some(false)));
        assert_eq!(link_state("Link State:     NP"), Some(None));
        assert_eq!(link_state(""), None);
    }

    #[test]
    fn test_port_speed() {
        let output = "
Port     Display              VLAN Name           Port  Link  Speed  Duplex
#        String               (or # VLANs)        State State Actual Actual
========================================================================
17                            (0002)              E     A     100G   FULL
18                            (0002)              E     R
========================================================================";
        assert_eq!(port_speed(output, "17"), Some(100000));
        assert_eq!(port_speed(output, "18"), None);
        assert_eq!(port_speed(output, "1"), None);
    }

    #[test]
    fn test_dot1p_and_bandwidth() {
        let dot1p = "802.1p Priority Value  QOS Profile\n     0                 QP1\n     6                 QP7\n";
        assert_eq!(dot1p_profile(dot1p, 6), Some(7));
        assert_eq!(dot1p_profile(dot1p, 3), None);
        assert_eq!(min_bandwidth("QP3 MinBw = 50 MaxBw = 100", 3), Some(50));
        assert_eq!(min_bandwidth("", 3), None);
    }
}

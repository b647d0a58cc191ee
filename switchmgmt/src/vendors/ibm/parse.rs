//! IBM Networking OS output parsers.

use crate::parse;

/// Row of `show interface link` whose port column is `port`. The alias
/// column comes first and may differ from the port number.
fn link_row<'a>(output: &'a str, port: &str) -> Option<Vec<&'a str>> {
    output.lines().find_map(|line| {
        let tokens: Vec<&str> = line.split_whitespace().collect();
        (tokens.get(1) == Some(&port) || tokens.first() == Some(&port))
            .then_some(tokens)
            .filter(|tokens| tokens.len() >= 6)
    })
}

/// Last column of the link table; `Some(None)` for states other than up
/// and down.
pub fn link_state(output: &str, port: &str) -> Option<Option<bool>> {
    let row = link_row(output, port)?;
    Some(match row.last()?.to_ascii_lowercase().as_str() {
        "up" => Some(true),
        "down" | "disabled" => Some(false),
        _ => None,
    })
}

pub fn link_speed(output: &str, port: &str) -> Option<u32> {
    link_row(output, port)?.get(2).and_then(|t| parse::speed_token(t))
}

/// `(vlan, port)` of the forwarding entry for `mac`.
pub fn mac_entry(output: &str, mac: &str) -> Option<(u16, String)> {
    output.lines().find_map(|line| {
        match line.split_whitespace().collect::<Vec<_>>().as_slice() {
            [address, vlan, port, ..] if address.eq_ignore_ascii_case(mac) => {
                Some((vlan.parse().ok()?, port.to_string()))
            }
            _ => None,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINK: &str = "
------------------------------------------------------------------
Alias   Port   Speed    Duplex     Flow Ctrl      Link
------- ----   -----   --------  --TX-----RX--   ------
1       1       10000    full      no     no        up
2       2       1000     full      no     no        down
INT3    3       any      any       yes    yes       disabled
";

    #[test]
    fn test_link_table() {
        assert_eq!(link_state(LINK, "1"), Some(Some(true)));
        assert_eq!(link_state(LINK, "2"), Some(Some(false)));
        assert_eq!(link_state(LINK, "3"), Some(Some(false)));
        assert_eq!(link_state(LINK, "17"), None);
        assert_eq!(link_speed(LINK, "1"), Some(10000));
        assert_eq!(link_speed(LINK, "3"), None);
    }

    #[test]
    fn test_mac_entry() {
        let output = "
     MAC address       VLAN     Port    Trnk  State  Permanent
  -----------------  --------  -------  ----  -----  ---------
  00:00:c9:aa:bb:cc     10       17            FWD
";
        assert_eq!(
            mac_entry(output, "00:00:C9:AA:BB:CC"),
            Some((10, "17".to_string()))
        );
        assert_eq!(mac_entry(output, "00:00:c9:aa:bb:cd"), None);
    }
}

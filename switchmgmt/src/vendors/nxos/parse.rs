//! NX-OS console and NX-API reply parsers.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::parse;

static UP_DOWN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(up|down)\b").expect("up/down pattern is valid"));

/// First data row of `show mac address-table address`, as `(vlan, port)`.
///
/// Rows start after the `---------+----` rule; a leading entry marker
/// (`*`, `+`, `G`, ...) is skipped.
pub fn console_mac_entry(output: &str) -> Option<(u16, String)> {
    let row = output
        .lines()
        .skip_while(|line| !line.starts_with("---"))
        .skip(1)
        .find(|line| !line.trim().is_empty())?;

    let mut tokens = row.split_whitespace().peekable();
    if tokens.peek().is_some_and(|t| t.parse::<u16>().is_err()) {
        tokens.next();
    }
    let vlan = tokens.next()?.parse().ok()?;
    let port = tokens.last()?.to_string();
    Some((vlan, port))
}

pub fn console_link_state(output: &str) -> Option<bool> {
    let caps = UP_DOWN.captures(output)?;
    Some(caps[1].eq_ignore_ascii_case("up"))
}

pub fn console_speed(output: &str) -> Option<u32> {
    output.lines().find_map(parse::duplex_speed)
}

/// The `result` of the first JSON-RPC response; `None` for a null result.
pub fn result(responses: &[Value]) -> Option<&Value> {
    responses
        .first()
        .map(|response| &response["result"])
        .filter(|result| !result.is_null())
}

/// `body.TABLE_<name>.ROW_<name>` of a result; the first row when the
/// switch returned a list.
pub fn row<'a>(result: &'a Value, name: &str) -> Option<&'a Value> {
    let row = &result["body"][format!("TABLE_{name}")][format!("ROW_{name}")];
    match row {
        Value::Array(rows) => rows.first(),
        Value::Null => None,
        row => Some(row),
    }
}

pub fn field<'a>(row: &'a Value, key: &str) -> Option<&'a str> {
    row[key].as_str().map(str::trim)
}

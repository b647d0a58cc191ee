//! Text helpers shared by the dialect parsers.

use once_cell::sync::Lazy;
use regex::Regex;

static SPEED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:a-)?(\d+)(g|gbps|m|mbit|mbps)?$").expect("speed pattern is valid")
});

const DUPLEX: [&str; 5] = ["full", "half", "auto", "a-full", "a-half"];

/// Convert a speed value and unit to Mbps. No unit means Mbps already.
pub fn speed_mbps(value: &str, unit: &str) -> Option<u32> {
    let value: u32 = value.parse().ok()?;
    match unit.to_ascii_lowercase().as_str() {
        "g" | "gbps" => value.checked_mul(1000),
        "" | "m" | "mbit" | "mbps" => Some(value),
        _ => None,
    }
}

/// Parse a single speed token such as `25G`, `a-10G`, `1000`.
pub fn speed_token(token: &str) -> Option<u32> {
    let caps = SPEED.captures(token)?;
    let unit = caps.get(2).map_or("", |m| m.as_str());
    speed_mbps(&caps[1], unit).filter(|mbps| *mbps > 0)
}

/// First line whose leading text is `port`, compared case-insensitively.
pub fn find_row<'a>(output: &'a str, port: &str) -> Option<&'a str> {
    output.lines().find(|line| {
        let line = line.trim_start();
        line.get(..port.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(port))
            && line[port.len()..]
                .chars()
                .next()
                .is_none_or(char::is_whitespace)
    })
}

/// Speed from an interface status row laid out as
/// `<port> [name] <status> <vlan> <duplex> <speed> <type>`.
pub fn duplex_speed(row: &str) -> Option<u32> {
    let tokens: Vec<&str> = row.split_whitespace().collect();
    let duplex = tokens
        .iter()
        .position(|t| DUPLEX.iter().any(|d| t.eq_ignore_ascii_case(d)))?;
    tokens.get(duplex + 1).and_then(|t| speed_token(t))
}

/// Slice a fixed-width table into cells using the header column offsets.
///
/// Rows come after the header line; separator lines of dashes, blank lines
/// and lines that do not reach the first column are skipped. Empty cells
/// are `None`.
pub fn fixed_width_rows(output: &str, headers: &[&str]) -> Vec<Vec<Option<String>>> {
    let mut lines = output.lines();
    let Some(offsets) = lines.by_ref().find_map(|line| column_offsets(line, headers)) else {
        return Vec::new();
    };

    lines
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.chars().all(|c| c == '-' || c == ' ')
        })
        .map(|line| {
            let chars: Vec<char> = line.chars().collect();
            offsets
                .iter()
                .enumerate()
                .map(|(i, start)| {
                    let end = offsets.get(i + 1).copied().unwrap_or(chars.len());
                    let cell: String = chars
                        .get(*start..end.min(chars.len()))
                        .unwrap_or(&[])
                        .iter()
                        .collect();
                    let cell = cell.trim();
                    (!cell.is_empty()).then(|| cell.to_string())
                })
                .collect()
        })
        .collect()
}

fn column_offsets(line: &str, headers: &[&str]) -> Option<Vec<usize>> {
    let mut offsets = Vec::with_capacity(headers.len());
    let mut from = 0;
    for header in headers {
        let pos = from + line.get(from..)?.find(header)?;
        offsets.push(line[..pos].chars().count());
        from = pos + header.len();
    }
    Some(offsets)
}

/// Interface lines of a flat running config (`interface <port> <setting>`)
/// for exactly `port`, without duplicates.
pub fn interface_config_lines(config: &str, port: &str) -> Vec<String> {
    let prefix = format!("interface {} ", port.trim().to_ascii_lowercase());
    let mut lines: Vec<String> = Vec::new();
    for line in config.lines().map(str::trim) {
        if line.to_ascii_lowercase().starts_with(&prefix) && !lines.iter().any(|l| l == line) {
            lines.push(line.to_string());
        }
    }
    lines
}

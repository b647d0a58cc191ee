//! MAC address normalisation.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, ValidationError};

/// How a dialect prints MAC addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacFormat {
    /// `aa:bb:cc:dd:ee:ff`
    Colon,
    /// `aabb.ccdd.eeff`
    CiscoDotted,
}

/// A 48-bit MAC address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    pub fn octets(&self) -> [u8; 6] {
        self.0
    }

    pub fn format(&self, format: MacFormat) -> String {
        let [a, b, c, d, e, f] = self.0;
        match format {
            MacFormat::Colon => format!("{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{f:02x}"),
            MacFormat::CiscoDotted => format!("{a:02x}{b:02x}.{c:02x}{d:02x}.{e:02x}{f:02x}"),
        }
    }
}

/// Accepts any mix of `:`, `-` and `.` separators, or none, in any case.
impl FromStr for MacAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::from(ValidationError::InvalidMac(s.to_string()));

        let digits: Vec<u8> = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ':' | '-' | '.'))
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()
            .ok_or_else(invalid)?;

        if digits.len() != 12 {
            return Err(invalid());
        }

        let mut octets = [0u8; 6];
        for (octet, pair) in octets.iter_mut().zip(digits.chunks(2)) {
            *octet = pair[0] << 4 | pair[1];
        }
        Ok(Self(octets))
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(MacFormat::Colon))
    }
}

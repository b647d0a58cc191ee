//! Device types understood by the SSH adapter.
//!
//! A device type decides how the CLI session is prepared (paging, terminal
//! width) and how configuration mode is entered and left. It is either given
//! in [`SwitchConfig`](crate::SwitchConfig) or detected from `show version`.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Known CLI families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceType {
    CiscoIos,
    CiscoNxos,
    #[serde(alias = "arista")]
    AristaEos,
    #[serde(alias = "dell_os9")]
    DellForce10,
    DellOs10,
    MellanoxMlnxos,
    ExtremeExos,
    IbmOs,
}

/// Session handling for one CLI family.
#[derive(Debug, Clone, Copy)]
pub struct CliProfile {
    /// Commands sent once after login.
    pub session_prep: &'static [&'static str],
    /// Command entering configuration mode, if the CLI has one.
    pub config_enter: Option<&'static str>,
    /// Command leaving configuration mode.
    pub config_exit: &'static str,
}

impl DeviceType {
    pub const ALL: [DeviceType; 8] = [
        DeviceType::CiscoIos,
        DeviceType::CiscoNxos,
        DeviceType::AristaEos,
        DeviceType::DellForce10,
        DeviceType::DellOs10,
        DeviceType::MellanoxMlnxos,
        DeviceType::ExtremeExos,
        DeviceType::IbmOs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::CiscoIos => "cisco_ios",
            DeviceType::CiscoNxos => "cisco_nxos",
            DeviceType::AristaEos => "arista_eos",
            DeviceType::DellForce10 => "dell_force10",
            DeviceType::DellOs10 => "dell_os10",
            DeviceType::MellanoxMlnxos => "mellanox_mlnxos",
            DeviceType::ExtremeExos => "extreme_exos",
            DeviceType::IbmOs => "ibm_os",
        }
    }

    pub fn cli(&self) -> CliProfile {
        match self {
            DeviceType::CiscoIos | DeviceType::CiscoNxos => CliProfile {
                session_prep: &["terminal length 0", "terminal width 511"],
                config_enter: Some("configure terminal"),
                config_exit: "end",
            },
            DeviceType::AristaEos => CliProfile {
                session_prep: &["terminal length 0", "terminal width 32767"],
                config_enter: Some("configure terminal"),
                config_exit: "end",
            },
            DeviceType::DellForce10 | DeviceType::DellOs10 => CliProfile {
                session_prep: &["terminal length 0"],
                config_enter: Some("configure terminal"),
                config_exit: "end",
            },
            DeviceType::MellanoxMlnxos => CliProfile {
                session_prep: &["no cli session paging enable"],
                config_enter: Some("configure terminal"),
                config_exit: "exit",
            },
            DeviceType::ExtremeExos => CliProfile {
                session_prep: &["disable clipaging"],
                config_enter: None,
                config_exit: "",
            },
            DeviceType::IbmOs => CliProfile {
                session_prep: &["terminal-length 0"],
                config_enter: Some("configure terminal"),
                config_exit: "end",
            },
        }
    }

    /// Guess the device type from `show version` output.
    ///
    /// Order matters: Dell OS10 output also mentions "Dell", and NX-OS
    /// output also mentions "Cisco".
    pub fn detect(show_version: &str) -> Option<DeviceType> {
        const SIGNATURES: &[(&str, DeviceType)] = &[
            ("Arista", DeviceType::AristaEos),
            ("NX-OS", DeviceType::CiscoNxos),
            ("Cisco Nexus Operating System", DeviceType::CiscoNxos),
            ("Cisco IOS", DeviceType::CiscoIos),
            ("OS10", DeviceType::DellOs10),
            ("Dell Networking OS", DeviceType::DellForce10),
            ("Dell Application Software", DeviceType::DellForce10),
            ("Force10", DeviceType::DellForce10),
            ("Onyx", DeviceType::MellanoxMlnxos),
            ("MLNX-OS", DeviceType::MellanoxMlnxos),
            ("Mellanox", DeviceType::MellanoxMlnxos),
            ("ExtremeXOS", DeviceType::ExtremeExos),
            ("Extreme Networks", DeviceType::ExtremeExos),
            ("IBM Networking Operating System", DeviceType::IbmOs),
            ("IBM", DeviceType::IbmOs),
        ];

        SIGNATURES
            .iter()
            .find(|(signature, _)| show_version.contains(signature))
            .map(|(_, device)| *device)
    }
}

impl fmt::Display for DeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let name = s.trim().to_ascii_lowercase();
        match name.as_str() {
            "arista" => Ok(DeviceType::AristaEos),
            "dell_os9" => Ok(DeviceType::DellForce10),
            _ => DeviceType::ALL
                .into_iter()
                .find(|d| d.as_str() == name)
                .ok_or_else(|| Error::invalid(format!("Unsupported device type: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_vendors() {
        assert_eq!(
            DeviceType::detect("Arista DCS-7280SR-48C6-M\nSoftware image version: 4.24.1F"),
            Some(DeviceType::AristaEos)
        );
        assert_eq!(
            DeviceType::detect("Cisco Nexus Operating System (NX-OS) Software"),
            Some(DeviceType::CiscoNxos)
        );
        assert_eq!(
            DeviceType::detect("Cisco IOS Software, C3750E Software"),
            Some(DeviceType::CiscoIos)
        );
        assert_eq!(
            DeviceType::detect("Dell EMC Networking OS10 Enterprise"),
            Some(DeviceType::DellOs10)
        );
        assert_eq!(
            DeviceType::detect("Dell Real Time Operating System Software\nDell Networking OS Version : 9.14"),
            Some(DeviceType::DellForce10)
        );
        assert_eq!(
            DeviceType::detect("Product name:      Onyx\nProduct release:   3.9.1014"),
            Some(DeviceType::MellanoxMlnxos)
        );
        assert_eq!(
            DeviceType::detect("ExtremeXOS version 30.7.1.1"),
            Some(DeviceType::ExtremeExos)
        );
        assert_eq!(DeviceType::detect("Linux 6.1"), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("arista".parse::<DeviceType>().unwrap(), DeviceType::AristaEos);
        assert_eq!(
            "Cisco_NXOS".parse::<DeviceType>().unwrap(),
            DeviceType::CiscoNxos
        );
        assert!("junos".parse::<DeviceType>().is_err());
    }

    #[test]
    fn test_extreme_has_no_config_mode() {
        let cli = DeviceType::ExtremeExos.cli();
        assert!(cli.config_enter.is_none());
        assert_eq!(cli.session_prep, &["disable clipaging"]);
    }
}

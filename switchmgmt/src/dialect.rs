//! Per-dialect constants.
//!
//! A [`Dialect`] is built once per vendor (in a `Lazy` static) and never
//! changes: port grammar, MAC display format, port-channel numbering and
//! QoS limits.

use regex::Regex;

use crate::error::{Result, ValidationError, check_range};
use crate::mac::MacFormat;
use crate::validate;

/// Port name grammar of a dialect.
#[derive(Debug)]
pub struct PortSyntax {
    /// A single ethernet interface.
    pub ethernet: Regex,
    /// A single port-channel interface.
    pub port_channel: Regex,
    /// The `ports` argument of VLAN and reset operations: ranges and lists
    /// of ethernet ports, or a port-channel.
    pub ports: Regex,
}

impl PortSyntax {
    pub fn new(
        ethernet: &str,
        port_channel: &str,
        ports: &str,
    ) -> std::result::Result<Self, regex::Error> {
        Ok(Self {
            ethernet: Regex::new(ethernet)?,
            port_channel: Regex::new(port_channel)?,
            ports: Regex::new(ports)?,
        })
    }

    pub fn ensure_ethernet(&self, port: &str) -> Result<()> {
        if self.ethernet.is_match(port) {
            Ok(())
        } else {
            Err(ValidationError::NotEthernetPort(port.to_string()).into())
        }
    }

    pub fn ensure_port_channel(&self, port: &str) -> Result<()> {
        if self.port_channel.is_match(port) {
            Ok(())
        } else {
            Err(ValidationError::NotPortChannel(port.to_string()).into())
        }
    }

    pub fn ensure_either(&self, port: &str) -> Result<()> {
        if self.ethernet.is_match(port) || self.port_channel.is_match(port) {
            Ok(())
        } else {
            Err(ValidationError::NotEthernetOrPortChannel(port.to_string()).into())
        }
    }
}

/// Immutable description of one vendor dialect.
#[derive(Debug)]
pub struct Dialect {
    /// Name used in error messages, e.g. `Cisco_NXOS`.
    pub name: &'static str,
    pub ports: PortSyntax,
    pub mac_format: MacFormat,
    /// Highest port-channel number; numbering starts at 1.
    pub port_channel_max: u32,
    pub traffic_classes: u8,
    pub max_frame_size: u32,
}

impl Dialect {
    pub fn ensure_ports(&self, ports: &str) -> Result<()> {
        if ports.trim().is_empty() {
            return Err(ValidationError::MissingPorts.into());
        }
        if self.ports.ports.is_match(ports) {
            Ok(())
        } else {
            Err(ValidationError::PortSyntax {
                dialect: self.name,
                ports: ports.to_string(),
            }
            .into())
        }
    }

    pub fn ensure_port_channel_number(&self, number: u32) -> Result<()> {
        check_range(
            "Port channel interface number",
            i64::from(number),
            1,
            i64::from(self.port_channel_max),
        )
    }

    /// Reject traffic-class lists longer than the dialect supports.
    pub fn ensure_traffic_class_count(&self, count: usize) -> Result<()> {
        if count > usize::from(self.traffic_classes) {
            Err(ValidationError::TooManyTrafficClasses {
                dialect: self.name,
                max: self.traffic_classes,
            }
            .into())
        } else {
            Ok(())
        }
    }

    /// Traffic classes are numbered `0..traffic_classes`.
    pub fn ensure_traffic_class(&self, class: u8) -> Result<()> {
        check_range(
            "Traffic class",
            i64::from(class),
            0,
            i64::from(self.traffic_classes) - 1,
        )
    }

    /// Every class in range, none listed twice.
    pub fn ensure_traffic_classes<I>(&self, classes: I) -> Result<()>
    where
        I: IntoIterator<Item = u8>,
    {
        let classes: Vec<u8> = classes.into_iter().collect();
        for class in &classes {
            self.ensure_traffic_class(*class)?;
        }
        validate::distinct("Traffic class", classes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dialect() -> Dialect {
        Dialect {
            name: "Test",
            ports: PortSyntax::new(r"^eth\d+$", r"^po\d+$", r"^(eth\d+(,eth\d+)*|po\d+)$").unwrap(),
            mac_format: MacFormat::Colon,
            port_channel_max: 2000,
            traffic_classes: 8,
            max_frame_size: 9216,
        }
    }

    #[test]
    fn test_port_checks() {
        let dialect = dialect();
        assert!(dialect.ports.ensure_ethernet("eth1").is_ok());
        assert!(dialect.ports.ensure_ethernet("po1").is_err());
        assert!(dialect.ports.ensure_port_channel("po1").is_ok());
        assert!(dialect.ports.ensure_either("po1").is_ok());
        assert!(dialect.ports.ensure_either("x1").is_err());
        assert!(dialect.ensure_ports("eth1,eth2").is_ok());
        assert!(matches!(
            dialect.ensure_ports(" "),
            Err(crate::Error::Validation(ValidationError::MissingPorts))
        ));
    }

    #[test]
    fn test_port_channel_range() {
        let dialect = dialect();
        assert!(dialect.ensure_port_channel_number(1).is_ok());
        assert!(dialect.ensure_port_channel_number(2000).is_ok());
        assert!(dialect.ensure_port_channel_number(0).is_err());
        assert!(dialect.ensure_port_channel_number(2001).is_err());
    }

    #[test]
    fn test_traffic_class_count() {
        let dialect = dialect();
        assert!(dialect.ensure_traffic_class_count(8).is_ok());
        let err = dialect.ensure_traffic_class_count(9).unwrap_err();
        assert!(err.to_string().contains("Test switch supports up to 8 traffic classes."));
    }

    #[test]
    fn test_traffic_class_numbers() {
        let dialect = dialect();
        assert!(dialect.ensure_traffic_classes([0, 3, 7]).is_ok());
        let err = dialect.ensure_traffic_classes([1, 8]).unwrap_err();
        assert!(err.to_string().contains("Traffic class should be integer in range 0-7, got 8"));
        assert!(matches!(
            dialect.ensure_traffic_classes([2, 5, 2]),
            Err(crate::Error::Validation(ValidationError::Duplicate { value: 2, .. }))
        ));
    }
}

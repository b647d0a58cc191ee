//! Argument validation shared by all dialects.
//!
//! Everything here runs before a command is built, so a rejected argument
//! never reaches the switch.

use crate::dialect::Dialect;
use crate::error::{Result, ValidationError, check_range};
use crate::types::{SwitchportMode, VlanType};

/// Ports argument of the generic dialect: `te 0/1`, `gi 1/0/1 - 1/0/4`,
/// comma lists thereof, or `po<N>`.
pub const GENERIC_PORTS: &str = r"(?i)^(((gi|te|fo|tw|tf|fi|hu) (\d+/){1,2}\d+)( - (\d+/)*\d+)?( , ((gi|te|fo|tw|tf|fi|hu) (\d+/){1,2}\d+)( - (\d+/)*\d+)?)*|po\d+)$";

/// Arguments checked before a VLAN or port-mode change.
#[derive(Debug, Clone, Copy, Default)]
pub struct PortParameters<'a> {
    pub ports: Option<&'a str>,
    pub mode: Option<SwitchportMode>,
    pub vlan: Option<u16>,
    pub vlan_type: Option<VlanType>,
}

impl<'a> PortParameters<'a> {
    pub fn new(ports: &'a str) -> Self {
        Self {
            ports: Some(ports),
            ..Default::default()
        }
    }

    pub fn mode(mut self, mode: SwitchportMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn vlan(mut self, vlan: u16) -> Self {
        self.vlan = Some(vlan);
        self
    }

    pub fn vlan_type(mut self, vlan_type: VlanType) -> Self {
        self.vlan_type = Some(vlan_type);
        self
    }
}

/// Check ports, mode, VLAN and VLAN type together.
///
/// Ports are mandatory and must match the dialect grammar. Access mode
/// needs a VLAN, and so does an untagged assignment in access or trunk mode.
pub fn configure_parameters(dialect: &Dialect, params: &PortParameters<'_>) -> Result<()> {
    let ports = params.ports.ok_or(ValidationError::MissingPorts)?;
    dialect.ensure_ports(ports)?;

    if let Some(vlan) = params.vlan {
        vlan_id(vlan)?;
    }

    match (params.mode, params.vlan_type, params.vlan) {
        (Some(SwitchportMode::Access), _, None) => {
            Err(ValidationError::MissingVlan("in access mode").into())
        }
        (Some(SwitchportMode::Trunk), Some(VlanType::Untagged), None) => {
            Err(ValidationError::MissingVlan("for untagged trunk").into())
        }
        _ => Ok(()),
    }
}

pub fn vlan_id(vlan: u16) -> Result<()> {
    check_range("VLAN id", i64::from(vlan), 1, 4094)
}

/// 802.1p priority or traffic class.
pub fn priority(value: u8) -> Result<()> {
    check_range("Priority", i64::from(value), 0, 7)
}

/// Reject a value listed twice.
pub fn distinct<I>(what: &'static str, values: I) -> Result<()>
where
    I: IntoIterator<Item = u8>,
{
    let mut seen = [false; 256];
    for value in values {
        if std::mem::replace(&mut seen[usize::from(value)], true) {
            return Err(ValidationError::Duplicate {
                what,
                value: i64::from(value),
            }
            .into());
        }
    }
    Ok(())
}

/// Bandwidth shares must not add up to more than 100 percent.
pub fn bandwidth_total<I>(shares: I) -> Result<()>
where
    I: IntoIterator<Item = u8>,
{
    let total: u32 = shares.into_iter().map(u32::from).sum();
    if total > 100 {
        Err(ValidationError::BandwidthExceeded(total).into())
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use once_cell::sync::Lazy;

    use super::*;
    use crate::dialect::PortSyntax;
    use crate::error::Error;
    use crate::mac::MacFormat;

    static GENERIC: Lazy<Dialect> = Lazy::new(|| Dialect {
        name: "Generic",
        ports: PortSyntax::new(r"^te \d+/\d+$", r"^po\d+$", GENERIC_PORTS).unwrap(),
        mac_format: MacFormat::Colon,
        port_channel_max: 128,
        traffic_classes: 8,
        max_frame_size: 9216,
    });

    #[test]
    fn test_ports_are_mandatory() {
        let err = configure_parameters(&GENERIC, &PortParameters::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::MissingPorts)
        ));
    }

    #[test]
    fn test_generic_port_grammar() {
        for ports in ["te 0/1", "te 0/1/1", "gi 1/0/1 - 1/0/4", "te 0/1 , fo 0/2", "po10", "TE 1/1"] {
            assert!(
                configure_parameters(&GENERIC, &PortParameters::new(ports)).is_ok(),
                "{ports}"
            );
        }
        for ports in ["te 0/1/1/1", "te0/1", "eth1/1", "po"] {
            assert!(
                configure_parameters(&GENERIC, &PortParameters::new(ports)).is_err(),
                "{ports}"
            );
        }
    }

    #[test]
    fn test_access_needs_vlan() {
        let params = PortParameters::new("te 0/1").mode(SwitchportMode::Access);
        assert!(configure_parameters(&GENERIC, &params).is_err());
        assert!(configure_parameters(&GENERIC, &params.vlan(10)).is_ok());
    }

    #[test]
    fn test_untagged_needs_vlan() {
        for mode in [SwitchportMode::Access, SwitchportMode::Trunk] {
            let params = PortParameters::new("te 0/1")
                .mode(mode)
                .vlan_type(VlanType::Untagged);
            assert!(configure_parameters(&GENERIC, &params).is_err());
        }

        let tagged = PortParameters::new("te 0/1")
            .mode(SwitchportMode::Trunk)
            .vlan_type(VlanType::Tagged);
        assert!(configure_parameters(&GENERIC, &tagged).is_ok());
    }

    #[test]
    fn test_mode_strings_are_case_insensitive() {
        let mode: SwitchportMode = "Trunk".parse().unwrap();
        let params = PortParameters::new("te 0/1").mode(mode).vlan(2);
        assert!(configure_parameters(&GENERIC, &params).is_ok());

        let mode: SwitchportMode = "ACCESS".parse().unwrap();
        let params = PortParameters::new("te 0/1").mode(mode).vlan(2);
        assert!(configure_parameters(&GENERIC, &params).is_ok());
    }

    #[test]
    fn test_vlan_range() {
        assert!(vlan_id(0).is_err());
        assert!(vlan_id(4095).is_err());
        let params = PortParameters::new("te 0/1").vlan(5000);
        assert!(configure_parameters(&GENERIC, &params).is_err());
    }

    #[test]
    fn test_bandwidth_total() {
        assert!(bandwidth_total([50, 50]).is_ok());
        let err = bandwidth_total([50, 60]).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::BandwidthExceeded(110))
        ));
    }

    #[test]
    fn test_distinct() {
        assert!(distinct("Priority", [0, 3, 7]).is_ok());
        let err = distinct("Priority", [3, 4, 3]).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::Duplicate { value: 3, .. })
        ));
        assert!(err.to_string().contains("Priority 3 is given more than once"));
    }

    #[test]
    fn test_priority() {
        assert!(priority(7).is_ok());
        assert!(priority(8).is_err());
    }
}

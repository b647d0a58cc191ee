//! Value types shared by the dialects.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;

/// Declare an enum of CLI keywords with `Display` and a case-insensitive,
/// whitespace-tolerant `FromStr` whose error message is `$err` formatted
/// with the rejected input.
macro_rules! keyword_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $err:literal {
            $($variant:ident => $keyword:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $keyword),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim();
                $(
                    if wanted.eq_ignore_ascii_case($keyword) {
                        return Ok($name::$variant);
                    }
                )+
                Err(Error::invalid(format!($err, s)))
            }
        }
    };
}

keyword_enum! {
    /// Switchport mode of an interface.
    SwitchportMode, "Incorrect switchport mode: {}" {
        Access => "access",
        Trunk => "trunk",
        Hybrid => "hybrid",
    }
}

keyword_enum! {
    /// Whether VLAN frames on a port carry a tag.
    VlanType, "vlan_type must be 'tagged' or 'untagged', got {}" {
        Tagged => "tagged",
        Untagged => "untagged",
    }
}

keyword_enum! {
    /// LACP negotiation mode for channel-group membership.
    ChannelGroupMode, "{} is incorrect parameter for channel-group mode" {
        Active => "active",
        On => "on",
        Passive => "passive",
    }
}

keyword_enum! {
    LacpRate, "{} is incorrect option for LACP rate" {
        Fast => "fast",
        Normal => "normal",
    }
}

keyword_enum! {
    /// Priority flow control mode of a port.
    PfcMode, "{} is incorrect option for priority-flow-control mode" {
        On => "on",
        Off => "off",
        Auto => "auto",
    }
}

keyword_enum! {
    DcbxVersion, "{} is incorrect DCBX version" {
        Cee => "cee",
        Ieee => "ieee",
    }
}

keyword_enum! {
    LldpDirection, "Invalid parameter: {}. Valid values are 'receive' or 'transmit'." {
        Receive => "receive",
        Transmit => "transmit",
    }
}

keyword_enum! {
    /// Forward error correction mode, spelled the Onyx way.
    FecMode, "{} is incorrect FEC mode" {
        RsFec => "rs-fec",
        FcFec => "fc-fec",
        NoFec => "no-fec",
        Auto => "auto",
    }
}

keyword_enum! {
    State, "{} is incorrect state, expected enable or disable" {
        Enable => "enable",
        Disable => "disable",
    }
}

keyword_enum! {
    EtsMode, "Invalid ETS mode: {}. Must be either WRR or STRICT." {
        Wrr => "wrr",
        Strict => "strict",
    }
}

keyword_enum! {
    /// Port-group breakout profiles on Dell OS10.
    BreakOutMode, "{} is incorrect breakout mode" {
        Eth10g4x => "Eth 10g-4x",
        Eth25g4x => "Eth 25g-4x",
        Eth40g1x => "Eth 40g-1x",
        Eth50g2x => "Eth 50g-2x",
        Eth100g1x => "Eth 100g-1x",
        Eth100g2x => "Eth 100g-2x",
        Eth100g4x => "Eth 100g-4x",
        Eth200g2x => "Eth 200g-2x",
        Eth400g1x => "Eth 400g-1x",
    }
}

keyword_enum! {
    QosClassType, "{} is incorrect class-map type" {
        Queuing => "queuing",
        NetworkQos => "network-qos",
    }
}

keyword_enum! {
    QueueType, "{} is incorrect queue type" {
        Ucast => "ucast",
        Mcast => "mcast",
    }
}

/// One row of an LLDP neighbour table. Fields a dialect does not report
/// stay `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LldpNeighbor {
    pub loc_portid: String,
    pub rem_devid: Option<String>,
    pub rem_portid: Option<String>,
    pub rem_sysname: Option<String>,
}

/// Arguments of a VLAN assignment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VlanConfig {
    pub ports: String,
    pub vlan: u16,
    pub vlan_type: VlanType,
    pub mode: SwitchportMode,
    /// Replace the allowed VLAN list instead of adding to it.
    pub override_allowed: bool,
}

impl VlanConfig {
    pub fn new(
        ports: impl Into<String>,
        vlan: u16,
        vlan_type: VlanType,
        mode: SwitchportMode,
    ) -> Self {
        Self {
            ports: ports.into(),
            vlan,
            vlan_type,
            mode,
            override_allowed: false,
        }
    }

    pub fn override_allowed(mut self, override_allowed: bool) -> Self {
        self.override_allowed = override_allowed;
        self
    }
}

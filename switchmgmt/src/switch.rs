//! The operation catalogue every dialect presents.
//!
//! Dialects implement [`Switch`]. Operations a dialect does not offer keep
//! the default body and fail with [`Error::Unsupported`]. Dialect-only
//! operations live as inherent methods on the dialect types.

use std::str::FromStr;

use async_trait::async_trait;
use indexmap::IndexMap;
use log::debug;
use tokio::time::Instant;

use crate::dialect::Dialect;
use crate::error::{Error, Result};
use crate::mac::MacAddress;
use crate::session::Session;
use crate::types::{
    ChannelGroupMode, DcbxVersion, FecMode, LacpRate, LldpDirection, LldpNeighbor, PfcMode,
    SwitchportMode, VlanConfig,
};
use crate::validate::{self, PortParameters};

fn unsupported<T>(dialect: &Dialect, operation: &'static str) -> Result<T> {
    Err(Error::Unsupported {
        dialect: dialect.name,
        operation,
    })
}

/// Common switch operations.
#[async_trait]
pub trait Switch: Send {
    fn dialect(&self) -> &'static Dialect;

    fn session(&mut self) -> &mut Session;

    /// Render a MAC address in this dialect's display form.
    fn change_standard_to_switch_mac_address(&self, mac: &str) -> Result<String> {
        Ok(MacAddress::from_str(mac)?.format(self.dialect().mac_format))
    }

    fn validate_configure_parameters(&self, params: &PortParameters<'_>) -> Result<()> {
        validate::configure_parameters(self.dialect(), params)
    }

    async fn show_version(&mut self) -> Result<String> {
        self.session().send_text("show version").await
    }

    async fn disconnect(&mut self) -> Result<()> {
        self.session().disconnect().await
    }

    /// `Some(true)` up, `Some(false)` down, `None` when the switch reports a
    /// state outside its up/down vocabulary.
    async fn is_port_linkup(&mut self, port: &str) -> Result<Option<bool>>;

    /// Port speed in Mbps.
    async fn get_port_speed(&mut self, _port: &str) -> Result<u32> {
        unsupported(self.dialect(), "get_port_speed")
    }

    async fn get_port_by_mac(&mut self, _mac: &str) -> Result<String> {
        unsupported(self.dialect(), "get_port_by_mac")
    }

    async fn get_vlan_by_mac(&mut self, _mac: &str) -> Result<u16> {
        unsupported(self.dialect(), "get_vlan_by_mac")
    }

    async fn get_lldp_neighbors(&mut self) -> Result<Vec<LldpNeighbor>> {
        unsupported(self.dialect(), "get_lldp_neighbors")
    }

    async fn show_port_running_config(&mut self, _port: &str) -> Result<String> {
        unsupported(self.dialect(), "show_port_running_config")
    }

    /// Show the given VLANs, or all of them when `vlans` is empty.
    async fn show_vlans(&mut self, _vlans: &[u16]) -> Result<String> {
        unsupported(self.dialect(), "show_vlans")
    }

    async fn configure_vlan(&mut self, _config: &VlanConfig) -> Result<()> {
        unsupported(self.dialect(), "configure_vlan")
    }

    /// Remove a VLAN. Returns whether it is gone afterwards.
    async fn remove_vlan(&mut self, _vlan: u16) -> Result<bool> {
        unsupported(self.dialect(), "remove_vlan")
    }

    /// Return ports to their default configuration.
    async fn default_ports(&mut self, _ports: &str) -> Result<()> {
        unsupported(self.dialect(), "default_ports")
    }

    /// Administratively shut (`true`) or open (`false`) a port.
    async fn shutdown(&mut self, _shutdown: bool, _port: &str) -> Result<()> {
        unsupported(self.dialect(), "shutdown")
    }

    /// Issue the enable command `count` times.
    async fn enable_port(&mut self, port: &str, count: usize) -> Result<()> {
        for _ in 0..count {
            self.shutdown(false, port).await?;
        }
        Ok(())
    }

    /// Issue the disable command `count` times.
    async fn disable_port(&mut self, port: &str, count: usize) -> Result<()> {
        for _ in 0..count {
            self.shutdown(true, port).await?;
        }
        Ok(())
    }

    /// Poll the link until it reports `link_up` for enough consecutive
    /// probes, or fail once the session's [`LinkWait`] budget is spent.
    ///
    /// [`LinkWait`]: crate::session::LinkWait
    async fn wait_for_holding_link_state(&mut self, port: &str, link_up: bool) -> Result<()> {
        let policy = self.session().link_wait();
        let started = Instant::now();
        let mut held = 0;

        loop {
            match self.is_port_linkup(port).await? {
                Some(state) if state == link_up => held += 1,
                other => {
                    debug!("{port}: link is {other:?}, waiting for {link_up}");
                    held = 0;
                }
            }
            if held >= policy.hold_probes {
                return Ok(());
            }
            if started.elapsed() + policy.interval > policy.timeout {
                return Err(Error::LinkStateTimeout {
                    port: port.to_string(),
                    link_up,
                    timeout: policy.timeout,
                });
            }
            tokio::time::sleep(policy.interval).await;
        }
    }

    async fn create_port_channel_interface(&mut self, _number: u32) -> Result<()> {
        unsupported(self.dialect(), "create_port_channel_interface")
    }

    async fn remove_port(&mut self, _port: &str) -> Result<()> {
        unsupported(self.dialect(), "remove_port")
    }

    async fn add_port_to_channel_group(
        &mut self,
        _port: &str,
        _number: u32,
        _mode: Option<ChannelGroupMode>,
        _force: bool,
    ) -> Result<()> {
        unsupported(self.dialect(), "add_port_to_channel_group")
    }

    async fn remove_port_from_port_channel(&mut self, _port: &str) -> Result<()> {
        unsupported(self.dialect(), "remove_port_from_port_channel")
    }

    async fn show_port_channel_summary(&mut self, _number: Option<u32>) -> Result<String> {
        unsupported(self.dialect(), "show_port_channel_summary")
    }

    async fn set_switchport_mode(&mut self, _port: &str, _mode: SwitchportMode) -> Result<()> {
        unsupported(self.dialect(), "set_switchport_mode")
    }

    async fn set_lacp_rate(&mut self, _port: &str, _rate: LacpRate) -> Result<()> {
        unsupported(self.dialect(), "set_lacp_rate")
    }

    /// Remove the LACP rate, or only the given one.
    async fn disable_lacp_rate(&mut self, _port: &str, _rate: Option<LacpRate>) -> Result<()> {
        unsupported(self.dialect(), "disable_lacp_rate")
    }

    async fn configure_lldp(&mut self, _port: &str, _directions: &[LldpDirection]) -> Result<()> {
        unsupported(self.dialect(), "configure_lldp")
    }

    async fn set_port_flowcontrol(&mut self, _port: &str, _rx: bool, _tx: bool) -> Result<()> {
        unsupported(self.dialect(), "set_port_flowcontrol")
    }

    async fn show_port_dcbx(&mut self, _port: &str) -> Result<String> {
        unsupported(self.dialect(), "show_port_dcbx")
    }

    async fn set_port_dcbx_version(&mut self, _port: &str, _version: DcbxVersion) -> Result<()> {
        unsupported(self.dialect(), "set_port_dcbx_version")
    }

    async fn clear_port_dcbx(&mut self, _port: &str) -> Result<()> {
        unsupported(self.dialect(), "clear_port_dcbx")
    }

    async fn set_port_pfc_by_tc(&mut self, _port: &str, _priority: u8, _pfc: PfcMode) -> Result<()> {
        unsupported(self.dialect(), "set_port_pfc_by_tc")
    }

    async fn delete_port_pfc(&mut self, _port: &str) -> Result<()> {
        unsupported(self.dialect(), "delete_port_pfc")
    }

    /// Create a QoS policy named by `suffix`.
    ///
    /// `bandwidth[tc]` is the share of traffic class `tc`; `up2tc[p]` maps
    /// 802.1p priority `p` to a traffic class.
    async fn create_qos_policy(&mut self, _bandwidth: &[u8], _up2tc: &[u8], _suffix: &str) -> Result<()> {
        unsupported(self.dialect(), "create_qos_policy")
    }

    async fn delete_qos_policy(&mut self, _suffix: &str) -> Result<()> {
        unsupported(self.dialect(), "delete_qos_policy")
    }

    async fn set_port_bw_by_tc(&mut self, _port: &str, _suffix: &str) -> Result<()> {
        unsupported(self.dialect(), "set_port_bw_by_tc")
    }

    async fn delete_port_bw_by_tc(&mut self, _port: &str, _suffix: &str) -> Result<()> {
        unsupported(self.dialect(), "delete_port_bw_by_tc")
    }

    /// Current FEC mode; `None` when the switch reports an unknown mode.
    async fn get_fec(&mut self, _port: &str) -> Result<Option<FecMode>> {
        unsupported(self.dialect(), "get_fec")
    }

    /// Set FEC and report whether the switch now shows that mode.
    async fn set_fec(&mut self, _port: &str, _mode: FecMode) -> Result<bool> {
        unsupported(self.dialect(), "set_fec")
    }
}

/// Priorities grouped by the traffic class they map to, classes ascending.
pub(crate) fn priorities_by_tc(up2tc: &[u8]) -> IndexMap<u8, Vec<u8>> {
    let mut classes: Vec<u8> = up2tc.to_vec();
    classes.sort_unstable();
    classes.dedup();

    classes
        .into_iter()
        .map(|tc| {
            let priorities = up2tc
                .iter()
                .enumerate()
                .filter(|(_, class)| **class == tc)
                .map(|(priority, _)| priority as u8)
                .collect();
            (tc, priorities)
        })
        .collect()
}

pub(crate) fn join<T: ToString>(values: &[T], separator: &str) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

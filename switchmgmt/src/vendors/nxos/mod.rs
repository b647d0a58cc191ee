//! Cisco NX-OS, over the CLI or NX-API.
//!
//! Read operations pick their parser from the reply: console text or
//! JSON-RPC objects.

mod commands;
mod parse;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::config::SwitchConfig;
use crate::connection::Reply;
use crate::dialect::{Dialect, PortSyntax};
use crate::error::{Error, Result, SwitchError};
use crate::mac::MacFormat;
use crate::parse::speed_token;
use crate::session::Session;
use crate::switch::Switch;
use crate::types::{
    ChannelGroupMode, DcbxVersion, LacpRate, LldpDirection, LldpNeighbor, PfcMode,
    SwitchportMode, VlanConfig,
};
use crate::validate::{self, PortParameters};
use crate::vendors::cisco::{commands as cli, parse as console};

pub use commands::QOS_PRIORITY;

const ETHERNET: &str = r"(?i)^(ethernet|eth) ?\d+(/\d+){1,2}$";
const PORT_CHANNEL: &str = r"(?i)^(port-channel|po) ?\d+$";
const PORTS: &str = r"(?i)^((ethernet|eth) ?\d+(/\d+){1,2}(-\d+)?( ?, ?(ethernet|eth) ?\d+(/\d+){1,2}(-\d+)?)*|(port-channel|po) ?\d+)$";

static DIALECT: Lazy<Dialect> = Lazy::new(|| Dialect {
    name: "Cisco_NXOS",
    ports: PortSyntax::new(ETHERNET, PORT_CHANNEL, PORTS).expect("NX-OS port patterns are valid"),
    mac_format: MacFormat::CiscoDotted,
    port_channel_max: 4096,
    traffic_classes: 8,
    max_frame_size: 9216,
});

/// A Cisco Nexus switch.
pub struct CiscoNxos {
    session: Session,
}

impl CiscoNxos {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    /// Connect over SSH or NX-API, per `config.connection_type`.
    pub async fn connect(config: &SwitchConfig) -> Result<Self> {
        Ok(Self::new(Session::open(config).await?))
    }

    async fn mac_entry(&mut self, mac: &str) -> Result<(u16, String)> {
        let mac = self.change_standard_to_switch_mac_address(mac)?;
        let reply = self
            .session
            .send_command(&format!("show mac address-table address {mac}"))
            .await?;

        let entry = match &reply {
            Reply::Json(responses) => parse::result(responses)
                .and_then(|result| parse::row(result, "mac_address"))
                .and_then(|row| {
                    let vlan = parse::field(row, "disp_vlan")?.parse().ok()?;
                    Some((vlan, parse::field(row, "disp_port")?.to_string()))
                }),
            Reply::Text(text) => parse::console_mac_entry(text),
        };
        entry.ok_or_else(|| SwitchError::MacNotFound(mac).into())
    }

    fn api_link_state(responses: &[Value], port: &str) -> Result<Option<bool>> {
        if responses.is_empty() {
            return Err(Error::unexpected(format!(
                "State of port: {port} not found, API response may be corrupted."
            )));
        }
        let result = parse::result(responses).ok_or_else(|| {
            Error::unexpected(format!("Could not find port {port} in switch interfaces."))
        })?;
        let state = parse::row(result, "interface")
            .and_then(|row| parse::field(row, "state"))
            .ok_or_else(|| SwitchError::LinkStatus {
                dialect: DIALECT.name,
                port: port.to_string(),
            })?;

        match state {
            "up" => Ok(Some(true)),
            "down" => Ok(Some(false)),
            _ => Err(Error::unexpected(format!(
                "Unable to read state of': {}; interface: {port}",
                DIALECT.name
            ))),
        }
    }

    /// Apply a DCBX change with the port shut, then wait for the link.
    async fn change_dcbx(&mut self, port: &str, commands: Vec<String>) -> Result<()> {
        self.validate_configure_parameters(&PortParameters::new(port))?;
        self.shutdown(true, port).await?;
        self.session.send_command_list(&commands).await?;
        self.shutdown(false, port).await?;
        self.wait_for_holding_link_state(port, true).await
    }
}

#[async_trait]
impl Switch for CiscoNxos {
    fn dialect(&self) -> &'static Dialect {
        &DIALECT
    }

    fn session(&mut self) -> &mut Session {
        &mut self.session
    }

    async fn is_port_linkup(&mut self, port: &str) -> Result<Option<bool>> {
        DIALECT.ports.ensure_either(port)?;
        let reply = self
            .session
            .send_command(&format!("show interface {port} brief"))
            .await?;
        match reply {
            Reply::Json(responses) => Self::api_link_state(&responses, port),
            Reply::Text(text) => parse::console_link_state(&text).map(Some).ok_or_else(|| {
                SwitchError::LinkStatus {
                    dialect: DIALECT.name,
                    port: port.to_string(),
                }
                .into()
            }),
        }
    }

    async fn get_port_speed(&mut self, port: &str) -> Result<u32> {
        DIALECT.ports.ensure_either(port)?;
        let reply = self
            .session
            .send_command(&format!("show interface {port} status"))
            .await?;
        let speed = match &reply {
            Reply::Json(responses) => parse::result(responses)
                .and_then(|result| parse::row(result, "interface"))
                .and_then(|row| parse::field(row, "speed"))
                .and_then(speed_token),
            Reply::Text(text) => parse::console_speed(text),
        };
        speed.ok_or_else(|| SwitchError::PortSpeed(port.to_string()).into())
    }

    async fn get_port_by_mac(&mut self, mac: &str) -> Result<String> {
        Ok(self.mac_entry(mac).await?.1)
    }

    async fn get_vlan_by_mac(&mut self, mac: &str) -> Result<u16> {
        Ok(self.mac_entry(mac).await?.0)
    }

    async fn get_lldp_neighbors(&mut self) -> Result<Vec<LldpNeighbor>> {
        let output = self.session.send_text("show lldp neighbors").await?;
        Ok(console::lldp_neighbors(&output))
    }

    async fn show_port_running_config(&mut self, port: &str) -> Result<String> {
        DIALECT.ensure_ports(port)?;
        self.session
            .send_text(&format!("show running-config interface {port}"))
            .await
    }

    async fn show_vlans(&mut self, vlans: &[u16]) -> Result<String> {
        self.session.send_text(&cli::show_vlans(vlans)).await
    }

    async fn configure_vlan(&mut self, config: &VlanConfig) -> Result<()> {
        if config.mode == SwitchportMode::Hybrid {
            return Err(Error::invalid(format!("Incorrect switchport mode: {}", config.mode)));
        }
        self.validate_configure_parameters(
            &PortParameters::new(&config.ports)
                .mode(config.mode)
                .vlan(config.vlan)
                .vlan_type(config.vlan_type),
        )?;
        self.session
            .send_command_list(&cli::configure_vlan(config))
            .await?;
        Ok(())
    }

    async fn default_ports(&mut self, ports: &str) -> Result<()> {
        self.validate_configure_parameters(&PortParameters::new(ports))?;
        self.session.send_command_list(&cli::default_ports(ports)).await?;
        Ok(())
    }

    async fn shutdown(&mut self, shutdown: bool, port: &str) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        self.session
            .send_command_list(&cli::shutdown(shutdown, port))
            .await?;
        Ok(())
    }

    async fn create_port_channel_interface(&mut self, number: u32) -> Result<()> {
        DIALECT.ensure_port_channel_number(number)?;
        self.session
            .send_command_list(&cli::create_port_channel(number))
            .await?;
        Ok(())
    }

    async fn remove_port(&mut self, port: &str) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        self.session.send_command_list(&cli::remove_port(port)).await?;
        Ok(())
    }

    async fn add_port_to_channel_group(
        &mut self,
        port: &str,
        number: u32,
        mode: Option<ChannelGroupMode>,
        force: bool,
    ) -> Result<()> {
        DIALECT.ensure_port_channel_number(number)?;
        DIALECT.ports.ensure_ethernet(port)?;
        self.session
            .send_command_list(&cli::channel_group(port, number, mode, force))
            .await?;
        Ok(())
    }

    async fn remove_port_from_port_channel(&mut self, port: &str) -> Result<()> {
        DIALECT.ports.ensure_ethernet(port)?;
        self.session
            .send_command_list(&cli::remove_channel_group(port))
            .await?;
        Ok(())
    }

    async fn show_port_channel_summary(&mut self, number: Option<u32>) -> Result<String> {
        if let Some(number) = number {
            DIALECT.ensure_port_channel_number(number)?;
        }
        self.session
            .send_text(&cli::show_port_channel_summary(number))
            .await
    }

    async fn set_switchport_mode(&mut self, port: &str, mode: SwitchportMode) -> Result<()> {
        if mode == SwitchportMode::Hybrid {
            return Err(Error::invalid(format!("Incorrect switchport mode: {mode}")));
        }
        DIALECT.ports.ensure_either(port)?;
        self.session
            .send_command_list(&cli::set_switchport_mode(port, mode))
            .await?;
        Ok(())
    }

    async fn set_lacp_rate(&mut self, port: &str, rate: LacpRate) -> Result<()> {
        DIALECT.ports.ensure_ethernet(port)?;
        self.session.send_command_list(&cli::lacp_rate(port, rate)).await?;
        Ok(())
    }

    async fn disable_lacp_rate(&mut self, port: &str, rate: Option<LacpRate>) -> Result<()> {
        DIALECT.ports.ensure_ethernet(port)?;
        self.session
            .send_command_list(&cli::no_lacp_rate(port, rate))
            .await?;
        Ok(())
    }

    async fn configure_lldp(&mut self, port: &str, directions: &[LldpDirection]) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        self.session
            .send_configuration(&cli::configure_lldp(port, directions))
            .await?;
        Ok(())
    }

    async fn set_port_flowcontrol(&mut self, port: &str, rx: bool, tx: bool) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        self.session
            .send_command_list(&cli::flowcontrol(port, rx, tx))
            .await?;
        Ok(())
    }

    async fn show_port_dcbx(&mut self, port: &str) -> Result<String> {
        DIALECT.ports.ensure_either(port)?;
        self.session
            .send_text(&format!("show lldp dcbx interface {port}"))
            .await
    }

    async fn set_port_dcbx_version(&mut self, port: &str, version: DcbxVersion) -> Result<()> {
        self.change_dcbx(port, commands::dcbx_version(port, version))
            .await
    }

    async fn clear_port_dcbx(&mut self, port: &str) -> Result<()> {
        self.change_dcbx(port, commands::clear_dcbx(port)).await
    }

    async fn set_port_pfc_by_tc(&mut self, port: &str, priority: u8, pfc: PfcMode) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        validate::priority(priority)?;
        self.session
            .send_command_list(&commands::pfc_mode(port, pfc))
            .await?;
        Ok(())
    }

    async fn delete_port_pfc(&mut self, port: &str) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        self.session
            .send_command_list(&commands::no_pfc_mode(port))
            .await?;
        Ok(())
    }

    async fn create_qos_policy(&mut self, bandwidth: &[u8], up2tc: &[u8], suffix: &str) -> Result<()> {
        DIALECT.ensure_traffic_class_count(bandwidth.len())?;
        DIALECT.ensure_traffic_class_count(up2tc.len())?;
        for tc in up2tc {
            DIALECT.ensure_traffic_class(*tc)?;
        }
        validate::bandwidth_total(bandwidth.iter().copied())?;

        self.session
            .send_command_list(&commands::queuing_policy(bandwidth, up2tc, suffix))
            .await?;
        self.session
            .send_command_list(&commands::class_maps(up2tc, suffix))
            .await?;
        self.session
            .send_command_list(&commands::qos_policy(up2tc, suffix))
            .await?;
        Ok(())
    }

    async fn delete_qos_policy(&mut self, suffix: &str) -> Result<()> {
        self.session
            .send_command_list(&commands::delete_qos_policy(suffix))
            .await?;
        Ok(())
    }

    async fn set_port_bw_by_tc(&mut self, port: &str, suffix: &str) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        self.session
            .send_command_list(&commands::attach_policies(port, suffix))
            .await?;
        Ok(())
    }

    async fn delete_port_bw_by_tc(&mut self, port: &str, suffix: &str) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        self.session
            .send_command_list(&commands::detach_policies(port, suffix))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::connection::testing::{Call, CallLog, ScriptedConnection};
    use crate::session::LinkWait;

    const CONSOLE_TABLE: &str = "\
Legend:
        * - primary entry, G - Gateway MAC, (R) - Routed MAC, O - Overlay MAC
        age - seconds since last seen,+ - primary entry using vPC Peer-Link,
        (T) - True, (F) - False, C - ControlPlane MAC, ~ - vsan
   VLAN     MAC Address      Type      age     Secure NTFY Ports
---------+-----------------+--------+---------+------+----+------------------
*    1     0050.566e.db34   dynamic  0         F      F    Eth1/49";

    fn nxos<I, R>(replies: I) -> (CiscoNxos, CallLog)
    where
        I: IntoIterator<Item = R>,
        R: Into<Reply>,
    {
        let connection = ScriptedConnection::new().replies(replies);
        let log = connection.log();
        let session = Session::new(connection).with_link_wait(LinkWait {
            timeout: Duration::from_millis(100),
            interval: Duration::from_millis(1),
            hold_probes: 3,
        });
        (CiscoNxos::new(session), log)
    }

    fn api(value: Value) -> Reply {
        Reply::Json(vec![value])
    }

    fn mac_table() -> Reply {
        api(json!({
            "jsonrpc": "2.0",
            "result": {"body": {"TABLE_mac_address": {"ROW_mac_address": {
                "disp_mac_addr": "0050.5663.b4d8",
                "disp_type": "* ",
                "disp_vlan": "144",
                "disp_is_static": "disabled",
                "disp_age": "0",
                "disp_is_secure": "disabled",
                "disp_is_ntfy": "disabled",
                "disp_port": "Ethernet1/5/2"
            }}}},
            "id": 1
        }))
    }

    fn not_found() -> Reply {
        api(json!({"jsonrpc": "2.0", "result": null, "id": 1}))
    }

    fn interface_state(state: &str) -> Reply {
        api(json!({
            "jsonrpc": "2.0",
            "result": {"body": {"TABLE_interface": {"ROW_interface": {
                "interface": "Ethernet1/1/1",
                "vlan": "100",
                "type": "eth",
                "portmode": "trunk",
                "state": state,
                "state_rsn_desc": "Administratively down",
                "speed": "auto",
                "ratemode": "D"
            }}}},
            "id": 1
        }))
    }

    #[tokio::test]
    async fn test_mac_lookup_console() {
        let (mut switch, log) = nxos([CONSOLE_TABLE, CONSOLE_TABLE]);
        assert_eq!(switch.get_port_by_mac("00:AA:BB:CC:DD:EE").await.unwrap(), "Eth1/49");
        assert_eq!(switch.get_vlan_by_mac("00:AA:BB:CC:DD:EE").await.unwrap(), 1);
        assert_eq!(
            log.last(),
            Some(Call::command("show mac address-table address 00aa.bbcc.ddee"))
        );
    }

    #[tokio::test]
    async fn test_mac_lookup_console_not_found() {
        let empty = CONSOLE_TABLE.lines().take(6).collect::<Vec<_>>().join("\n");
        let (mut switch, _) = nxos([empty.as_str(), ""]);

        let err = switch.get_port_by_mac("00:AA:BB:CC:EE:DD").await.unwrap_err();
        assert!(
            err.to_string()
                .contains("Could not find MAC address 00aa.bbcc.eedd on address-table.")
        );
        let err = switch.get_vlan_by_mac("00:AA:BB:CC:BB:CC").await.unwrap_err();
        assert!(
            err.to_string()
                .contains("Could not find MAC address 00aa.bbcc.bbcc on address-table.")
        );
    }

    #[tokio::test]
    async fn test_mac_lookup_api() {
        let (mut switch, _) = nxos([mac_table(), mac_table()]);
        assert_eq!(
            switch.get_port_by_mac("00:AA:BB:CC:EE:DD").await.unwrap(),
            "Ethernet1/5/2"
        );
        assert_eq!(switch.get_vlan_by_mac("00:AA:BB:CC:EE:DD").await.unwrap(), 144);
    }

    #[tokio::test]
    async fn test_mac_lookup_api_not_found() {
        let (mut switch, _) = nxos([not_found(), Reply::Json(vec![])]);
        for _ in 0..2 {
            let err = switch.get_port_by_mac("00:AA:BB:CC:EE:DD").await.unwrap_err();
            assert!(
                err.to_string()
                    .contains("Could not find MAC address 00aa.bbcc.eedd on address-table.")
            );
        }
    }

    #[tokio::test]
    async fn test_is_port_linkup_api() {
        let (mut switch, _) = nxos([interface_state("up"), interface_state("down")]);
        assert_eq!(switch.is_port_linkup("Ethernet1/1/1").await.unwrap(), Some(true));
        assert_eq!(switch.is_port_linkup("Ethernet1/1/1").await.unwrap(), Some(false));
    }

    #[tokio::test]
    async fn test_is_port_linkup_api_errors() {
        let (mut switch, _) = nxos([
            Reply::Json(vec![]),
            interface_state("unknown"),
            not_found(),
            api(json!({"jsonrpc": "2.0", "result": {"body": {}}, "id": 1})),
        ]);
        let port = "Ethernet1/1/1";

        let err = switch.is_port_linkup(port).await.unwrap_err();
        assert!(
            err.to_string()
                .contains("State of port: Ethernet1/1/1 not found, API response may be corrupted.")
        );
        let err = switch.is_port_linkup(port).await.unwrap_err();
        assert!(
            err.to_string()
                .contains("Unable to read state of': Cisco_NXOS; interface: Ethernet1/1/1")
        );
        let err = switch.is_port_linkup(port).await.unwrap_err();
        assert!(
            err.to_string()
                .contains("Could not find port Ethernet1/1/1 in switch interfaces.")
        );
        let err = switch.is_port_linkup(port).await.unwrap_err();
        assert!(
            err.to_string()
                .contains("Link status parsing error on: Cisco_NXOS; interface: Ethernet1/1/1")
        );
    }

    #[tokio::test]
    async fn test_is_port_linkup_console() {
        let (mut switch, _) = nxos(["down"]);
        assert_eq!(switch.is_port_linkup("Ethernet1/1/1").await.unwrap(), Some(false));
    }

    #[tokio::test]
    async fn test_qos_policy_lifecycle() {
        let (mut switch, log) = nxos(Vec::<Reply>::new());
        switch
            .create_qos_policy(&[80, 20, 0, 0, 0, 0, 0, 0], &[0, 0, 0, 1, 0, 0, 0, 0], "A")
            .await
            .unwrap();
        assert_eq!(
            log.calls(),
            vec![
                Call::list(&[
                    "configure terminal",
                    "policy-map type queuing IN_A",
                    "class type queuing c-in-q-default",
                    "bandwidth percent 80",
                    "class type queuing c-in-q1",
                    "bandwidth percent 20",
                ]),
                Call::list(&[
                    "configure terminal",
                    "class-map type qos match-all TC0_A",
                    "match cos 0,1,2,4,5,6,7",
                    "class-map type qos match-all TC1_A",
                    "match cos 3",
                ]),
                Call::list(&[
                    "configure terminal",
                    "policy-map type qos QOS_A",
                    "class TC0_A",
                    "set qos-group 0",
                    "class TC1_A",
                    "set qos-group 1",
                ]),
            ]
        );

        switch.set_port_bw_by_tc("eth2/12", "A").await.unwrap();
        assert_eq!(
            log.last(),
            Some(Call::list(&[
                "configure terminal",
                "interface eth2/12",
                "service-policy type qos input QOS_A",
                "service-policy type queuing input IN_A",
            ]))
        );

        switch.delete_port_bw_by_tc("eth2/12", "A").await.unwrap();
        assert_eq!(
            log.last(),
            Some(Call::list(&[
                "configure terminal",
                "interface eth2/12",
                "no service-policy type qos input QOS_A",
                "no service-policy type queuing input IN_A",
            ]))
        );
    }

    #[tokio::test]
    async fn test_create_qos_policy_rejects_oversubscription() {
        let (mut switch, log) = nxos(Vec::<Reply>::new());
        let err = switch
            .create_qos_policy(&[80, 30], &[0, 1], "A")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(log.calls().is_empty());
    }

    #[tokio::test]
    async fn test_pfc_and_dcbx_show() {
        let (mut switch, log) = nxos(Vec::<Reply>::new());
        switch.set_port_pfc_by_tc("eth2/12", 1, PfcMode::On).await.unwrap();
        assert_eq!(
            log.last(),
            Some(Call::list(&[
                "configure terminal",
                "interface eth2/12",
                "priority-flow-control mode on",
            ]))
        );
        switch.show_port_dcbx("eth2/12").await.unwrap();
        assert_eq!(log.last(), Some(Call::command("show lldp dcbx interface eth2/12")));
        assert!("up".parse::<PfcMode>().is_err());
    }

    #[tokio::test]
    async fn test_dcbx_changes_flap_the_port() {
        let (mut switch, log) = nxos(["", "", "", "up", "up", "up"]);
        switch.set_port_dcbx_version("eth2/2", DcbxVersion::Cee).await.unwrap();

        let calls = log.calls();
        assert_eq!(
            &calls[..3],
            &[
                Call::list(&["configure terminal", "interface eth2/2", "shutdown"]),
                Call::list(&["configure terminal", "interface eth2/2", "lldp dcbx version cee"]),
                Call::list(&["configure terminal", "interface eth2/2", "no shutdown"]),
            ]
        );
        assert_eq!(calls.len(), 6);

        let (mut switch, log) = nxos(["", "", "", "up", "up", "up"]);
        switch.clear_port_dcbx("eth2/2").await.unwrap();
        assert_eq!(
            log.calls()[1],
            Call::list(&[
                "configure terminal",
                "interface eth2/2",
                "no lldp dcbx version cee",
                "no lldp dcbx version ieee",
            ])
        );
    }

    #[tokio::test]
    async fn test_dcbx_change_times_out_when_link_stays_down() {
        let mut replies = vec!["", "", ""];
        replies.extend(["down"; 500]);
        let (mut switch, _) = nxos(replies);
        let err = switch
            .set_port_dcbx_version("eth2/2", DcbxVersion::Ieee)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::LinkStateTimeout { .. }));
    }

    #[tokio::test]
    async fn test_port_channels() {
        let (mut switch, log) = nxos(Vec::<Reply>::new());
        switch.create_port_channel_interface(1024).await.unwrap();
        switch.remove_port("port-channel 82").await.unwrap();
        switch.show_port_channel_summary(None).await.unwrap();
        switch.show_port_channel_summary(Some(1024)).await.unwrap();

        assert_eq!(
            log.calls(),
            vec![
                Call::list(&["configure terminal", "interface port-channel 1024"]),
                Call::list(&["configure terminal", "no interface port-channel 82"]),
                Call::command("show port-channel summary"),
                Call::command("show port-channel summary interface port-channel 1024"),
            ]
        );

        for number in [0, 4097] {
            let err = switch.create_port_channel_interface(number).await.unwrap_err();
            assert!(
                err.to_string()
                    .contains("Port channel interface number should be integer in range 1-4096")
            );
        }
    }

    #[tokio::test]
    async fn test_set_switchport_mode() {
        for port in ["Eth1/1/1", "port-channel 10"] {
            let (mut switch, log) = nxos(Vec::<Reply>::new());
            switch.set_switchport_mode(port, SwitchportMode::Trunk).await.unwrap();
            assert_eq!(
                log.last(),
                Some(Call::CommandList(vec![
                    "configure terminal".to_string(),
                    format!("interface {port}"),
                    "switchport mode trunk".to_string(),
                ]))
            );
        }
        let err = "not_allowed_mode".parse::<SwitchportMode>().unwrap_err();
        assert!(err.to_string().contains("Incorrect switchport mode"));
    }

    #[tokio::test]
    async fn test_add_port_to_channel_group() {
        let (mut switch, log) = nxos(Vec::<Reply>::new());
        let port = "Eth1/1/1";

        switch.add_port_to_channel_group(port, 1000, None, false).await.unwrap();
        assert_eq!(
            log.last(),
            Some(Call::list(&["configure terminal", "interface Eth1/1/1", "channel-group 1000"]))
        );

        switch.add_port_to_channel_group(port, 1000, None, true).await.unwrap();
        assert_eq!(
            log.last(),
            Some(Call::list(&[
                "configure terminal",
                "interface Eth1/1/1",
                "channel-group 1000 force",
            ]))
        );

        for mode in ["active", "on", "passive"] {
            let parsed: ChannelGroupMode = mode.parse().unwrap();
            switch
                .add_port_to_channel_group(port, 1000, Some(parsed), false)
                .await
                .unwrap();
            assert_eq!(
                log.last(),
                Some(Call::CommandList(vec![
                    "configure terminal".to_string(),
                    "interface Eth1/1/1".to_string(),
                    format!("channel-group 1000 mode {mode}"),
                ]))
            );
        }

        let err = switch
            .add_port_to_channel_group("port-channel 10", 1000, None, false)
            .await
            .unwrap_err();
        assert!(
            err.to_string()
                .contains("Port is not in ethernet port syntax! port-channel 10")
        );
    }

    #[tokio::test]
    async fn test_lacp_rate() {
        let (mut switch, log) = nxos(Vec::<Reply>::new());
        for rate in [LacpRate::Fast, LacpRate::Normal] {
            switch.set_lacp_rate("Eth1/1/1", rate).await.unwrap();
            assert_eq!(
                log.last(),
                Some(Call::CommandList(vec![
                    "configure terminal".to_string(),
                    "interface Eth1/1/1".to_string(),
                    format!("lacp rate {rate}"),
                ]))
            );
        }

        switch.disable_lacp_rate("Eth1/1/1", None).await.unwrap();
        assert_eq!(
            log.last(),
            Some(Call::list(&["configure terminal", "interface Eth1/1/1", "no lacp rate"]))
        );

        for result in [
            switch.set_lacp_rate("port-channel 10", LacpRate::Fast).await,
            switch.disable_lacp_rate("port-channel 10", None).await,
        ] {
            assert!(
                result
                    .unwrap_err()
                    .to_string()
                    .contains("Port is not in ethernet port syntax! port-channel 10")
            );
        }
    }

    #[tokio::test]
    async fn test_port_scoped_operations_reject_bad_port_names() {
        let (mut switch, log) = nxos(Vec::<Reply>::new());
        for port in ["", "bogus", "Eth1", "Ethernet1/1; reload"] {
            for err in [
                switch.shutdown(true, port).await.unwrap_err(),
                switch.is_port_linkup(port).await.unwrap_err(),
                switch.get_port_speed(port).await.unwrap_err(),
                switch.set_port_flowcontrol(port, true, true).await.unwrap_err(),
                switch.configure_lldp(port, &[]).await.unwrap_err(),
                switch.show_port_dcbx(port).await.unwrap_err(),
                switch.set_port_pfc_by_tc(port, 3, PfcMode::On).await.unwrap_err(),
                switch.set_port_bw_by_tc(port, "A").await.unwrap_err(),
                switch.show_port_running_config(port).await.unwrap_err(),
            ] {
                assert!(matches!(err, Error::Validation(_)), "{port}: {err}");
            }
        }
        assert!(log.calls().is_empty());
    }

    #[tokio::test]
    async fn test_create_qos_policy_rejects_unknown_traffic_class() {
        let (mut switch, log) = nxos(Vec::<Reply>::new());
        let err = switch
            .create_qos_policy(&[50, 50], &[0, 1, 2, 3, 4, 5, 6, 9], "A")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Traffic class should be integer in range 0-7, got 9"));
        assert!(log.calls().is_empty());
    }
}

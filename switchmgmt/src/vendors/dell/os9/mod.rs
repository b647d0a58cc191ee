//! Dell Networking OS9 (FTOS) and its Force10 and S5048 variants.

mod commands;
mod parse;

use async_trait::async_trait;
use log::debug;
use once_cell::sync::Lazy;

use crate::config::SwitchConfig;
use crate::dialect::{Dialect, PortSyntax};
use crate::error::{Error, Result, SwitchError};
use crate::mac::MacFormat;
use crate::session::Session;
use crate::switch::Switch;
use crate::types::{LldpNeighbor, SwitchportMode, VlanConfig};
use crate::validate::{self, PortParameters};
use crate::vendors::cisco::parse::line_protocol;

const ETHERNET: &str = r"(?i)^(gi|te|tw|tf|fo|fi|hu|gigabitethernet|tengigabitethernet|twentyfivegige|fortygige|fiftygige|hundredgige) ?\d+(/\d+){1,2}$";
const PORT_CHANNEL: &str = r"(?i)^(po|port-channel) ?\d+$";
const PORTS: &str = r"(?i)^(((gi|te|fo|tw|tf|fi|hu|gigabitethernet|tengigabitethernet|twentyfivegige|fortygige|fiftygige|hundredgige) ?(\d+/){1,2}\d+)( ?- ?(\d+/)*\d+)?( ?, ?((gi|te|fo|tw|tf|fi|hu|gigabitethernet|tengigabitethernet|twentyfivegige|fortygige|fiftygige|hundredgige) ?(\d+/){1,2}\d+)( ?- ?(\d+/)*\d+)?)*|(po|port-channel) ?\d+)$";

static DIALECT: Lazy<Dialect> = Lazy::new(|| Dialect {
    name: "DellOS9",
    ports: PortSyntax::new(ETHERNET, PORT_CHANNEL, PORTS).expect("DellOS9 port patterns are valid"),
    mac_format: MacFormat::Colon,
    port_channel_max: 128,
    traffic_classes: 8,
    max_frame_size: 9416,
});

/// Hardware family, which decides where link state and speed are read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DellOs9Model {
    /// `show interfaces <p>` for both.
    #[default]
    Generic,
    /// Speed from the `status` table.
    Force10,
    /// Link state and speed from the `status` table.
    S5048,
}

/// A Dell OS9 switch.
pub struct DellOs9 {
    session: Session,
    model: DellOs9Model,
}

impl DellOs9 {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            model: DellOs9Model::default(),
        }
    }

    pub fn with_model(mut self, model: DellOs9Model) -> Self {
        self.model = model;
        self
    }

    pub fn model(&self) -> DellOs9Model {
        self.model
    }

    pub async fn connect(config: &SwitchConfig) -> Result<Self> {
        Ok(Self::new(Session::open(config).await?))
    }

    async fn mac_table(&mut self, mac: &str) -> Result<(String, Option<(u16, String)>)> {
        let mac = self.change_standard_to_switch_mac_address(mac)?;
        let output = self.session.send_text("show mac-address-table").await?;
        let entry = super::mac_entry(&output, &mac);
        Ok((mac, entry))
    }

    /// PFC counter of one priority, as printed.
    pub async fn get_pfc_port_statistics(&mut self, port: &str, priority: u8) -> Result<String> {
        DIALECT.ports.ensure_either(port)?;
        validate::priority(priority)?;
        let output = self
            .session
            .send_text(&format!("show interfaces {port} pfc statistics"))
            .await?;
        parse::pfc_statistic(&output, priority).ok_or_else(|| {
            Error::unexpected(format!(
                "Could not find port statistics for port {port} from pfc"
            ))
        })
    }

    /// Name of the dcb-map applied to `port`.
    pub async fn get_port_dcb_map(&mut self, port: &str) -> Result<String> {
        let output = self.show_port_running_config(port).await?;
        parse::dcb_map(&output)
            .ok_or_else(|| Error::unexpected(format!("Could not find dcb-map on port {port}")))
    }

    pub async fn create_qos_conf_on_switch_port(&mut self, port: &str) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        self.session
            .send_configuration(&commands::qos_port_profile(port, DIALECT.max_frame_size))
            .await?;
        Ok(())
    }

    pub async fn remove_qos_conf_on_switch_port(&mut self, port: &str) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        self.session
            .send_configuration(&commands::remove_qos_port_profile(port))
            .await?;
        Ok(())
    }

    pub async fn set_tagged_vlan_on_switch_port(&mut self, vlan: u16, port: &str) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        validate::vlan_id(vlan)?;
        self.session
            .send_configuration(&commands::tagged_vlan(vlan, port))
            .await?;
        Ok(())
    }

    /// Enable FEC and report whether the running config shows it.
    pub async fn enable_fec(&mut self, port: &str) -> Result<bool> {
        DIALECT.ports.ensure_either(port)?;
        self.session
            .send_command_list(&lines!["configure terminal", format!("interface {port}")])
            .await?;
        self.session.send_command_list(&lines!["fec enable", "end"]).await?;
        let config = self.show_port_running_config(port).await?;
        Ok(config.contains("fec enable"))
    }

    /// Stop advertising the iSCSI application TLV on `port`.
    pub async fn disabling_iscsi_app(&mut self, port: &str) -> Result<()> {
        self.validate_configure_parameters(&PortParameters::new(port))?;
        self.session
            .send_configuration(&commands::disable_iscsi_tlv(port))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl Switch for DellOs9 {
    fn dialect(&self) -> &'static Dialect {
        &DIALECT
    }

    fn session(&mut self) -> &mut Session {
        &mut self.session
    }

    async fn is_port_linkup(&mut self, port: &str) -> Result<Option<bool>> {
        DIALECT.ports.ensure_either(port)?;
        let state = match self.model {
            DellOs9Model::S5048 => {
                let output = self
                    .session
                    .send_text(&format!("show interfaces {port} status"))
                    .await?;
                parse::status_state(&output, port)
            }
            DellOs9Model::Generic | DellOs9Model::Force10 => {
                let output = self.session.send_text(&format!("show interfaces {port}")).await?;
                line_protocol(&output)
            }
        };
        state.ok_or_else(|| {
            SwitchError::LinkStatus {
                dialect: DIALECT.name,
                port: port.to_string(),
            }
            .into()
        })
    }

    async fn get_port_speed(&mut self, port: &str) -> Result<u32> {
        DIALECT.ports.ensure_either(port)?;
        let speed = match self.model {
            DellOs9Model::Generic => {
                let output = self.session.send_text(&format!("show interfaces {port}")).await?;
                parse::line_speed(&output)
            }
            DellOs9Model::Force10 | DellOs9Model::S5048 => {
                let output = self
                    .session
                    .send_command_list(&lines![format!("show interfaces {port} status")])
                    .await?
                    .into_text();
                parse::status_speed(&output, port)
            }
        };
        speed.ok_or_else(|| SwitchError::PortSpeed(port.to_string()).into())
    }

    async fn get_port_by_mac(&mut self, mac: &str) -> Result<String> {
        match self.mac_table(mac).await? {
            (_, Some((_, port))) => Ok(port),
            (mac, None) => Err(SwitchError::PortForMacNotFound(mac).into()),
        }
    }

    async fn get_vlan_by_mac(&mut self, mac: &str) -> Result<u16> {
        match self.mac_table(mac).await? {
            (_, Some((vlan, _))) => Ok(vlan),
            (mac, None) => Err(SwitchError::VlanForMacNotFound(mac).into()),
        }
    }

    async fn get_lldp_neighbors(&mut self) -> Result<Vec<LldpNeighbor>> {
        let output = self.session.send_text("show lldp neighbors").await?;
        let neighbors = parse::lldp_neighbors(&output);
        debug!("{} LLDP neighbors", neighbors.len());
        Ok(neighbors)
    }

    async fn show_port_running_config(&mut self, port: &str) -> Result<String> {
        DIALECT.ensure_ports(port)?;
        self.session
            .send_text(&format!("show running-config interface {port}"))
            .await
    }

    async fn show_vlans(&mut self, vlans: &[u16]) -> Result<String> {
        self.session.send_text(&commands::show_vlans(vlans)).await
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
            .send_configuration(&commands::configure_vlan(config))
            .await?;
        Ok(())
    }

    async fn shutdown(&mut self, shutdown: bool, port: &str) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        self.session
            .send_configuration(&commands::shutdown(shutdown, port))
            .await?;
        Ok(())
    }

    async fn set_port_flowcontrol(&mut self, port: &str, rx: bool, tx: bool) -> Result<()> {
        DIALECT.ports.ensure_either(port)?;
        self.session
            .send_configuration(&commands::flowcontrol(port, rx, tx))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::testing::{Call, CallLog, ScriptedConnection};
    use crate::error::ValidationError;

    fn dell(model: DellOs9Model, replies: &[&str]) -> (DellOs9, CallLog) {
        let connection = ScriptedConnection::new().replies(replies.iter().copied());
        let log = connection.log();
        (DellOs9::new(Session::new(connection)).with_model(model), log)
    }

    const MAC_TABLE: &str = "
Codes: *N - VLT Peer Synced MAC
*I - Internal MAC Address used for Inter Process Communication
VlanId     Mac Address           Type          Interface        State
 1      aa:bb:cc:dd:ee:ff       Dynamic         Te 0/32         Active
";

    #[tokio::test]
    async fn test_get_port_by_mac() {
        let (mut switch, log) = dell(DellOs9Model::Generic, &[MAC_TABLE]);
        assert_eq!(switch.get_port_by_mac("AA-BB-CC-DD-EE-FF").await.unwrap(), "Te 0/32");
        assert_eq!(log.last(), Some(Call::command("show mac-address-table")));
    }

    #[tokio::test]
    async fn test_get_port_by_mac_not_found() {
        let header_only = MAC_TABLE.lines().take(4).collect::<Vec<_>>().join("\n");
        let (mut switch, _) = dell(DellOs9Model::Generic, &[header_only.as_str()]);
        let err = switch.get_port_by_mac("aa:bb:cc:dd:ee:ff").await.unwrap_err();
        assert!(
            err.to_string()
                .contains("Could not find port for MAC address aa:bb:cc:dd:ee:ff")
        );

        let (mut switch, _) = dell(DellOs9Model::Generic, &[header_only.as_str()]);
        let err = switch.get_vlan_by_mac("aa:bb:cc:dd:ee:ff").await.unwrap_err();
        assert!(matches!(err, Error::Switch(SwitchError::VlanForMacNotFound(_))));
    }

    #[tokio::test]
    async fn test_get_port_by_mac_invalid_mac() {
        let (mut switch, log) = dell(DellOs9Model::Generic, &[]);
        let err = switch.get_port_by_mac("ZZ:ZZ:ZZ:ZZ:ZZ:ZZ").await.unwrap_err();
        assert!(err.to_string().contains("Incorrect MAC address: ZZ:ZZ:ZZ:ZZ:ZZ:ZZ"));
        assert!(log.calls().is_empty());
    }

    #[tokio::test]
    async fn test_get_vlan_by_mac() {
        let (mut switch, _) = dell(DellOs9Model::Generic, &[MAC_TABLE]);
        assert_eq!(switch.get_vlan_by_mac("aa:bb:cc:dd:ee:ff").await.unwrap(), 1);
    }

    #[test]
    fn test_port_syntax() {
        for port in ["Tw1/41", "Tw 1/42", "te 0/1", "Hu 1/1/1", "hundredGigE 1/3", "TenGigabitEthernet 0/1"] {
            assert!(DIALECT.ports.ensure_ethernet(port).is_ok(), "{port}");
        }
        for ports in ["te1/1/1", "te 0/1 - 0/4", "te 0/1, fo 0/2", "po 10"] {
            assert!(DIALECT.ensure_ports(ports).is_ok(), "{ports}");
        }
        assert!(matches!(
            DIALECT.ensure_ports("eth1/1"),
            Err(Error::Validation(ValidationError::PortSyntax { .. }))
        ));
    }

    #[tokio::test]
    async fn test_set_port_flowcontrol() {
        let (mut switch, log) = dell(DellOs9Model::Force10, &[]);
        switch.set_port_flowcontrol("Te2/1", true, false).await.unwrap();
        assert_eq!(
            log.last(),
            Some(Call::config(&["interface Te2/1", "flowcontrol rx on tx off"]))
        );
    }

    #[tokio::test]
    async fn test_get_pfc_port_statistics() {
        let output = "Tf 1/13         P0              1611                    39371414                21888305";
        let (mut switch, _) = dell(DellOs9Model::Force10, &[output]);
        assert_eq!(
            switch.get_pfc_port_statistics("Tw 1/13", 0).await.unwrap(),
            "1611"
        );

        let (mut switch, log) = dell(DellOs9Model::Force10, &[]);
        assert!(switch.get_pfc_port_statistics("Tw 1/13", 8).await.is_err());
        assert!(log.calls().is_empty());

        let (mut switch, _) = dell(DellOs9Model::Force10, &[""]);
        let err = switch.get_pfc_port_statistics("Tw 1/13", 0).await.unwrap_err();
        assert!(
            err.to_string()
                .contains("Could not find port statistics for port Tw 1/13 from pfc")
        );
    }

    #[tokio::test]
    async fn test_get_port_dcb_map() {
        let (mut switch, _) = dell(DellOs9Model::Force10, &["dcb-map LINUX_ETS", ""]);
        assert_eq!(switch.get_port_dcb_map("Tw 1/13").await.unwrap(), "LINUX_ETS");
        assert!(switch.get_port_dcb_map("Te 1/22").await.is_err());
    }

    #[tokio::test]
    async fn test_get_lldp_neighbors() {
        let output = "
Loc PortID   Rem Host Name     Rem Port Id                   Rem Chassis Id
-------------------------------------------------------------------------

Te 0/12      foo               3c:fd:fe:aa:bb:cc             3c:fd:fe:aa:bb:cc
Fo 0/60      LIN-ND2-C6004     Eth1/12                       b4:e9:b0:cc:bb:aa
Ma 0/0       jf3418-1B3-tor    5                             00:04:96:dd:ff:aa
";
        let (mut switch, _) = dell(DellOs9Model::Force10, &[output]);
        let neighbors = switch.get_lldp_neighbors().await.unwrap();
        assert_eq!(neighbors.len(), 3);
        assert_eq!(neighbors[0].loc_portid, "Te 0/12");
        assert_eq!(neighbors[1].rem_sysname.as_deref(), Some("LIN-ND2-C6004"));
        assert_eq!(neighbors[2].rem_devid.as_deref(), Some("00:04:96:dd:ff:aa"));
    }

    #[tokio::test]
    async fn test_force10_port_speed() {
        let output = "
Port Description Status Speed Duplex Vlan
Fo 1/22/1 6H-c4-n3 le Up 40000 Mbit Full 1313
";
        let (mut switch, log) = dell(DellOs9Model::Force10, &[output]);
        assert_eq!(switch.get_port_speed("Fo 1/22/1").await.unwrap(), 40000);
        assert_eq!(log.last(), Some(Call::list(&["show interfaces Fo 1/22/1 status"])));

        let corrupted = "
Port Description Status Speed Duplex Vlan
Fo 1/22/1 6H-c4-n3 le Up 4000
";
        let (mut switch, _) = dell(DellOs9Model::Force10, &[corrupted]);
        let err = switch.get_port_speed("Fo 1/22/1").await.unwrap_err();
        assert!(err.to_string().contains("Couldn't retrieve port speed for port"));
    }

    #[tokio::test]
    async fn test_generic_port_speed_and_link() {
        let output = "TenGigabitEthernet 0/1 is up, line protocol is up
Hardware is DellEth, address is 00:01:e8:aa:bb:cc
LineSpeed 10000 Mbit, Mode full duplex";
        let (mut switch, log) = dell(DellOs9Model::Generic, &[output, output]);
        assert_eq!(switch.get_port_speed("te 0/1").await.unwrap(), 10000);
        assert_eq!(switch.is_port_linkup("te 0/1").await.unwrap(), Some(true));
        assert_eq!(log.last(), Some(Call::command("show interfaces te 0/1")));
    }

    #[tokio::test]
    async fn test_s5048_is_port_linkup() {
        let up = "\
Port                 Description  Status Speed        Duplex Vlan
Te 1/4/1                          Up     10000 Mbit   Full   3260";
        let down = "\
Port                 Description  Status Speed        Duplex Vlan
Hu 1/1                            Down   100000 Mbit  Auto   --";
        let (mut switch, _) = dell(DellOs9Model::S5048, &[up, down, ""]);
        assert_eq!(switch.is_port_linkup("Te 1/4/1").await.unwrap(), Some(true));
        assert_eq!(switch.is_port_linkup("Hu 1/1").await.unwrap(), Some(false));
        assert!(matches!(
            switch.is_port_linkup("Te 1/4/1").await,
            Err(Error::Switch(SwitchError::LinkStatus { .. }))
        ));
    }

    #[tokio::test]
    async fn test_qos_port_profile() {
        let (mut switch, log) = dell(DellOs9Model::Force10, &[]);
        switch.create_qos_conf_on_switch_port("te1/2/1").await.unwrap();
        assert_eq!(
            log.last(),
            Some(Call::config(&[
                "interface te1/2/1",
                "mtu 9416",
                "portmode hybrid",
                "switchport",
                "protocol lldp",
                "advertise management-tlv management-address system-capabilities system-description system-name",
            ]))
        );

        switch.remove_qos_conf_on_switch_port("te1/4/1").await.unwrap();
        assert_eq!(
            log.last(),
            Some(Call::config(&["interface te1/4/1", "no protocol lldp"]))
        );
    }

    #[tokio::test]
    async fn test_set_tagged_vlan_on_switch_port() {
        let (mut switch, log) = dell(DellOs9Model::Force10, &[]);
        switch.set_tagged_vlan_on_switch_port(3260, "te1/2/1").await.unwrap();
        assert_eq!(
            log.last(),
            Some(Call::config(&["interface vlan 3260", "tagged te1/2/1"]))
        );
    }

    #[tokio::test]
    async fn test_enable_fec() {
        let (mut switch, log) = dell(DellOs9Model::Force10, &["", "", " fec enabled "]);
        assert!(switch.enable_fec("hundredGigE 1/3").await.unwrap());
        let calls = log.calls();
        assert_eq!(calls[1], Call::list(&["fec enable", "end"]));
        assert_eq!(
            calls[2],
            Call::command("show running-config interface hundredGigE 1/3")
        );
    }

    #[tokio::test]
    async fn test_disabling_iscsi_app() {
        let (mut switch, log) = dell(DellOs9Model::Force10, &[]);
        switch.disabling_iscsi_app("te1/1/1").await.unwrap();
        assert_eq!(
            log.last(),
            Some(Call::config(&[
                "interface te1/1/1",
                "protocol lldp",
                "no advertise DCBx-appln-tlv iscsi",
            ]))
        );

        assert!(switch.disabling_iscsi_app("eth1").await.is_err());
        assert_eq!(log.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_configure_vlan() {
        let (mut switch, log) = dell(DellOs9Model::Generic, &[]);
        let config = VlanConfig::new(
            "te 0/1",
            20,
            crate::types::VlanType::Untagged,
            SwitchportMode::Trunk,
        );
        switch.configure_vlan(&config).await.unwrap();
        assert_eq!(
            log.last(),
            Some(Call::config(&["interface vlan 20", "untagged te 0/1"]))
        );
    }

    #[test]
    fn test_mac_format() {
        let switch = dell(DellOs9Model::Generic, &[]).0;
        assert_eq!(
            switch.change_standard_to_switch_mac_address("AABB.CCDD.EEFF").unwrap(),
            "aa:bb:cc:dd:ee:ff"
        );
    }

    #[tokio::test]
    async fn test_port_scoped_operations_reject_bad_port_names() {
        for model in [DellOs9Model::Generic, DellOs9Model::Force10, DellOs9Model::S5048] {
            let (mut switch, log) = dell(model, &[]);
            for port in ["", "eth1/1", "Te 1/1; reload", "Te"] {
                for err in [
                    switch.shutdown(true, port).await.unwrap_err(),
                    switch.is_port_linkup(port).await.unwrap_err(),
                    switch.get_port_speed(port).await.unwrap_err(),
                    switch.set_port_flowcontrol(port, true, true).await.unwrap_err(),
                    switch.get_pfc_port_statistics(port, 0).await.unwrap_err(),
                    switch.enable_fec(port).await.unwrap_err(),
                    switch.create_qos_conf_on_switch_port(port).await.unwrap_err(),
                    switch.show_port_running_config(port).await.unwrap_err(),
                ] {
                    assert!(matches!(err, Error::Validation(_)), "{port}: {err}");
                }
            }
            assert!(log.calls().is_empty());
        }
    }
}

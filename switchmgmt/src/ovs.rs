//! Open vSwitch helper.
//!
//! Every operation is one `ovs-vsctl`, `ovs-dpctl` or `ovs-ofctl` command
//! line run through a [`CommandExecutor`], locally or over SSH.
//!
//! ```rust,no_run
//! use switchmgmt::ovs::{HANDLER_CMD, LocalExecutor, Ovs, REVALIDATOR_CMD};
//!
//! # async fn run() -> switchmgmt::Result<()> {
//! let mut ovs = Ovs::new(LocalExecutor);
//! ovs.add_bridge("br0").await?;
//! ovs.add_port("br0", "eth1").await?;
//! ovs.set_other_configs(&[REVALIDATOR_CMD, HANDLER_CMD]).await?;
//! println!("{}", ovs.vsctl_show(None).await?);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use tokio::process::Command;

use crate::error::{ConnectionError, Error, Result};
use crate::transport::{SshConfig, SshTransport};

/// Single revalidator thread.
pub const REVALIDATOR_CMD: &str = "n-revalidator-threads=1";
/// Single handler thread.
pub const HANDLER_CMD: &str = "n-handler-threads=1";

static VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+\.\d+\.\d+)").expect("version pattern is valid"));

/// Outcome of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletedProcess {
    pub return_code: i32,
    pub stdout: String,
    pub stderr: String,
}

/// Runs shell command lines somewhere.
#[async_trait]
pub trait CommandExecutor: Send {
    /// Run `command`. With `shell` the line is handed to `sh -c`, otherwise
    /// it is split on whitespace and run directly.
    async fn execute_command(&mut self, command: &str, shell: bool) -> Result<CompletedProcess>;
}

/// Runs commands on this host.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalExecutor;

#[async_trait]
impl CommandExecutor for LocalExecutor {
    async fn execute_command(&mut self, command: &str, shell: bool) -> Result<CompletedProcess> {
        let mut process = if shell {
            let mut process = Command::new("sh");
            process.arg("-c").arg(command);
            process
        } else {
            let mut words = command.split_whitespace();
            let program = words
                .next()
                .ok_or_else(|| Error::invalid("Empty command line"))?;
            let mut process = Command::new(program);
            process.args(words);
            process
        };
        let output = process.output().await.map_err(ConnectionError::Io)?;
        Ok(CompletedProcess {
            // killed by a signal
            return_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Runs commands on a remote host over SSH exec channels. The remote side
/// always goes through the login shell, so `shell` has no effect.
pub struct SshExecutor {
    transport: SshTransport,
}

impl SshExecutor {
    pub async fn connect(config: SshConfig) -> Result<Self> {
        info!("Opening OvS command channel to {}", config.socket_addr());
        Ok(Self {
            transport: SshTransport::connect(config).await?,
        })
    }

    pub async fn close(self) -> Result<()> {
        self.transport.close().await
    }
}

#[async_trait]
impl CommandExecutor for SshExecutor {
    async fn execute_command(&mut self, command: &str, _shell: bool) -> Result<CompletedProcess> {
        self.transport.exec(command).await
    }
}

/// Open vSwitch command wrapper.
pub struct Ovs {
    executor: Box<dyn CommandExecutor>,
}

impl Ovs {
    pub fn new(executor: impl CommandExecutor + 'static) -> Self {
        Self {
            executor: Box::new(executor),
        }
    }

    async fn run(&mut self, command: &str, shell: bool) -> Result<String> {
        debug!("ovs: {command}");
        let process = self.executor.execute_command(command, shell).await?;
        if process.return_code != 0 {
            return Err(Error::CommandFailed {
                command: command.to_string(),
                return_code: process.return_code,
                stderr: process.stderr,
            });
        }
        Ok(process.stdout)
    }

    async fn execute(&mut self, command: &str) -> Result<String> {
        self.run(command, false).await
    }

    /// `ovs-vsctl show`, optionally for one bridge.
    pub async fn vsctl_show(&mut self, bridge: Option<&str>) -> Result<String> {
        self.execute(&format!("ovs-vsctl show {}", bridge.unwrap_or_default()))
            .await
    }

    pub async fn dpctl_show(&mut self, bridge: Option<&str>) -> Result<String> {
        self.execute(&format!("ovs-dpctl show {}", bridge.unwrap_or_default()))
            .await
    }

    pub async fn ofctl_show(&mut self, bridge: Option<&str>) -> Result<String> {
        self.execute(&format!("ovs-ofctl show {}", bridge.unwrap_or_default()))
            .await
    }

    pub async fn add_bridge(&mut self, bridge: &str) -> Result<String> {
        self.execute(&format!("ovs-vsctl add-br {bridge}")).await
    }

    pub async fn del_bridge(&mut self, bridge: &str) -> Result<String> {
        self.execute(&format!("ovs-vsctl del-br {bridge}")).await
    }

    pub async fn add_port(&mut self, bridge: &str, port: &str) -> Result<String> {
        self.execute(&format!("ovs-vsctl add-port {bridge} {port}"))
            .await
    }

    /// Add `port` as a VXLAN tunnel endpoint.
    pub async fn add_port_vxlan_type(
        &mut self,
        bridge: &str,
        port: &str,
        local_ip: &str,
        remote_ip: &str,
        dst_port: u16,
    ) -> Result<String> {
        self.execute(&format!(
            "ovs-vsctl add-port {bridge} {port} -- set interface {port} type=vxlan \
             options:local_ip={local_ip} options:remote_ip={remote_ip} options:dst_port={dst_port}"
        ))
        .await
    }

    pub async fn add_p4_device(&mut self, device_id: u32) -> Result<String> {
        self.execute(&format!("ovs-vsctl add-p4-device {device_id}"))
            .await
    }

    pub async fn add_bridge_p4(&mut self, bridge: &str, device_id: u32) -> Result<String> {
        self.execute(&format!("ovs-vsctl add-br-p4 {bridge} {device_id}"))
            .await
    }

    pub async fn del_port(&mut self, bridge: &str, port: &str) -> Result<String> {
        self.execute(&format!("ovs-vsctl del-port {bridge} {port}"))
            .await
    }

    pub async fn set_vlan_tag(&mut self, port: &str, vlan: u16) -> Result<String> {
        self.execute(&format!("ovs-vsctl set port {port} tag={vlan}"))
            .await
    }

    pub async fn set_vlan_trunk(&mut self, port: &str, vlans: &[u16]) -> Result<String> {
        let trunks: Vec<String> = vlans.iter().map(u16::to_string).collect();
        self.execute(&format!("ovs-vsctl set port {port} trunks={}", trunks.join(",")))
            .await
    }

    /// Delete the flows matching ingress `port`.
    pub async fn del_flows(&mut self, bridge: &str, port: &str) -> Result<String> {
        self.execute(&format!("ovs-ofctl del-flows {bridge} in_port={port}"))
            .await
    }

    pub async fn dpctl_dump_flows(&mut self, bridge: Option<&str>) -> Result<String> {
        self.execute(&format!("ovs-dpctl dump-flows {}", bridge.unwrap_or_default()))
            .await
    }

    pub async fn ofctl_dump_flows(&mut self, bridge: &str) -> Result<String> {
        self.execute(&format!("ovs-ofctl dump-flows {bridge}")).await
    }

    /// Port statistics of `bridge`.
    pub async fn dump_port(&mut self, bridge: &str) -> Result<String> {
        self.execute(&format!("ovs-ofctl dump-ports {bridge}")).await
    }

    /// Dotted version from the first non-empty line of `ovs-vsctl -V`.
    pub async fn get_version(&mut self) -> Result<String> {
        let output = self.execute("ovs-vsctl -V").await?;
        output
            .lines()
            .find(|line| !line.trim().is_empty())
            .and_then(|line| VERSION.captures(line))
            .map(|caps| caps[1].to_string())
            .ok_or_else(|| Error::unexpected("Cannot get version of OvS"))
    }

    /// Set `key=value` pairs under `Open_vSwitch . other_config`, one
    /// command each.
    pub async fn set_other_configs(&mut self, configs: &[&str]) -> Result<()> {
        for config in configs {
            self.run(
                &format!("ovs-vsctl set Open_vSwitch . other_config:{config}"),
                true,
            )
            .await?;
        }
        Ok(())
    }
}

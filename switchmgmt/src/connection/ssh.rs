//! Interactive CLI connection over SSH.

use async_trait::async_trait;
use log::{debug, info, warn};
use secrecy::ExposeSecret;

use super::{Connection, Reply};
use crate::channel::ShellChannel;
use crate::channel::prompt::{self, PASSWORD, PROMPT, PROMPT_OR_PASSWORD};
use crate::config::SwitchConfig;
use crate::device::DeviceType;
use crate::error::{ConnectionError, Result};
use crate::transport::{SshConfig, SshTransport};

struct LiveSession {
    transport: SshTransport,
    shell: ShellChannel,
}

/// CLI session to a switch.
///
/// On open it authenticates, escalates with `enable` when the prompt is
/// unprivileged, detects the device type if none was configured, and
/// disables paging. Every call first checks the session; a dead session is
/// re-established once, and the call fails if that does not bring it back.
pub struct SshSwitchConnection {
    config: SwitchConfig,
    ssh: SshConfig,
    device_type: Option<DeviceType>,
    session: Option<LiveSession>,
}

impl SshSwitchConnection {
    pub async fn open(config: SwitchConfig) -> Result<Self> {
        let ssh = SshConfig::from_switch(&config);
        let mut connection = Self {
            device_type: config.device_type,
            config,
            ssh,
            session: None,
        };
        connection.establish().await?;
        Ok(connection)
    }

    /// Configured or detected device type.
    pub fn device_type(&self) -> Option<DeviceType> {
        self.device_type
    }

    async fn establish(&mut self) -> Result<()> {
        let transport = SshTransport::connect(self.ssh.clone()).await?;
        let channel = transport.open_shell().await?;
        let mut shell = ShellChannel::new(channel, self.ssh.command_timeout);

        let banner = shell.read_until(&PROMPT).await?;
        if prompt::is_user_exec(&banner) {
            self.enable(&mut shell).await?;
        }

        let device = match self.device_type {
            Some(device) => device,
            None => {
                let device = detect(&mut shell, &self.config.ip).await?;
                self.device_type = Some(device);
                device
            }
        };

        for command in device.cli().session_prep {
            shell.send(command).await?;
        }

        info!("Connected to {} ({})", self.config.ip, device);
        self.session = Some(LiveSession { transport, shell });
        Ok(())
    }

    async fn enable(&self, shell: &mut ShellChannel) -> Result<()> {
        shell.write_line("enable").await?;
        let output = shell.read_until(&PROMPT_OR_PASSWORD).await?;
        if !PASSWORD.is_match(output.as_bytes()) {
            return Ok(());
        }

        match &self.config.secret {
            Some(secret) => shell.write_line(secret.expose_secret()).await?,
            None => shell.write_line("").await?,
        }
        let output = shell.read_until(&PROMPT).await?;
        if prompt::is_user_exec(&output) {
            warn!("{}: enable did not reach privileged mode", self.config.ip);
        }
        Ok(())
    }

    /// Live shell, reconnecting once if the session died.
    async fn shell(&mut self) -> Result<&mut ShellChannel> {
        if !self.is_alive() {
            warn!("Connection to {} lost, reconnecting", self.config.ip);
            self.session = None;
            if let Err(e) = self.establish().await {
                warn!("Reconnect to {} failed: {}", self.config.ip, e);
            }
        }

        match self.session.as_mut() {
            Some(live) if !live.transport.is_closed() => Ok(&mut live.shell),
            _ => Err(ConnectionError::ReconnectFailed(self.config.ip.clone()).into()),
        }
    }

    fn cli(&self) -> Option<crate::device::CliProfile> {
        self.device_type.map(|device| device.cli())
    }
}

async fn detect(shell: &mut ShellChannel, host: &str) -> Result<DeviceType> {
    // keep `show version` from stopping at a pager on the CLIs that accept this
    shell.send("terminal length 0").await?;
    let version = shell.send("show version").await?;
    let device = DeviceType::detect(&version)
        .ok_or_else(|| ConnectionError::DetectionFailed(host.to_string()))?;
    info!("Detected {} as {}", host, device);
    Ok(device)
}

#[async_trait]
impl Connection for SshSwitchConnection {
    async fn send_command(&mut self, command: &str) -> Result<Reply> {
        debug!("send_command: {}", command);
        let output = self.shell().await?.send(command).await?;
        Ok(Reply::Text(output))
    }

    async fn send_command_list(&mut self, commands: &[String]) -> Result<Reply> {
        debug!("send_command_list: {:?}", commands);
        let shell = self.shell().await?;
        let mut outputs = Vec::with_capacity(commands.len());
        for command in commands {
            outputs.push(shell.send(command).await?);
        }
        Ok(Reply::Text(outputs.join("\n")))
    }

    async fn send_configuration(&mut self, lines: &[String]) -> Result<Reply> {
        debug!("send_configuration: {:?}", lines);
        let cli = self.cli();
        let shell = self.shell().await?;
        let mut outputs = Vec::with_capacity(lines.len() + 2);

        let enter = cli.and_then(|cli| cli.config_enter);
        if let Some(enter) = enter {
            outputs.push(shell.send(enter).await?);
        }
        for line in lines {
            outputs.push(shell.send(line).await?);
        }
        if let (Some(cli), Some(_)) = (cli, enter) {
            outputs.push(shell.send(cli.config_exit).await?);
        }

        Ok(Reply::Text(outputs.join("\n")))
    }

    async fn exit_port_configuration(&mut self) -> Result<()> {
        let exit = self.cli().map(|cli| cli.config_exit).unwrap_or("end");
        if !exit.is_empty() {
            self.shell().await?.send(exit).await?;
        }
        Ok(())
    }

    fn is_alive(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|live| !live.transport.is_closed())
    }

    async fn disconnect(&mut self) -> Result<()> {
        if let Some(live) = self.session.take() {
            if let Err(e) = live.shell.close().await {
                debug!("Closing shell on {}: {}", self.config.ip, e);
            }
            live.transport.close().await?;
            info!("Disconnected from {}", self.config.ip);
        }
        Ok(())
    }
}

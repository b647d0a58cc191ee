//! A dialect's handle on its connection.

use std::time::Duration;

use log::debug;

use crate::config::SwitchConfig;
use crate::connection::{self, Connection, Reply};
use crate::error::Result;

/// Polling policy for link-state waits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkWait {
    /// Total budget before giving up.
    pub timeout: Duration,
    /// Pause between probes.
    pub interval: Duration,
    /// Consecutive matching probes needed to call the state stable.
    pub hold_probes: u32,
}

impl Default for LinkWait {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(60),
            interval: Duration::from_secs(1),
            hold_probes: 3,
        }
    }
}

/// Connection plus per-session settings.
pub struct Session {
    connection: Box<dyn Connection>,
    link_wait: LinkWait,
}

impl Session {
    pub fn new(connection: impl Connection + 'static) -> Self {
        Self::from_boxed(Box::new(connection))
    }

    pub fn from_boxed(connection: Box<dyn Connection>) -> Self {
        Self {
            connection,
            link_wait: LinkWait::default(),
        }
    }

    /// Open the connection described by `config`.
    pub async fn open(config: &SwitchConfig) -> Result<Self> {
        Ok(Self::from_boxed(connection::open(config).await?))
    }

    pub fn with_link_wait(mut self, link_wait: LinkWait) -> Self {
        self.link_wait = link_wait;
        self
    }

    pub fn link_wait(&self) -> LinkWait {
        self.link_wait
    }

    pub async fn send_command(&mut self, command: &str) -> Result<Reply> {
        debug!("-> {}", command);
        self.connection.send_command(command).await
    }

    /// Send a command and return the reply as text.
    pub async fn send_text(&mut self, command: &str) -> Result<String> {
        Ok(self.send_command(command).await?.into_text())
    }

    pub async fn send_command_list(&mut self, commands: &[String]) -> Result<Reply> {
        debug!("-> {:?}", commands);
        self.connection.send_command_list(commands).await
    }

    pub async fn send_configuration(&mut self, lines: &[String]) -> Result<Reply> {
        debug!("-> (config) {:?}", lines);
        self.connection.send_configuration(lines).await
    }

    pub async fn exit_port_configuration(&mut self) -> Result<()> {
        self.connection.exit_port_configuration().await
    }

    pub fn is_alive(&self) -> bool {
        self.connection.is_alive()
    }

    pub async fn disconnect(&mut self) -> Result<()> {
        self.connection.disconnect().await
    }
}

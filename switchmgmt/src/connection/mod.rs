//! Connections carry commands to a switch and bring back replies.
//!
//! Two adapters exist: [`SshSwitchConnection`] drives the interactive CLI,
//! [`CiscoApiConnection`] talks NX-API JSON-RPC. Dialects only see the
//! [`Connection`] trait.

use async_trait::async_trait;
use serde_json::Value;

use crate::config::{ConnectionType, SwitchConfig};
use crate::error::Result;

mod api;
mod ssh;
#[cfg(test)]
pub(crate) mod testing;

pub use api::CiscoApiConnection;
pub use ssh::SshSwitchConnection;

/// What a switch answered.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    /// CLI text with echo and prompt removed.
    Text(String),
    /// One JSON-RPC response object per command sent.
    Json(Vec<Value>),
}

impl Reply {
    /// The reply as text. JSON replies are rendered compactly.
    pub fn into_text(self) -> String {
        match self {
            Reply::Text(text) => text,
            Reply::Json(values) if values.is_empty() => String::new(),
            Reply::Json(values) => Value::Array(values).to_string(),
        }
    }

    pub fn as_json(&self) -> Option<&[Value]> {
        match self {
            Reply::Json(values) => Some(values),
            Reply::Text(_) => None,
        }
    }
}

impl From<&str> for Reply {
    fn from(text: &str) -> Self {
        Reply::Text(text.to_string())
    }
}

/// A live command channel to one switch.
///
/// Calls are strictly sequential: each completes before the next is issued.
#[async_trait]
pub trait Connection: Send {
    /// Send one command.
    async fn send_command(&mut self, command: &str) -> Result<Reply>;

    /// Send commands one after another in the current mode.
    async fn send_command_list(&mut self, commands: &[String]) -> Result<Reply>;

    /// Enter configuration mode, send `lines`, leave configuration mode.
    async fn send_configuration(&mut self, lines: &[String]) -> Result<Reply>;

    /// Leave any configuration sub-mode.
    async fn exit_port_configuration(&mut self) -> Result<()>;

    fn is_alive(&self) -> bool;

    async fn disconnect(&mut self) -> Result<()>;
}

/// Open the connection kind requested by `config`.
pub async fn open(config: &SwitchConfig) -> Result<Box<dyn Connection>> {
    match config.connection_type {
        ConnectionType::Ssh => Ok(Box::new(SshSwitchConnection::open(config.clone()).await?)),
        ConnectionType::CiscoApi => Ok(Box::new(CiscoApiConnection::connect(config).await?)),
    }
}

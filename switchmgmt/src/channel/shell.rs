//! Interactive shell channel: write a line, read until the prompt.

use std::time::Duration;

use log::trace;
use regex::bytes::Regex;
use russh::client::Msg;
use russh::{Channel, ChannelMsg};

use super::buffer::PatternBuffer;
use super::prompt::{PROMPT, normalize_output};
use crate::error::{ConnectionError, Result};

/// A PTY shell with prompt-terminated reads.
pub struct ShellChannel {
    channel: Channel<Msg>,
    buffer: PatternBuffer,
    timeout: Duration,
}

impl ShellChannel {
    pub fn new(channel: Channel<Msg>, timeout: Duration) -> Self {
        Self {
            channel,
            buffer: PatternBuffer::default(),
            timeout,
        }
    }

    /// Read until `pattern` shows up at the tail of the output.
    pub async fn read_until(&mut self, pattern: &Regex) -> Result<String> {
        let deadline = tokio::time::Instant::now() + self.timeout;

        while !self.buffer.tail_contains(pattern) {
            let msg = tokio::time::timeout_at(deadline, self.channel.wait())
                .await
                .map_err(|_| ConnectionError::Timeout(self.timeout))?;

            match msg {
                Some(ChannelMsg::Data { ref data }) => self.buffer.extend(data),
                Some(ChannelMsg::ExtendedData { ref data, .. }) => self.buffer.extend(data),
                Some(ChannelMsg::Eof) | Some(ChannelMsg::Close) | None => {
                    self.buffer.clear();
                    return Err(ConnectionError::Disconnected.into());
                }
                Some(_) => {}
            }
        }

        let output = self.buffer.take_string();
        trace!("read {} bytes", output.len());
        Ok(output)
    }

    pub async fn write_line(&mut self, line: &str) -> Result<()> {
        let data = format!("{line}\n");
        self.channel
            .data(data.as_bytes())
            .await
            .map_err(ConnectionError::Ssh)?;
        Ok(())
    }

    /// Send one command and return its output without echo or prompt.
    pub async fn send(&mut self, command: &str) -> Result<String> {
        self.write_line(command).await?;
        let raw = self.read_until(&PROMPT).await?;
        Ok(normalize_output(&raw, command))
    }

    pub async fn close(self) -> Result<()> {
        self.channel.close().await.map_err(ConnectionError::Ssh)?;
        Ok(())
    }
}

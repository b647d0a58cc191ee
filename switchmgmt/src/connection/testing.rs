//! Scripted connection for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::{Connection, Reply};
use crate::error::Result;

/// One recorded call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Command(String),
    CommandList(Vec<String>),
    Configuration(Vec<String>),
    ExitPortConfiguration,
}

impl Call {
    pub fn command(command: &str) -> Self {
        Call::Command(command.to_string())
    }

    pub fn list(commands: &[&str]) -> Self {
        Call::CommandList(commands.iter().map(|c| c.to_string()).collect())
    }

    pub fn config(lines: &[&str]) -> Self {
        Call::Configuration(lines.iter().map(|c| c.to_string()).collect())
    }
}

/// Shared view of the calls a [`ScriptedConnection`] received.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn last(&self) -> Option<Call> {
        self.0.lock().unwrap().last().cloned()
    }

    pub fn contains(&self, call: &Call) -> bool {
        self.0.lock().unwrap().contains(call)
    }

    fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }
}

/// Replays queued replies in order, whatever the call; empty text once the
/// queue runs dry.
#[derive(Debug, Default)]
pub struct ScriptedConnection {
    replies: VecDeque<Reply>,
    log: CallLog,
}

impl ScriptedConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(mut self, reply: impl Into<Reply>) -> Self {
        self.replies.push_back(reply.into());
        self
    }

    pub fn replies<I, R>(mut self, replies: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: Into<Reply>,
    {
        self.replies.extend(replies.into_iter().map(Into::into));
        self
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    fn next_reply(&mut self) -> Reply {
        self.replies
            .pop_front()
            .unwrap_or_else(|| Reply::Text(String::new()))
    }
}

#[async_trait]
impl Connection for ScriptedConnection {
    async fn send_command(&mut self, command: &str) -> Result<Reply> {
        self.log.push(Call::Command(command.to_string()));
        Ok(self.next_reply())
    }

    async fn send_command_list(&mut self, commands: &[String]) -> Result<Reply> {
        self.log.push(Call::CommandList(commands.to_vec()));
        Ok(self.next_reply())
    }

    async fn send_configuration(&mut self, lines: &[String]) -> Result<Reply> {
        self.log.push(Call::Configuration(lines.to_vec()));
        Ok(self.next_reply())
    }

    async fn exit_port_configuration(&mut self) -> Result<()> {
        self.log.push(Call::ExitPortConfiguration);
        Ok(())
    }

    fn is_alive(&self) -> bool {
        true
    }

    async fn disconnect(&mut self) -> Result<()> {
        Ok(())
    }
}

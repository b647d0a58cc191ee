//! SSH transport layer wrapping russh.
//!
//! Connection setup, authentication, host-key checking, and channel
//! creation (interactive shells for the CLI, exec channels for shell
//! commands).

pub mod config;
mod ssh;

pub use config::{AuthMethod, HostKeyVerification, SshConfig};
pub use ssh::SshTransport;

//! Open vSwitch example
//!
//! Creates a bridge, attaches a port, trims the datapath thread counts and
//! prints the resulting configuration. Runs locally, or on a remote host
//! over SSH when `--host` is given.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example ovs_bridge -- --bridge br0 --port eth1
//! cargo run --example ovs_bridge -- --host 10.10.10.10 --user root --password secret --bridge br0 --port eth1
//! ```

use std::env;

use switchmgmt::ovs::{HANDLER_CMD, LocalExecutor, Ovs, REVALIDATOR_CMD, SshExecutor};
use switchmgmt::{SshConfig, SwitchConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().collect();
    let value = |flag: &str| {
        args.iter()
            .position(|a| a == flag)
            .and_then(|i| args.get(i + 1))
            .cloned()
    };
    let bridge = value("--bridge").unwrap_or_else(|| "br0".to_string());
    let port = value("--port").unwrap_or_else(|| "eth1".to_string());

    let mut ovs = match value("--host") {
        Some(host) => {
            let mut config = SwitchConfig::new(host)
                .username(value("--user").unwrap_or_else(|| "root".to_string()))
                .danger_disable_host_key_verification();
            if let Some(password) = value("--password") {
                config = config.password(password);
            }
            Ovs::new(SshExecutor::connect(SshConfig::from_switch(&config)).await?)
        }
        None => Ovs::new(LocalExecutor),
    };

    println!("OvS {}", ovs.get_version().await?);

    ovs.add_bridge(&bridge).await?;
    ovs.add_port(&bridge, &port).await?;
    ovs.set_other_configs(&[REVALIDATOR_CMD, HANDLER_CMD]).await?;

    println!("--- ovs-vsctl show ---");
    println!("{}", ovs.vsctl_show(None).await?);
    println!("--- ovs-ofctl show {bridge} ---");
    println!("{}", ovs.ofctl_show(Some(&bridge)).await?);

    Ok(())
}

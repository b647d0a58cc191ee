//! Switch inventory example
//!
//! Connects to a switch (device type detected from `show version` unless
//! given), then prints link state, speed and running config of one port,
//! plus the LLDP neighbour table.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example switch_info -- --host switch1 --user admin --password secret --port-name Ethernet1/1
//! ```
//!
//! Over NX-API instead of SSH:
//! ```bash
//! cargo run --example switch_info -- --host nexus1 --user admin --password secret --api --port-name Ethernet1/1
//! ```

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use switchmgmt::{ConnectionType, SwitchConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    println!("=== switchmgmt inventory example ===\n");
    println!("Connecting to {}...", args.host);

    let mut config = SwitchConfig::new(&args.host)
        .username(&args.user)
        .with_auth_timeout(Duration::from_secs(args.timeout))
        .danger_disable_host_key_verification();

    if let Some(password) = &args.password {
        config = config.password(password);
    } else if let Some(key_path) = &args.key {
        config = config.private_key(key_path);
    } else {
        eprintln!("Error: Must provide either --password or --key");
        std::process::exit(1);
    }
    if args.api {
        config = config.connection_type(ConnectionType::CiscoApi);
    }

    let mut switch = switchmgmt::connect(&config).await?;
    println!("Connected, dialect {}\n", switch.dialect().name);

    let version = switch.show_version().await?;
    for line in version.lines().take(5) {
        println!("{line}");
    }
    println!();

    if let Some(port) = &args.port_name {
        match switch.is_port_linkup(port).await? {
            Some(true) => println!("{port}: link up"),
            Some(false) => println!("{port}: link down"),
            None => println!("{port}: link state unknown"),
        }
        match switch.get_port_speed(port).await {
            Ok(speed) => println!("{port}: {speed} Mbps"),
            Err(e) => eprintln!("{port}: {e}"),
        }
        println!("\n--- running config of {port} ---");
        println!("{}", switch.show_port_running_config(port).await?);
    }

    println!("\n--- LLDP neighbours ---");
    match switch.get_lldp_neighbors().await {
        Ok(neighbors) => {
            for neighbor in neighbors {
                println!(
                    "{:<20} {:<20} {:<20} {}",
                    neighbor.loc_portid,
                    neighbor.rem_devid.unwrap_or_default(),
                    neighbor.rem_portid.unwrap_or_default(),
                    neighbor.rem_sysname.unwrap_or_default(),
                );
            }
        }
        Err(e) => eprintln!("LLDP: {e}"),
    }

    switch.disconnect().await?;
    println!("\nDisconnected.");
    Ok(())
}

struct Args {
    host: String,
    user: String,
    password: Option<String>,
    key: Option<PathBuf>,
    timeout: u64,
    api: bool,
    port_name: Option<String>,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut host = "localhost".to_string();
        let mut user = env::var("USER").unwrap_or_else(|_| "admin".to_string());
        let mut password = None;
        let mut key = None;
        let mut timeout = 60u64;
        let mut api = false;
        let mut port_name = None;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--host" | "-h" => {
                    i += 1;
                    if i < args.len() {
                        host = args[i].clone();
                    }
                }
                "--user" | "-u" => {
                    i += 1;
                    if i < args.len() {
                        user = args[i].clone();
                    }
                }
                "--password" | "-P" => {
                    i += 1;
                    if i < args.len() {
                        password = Some(args[i].clone());
                    }
                }
                "--key" | "-k" => {
                    i += 1;
                    if i < args.len() {
                        key = Some(PathBuf::from(&args[i]));
                    }
                }
                "--timeout" | "-t" => {
                    i += 1;
                    if i < args.len() {
                        timeout = args[i].parse().unwrap_or(60);
                    }
                }
                "--port-name" | "-i" => {
                    i += 1;
                    if i < args.len() {
                        port_name = Some(args[i].clone());
                    }
                }
                "--api" => api = true,
                "--help" => {
                    println!(
                        "Usage: switch_info [--host HOST] [--user USER] [--password PASS | --key PATH] \
                         [--timeout SECS] [--port-name PORT] [--api]"
                    );
                    std::process::exit(0);
                }
                other => eprintln!("Ignoring unknown argument {other}"),
            }
            i += 1;
        }

        Self {
            host,
            user,
            password,
            key,
            timeout,
            api,
            port_name,
        }
    }
}

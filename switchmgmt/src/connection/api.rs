//! Cisco NX-API JSON-RPC connection.

use async_trait::async_trait;
use log::{debug, info};
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};

use super::{Connection, Reply};
use crate::config::SwitchConfig;
use crate::error::{ConnectionError, Result};

/// NX-API endpoint of one switch.
///
/// Every call is a single HTTP POST carrying one JSON-RPC request per
/// command. There is no configuration mode; configuration lines are sent
/// the same way as show commands.
pub struct CiscoApiConnection {
    client: reqwest::Client,
    url: String,
    username: String,
    password: Option<SecretString>,
}

impl CiscoApiConnection {
    /// Create the client and prove the endpoint answers `show version`.
    pub async fn connect(config: &SwitchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.auth_timeout())
            .build()
            .map_err(ConnectionError::Http)?;

        let mut connection = Self {
            client,
            url: format!("http://{}/ins", config.ip),
            username: config.username.clone().unwrap_or_default(),
            password: config.password.clone(),
        };
        connection.send_command("show version").await?;
        info!("Connected to NX-API at {}", connection.url);
        Ok(connection)
    }

    async fn call(&mut self, commands: &[String]) -> Result<Reply> {
        let body = Value::Array(rpc_payload(commands)).to_string();
        debug!("POST {}: {}", self.url, body);

        let response = self
            .client
            .post(&self.url)
            .basic_auth(
                &self.username,
                self.password.as_ref().map(|p| p.expose_secret()),
            )
            .header(CONTENT_TYPE, "application/json-rpc")
            .body(body)
            .send()
            .await
            .map_err(ConnectionError::Http)?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(ConnectionError::Status(status.as_u16()).into());
        }

        let value: Value = response.json().await.map_err(ConnectionError::Http)?;
        Ok(Reply::Json(into_response_list(value)?))
    }
}

/// One JSON-RPC request per command, ids counting from 1.
pub(crate) fn rpc_payload(commands: &[String]) -> Vec<Value> {
    commands
        .iter()
        .enumerate()
        .map(|(index, command)| {
            json!({
                "jsonrpc": "2.0",
                "method": "cli",
                "params": {"cmd": command, "version": 1},
                "id": index + 1,
            })
        })
        .collect()
}

/// NX-API answers a single request with a bare object.
pub(crate) fn into_response_list(value: Value) -> Result<Vec<Value>> {
    match value {
        Value::Array(values) => Ok(values),
        Value::Object(_) => Ok(vec![value]),
        other => Err(ConnectionError::InvalidResponse(other.to_string()).into()),
    }
}

#[async_trait]
impl Connection for CiscoApiConnection {
    async fn send_command(&mut self, command: &str) -> Result<Reply> {
        self.call(&[command.to_string()]).await
    }

    async fn send_command_list(&mut self, commands: &[String]) -> Result<Reply> {
        self.call(commands).await
    }

    async fn send_configuration(&mut self, lines: &[String]) -> Result<Reply> {
        self.call(lines).await
    }

    async fn exit_port_configuration(&mut self) -> Result<()> {
        Ok(())
    }

    fn is_alive(&self) -> bool {
        true
    }

    async fn disconnect(&mut self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;
    use crate::error::Error;

    #[test]
    fn test_rpc_payload() {
        let payload = rpc_payload(&["show version".to_string(), "show clock".to_string()]);
        assert_eq!(
            payload,
            vec![
                json!({"jsonrpc": "2.0", "method": "cli", "params": {"cmd": "show version", "version": 1}, "id": 1}),
                json!({"jsonrpc": "2.0", "method": "cli", "params": {"cmd": "show clock", "version": 1}, "id": 2}),
            ]
        );
    }

    #[test]
    fn test_single_object_is_wrapped() {
        let wrapped = into_response_list(json!({"id": 1, "result": null})).unwrap();
        assert_eq!(wrapped.len(), 1);

        let list = into_response_list(json!([{"id": 1}, {"id": 2}])).unwrap();
        assert_eq!(list.len(), 2);

        assert!(into_response_list(json!("text")).is_err());
    }

    /// Serve one canned HTTP response and return the address.
    async fn serve_once(status_line: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap().to_string();
        tokio::spawn(async move {
            if let Ok((mut socket, _)) = listener.accept().await {
                let mut buf = vec![0u8; 4096];
                let _ = socket.read(&mut buf).await;
                let response = format!(
                    "{status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                let _ = socket.write_all(response.as_bytes()).await;
            }
        });
        addr
    }

    #[tokio::test]
    async fn test_connect_validates_endpoint() {
        let addr = serve_once(
            "HTTP/1.1 200 OK",
            r#"{"jsonrpc":"2.0","result":{"body":{"nxos_ver_str":"9.3(8)"}},"id":1}"#,
        )
        .await;
        let config = SwitchConfig::new(addr)
            .username("admin")
            .password("admin")
            .with_auth_timeout(Duration::from_secs(5));

        let connection = CiscoApiConnection::connect(&config).await.unwrap();
        assert!(connection.is_alive());
    }

    #[tokio::test]
    async fn test_non_200_is_connection_error() {
        let addr = serve_once("HTTP/1.1 401 Unauthorized", "{}").await;
        let config = SwitchConfig::new(addr).with_auth_timeout(Duration::from_secs(5));

        let result = CiscoApiConnection::connect(&config).await;
        assert!(matches!(
            result,
            Err(Error::Connection(ConnectionError::Status(401)))
        ));
    }
}

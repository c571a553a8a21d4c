use std::env;
use std::net::SocketAddr;

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8282";
pub const DEFAULT_LOG_FILTER: &str = "fulfillment_runtime=info,shared=info";

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: SocketAddr,
    pub log_filter: String,
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, String> {
        Self::from_values(
            env::var("FULFILLMENT_BIND_ADDR").ok(),
            env::var("RUST_LOG").ok(),
        )
    }

    fn from_values(bind_addr: Option<String>, log_filter: Option<String>) -> Result<Self, String> {
        let raw_bind_addr = bind_addr
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = raw_bind_addr
            .parse::<SocketAddr>()
            .map_err(|err| format!("invalid FULFILLMENT_BIND_ADDR {raw_bind_addr}: {err}"))?;

        Ok(Self {
            bind_addr,
            log_filter: log_filter
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}

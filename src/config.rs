use std::env;
use std::net::IpAddr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub user_agent: String,
    pub http_timeout: Duration,
    pub upf_gtp_addr: IpAddr,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0".to_string())
            .parse()?;

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()?;

        let user_agent = env::var("USER_AGENT")
            .unwrap_or_else(|_| format!("cp-lite/{}", env!("CARGO_PKG_VERSION")));

        let http_timeout_secs: u64 = env::var("HTTP_TIMEOUT_SECS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()?;

        let upf_gtp_addr = env::var("UPF_GTP_ADDR")
            .unwrap_or_else(|_| "127.0.0.1".to_string())
            .parse()?;

        Ok(Self {
            bind_addr,
            port,
            user_agent,
            http_timeout: Duration::from_secs(http_timeout_secs),
            upf_gtp_addr,
        })
    }
}

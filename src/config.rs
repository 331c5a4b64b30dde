use std::net::SocketAddr;
use std::path::PathBuf;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub upload_dir: PathBuf,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:accountd.db?mode=rwc".into());
        let upload_dir = std::env::var("UPLOAD_DIR")
            .unwrap_or_else(|_| "uploads".into())
            .into();
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = std::env::var("APP_PORT")
            .ok()
            .and_then(|v| v.parse::<u16>().ok())
            .unwrap_or(8080);
        Ok(Self {
            database_url,
            upload_dir,
            host,
            port,
        })
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn listen_addr_combines_host_and_port() {
        let config = AppConfig {
            database_url: "sqlite::memory:".into(),
            upload_dir: "uploads".into(),
            host: "127.0.0.1".into(),
            port: 3000,
        };
        assert_eq!(
            config.listen_addr().unwrap(),
            "127.0.0.1:3000".parse().unwrap()
        );
    }
}

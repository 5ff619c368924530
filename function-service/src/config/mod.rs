use anyhow::Result;
use dotenvy::dotenv;
use fiscal_core::config::FursConfig;
use std::env;

#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub furs: FursConfig,
    pub service_name: String,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let host = env::var("FUNCTION_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("FUNCTION_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()?;

        Ok(Self {
            server: ServerConfig { host, port },
            furs: FursConfig::from_env()?,
            service_name: "function-service".to_string(),
        })
    }
}

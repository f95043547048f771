use std::env;
use std::time::Duration;

// -- 配置加载错误
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} must be a valid {expected}, got {value:?}")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

// -- 应用配置结构体
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub database_name: String,
    pub collection_name: String,
    pub server_host: String,
    pub server_port: u16,
    pub store_timeout: Duration,
    pub log_dir: Option<String>,
}

impl Config {
    // -- 从环境变量加载配置
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("MONGODB_URL")
            .filter(|url| !url.trim().is_empty())
            .ok_or(ConfigError::Missing("MONGODB_URL"))?;

        let database_name = lookup("MONGODB_DATABASE").unwrap_or_else(|| "mongo-golang".to_string());
        let collection_name = lookup("MONGODB_COLLECTION").unwrap_or_else(|| "users".to_string());
        let server_host = lookup("SERVER_HOST").unwrap_or_else(|| "127.0.0.1".to_string());

        let server_port = match lookup("SERVER_PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid {
                name: "SERVER_PORT",
                expected: "port number",
                value: raw,
            })?,
            None => 8080,
        };

        // -- 单次数据库调用的超时时间（秒）
        let store_timeout = match lookup("STORE_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::Invalid {
                        name: "STORE_TIMEOUT_SECS",
                        expected: "positive number of seconds",
                        value: raw,
                    })
                }
            },
            None => Duration::from_secs(5),
        };

        let log_dir = lookup("LOG_DIR").filter(|dir| !dir.trim().is_empty());

        Ok(Self {
            database_url,
            database_name,
            collection_name,
            server_host,
            server_port,
            store_timeout,
            log_dir,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

//! Application configuration
//!
//! 配置从环境变量读取（支持 .env 文件），启动时加载一次并通过
//! `web::Data` 注入各个 handler，运行期间不再变化。

use std::env;
use std::path::PathBuf;

use clap::Parser;

/// Command line arguments, overriding the environment where given
#[derive(Parser, Debug, Default)]
#[command(name = "vitrine", about = "Portfolio backend with visit analytics")]
pub struct Args {
    /// Bind address (overrides SERVER_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Bind port (overrides SERVER_PORT)
    #[arg(long)]
    pub port: Option<u16>,

    /// Path to an alternative .env file
    #[arg(long, value_name = "FILE")]
    pub env_file: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// 存储后端："sqlite" | "postgres" | "mysql" | "file"
    pub storage_backend: String,
    pub database_url: String,
    /// file 后端的数据目录
    pub data_dir: PathBuf,
    /// Admin API 的 Bearer token，为空表示禁用 Admin API
    pub admin_token: String,
    /// CORS 白名单，为空表示允许任意来源（公开追踪端点需要跨域）
    pub allowed_origins: Vec<String>,
    pub log_file: Option<String>,
}

impl Config {
    pub fn load(args: &Args) -> Self {
        let server_host = args
            .host
            .clone()
            .or_else(|| env::var("SERVER_HOST").ok())
            .unwrap_or_else(|| "127.0.0.1".to_string());

        let server_port = args
            .port
            .or_else(|| env::var("SERVER_PORT").ok().and_then(|p| p.parse().ok()))
            .unwrap_or(8080);

        let storage_backend =
            env::var("STORAGE_BACKEND").unwrap_or_else(|_| "sqlite".to_string());

        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://vitrine.db?mode=rwc".to_string());

        let data_dir = env::var("DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("data"));

        let admin_token = env::var("ADMIN_TOKEN").unwrap_or_default();

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        let log_file = env::var("LOG_FILE").ok().filter(|s| !s.is_empty());

        Config {
            server_host,
            server_port,
            storage_backend,
            database_url,
            data_dir,
            admin_token,
            allowed_origins,
            log_file,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_override_env() {
        let args = Args {
            host: Some("0.0.0.0".to_string()),
            port: Some(9000),
            env_file: None,
        };
        let config = Config::load(&args);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.server_port, 9000);
        assert_eq!(config.bind_address(), "0.0.0.0:9000");
    }
}

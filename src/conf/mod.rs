use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use crate::common::AppResult;

// 全局配置实例
static CONFIG: OnceLock<Settings> = OnceLock::new();

pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub api: ApiConfig,
    pub storage: StorageConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    pub base_url: String,   // 后端 API 根路径
    pub timeout_secs: u64,  // 单个请求的总超时 (s)
    pub user_agent: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    pub dir: PathBuf, // 本地持久化目录（会话、购物车）
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LogConfig {
    pub level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            api: ApiConfig {
                base_url: "http://localhost:8080/api/v1".to_string(),
                timeout_secs: 10,
                user_agent: concat!("shop-client/", env!("CARGO_PKG_VERSION")).to_string(),
            },
            storage: StorageConfig {
                dir: PathBuf::from(".shop"),
            },
            log: LogConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Settings {
    pub fn global() -> &'static Settings {
        CONFIG.get_or_init(|| {
            Self::load(CONFIG_FILE).unwrap_or_else(|e| {
                eprintln!("Failed to load {}: {}, using defaults", CONFIG_FILE, e);
                Settings::default()
            })
        })
    }

    /// 读取配置文件；文件不存在时写入默认配置
    pub fn load(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(content) => Ok(toml::from_str(&content)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let settings = Settings::default();
                fs::write(path, toml::to_string_pretty(&settings)?)?;
                Ok(settings)
            }
            Err(e) => Err(e.into()),
        }
    }
}

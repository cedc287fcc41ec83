//! Browser session configuration / 浏览器会话配置
//!
//! Accepted once at startup and handed to the object store client.

use serde::{Deserialize, Serialize};

/// Object-storage browser configuration / 对象存储浏览器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Access Key ID
    pub access_key: String,
    /// Secret Access Key
    pub secret_key: String,
    /// 存储桶名称
    pub bucket: String,
    /// S3端点地址
    /// 默认使用公共网关 / Defaults to the public gateway
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// 区域
    #[serde(default = "default_region")]
    pub region: String,
    /// Top of the navigable hierarchy (key prefix) / 可浏览层级的根前缀
    #[serde(default)]
    pub browser_root: String,
    /// 目录占位文件名
    #[serde(default = "default_placeholder")]
    pub placeholder: String,
    /// 强制使用路径风格（而非虚拟主机风格）
    /// MinIO等需要设置为true
    #[serde(default = "default_path_style")]
    pub force_path_style: bool,
}

fn default_endpoint() -> String {
    "https://gateway.tardigradeshare.io".to_string()
}

fn default_region() -> String {
    "us-east-1".to_string()
}

fn default_placeholder() -> String {
    ".vortex_placeholder".to_string()
}

fn default_path_style() -> bool {
    true
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            access_key: String::new(),
            secret_key: String::new(),
            bucket: String::new(),
            endpoint: default_endpoint(),
            region: default_region(),
            browser_root: String::new(),
            placeholder: default_placeholder(),
            force_path_style: default_path_style(),
        }
    }
}

impl BrowserConfig {
    /// Load configuration from environment variables / 从环境变量加载配置
    pub fn from_env() -> anyhow::Result<Self> {
        let access_key = std::env::var("VORTEX_ACCESS_KEY")
            .map_err(|_| anyhow::anyhow!("VORTEX_ACCESS_KEY is not set"))?;
        let secret_key = std::env::var("VORTEX_SECRET_KEY")
            .map_err(|_| anyhow::anyhow!("VORTEX_SECRET_KEY is not set"))?;
        let bucket = std::env::var("VORTEX_BUCKET")
            .map_err(|_| anyhow::anyhow!("VORTEX_BUCKET is not set"))?;

        let mut config = Self {
            access_key,
            secret_key,
            bucket,
            ..Self::default()
        };

        if let Ok(endpoint) = std::env::var("VORTEX_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Ok(region) = std::env::var("VORTEX_REGION") {
            config.region = region;
        }
        if let Ok(root) = std::env::var("VORTEX_BROWSER_ROOT") {
            config.browser_root = root;
        }

        Ok(config)
    }
}

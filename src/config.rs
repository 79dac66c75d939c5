//! 配置加载
//!
//! 配置文件位于 ~/.config/shortqr/config.toml，缺失时全部使用默认值，
//! 命令行参数优先于文件。

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::ConfigError;

pub const APP_NAME: &str = "shortqr";
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8080";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub endpoint: String,
    /// 请求超时（秒），不设置时沿用 HTTP 客户端默认行为
    pub timeout_secs: Option<u64>,
    pub log_level: String,
    /// 网络错误后是否同样进入冷却
    pub cooldown_on_transport_error: bool,
    pub qr_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout_secs: None,
            log_level: "info".to_string(),
            cooldown_on_transport_error: false,
            qr_dir: None,
        }
    }
}

impl Config {
    /// 从文件加载配置，文件不存在时返回默认配置
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// 二维码图片的保存目录
    pub fn qr_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.qr_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(data_dir()?.join("qr")),
        }
    }
}

/// 默认配置文件路径 (~/.config/shortqr/config.toml)
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    dirs::config_dir()
        .map(|dir| dir.join(APP_NAME).join("config.toml"))
        .ok_or(ConfigError::NoDir("config"))
}

/// 数据目录 (~/.local/share/shortqr/)，不负责创建
pub fn data_dir() -> Result<PathBuf, ConfigError> {
    dirs::data_dir()
        .map(|dir| dir.join(APP_NAME))
        .ok_or(ConfigError::NoDir("data"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(&dir.path().join("config.toml")).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert!(config.timeout().is_none());
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "endpoint = \"https://s.example\"\ntimeout_secs = 3\n",
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.endpoint, "https://s.example");
        assert_eq!(config.timeout(), Some(Duration::from_secs(3)));
        assert_eq!(config.log_level, "info");
        assert!(!config.cooldown_on_transport_error);
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "endpoint = ").unwrap();

        assert!(matches!(
            Config::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_explicit_qr_dir() {
        let config = Config {
            qr_dir: Some(PathBuf::from("/tmp/codes")),
            ..Config::default()
        };
        assert_eq!(config.qr_dir().unwrap(), PathBuf::from("/tmp/codes"));
    }
}

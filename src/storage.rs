use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::models::{ShortenResult, Theme};
use crate::qr;

/// prefs.toml 的结构，只有一个键
#[derive(Debug, Default, Serialize, Deserialize)]
struct Prefs {
    theme: Option<String>,
}

/// 主题偏好的持久化
#[derive(Debug)]
pub struct ThemeStore {
    path: PathBuf,
    current: Theme,
}

impl ThemeStore {
    /// 打开偏好文件并读取初始主题
    pub fn open(path: PathBuf) -> Self {
        let mut store = Self {
            path,
            current: Theme::default(),
        };
        store.current = store.initial();
        store
    }

    /// 重新从文件推导主题，缺失或无法识别时为 Dark
    pub fn initial(&self) -> Theme {
        read_theme(&self.path)
    }

    pub fn current(&self) -> Theme {
        self.current
    }

    /// 切换主题：立即生效并写回文件
    ///
    /// 写入失败时本次会话仍使用新主题，错误交给调用方展示。
    pub fn toggle(&mut self) -> Result<Theme, StorageError> {
        self.current = self.current.toggled();
        write_theme(&self.path, self.current)?;
        Ok(self.current)
    }
}

fn read_theme(path: &Path) -> Theme {
    if !path.exists() {
        return Theme::default();
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            warn!("failed to read {}: {}", path.display(), e);
            return Theme::default();
        }
    };

    match toml::from_str::<Prefs>(&content) {
        Ok(prefs) => prefs
            .theme
            .as_deref()
            .and_then(Theme::parse)
            .unwrap_or_default(),
        Err(e) => {
            warn!("ignoring malformed {}: {}", path.display(), e);
            Theme::default()
        }
    }
}

fn write_theme(path: &Path, theme: Theme) -> Result<(), StorageError> {
    let prefs = Prefs {
        theme: Some(theme.as_str().to_string()),
    };
    let content = toml::to_string_pretty(&prefs)?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, content).map_err(|source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    })?;

    debug!("theme {} saved to {}", theme.as_str(), path.display());
    Ok(())
}

/// 把二维码 PNG 写入 `<dir>/<short_code>.png`
pub fn save_qr_png(result: &ShortenResult, dir: &Path) -> Result<PathBuf, StorageError> {
    let code = result
        .short_code()
        .ok_or_else(|| StorageError::NoShortCode(result.short_url.clone()))?;
    let bytes = qr::decode_png_bytes(&result.qr_code_base64)?;

    let path = dir.join(format!("{}.png", code));
    write_bytes(&path, &bytes)?;
    Ok(path)
}

/// 写入任意位置的二维码文件
pub fn write_qr_png(result: &ShortenResult, path: &Path) -> Result<(), StorageError> {
    let bytes = qr::decode_png_bytes(&result.qr_code_base64)?;
    write_bytes(path, &bytes)
}

fn write_bytes(path: &Path, bytes: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StorageError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    fs::write(path, bytes).map_err(|source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    })
}

//! 错误类型定义
//!
//! 每个关注点一个枚举，`AppError` 汇总给 main 使用

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// 调用短链接服务时的错误
#[derive(Debug, Error)]
pub enum ApiError {
    /// 服务端返回了非 2xx 状态，正文原样保留
    #[error("服务端拒绝请求 (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },
    /// 没有拿到可用的响应
    #[error("网络错误: {0}")]
    Transport(String),
}

/// 提交流程中展示给用户的错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("请输入 URL，例如：example.com 或 https://example.com")]
    EmptyInput,
    #[error("请求过于频繁，请在 {remaining_secs} 秒后重试")]
    Cooldown { remaining_secs: u64 },
    #[error("{0}")]
    Server(String),
    #[error("无法连接到服务器")]
    Unreachable,
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("无法写入 {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("序列化失败: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error(transparent)]
    Qr(#[from] QrError),
    #[error("短链接中没有可用作文件名的路径: {0}")]
    NoShortCode(String),
}

#[derive(Debug, Error)]
pub enum QrError {
    #[error("二维码数据不是合法的 base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("二维码图片解码失败: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("剪贴板不可用: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("无法获取用户目录: {0}")]
    NoDir(&'static str),
    #[error("无法读取配置文件 {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("配置文件 {path} 格式错误: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

use serde::{Deserialize, Serialize};

/// 创建短链接的请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortenRequest {
    pub url: String,
}

impl ShortenRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

/// 服务端返回的短链接结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResult {
    pub short_url: String,
    pub original_url: String,
    pub qr_code_base64: String, // PNG
}

impl ShortenResult {
    /// 可直接作为图片源的 data URI
    pub fn qr_data_uri(&self) -> String {
        format!("data:image/png;base64,{}", self.qr_code_base64)
    }

    /// 短链接的最后一段路径，例如 `http://host/abc` -> `abc`
    pub fn short_code(&self) -> Option<&str> {
        let without_query = self
            .short_url
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let path = without_query
            .split_once("://")
            .map(|(_, rest)| rest)
            .unwrap_or(without_query);
        // 去掉主机部分
        let (_, path) = path.split_once('/')?;
        path.rsplit('/').find(|segment| !segment.is_empty())
    }
}

/// 界面主题
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Light,
    #[default]
    Dark,
}

impl Theme {
    /// 只接受 "light" / "dark" 两个值
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

//! 短链接服务的 HTTP 客户端
//!
//! 只有一个接口：`POST {endpoint}/api/links`

use std::time::Duration;

use tracing::debug;
use ureq::Agent;

use crate::error::ApiError;
use crate::models::{ShortenRequest, ShortenResult};

const LINKS_PATH: &str = "/api/links";

/// 能够把长链接换成短链接的后端
pub trait Shortener: Send + Sync {
    fn shorten(&self, request: &ShortenRequest) -> Result<ShortenResult, ApiError>;
}

pub struct HttpShortener {
    agent: Agent,
    links_url: String,
}

impl HttpShortener {
    pub fn new(endpoint: &str, timeout: Option<Duration>) -> Self {
        // 非 2xx 的响应正文需要原样展示，不能被当作传输错误
        let agent = Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(timeout)
            .build()
            .into();

        Self {
            agent,
            links_url: format!("{}{}", endpoint.trim_end_matches('/'), LINKS_PATH),
        }
    }

    pub fn links_url(&self) -> &str {
        &self.links_url
    }
}

impl Shortener for HttpShortener {
    fn shorten(&self, request: &ShortenRequest) -> Result<ShortenResult, ApiError> {
        let body =
            serde_json::to_vec(request).map_err(|e| ApiError::Transport(e.to_string()))?;

        debug!("POST {} ({} bytes)", self.links_url, body.len());
        let mut resp = self
            .agent
            .post(&self.links_url)
            .header("Content-Type", "application/json")
            .header("Accept", "application/json")
            .send(body.as_slice())
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            // 正文按原样展示，非法 UTF-8 做有损替换；读取失败视为传输错误
            let bytes = resp
                .body_mut()
                .read_to_vec()
                .map_err(|e| ApiError::Transport(format!("读取错误响应失败: {}", e)))?;
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        resp.body_mut()
            .read_json::<ShortenResult>()
            .map_err(|e| ApiError::Transport(format!("响应解析失败: {}", e)))
    }
}

//! 提交控制器
//!
//! 持有输入、加载状态、错误、结果和冷却截止时间。
//! 网络请求本身不在这里发出：`submit` 决定是否要发请求，
//! 请求结束后调用方把响应交给 `finish`。

use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use tracing::{error, info};

use crate::error::{ApiError, SubmitError};
use crate::models::{ShortenRequest, ShortenResult};

/// 两次被接受的提交之间的最小间隔
pub const COOLDOWN: Duration = Duration::from_millis(5000);

/// `submit` 的结果
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// 已有请求在进行中，本次调用被忽略
    Ignored,
    /// 校验或冷却未通过，错误已记录在状态里
    Rejected,
    /// 需要发送该请求，随后必须调用 `finish`
    Dispatch(ShortenRequest),
}

#[derive(Debug, Default)]
pub struct SubmissionController {
    pub input: String,
    loading: bool,
    error: Option<SubmitError>,
    result: Option<ShortenResult>,
    completed_at: Option<DateTime<Local>>,
    cooldown_until: Option<Instant>,
    cooldown_on_transport_error: bool,
}

impl SubmissionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// 网络错误后是否也进入冷却（默认不进入）
    pub fn with_transport_cooldown(mut self, enabled: bool) -> Self {
        self.cooldown_on_transport_error = enabled;
        self
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&SubmitError> {
        self.error.as_ref()
    }

    pub fn result(&self) -> Option<&ShortenResult> {
        self.result.as_ref()
    }

    pub fn completed_at(&self) -> Option<DateTime<Local>> {
        self.completed_at
    }

    /// 冷却剩余秒数，向上取整且至少为 1；不在冷却中时返回 None
    pub fn cooldown_remaining_secs(&self, now: Instant) -> Option<u64> {
        let deadline = self.cooldown_until?;
        if now >= deadline {
            return None;
        }
        let remaining_ms = deadline.duration_since(now).as_millis() as u64;
        Some(remaining_ms.div_ceil(1000).max(1))
    }

    /// 尝试提交当前输入
    pub fn submit(&mut self, now: Instant) -> Submission {
        if self.loading {
            return Submission::Ignored;
        }

        self.error = None;
        self.result = None;
        self.completed_at = None;

        let trimmed = self.input.trim();
        if trimmed.is_empty() {
            self.error = Some(SubmitError::EmptyInput);
            return Submission::Rejected;
        }

        if let Some(remaining_secs) = self.cooldown_remaining_secs(now) {
            self.error = Some(SubmitError::Cooldown { remaining_secs });
            return Submission::Rejected;
        }

        let request = ShortenRequest::new(trimmed);
        self.loading = true;
        info!("submitting {}", request.url);
        Submission::Dispatch(request)
    }

    /// 处理已发出请求的响应
    pub fn finish(&mut self, response: Result<ShortenResult, ApiError>, now: Instant) {
        if !self.loading {
            return;
        }
        self.loading = false;

        match response {
            Ok(result) => {
                info!("shortened {} -> {}", result.original_url, result.short_url);
                self.error = None;
                self.result = Some(result);
                self.completed_at = Some(Local::now());
                self.cooldown_until = Some(now + COOLDOWN);
            }
            Err(ApiError::Rejected { body, .. }) => {
                let message = if body.trim().is_empty() {
                    "创建短链接失败".to_string()
                } else {
                    body
                };
                self.result = None;
                self.error = Some(SubmitError::Server(message));
                self.cooldown_until = Some(now + COOLDOWN);
            }
            Err(ApiError::Transport(detail)) => {
                error!("could not reach server: {}", detail);
                self.result = None;
                self.error = Some(SubmitError::Unreachable);
                if self.cooldown_on_transport_error {
                    self.cooldown_until = Some(now + COOLDOWN);
                }
            }
        }
    }
}

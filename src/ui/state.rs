//! App 状态定义 (Model)

use std::path::PathBuf;

use image::GrayImage;

use crate::clipboard::ClipboardWriter;
use crate::storage::ThemeStore;
use crate::submission::SubmissionController;
use crate::worker::RequestWorker;

/// 应用状态
pub struct App {
    pub submission: SubmissionController,
    pub themes: ThemeStore,
    pub mode: AppMode,
    /// 状态栏提示（复制、保存、主题写入失败等），与提交错误分开显示
    pub message: Option<String>,
    /// 当前结果的二维码预览，解码失败时为 None
    pub qr_preview: Option<GrayImage>,
    pub qr_dir: PathBuf,
    pub(super) worker: RequestWorker,
    pub(super) clipboard: Box<dyn ClipboardWriter>,
}

/// 应用模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Normal,
    Editing,
}

impl App {
    /// 创建新的应用实例，默认处于输入状态
    pub fn new(
        submission: SubmissionController,
        themes: ThemeStore,
        worker: RequestWorker,
        clipboard: Box<dyn ClipboardWriter>,
        qr_dir: PathBuf,
    ) -> Self {
        Self {
            submission,
            themes,
            mode: AppMode::Editing,
            message: None,
            qr_preview: None,
            qr_dir,
            worker,
            clipboard,
        }
    }
}

//! 业务逻辑处理 (Update/Dispatch)

use std::time::Instant;

use tracing::warn;

use super::actions::Action;
use super::state::{App, AppMode};
use crate::qr;
use crate::storage;
use crate::submission::Submission;
use crate::worker::Response;

impl App {
    /// 核心逻辑分发，返回 true 表示退出
    pub fn dispatch(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => return true,

            Action::CopyShortUrl => self.copy_short_url(),
            Action::SaveQr => self.save_qr(),
            Action::ToggleTheme => self.toggle_theme(),

            Action::StartEditing => self.mode = AppMode::Editing,
            Action::StopEditing => self.mode = AppMode::Normal,
            Action::Submit => self.submit_at(Instant::now()),

            Action::Input(c) => {
                if self.mode == AppMode::Editing {
                    self.submission.input.push(c);
                }
            }
            Action::DeleteChar => {
                if self.mode == AppMode::Editing {
                    self.submission.input.pop();
                }
            }
        }
        false
    }

    // ============ 提交相关 ============

    /// 提交输入框内容，通过校验时交给后台线程发送
    pub fn submit_at(&mut self, now: Instant) {
        match self.submission.submit(now) {
            Submission::Ignored => {}
            Submission::Rejected => self.qr_preview = None,
            Submission::Dispatch(request) => {
                self.qr_preview = None;
                self.message = None;
                self.worker.dispatch(request);
            }
        }
    }

    /// 取出后台线程的响应，返回是否有状态变化
    pub fn poll_response(&mut self) -> bool {
        match self.worker.try_recv() {
            Some(response) => {
                self.apply_response(response, Instant::now());
                true
            }
            None => false,
        }
    }

    pub fn apply_response(&mut self, response: Response, now: Instant) {
        self.submission.finish(response, now);

        self.qr_preview = self.submission.result().and_then(|result| {
            qr::decode_png(&result.qr_code_base64)
                .map_err(|e| warn!("cannot preview QR code: {}", e))
                .ok()
        });
    }

    // ============ 结果操作 ============

    /// 复制短链接，没有结果时不做任何事
    pub fn copy_short_url(&mut self) {
        let Some(short_url) = self.submission.result().map(|r| r.short_url.clone()) else {
            return;
        };

        self.message = Some(match self.clipboard.write_text(&short_url) {
            Ok(()) => "已复制到剪贴板".to_string(),
            Err(e) => {
                warn!("copy failed: {}", e);
                "复制失败".to_string()
            }
        });
    }

    pub fn save_qr(&mut self) {
        let Some(result) = self.submission.result() else {
            return;
        };

        self.message = Some(match storage::save_qr_png(result, &self.qr_dir) {
            Ok(path) => format!("二维码已保存到 {}", path.display()),
            Err(e) => {
                warn!("saving QR code failed: {}", e);
                format!("保存二维码失败: {}", e)
            }
        });
    }

    // ============ 主题 ============

    pub fn toggle_theme(&mut self) {
        if let Err(e) = self.themes.toggle() {
            warn!("theme not persisted: {}", e);
            self.message = Some(format!("主题未能保存: {}", e));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::api::Shortener;
    use crate::clipboard::ClipboardWriter;
    use crate::error::{ApiError, ClipboardError, SubmitError};
    use crate::models::{ShortenRequest, ShortenResult, Theme};
    use crate::qr::tests::sample_png_base64;
    use crate::storage::ThemeStore;
    use crate::submission::SubmissionController;
    use crate::worker::RequestWorker;

    struct CountingShortener {
        calls: Arc<AtomicUsize>,
    }

    impl Shortener for CountingShortener {
        fn shorten(&self, request: &ShortenRequest) -> Result<ShortenResult, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(ShortenResult {
                short_url: "http://x/abc".to_string(),
                original_url: request.url.clone(),
                qr_code_base64: sample_png_base64(4, 2),
            })
        }
    }

    struct FakeClipboard {
        fail: bool,
        written: Vec<String>,
    }

    impl ClipboardWriter for FakeClipboard {
        fn write_text(&mut self, text: &str) -> Result<(), ClipboardError> {
            if self.fail {
                return Err(ClipboardError::Unavailable("no display".into()));
            }
            self.written.push(text.to_string());
            Ok(())
        }
    }

    fn test_app(dir: &std::path::Path, clipboard_fails: bool) -> (App, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let worker = RequestWorker::new(Arc::new(CountingShortener {
            calls: calls.clone(),
        }));
        let app = App::new(
            SubmissionController::new(),
            ThemeStore::open(dir.join("prefs.toml")),
            worker,
            Box::new(FakeClipboard {
                fail: clipboard_fails,
                written: Vec::new(),
            }),
            dir.join("qr"),
        );
        (app, calls)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.dispatch(Action::Input(c));
        }
    }

    fn wait_for_response(app: &mut App) {
        let response = app.worker.recv_timeout(Duration::from_secs(5)).unwrap();
        app.apply_response(response, Instant::now());
    }

    #[test]
    fn test_typing_only_while_editing() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = test_app(dir.path(), false);

        type_text(&mut app, "ab");
        app.dispatch(Action::DeleteChar);
        app.dispatch(Action::StopEditing);
        app.dispatch(Action::Input('z'));
        assert_eq!(app.submission.input, "a");
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_submit_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, calls) = test_app(dir.path(), false);

        type_text(&mut app, " http://long ");
        app.dispatch(Action::Submit);
        assert!(app.submission.is_loading());

        wait_for_response(&mut app);
        let result = app.submission.result().unwrap();
        assert_eq!(result.original_url, "http://long");
        assert!(app.qr_preview.is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_second_submit_while_loading_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, calls) = test_app(dir.path(), false);

        type_text(&mut app, "http://long");
        app.dispatch(Action::Submit);
        app.dispatch(Action::Submit);
        app.dispatch(Action::Submit);

        wait_for_response(&mut app);
        assert!(app.worker.recv_timeout(Duration::from_millis(100)).is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_empty_submit_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, calls) = test_app(dir.path(), false);

        type_text(&mut app, "   ");
        app.dispatch(Action::Submit);
        assert_eq!(app.submission.error(), Some(&SubmitError::EmptyInput));
        assert!(!app.poll_response());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_cooldown_blocks_resubmit() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, calls) = test_app(dir.path(), false);

        type_text(&mut app, "http://long");
        app.dispatch(Action::Submit);
        wait_for_response(&mut app);

        app.dispatch(Action::Submit);
        assert!(matches!(
            app.submission.error(),
            Some(SubmitError::Cooldown { .. })
        ));
        assert!(app.submission.result().is_none());
        assert!(app.qr_preview.is_none());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_copy_notices() {
        let dir = tempfile::tempdir().unwrap();

        let (mut app, _) = test_app(dir.path(), false);
        app.dispatch(Action::CopyShortUrl);
        assert!(app.message.is_none());

        type_text(&mut app, "http://long");
        app.dispatch(Action::Submit);
        wait_for_response(&mut app);
        app.dispatch(Action::CopyShortUrl);
        assert_eq!(app.message.as_deref(), Some("已复制到剪贴板"));

        let (mut failing, _) = test_app(dir.path(), true);
        type_text(&mut failing, "http://long");
        failing.dispatch(Action::Submit);
        wait_for_response(&mut failing);
        failing.dispatch(Action::CopyShortUrl);
        assert_eq!(failing.message.as_deref(), Some("复制失败"));
    }

    #[test]
    fn test_save_qr_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = test_app(dir.path(), false);

        type_text(&mut app, "http://long");
        app.dispatch(Action::Submit);
        wait_for_response(&mut app);
        app.dispatch(Action::StopEditing);
        app.dispatch(Action::SaveQr);

        assert!(dir.path().join("qr").join("abc.png").exists());
        assert!(app.message.unwrap().starts_with("二维码已保存到"));
    }

    #[test]
    fn test_toggle_theme_persists() {
        let dir = tempfile::tempdir().unwrap();
        let (mut app, _) = test_app(dir.path(), false);
        assert_eq!(app.themes.current(), Theme::Dark);

        app.dispatch(Action::ToggleTheme);
        assert_eq!(app.themes.current(), Theme::Light);
        assert!(app.message.is_none());

        let reloaded = ThemeStore::open(dir.path().join("prefs.toml"));
        assert_eq!(reloaded.current(), Theme::Light);
    }
}

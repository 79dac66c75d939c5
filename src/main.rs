mod api;
mod cli;
mod clipboard;
mod config;
mod error;
mod logging;
mod models;
mod qr;
mod storage;
mod submission;
mod ui;
mod worker;

use std::io;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::prelude::*;
use tracing::info;

use crate::api::{HttpShortener, Shortener};
use crate::cli::{Cli, Command};
use crate::clipboard::SystemClipboard;
use crate::config::Config;
use crate::error::AppError;
use crate::storage::ThemeStore;
use crate::submission::{Submission, SubmissionController};
use crate::ui::{App, render};
use crate::worker::RequestWorker;

/// 事件轮询间隔，同时决定后台响应的最大展示延迟
const TICK: Duration = Duration::from_millis(100);

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("错误: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), AppError> {
    let cli = Cli::parse();

    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => config::default_config_path()?,
    };
    let mut config = Config::load(&config_path)?;
    cli.apply_to(&mut config);

    let data_dir = config::data_dir()?;
    let _guard = logging::init_logging(&data_dir, &config.log_level)?;
    let http = HttpShortener::new(&config.endpoint, config.timeout());
    info!("posting to {}", http.links_url());
    let shortener: Arc<dyn Shortener> = Arc::new(http);
    let controller =
        SubmissionController::new().with_transport_cooldown(config.cooldown_on_transport_error);

    match cli.command {
        Some(Command::Shorten {
            url,
            qr_out,
            data_uri,
        }) => shorten_once(
            controller,
            shortener.as_ref(),
            &url,
            qr_out.as_deref(),
            data_uri,
        ),
        None => {
            let app = App::new(
                controller,
                ThemeStore::open(data_dir.join("prefs.toml")),
                RequestWorker::new(shortener),
                Box::new(SystemClipboard),
                config.qr_dir()?,
            );
            run_tui(app)
        }
    }
}

/// 非交互模式：缩短一个链接并打印结果
fn shorten_once(
    mut controller: SubmissionController,
    shortener: &dyn Shortener,
    url: &str,
    qr_out: Option<&Path>,
    data_uri: bool,
) -> Result<(), AppError> {
    controller.input = url.to_string();
    if let Submission::Dispatch(request) = controller.submit(Instant::now()) {
        let response = shortener.shorten(&request);
        controller.finish(response, Instant::now());
    }

    if let Some(error) = controller.error() {
        return Err(error.clone().into());
    }
    if let Some(result) = controller.result() {
        println!("{}", result.short_url);
        println!("原链接: {}", result.original_url);
        if let Some(path) = qr_out {
            storage::write_qr_png(result, path)?;
            println!("二维码: {}", path.display());
        }
        if data_uri {
            println!("{}", result.qr_data_uri());
        }
    }
    Ok(())
}

fn run_tui(mut app: App) -> Result<(), AppError> {
    // 设置终端
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // 主循环
    let result = run_app(&mut terminal, &mut app);

    // 恢复终端
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(result?)
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        if event::poll(TICK)?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && ui::handle_key_event(app, key)
        {
            break;
        }

        app.poll_response();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ApiError, SubmitError};
    use crate::models::{ShortenRequest, ShortenResult};
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 记录调用次数并返回固定响应的后端
    struct StubShortener {
        calls: AtomicUsize,
        respond: fn(&ShortenRequest) -> Result<ShortenResult, ApiError>,
    }

    impl StubShortener {
        fn new(respond: fn(&ShortenRequest) -> Result<ShortenResult, ApiError>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                respond,
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl Shortener for StubShortener {
        fn shorten(&self, request: &ShortenRequest) -> Result<ShortenResult, ApiError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            (self.respond)(request)
        }
    }

    fn success(request: &ShortenRequest) -> Result<ShortenResult, ApiError> {
        Ok(ShortenResult {
            short_url: "http://x/abc".to_string(),
            original_url: request.url.clone(),
            qr_code_base64: crate::qr::tests::sample_png_base64(4, 2),
        })
    }

    #[test]
    fn test_shorten_once_blank_url_sends_nothing() {
        let stub = StubShortener::new(success);
        let err = shorten_once(SubmissionController::new(), &stub, "   ", None, false).unwrap_err();
        assert!(matches!(err, AppError::Submit(SubmitError::EmptyInput)));
        assert_eq!(stub.calls(), 0);
    }

    #[test]
    fn test_shorten_once_server_error_fails() {
        let stub = StubShortener::new(|_| {
            Err(ApiError::Rejected {
                status: 400,
                body: "URL 格式不正确".to_string(),
            })
        });
        let err =
            shorten_once(SubmissionController::new(), &stub, "bad", None, false).unwrap_err();
        match err {
            AppError::Submit(SubmitError::Server(message)) => {
                assert_eq!(message, "URL 格式不正确")
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(stub.calls(), 1);
    }

    #[test]
    fn test_shorten_once_transport_error_fails() {
        let stub = StubShortener::new(|_| Err(ApiError::Transport("refused".into())));
        let err = shorten_once(SubmissionController::new(), &stub, "http://long", None, false)
            .unwrap_err();
        assert!(matches!(err, AppError::Submit(SubmitError::Unreachable)));
    }

    #[test]
    fn test_shorten_once_writes_qr_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("code.png");
        let stub = StubShortener::new(success);

        shorten_once(
            SubmissionController::new(),
            &stub,
            "  http://long  ",
            Some(&path),
            true,
        )
        .unwrap();

        assert_eq!(stub.calls(), 1);
        let bytes = fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"\x89PNG"));
    }
}

//! 视图层模块
//!
//! 包含主渲染入口和各种视图组件

pub mod components;
pub mod palette;

use std::time::Instant;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Wrap},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::state::{App, AppMode};
use crate::qr;
use components::{panel, render_input_widget};
use palette::{Palette, theme_label};

/// 渲染 UI
pub fn render(frame: &mut Frame, app: &App) {
    let palette = Palette::for_theme(app.themes.current());
    frame.render_widget(Block::default().style(palette.base()), frame.area());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // 标题
            Constraint::Length(3), // 输入框
            Constraint::Length(1), // 错误
            Constraint::Min(8),    // 结果
            Constraint::Length(3), // 帮助
        ])
        .split(frame.area());

    render_title(frame, app, chunks[0], &palette);
    render_input(frame, app, chunks[1], &palette);
    render_error(frame, app, chunks[2], &palette);
    render_result(frame, app, chunks[3], &palette);
    render_help(frame, app, chunks[4], &palette);
}

fn render_title(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let title = Line::from(vec![
        Span::styled(
            "🔗 短链接 + 二维码",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled(
            theme_label(app.themes.current()),
            Style::default().fg(palette.muted),
        ),
    ]);
    frame.render_widget(Paragraph::new(title).block(panel("", palette)), area);
}

fn render_input(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let editing = app.mode == AppMode::Editing;
    let title = if app.submission.is_loading() {
        "长链接（处理中...）".to_string()
    } else if let Some(secs) = app.submission.cooldown_remaining_secs(Instant::now()) {
        format!("长链接（{} 秒后可再次提交）", secs)
    } else {
        "长链接（可省略 http/https）".to_string()
    };

    let inner_width = area.width.saturating_sub(2) as usize;
    let visible = visible_tail(&app.submission.input, inner_width.saturating_sub(1));
    render_input_widget(frame, area, &title, visible, editing, palette);

    if editing {
        let x = area.x + 1 + visible.width() as u16;
        frame.set_cursor_position((x, area.y + 1));
    }
}

/// 输入过长时只显示末尾能放下的部分，按显示宽度计算（中文占两格）
fn visible_tail(input: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = input.len();
    for (i, c) in input.char_indices().rev() {
        used += c.width().unwrap_or(0);
        if used > width {
            break;
        }
        start = i;
    }
    &input[start..]
}

fn render_error(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    if let Some(error) = app.submission.error() {
        let line = Paragraph::new(format!(" ✗ {}", error))
            .style(palette.base().fg(palette.error));
        frame.render_widget(line, area);
    }
}

fn render_result(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let block = panel("结果", palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.submission.is_loading() {
        frame.render_widget(
            Paragraph::new("正在生成短链接...").style(palette.base().fg(palette.muted)),
            inner,
        );
        return;
    }

    let Some(result) = app.submission.result() else {
        frame.render_widget(
            Paragraph::new("输入长链接后按 Enter，服务会返回短链接和二维码")
                .style(palette.base().fg(palette.muted))
                .wrap(Wrap { trim: true }),
            inner,
        );
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1)])
        .split(inner);

    let label = Style::default().fg(palette.muted);
    let completed = app
        .submission
        .completed_at()
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default();
    let details = vec![
        Line::from(vec![
            Span::styled("短链接: ", label),
            Span::styled(
                result.short_url.as_str(),
                Style::default()
                    .fg(palette.accent)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ),
        ]),
        Line::from(vec![
            Span::styled("原链接: ", label),
            Span::raw(result.original_url.as_str()),
        ]),
        Line::from(vec![Span::styled("生成于: ", label), Span::raw(completed)]),
    ];
    frame.render_widget(
        Paragraph::new(details)
            .style(palette.base())
            .wrap(Wrap { trim: false }),
        chunks[0],
    );

    render_qr(frame, app, chunks[1], palette);
}

fn render_qr(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let Some(image) = &app.qr_preview else {
        frame.render_widget(
            Paragraph::new("二维码无法显示，按 [s] 保存原始图片")
                .style(palette.base().fg(palette.muted)),
            area,
        );
        return;
    };

    // 二维码始终深色模块配浅色底，与主题无关，保证可被扫描
    let qr_style = Style::default().fg(Color::Black).bg(Color::White);
    let lines: Vec<Line> = qr::half_block_lines(image, area.width, area.height)
        .into_iter()
        .map(|row| Line::from(Span::styled(row, qr_style)))
        .collect();

    frame.render_widget(
        Paragraph::new(lines)
            .style(palette.base())
            .alignment(Alignment::Center),
        area,
    );
}

fn render_help(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let help_text = match app.mode {
        AppMode::Normal => "[i] 输入  [c] 复制短链接  [s] 保存二维码  [t] 切换主题  [q] 退出",
        AppMode::Editing => "[Enter] 缩短  [Esc] 完成输入  [Ctrl+C] 退出",
    };

    let mut spans = vec![Span::styled(help_text, Style::default().fg(palette.muted))];
    if let Some(message) = &app.message {
        spans.push(Span::raw("  |  "));
        spans.push(Span::styled(
            message.as_str(),
            Style::default().fg(palette.notice),
        ));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).block(panel("", palette)),
        area,
    );
}

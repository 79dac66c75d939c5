//! 主题配色
//!
//! 当前主题在渲染入口被转换成 Palette，再显式传给每个渲染函数

use ratatui::style::{Color, Style};

use crate::models::Theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
    pub border: Color,
    pub error: Color,
    pub notice: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => Self {
                background: Color::Rgb(17, 24, 39),
                text: Color::Rgb(229, 231, 235),
                muted: Color::Gray,
                accent: Color::Cyan,
                border: Color::DarkGray,
                error: Color::LightRed,
                notice: Color::LightGreen,
            },
            Theme::Light => Self {
                background: Color::Rgb(249, 250, 251),
                text: Color::Rgb(17, 24, 39),
                muted: Color::DarkGray,
                accent: Color::Blue,
                border: Color::Gray,
                error: Color::Red,
                notice: Color::Green,
            },
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.text).bg(self.background)
    }
}

/// 主题在标题栏中的显示文字
pub fn theme_label(theme: Theme) -> &'static str {
    match theme {
        Theme::Dark => "🌙 深色",
        Theme::Light => "☀️ 浅色",
    }
}

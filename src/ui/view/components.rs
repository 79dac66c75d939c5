//! 通用 UI 组件

use ratatui::{
    Frame,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, Borders, Paragraph},
};

use super::palette::Palette;

/// [组件] 带边框和标题的面板
pub fn panel<'a>(title: &'a str, palette: &Palette) -> Block<'a> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.border))
        .style(palette.base())
}

/// [组件] 带有标题和样式的单行输入框
pub fn render_input_widget(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    value: &str,
    is_focused: bool,
    palette: &Palette,
) {
    let style = if is_focused {
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(palette.muted)
    };

    let input = Paragraph::new(value)
        .style(style)
        .block(panel(title, palette).border_style(style));
    frame.render_widget(input, area);
}

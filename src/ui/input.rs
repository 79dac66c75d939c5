//! 键盘事件映射 (Input -> Action)

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::actions::Action;
use super::state::{App, AppMode};

/// 根据当前模式和按键获取对应的 Action
pub fn get_action(mode: AppMode, key: KeyEvent) -> Option<Action> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Some(Action::Quit);
    }

    match mode {
        AppMode::Normal => match key.code {
            KeyCode::Char('q') => Some(Action::Quit),
            KeyCode::Char('i') | KeyCode::Enter => Some(Action::StartEditing),
            KeyCode::Char('c') | KeyCode::Char('y') => Some(Action::CopyShortUrl),
            KeyCode::Char('s') => Some(Action::SaveQr),
            KeyCode::Char('t') => Some(Action::ToggleTheme),
            _ => None,
        },
        AppMode::Editing => match key.code {
            KeyCode::Esc => Some(Action::StopEditing),
            KeyCode::Enter => Some(Action::Submit),
            KeyCode::Backspace => Some(Action::DeleteChar),
            KeyCode::Char(c) => Some(Action::Input(c)),
            _ => None,
        },
    }
}

/// 处理按键事件，返回 true 表示退出
pub fn handle_key_event(app: &mut App, key: KeyEvent) -> bool {
    match get_action(app.mode, key) {
        Some(action) => app.dispatch(action),
        None => false,
    }
}

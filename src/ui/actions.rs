//! Action 枚举定义 (Intent)
//!
//! 用户交互转化为明确的语义化 Action

/// 用户操作枚举
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Quit,

    // 结果相关
    CopyShortUrl,
    SaveQr,
    ToggleTheme,

    // 输入框
    StartEditing,
    StopEditing, // Esc
    Submit,      // Enter
    Input(char),
    DeleteChar, // Backspace
}

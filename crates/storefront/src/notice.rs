//! Transient toast notices raised by shop actions.

use std::fmt;

/// Severity of a notice; selects the toast style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

impl NoticeLevel {
    /// CSS modifier class for the toast.
    #[must_use]
    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Success => "toast-success",
            Self::Error => "toast-error",
        }
    }
}

/// A short message shown to the visitor once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub message: String,
    pub level: NoticeLevel,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NoticeLevel::Success,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level: NoticeLevel::Error,
        }
    }

    #[must_use]
    pub const fn css_class(&self) -> &'static str {
        self.level.css_class()
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

//! # Toast State
//!
//! Transient messages shown after an action: store notices, command
//! confirmations ("Order placed successfully!") and errors. The shell drains
//! the queue after every command.

use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

use khatti_core::{Notice, NoticeLevel};

use crate::error::{ApiError, ErrorCode};

/// One transient message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Toast {
    pub level: NoticeLevel,
    pub message: String,
}

impl Toast {
    pub fn success(message: impl Into<String>) -> Self {
        Toast {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Toast {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Toast {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

impl From<Notice> for Toast {
    fn from(notice: Notice) -> Self {
        Toast {
            level: notice.level(),
            message: notice.message().to_string(),
        }
    }
}

/// A sign-in prompt is a nudge, not a failure.
impl From<&ApiError> for Toast {
    fn from(err: &ApiError) -> Self {
        match err.code {
            ErrorCode::Unauthenticated => Toast::info(err.message.clone()),
            _ => Toast::error(err.message.clone()),
        }
    }
}

/// Queue of pending toasts.
#[derive(Debug, Clone, Default)]
pub struct ToastState {
    queue: Arc<Mutex<Vec<Toast>>>,
}

impl ToastState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, toast: Toast) {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(toast);
    }

    /// Queues store notices in order.
    pub fn extend_notices(&self, notices: Vec<Notice>) {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        queue.extend(notices.into_iter().map(Toast::from));
    }

    /// Takes everything queued so far.
    pub fn drain(&self) -> Vec<Toast> {
        std::mem::take(&mut *self.queue.lock().unwrap_or_else(PoisonError::into_inner))
    }
}

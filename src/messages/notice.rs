//! Transient user-facing notifications

use tokio::sync::mpsc;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Error,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub detail: Option<String>,
}

impl Notice {
    pub fn success(title: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Success,
            title: title.into(),
            detail: None,
        }
    }

    pub fn error(title: impl Into<String>, detail: impl Into<String>) -> Self {
        Notice {
            level: NoticeLevel::Error,
            title: title.into(),
            detail: Some(detail.into()),
        }
    }
}

/// Cloneable sender side. Every notice is also logged, so a notifier
/// without a receiver still leaves a trace.
#[derive(Clone, Debug, Default)]
pub struct Notifier {
    tx: Option<mpsc::UnboundedSender<Notice>>,
}

impl Notifier {
    pub fn new(tx: mpsc::UnboundedSender<Notice>) -> Self {
        Notifier { tx: Some(tx) }
    }

    /// Notifier plus the receiver a front-end drains
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notice>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Log-only notifier
    pub fn silent() -> Self {
        Self::default()
    }

    pub fn send(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => tracing::info!(title = %notice.title, "Notice"),
            NoticeLevel::Error => tracing::warn!(
                title = %notice.title,
                detail = notice.detail.as_deref().unwrap_or(""),
                "Notice"
            ),
        }
        if let Some(tx) = &self.tx {
            let _ = tx.send(notice);
        }
    }

    pub fn success(&self, title: &str) {
        self.send(Notice::success(title));
    }

    pub fn error(&self, title: &str, detail: impl std::fmt::Display) {
        self.send(Notice::error(title, detail.to_string()));
    }
}

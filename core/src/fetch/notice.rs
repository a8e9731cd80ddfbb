//! Collaborators the client reports to: a notification sink and a loading indicator

use std::time::Duration;

/// Display time for the "switching proxy" notice
pub const SWITCH_NOTICE_DURATION: Duration = Duration::from_millis(1500);
pub const DEFAULT_NOTICE_DURATION: Duration = Duration::from_millis(4000);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A transient user-facing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
    pub duration: Duration,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
            duration: DEFAULT_NOTICE_DURATION,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
            duration: DEFAULT_NOTICE_DURATION,
        }
    }

    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }
}

pub trait Notifier: Send + Sync {
    fn notify(&self, notice: &Notice);
}

pub trait LoadingIndicator: Send + Sync {
    fn show(&self);
    fn hide(&self);
}

/// Sends notices to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Info => tracing::info!("{}", notice.message),
            NoticeLevel::Error => tracing::error!("{}", notice.message),
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoLoadingIndicator;

impl LoadingIndicator for NoLoadingIndicator {
    fn show(&self) {}
    fn hide(&self) {}
}

/// Hides the indicator when dropped, so every exit path turns it off
pub(crate) struct LoadingGuard<'a> {
    indicator: Option<&'a dyn LoadingIndicator>,
}

impl<'a> LoadingGuard<'a> {
    pub(crate) fn start(indicator: &'a dyn LoadingIndicator, silent: bool) -> Self {
        if silent {
            return Self { indicator: None };
        }
        indicator.show();
        Self { indicator: Some(indicator) }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if let Some(indicator) = self.indicator {
            indicator.hide();
        }
    }
}

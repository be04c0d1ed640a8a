use log::{info, warn};
use std::fmt;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Error,
}

/// A transient toast shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub message: String,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.level {
            Level::Success => write!(f, "[ok] {}", self.message),
            Level::Error => write!(f, "[error] {}", self.message),
        }
    }
}

/// Collects toasts until the front end drains and shows them.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    toasts: Arc<Mutex<Vec<Notification>>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&self, message: impl Into<String>) {
        let message = message.into();
        info!("Notify: {}", message);
        self.push(Level::Success, message);
    }

    pub fn error(&self, message: impl Into<String>) {
        let message = message.into();
        warn!("Notify: {}", message);
        self.push(Level::Error, message);
    }

    fn push(&self, level: Level, message: String) {
        self.toasts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(Notification { level, message });
    }

    /// Removes and returns every pending toast, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        std::mem::take(&mut *self.toasts.lock().unwrap_or_else(|e| e.into_inner()))
    }

    pub fn pending(&self) -> Vec<Notification> {
        self.toasts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

//! Transient notifications
//!
//! A notice is shown for a fixed time and then hides itself. Only one is
//! visible at a time: showing a new one replaces the pending one.

use serde::Serialize;

/// A visible notification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice<K> {
    pub kind: K,
    pub message: String,
    /// Seconds until it hides
    pub remaining: f32,
}

/// Single-slot notification timer
#[derive(Debug, Clone)]
pub struct NoticeSlot<K> {
    current: Option<Notice<K>>,
    ttl: f32,
}

impl<K> NoticeSlot<K> {
    pub fn new(ttl_secs: f32) -> Self {
        Self {
            current: None,
            ttl: ttl_secs.max(0.0),
        }
    }

    /// Show a notice, replacing any pending one
    pub fn show(&mut self, kind: K, message: impl Into<String>) {
        self.current = Some(Notice {
            kind,
            message: message.into(),
            remaining: self.ttl,
        });
    }

    /// Count down, hiding the notice once its time is up
    pub fn advance(&mut self, dt: f32) {
        let Some(notice) = self.current.as_mut() else {
            return;
        };
        notice.remaining -= dt.max(0.0);
        if notice.remaining <= 0.0 {
            self.current = None;
        }
    }

    /// Hide the pending notice without waiting for it to expire
    pub fn cancel(&mut self) -> Option<Notice<K>> {
        self.current.take()
    }

    pub fn current(&self) -> Option<&Notice<K>> {
        self.current.as_ref()
    }
}

/*
[INPUT]:  Messages raised by the dispatcher and the engine
[OUTPUT]: Independently timed toasts with visible and exiting phases
[POS]:    Presentation support - transient status messages
[UPDATE]: When toast timing or severities change
*/

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use tokio::time::Instant;

pub const DEFAULT_DISPLAY: Duration = Duration::from_millis(3000);
pub const DEFAULT_EXIT: Duration = Duration::from_millis(300);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn new(message: impl Into<String>, severity: Severity) -> Self {
        Self {
            message: message.into(),
            severity,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Info)
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Success)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Warning)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(message, Severity::Error)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastPhase {
    Visible,
    Exiting,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub id: u64,
    pub notification: Notification,
    pub posted_at: Instant,
}

/// Stack of live toasts, oldest first
#[derive(Debug)]
pub struct Notifier {
    toasts: VecDeque<Toast>,
    next_id: u64,
    display: Duration,
    exit: Duration,
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new(DEFAULT_DISPLAY, DEFAULT_EXIT)
    }
}

impl Notifier {
    pub fn new(display: Duration, exit: Duration) -> Self {
        Self {
            toasts: VecDeque::new(),
            next_id: 0,
            display,
            exit,
        }
    }

    pub fn notify(&mut self, notification: Notification) -> u64 {
        self.notify_at(notification, Instant::now())
    }

    pub fn notify_at(&mut self, notification: Notification, now: Instant) -> u64 {
        self.next_id += 1;
        let id = self.next_id;
        self.toasts.push_back(Toast {
            id,
            notification,
            posted_at: now,
        });
        id
    }

    /// Phase of `toast` at `now`; `None` once its exit transition is over
    pub fn phase(&self, toast: &Toast, now: Instant) -> Option<ToastPhase> {
        let age = now.saturating_duration_since(toast.posted_at);
        if age < self.display {
            Some(ToastPhase::Visible)
        } else if age < self.display + self.exit {
            Some(ToastPhase::Exiting)
        } else {
            None
        }
    }

    /// Drop every toast whose lifetime ended; returns how many went
    pub fn prune(&mut self, now: Instant) -> usize {
        let before = self.toasts.len();
        let lifetime = self.display + self.exit;
        self.toasts
            .retain(|toast| now.saturating_duration_since(toast.posted_at) < lifetime);
        before - self.toasts.len()
    }

    pub fn visible(&self, now: Instant) -> impl Iterator<Item = (&Toast, ToastPhase)> + '_ {
        self.toasts
            .iter()
            .filter_map(move |toast| self.phase(toast, now).map(|phase| (toast, phase)))
    }

    pub fn len(&self) -> usize {
        self.toasts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.toasts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toast_lifecycle() {
        let mut notifier = Notifier::default();
        let start = Instant::now();
        notifier.notify_at(Notification::success("download started"), start);

        let phases = |n: &Notifier, at: Duration| -> Vec<ToastPhase> {
            n.visible(start + at).map(|(_, phase)| phase).collect()
        };

        assert_eq!(phases(&notifier, Duration::ZERO), vec![ToastPhase::Visible]);
        assert_eq!(phases(&notifier, Duration::from_millis(2999)), vec![ToastPhase::Visible]);
        assert_eq!(phases(&notifier, Duration::from_millis(3000)), vec![ToastPhase::Exiting]);
        assert_eq!(phases(&notifier, Duration::from_millis(3299)), vec![ToastPhase::Exiting]);
        assert!(phases(&notifier, Duration::from_millis(3300)).is_empty());

        assert_eq!(notifier.prune(start + Duration::from_millis(3299)), 0);
        assert_eq!(notifier.prune(start + Duration::from_millis(3300)), 1);
        assert!(notifier.is_empty());
    }

    #[test]
    fn toasts_are_timed_independently() {
        let mut notifier = Notifier::new(Duration::from_secs(3), Duration::from_millis(300));
        let start = Instant::now();
        let first = notifier.notify_at(Notification::info("paused"), start);
        let second = notifier.notify_at(
            Notification::error("cancel failed"),
            start + Duration::from_secs(2),
        );
        assert_ne!(first, second);

        let at = start + Duration::from_millis(3100);
        let live: Vec<(u64, ToastPhase)> = notifier
            .visible(at)
            .map(|(toast, phase)| (toast.id, phase))
            .collect();
        assert_eq!(live, vec![(first, ToastPhase::Exiting), (second, ToastPhase::Visible)]);

        notifier.prune(start + Duration::from_secs(4));
        assert_eq!(notifier.len(), 1);
    }

    #[test]
    fn severity_labels() {
        assert_eq!(Severity::Warning.to_string(), "warning");
        assert_eq!(Notification::error("x").severity, Severity::Error);
    }
}

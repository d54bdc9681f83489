//! Terminal implementations of the notifier and navigator ports.

use std::sync::Mutex;

use console::style;
use indicatif::ProgressBar;

use buddy_core::navigate::{HOME_ROUTE, Navigator};
use buddy_core::notify::{Notification, NotificationKind, Notifier};

/// Prints each notification as a styled one-liner on stderr.
///
/// Also remembers the latest one so `--json` output can report it.
pub struct TerminalNotifier {
    quiet: bool,
    progress: Option<ProgressBar>,
    latest: Mutex<Option<Notification>>,
}

impl TerminalNotifier {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            progress: None,
            latest: Mutex::new(None),
        }
    }

    /// Print around `progress` so the spinner line is not clobbered.
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn latest(&self) -> Option<Notification> {
        self.latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Notifier for TerminalNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        *self
            .latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(Notification {
            kind,
            message: message.to_string(),
        });

        if self.quiet {
            return;
        }
        let line = match kind {
            NotificationKind::Success => format!("  {} {}", style("✓").green().bold(), message),
            NotificationKind::Failure => {
                format!("  {} {}", style("✗").red().bold(), style(message).red())
            }
        };
        match &self.progress {
            Some(progress) => progress.suspend(|| eprintln!("{line}")),
            None => eprintln!("{line}"),
        }
    }
}

/// Tracks the "current route" of a terminal session.
///
/// A terminal has no view to re-fetch, so `refresh` only counts and logs.
pub struct TerminalNavigator {
    route: Mutex<String>,
    refreshes: Mutex<u32>,
}

impl TerminalNavigator {
    /// Start on the companion form route.
    pub fn new(start: impl Into<String>) -> Self {
        Self {
            route: Mutex::new(start.into()),
            refreshes: Mutex::new(0),
        }
    }

    pub fn route(&self) -> String {
        self.route
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn refreshes(&self) -> u32 {
        *self
            .refreshes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_home(&self) -> bool {
        self.route() == HOME_ROUTE
    }
}

impl Navigator for TerminalNavigator {
    fn refresh(&self) {
        let mut refreshes = self
            .refreshes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *refreshes += 1;
        tracing::debug!(refreshes = *refreshes, "View refresh requested");
    }

    fn push(&self, path: &str) {
        let mut route = self
            .route
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        tracing::debug!(from = %route, to = path, "Navigating");
        *route = path.to_string();
    }
}

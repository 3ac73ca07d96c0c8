//! UI actions. Every state change in the app loop is an `Action`.

use std::fmt;

use tokio::sync::mpsc::UnboundedSender;
use tourdesk_core::{Notification, Notifier};
use tracing::debug;

use crate::screen::ScreenId;

/// A destructive step waiting on `y`/`n`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    Delete {
        screen: ScreenId,
        id: String,
        title: String,
    },
}

impl fmt::Display for ConfirmAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delete { title, .. } => write!(f, "Delete {title}? This cannot be undone."),
        }
    }
}

#[derive(Debug, Clone)]
pub enum Action {
    // ── Lifecycle ──────────────────────────────────────────────────
    Quit,
    Tick,
    Render,
    Resize(u16, u16),

    // ── Navigation ────────────────────────────────────────────────
    SwitchScreen(ScreenId),
    GoBack,
    ToggleHelp,

    // ── Search ────────────────────────────────────────────────────
    OpenSearch,
    /// Esc: clear the term and close the bar.
    CloseSearch,
    SearchInput(String),
    /// Enter: apply the term now and close the bar.
    SearchSubmit,

    // ── Records ───────────────────────────────────────────────────
    RequestDelete { id: String, title: String },
    ShowConfirm(ConfirmAction),
    ConfirmYes,
    ConfirmNo,
    /// Confirmed delete, routed to the owning screen.
    Delete(String),

    // ── Notifications ─────────────────────────────────────────────
    Notify(Notification),
}

/// Routes `EntityView` notifications into the app loop.
#[derive(Debug, Clone)]
pub struct ActionNotifier(pub UnboundedSender<Action>);

impl Notifier for ActionNotifier {
    fn notify(&self, notification: Notification) {
        if self.0.send(Action::Notify(notification)).is_err() {
            debug!("notification dropped, app loop gone");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;
    use tourdesk_core::NotificationLevel;

    #[test]
    fn notifier_forwards_to_app_loop() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        ActionNotifier(tx).notify(Notification::success("Hotel deleted"));

        let Action::Notify(n) = rx.try_recv().unwrap() else {
            panic!("expected a notification");
        };
        assert_eq!(n.level, NotificationLevel::Success);
        assert_eq!(n.message, "Hotel deleted");
    }

    #[test]
    fn confirm_prompt_names_the_record() {
        let confirm = ConfirmAction::Delete {
            screen: ScreenId::Hotels,
            id: "abc123".into(),
            title: "Hotel Tisure".into(),
        };
        assert_eq!(confirm.to_string(), "Delete Hotel Tisure? This cannot be undone.");
    }
}

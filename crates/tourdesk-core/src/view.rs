// ── Entity view orchestrator ──
//
// Per-screen view mode (list/add/edit/details), the selected record, and
// the create/update/delete handlers. Every outcome is reported through a
// `Notifier`; the query client takes care of tag invalidation, so the list
// refetch follows from the mutation itself.

use std::fmt;

use tokio::sync::mpsc;
use tourdesk_api::RequestBody;
use tracing::{debug, warn};

use crate::client::{QueryClient, Saved};
use crate::error::CoreError;
use crate::model::{Entity, Order, OrderStatus};

// ── Notifications ────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A toast-style message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub level: NotificationLevel,
}

impl Notification {
    pub fn success(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Success,
        }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Error,
        }
    }

    pub fn warning(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Warning,
        }
    }

    pub fn info(msg: impl Into<String>) -> Self {
        Self {
            message: msg.into(),
            level: NotificationLevel::Info,
        }
    }
}

/// Where notifications go: a TUI status bar, CLI stderr, a test buffer.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

impl Notifier for mpsc::UnboundedSender<Notification> {
    fn notify(&self, notification: Notification) {
        if self.send(notification).is_err() {
            debug!("notification dropped, receiver gone");
        }
    }
}

// ── View mode ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    #[default]
    List,
    Add,
    Edit,
    /// Read-only overlay on top of the list.
    Details,
}

impl ViewMode {
    /// Every valid edge of the view state machine.
    pub fn can_transition(self, to: Self) -> bool {
        matches!(
            (self, to),
            (Self::List, Self::Add | Self::Edit | Self::Details)
                | (Self::Add | Self::Edit | Self::Details, Self::List)
        )
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::List => "list",
            Self::Add => "add",
            Self::Edit => "edit",
            Self::Details => "details",
        };
        f.write_str(name)
    }
}

// ── Orchestrator ─────────────────────────────────────────────────────

/// Delete waiting on user confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub id: String,
    pub title: String,
}

pub struct EntityView<T: Entity, N: Notifier> {
    client: QueryClient,
    notifier: N,
    mode: ViewMode,
    selected: Option<T>,
    pending_delete: Option<PendingDelete>,
}

impl<T: Entity, N: Notifier> EntityView<T, N> {
    pub fn new(client: QueryClient, notifier: N) -> Self {
        Self {
            client,
            notifier,
            mode: ViewMode::List,
            selected: None,
            pending_delete: None,
        }
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// The record being edited or inspected.
    pub fn selected(&self) -> Option<&T> {
        self.selected.as_ref()
    }

    pub fn pending_delete(&self) -> Option<&PendingDelete> {
        self.pending_delete.as_ref()
    }

    pub fn client(&self) -> &QueryClient {
        &self.client
    }

    fn transition(&mut self, to: ViewMode) -> Result<(), CoreError> {
        if !self.mode.can_transition(to) {
            return Err(CoreError::InvalidTransition {
                from: self.mode.to_string(),
                to: to.to_string(),
            });
        }
        debug!(from = %self.mode, %to, "view transition");
        self.mode = to;
        Ok(())
    }

    // ── Transitions ──────────────────────────────────────────────────

    pub fn open_add(&mut self) -> Result<(), CoreError> {
        self.transition(ViewMode::Add)?;
        self.selected = None;
        Ok(())
    }

    /// Edit `record`; it becomes the form's initial values.
    pub fn open_edit(&mut self, record: T) -> Result<(), CoreError> {
        self.transition(ViewMode::Edit)?;
        self.selected = Some(record);
        Ok(())
    }

    pub fn open_details(&mut self, record: T) -> Result<(), CoreError> {
        self.transition(ViewMode::Details)?;
        self.selected = Some(record);
        Ok(())
    }

    pub fn close_details(&mut self) -> Result<(), CoreError> {
        if self.mode != ViewMode::Details {
            return Err(CoreError::InvalidTransition {
                from: self.mode.to_string(),
                to: ViewMode::List.to_string(),
            });
        }
        self.back_to_list();
        Ok(())
    }

    /// Leave the add/edit form, discarding the edits.
    pub fn cancel(&mut self) -> Result<(), CoreError> {
        if !matches!(self.mode, ViewMode::Add | ViewMode::Edit) {
            return Err(CoreError::InvalidTransition {
                from: self.mode.to_string(),
                to: ViewMode::List.to_string(),
            });
        }
        self.back_to_list();
        Ok(())
    }

    fn back_to_list(&mut self) {
        self.mode = ViewMode::List;
        self.selected = None;
    }

    // ── Submit ───────────────────────────────────────────────────────

    /// Submit the add/edit form.
    ///
    /// `prepared` is the outcome of building the request body; a
    /// validation failure there is reported without issuing a request.
    /// On success the view returns to the list. On failure the mode is
    /// kept so the user can correct and retry.
    pub async fn submit(
        &mut self,
        prepared: Result<RequestBody, CoreError>,
    ) -> Result<Saved<T>, CoreError> {
        let target = match self.mode {
            ViewMode::Add => None,
            ViewMode::Edit => self.selected.as_ref().map(|r| r.id().to_owned()),
            other => {
                return Err(CoreError::InvalidTransition {
                    from: other.to_string(),
                    to: ViewMode::List.to_string(),
                });
            }
        };

        let result = match prepared {
            Ok(body) => match target {
                Some(id) => self.client.update::<T>(&id, body).await,
                None if self.mode == ViewMode::Edit => Err(CoreError::validation(
                    "id",
                    "no record selected for editing",
                )),
                None => self.client.create::<T>(body).await,
            },
            Err(e) => Err(e),
        };

        match result {
            Ok(saved) => {
                let fallback = if self.mode == ViewMode::Add {
                    "Created successfully"
                } else {
                    "Updated successfully"
                };
                self.notifier.notify(Notification::success(message_or(
                    &saved.message,
                    fallback,
                )));
                self.back_to_list();
                Ok(saved)
            }
            Err(e) => {
                if !e.is_validation() {
                    warn!(resource = T::RESOURCE.label(), error = %e, "submit failed");
                }
                self.notifier.notify(Notification::error(e.user_message()));
                Err(e)
            }
        }
    }

    // ── Delete ───────────────────────────────────────────────────────

    /// Open the confirmation gate for deleting `record`.
    pub fn request_delete(&mut self, record: &T) -> Result<(), CoreError> {
        if !matches!(self.mode, ViewMode::List | ViewMode::Details) {
            return Err(CoreError::InvalidTransition {
                from: self.mode.to_string(),
                to: "delete".into(),
            });
        }
        self.pending_delete = Some(PendingDelete {
            id: record.id().to_owned(),
            title: record.title().to_owned(),
        });
        Ok(())
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Issue the confirmed delete. Returns `Ok(false)` when nothing was
    /// awaiting confirmation.
    pub async fn confirm_delete(&mut self) -> Result<bool, CoreError> {
        let Some(pending) = self.pending_delete.take() else {
            return Ok(false);
        };

        match self.client.delete::<T>(&pending.id).await {
            Ok(ack) => {
                self.notifier.notify(Notification::success(message_or(
                    &ack.message,
                    &format!("{} deleted", pending.title),
                )));
                if self.selected.as_ref().is_some_and(|r| r.id() == pending.id) {
                    self.back_to_list();
                }
                Ok(true)
            }
            Err(e) => {
                warn!(id = %pending.id, error = %e, "delete failed");
                self.notifier.notify(Notification::error(e.user_message()));
                Err(e)
            }
        }
    }
}

impl<N: Notifier> EntityView<Order, N> {
    /// Move an order to `status`.
    pub async fn update_status(&mut self, id: &str, status: OrderStatus) -> Result<(), CoreError> {
        match self.client.update_order_status(id, status).await {
            Ok(ack) => {
                self.notifier.notify(Notification::success(message_or(
                    &ack.message,
                    &format!("Order marked {status}"),
                )));
                Ok(())
            }
            Err(e) => {
                self.notifier.notify(Notification::error(e.user_message()));
                Err(e)
            }
        }
    }
}

fn message_or(message: &str, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_owned()
    } else {
        message.to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transition_table() {
        use ViewMode::{Add, Details, Edit, List};

        assert!(List.can_transition(Add));
        assert!(List.can_transition(Edit));
        assert!(List.can_transition(Details));
        assert!(Add.can_transition(List));
        assert!(Edit.can_transition(List));
        assert!(Details.can_transition(List));

        assert!(!Add.can_transition(Edit));
        assert!(!Edit.can_transition(Add));
        assert!(!Details.can_transition(Edit));
        assert!(!Details.can_transition(Add));
        assert!(!List.can_transition(List));
    }

    #[test]
    fn blank_server_message_falls_back() {
        assert_eq!(message_or("  ", "Created successfully"), "Created successfully");
        assert_eq!(message_or("Hotel created", "x"), "Hotel created");
    }
}

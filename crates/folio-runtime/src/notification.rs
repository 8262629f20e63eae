#![forbid(unsafe_code)]

//! Transient notifications (toasts).
//!
//! At most one notification is on screen. Showing a new one removes the
//! current one immediately. Each notification walks
//! `Entering → Visible → Exiting → removed` on timers:
//!
//! ```text
//! t=0            ShowNotification (entering styles)
//! t=enter_ms     SetNotificationPhase(Visible)
//! t=visible_ms   SetNotificationPhase(Exiting)
//! +exit_ms       RemoveNotification
//! ```
//!
//! Dismissing skips straight to the exit transition.

use folio_core::mutation::{NotificationKind, NotificationPhase, UiMutation};
use folio_core::timer::{TimerId, TimerService};

use crate::config::{NotificationConfig, ms};

/// Timer steps of a notification, keyed by notification id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationTimer {
    Reveal(u64),
    Expire(u64),
    Remove(u64),
}

/// The notification currently on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub kind: NotificationKind,
    pub message: String,
    pub phase: NotificationPhase,
}

#[derive(Debug)]
struct Current {
    notification: Notification,
    timers: Vec<TimerId>,
}

/// Owns the single on-screen notification and its timers.
#[derive(Debug, Default)]
pub struct NotificationCenter {
    config: NotificationConfig,
    current: Option<Current>,
    next_id: u64,
}

impl NotificationCenter {
    #[must_use]
    pub fn new(config: NotificationConfig) -> Self {
        Self {
            config,
            current: None,
            next_id: 1,
        }
    }

    /// The notification on screen, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref().map(|c| &c.notification)
    }

    /// Show `message`, replacing whatever is on screen.
    pub fn show<K, T>(
        &mut self,
        timers: &mut T,
        kind: NotificationKind,
        message: impl Into<String>,
    ) -> Vec<UiMutation>
    where
        K: From<NotificationTimer>,
        T: TimerService<K>,
    {
        let mut out = Vec::new();
        if let Some(old) = self.current.take() {
            for timer in old.timers {
                timers.cancel(timer);
            }
            out.push(UiMutation::RemoveNotification {
                id: old.notification.id,
            });
        }

        let id = self.next_id.max(1);
        self.next_id = id.wrapping_add(1);
        let message = message.into();
        tracing::debug!(id, kind = kind.as_str(), "notification shown");
        out.push(UiMutation::ShowNotification {
            id,
            kind,
            message: message.clone(),
        });

        let reveal = timers.after(
            ms(self.config.enter_ms),
            NotificationTimer::Reveal(id).into(),
        );
        let expire = timers.after(
            ms(self.config.visible_ms),
            NotificationTimer::Expire(id).into(),
        );
        self.current = Some(Current {
            notification: Notification {
                id,
                kind,
                message,
                phase: NotificationPhase::Entering,
            },
            timers: vec![reveal, expire],
        });
        out
    }

    /// Start the exit transition of notification `id` early.
    pub fn dismiss<K, T>(&mut self, timers: &mut T, id: u64) -> Vec<UiMutation>
    where
        K: From<NotificationTimer>,
        T: TimerService<K>,
    {
        let Some(current) = self.current.as_mut() else {
            return Vec::new();
        };
        if current.notification.id != id
            || current.notification.phase == NotificationPhase::Exiting
        {
            tracing::debug!(id, "dismiss of stale notification ignored");
            return Vec::new();
        }
        for timer in current.timers.drain(..) {
            timers.cancel(timer);
        }
        self.begin_exit(timers)
    }

    /// Handle a fired notification timer.
    pub fn on_timer<K, T>(&mut self, timers: &mut T, timer: NotificationTimer) -> Vec<UiMutation>
    where
        K: From<NotificationTimer>,
        T: TimerService<K>,
    {
        let id = match timer {
            NotificationTimer::Reveal(id)
            | NotificationTimer::Expire(id)
            | NotificationTimer::Remove(id) => id,
        };
        let Some(current) = self.current.as_mut() else {
            return Vec::new();
        };
        if current.notification.id != id {
            return Vec::new();
        }
        match timer {
            NotificationTimer::Reveal(_) => {
                current.notification.phase = NotificationPhase::Visible;
                vec![UiMutation::SetNotificationPhase {
                    id,
                    phase: NotificationPhase::Visible,
                }]
            }
            NotificationTimer::Expire(_) => {
                current.timers.clear();
                self.begin_exit(timers)
            }
            NotificationTimer::Remove(_) => {
                self.current = None;
                tracing::trace!(id, "notification removed");
                vec![UiMutation::RemoveNotification { id }]
            }
        }
    }

    fn begin_exit<K, T>(&mut self, timers: &mut T) -> Vec<UiMutation>
    where
        K: From<NotificationTimer>,
        T: TimerService<K>,
    {
        let Some(current) = self.current.as_mut() else {
            return Vec::new();
        };
        let id = current.notification.id;
        current.notification.phase = NotificationPhase::Exiting;
        let remove = timers.after(ms(self.config.exit_ms), NotificationTimer::Remove(id).into());
        current.timers.push(remove);
        vec![UiMutation::SetNotificationPhase {
            id,
            phase: NotificationPhase::Exiting,
        }]
    }
}

//! One-shot coordinator events
//!
//! Events are created when a terminal or exceptional condition occurs and
//! delivered at most once per subscriber through per-subscriber channels.
//! They are never re-broadcast: each subscriber drains its own queue.

use crate::types::{RequestKey, SessionId, UpdateInfo};

/// A one-shot notification from the coordinator.
///
/// Exactly one event is emitted per triggering condition (one failure
/// report produces one `SessionFailed`, regardless of how many modules
/// the failed request covered).
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Human-readable notice for the host to surface (toast, status bar)
    Toast(String),

    /// A single requested module finished installing and can be launched
    Navigation(String),

    /// The installer needs user approval before the session continues.
    /// The host shows the confirmation UI and reports the outcome via
    /// `confirmation_resolved`.
    ConfirmationRequired {
        session_id: SessionId,
        keys: Vec<RequestKey>,
    },

    /// An update is available; `immediate` carries the launch-mode
    /// decision derived from the update policy.
    UpdateAvailable { info: UpdateInfo, immediate: bool },

    /// The installer reported `Failed` for an active session
    SessionFailed {
        keys: Vec<RequestKey>,
        error_code: i32,
    },

    /// A session was canceled, including a declined confirmation
    Canceled { keys: Vec<RequestKey> },

    /// A deferred (background-scheduled) operation was accepted
    DeferredScheduled {
        modules: Vec<String>,
        uninstall: bool,
    },

    /// A deferred operation was rejected by the installer
    DeferredRejected {
        modules: Vec<String>,
        uninstall: bool,
    },
}

impl Event {
    /// Get a human-readable summary
    pub fn summary(&self) -> String {
        match self {
            Event::Toast(text) => text.clone(),
            Event::Navigation(module) => format!("Module {} ready to launch", module),
            Event::ConfirmationRequired { session_id, .. } => {
                format!("Session {} requires user confirmation", session_id)
            }
            Event::UpdateAvailable { info, immediate } => format!(
                "Update to version {} available ({})",
                info.available_version_code,
                if *immediate { "immediate" } else { "flexible" }
            ),
            Event::SessionFailed { keys, error_code } => {
                let names: Vec<String> = keys.iter().map(ToString::to_string).collect();
                format!("Error {} for {}", error_code, names.join(", "))
            }
            Event::Canceled { keys } => {
                let names: Vec<String> = keys.iter().map(ToString::to_string).collect();
                format!("Canceled {}", names.join(", "))
            }
            Event::DeferredScheduled { modules, uninstall } => format!(
                "Scheduled deferred {} of {}",
                if *uninstall { "uninstall" } else { "install" },
                modules.join(", ")
            ),
            Event::DeferredRejected { modules, uninstall } => format!(
                "Deferred {} rejected for {}",
                if *uninstall { "uninstall" } else { "install" },
                modules.join(", ")
            ),
        }
    }

    /// Check if this event reports a failure
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Event::SessionFailed { .. } | Event::DeferredRejected { .. }
        )
    }
}

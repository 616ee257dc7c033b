//! Domain types for install/update sessions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier the installer assigns to one tracked session
pub type SessionId = u64;

/// Key identifying one in-flight unit of work.
///
/// At most one active session exists per key at a time; the coordinator
/// deduplicates requests against this.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestKey {
    /// A feature module, identified by name
    Module(String),
    /// A language split, identified by its language tag (e.g. "pl")
    Language(String),
    /// The whole-app update flow (one implicit key per process)
    AppUpdate,
}

impl RequestKey {
    pub fn module(name: impl Into<String>) -> Self {
        Self::Module(name.into())
    }

    pub fn language(tag: impl Into<String>) -> Self {
        Self::Language(tag.into())
    }
}

impl fmt::Display for RequestKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKey::Module(name) => write!(f, "module:{}", name),
            RequestKey::Language(tag) => write!(f, "language:{}", tag),
            RequestKey::AppUpdate => write!(f, "app-update"),
        }
    }
}

/// Raw session status as reported by the installer service.
///
/// Reports arrive over a wire protocol; unrecognized status strings
/// deserialize to `Unknown` rather than failing the whole report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RawStatus {
    Pending,
    Downloading,
    Downloaded,
    Installing,
    Installed,
    Failed,
    Canceling,
    Canceled,
    RequiresConfirmation,
    #[serde(other)]
    Unknown,
}

impl RawStatus {
    /// Terminal statuses end a session; no further progress is expected.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Installed | Self::Canceled | Self::Failed)
    }
}

/// Tracked state for one session, replaced wholesale on every report.
///
/// Invariants: `bytes_downloaded <= total_bytes` when both are known;
/// `error_code` is present if and only if the status is `Failed`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub session_id: SessionId,
    pub raw_status: RawStatus,
    pub bytes_downloaded: u64,
    pub total_bytes: u64,
    pub error_code: Option<i32>,
}

impl SessionState {
    pub fn new(session_id: SessionId, raw_status: RawStatus) -> Self {
        Self {
            session_id,
            raw_status,
            bytes_downloaded: 0,
            total_bytes: 0,
            error_code: None,
        }
    }

    /// Placeholder state recorded when a request has been reserved but
    /// the installer has not yet assigned a session id.
    pub fn requested() -> Self {
        Self::new(0, RawStatus::Pending)
    }

    pub fn with_progress(mut self, bytes_downloaded: u64, total_bytes: u64) -> Self {
        self.bytes_downloaded = bytes_downloaded;
        self.total_bytes = total_bytes;
        self
    }

    pub fn with_error(mut self, error_code: i32) -> Self {
        self.error_code = Some(error_code);
        self
    }

    /// Download progress in `0.0..=1.0`.
    ///
    /// An unknown total (`total_bytes == 0`) yields `0.0`, never NaN.
    pub fn progress_fraction(&self) -> f64 {
        if self.total_bytes == 0 {
            0.0
        } else {
            (self.bytes_downloaded as f64 / self.total_bytes as f64).clamp(0.0, 1.0)
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.raw_status.is_terminal()
    }
}

/// Client-facing status for a module or language key.
///
/// Exactly one variant is active per key at any time, derived
/// deterministically from the tracked `SessionState`.
#[derive(Debug, Clone, PartialEq)]
pub enum ModuleStatus {
    /// Not installed and no active session
    Available,
    /// A session is running; progress in `0.0..=1.0`
    Installing(f64),
    /// Installed and ready to use
    Installed,
    /// Unknown or unsupported; no progress will be reported
    Unavailable,
    /// The installer needs user approval before continuing
    NeedsConfirmation(SessionId),
}

/// Client-facing status for the whole-app update flow
#[derive(Debug, Clone, PartialEq)]
pub enum UpdateStatus {
    /// No update is known to be available
    NotAvailable,
    /// An update is available but not yet started
    Available(UpdateInfo),
    /// An update session is running; progress in `0.0..=1.0`
    InProgress(f64),
    /// The update is downloaded and waiting to be completed
    Downloaded,
}

/// Update metadata returned by the installer's update check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInfo {
    pub available_version_code: i64,
    #[serde(default)]
    pub update_priority: i32,
    /// Days since the update became available to this client, if known
    #[serde(default)]
    pub staleness_days: Option<u32>,
    #[serde(default)]
    pub immediate_allowed: bool,
    #[serde(default)]
    pub flexible_allowed: bool,
}

//! Status report wire type
//!
//! One report describes the state of one installer session and covers
//! every module and language in the original request. Update sessions
//! carry no names at all.

use serde::{Deserialize, Serialize};

use splitflow_core::types::{RawStatus, RequestKey, SessionId, SessionState};

/// A single status report pushed by the installer service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub session_id: SessionId,
    #[serde(default)]
    pub module_names: Vec<String>,
    #[serde(default)]
    pub languages: Vec<String>,
    pub status: RawStatus,
    #[serde(default)]
    pub bytes_downloaded: u64,
    #[serde(default)]
    pub total_bytes: u64,
    #[serde(default)]
    pub error_code: Option<i32>,
}

impl StatusReport {
    /// Report for a single-module session
    pub fn module(session_id: SessionId, name: impl Into<String>, status: RawStatus) -> Self {
        Self::modules(session_id, vec![name.into()], status)
    }

    /// Report for a multi-module session
    pub fn modules(session_id: SessionId, names: Vec<String>, status: RawStatus) -> Self {
        Self {
            session_id,
            module_names: names,
            languages: Vec::new(),
            status,
            bytes_downloaded: 0,
            total_bytes: 0,
            error_code: None,
        }
    }

    /// Report for a language-split session
    pub fn language(session_id: SessionId, tag: impl Into<String>, status: RawStatus) -> Self {
        Self {
            session_id,
            module_names: Vec::new(),
            languages: vec![tag.into()],
            status,
            bytes_downloaded: 0,
            total_bytes: 0,
            error_code: None,
        }
    }

    /// Report for the whole-app update session
    pub fn app_update(session_id: SessionId, status: RawStatus) -> Self {
        Self {
            session_id,
            module_names: Vec::new(),
            languages: Vec::new(),
            status,
            bytes_downloaded: 0,
            total_bytes: 0,
            error_code: None,
        }
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

    /// The request keys this report applies to.
    ///
    /// A report without modules or languages is an app-update report.
    pub fn keys(&self) -> Vec<RequestKey> {
        let mut keys: Vec<RequestKey> = self
            .module_names
            .iter()
            .map(|name| RequestKey::module(name.clone()))
            .chain(
                self.languages
                    .iter()
                    .map(|tag| RequestKey::language(tag.clone())),
            )
            .collect();
        if keys.is_empty() {
            keys.push(RequestKey::AppUpdate);
        }
        keys
    }

    /// Convert into the tracked session state.
    ///
    /// The error code is kept only for `Failed` reports so the tracked
    /// state upholds the "error iff failed" invariant even for sloppy
    /// wire input.
    pub fn to_session_state(&self) -> SessionState {
        SessionState {
            session_id: self.session_id,
            raw_status: self.status,
            bytes_downloaded: self.bytes_downloaded,
            total_bytes: self.total_bytes,
            error_code: if self.status == RawStatus::Failed {
                self.error_code
            } else {
                None
            },
        }
    }

    /// Parse a JSON-encoded report line from the installer transport
    pub fn parse(json: &str) -> Option<Self> {
        serde_json::from_str(json).ok()
    }
}

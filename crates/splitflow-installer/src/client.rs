//! Installer service client contract
//!
//! The installer service is an external collaborator: it owns downloads,
//! session lifecycles, and the confirmation UI. Splitflow consumes it
//! through this trait only. Implementations bind the platform transport;
//! tests use the scriptable [`FakeInstaller`](crate::FakeInstaller).

use std::collections::HashSet;

use tokio::sync::mpsc;

use splitflow_core::prelude::*;
use splitflow_core::types::{SessionId, UpdateInfo};

use crate::report::StatusReport;

/// Client contract for the external installer service.
///
/// Submission methods suspend while the request is handed to the
/// service but never wait for the download itself; progress arrives on
/// the report stream.
#[trait_variant::make(InstallerClient: Send)]
pub trait LocalInstallerClient {
    /// Submit one combined install request for the given modules.
    /// Returns the session id assigned by the installer.
    async fn submit_install(&self, modules: &[String]) -> Result<SessionId>;

    /// Submit an install request for a language split
    async fn submit_language_install(&self, language: &str) -> Result<SessionId>;

    /// Schedule a background install; no session is tracked
    async fn deferred_install(&self, modules: &[String]) -> Result<()>;

    /// Schedule a background uninstall; no session is tracked
    async fn deferred_uninstall(&self, modules: &[String]) -> Result<()>;

    /// Ask the service whether an app update is available
    async fn check_update(&self) -> Result<Option<UpdateInfo>>;

    /// Start the update flow in immediate or flexible mode
    async fn start_update(&self, info: &UpdateInfo, immediate: bool) -> Result<SessionId>;

    /// Finalize a downloaded flexible update
    async fn complete_update(&self) -> Result<()>;

    /// Modules currently installed on the device
    fn installed_modules(&self) -> HashSet<String>;

    /// Language splits currently installed on the device
    fn installed_languages(&self) -> HashSet<String>;

    /// Take the push stream of status reports.
    ///
    /// Single consumer: the stream can be taken exactly once. The
    /// coordinator calls this during construction.
    fn take_report_stream(&mut self) -> Result<mpsc::Receiver<StatusReport>>;
}

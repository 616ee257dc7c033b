//! Scriptable in-memory installer for tests
//!
//! `FakeInstaller` records every submission and lets tests drive the
//! report stream by hand. Cloning is cheap and shares state, so a test
//! can keep a handle while the coordinator owns the client.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::mpsc;

use splitflow_core::prelude::*;
use splitflow_core::types::{SessionId, UpdateInfo};

use crate::client::InstallerClient;
use crate::report::StatusReport;

/// Buffer size for the scripted report stream
const REPORT_BUFFER: usize = 64;

#[derive(Debug)]
struct FakeInner {
    report_tx: Mutex<Option<mpsc::Sender<StatusReport>>>,
    report_rx: Mutex<Option<mpsc::Receiver<StatusReport>>>,
    installed_modules: Mutex<HashSet<String>>,
    installed_languages: Mutex<HashSet<String>>,
    submissions: Mutex<Vec<Vec<String>>>,
    language_submissions: Mutex<Vec<String>>,
    deferred_installs: Mutex<Vec<Vec<String>>>,
    deferred_uninstalls: Mutex<Vec<Vec<String>>>,
    update_starts: Mutex<Vec<bool>>,
    completed_updates: AtomicU64,
    update_info: Mutex<Option<UpdateInfo>>,
    rejection: Mutex<Option<String>>,
    next_session: AtomicU64,
}

/// In-memory installer service for coordinator tests
#[derive(Debug, Clone)]
pub struct FakeInstaller {
    inner: Arc<FakeInner>,
}

impl Default for FakeInstaller {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeInstaller {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel(REPORT_BUFFER);
        Self {
            inner: Arc::new(FakeInner {
                report_tx: Mutex::new(Some(tx)),
                report_rx: Mutex::new(Some(rx)),
                installed_modules: Mutex::new(HashSet::new()),
                installed_languages: Mutex::new(HashSet::new()),
                submissions: Mutex::new(Vec::new()),
                language_submissions: Mutex::new(Vec::new()),
                deferred_installs: Mutex::new(Vec::new()),
                deferred_uninstalls: Mutex::new(Vec::new()),
                update_starts: Mutex::new(Vec::new()),
                completed_updates: AtomicU64::new(0),
                update_info: Mutex::new(None),
                rejection: Mutex::new(None),
                next_session: AtomicU64::new(1),
            }),
        }
    }

    // ─────────────────────────────────────────────────────────
    // Scripting
    // ─────────────────────────────────────────────────────────

    /// Mark a module as already installed on the device
    pub fn set_installed(&self, module: impl Into<String>) {
        self.inner
            .installed_modules
            .lock()
            .unwrap()
            .insert(module.into());
    }

    /// Mark a language split as already installed
    pub fn set_installed_language(&self, tag: impl Into<String>) {
        self.inner
            .installed_languages
            .lock()
            .unwrap()
            .insert(tag.into());
    }

    /// Script the result of the next update check
    pub fn set_update_info(&self, info: Option<UpdateInfo>) {
        *self.inner.update_info.lock().unwrap() = info;
    }

    /// Reject all submissions with the given message until cleared
    pub fn reject_submissions(&self, message: impl Into<String>) {
        *self.inner.rejection.lock().unwrap() = Some(message.into());
    }

    /// Accept submissions again
    pub fn accept_submissions(&self) {
        *self.inner.rejection.lock().unwrap() = None;
    }

    /// Push a status report onto the stream
    pub async fn push_report(&self, report: StatusReport) {
        debug!(
            "Fake installer pushing report: session {} {:?}",
            report.session_id, report.status
        );
        let tx = self.inner.report_tx.lock().unwrap().clone();
        if let Some(tx) = tx {
            let _ = tx.send(report).await;
        }
    }

    /// Drop the report stream's sender, simulating transport death
    pub fn kill_stream(&self) {
        debug!("Fake installer killing report stream");
        self.inner.report_tx.lock().unwrap().take();
    }

    // ─────────────────────────────────────────────────────────
    // Assertions
    // ─────────────────────────────────────────────────────────

    /// All module submissions received, in order
    pub fn submissions(&self) -> Vec<Vec<String>> {
        self.inner.submissions.lock().unwrap().clone()
    }

    /// All language submissions received, in order
    pub fn language_submissions(&self) -> Vec<String> {
        self.inner.language_submissions.lock().unwrap().clone()
    }

    pub fn deferred_install_calls(&self) -> Vec<Vec<String>> {
        self.inner.deferred_installs.lock().unwrap().clone()
    }

    pub fn deferred_uninstall_calls(&self) -> Vec<Vec<String>> {
        self.inner.deferred_uninstalls.lock().unwrap().clone()
    }

    /// Launch modes of every started update (`true` = immediate)
    pub fn update_starts(&self) -> Vec<bool> {
        self.inner.update_starts.lock().unwrap().clone()
    }

    pub fn completed_update_count(&self) -> u64 {
        self.inner.completed_updates.load(Ordering::SeqCst)
    }

    fn check_rejection(&self) -> Result<()> {
        match self.inner.rejection.lock().unwrap().as_ref() {
            Some(message) => Err(Error::submission(message.clone())),
            None => Ok(()),
        }
    }

    fn alloc_session(&self) -> SessionId {
        self.inner.next_session.fetch_add(1, Ordering::SeqCst)
    }
}

impl InstallerClient for FakeInstaller {
    async fn submit_install(&self, modules: &[String]) -> Result<SessionId> {
        self.check_rejection()?;
        self.inner
            .submissions
            .lock()
            .unwrap()
            .push(modules.to_vec());
        Ok(self.alloc_session())
    }

    async fn submit_language_install(&self, language: &str) -> Result<SessionId> {
        self.check_rejection()?;
        self.inner
            .language_submissions
            .lock()
            .unwrap()
            .push(language.to_string());
        Ok(self.alloc_session())
    }

    async fn deferred_install(&self, modules: &[String]) -> Result<()> {
        self.check_rejection()?;
        self.inner
            .deferred_installs
            .lock()
            .unwrap()
            .push(modules.to_vec());
        Ok(())
    }

    async fn deferred_uninstall(&self, modules: &[String]) -> Result<()> {
        self.check_rejection()?;
        self.inner
            .deferred_uninstalls
            .lock()
            .unwrap()
            .push(modules.to_vec());
        Ok(())
    }

    async fn check_update(&self) -> Result<Option<UpdateInfo>> {
        self.check_rejection()
            .map_err(|e| Error::update_check(e.to_string()))?;
        Ok(self.inner.update_info.lock().unwrap().clone())
    }

    async fn start_update(&self, _info: &UpdateInfo, immediate: bool) -> Result<SessionId> {
        self.check_rejection()?;
        self.inner.update_starts.lock().unwrap().push(immediate);
        Ok(self.alloc_session())
    }

    async fn complete_update(&self) -> Result<()> {
        self.inner.completed_updates.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn installed_modules(&self) -> HashSet<String> {
        self.inner.installed_modules.lock().unwrap().clone()
    }

    fn installed_languages(&self) -> HashSet<String> {
        self.inner.installed_languages.lock().unwrap().clone()
    }

    fn take_report_stream(&mut self) -> Result<mpsc::Receiver<StatusReport>> {
        self.inner
            .report_rx
            .lock()
            .unwrap()
            .take()
            .ok_or(Error::ReportStreamTaken)
    }
}

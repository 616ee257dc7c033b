//! Install/update coordination
//!
//! The coordinator is the public entry point: it submits requests to the
//! installer client, consumes the installer's report stream on a
//! dedicated dispatcher task, keeps the session registry, and fans the
//! projected state out to subscribers.
//!
//! Registry mutations follow a single-writer discipline: reports are
//! applied only by the dispatcher, and request-time reservations go
//! through the same lock, so two callers can never both observe "no
//! active session" and double-submit.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use splitflow_core::prelude::*;
use splitflow_core::projection::{project_module, project_update, should_launch_immediately};
use splitflow_core::types::{
    ModuleStatus, RawStatus, RequestKey, SessionId, SessionState, UpdateInfo, UpdateStatus,
};
use splitflow_core::Event;
use splitflow_installer::{InstallerClient, StatusReport};

use crate::config::Settings;
use crate::registry::SessionRegistry;
use crate::streams::{EventHub, EventStream, StatusStream, UpdateStream, ValueStream};

/// Outcome of an install request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallRequestOutcome {
    /// One combined request was submitted to the installer
    Submitted { session_id: SessionId },
    /// Every requested key is already installed; no network call
    AlreadyInstalled,
    /// Every remaining key already has an active session; no new request
    AlreadyInProgress,
}

/// Outcome of an update request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateRequestOutcome {
    /// The installer knows no update for this app
    NoUpdate,
    /// The update flow was started
    Started {
        session_id: SessionId,
        immediate: bool,
    },
    /// An update session is already running
    AlreadyInProgress,
    /// A downloaded update was finalized
    Completed,
}

/// Shared state between the coordinator handle and its dispatcher task
struct CoordinatorInner {
    registry: Mutex<SessionRegistry>,
    module_streams: Mutex<HashMap<RequestKey, watch::Sender<ModuleStatus>>>,
    update_tx: Mutex<Option<watch::Sender<UpdateStatus>>>,
    update_info: Mutex<Option<UpdateInfo>>,
    events: EventHub,
}

impl CoordinatorInner {
    fn new() -> Self {
        let (update_tx, _update_rx) = watch::channel(UpdateStatus::NotAvailable);
        Self {
            registry: Mutex::new(SessionRegistry::new()),
            module_streams: Mutex::new(HashMap::new()),
            update_tx: Mutex::new(Some(update_tx)),
            update_info: Mutex::new(None),
            events: EventHub::new(),
        }
    }

    /// Publish a projected status for a key, creating the channel if no
    /// subscriber asked for it yet (the dispatcher may see unsolicited
    /// sessions before anyone subscribes).
    fn publish_status(&self, key: &RequestKey, status: ModuleStatus) {
        let mut streams = self.module_streams.lock().unwrap();
        match streams.get(key) {
            Some(tx) => {
                tx.send_replace(status);
            }
            None => {
                let (tx, _rx) = watch::channel(status);
                streams.insert(key.clone(), tx);
            }
        }
    }

    fn publish_update(&self, status: UpdateStatus) {
        if let Some(tx) = self.update_tx.lock().unwrap().as_ref() {
            tx.send_replace(status);
        }
    }

    /// Project the app-update state from the registry and latest info
    fn current_update_status(&self) -> UpdateStatus {
        let state = self.registry.lock().unwrap().get(&RequestKey::AppUpdate);
        let info = self.update_info.lock().unwrap();
        project_update(state.as_ref(), info.as_ref())
    }

    /// Drop every stream and tracked session
    fn teardown(&self) {
        self.registry.lock().unwrap().clear();
        self.module_streams.lock().unwrap().clear();
        self.update_tx.lock().unwrap().take();
        self.events.close();
    }
}

/// Coordinates module installs and app updates against an installer
/// service.
///
/// One logical coordinator exists per process. All methods take `&self`
/// and are safe to call from multiple tasks.
pub struct Coordinator<C: InstallerClient> {
    client: C,
    inner: Arc<CoordinatorInner>,
    shutdown_tx: watch::Sender<bool>,
    dispatcher: Option<JoinHandle<()>>,
    settings: Settings,
}

impl<C: InstallerClient> std::fmt::Debug for Coordinator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("tracked_sessions", &self.inner.registry.lock().unwrap().len())
            .field("has_dispatcher", &self.dispatcher.is_some())
            .finish()
    }
}

impl<C: InstallerClient> Coordinator<C> {
    /// Take the client's report stream and start the dispatcher task.
    ///
    /// Must be called within a Tokio runtime.
    pub fn spawn(mut client: C, settings: Settings) -> Result<Self> {
        let reports = client.take_report_stream()?;
        let inner = Arc::new(CoordinatorInner::new());
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        let dispatcher = tokio::spawn(dispatch_loop(reports, Arc::clone(&inner), shutdown_rx));

        Ok(Self {
            client,
            inner,
            shutdown_tx,
            dispatcher: Some(dispatcher),
            settings,
        })
    }

    // ─────────────────────────────────────────────────────────
    // Install Requests
    // ─────────────────────────────────────────────────────────

    /// Request installation of the given modules.
    ///
    /// Installed modules are skipped; modules with an active session are
    /// not re-submitted. Whatever remains goes to the installer as one
    /// combined request. Rejection is returned to the caller and also
    /// surfaced as a `Toast` for passive observers.
    pub async fn request_install(&self, modules: &[&str]) -> Result<InstallRequestOutcome> {
        let installed = self.client.installed_modules();
        let requested: Vec<String> = modules.iter().map(|m| (*m).to_string()).collect();

        let mut to_submit: Vec<String> = Vec::new();
        let mut active = 0usize;
        {
            let mut registry = self.inner.registry.lock().unwrap();
            for name in &requested {
                if installed.contains(name) {
                    continue;
                }
                let key = RequestKey::module(name.clone());
                if registry.is_active(&key) {
                    active += 1;
                    continue;
                }
                // Reserve the key before the async submit so a
                // concurrent caller sees it as active.
                registry.upsert(key, SessionState::requested());
                to_submit.push(name.clone());
            }
        }

        if to_submit.is_empty() {
            if active > 0 {
                debug!("Install request deduplicated; {} active session(s)", active);
                return Ok(InstallRequestOutcome::AlreadyInProgress);
            }
            info!("All requested modules already installed: {:?}", requested);
            if requested.len() == 1 {
                self.inner.events.emit(Event::Navigation(requested[0].clone()));
            } else {
                self.inner
                    .events
                    .emit(Event::Toast(format!(
                        "Already installed: {}",
                        requested.join(" - ")
                    )));
            }
            return Ok(InstallRequestOutcome::AlreadyInstalled);
        }

        for name in &to_submit {
            self.inner
                .publish_status(&RequestKey::module(name.clone()), ModuleStatus::Installing(0.0));
        }

        match self.client.submit_install(&to_submit).await {
            Ok(session_id) => {
                info!("Install submitted for {:?}: session {}", to_submit, session_id);
                let mut registry = self.inner.registry.lock().unwrap();
                for name in &to_submit {
                    let key = RequestKey::module(name.clone());
                    // A real report may already have replaced the
                    // reservation; only stamp untouched placeholders.
                    if let Some(state) = registry.get(&key) {
                        if state == SessionState::requested() {
                            registry.upsert(key, SessionState::new(session_id, RawStatus::Pending));
                        }
                    }
                }
                Ok(InstallRequestOutcome::Submitted { session_id })
            }
            Err(e) => {
                warn!("Install submission rejected for {:?}: {}", to_submit, e);
                self.roll_back_reservations(&to_submit);
                self.inner.events.emit(Event::Toast(format!(
                    "Failed starting installation of {}",
                    to_submit.join(" - ")
                )));
                Err(e)
            }
        }
    }

    /// Request installation of a language split
    pub async fn request_language_install(&self, language: &str) -> Result<InstallRequestOutcome> {
        if self.client.installed_languages().contains(language) {
            info!("Language {} already installed", language);
            self.inner
                .events
                .emit(Event::Toast(format!("Language {} already installed", language)));
            return Ok(InstallRequestOutcome::AlreadyInstalled);
        }

        let key = RequestKey::language(language);
        {
            let mut registry = self.inner.registry.lock().unwrap();
            if registry.is_active(&key) {
                debug!("Language install for {} already in progress", language);
                return Ok(InstallRequestOutcome::AlreadyInProgress);
            }
            registry.upsert(key.clone(), SessionState::requested());
        }
        self.inner.publish_status(&key, ModuleStatus::Installing(0.0));

        match self.client.submit_language_install(language).await {
            Ok(session_id) => {
                info!("Language install submitted for {}: session {}", language, session_id);
                let mut registry = self.inner.registry.lock().unwrap();
                if let Some(state) = registry.get(&key) {
                    if state == SessionState::requested() {
                        registry.upsert(key, SessionState::new(session_id, RawStatus::Pending));
                    }
                }
                Ok(InstallRequestOutcome::Submitted { session_id })
            }
            Err(e) => {
                warn!("Language install rejected for {}: {}", language, e);
                {
                    let mut registry = self.inner.registry.lock().unwrap();
                    if registry.get(&key) == Some(SessionState::requested()) {
                        registry.remove(&key);
                    }
                }
                self.inner.publish_status(&key, ModuleStatus::Available);
                self.inner.events.emit(Event::Toast(format!(
                    "Failed starting installation of language {}",
                    language
                )));
                Err(e)
            }
        }
    }

    fn roll_back_reservations(&self, modules: &[String]) {
        {
            let mut registry = self.inner.registry.lock().unwrap();
            for name in modules {
                let key = RequestKey::module(name.clone());
                if registry.get(&key) == Some(SessionState::requested()) {
                    registry.remove(&key);
                }
            }
        }
        for name in modules {
            self.inner
                .publish_status(&RequestKey::module(name.clone()), ModuleStatus::Available);
        }
    }

    // ─────────────────────────────────────────────────────────
    // Update Requests
    // ─────────────────────────────────────────────────────────

    /// Drive the app-update flow one step forward.
    ///
    /// With no active session this checks for an update and, if one is
    /// available, starts it in the mode chosen by the update policy.
    /// With a running session it reports progress; with a downloaded
    /// flexible update it finalizes the install.
    pub async fn request_update(&self) -> Result<UpdateRequestOutcome> {
        match self.inner.current_update_status() {
            UpdateStatus::InProgress(_) => {
                self.inner
                    .events
                    .emit(Event::Toast("Update already in progress".to_string()));
                return Ok(UpdateRequestOutcome::AlreadyInProgress);
            }
            UpdateStatus::Downloaded => {
                info!("Completing downloaded update");
                self.client.complete_update().await?;
                self.inner.registry.lock().unwrap().remove(&RequestKey::AppUpdate);
                self.inner.update_info.lock().unwrap().take();
                self.inner.publish_update(UpdateStatus::NotAvailable);
                return Ok(UpdateRequestOutcome::Completed);
            }
            UpdateStatus::NotAvailable | UpdateStatus::Available(_) => {}
        }

        let info = match self.client.check_update().await {
            Ok(info) => info,
            Err(e) => {
                warn!("Update check failed: {}", e);
                self.inner
                    .events
                    .emit(Event::Toast("Update info not available".to_string()));
                return Err(e);
            }
        };

        let Some(info) = info else {
            self.inner
                .events
                .emit(Event::Toast("No update available".to_string()));
            self.inner.publish_update(UpdateStatus::NotAvailable);
            return Ok(UpdateRequestOutcome::NoUpdate);
        };

        *self.inner.update_info.lock().unwrap() = Some(info.clone());
        self.inner.publish_update(UpdateStatus::Available(info.clone()));

        let immediate = if should_launch_immediately(&info, &self.settings.update) {
            true
        } else if info.flexible_allowed {
            false
        } else if info.immediate_allowed {
            true
        } else {
            warn!(
                "Update {} allows neither immediate nor flexible mode",
                info.available_version_code
            );
            self.inner
                .events
                .emit(Event::Toast("Update cannot be started".to_string()));
            return Err(Error::UpdateNotAllowed);
        };

        self.inner.events.emit(Event::UpdateAvailable {
            info: info.clone(),
            immediate,
        });

        match self.client.start_update(&info, immediate).await {
            Ok(session_id) => {
                info!(
                    "Update started (session {}, {})",
                    session_id,
                    if immediate { "immediate" } else { "flexible" }
                );
                self.inner.registry.lock().unwrap().upsert(
                    RequestKey::AppUpdate,
                    SessionState::new(session_id, RawStatus::Pending),
                );
                self.inner.publish_update(UpdateStatus::InProgress(0.0));
                Ok(UpdateRequestOutcome::Started {
                    session_id,
                    immediate,
                })
            }
            Err(e) => {
                warn!("Update start rejected: {}", e);
                self.inner
                    .events
                    .emit(Event::Toast("Failed starting update".to_string()));
                Err(e)
            }
        }
    }

    // ─────────────────────────────────────────────────────────
    // Deferred Operations
    // ─────────────────────────────────────────────────────────

    /// Schedule a background install. No session is tracked; the single
    /// outcome arrives as one event.
    pub async fn deferred_install(&self, modules: &[&str]) -> Result<()> {
        self.deferred(modules, false).await
    }

    /// Schedule a background uninstall
    pub async fn deferred_uninstall(&self, modules: &[&str]) -> Result<()> {
        self.deferred(modules, true).await
    }

    async fn deferred(&self, modules: &[&str], uninstall: bool) -> Result<()> {
        let modules: Vec<String> = modules.iter().map(|m| (*m).to_string()).collect();
        let result = if uninstall {
            self.client.deferred_uninstall(&modules).await
        } else {
            self.client.deferred_install(&modules).await
        };

        match result {
            Ok(()) => {
                info!(
                    "Deferred {} scheduled for {:?}",
                    if uninstall { "uninstall" } else { "install" },
                    modules
                );
                self.inner
                    .events
                    .emit(Event::DeferredScheduled { modules, uninstall });
                Ok(())
            }
            Err(e) => {
                warn!("Deferred request rejected: {}", e);
                self.inner
                    .events
                    .emit(Event::DeferredRejected { modules, uninstall });
                Err(e)
            }
        }
    }

    // ─────────────────────────────────────────────────────────
    // Confirmation
    // ─────────────────────────────────────────────────────────

    /// Report the outcome of the installer's confirmation UI.
    ///
    /// On decline the session is treated as returned-to-available and a
    /// cancellation event fires. On accept the installer resumes the
    /// session and the coordinator keeps observing it.
    pub fn confirmation_resolved(&self, key: &RequestKey, accepted: bool) {
        if accepted {
            info!("Confirmation accepted for {}", key);
            return;
        }

        info!("Confirmation declined for {}", key);
        self.inner.registry.lock().unwrap().remove(key);
        match key {
            RequestKey::AppUpdate => {
                let status = self.inner.current_update_status();
                self.inner.publish_update(status);
            }
            _ => self.inner.publish_status(key, ModuleStatus::Available),
        }
        self.inner.events.emit(Event::Canceled {
            keys: vec![key.clone()],
        });
    }

    // ─────────────────────────────────────────────────────────
    // Observation
    // ─────────────────────────────────────────────────────────

    /// Subscribe to projected status for a key.
    ///
    /// The current value is delivered immediately; one value follows per
    /// registry mutation for the key. The stream ends when the
    /// coordinator is torn down.
    pub fn status_stream(&self, key: &RequestKey) -> StatusStream {
        let mut streams = self.inner.module_streams.lock().unwrap();
        let tx = streams.entry(key.clone()).or_insert_with(|| {
            let initial = self.initial_status(key);
            watch::channel(initial).0
        });
        ValueStream::new(tx.subscribe())
    }

    /// Subscribe to the projected app-update status
    pub fn update_stream(&self) -> UpdateStream {
        let guard = self.inner.update_tx.lock().unwrap();
        match guard.as_ref() {
            Some(tx) => ValueStream::new(tx.subscribe()),
            None => {
                // Torn down: a stream that yields the final state once
                let (tx, rx) = watch::channel(UpdateStatus::NotAvailable);
                drop(tx);
                ValueStream::new(rx)
            }
        }
    }

    /// Subscribe to one-shot events
    pub fn events(&self) -> EventStream {
        self.inner.events.subscribe()
    }

    /// Modules currently installed on the device
    pub fn installed_modules(&self) -> std::collections::HashSet<String> {
        self.client.installed_modules()
    }

    /// Language splits currently installed on the device
    pub fn installed_languages(&self) -> std::collections::HashSet<String> {
        self.client.installed_languages()
    }

    fn initial_status(&self, key: &RequestKey) -> ModuleStatus {
        if let Some(state) = self.inner.registry.lock().unwrap().get(key) {
            return project_module(&state);
        }
        let installed = match key {
            RequestKey::Module(name) => self.client.installed_modules().contains(name),
            RequestKey::Language(tag) => self.client.installed_languages().contains(tag),
            RequestKey::AppUpdate => false,
        };
        if installed {
            ModuleStatus::Installed
        } else {
            ModuleStatus::Available
        }
    }

    // ─────────────────────────────────────────────────────────
    // Teardown
    // ─────────────────────────────────────────────────────────

    /// Stop observing the installer and drop all tracked state.
    ///
    /// In-flight installer-side sessions are not canceled; the service
    /// owns that lifecycle.
    pub async fn shutdown(&mut self) {
        info!("Coordinator shutting down");
        self.shutdown_tx.send_replace(true);
        if let Some(handle) = self.dispatcher.take() {
            let _ = handle.await;
        }
        self.inner.teardown();
    }
}

impl<C: InstallerClient> Drop for Coordinator<C> {
    fn drop(&mut self) {
        // Signal the dispatcher; if shutdown() already ran this is a no-op.
        self.shutdown_tx.send_replace(true);
        if let Some(handle) = self.dispatcher.take() {
            handle.abort();
            self.inner.teardown();
        }
        debug!("Coordinator dropped");
    }
}

// ─────────────────────────────────────────────────────────────────
// Dispatcher
// ─────────────────────────────────────────────────────────────────

/// Background task: single consumer of the installer's report stream.
///
/// Ends on shutdown signal, or on stream death (which is surfaced as a
/// stream failure so no key is left stuck in `Installing`).
async fn dispatch_loop(
    mut reports: mpsc::Receiver<StatusReport>,
    inner: Arc<CoordinatorInner>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = shutdown_rx.changed() => {
                if *shutdown_rx.borrow() {
                    debug!("Dispatcher received shutdown signal");
                    break;
                }
            }
            report = reports.recv() => match report {
                Some(report) => apply_report(&inner, report),
                None => {
                    if !*shutdown_rx.borrow() {
                        warn!("Installer report stream died unexpectedly");
                        handle_stream_failure(&inner);
                    }
                    break;
                }
            }
        }
    }
    debug!("Dispatcher finished");
}

/// Apply one status report: update the registry, publish projections,
/// emit at most one event for the report's condition.
fn apply_report(inner: &CoordinatorInner, report: StatusReport) {
    trace!(
        "Report: session {} status {:?}",
        report.session_id,
        report.status
    );

    let keys = report.keys();
    let state = report.to_session_state();

    for key in &keys {
        inner
            .registry
            .lock()
            .unwrap()
            .upsert(key.clone(), state.clone());

        if *key == RequestKey::AppUpdate {
            let status = {
                let info = inner.update_info.lock().unwrap();
                project_update(Some(&state), info.as_ref())
            };
            inner.publish_update(status);
        } else {
            inner.publish_status(key, project_module(&state));
        }
    }

    emit_report_events(inner, &report, &keys);

    // Terminal sessions are cleared once projected, so the key returns
    // to NoSession and a later request can start fresh.
    if state.is_terminal() {
        let mut registry = inner.registry.lock().unwrap();
        for key in &keys {
            registry.remove(key);
        }
        if report.status == RawStatus::Installed && keys.contains(&RequestKey::AppUpdate) {
            inner.update_info.lock().unwrap().take();
        }
    }
}

/// One event per report, matching the installer's one-listener-call-
/// per-state-change contract.
fn emit_report_events(inner: &CoordinatorInner, report: &StatusReport, keys: &[RequestKey]) {
    match report.status {
        RawStatus::Failed => {
            inner.events.emit(Event::SessionFailed {
                keys: keys.to_vec(),
                error_code: report.error_code.unwrap_or(0),
            });
        }
        RawStatus::Canceled => {
            inner.events.emit(Event::Canceled {
                keys: keys.to_vec(),
            });
        }
        RawStatus::RequiresConfirmation => {
            inner.events.emit(Event::ConfirmationRequired {
                session_id: report.session_id,
                keys: keys.to_vec(),
            });
        }
        RawStatus::Installed => {
            if !report.module_names.is_empty() {
                inner.events.emit(Event::Toast(format!(
                    "Installed {}",
                    report.module_names.join(" - ")
                )));
                // Launch only single-module sessions; bulk installs are
                // not a navigation trigger.
                if report.module_names.len() == 1 && report.languages.is_empty() {
                    inner
                        .events
                        .emit(Event::Navigation(report.module_names[0].clone()));
                }
            }
            if !report.languages.is_empty() {
                inner.events.emit(Event::Toast(format!(
                    "Language {} installed",
                    report.languages.join(", ")
                )));
            }
            if report.module_names.is_empty() && report.languages.is_empty() {
                inner
                    .events
                    .emit(Event::Toast("Update installed".to_string()));
            }
        }
        _ => {}
    }
}

/// The stream itself failed: nothing further will be reported, so no key
/// may be left looking active.
fn handle_stream_failure(inner: &CoordinatorInner) {
    let active = {
        let mut registry = inner.registry.lock().unwrap();
        let active = registry.active_keys();
        registry.clear();
        active
    };

    for key in &active {
        if *key != RequestKey::AppUpdate {
            inner.publish_status(key, ModuleStatus::Unavailable);
        }
    }
    inner.publish_update(UpdateStatus::NotAvailable);

    inner.events.emit(Event::Toast(
        "Something went wrong. No install progress will be reported.".to_string(),
    ));
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitflow_installer::FakeInstaller;

    fn test_inner() -> Arc<CoordinatorInner> {
        Arc::new(CoordinatorInner::new())
    }

    #[tokio::test]
    async fn test_apply_report_creates_unsolicited_entry() {
        let inner = test_inner();
        // No request was ever made for this key (e.g. process restart
        // mid-install); the report must still create tracking.
        apply_report(
            &inner,
            StatusReport::module(5, "picture", RawStatus::Downloading).with_progress(10, 100),
        );

        let state = inner
            .registry
            .lock()
            .unwrap()
            .get(&RequestKey::module("picture"))
            .unwrap();
        assert_eq!(state.session_id, 5);
        assert_eq!(state.raw_status, RawStatus::Downloading);
    }

    #[tokio::test]
    async fn test_apply_terminal_report_clears_registry() {
        let inner = test_inner();
        apply_report(
            &inner,
            StatusReport::module(5, "picture", RawStatus::Downloading),
        );
        apply_report(
            &inner,
            StatusReport::module(5, "picture", RawStatus::Installed),
        );

        assert!(inner
            .registry
            .lock()
            .unwrap()
            .get(&RequestKey::module("picture"))
            .is_none());
    }

    #[tokio::test]
    async fn test_failed_report_emits_exactly_one_event() {
        let inner = test_inner();
        let mut events = inner.events.subscribe();

        apply_report(
            &inner,
            StatusReport::module(5, "picture", RawStatus::Failed).with_error(42),
        );

        assert_eq!(
            events.try_next(),
            Some(Event::SessionFailed {
                keys: vec![RequestKey::module("picture")],
                error_code: 42,
            })
        );
        assert_eq!(events.try_next(), None);
    }

    #[tokio::test]
    async fn test_multi_module_failure_is_one_event() {
        let inner = test_inner();
        let mut events = inner.events.subscribe();

        apply_report(
            &inner,
            StatusReport::modules(5, vec!["a".into(), "b".into()], RawStatus::Failed)
                .with_error(-6),
        );

        assert_eq!(
            events.try_next(),
            Some(Event::SessionFailed {
                keys: vec![RequestKey::module("a"), RequestKey::module("b")],
                error_code: -6,
            })
        );
        assert_eq!(events.try_next(), None);
    }

    #[tokio::test]
    async fn test_installed_single_module_emits_navigation() {
        let inner = test_inner();
        let mut events = inner.events.subscribe();

        apply_report(
            &inner,
            StatusReport::module(5, "picture", RawStatus::Installed),
        );

        assert!(matches!(events.try_next(), Some(Event::Toast(_))));
        assert_eq!(
            events.try_next(),
            Some(Event::Navigation("picture".to_string()))
        );
    }

    #[tokio::test]
    async fn test_installed_multi_module_no_navigation() {
        let inner = test_inner();
        let mut events = inner.events.subscribe();

        apply_report(
            &inner,
            StatusReport::modules(5, vec!["a".into(), "b".into()], RawStatus::Installed),
        );

        assert!(matches!(events.try_next(), Some(Event::Toast(_))));
        assert_eq!(events.try_next(), None);
    }

    #[tokio::test]
    async fn test_stream_failure_projects_unavailable() {
        let inner = test_inner();
        apply_report(
            &inner,
            StatusReport::module(5, "picture", RawStatus::Downloading),
        );
        let mut events = inner.events.subscribe();

        handle_stream_failure(&inner);

        assert!(inner.registry.lock().unwrap().is_empty());
        let streams = inner.module_streams.lock().unwrap();
        let status = streams
            .get(&RequestKey::module("picture"))
            .unwrap()
            .borrow()
            .clone();
        assert_eq!(status, ModuleStatus::Unavailable);
        drop(streams);

        assert!(matches!(events.try_next(), Some(Event::Toast(_))));
        assert_eq!(events.try_next(), None);
    }

    #[tokio::test]
    async fn test_spawn_fails_when_stream_already_taken() {
        let mut fake = FakeInstaller::new();
        let _stream = fake.take_report_stream().unwrap();

        let result = Coordinator::spawn(fake, Settings::default());
        assert!(matches!(result, Err(Error::ReportStreamTaken)));
    }

    #[tokio::test]
    async fn test_initial_status_reflects_installed_modules() {
        let fake = FakeInstaller::new();
        fake.set_installed("picture");
        let coordinator = Coordinator::spawn(fake, Settings::default()).unwrap();

        let stream = coordinator.status_stream(&RequestKey::module("picture"));
        assert_eq!(stream.current(), ModuleStatus::Installed);

        let stream = coordinator.status_stream(&RequestKey::module("palette"));
        assert_eq!(stream.current(), ModuleStatus::Available);
    }
}

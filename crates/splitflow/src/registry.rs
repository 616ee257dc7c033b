//! Tracks active install/update sessions by request key

use std::collections::HashMap;

use splitflow_core::types::{RequestKey, SessionState};

/// Authoritative map from request key to current session state.
///
/// The installer is the source of truth: `upsert` replaces the prior
/// state wholesale, never merging fields across reports. The registry
/// is owned by the coordinator and mutated only under its lock.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<RequestKey, SessionState>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: HashMap::new(),
        }
    }

    /// Merge a new status report into the registry.
    ///
    /// Always succeeds; unknown keys create entries (the installer may
    /// report sessions we never requested, e.g. after a process
    /// restart).
    pub fn upsert(&mut self, key: RequestKey, state: SessionState) {
        self.sessions.insert(key, state);
    }

    /// Current state for a key, if a session is tracked
    pub fn get(&self, key: &RequestKey) -> Option<SessionState> {
        self.sessions.get(key).cloned()
    }

    /// Drop tracking for a key; idempotent
    pub fn remove(&mut self, key: &RequestKey) -> Option<SessionState> {
        self.sessions.remove(key)
    }

    /// Whether a non-terminal session is tracked for this key
    pub fn is_active(&self, key: &RequestKey) -> bool {
        self.sessions
            .get(key)
            .is_some_and(|state| !state.is_terminal())
    }

    /// Keys with a non-terminal session
    pub fn active_keys(&self) -> Vec<RequestKey> {
        self.sessions
            .iter()
            .filter(|(_, state)| !state.is_terminal())
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop all tracked sessions
    pub fn clear(&mut self) {
        self.sessions.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use splitflow_core::types::RawStatus;

    #[test]
    fn test_upsert_creates_entry() {
        let mut registry = SessionRegistry::new();
        let key = RequestKey::module("picture");

        registry.upsert(key.clone(), SessionState::new(1, RawStatus::Pending));

        assert_eq!(registry.len(), 1);
        assert!(registry.get(&key).is_some());
    }

    #[test]
    fn test_upsert_replaces_wholesale() {
        let mut registry = SessionRegistry::new();
        let key = RequestKey::module("picture");

        registry.upsert(
            key.clone(),
            SessionState::new(1, RawStatus::Downloading).with_progress(50, 100),
        );
        // A later report without progress fields replaces everything
        registry.upsert(key.clone(), SessionState::new(1, RawStatus::Installing));

        let state = registry.get(&key).unwrap();
        assert_eq!(state.raw_status, RawStatus::Installing);
        assert_eq!(state.bytes_downloaded, 0);
        assert_eq!(state.total_bytes, 0);
    }

    #[test]
    fn test_get_round_trip() {
        let mut registry = SessionRegistry::new();
        let key = RequestKey::module("picture");

        registry.upsert(
            key.clone(),
            SessionState::new(2, RawStatus::Downloading).with_progress(50, 100),
        );

        let state = registry.get(&key).unwrap();
        assert_eq!(state.bytes_downloaded, 50);
        assert_eq!(state.total_bytes, 100);
    }

    #[test]
    fn test_get_unknown_key() {
        let registry = SessionRegistry::new();
        assert!(registry.get(&RequestKey::module("missing")).is_none());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let mut registry = SessionRegistry::new();
        let key = RequestKey::module("picture");

        registry.upsert(key.clone(), SessionState::new(1, RawStatus::Pending));

        assert!(registry.remove(&key).is_some());
        assert!(registry.remove(&key).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_is_active_ignores_terminal_sessions() {
        let mut registry = SessionRegistry::new();
        let key = RequestKey::module("picture");

        registry.upsert(key.clone(), SessionState::new(1, RawStatus::Downloading));
        assert!(registry.is_active(&key));

        registry.upsert(key.clone(), SessionState::new(1, RawStatus::Installed));
        assert!(!registry.is_active(&key));

        assert!(!registry.is_active(&RequestKey::module("missing")));
    }

    #[test]
    fn test_active_keys() {
        let mut registry = SessionRegistry::new();

        registry.upsert(
            RequestKey::module("a"),
            SessionState::new(1, RawStatus::Downloading),
        );
        registry.upsert(
            RequestKey::module("b"),
            SessionState::new(2, RawStatus::Failed).with_error(1),
        );
        registry.upsert(
            RequestKey::language("pl"),
            SessionState::new(3, RawStatus::Pending),
        );

        let mut active = registry.active_keys();
        active.sort_by_key(ToString::to_string);
        assert_eq!(
            active,
            vec![RequestKey::language("pl"), RequestKey::module("a")]
        );
    }

    #[test]
    fn test_clear() {
        let mut registry = SessionRegistry::new();
        registry.upsert(
            RequestKey::AppUpdate,
            SessionState::new(1, RawStatus::Downloading),
        );

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn test_tracks_separate_keys_independently() {
        let mut registry = SessionRegistry::new();

        registry.upsert(
            RequestKey::module("picture"),
            SessionState::new(1, RawStatus::Downloading),
        );
        registry.upsert(
            RequestKey::AppUpdate,
            SessionState::new(2, RawStatus::Pending),
        );

        assert_eq!(registry.len(), 2);
        assert_eq!(
            registry.get(&RequestKey::module("picture")).unwrap().session_id,
            1
        );
        assert_eq!(registry.get(&RequestKey::AppUpdate).unwrap().session_id, 2);
    }
}

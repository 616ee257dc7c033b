//! Pure status projection
//!
//! Maps tracked session state into the client-facing `ModuleStatus` /
//! `UpdateStatus` variants. Everything here is deterministic and
//! side-effect-free; event emission for failures lives in the
//! coordinator, which calls these functions and inspects the raw status
//! separately.

use serde::{Deserialize, Serialize};

use crate::types::{ModuleStatus, RawStatus, SessionState, UpdateInfo, UpdateStatus};

/// Project a tracked session into its client-facing module status.
///
/// `Downloaded` maps to `Installing(1.0)` rather than `Installed`:
/// completion is reported only when the installer says so.
pub fn project_module(state: &SessionState) -> ModuleStatus {
    match state.raw_status {
        RawStatus::Canceled => ModuleStatus::Available,
        RawStatus::Canceling => ModuleStatus::Installing(0.0),
        RawStatus::Downloaded => ModuleStatus::Installing(1.0),
        RawStatus::Downloading => ModuleStatus::Installing(state.progress_fraction()),
        RawStatus::Failed => ModuleStatus::Available,
        RawStatus::Installed => ModuleStatus::Installed,
        RawStatus::Installing => ModuleStatus::Installing(1.0),
        RawStatus::Pending => ModuleStatus::Installing(0.0),
        RawStatus::RequiresConfirmation => ModuleStatus::NeedsConfirmation(state.session_id),
        RawStatus::Unknown => ModuleStatus::Unavailable,
    }
}

/// Project the app-update session (if any) plus the latest known update
/// info into the client-facing update status.
pub fn project_update(state: Option<&SessionState>, info: Option<&UpdateInfo>) -> UpdateStatus {
    let Some(state) = state else {
        return match info {
            Some(info) => UpdateStatus::Available(info.clone()),
            None => UpdateStatus::NotAvailable,
        };
    };

    match state.raw_status {
        RawStatus::Pending | RawStatus::Canceling => UpdateStatus::InProgress(0.0),
        RawStatus::Downloading | RawStatus::RequiresConfirmation => {
            UpdateStatus::InProgress(state.progress_fraction())
        }
        RawStatus::Installing => UpdateStatus::InProgress(1.0),
        RawStatus::Downloaded => UpdateStatus::Downloaded,
        // Installed consumes the update; Failed/Canceled fall back to
        // whatever the last update check said.
        RawStatus::Installed => UpdateStatus::NotAvailable,
        RawStatus::Failed | RawStatus::Canceled | RawStatus::Unknown => {
            project_update(None, info)
        }
    }
}

/// Policy thresholds for choosing immediate over flexible updates.
///
/// Defaults match the original behavior: an update goes immediate once
/// it has been waiting more than 30 days or carries priority above 4.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UpdatePolicy {
    pub staleness_days_threshold: u32,
    pub priority_threshold: i32,
}

impl Default for UpdatePolicy {
    fn default() -> Self {
        Self {
            staleness_days_threshold: 30,
            priority_threshold: 4,
        }
    }
}

/// Decide whether an available update should launch in immediate mode.
///
/// Immediate mode requires the installer to allow it; beyond that the
/// update must either be stale past the threshold or high priority.
pub fn should_launch_immediately(info: &UpdateInfo, policy: &UpdatePolicy) -> bool {
    info.immediate_allowed
        && (info.staleness_days.unwrap_or(0) > policy.staleness_days_threshold
            || info.update_priority > policy.priority_threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(raw_status: RawStatus) -> SessionState {
        SessionState::new(7, raw_status)
    }

    #[test]
    fn test_project_canceled_is_available() {
        assert_eq!(project_module(&state(RawStatus::Canceled)), ModuleStatus::Available);
    }

    #[test]
    fn test_project_canceling_is_installing_zero() {
        assert_eq!(
            project_module(&state(RawStatus::Canceling)),
            ModuleStatus::Installing(0.0)
        );
    }

    #[test]
    fn test_project_downloaded_is_installing_one() {
        // Policy decision: Downloaded is still Installing until the
        // installer reports Installed.
        assert_eq!(
            project_module(&state(RawStatus::Downloaded)),
            ModuleStatus::Installing(1.0)
        );
    }

    #[test]
    fn test_project_downloading_uses_byte_fraction() {
        let s = state(RawStatus::Downloading).with_progress(35, 100);
        assert_eq!(project_module(&s), ModuleStatus::Installing(0.35));
    }

    #[test]
    fn test_project_downloading_zero_total_is_zero_progress() {
        let s = state(RawStatus::Downloading).with_progress(0, 0);
        match project_module(&s) {
            ModuleStatus::Installing(progress) => {
                assert_eq!(progress, 0.0);
                assert!(!progress.is_nan());
            }
            other => panic!("expected Installing, got {:?}", other),
        }
    }

    #[test]
    fn test_project_failed_is_available() {
        let s = state(RawStatus::Failed).with_error(-6);
        assert_eq!(project_module(&s), ModuleStatus::Available);
    }

    #[test]
    fn test_project_installed_regardless_of_progress() {
        let s = state(RawStatus::Installed).with_progress(10, 100);
        assert_eq!(project_module(&s), ModuleStatus::Installed);

        let s = state(RawStatus::Installed);
        assert_eq!(project_module(&s), ModuleStatus::Installed);
    }

    #[test]
    fn test_project_installing_is_full_progress() {
        assert_eq!(
            project_module(&state(RawStatus::Installing)),
            ModuleStatus::Installing(1.0)
        );
    }

    #[test]
    fn test_project_pending_is_zero_progress() {
        assert_eq!(
            project_module(&state(RawStatus::Pending)),
            ModuleStatus::Installing(0.0)
        );
    }

    #[test]
    fn test_project_requires_confirmation_carries_session() {
        assert_eq!(
            project_module(&state(RawStatus::RequiresConfirmation)),
            ModuleStatus::NeedsConfirmation(7)
        );
    }

    #[test]
    fn test_project_unknown_is_unavailable() {
        assert_eq!(
            project_module(&state(RawStatus::Unknown)),
            ModuleStatus::Unavailable
        );
    }

    #[test]
    fn test_round_trip_downloading_projection() {
        let s = SessionState::new(1, RawStatus::Downloading).with_progress(50, 100);
        assert_eq!(s.bytes_downloaded, 50);
        assert_eq!(s.total_bytes, 100);
        assert_eq!(project_module(&s), ModuleStatus::Installing(0.5));
    }

    // ─────────────────────────────────────────────────────────
    // Update projection
    // ─────────────────────────────────────────────────────────

    fn update_info(priority: i32, staleness: Option<u32>) -> UpdateInfo {
        UpdateInfo {
            available_version_code: 2,
            update_priority: priority,
            staleness_days: staleness,
            immediate_allowed: true,
            flexible_allowed: true,
        }
    }

    #[test]
    fn test_project_update_no_session_no_info() {
        assert_eq!(project_update(None, None), UpdateStatus::NotAvailable);
    }

    #[test]
    fn test_project_update_no_session_with_info() {
        let info = update_info(0, None);
        assert_eq!(
            project_update(None, Some(&info)),
            UpdateStatus::Available(info.clone())
        );
    }

    #[test]
    fn test_project_update_downloading() {
        let s = state(RawStatus::Downloading).with_progress(25, 100);
        assert_eq!(
            project_update(Some(&s), None),
            UpdateStatus::InProgress(0.25)
        );
    }

    #[test]
    fn test_project_update_downloaded() {
        let s = state(RawStatus::Downloaded);
        assert_eq!(project_update(Some(&s), None), UpdateStatus::Downloaded);
    }

    #[test]
    fn test_project_update_installed_consumes_info() {
        let info = update_info(0, None);
        let s = state(RawStatus::Installed);
        assert_eq!(
            project_update(Some(&s), Some(&info)),
            UpdateStatus::NotAvailable
        );
    }

    #[test]
    fn test_project_update_failed_falls_back_to_info() {
        let info = update_info(0, None);
        let s = state(RawStatus::Failed).with_error(1);
        assert_eq!(
            project_update(Some(&s), Some(&info)),
            UpdateStatus::Available(info.clone())
        );
    }

    // ─────────────────────────────────────────────────────────
    // Immediate-vs-flexible decision
    // ─────────────────────────────────────────────────────────

    #[test]
    fn test_immediate_for_high_priority() {
        let info = update_info(5, None);
        assert!(should_launch_immediately(&info, &UpdatePolicy::default()));
    }

    #[test]
    fn test_immediate_for_stale_update() {
        let info = update_info(0, Some(31));
        assert!(should_launch_immediately(&info, &UpdatePolicy::default()));
    }

    #[test]
    fn test_flexible_for_fresh_low_priority() {
        let info = update_info(4, Some(30));
        assert!(!should_launch_immediately(&info, &UpdatePolicy::default()));
    }

    #[test]
    fn test_never_immediate_when_not_allowed() {
        let mut info = update_info(9, Some(90));
        info.immediate_allowed = false;
        assert!(!should_launch_immediately(&info, &UpdatePolicy::default()));
    }

    #[test]
    fn test_custom_policy_thresholds() {
        let policy = UpdatePolicy {
            staleness_days_threshold: 7,
            priority_threshold: 1,
        };
        let info = update_info(2, None);
        assert!(should_launch_immediately(&info, &policy));

        let info = update_info(0, Some(8));
        assert!(should_launch_immediately(&info, &policy));
    }
}

//! # splitflow-core - Core Domain Types
//!
//! Foundation crate for Splitflow. Provides domain types, error handling,
//! event definitions, and the pure status projection.
//!
//! This crate has **zero internal dependencies** -- it only depends on
//! external crates (serde, thiserror, tracing).
//!
//! ## Public API
//!
//! ### Domain Types (`types`)
//! - [`RequestKey`] - Identifies one in-flight unit of work (module, language, app update)
//! - [`RawStatus`] - Raw session status reported by the installer
//! - [`SessionState`] - Tracked per-key state, replaced on every report
//! - [`ModuleStatus`] - Client-facing projection for a module/language key
//! - [`UpdateStatus`], [`UpdateInfo`] - Client-facing update flow state
//!
//! ### Events (`events`)
//! - [`Event`] - One-shot notifications, consumed once per subscriber
//!
//! ### Projection (`projection`)
//! - [`project_module()`] - Pure `SessionState -> ModuleStatus` mapping
//! - [`project_update()`] - Pure mapping for the app-update flow
//! - [`should_launch_immediately()`], [`UpdatePolicy`] - Immediate-vs-flexible decision
//!
//! ### Error Handling (`error`)
//! - [`Error`] - Custom error enum with `fatal` vs `recoverable` classification
//! - [`Result`] - Type alias for `std::result::Result<T, Error>`
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use splitflow_core::prelude::*;
//! ```

pub mod error;
pub mod events;
pub mod logging;
pub mod projection;
pub mod types;

/// Prelude for common imports used throughout all Splitflow crates
pub mod prelude {
    pub use super::error::{Error, Result};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

// Re-export commonly used types at crate root for convenience
pub use error::{Error, Result};
pub use events::Event;
pub use projection::{project_module, project_update, should_launch_immediately, UpdatePolicy};
pub use types::{
    ModuleStatus, RawStatus, RequestKey, SessionId, SessionState, UpdateInfo, UpdateStatus,
};

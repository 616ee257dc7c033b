//! # splitflow - Module Install/Update Coordinator
//!
//! Orchestration crate for Splitflow. Owns the session registry,
//! consumes the installer's report stream, and exposes the public
//! coordinator API.
//!
//! Depends on [`splitflow_core`] for domain types and
//! [`splitflow_installer`] for the installer service contract.
//!
//! ## Public API
//!
//! ### Coordination (`coordinator`)
//! - [`Coordinator`] - Request installs/updates, observe status, receive events
//! - [`InstallRequestOutcome`], [`UpdateRequestOutcome`] - Submission results
//!
//! ### Session Tracking (`registry`)
//! - [`SessionRegistry`] - Keyed map of active sessions
//!
//! ### Streams (`streams`)
//! - [`StatusStream`], [`UpdateStream`] - Latest-wins projected status per key
//! - [`EventStream`] - Per-subscriber one-shot event queue
//!
//! ### Features (`features`)
//! - [`FeatureProvider`], [`FeatureRegistry`] - Explicit capability registration
//!   for on-demand modules
//!
//! ### Configuration (`config`)
//! - [`Settings`], [`load_settings()`], [`save_settings()`] - Runtime settings
//!   from `.splitflow/config.toml`
//!
//! ## Example
//!
//! ```rust,no_run
//! use splitflow::{Coordinator, Settings};
//! use splitflow_core::types::RequestKey;
//! # async fn run(client: impl splitflow_installer::InstallerClient) -> splitflow_core::Result<()> {
//! let coordinator = Coordinator::spawn(client, Settings::default())?;
//!
//! coordinator.request_install(&["picture"]).await?;
//!
//! let mut status = coordinator.status_stream(&RequestKey::module("picture"));
//! while let Some(projected) = status.next().await {
//!     println!("picture: {:?}", projected);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod coordinator;
pub mod features;
pub mod registry;
pub mod streams;

pub use config::{init_config_dir, load_settings, save_settings, Settings};
pub use coordinator::{Coordinator, InstallRequestOutcome, UpdateRequestOutcome};
pub use features::{FeatureProvider, FeatureRegistry};
pub use registry::SessionRegistry;
pub use streams::{EventStream, StatusStream, UpdateStream};

/// Re-exported from `splitflow_core` for convenience. Canonical import:
/// `splitflow_core::Event`.
pub use splitflow_core::Event;

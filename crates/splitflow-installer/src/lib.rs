//! # splitflow-installer - Installer Service Contract
//!
//! Defines how Splitflow talks to the external installer service: the
//! [`InstallerClient`] trait, the [`StatusReport`] wire type the service
//! pushes, and a scriptable [`FakeInstaller`] for tests (behind the
//! `test-helpers` feature).
//!
//! Depends on [`splitflow_core`] for domain types and error handling.
//!
//! ## Public API
//!
//! - [`InstallerClient`] - Submission, update, and snapshot contract
//! - [`StatusReport`] - One status report for one session
//! - [`FakeInstaller`] - In-memory scripted installer (`test-helpers`)

pub mod client;
#[cfg(any(test, feature = "test-helpers"))]
pub mod fake;
pub mod report;

pub use client::InstallerClient;
#[cfg(any(test, feature = "test-helpers"))]
pub use fake::FakeInstaller;
pub use report::StatusReport;

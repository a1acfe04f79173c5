//! # Common Components
//!
//! Shared utilities used by both binaries.
//!
//! ## Modules
//!
//! - [`config`]: TOML configuration parsing
//! - [`logging`]: Logger initialisation

pub mod config;
pub mod logging;

//! Shared test utilities for the music-mcp workspace.
//!
//! This crate provides a fake scripting bridge so dispatcher and server
//! tests run anywhere, without macOS or the Music app. It is a
//! dev-dependency only and never published.
//!
//! # Modules
//!
//! - [`executor`]: [`RecordingExecutor`], a scripted stand-in for `osascript`

pub mod executor;

pub use executor::RecordingExecutor;

//! # cloudfn-std
//!
//! Standard implementations for the cloudfn invocation harness.
//!
//! This crate provides:
//! - **Testing handlers**: [`testing::RecordingHandler`], [`testing::CountingHandler`],
//!   [`testing::FailingHandler`]

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

// Re-export core traits
pub use cloudfn_core;

// Modules
pub mod testing;

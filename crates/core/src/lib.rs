//! Shared foundation for the government service integration layer.
//!
//! This crate has no internal dependencies so it can be used by the
//! persistence layer, the agency adapters, and any future worker or
//! CLI tooling.

pub mod config;
pub mod crypto;
pub mod rate;
pub mod types;

//! Core library for the `barrage` CLI.
//!
//! This crate provides the building blocks used by the binary: CLI argument
//! types, configuration loading, the XML payload model, field-copy policies,
//! the concurrent request harness, the remote service boundary and result
//! sinks. The primary user-facing interface is the `barrage` command-line
//! application; library APIs may evolve as the CLI grows.
pub mod args;
pub mod config;
pub mod error;
pub mod generators;
pub mod harness;
pub mod metrics;
pub mod payload;
pub mod policy;
pub mod records;
pub mod remote;
pub mod sinks;
pub mod timing;

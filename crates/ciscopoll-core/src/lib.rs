//! ciscopoll-core: Cisco device polling library for the ciscopoll exporter.
//!
//! Provides:
//! - `dialect`: OS dialects and the category support table
//! - `facts`: pattern library, fact extraction, unit normalization
//! - `session`: command channel trait, OpenSSH transport, scripted mock
//! - `metrics`: metric descriptors, samples, Prometheus text exposition
//! - `collector`: BGP and facts collectors, device poller
//! - `config`: device inventory file

pub mod collector;
pub mod config;
pub mod dialect;
pub mod facts;
pub mod metrics;
pub mod session;

/// Crate version, reported by the daemon.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

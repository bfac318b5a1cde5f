//! Typed facts extracted from device CLI output.
//!
//! A fact is a value record built fresh on every poll cycle. It is never
//! mutated after construction and is dropped once its samples are emitted.

pub mod extract;
pub mod normalize;
pub mod patterns;

pub use extract::FactExtractor;
pub use patterns::{PatternError, PatternLibrary};

use crate::dialect::{Dialect, FactCategory};

/// One BGP neighbor as reported by `show bgp neighbor`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BgpSessionFact {
    pub ip: String,
    /// Kept as text: the device's own formatting is preserved.
    pub asn: String,
    /// True iff the reported state equals the dialect's established token.
    pub up: bool,
    pub accepted_prefixes: u64,
    pub best_paths: u64,
    pub prefixes_advertised: u64,
    pub description: String,
}

/// Running OS version, e.g. `IOSXR-7.3.2`.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionFact {
    pub version: String,
}

/// One memory pool. All amounts are in bytes.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryFact {
    pub pool: String,
    pub total: u64,
    pub used: u64,
    pub free: u64,
}

/// CPU load in whole percentage points.
///
/// Windows a dialect does not report stay `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuFact {
    pub five_seconds: Option<u32>,
    pub interrupts: Option<u32>,
    pub one_minute: Option<u32>,
    pub five_minutes: Option<u32>,
    pub fifteen_minutes: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Fact {
    BgpSession(BgpSessionFact),
    Version(VersionFact),
    Memory(MemoryFact),
    Cpu(CpuFact),
}

impl Fact {
    pub fn category(&self) -> FactCategory {
        match self {
            Fact::BgpSession(_) => FactCategory::BgpSession,
            Fact::Version(_) => FactCategory::Version,
            Fact::Memory(_) => FactCategory::Memory,
            Fact::Cpu(_) => FactCategory::Cpu,
        }
    }
}

/// Extraction failure. Never fatal for a poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    /// The category is not implemented for this dialect.
    UnsupportedDialect {
        category: FactCategory,
        dialect: Dialect,
    },
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::UnsupportedDialect { category, dialect } => {
                write!(f, "{} is not implemented for {}", category, dialect)
            }
        }
    }
}

impl std::error::Error for ExtractError {}

//! Per-dialect extraction patterns.
//!
//! The library is keyed by (category, dialect). Each entry says how to find
//! records in raw text and how the named fields of a record map onto a typed
//! fact. It is compiled once at startup and only read afterwards, so one
//! instance can be shared by every poll worker.

use std::collections::HashMap;

use regex::Regex;

use super::normalize::MemoryUnit;
use crate::dialect::{Dialect, FactCategory};

/// BGP state token that means the session is up.
pub const ESTABLISHED: &str = "Established";

const VERSION_IOSXE: &str = r"^.*, Version (?P<version>.+) -.*$";
const VERSION_IOS: &str = r"^.*, Version (?P<version>.+),.*$";
const VERSION_NXOS: &str = r"^\s+NXOS: version (?P<version>.*)$";
const VERSION_IOSXR: &str = r"^.*IOS XR Software, Version(?P<version>.*)\[.*$";

const MEMORY_POOLS: &str =
    r"^\s*(?P<pool>\S*) Pool Total:\s*(?P<total>\d+) Used:\s*(?P<used>\d+) Free:\s*(?P<free>\d+)\s*$";
const MEMORY_IOSXR: &str =
    r"^Physical Memory:\s*(?P<total>\d+)M total\s*\((?P<free>\d+)M available\)\s*$";

const CPU_FIVE_SECONDS: &str = r"^\s*CPU utilization for five seconds: (?P<five_seconds>\d+)%/(?P<interrupts>\d+)%; one minute: (?P<one_minute>\d+)%; five minutes: (?P<five_minutes>\d+)%.*$";
const CPU_IOSXR: &str = r"^\s*CPU utilization for one minute: (?P<one_minute>\d+)%;\s*five minutes: (?P<five_minutes>\d+)%;\s*fifteen minutes: (?P<fifteen_minutes>\d+)%.*$";

const BGP_IOSXR_ANCHOR: &str = r"(?m)^[ \t]*BGP neighbor is \S+";
/// Every field is anchored to the start of its own line: text on the
/// `Description:` line never matches another field.
const BGP_IOSXR_FIELDS: &[(&str, &str, bool)] = &[
    ("neighbor_ip", r"(?m)^[ \t]*BGP neighbor is (\S+)", true),
    ("remote_as", r"(?m)^[ \t]*Remote AS ([0-9.]+)", true),
    ("description", r"(?m)^[ \t]*Description: ([^\n]*)", false),
    ("bgp_state", r"(?m)^[ \t]*BGP state = (\w+)", true),
    ("accepted_prefixes", r"(?m)^[ \t]*(\d+) accepted prefixes", false),
    ("best_paths", r"(?m)^[ \t]*\d+ accepted prefixes, (\d+) are bestpaths", false),
    ("prefix_advertised", r"(?m)^[ \t]*Prefix advertised (\d+)", false),
];

/// How a record's field map becomes a typed fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactShape {
    Bgp { established: &'static str },
    Version { dialect: Dialect },
    /// `pool` is used when the pattern has no `pool` field.
    Memory {
        unit: MemoryUnit,
        pool: Option<&'static str>,
    },
    Cpu,
}

/// One record per matching line.
#[derive(Debug)]
pub struct LinePattern {
    pub regex: Regex,
    /// Stop at the first matching line.
    pub first_only: bool,
    pub shape: FactShape,
}

/// A field looked up inside a multi-line record; capture group 1 is the value.
#[derive(Debug)]
pub struct FieldPattern {
    pub name: &'static str,
    pub regex: Regex,
    pub required: bool,
}

/// Multi-line records, each starting at an anchor match and running up to
/// the next anchor.
#[derive(Debug)]
pub struct BlockPattern {
    pub anchor: Regex,
    pub fields: Vec<FieldPattern>,
    pub shape: FactShape,
}

#[derive(Debug)]
pub enum Pattern {
    Line(LinePattern),
    Block(BlockPattern),
}

/// A pattern that failed to compile.
#[derive(Debug)]
pub struct PatternError {
    pub category: FactCategory,
    pub dialect: Dialect,
    pub source: regex::Error,
}

impl std::fmt::Display for PatternError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid {} pattern for {}: {}",
            self.category, self.dialect, self.source
        )
    }
}

impl std::error::Error for PatternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.source)
    }
}

/// Compiled patterns keyed by (category, dialect).
#[derive(Debug)]
pub struct PatternLibrary {
    entries: HashMap<(FactCategory, Dialect), Pattern>,
}

impl PatternLibrary {
    /// Compiles the built-in patterns.
    pub fn new() -> Result<Self, PatternError> {
        let mut lib = Self {
            entries: HashMap::new(),
        };

        for (dialect, src) in [
            (Dialect::IosXe, VERSION_IOSXE),
            (Dialect::Ios, VERSION_IOS),
            (Dialect::NxOs, VERSION_NXOS),
            (Dialect::IosXr, VERSION_IOSXR),
        ] {
            lib.add_line(
                FactCategory::Version,
                dialect,
                src,
                true,
                FactShape::Version { dialect },
            )?;
        }

        let pools = FactShape::Memory {
            unit: MemoryUnit::Bytes,
            pool: None,
        };
        lib.add_line(FactCategory::Memory, Dialect::Ios, MEMORY_POOLS, false, pools)?;
        lib.add_line(FactCategory::Memory, Dialect::IosXe, MEMORY_POOLS, false, pools)?;
        lib.add_line(
            FactCategory::Memory,
            Dialect::IosXr,
            MEMORY_IOSXR,
            false,
            FactShape::Memory {
                unit: MemoryUnit::Megabytes,
                pool: Some("Physical Memory"),
            },
        )?;

        lib.add_line(FactCategory::Cpu, Dialect::Ios, CPU_FIVE_SECONDS, true, FactShape::Cpu)?;
        lib.add_line(FactCategory::Cpu, Dialect::IosXe, CPU_FIVE_SECONDS, true, FactShape::Cpu)?;
        lib.add_line(FactCategory::Cpu, Dialect::IosXr, CPU_IOSXR, true, FactShape::Cpu)?;

        lib.add_block(
            FactCategory::BgpSession,
            Dialect::IosXr,
            BGP_IOSXR_ANCHOR,
            BGP_IOSXR_FIELDS,
            FactShape::Bgp {
                established: ESTABLISHED,
            },
        )?;

        Ok(lib)
    }

    pub fn get(&self, category: FactCategory, dialect: Dialect) -> Option<&Pattern> {
        self.entries.get(&(category, dialect))
    }

    pub fn contains(&self, category: FactCategory, dialect: Dialect) -> bool {
        self.entries.contains_key(&(category, dialect))
    }

    fn add_line(
        &mut self,
        category: FactCategory,
        dialect: Dialect,
        src: &str,
        first_only: bool,
        shape: FactShape,
    ) -> Result<(), PatternError> {
        let regex = compile(category, dialect, src)?;
        self.entries.insert(
            (category, dialect),
            Pattern::Line(LinePattern {
                regex,
                first_only,
                shape,
            }),
        );
        Ok(())
    }

    fn add_block(
        &mut self,
        category: FactCategory,
        dialect: Dialect,
        anchor: &str,
        fields: &[(&'static str, &str, bool)],
        shape: FactShape,
    ) -> Result<(), PatternError> {
        let anchor = compile(category, dialect, anchor)?;
        let fields = fields
            .iter()
            .map(|&(name, src, required)| {
                Ok(FieldPattern {
                    name,
                    regex: compile(category, dialect, src)?,
                    required,
                })
            })
            .collect::<Result<Vec<_>, PatternError>>()?;
        self.entries.insert(
            (category, dialect),
            Pattern::Block(BlockPattern {
                anchor,
                fields,
                shape,
            }),
        );
        Ok(())
    }
}

fn compile(category: FactCategory, dialect: Dialect, src: &str) -> Result<Regex, PatternError> {
    Regex::new(src).map_err(|source| PatternError {
        category,
        dialect,
        source,
    })
}

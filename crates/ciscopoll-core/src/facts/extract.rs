//! Dialect-aware text-to-fact extraction.
//!
//! Extraction is a pure function of (dialect, category, text). Zero matches
//! is an empty result, not an error; the only error is asking for a
//! category the dialect does not implement.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use super::normalize::{memory_fact, parse_count, parse_percent};
use super::patterns::{BlockPattern, FactShape, LinePattern, Pattern, PatternError, PatternLibrary};
use super::{BgpSessionFact, CpuFact, ExtractError, Fact, VersionFact};
use crate::dialect::{Dialect, FactCategory};

/// Logical field name to trimmed field text.
type Fields<'a> = HashMap<&'a str, &'a str>;

/// Turns raw command output into typed facts.
///
/// Cheap to clone; clones share the compiled pattern library.
#[derive(Debug, Clone)]
pub struct FactExtractor {
    library: Arc<PatternLibrary>,
}

impl FactExtractor {
    pub fn new() -> Result<Self, PatternError> {
        Ok(Self::with_library(Arc::new(PatternLibrary::new()?)))
    }

    pub fn with_library(library: Arc<PatternLibrary>) -> Self {
        Self { library }
    }

    pub fn library(&self) -> &PatternLibrary {
        &self.library
    }

    /// Extracts all facts of `category` from `text`, in source order.
    pub fn extract(
        &self,
        dialect: Dialect,
        category: FactCategory,
        text: &str,
    ) -> Result<Vec<Fact>, ExtractError> {
        let pattern = self
            .library
            .get(category, dialect)
            .ok_or(ExtractError::UnsupportedDialect { category, dialect })?;

        Ok(match pattern {
            Pattern::Line(line) => extract_lines(line, text),
            Pattern::Block(block) => extract_blocks(block, text),
        })
    }
}

fn extract_lines<'a>(pattern: &'a LinePattern, text: &'a str) -> Vec<Fact> {
    let mut facts = Vec::new();
    for line in text.lines() {
        let Some(caps) = pattern.regex.captures(line) else {
            continue;
        };

        let fields: Fields = pattern
            .regex
            .capture_names()
            .flatten()
            .filter_map(|name| caps.name(name).map(|m| (name, m.as_str().trim())))
            .collect();

        facts.push(build(pattern.shape, &fields));
        if pattern.first_only {
            break;
        }
    }
    facts
}

fn extract_blocks(pattern: &BlockPattern, text: &str) -> Vec<Fact> {
    let starts: Vec<usize> = pattern.anchor.find_iter(text).map(|m| m.start()).collect();

    let mut facts = Vec::with_capacity(starts.len());
    for (i, &start) in starts.iter().enumerate() {
        let end = starts.get(i + 1).copied().unwrap_or(text.len());
        let record = &text[start..end];

        if let Some(fields) = block_fields(pattern, record) {
            facts.push(build(pattern.shape, &fields));
        }
    }
    facts
}

/// Looks up every field inside one record. `None` if a required field is absent.
fn block_fields<'a>(pattern: &'a BlockPattern, record: &'a str) -> Option<Fields<'a>> {
    let mut fields = Fields::new();
    for field in &pattern.fields {
        match field.regex.captures(record).and_then(|c| c.get(1)) {
            Some(m) => {
                fields.insert(field.name, m.as_str().trim());
            }
            None if field.required => {
                debug!(
                    field = field.name,
                    record = record.lines().next().unwrap_or_default(),
                    "skipping record without required field"
                );
                return None;
            }
            None => {}
        }
    }
    Some(fields)
}

fn build(shape: FactShape, fields: &Fields) -> Fact {
    let text = |name: &str| fields.get(name).copied().unwrap_or_default();
    let percent = |name: &str| fields.get(name).map(|v| parse_percent(v));

    match shape {
        FactShape::Bgp { established } => Fact::BgpSession(BgpSessionFact {
            ip: text("neighbor_ip").to_string(),
            asn: text("remote_as").to_string(),
            up: text("bgp_state") == established,
            accepted_prefixes: parse_count(text("accepted_prefixes")),
            best_paths: parse_count(text("best_paths")),
            prefixes_advertised: parse_count(text("prefix_advertised")),
            description: text("description").to_string(),
        }),
        FactShape::Version { dialect } => Fact::Version(VersionFact {
            version: format!("{}-{}", dialect, text("version")),
        }),
        FactShape::Memory { unit, pool } => Fact::Memory(memory_fact(
            match pool {
                Some(pool) => pool,
                None => text("pool"),
            },
            unit,
            text("total"),
            fields.get("used").copied(),
            text("free"),
        )),
        FactShape::Cpu => Fact::Cpu(CpuFact {
            five_seconds: percent("five_seconds"),
            interrupts: percent("interrupts"),
            one_minute: percent("one_minute"),
            five_minutes: percent("five_minutes"),
            fifteen_minutes: percent("fifteen_minutes"),
        }),
    }
}

//! Device OS dialects and the per-category support table.
//!
//! Every fact category declares its own set of supported dialects together
//! with the CLI command used to fetch the raw text. The table is static data:
//! adding a dialect means adding rows here and patterns in
//! [`crate::facts::patterns`], never new control flow.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// A device OS family with its own CLI output syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Dialect {
    Ios,
    IosXe,
    NxOs,
    IosXr,
}

impl Dialect {
    /// All known dialects, in display order.
    pub const ALL: [Dialect; 4] = [Dialect::Ios, Dialect::IosXe, Dialect::NxOs, Dialect::IosXr];

    /// Canonical identifier, as used in configuration and the version fact.
    pub fn as_str(self) -> &'static str {
        match self {
            Dialect::Ios => "IOS",
            Dialect::IosXe => "IOSXE",
            Dialect::NxOs => "NXOS",
            Dialect::IosXr => "IOSXR",
        }
    }

    /// Classifies raw `show version` output.
    ///
    /// More specific families are checked first because IOS XE and IOS XR
    /// banners also mention "Cisco IOS Software".
    pub fn identify(show_version: &str) -> Option<Dialect> {
        if show_version.contains("IOS XR") {
            Some(Dialect::IosXr)
        } else if show_version.contains("IOS-XE") || show_version.contains("IOS XE") {
            Some(Dialect::IosXe)
        } else if show_version.contains("NX-OS") {
            Some(Dialect::NxOs)
        } else if show_version.contains("Cisco IOS Software") || show_version.contains("IOS (tm)")
        {
            Some(Dialect::Ios)
        } else {
            None
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a dialect name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownDialect(pub String);

impl fmt::Display for UnknownDialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown dialect '{}'", self.0)
    }
}

impl std::error::Error for UnknownDialect {}

impl FromStr for Dialect {
    type Err = UnknownDialect;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Dialect::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownDialect(s.to_string()))
    }
}

/// Class of fact extracted from device output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FactCategory {
    BgpSession,
    Version,
    Memory,
    Cpu,
}

impl FactCategory {
    pub const ALL: [FactCategory; 4] = [
        FactCategory::BgpSession,
        FactCategory::Version,
        FactCategory::Memory,
        FactCategory::Cpu,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FactCategory::BgpSession => "bgp-session",
            FactCategory::Version => "version",
            FactCategory::Memory => "memory",
            FactCategory::Cpu => "cpu",
        }
    }
}

impl fmt::Display for FactCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// (category, dialect, command) rows. A pair without a row is unsupported.
const COMMANDS: &[(FactCategory, Dialect, &str)] = &[
    (FactCategory::BgpSession, Dialect::IosXr, "show bgp neighbor"),
    (FactCategory::Version, Dialect::Ios, "show version"),
    (FactCategory::Version, Dialect::IosXe, "show version"),
    (FactCategory::Version, Dialect::NxOs, "show version"),
    (FactCategory::Version, Dialect::IosXr, "show version"),
    (FactCategory::Memory, Dialect::Ios, "show process memory"),
    (FactCategory::Memory, Dialect::IosXe, "show process memory"),
    (FactCategory::Memory, Dialect::IosXr, "show process memory"),
    (FactCategory::Cpu, Dialect::Ios, "show process cpu"),
    (FactCategory::Cpu, Dialect::IosXe, "show process cpu"),
    (FactCategory::Cpu, Dialect::IosXr, "show process cpu"),
];

/// Read-only view over the dialect support table.
#[derive(Debug, Default, Clone, Copy)]
pub struct DialectRegistry;

impl DialectRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Command text for a (category, dialect) pair, if the pair is supported.
    pub fn command(&self, category: FactCategory, dialect: Dialect) -> Option<&'static str> {
        COMMANDS
            .iter()
            .find(|(c, d, _)| *c == category && *d == dialect)
            .map(|(_, _, cmd)| *cmd)
    }

    pub fn supports(&self, category: FactCategory, dialect: Dialect) -> bool {
        self.command(category, dialect).is_some()
    }

    /// Dialects supported for one category, in table order.
    pub fn dialects_for(&self, category: FactCategory) -> Vec<Dialect> {
        COMMANDS
            .iter()
            .filter(|(c, _, _)| *c == category)
            .map(|(_, d, _)| *d)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bgp_only_on_iosxr() {
        let registry = DialectRegistry::new();
        assert_eq!(
            registry.dialects_for(FactCategory::BgpSession),
            vec![Dialect::IosXr]
        );
        assert!(!registry.supports(FactCategory::BgpSession, Dialect::Ios));
        assert_eq!(
            registry.command(FactCategory::BgpSession, Dialect::IosXr),
            Some("show bgp neighbor")
        );
    }

    #[test]
    fn test_nxos_has_version_but_not_memory_or_cpu() {
        let registry = DialectRegistry::new();
        assert!(registry.supports(FactCategory::Version, Dialect::NxOs));
        assert!(!registry.supports(FactCategory::Memory, Dialect::NxOs));
        assert!(!registry.supports(FactCategory::Cpu, Dialect::NxOs));
    }

    #[test]
    fn test_commands() {
        let registry = DialectRegistry::new();
        assert_eq!(
            registry.command(FactCategory::Version, Dialect::Ios),
            Some("show version")
        );
        assert_eq!(
            registry.command(FactCategory::Memory, Dialect::IosXe),
            Some("show process memory")
        );
        assert_eq!(
            registry.command(FactCategory::Cpu, Dialect::IosXr),
            Some("show process cpu")
        );
    }

    #[test]
    fn test_parse_dialect() {
        assert_eq!("IOSXR".parse::<Dialect>().unwrap(), Dialect::IosXr);
        assert_eq!("iosxe".parse::<Dialect>().unwrap(), Dialect::IosXe);
        assert_eq!(" NXOS ".parse::<Dialect>().unwrap(), Dialect::NxOs);
        assert!("junos".parse::<Dialect>().is_err());
        for d in Dialect::ALL {
            assert_eq!(d.to_string().parse::<Dialect>().unwrap(), d);
        }
    }

    #[test]
    fn test_deserialize_dialect() {
        let d: Dialect = serde_json::from_str("\"IOSXE\"").unwrap();
        assert_eq!(d, Dialect::IosXe);
    }

    #[test]
    fn test_identify() {
        assert_eq!(
            Dialect::identify("Cisco IOS XR Software, Version 7.3.2[Default]"),
            Some(Dialect::IosXr)
        );
        assert_eq!(
            Dialect::identify("Cisco IOS XE Software, Version 17.03.04a"),
            Some(Dialect::IosXe)
        );
        assert_eq!(
            Dialect::identify("Cisco IOS Software [Amsterdam], Virtual XE Software (X86_64_LINUX_IOSD-UNIVERSALK9-M), Version 17.3.4a\nCisco IOS-XE software"),
            Some(Dialect::IosXe)
        );
        assert_eq!(
            Dialect::identify("Cisco Nexus Operating System (NX-OS) Software"),
            Some(Dialect::NxOs)
        );
        assert_eq!(
            Dialect::identify("Cisco IOS Software, C2960 Software (C2960-LANBASEK9-M), Version 15.0(2)SE11"),
            Some(Dialect::Ios)
        );
        assert_eq!(Dialect::identify("JUNOS 21.4R3"), None);
    }
}

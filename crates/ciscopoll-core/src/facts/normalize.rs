//! Numeric coercion and unit normalization.
//!
//! Unparsable numeric text becomes `0` instead of an error: partial
//! telemetry from a device is preferable to none.

use super::MemoryFact;

/// Unit a dialect reports memory capacity in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemoryUnit {
    Bytes,
    /// Decimal megabytes (10^6 bytes).
    Megabytes,
}

impl MemoryUnit {
    pub const fn multiplier(self) -> u64 {
        match self {
            MemoryUnit::Bytes => 1,
            MemoryUnit::Megabytes => 1_000_000,
        }
    }
}

/// Parses a non-negative count, falling back to 0.
///
/// Integer text is the normal case; fractional text is truncated.
pub fn parse_count(raw: &str) -> u64 {
    let raw = raw.trim();
    if let Ok(v) = raw.parse::<u64>() {
        return v;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() && v >= 0.0 => v as u64,
        _ => 0,
    }
}

/// Parses a whole-percentage token such as `10` or `10%`, falling back to 0.
///
/// Follows [`parse_count`]: fractions truncate and overflow saturates.
pub fn parse_percent(raw: &str) -> u32 {
    let count = parse_count(raw.trim().trim_end_matches('%'));
    u32::try_from(count).unwrap_or(u32::MAX)
}

/// Builds a memory fact in canonical bytes.
///
/// When `used` is not reported it is derived as `total - free`; when all
/// three are reported they are taken as-is with no reconciliation.
pub fn memory_fact(
    pool: &str,
    unit: MemoryUnit,
    total: &str,
    used: Option<&str>,
    free: &str,
) -> MemoryFact {
    let total = parse_count(total);
    let free = parse_count(free);
    let used = match used {
        Some(used) => parse_count(used),
        None => total.saturating_sub(free),
    };

    let m = unit.multiplier();
    MemoryFact {
        pool: pool.to_string(),
        total: total.saturating_mul(m),
        used: used.saturating_mul(m),
        free: free.saturating_mul(m),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_megabyte_multiplier_is_decimal() {
        assert_eq!(MemoryUnit::Megabytes.multiplier(), 1_000_000);
        assert_eq!(MemoryUnit::Bytes.multiplier(), 1);
    }

    #[test]
    fn test_memory_fact_megabytes_derives_used() {
        let fact = memory_fact("Physical Memory", MemoryUnit::Megabytes, "100", None, "40");
        assert_eq!(fact.total, 100_000_000);
        assert_eq!(fact.free, 40_000_000);
        assert_eq!(fact.used, 60_000_000);
    }

    #[test]
    fn test_memory_fact_bytes_no_reconciliation() {
        let fact = memory_fact("Processor", MemoryUnit::Bytes, "1000", Some("300"), "600");
        assert_eq!(fact.total, 1000);
        assert_eq!(fact.used, 300);
        assert_eq!(fact.free, 600);
    }

    #[test]
    fn test_memory_fact_free_above_total() {
        let fact = memory_fact("Physical Memory", MemoryUnit::Megabytes, "10", None, "40");
        assert_eq!(fact.used, 0);
    }

    #[test]
    fn test_unparsable_becomes_zero() {
        assert_eq!(parse_count("abc"), 0);
        assert_eq!(parse_count(""), 0);
        assert_eq!(parse_count("-5"), 0);
        assert_eq!(parse_percent("n/a"), 0);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(" 42 "), 42);
        assert_eq!(parse_count("3.9"), 3);
        assert_eq!(parse_count("18446744073709551615"), u64::MAX);
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(parse_percent("10"), 10);
        assert_eq!(parse_percent("7%"), 7);
        assert_eq!(parse_percent(" 100 "), 100);
        assert_eq!(parse_percent("2.5%"), 2);
    }

    #[test]
    fn test_overflow_saturates_for_counts_and_percents() {
        assert_eq!(parse_count("99999999999999999999999"), u64::MAX);
        assert_eq!(parse_percent("4294967296"), u32::MAX);
        assert_eq!(parse_percent("99999999999999999999999%"), u32::MAX);
    }
}

//! Device facts: OS version, memory pools and CPU load.

use super::{FactCollector, gather};
use crate::dialect::{DialectRegistry, FactCategory};
use crate::facts::{CpuFact, Fact, FactExtractor};
use crate::metrics::descriptors::{
    CPU_FIFTEEN_MINUTES, CPU_FIVE_MINUTES, CPU_FIVE_SECONDS, CPU_INTERRUPTS, CPU_ONE_MINUTE,
    MEMORY_FREE, MEMORY_TOTAL, MEMORY_USED, VERSION,
};
use crate::metrics::{MetricDesc, MetricSink, Sample, label_values};
use crate::session::{Session, TransportError};

static DESCRIPTORS: &[&MetricDesc] = &[
    &VERSION,
    &MEMORY_TOTAL,
    &MEMORY_USED,
    &MEMORY_FREE,
    &CPU_FIVE_SECONDS,
    &CPU_INTERRUPTS,
    &CPU_ONE_MINUTE,
    &CPU_FIVE_MINUTES,
    &CPU_FIFTEEN_MINUTES,
];

/// Categories in issue order.
const CATEGORIES: [FactCategory; 3] = [
    FactCategory::Version,
    FactCategory::Memory,
    FactCategory::Cpu,
];

pub struct FactsCollector {
    registry: DialectRegistry,
    extractor: FactExtractor,
}

impl FactsCollector {
    pub fn new(extractor: FactExtractor) -> Self {
        Self {
            registry: DialectRegistry::new(),
            extractor,
        }
    }
}

impl FactCollector for FactsCollector {
    fn name(&self) -> &'static str {
        "facts"
    }

    fn describe(&self) -> &'static [&'static MetricDesc] {
        DESCRIPTORS
    }

    fn collect(
        &self,
        session: &mut dyn Session,
        labels: &[String],
        sink: &mut dyn MetricSink,
    ) -> Result<(), TransportError> {
        let device = labels.first().map(String::as_str).unwrap_or_default();

        for category in CATEGORIES {
            let Some(facts) = gather(&self.registry, &self.extractor, session, category, device)?
            else {
                continue;
            };

            for fact in facts {
                match fact {
                    Fact::Version(v) => {
                        let l = label_values(labels, &[v.version.as_str()]);
                        sink.emit(Sample::new(&VERSION, 1.0, l));
                    }
                    Fact::Memory(m) => {
                        let l = label_values(labels, &[m.pool.as_str()]);
                        sink.emit(Sample::new(&MEMORY_TOTAL, m.total as f64, l.clone()));
                        sink.emit(Sample::new(&MEMORY_USED, m.used as f64, l.clone()));
                        sink.emit(Sample::new(&MEMORY_FREE, m.free as f64, l));
                    }
                    Fact::Cpu(c) => emit_cpu(&c, labels, sink),
                    Fact::BgpSession(_) => {}
                }
            }
        }

        Ok(())
    }
}

fn emit_cpu(cpu: &CpuFact, labels: &[String], sink: &mut dyn MetricSink) {
    let windows: [(&'static MetricDesc, Option<u32>); 5] = [
        (&CPU_FIVE_SECONDS, cpu.five_seconds),
        (&CPU_INTERRUPTS, cpu.interrupts),
        (&CPU_ONE_MINUTE, cpu.one_minute),
        (&CPU_FIVE_MINUTES, cpu.five_minutes),
        (&CPU_FIFTEEN_MINUTES, cpu.fifteen_minutes),
    ];
    for (desc, value) in windows {
        if let Some(value) = value {
            sink.emit(Sample::new(desc, value as f64, labels.to_vec()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::session::ScriptedSession;

    fn collector() -> FactsCollector {
        FactsCollector::new(FactExtractor::new().unwrap())
    }

    fn target() -> Vec<String> {
        vec!["sw1".to_string()]
    }

    fn find<'a>(samples: &'a [Sample], desc: &MetricDesc, label: &str) -> Option<&'a Sample> {
        samples
            .iter()
            .find(|s| s.desc == desc && s.labels.last().map(String::as_str) == Some(label))
    }

    #[test]
    fn test_collect_ios_switch() {
        let mut session = ScriptedSession::ios_switch();
        let mut samples: Vec<Sample> = Vec::new();
        collector()
            .collect(&mut session, &target(), &mut samples)
            .unwrap();

        assert_eq!(
            session.issued(),
            ["show version", "show process memory", "show process cpu"]
        );

        let version = find(&samples, &VERSION, "IOS-15.0(2)SE11").unwrap();
        assert_eq!(version.value, 1.0);
        assert_eq!(version.labels, vec!["sw1", "IOS-15.0(2)SE11"]);

        assert_eq!(
            find(&samples, &MEMORY_TOTAL, "Processor").unwrap().value,
            1_862_154_880.0
        );
        assert_eq!(find(&samples, &MEMORY_USED, "I/O").unwrap().value, 6_283_512.0);
        assert_eq!(find(&samples, &MEMORY_FREE, "I/O").unwrap().value, 2_105_096.0);

        let cpu: Vec<_> = samples
            .iter()
            .filter(|s| s.labels == target())
            .map(|s| (s.desc.name, s.value))
            .collect();
        assert_eq!(
            cpu,
            vec![
                ("cisco_cpu_five_seconds_percent", 10.0),
                ("cisco_cpu_interrupt_percent", 2.0),
                ("cisco_cpu_one_minute_percent", 5.0),
                ("cisco_cpu_five_minutes_percent", 3.0),
            ]
        );

        // 1 version + 2 pools x 3 + 4 cpu windows
        assert_eq!(samples.len(), 11);
    }

    #[test]
    fn test_nxos_only_version() {
        let mut session = ScriptedSession::nxos_switch();
        let mut samples: Vec<Sample> = Vec::new();
        collector()
            .collect(&mut session, &target(), &mut samples)
            .unwrap();

        assert_eq!(session.issued(), ["show version"]);
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].labels, vec!["sw1", "NXOS-9.3(8)"]);
    }

    #[test]
    fn test_iosxr_cpu_reports_three_windows() {
        let mut session = ScriptedSession::iosxr_router();
        let mut samples: Vec<Sample> = Vec::new();
        collector()
            .collect(&mut session, &target(), &mut samples)
            .unwrap();

        assert!(samples.iter().all(|s| s.desc != &CPU_FIVE_SECONDS));
        assert!(samples.iter().all(|s| s.desc != &CPU_INTERRUPTS));
        assert!(samples.iter().any(|s| s.desc == &CPU_FIFTEEN_MINUTES));
    }

    #[test]
    fn test_transport_error_stops_collection() {
        let mut session = ScriptedSession::new(Dialect::Ios)
            .with_reply("show version", crate::session::mock::outputs::IOS_SHOW_VERSION)
            .with_failure(
                "show process memory",
                TransportError::Connect("reset".to_string()),
            );
        let mut samples: Vec<Sample> = Vec::new();
        let err = collector()
            .collect(&mut session, &target(), &mut samples)
            .unwrap_err();

        assert_eq!(err, TransportError::Connect("reset".to_string()));
        assert_eq!(session.issued(), ["show version", "show process memory"]);
    }

    #[test]
    fn test_unparsable_output_is_skipped() {
        let mut session = ScriptedSession::new(Dialect::Ios)
            .with_reply("show version", "% Invalid input\n")
            .with_reply("show process memory", "")
            .with_reply("show process cpu", crate::session::mock::outputs::IOS_PROCESS_CPU);
        let mut samples: Vec<Sample> = Vec::new();
        collector()
            .collect(&mut session, &target(), &mut samples)
            .unwrap();

        assert_eq!(samples.len(), 4);
        assert!(samples.iter().all(|s| s.labels == target()));
    }
}

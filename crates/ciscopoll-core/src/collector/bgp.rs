//! BGP session metrics from `show bgp neighbor`.

use super::{FactCollector, gather};
use crate::dialect::{DialectRegistry, FactCategory};
use crate::facts::{Fact, FactExtractor};
use crate::metrics::descriptors::{
    BGP_BEST_PATHS, BGP_PREFIXES_ADVERTISED, BGP_PREFIXES_RECEIVED, BGP_UP,
};
use crate::metrics::{MetricDesc, MetricSink, Sample, label_values};
use crate::session::{Session, TransportError};

static DESCRIPTORS: &[&MetricDesc] = &[
    &BGP_UP,
    &BGP_PREFIXES_RECEIVED,
    &BGP_PREFIXES_ADVERTISED,
    &BGP_BEST_PATHS,
];

pub struct BgpCollector {
    registry: DialectRegistry,
    extractor: FactExtractor,
}

impl BgpCollector {
    pub fn new(extractor: FactExtractor) -> Self {
        Self {
            registry: DialectRegistry::new(),
            extractor,
        }
    }
}

impl FactCollector for BgpCollector {
    fn name(&self) -> &'static str {
        "bgp"
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
        let Some(facts) = gather(
            &self.registry,
            &self.extractor,
            session,
            FactCategory::BgpSession,
            device,
        )?
        else {
            return Ok(());
        };

        for fact in facts {
            let Fact::BgpSession(s) = fact else {
                continue;
            };
            let l = label_values(
                labels,
                &[s.asn.as_str(), s.ip.as_str(), s.description.as_str()],
            );
            let up = if s.up { 1.0 } else { 0.0 };

            sink.emit(Sample::new(&BGP_UP, up, l.clone()));
            sink.emit(Sample::new(
                &BGP_PREFIXES_RECEIVED,
                s.accepted_prefixes as f64,
                l.clone(),
            ));
            sink.emit(Sample::new(
                &BGP_PREFIXES_ADVERTISED,
                s.prefixes_advertised as f64,
                l.clone(),
            ));
            sink.emit(Sample::new(&BGP_BEST_PATHS, s.best_paths as f64, l));
        }

        Ok(())
    }
}

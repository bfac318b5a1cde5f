//! Prometheus text exposition of collected samples.
//!
//! Descriptors are declared once at startup. Each render builds a fresh
//! registry so concurrent scrapes never share gauge state.

use std::collections::{HashMap, HashSet};

use prometheus::{Encoder, GaugeVec, Opts, Registry, TextEncoder};
use tracing::debug;

use super::{MetricDesc, Sample};

/// Content type of the rendered text.
pub const CONTENT_TYPE: &str = prometheus::TEXT_FORMAT;

#[derive(Debug)]
pub enum ExpositionError {
    /// Invalid descriptor or label cardinality mismatch.
    Prometheus(prometheus::Error),
    /// A sample refers to a descriptor that was never declared.
    UnknownMetric(&'static str),
    Utf8(std::string::FromUtf8Error),
}

impl std::fmt::Display for ExpositionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpositionError::Prometheus(e) => write!(f, "prometheus: {}", e),
            ExpositionError::UnknownMetric(name) => write!(f, "undeclared metric {}", name),
            ExpositionError::Utf8(e) => write!(f, "non-UTF-8 exposition: {}", e),
        }
    }
}

impl std::error::Error for ExpositionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExpositionError::Prometheus(e) => Some(e),
            ExpositionError::UnknownMetric(_) => None,
            ExpositionError::Utf8(e) => Some(e),
        }
    }
}

impl From<prometheus::Error> for ExpositionError {
    fn from(e: prometheus::Error) -> Self {
        ExpositionError::Prometheus(e)
    }
}

impl From<std::string::FromUtf8Error> for ExpositionError {
    fn from(e: std::string::FromUtf8Error) -> Self {
        ExpositionError::Utf8(e)
    }
}

/// The declared descriptor set.
#[derive(Debug, Clone)]
pub struct Exposition {
    descs: Vec<&'static MetricDesc>,
}

impl Exposition {
    /// Declares the descriptor set. Fails on invalid names or duplicates.
    pub fn new(
        descs: impl IntoIterator<Item = &'static MetricDesc>,
    ) -> Result<Self, ExpositionError> {
        let descs: Vec<_> = descs.into_iter().collect();
        // Registering into a throwaway registry validates names and uniqueness.
        register_all(&descs)?;
        Ok(Self { descs })
    }

    pub fn descriptors(&self) -> &[&'static MetricDesc] {
        &self.descs
    }

    /// Renders samples in the Prometheus text format.
    ///
    /// A series (descriptor plus label values) that appears more than once
    /// keeps the last value.
    pub fn render(&self, samples: &[Sample]) -> Result<String, ExpositionError> {
        let (registry, gauges) = register_all(&self.descs)?;
        let mut seen: HashSet<(&str, &[String])> = HashSet::with_capacity(samples.len());

        for sample in samples {
            let gauge = gauges
                .get(sample.desc.name)
                .ok_or(ExpositionError::UnknownMetric(sample.desc.name))?;
            if !seen.insert((sample.desc.name, sample.labels.as_slice())) {
                debug!(
                    metric = sample.desc.name,
                    labels = ?sample.labels,
                    "duplicate series, overwriting earlier value"
                );
            }
            let labels: Vec<&str> = sample.labels.iter().map(String::as_str).collect();
            gauge
                .get_metric_with_label_values(&labels)?
                .set(sample.value);
        }

        let mut buf = Vec::new();
        TextEncoder::new().encode(&registry.gather(), &mut buf)?;
        Ok(String::from_utf8(buf)?)
    }
}

fn register_all(
    descs: &[&'static MetricDesc],
) -> Result<(Registry, HashMap<&'static str, GaugeVec>), ExpositionError> {
    let registry = Registry::new();
    let mut gauges = HashMap::with_capacity(descs.len());
    for desc in descs {
        let gauge = GaugeVec::new(Opts::new(desc.name, desc.help), desc.labels)?;
        registry.register(Box::new(gauge.clone()))?;
        gauges.insert(desc.name, gauge);
    }
    Ok((registry, gauges))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::descriptors;

    fn exposition() -> Exposition {
        Exposition::new([&descriptors::UP, &descriptors::BGP_UP]).unwrap()
    }

    #[test]
    fn test_render_text_format() {
        let samples = vec![
            Sample::new(&descriptors::UP, 1.0, vec!["r1".into()]),
            Sample::new(
                &descriptors::BGP_UP,
                0.0,
                vec!["r1".into(), "65001".into(), "10.0.0.1".into(), "".into()],
            ),
        ];
        let text = exposition().render(&samples).unwrap();
        assert!(text.contains("# HELP cisco_up Device poll completed without a transport error"));
        assert!(text.contains("# TYPE cisco_up gauge"));
        assert!(text.contains("cisco_up{target=\"r1\"} 1"));
        let bgp = text
            .lines()
            .find(|l| l.starts_with("cisco_bgp_session_up{"))
            .unwrap();
        for pair in [
            "target=\"r1\"",
            "asn=\"65001\"",
            "ip=\"10.0.0.1\"",
            "description=\"\"",
        ] {
            assert!(bgp.contains(pair), "{} missing in {}", pair, bgp);
        }
        assert!(bgp.ends_with("} 0"));
    }

    #[test]
    fn test_label_cardinality_mismatch_is_error() {
        let samples = vec![Sample::new(&descriptors::BGP_UP, 1.0, vec!["r1".into()])];
        assert!(matches!(
            exposition().render(&samples),
            Err(ExpositionError::Prometheus(_))
        ));
    }

    #[test]
    fn test_undeclared_metric_is_error() {
        let samples = vec![Sample::new(&descriptors::VERSION, 1.0, vec!["r1".into(), "x".into()])];
        assert!(matches!(
            exposition().render(&samples),
            Err(ExpositionError::UnknownMetric("cisco_version"))
        ));
    }

    #[test]
    fn test_duplicate_descriptor_rejected() {
        assert!(Exposition::new([&descriptors::UP, &descriptors::UP]).is_err());
    }

    #[test]
    fn test_duplicate_series_keeps_last_value() {
        let exposition = Exposition::new([&descriptors::MEMORY_TOTAL]).unwrap();
        let labels = || vec!["sw1".to_string(), "Processor".to_string()];
        let samples = vec![
            Sample::new(&descriptors::MEMORY_TOTAL, 100.0, labels()),
            Sample::new(&descriptors::MEMORY_TOTAL, 200.0, labels()),
        ];
        let text = exposition.render(&samples).unwrap();
        let series: Vec<_> = text
            .lines()
            .filter(|l| l.starts_with("cisco_memory_total_bytes{"))
            .collect();
        assert_eq!(series.len(), 1);
        assert!(series[0].ends_with("} 200"));
    }

    #[test]
    fn test_empty_render() {
        let text = exposition().render(&[]).unwrap();
        assert!(!text.contains("cisco_up{"));
    }
}

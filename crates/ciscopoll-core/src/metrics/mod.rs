//! Metric descriptors, samples, and the sink collectors write into.

pub mod descriptors;
pub mod exposition;

pub use exposition::{CONTENT_TYPE, Exposition, ExpositionError};

/// Static declaration of one exported metric.
#[derive(Debug, PartialEq, Eq)]
pub struct MetricDesc {
    pub name: &'static str,
    pub help: &'static str,
    pub labels: &'static [&'static str],
}

/// One point value for a descriptor.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub desc: &'static MetricDesc,
    pub value: f64,
    /// Values in the order of `desc.labels`.
    pub labels: Vec<String>,
}

impl Sample {
    pub fn new(desc: &'static MetricDesc, value: f64, labels: Vec<String>) -> Self {
        Self {
            desc,
            value,
            labels,
        }
    }
}

/// Destination for emitted samples.
pub trait MetricSink {
    fn emit(&mut self, sample: Sample);
}

impl MetricSink for Vec<Sample> {
    fn emit(&mut self, sample: Sample) {
        self.push(sample);
    }
}

/// Caller labels followed by fact-specific labels.
pub fn label_values(context: &[String], extra: &[&str]) -> Vec<String> {
    let mut labels = Vec::with_capacity(context.len() + extra.len());
    labels.extend(context.iter().cloned());
    labels.extend(extra.iter().map(|s| s.to_string()));
    labels
}

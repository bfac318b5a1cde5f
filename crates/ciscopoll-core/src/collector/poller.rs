//! Per-device poll cycle and concurrent multi-device polling.

use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use tracing::{debug, error};

use super::{BgpCollector, FactCollector, FactsCollector};
use crate::facts::FactExtractor;
use crate::metrics::descriptors::{COLLECTOR_DURATION, UP};
use crate::metrics::{MetricDesc, MetricSink, Sample};
use crate::session::{Session, TransportError};

/// Collector name used when the session itself could not be opened.
const CONNECT: &str = "connect";

/// Poll-level failure for one device.
#[derive(Debug, Clone, PartialEq)]
pub enum CollectError {
    Transport {
        target: String,
        collector: &'static str,
        source: TransportError,
    },
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::Transport {
                target,
                collector,
                source,
            } => write!(f, "{}: {} collector: {}", target, collector, source),
        }
    }
}

impl std::error::Error for CollectError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectError::Transport { source, .. } => Some(source),
        }
    }
}

/// Wall-clock time spent in one collector.
#[derive(Debug, Clone, PartialEq)]
pub struct PollTiming {
    pub collector: &'static str,
    pub duration: Duration,
}

/// Outcome of polling one device.
#[derive(Debug, Clone)]
pub struct PollReport {
    pub target: String,
    /// UNIX seconds at the start of the poll.
    pub timestamp: i64,
    pub samples: Vec<Sample>,
    pub timings: Vec<PollTiming>,
    pub error: Option<CollectError>,
    /// False when a transport error ended the poll.
    pub up: bool,
}

/// Runs the enabled collectors against one session.
pub struct DevicePoller {
    collectors: Vec<Box<dyn FactCollector>>,
}

impl DevicePoller {
    pub fn new(collectors: Vec<Box<dyn FactCollector>>) -> Self {
        Self { collectors }
    }

    /// BGP and facts collectors, both enabled.
    pub fn standard(extractor: FactExtractor) -> Self {
        Self::with_collectors(extractor, true, true)
    }

    pub fn with_collectors(extractor: FactExtractor, bgp: bool, facts: bool) -> Self {
        let mut collectors: Vec<Box<dyn FactCollector>> = Vec::new();
        if bgp {
            collectors.push(Box::new(BgpCollector::new(extractor.clone())));
        }
        if facts {
            collectors.push(Box::new(FactsCollector::new(extractor)));
        }
        Self::new(collectors)
    }

    pub fn collector_names(&self) -> Vec<&'static str> {
        self.collectors.iter().map(|c| c.name()).collect()
    }

    /// Every descriptor a poll may emit, including the poll meta metrics.
    pub fn descriptors(&self) -> Vec<&'static MetricDesc> {
        let mut descs: Vec<&'static MetricDesc> = self
            .collectors
            .iter()
            .flat_map(|c| c.describe().iter().copied())
            .collect();
        descs.push(&UP);
        descs.push(&COLLECTOR_DURATION);
        descs
    }

    /// Polls one device over an open session.
    ///
    /// Collectors run sequentially. The first transport error ends the poll;
    /// the samples gathered so far are dropped and only `cisco_up = 0` is
    /// reported.
    pub fn poll(&self, target: &str, session: &mut dyn Session) -> PollReport {
        let timestamp = unix_now();
        let labels = vec![target.to_string()];
        let mut samples: Vec<Sample> = Vec::new();
        let mut timings = Vec::with_capacity(self.collectors.len());
        let mut failure = None;

        for collector in &self.collectors {
            let start = Instant::now();
            let result = collector.collect(session, &labels, &mut samples);
            timings.push(PollTiming {
                collector: collector.name(),
                duration: start.elapsed(),
            });

            if let Err(source) = result {
                failure = Some(CollectError::Transport {
                    target: target.to_string(),
                    collector: collector.name(),
                    source,
                });
                break;
            }
        }

        match failure {
            Some(err) => {
                error!(device = target, error = %err, "poll failed");
                PollReport {
                    target: target.to_string(),
                    timestamp,
                    samples: vec![Sample::new(&UP, 0.0, labels)],
                    timings,
                    error: Some(err),
                    up: false,
                }
            }
            None => {
                for timing in &timings {
                    samples.emit(Sample::new(
                        &COLLECTOR_DURATION,
                        timing.duration.as_secs_f64(),
                        vec![target.to_string(), timing.collector.to_string()],
                    ));
                }
                samples.emit(Sample::new(&UP, 1.0, labels));
                debug!(device = target, samples = samples.len(), "poll complete");
                PollReport {
                    target: target.to_string(),
                    timestamp,
                    samples,
                    timings,
                    error: None,
                    up: true,
                }
            }
        }
    }

    /// Report for a device whose session could not be opened.
    pub fn unreachable(&self, target: &str, source: TransportError) -> PollReport {
        let err = CollectError::Transport {
            target: target.to_string(),
            collector: CONNECT,
            source,
        };
        error!(device = target, error = %err, "device unreachable");
        PollReport {
            target: target.to_string(),
            timestamp: unix_now(),
            samples: vec![Sample::new(&UP, 0.0, vec![target.to_string()])],
            timings: Vec::new(),
            error: Some(err),
            up: false,
        }
    }
}

/// Polls every target concurrently, one scoped thread per device.
///
/// `open` produces the session for a target. Reports come back in the order
/// of `targets`.
pub fn poll_targets<F>(poller: &DevicePoller, targets: &[String], open: F) -> Vec<PollReport>
where
    F: Fn(&str) -> Result<Box<dyn Session>, TransportError> + Sync,
{
    let open = &open;
    std::thread::scope(|scope| {
        let handles: Vec<_> = targets
            .iter()
            .map(|target| {
                scope.spawn(move || match open(target.as_str()) {
                    Ok(mut session) => poller.poll(target, &mut *session),
                    Err(e) => poller.unreachable(target, e),
                })
            })
            .collect();

        handles
            .into_iter()
            .zip(targets)
            .map(|(handle, target)| {
                handle.join().unwrap_or_else(|_| {
                    poller.unreachable(target, TransportError::Io("poll worker panicked".into()))
                })
            })
            .collect()
    })
}

fn unix_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

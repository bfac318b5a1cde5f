//! Collectors: command → extraction → metric samples.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      DevicePoller                        │
//! │   ┌──────────────────┐        ┌──────────────────────┐   │
//! │   │   BgpCollector   │        │    FactsCollector    │   │
//! │   │ show bgp neighbor│        │ version/memory/cpu   │   │
//! │   └────────┬─────────┘        └──────────┬───────────┘   │
//! │            └──────────────┬──────────────┘               │
//! │                    ┌──────▼──────┐                       │
//! │                    │   Session   │ (trait)               │
//! │                    └──────┬──────┘                       │
//! └───────────────────────────┼──────────────────────────────┘
//!              ┌──────────────┼──────────────┐
//!       ┌──────▼──────┐ ┌─────▼───────┐ ┌────▼────────┐
//!       │ SshSession  │ │ Scripted    │ │  outputs    │
//!       │ (OpenSSH)   │ │ (Testing)   │ │ (Fixtures)  │
//!       └─────────────┘ └─────────────┘ └─────────────┘
//! ```
//!
//! Only transport failures escape a collector. Unsupported categories are
//! skipped without issuing a command, and extraction failures are logged and
//! leave the category without samples.
//!
//! # Usage
//!
//! ```
//! use ciscopoll_core::collector::DevicePoller;
//! use ciscopoll_core::facts::FactExtractor;
//! use ciscopoll_core::session::ScriptedSession;
//!
//! let poller = DevicePoller::standard(FactExtractor::new().unwrap());
//! let mut session = ScriptedSession::iosxr_router();
//! let report = poller.poll("edge1", &mut session);
//! assert!(report.up);
//! assert!(!report.samples.is_empty());
//! ```

mod bgp;
mod facts;
mod poller;

pub use bgp::BgpCollector;
pub use facts::FactsCollector;
pub use poller::{CollectError, DevicePoller, PollReport, PollTiming, poll_targets};

use tracing::{debug, warn};

use crate::dialect::{DialectRegistry, FactCategory};
use crate::facts::{Fact, FactExtractor};
use crate::metrics::{MetricDesc, MetricSink};
use crate::session::{Session, TransportError};

/// A named group of metrics collected from one device.
pub trait FactCollector: Send + Sync {
    fn name(&self) -> &'static str;

    /// Descriptors this collector may emit.
    fn describe(&self) -> &'static [&'static MetricDesc];

    /// Emits samples labeled with `labels` followed by fact-specific labels.
    ///
    /// Errors only on transport failure.
    fn collect(
        &self,
        session: &mut dyn Session,
        labels: &[String],
        sink: &mut dyn MetricSink,
    ) -> Result<(), TransportError>;
}

/// Runs one category's command and extracts its facts.
///
/// `Ok(None)` means the category was skipped: either the dialect does not
/// support it (no command is issued) or extraction failed softly.
pub(crate) fn gather(
    registry: &DialectRegistry,
    extractor: &FactExtractor,
    session: &mut dyn Session,
    category: FactCategory,
    device: &str,
) -> Result<Option<Vec<Fact>>, TransportError> {
    let dialect = session.dialect();
    let Some(command) = registry.command(category, dialect) else {
        debug!(device, %category, %dialect, "category not supported, skipping");
        return Ok(None);
    };

    let output = session.run_command(command)?;

    match extractor.extract(dialect, category, &output) {
        Ok(facts) => {
            debug!(device, %category, count = facts.len(), "extracted facts");
            Ok(Some(facts))
        }
        Err(e) => {
            if session.debug() {
                warn!(device, %category, error = %e, "extraction failed");
            } else {
                debug!(device, %category, error = %e, "extraction failed");
            }
            Ok(None)
        }
    }
}

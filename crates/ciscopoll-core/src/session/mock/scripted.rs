//! In-memory session that replays canned command output.

use std::collections::HashMap;

use super::outputs;
use crate::dialect::Dialect;
use crate::session::{Session, TransportError};

/// Session with scripted replies keyed by exact command text.
///
/// Every command is recorded, including ones without a scripted reply,
/// which fail with [`TransportError::CommandRejected`].
#[derive(Debug, Clone)]
pub struct ScriptedSession {
    dialect: Dialect,
    debug: bool,
    replies: HashMap<String, Result<String, TransportError>>,
    issued: Vec<String>,
}

impl ScriptedSession {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            debug: false,
            replies: HashMap::new(),
            issued: Vec::new(),
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_reply(mut self, command: &str, output: impl Into<String>) -> Self {
        self.replies.insert(command.to_string(), Ok(output.into()));
        self
    }

    pub fn with_failure(mut self, command: &str, error: TransportError) -> Self {
        self.replies.insert(command.to_string(), Err(error));
        self
    }

    /// Commands issued so far, in order.
    pub fn issued(&self) -> &[String] {
        &self.issued
    }

    /// IOS XR router with two BGP neighbors and all fact commands scripted.
    pub fn iosxr_router() -> Self {
        Self::new(Dialect::IosXr)
            .with_reply("show bgp neighbor", outputs::IOSXR_BGP_NEIGHBORS)
            .with_reply("show version", outputs::IOSXR_SHOW_VERSION)
            .with_reply("show process memory", outputs::IOSXR_PROCESS_MEMORY)
            .with_reply("show process cpu", outputs::IOSXR_PROCESS_CPU)
    }

    /// Classic IOS switch.
    pub fn ios_switch() -> Self {
        Self::new(Dialect::Ios)
            .with_reply("show version", outputs::IOS_SHOW_VERSION)
            .with_reply("show process memory", outputs::IOS_PROCESS_MEMORY)
            .with_reply("show process cpu", outputs::IOS_PROCESS_CPU)
    }

    /// NX-OS switch; only the version fact is implemented for this dialect.
    pub fn nxos_switch() -> Self {
        Self::new(Dialect::NxOs).with_reply("show version", outputs::NXOS_SHOW_VERSION)
    }
}

impl Session for ScriptedSession {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn debug(&self) -> bool {
        self.debug
    }

    fn run_command(&mut self, command: &str) -> Result<String, TransportError> {
        self.issued.push(command.to_string());
        self.replies
            .get(command)
            .cloned()
            .unwrap_or_else(|| {
                Err(TransportError::CommandRejected {
                    command: command.to_string(),
                    message: "no scripted reply".to_string(),
                })
            })
    }
}

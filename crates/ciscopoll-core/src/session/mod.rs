//! Boundary to the remote command-execution channel.
//!
//! The `Session` trait lets collectors run against a real device over SSH or
//! against scripted output in tests. Connection lifecycle, authentication
//! and retries belong to the implementation; collectors only see command
//! text going in and raw text (or a transport error) coming out.

pub mod mock;
pub mod ssh;

pub use mock::ScriptedSession;
pub use ssh::{SshConfig, SshSession};

use std::time::Duration;

use crate::dialect::Dialect;

/// Failure of the underlying transport. Always poll-fatal for the device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Could not reach or authenticate to the device.
    Connect(String),
    /// The device or client refused to execute the command.
    CommandRejected { command: String, message: String },
    /// No complete reply within the round-trip bound.
    Timeout { command: String, after: Duration },
    /// Local I/O failure talking to the transport.
    Io(String),
}

impl std::fmt::Display for TransportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransportError::Connect(msg) => write!(f, "connect failed: {}", msg),
            TransportError::CommandRejected { command, message } => {
                write!(f, "command '{}' rejected: {}", command, message)
            }
            TransportError::Timeout { command, after } => {
                write!(f, "command '{}' timed out after {:?}", command, after)
            }
            TransportError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for TransportError {}

impl From<std::io::Error> for TransportError {
    fn from(e: std::io::Error) -> Self {
        TransportError::Io(e.to_string())
    }
}

/// An open command channel to one device.
pub trait Session: Send {
    /// OS dialect of the connected device.
    fn dialect(&self) -> Dialect;

    /// Whether soft failures should be logged loudly for this device.
    fn debug(&self) -> bool {
        false
    }

    /// Runs one command and returns its raw output.
    fn run_command(&mut self, command: &str) -> Result<String, TransportError>;
}

impl<S: Session + ?Sized> Session for Box<S> {
    fn dialect(&self) -> Dialect {
        (**self).dialect()
    }

    fn debug(&self) -> bool {
        (**self).debug()
    }

    fn run_command(&mut self, command: &str) -> Result<String, TransportError> {
        (**self).run_command(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display() {
        let err = TransportError::Timeout {
            command: "show version".to_string(),
            after: Duration::from_secs(5),
        };
        assert_eq!(err.to_string(), "command 'show version' timed out after 5s");

        let err: TransportError = std::io::Error::other("broken pipe").into();
        assert_eq!(err, TransportError::Io("broken pipe".to_string()));
    }

    #[test]
    fn test_boxed_session_delegates() {
        let mut session: Box<dyn Session> = Box::new(
            ScriptedSession::new(Dialect::Ios).with_reply("show version", "ok"),
        );
        assert_eq!(session.dialect(), Dialect::Ios);
        assert_eq!(session.run_command("show version").unwrap(), "ok");
    }
}

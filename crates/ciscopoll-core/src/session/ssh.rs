//! Session over the system OpenSSH client.
//!
//! Each command is one non-interactive `ssh` invocation. Key-based
//! authentication only: `BatchMode=yes` makes the client fail instead of
//! prompting.

use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use super::{Session, TransportError};
use crate::dialect::Dialect;

/// Exit status the OpenSSH client reserves for its own errors.
const SSH_CLIENT_ERROR: i32 = 255;

/// Per-device transport settings.
#[derive(Debug, Clone, PartialEq)]
pub struct SshConfig {
    /// Client binary.
    pub client: String,
    pub user: Option<String>,
    pub port: u16,
    pub key_file: Option<PathBuf>,
    /// Bound on connect and on each command round-trip.
    pub timeout: Duration,
    /// `None` identifies the dialect from `show version` on connect.
    pub dialect: Option<Dialect>,
    pub debug: bool,
}

impl Default for SshConfig {
    fn default() -> Self {
        Self {
            client: "ssh".to_string(),
            user: None,
            port: 22,
            key_file: None,
            timeout: Duration::from_secs(5),
            dialect: None,
            debug: false,
        }
    }
}

impl SshConfig {
    /// Client arguments for running `command` on `host`.
    pub fn args(&self, host: &str, command: &str) -> Vec<String> {
        let mut args = vec![
            "-T".to_string(),
            "-o".to_string(),
            "BatchMode=yes".to_string(),
            "-o".to_string(),
            format!("ConnectTimeout={}", self.timeout.as_secs().max(1)),
            "-p".to_string(),
            self.port.to_string(),
        ];
        if let Some(key) = &self.key_file {
            args.push("-i".to_string());
            args.push(key.display().to_string());
        }
        if let Some(user) = &self.user {
            args.push("-l".to_string());
            args.push(user.clone());
        }
        args.push(host.to_string());
        args.push(command.to_string());
        args
    }
}

pub struct SshSession {
    host: String,
    config: SshConfig,
    dialect: Dialect,
}

impl SshSession {
    /// Opens a session, identifying the dialect first when none is configured.
    pub fn connect(host: &str, config: &SshConfig) -> Result<Self, TransportError> {
        let dialect = match config.dialect {
            Some(dialect) => dialect,
            None => {
                let output = exec(config, host, "show version")?;
                Dialect::identify(&output).ok_or_else(|| {
                    TransportError::Connect(format!(
                        "{}: unrecognized show version output",
                        host
                    ))
                })?
            }
        };
        debug!(host, %dialect, "session ready");

        Ok(Self {
            host: host.to_string(),
            config: config.clone(),
            dialect,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

impl Session for SshSession {
    fn dialect(&self) -> Dialect {
        self.dialect
    }

    fn debug(&self) -> bool {
        self.config.debug
    }

    fn run_command(&mut self, command: &str) -> Result<String, TransportError> {
        exec(&self.config, &self.host, command)
    }
}

/// Runs one command, killing the client if it outlives the timeout.
fn exec(config: &SshConfig, host: &str, command: &str) -> Result<String, TransportError> {
    let start = Instant::now();
    let mut child = Command::new(&config.client)
        .args(config.args(host, command))
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()?;

    let rx = drain(&mut child);
    let (stdout, stderr) = match rx.recv_timeout(config.timeout) {
        Ok(output) => output,
        Err(_) => {
            let _ = child.kill();
            let _ = child.wait();
            return Err(TransportError::Timeout {
                command: command.to_string(),
                after: config.timeout,
            });
        }
    };

    let status = child.wait()?;
    trace!(
        host,
        command,
        bytes = stdout.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "command finished"
    );

    if status.success() {
        return Ok(stdout);
    }

    let message = stderr.trim().to_string();
    match status.code() {
        Some(SSH_CLIENT_ERROR) => Err(TransportError::Connect(format!("{}: {}", host, message))),
        _ => Err(TransportError::CommandRejected {
            command: command.to_string(),
            message,
        }),
    }
}

/// Reads both pipes to completion on a helper thread.
fn drain(child: &mut Child) -> mpsc::Receiver<(String, String)> {
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let err_reader = thread::spawn(move || read_lossy(stderr));
        let out = read_lossy(stdout);
        let err = err_reader.join().unwrap_or_default();
        let _ = tx.send((out, err));
    });

    rx
}

fn read_lossy(pipe: Option<impl Read>) -> String {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    String::from_utf8_lossy(&buf).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_args() {
        let config = SshConfig::default();
        assert_eq!(
            config.args("10.0.0.1", "show version"),
            vec![
                "-T",
                "-o",
                "BatchMode=yes",
                "-o",
                "ConnectTimeout=5",
                "-p",
                "22",
                "10.0.0.1",
                "show version",
            ]
        );
    }

    #[test]
    fn test_args_with_identity_and_user() {
        let config = SshConfig {
            user: Some("netops".to_string()),
            port: 2222,
            key_file: Some(PathBuf::from("/etc/ciscopoll/id_ed25519")),
            timeout: Duration::from_millis(200),
            ..SshConfig::default()
        };
        let args = config.args("edge1", "show process cpu");
        assert!(args.contains(&"ConnectTimeout=1".to_string()));
        let tail: Vec<_> = args.iter().skip(5).map(String::as_str).collect();
        assert_eq!(
            tail,
            vec![
                "-p",
                "2222",
                "-i",
                "/etc/ciscopoll/id_ed25519",
                "-l",
                "netops",
                "edge1",
                "show process cpu",
            ]
        );
    }

    #[test]
    fn test_missing_client_is_io_error() {
        let config = SshConfig {
            client: "/nonexistent/ciscopoll-ssh".to_string(),
            dialect: Some(Dialect::Ios),
            ..SshConfig::default()
        };
        let mut session = SshSession::connect("edge1", &config).unwrap();
        assert_eq!(session.dialect(), Dialect::Ios);
        assert!(matches!(
            session.run_command("show version"),
            Err(TransportError::Io(_))
        ));
    }

    #[test]
    fn test_auto_dialect_needs_reachable_device() {
        let config = SshConfig {
            client: "/nonexistent/ciscopoll-ssh".to_string(),
            ..SshConfig::default()
        };
        assert!(SshSession::connect("edge1", &config).is_err());
    }
}

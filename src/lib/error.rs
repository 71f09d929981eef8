use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown database engine: {0}")]
    UnknownDatabase(String),

    #[error("{program} not found in PATH, is it installed?")]
    MissingBinary { program: String },

    #[error("credentials not found: no {variable} line matching {scheme}://user:password@host/database")]
    CredentialParse { variable: String, scheme: String },

    #[error("failed to start {program}: {source}")]
    SubprocessLaunch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to create backup file {}: {source}", .path.display())]
    FileCreation {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{program} {}: {}", describe_exit(.code), .stderr.trim())]
    SubprocessExecution {
        program: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("local port {port} is already in use")]
    PortInUse { port: u16 },

    #[error("tunnel {} before it accepted connections", describe_exit(.code))]
    TunnelExited { code: Option<i32> },

    #[error("timed out after {after:?} waiting for {step}")]
    Timeout { step: &'static str, after: Duration },

    #[error(transparent)]
    Pattern(#[from] regex::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with status {}", code),
        None => "was terminated by a signal".to_string(),
    }
}

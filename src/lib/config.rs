use crate::error::{Error, Result};
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 31415;
pub const DEFAULT_SCALINGO_CLI: &str = "scalingo";
pub const DEFAULT_TUNNEL_TIMEOUT: Duration = Duration::from_secs(30);

/// The database engines a Scalingo addon can expose through `db-tunnel`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Database {
    Postgres,
    MySQL,
}

impl Database {
    pub fn new(s: &str) -> Result<Database> {
        match s {
            "pg" | "postgres" | "postgresql" => Ok(Database::Postgres),
            "mysql" => Ok(Database::MySQL),
            _ => Err(Error::UnknownDatabase(s.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Database::Postgres => "postgres",
            Database::MySQL => "mysql",
        }
    }
}

/// Everything a single dump run needs before credentials are known.
#[derive(Debug, Clone)]
pub struct DumpOptions {
    pub app: String,
    pub port: u16,
    pub file: Option<PathBuf>,
    pub scalingo_cli: String,
    pub tunnel_timeout: Duration,
    pub dump_timeout: Option<Duration>,
}

impl DumpOptions {
    pub fn new(app: impl Into<String>) -> DumpOptions {
        DumpOptions {
            app: app.into(),
            port: DEFAULT_PORT,
            file: None,
            scalingo_cli: DEFAULT_SCALINGO_CLI.to_string(),
            tunnel_timeout: DEFAULT_TUNNEL_TIMEOUT,
            dump_timeout: None,
        }
    }
}

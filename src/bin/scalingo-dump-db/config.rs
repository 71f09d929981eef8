use anyhow::{bail, Result};
use scalingo_dump_db::{DEFAULT_SCALINGO_CLI, DEFAULT_TUNNEL_TIMEOUT};
use std::env;

pub fn scalingo_cli() -> String {
    if let Ok(v) = env::var("SCALINGO_CLI") {
        if !v.is_empty() {
            return v;
        }
    }

    DEFAULT_SCALINGO_CLI.to_string()
}

pub fn tunnel_timeout() -> Result<u64> {
    match seconds_from_env("SCALINGO_DUMP_TUNNEL_TIMEOUT")? {
        Some(v) => Ok(v),
        None => Ok(DEFAULT_TUNNEL_TIMEOUT.as_secs()),
    }
}

pub fn dump_timeout() -> Result<Option<u64>> {
    seconds_from_env("SCALINGO_DUMP_TIMEOUT")
}

fn seconds_from_env(key: &str) -> Result<Option<u64>> {
    if let Ok(v) = env::var(key) {
        if !v.is_empty() {
            match v.parse::<u64>() {
                Ok(v) => return Ok(Some(v)),
                Err(..) => bail!("{} must be a number of seconds, got {:?}", key, v),
            }
        }
    }

    Ok(None)
}

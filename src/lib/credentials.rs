use crate::config::DumpOptions;
use crate::engines::Engine;
use crate::error::{Error, Result};
use crate::process::{CommandSpec, Runner};
use log::debug;
use regex::Regex;
use std::fmt;

/// Database login recovered from the application's connection URL.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub user: String,
    pub password: String,
    pub database: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .finish()
    }
}

pub fn env_command(options: &DumpOptions) -> CommandSpec {
    CommandSpec::new(options.scalingo_cli.as_str())
        .arg("-a")
        .arg(options.app.as_str())
        .arg("env")
}

/// Lines of an environment export that start with `variable`.
pub fn matching_lines<'a>(output: &'a str, variable: &'a str) -> impl Iterator<Item = &'a str> {
    output.lines().filter(move |line| line.starts_with(variable))
}

/// Extracts user, password and database from the first `variable` line holding a
/// `=<scheme>://user:password@host/database[?query]` URL.
pub fn parse(output: &str, variable: &str, scheme: &str) -> Result<Credentials> {
    let re = Regex::new(&format!(
        r"={}://([^:]+):([^@]+)@[^/]+/([^?]+)(?:\?|$)",
        regex::escape(scheme)
    ))?;

    for line in matching_lines(output, variable) {
        if let Some(captures) = re.captures(line.trim_end()) {
            return Ok(Credentials {
                user: captures[1].to_string(),
                password: captures[2].to_string(),
                database: captures[3].to_string(),
            });
        }
    }

    Err(Error::CredentialParse {
        variable: variable.to_string(),
        scheme: scheme.to_string(),
    })
}

pub async fn fetch(
    runner: &dyn Runner,
    options: &DumpOptions,
    engine: &dyn Engine,
) -> Result<Credentials> {
    let command = env_command(options);
    debug!("Environment command: {}", command);

    let output = runner.capture(&command).await?;
    let credentials = parse(&output, engine.env_variable(), engine.url_scheme())?;
    debug!("Resolved {:?}", credentials);

    Ok(credentials)
}

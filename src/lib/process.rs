use crate::error::{Error, Result};
use crate::tunnel::{ScalingoTunnel, Tunnel};
use std::fmt;
use std::fs::File;
use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;
use tokio::process::Command;

/// A fully resolved subprocess invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub envs: Vec<(String, String)>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> CommandSpec {
        CommandSpec {
            program: program.into(),
            args: vec![],
            envs: vec![],
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> CommandSpec {
        self.args.push(arg.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> CommandSpec {
        self.envs.push((key.into(), value.into()));
        self
    }

    // Extra variables are layered on top of the inherited environment
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command.envs(self.envs.iter().map(|(k, v)| (k, v)));
        command
    }

    fn launch_error(&self, source: std::io::Error) -> Error {
        Error::SubprocessLaunch {
            program: self.program.clone(),
            source,
        }
    }
}

// Printed in diagnostics, so secrets never leave the process
impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, _) in &self.envs {
            write!(f, "{}=*** ", key)?;
        }
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.starts_with("--password=") {
                write!(f, " --password=***")?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

// Runner is the boundary between the dump sequence and the operating system
pub trait Runner {
    // fail when the program can't be found in PATH
    fn locate(&self, program: &str) -> Result<()>;

    // run to completion and return stdout
    fn capture<'a>(
        &'a self,
        command: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + 'a>>;

    // start a tunnel listening on the given local port
    fn spawn_tunnel(&self, command: &CommandSpec, port: u16) -> Result<Box<dyn Tunnel>>;

    // run to completion with stdout redirected into output
    fn run_to_file<'a>(
        &'a self,
        command: &'a CommandSpec,
        output: File,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + 'a>>;
}

/// Runs real subprocesses with tokio.
pub struct ProcessRunner;

impl Runner for ProcessRunner {
    fn locate(&self, program: &str) -> Result<()> {
        if which::which(program).is_err() {
            return Err(Error::MissingBinary {
                program: program.to_string(),
            });
        }

        Ok(())
    }

    fn capture<'a>(
        &'a self,
        command: &'a CommandSpec,
    ) -> Pin<Box<dyn Future<Output = Result<String>> + 'a>> {
        let fut = async move {
            let output = command
                .to_command()
                .stdin(Stdio::null())
                .output()
                .await
                .map_err(|e| command.launch_error(e))?;

            if !output.status.success() {
                return Err(Error::SubprocessExecution {
                    program: command.program.clone(),
                    code: output.status.code(),
                    stderr: String::from_utf8_lossy(&output.stderr).to_string(),
                });
            }

            Ok(String::from_utf8_lossy(&output.stdout).to_string())
        };

        Box::pin(fut)
    }

    fn spawn_tunnel(&self, command: &CommandSpec, port: u16) -> Result<Box<dyn Tunnel>> {
        let tunnel = ScalingoTunnel::spawn(command, port)?;
        Ok(Box::new(tunnel))
    }

    fn run_to_file<'a>(
        &'a self,
        command: &'a CommandSpec,
        output: File,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + 'a>> {
        let fut = async move {
            let child = command
                .to_command()
                .stdin(Stdio::null())
                .stdout(Stdio::from(output))
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn()
                .map_err(|e| command.launch_error(e))?;

            let res = child.wait_with_output().await?;
            if !res.status.success() {
                return Err(Error::SubprocessExecution {
                    program: command.program.clone(),
                    code: res.status.code(),
                    stderr: String::from_utf8_lossy(&res.stderr).to_string(),
                });
            }

            Ok(())
        };

        Box::pin(fut)
    }
}

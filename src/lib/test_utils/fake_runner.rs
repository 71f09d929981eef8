use crate::error::{Error, Result};
use crate::process::{CommandSpec, Runner};
use crate::tunnel::Tunnel;
use std::cell::RefCell;
use std::fs::File;
use std::future::Future;
use std::io::Write;
use std::pin::Pin;
use std::rc::Rc;
use std::time::Duration;

/// Everything the dump sequence asked the operating system to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Locate(String),
    Capture(CommandSpec),
    SpawnTunnel(CommandSpec, u16),
    TunnelReady,
    TunnelClosed,
    RunToFile(CommandSpec),
}

/// Runner that records commands instead of executing them.
pub struct FakeRunner {
    pub env_output: String,
    pub missing: Vec<String>,
    pub tunnel_never_ready: bool,
    pub dump_exit_code: Option<i32>,
    pub dump_delay: Option<Duration>,
    pub close_error: bool,
    calls: Rc<RefCell<Vec<Call>>>,
}

impl FakeRunner {
    pub fn new(env_output: &str) -> FakeRunner {
        FakeRunner {
            env_output: env_output.to_string(),
            missing: vec![],
            tunnel_never_ready: false,
            dump_exit_code: None,
            dump_delay: None,
            close_error: false,
            calls: Rc::new(RefCell::new(vec![])),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn dump_command(&self) -> Option<CommandSpec> {
        self.calls.borrow().iter().find_map(|call| match call {
            Call::RunToFile(command) => Some(command.clone()),
            _ => None,
        })
    }

    fn record(&self, call: Call) {
        self.calls.borrow_mut().push(call);
    }
}

impl Runner for FakeRunner {
    fn locate(&self, program: &str) -> Result<()> {
        self.record(Call::Locate(program.to_string()));

        if self.missing.iter().any(|m| m == program) {
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
            self.record(Call::Capture(command.clone()));
            Ok(self.env_output.clone())
        };

        Box::pin(fut)
    }

    fn spawn_tunnel(&self, command: &CommandSpec, port: u16) -> Result<Box<dyn Tunnel>> {
        self.record(Call::SpawnTunnel(command.clone(), port));

        Ok(Box::new(FakeTunnel {
            never_ready: self.tunnel_never_ready,
            close_error: self.close_error,
            calls: Rc::clone(&self.calls),
        }))
    }

    fn run_to_file<'a>(
        &'a self,
        command: &'a CommandSpec,
        mut output: File,
    ) -> Pin<Box<dyn Future<Output = Result<()>> + 'a>> {
        let fut = async move {
            self.record(Call::RunToFile(command.clone()));

            if let Some(delay) = self.dump_delay {
                tokio::time::sleep(delay).await;
            }

            output.write_all(b"-- fake dump\n")?;

            if let Some(code) = self.dump_exit_code {
                return Err(Error::SubprocessExecution {
                    program: command.program.clone(),
                    code: Some(code),
                    stderr: "fake dump failure".to_string(),
                });
            }

            Ok(())
        };

        Box::pin(fut)
    }
}

struct FakeTunnel {
    never_ready: bool,
    close_error: bool,
    calls: Rc<RefCell<Vec<Call>>>,
}

impl Tunnel for FakeTunnel {
    fn ready(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + '_>> {
        let fut = async move {
            if self.never_ready {
                std::future::pending::<()>().await;
            }

            self.calls.borrow_mut().push(Call::TunnelReady);
            Ok(())
        };

        Box::pin(fut)
    }

    fn close(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + '_>> {
        let fut = async move {
            self.calls.borrow_mut().push(Call::TunnelClosed);

            if self.close_error {
                return Err(Error::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "fake tunnel refused to stop",
                )));
            }

            Ok(())
        };

        Box::pin(fut)
    }
}

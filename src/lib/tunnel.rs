use crate::config::DumpOptions;
use crate::error::{Error, Result};
use crate::process::CommandSpec;
use log::{debug, info};
use std::future::Future;
use std::io::ErrorKind;
use std::net::TcpListener;
use std::pin::Pin;
use std::process::Stdio;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::process::Child;

pub const LOCALHOST: &str = "127.0.0.1";

const POLL_INTERVAL: Duration = Duration::from_millis(250);

// Tunnel is an owned handle to a running db-tunnel
pub trait Tunnel {
    // resolves once the local end accepts connections
    fn ready(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + '_>>;

    // stop the tunnel and reap it
    fn close(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + '_>>;
}

pub fn command(options: &DumpOptions, env_variable: &str) -> CommandSpec {
    CommandSpec::new(options.scalingo_cli.as_str())
        .arg("db-tunnel")
        .arg("-a")
        .arg(options.app.as_str())
        .arg("-p")
        .arg(options.port.to_string())
        .arg(env_variable)
}

pub struct ScalingoTunnel {
    child: Child,
    port: u16,
}

impl ScalingoTunnel {
    pub fn spawn(command: &CommandSpec, port: u16) -> Result<ScalingoTunnel> {
        ensure_port_free(port)?;

        // stdin stays attached in case the CLI asks for an SSH key passphrase
        let child = command
            .to_command()
            .stdout(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| Error::SubprocessLaunch {
                program: command.program.clone(),
                source,
            })?;

        debug!("Tunnel started with pid {:?}", child.id());

        Ok(ScalingoTunnel { child, port })
    }
}

impl Tunnel for ScalingoTunnel {
    fn ready(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + '_>> {
        let fut = async move {
            loop {
                if let Some(status) = self.child.try_wait()? {
                    return Err(Error::TunnelExited {
                        code: status.code(),
                    });
                }

                match TcpStream::connect((LOCALHOST, self.port)).await {
                    Ok(_) => {
                        info!("Tunnel is ready on {}:{}", LOCALHOST, self.port);
                        return Ok(());
                    }
                    Err(_) => {
                        tokio::time::sleep(POLL_INTERVAL).await;
                        continue;
                    }
                }
            }
        };

        Box::pin(fut)
    }

    fn close(&mut self) -> Pin<Box<dyn Future<Output = Result<()>> + '_>> {
        let fut = async move {
            if self.child.try_wait()?.is_none() {
                self.child.kill().await?;
                debug!("Tunnel on port {} stopped", self.port);
            }

            Ok(())
        };

        Box::pin(fut)
    }
}

// A listener already on the port would answer the readiness probe in place of the tunnel
fn ensure_port_free(port: u16) -> Result<()> {
    match TcpListener::bind((LOCALHOST, port)) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AddrInUse => Err(Error::PortInUse { port }),
        Err(e) => Err(Error::Io(e)),
    }
}

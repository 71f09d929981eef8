use crate::config::{Database, DumpOptions};
use crate::engines::{self, Engine};
use crate::error::{Error, Result};
use crate::process::Runner;
use crate::tunnel::{self, Tunnel};
use crate::{credentials, utils};
use chrono::Local;
use log::{debug, info, warn};
use std::future::Future;
use std::path::PathBuf;
use std::time::Duration;

pub async fn dump(database: Database, options: &DumpOptions, runner: &dyn Runner) -> Result<PathBuf> {
    let engine = engines::new(database);

    runner.locate(&options.scalingo_cli)?;
    runner.locate(engine.dump_program())?;

    let tunnel_command = tunnel::command(options, engine.env_variable());
    debug!("Tunnel command: {}", tunnel_command);

    let mut tunnel = runner.spawn_tunnel(&tunnel_command, options.port)?;
    info!(
        "Opening tunnel to {} of {} on port {}",
        engine.env_variable(),
        options.app,
        options.port
    );

    let result = dump_through_tunnel(engine.as_ref(), options, runner, tunnel.as_mut()).await;

    if let Err(err) = tunnel.close().await {
        warn!("Failed to stop the tunnel: {}", err);
    }

    result
}

async fn dump_through_tunnel(
    engine: &dyn Engine,
    options: &DumpOptions,
    runner: &dyn Runner,
    tunnel: &mut dyn Tunnel,
) -> Result<PathBuf> {
    with_timeout("the tunnel", options.tunnel_timeout, tunnel.ready()).await?;

    let credentials = credentials::fetch(runner, options, engine).await?;

    let path = match &options.file {
        Some(file) => file.clone(),
        None => PathBuf::from(utils::default_file_name(
            &options.app,
            engine.url_scheme(),
            &Local::now(),
        )),
    };
    let file = utils::create_backup_file(&path)?;

    let command = engine.dump_command(options.port, &credentials);
    debug!("Dump command: {}", command);
    info!(
        "Dumping database {} into {}",
        credentials.database,
        path.display()
    );

    match options.dump_timeout {
        Some(after) => with_timeout("the dump", after, runner.run_to_file(&command, file)).await?,
        None => runner.run_to_file(&command, file).await?,
    }

    Ok(path)
}

async fn with_timeout<T>(
    step: &'static str,
    after: Duration,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(after, fut).await {
        Ok(result) => result,
        Err(_) => Err(Error::Timeout { step, after }),
    }
}

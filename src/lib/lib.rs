mod config;
mod credentials;
mod dump;
mod engines;
mod error;
mod process;
mod tunnel;
mod utils;

#[cfg(test)]
mod test_utils;

use std::path::PathBuf;

pub use config::{Database, DumpOptions, DEFAULT_PORT, DEFAULT_SCALINGO_CLI, DEFAULT_TUNNEL_TIMEOUT};
pub use credentials::Credentials;
pub use error::{Error, Result};
pub use utils::{default_file_name, parse_default_file_name};

/// Opens a tunnel to the application's database, dumps it with the engine's
/// native tool and returns the path of the backup file.
pub async fn dump_database(database: Database, options: &DumpOptions) -> Result<PathBuf> {
    dump::dump(database, options, &process::ProcessRunner).await
}

/// Dumps the application's PostgreSQL addon (`SCALINGO_POSTGRESQL_URL`) with `pg_dump`.
pub async fn dump_postgres(options: &DumpOptions) -> Result<PathBuf> {
    dump_database(Database::Postgres, options).await
}

/// Dumps the application's MySQL addon (`SCALINGO_MYSQL_URL`) with `mysqldump`.
pub async fn dump_mysql(options: &DumpOptions) -> Result<PathBuf> {
    dump_database(Database::MySQL, options).await
}

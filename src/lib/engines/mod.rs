use crate::config::Database;
use crate::credentials::Credentials;
use crate::process::CommandSpec;

pub mod mysql;
pub mod postgres;

// Engine is implemented once per database the platform can tunnel to
pub trait Engine {
    // variable holding the connection URL in the app environment
    fn env_variable(&self) -> &'static str;

    // scheme of that URL, also used as the label of generated backup names
    fn url_scheme(&self) -> &'static str;

    // native dump tool
    fn dump_program(&self) -> &'static str;

    // dump command against the local end of the tunnel
    fn dump_command(&self, port: u16, credentials: &Credentials) -> CommandSpec;
}

// Creates the engine for the selected database
pub fn new(database: Database) -> Box<dyn Engine> {
    match database {
        Database::Postgres => Box::new(postgres::PostgresEngine),
        Database::MySQL => Box::new(mysql::MySQLEngine),
    }
}

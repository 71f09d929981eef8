use crate::credentials::Credentials;
use crate::engines::Engine;
use crate::process::CommandSpec;
use crate::tunnel::LOCALHOST;

pub struct PostgresEngine;

impl Engine for PostgresEngine {
    fn env_variable(&self) -> &'static str {
        "SCALINGO_POSTGRESQL_URL"
    }

    fn url_scheme(&self) -> &'static str {
        "postgres"
    }

    fn dump_program(&self) -> &'static str {
        "pg_dump"
    }

    // The password goes through PGPASSWORD so it never shows up in process listings
    fn dump_command(&self, port: u16, credentials: &Credentials) -> CommandSpec {
        CommandSpec::new(self.dump_program())
            .arg("-h")
            .arg(LOCALHOST)
            .arg("-p")
            .arg(port.to_string())
            .arg("-U")
            .arg(credentials.user.as_str())
            .arg("-w")
            .arg(credentials.database.as_str())
            .env("PGPASSWORD", credentials.password.as_str())
    }
}

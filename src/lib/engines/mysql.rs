use crate::credentials::Credentials;
use crate::engines::Engine;
use crate::process::CommandSpec;
use crate::tunnel::LOCALHOST;

pub struct MySQLEngine;

impl Engine for MySQLEngine {
    fn env_variable(&self) -> &'static str {
        "SCALINGO_MYSQL_URL"
    }

    fn url_scheme(&self) -> &'static str {
        "mysql"
    }

    fn dump_program(&self) -> &'static str {
        "mysqldump"
    }

    // mysqldump has no password variable of its own, so it takes the flag
    fn dump_command(&self, port: u16, credentials: &Credentials) -> CommandSpec {
        CommandSpec::new(self.dump_program())
            .arg("-h")
            .arg(LOCALHOST)
            .arg("-P")
            .arg(port.to_string())
            .arg("-u")
            .arg(credentials.user.as_str())
            .arg(format!("--password={}", credentials.password))
            .arg(credentials.database.as_str())
    }
}

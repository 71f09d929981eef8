use clap::{crate_description, crate_version, value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{error, info};
use scalingo_dump_db::{Database, DumpOptions, DEFAULT_PORT};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::path::PathBuf;
use std::time::Duration;

mod config;

fn cli() -> Command {
    Command::new("scalingo-dump-db")
        .about(crate_description!())
        .version(format!("v{}", crate_version!()))
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("app")
                .short('a')
                .long("app")
                .help("The Scalingo application owning the database")
                .required(true)
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("port")
                .short('p')
                .long("port")
                .help("Local port of the tunnel, also given to the dump tool")
                .default_value(DEFAULT_PORT.to_string())
                .value_parser(value_parser!(u16).range(1..))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("file")
                .short('f')
                .long("file")
                .help("Backup file, defaults to <app>_<engine>_<timestamp>.bak")
                .value_parser(value_parser!(PathBuf))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("debug")
                .short('d')
                .long("debug")
                .help("Print the tunnel and dump commands")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("timeout")
                .short('t')
                .long("timeout")
                .help("Seconds to wait for the tunnel to accept connections")
                .value_parser(value_parser!(u64))
                .action(ArgAction::Set),
        )
        .arg(
            Arg::new("dump-timeout")
                .long("dump-timeout")
                .help("Seconds the dump is allowed to run")
                .value_parser(value_parser!(u64))
                .action(ArgAction::Set),
        )
        .subcommands([
            Command::new("pg")
                .visible_aliases(["postgres", "postgresql"])
                .about("Dump the PostgreSQL database"),
            Command::new("mysql").about("Dump the MySQL database"),
        ])
}

fn dump_options(matches: &ArgMatches) -> anyhow::Result<DumpOptions> {
    let app = matches
        .get_one::<String>("app")
        .ok_or_else(|| anyhow::anyhow!("missing --app"))?;

    let mut options = DumpOptions::new(app.as_str());
    options.port = matches.get_one::<u16>("port").copied().unwrap_or(DEFAULT_PORT);
    options.file = matches.get_one::<PathBuf>("file").cloned();
    options.scalingo_cli = config::scalingo_cli();

    let tunnel_timeout = match matches.get_one::<u64>("timeout") {
        Some(v) => *v,
        None => config::tunnel_timeout()?,
    };
    options.tunnel_timeout = Duration::from_secs(tunnel_timeout);

    let dump_timeout = match matches.get_one::<u64>("dump-timeout") {
        Some(v) => Some(*v),
        None => config::dump_timeout()?,
    };
    options.dump_timeout = dump_timeout.map(Duration::from_secs);

    Ok(options)
}

#[tokio::main]
async fn main() {
    let matches = cli().get_matches();

    let level = if matches.get_flag("debug") {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    if let Err(err) = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to initialize logger: {}", err);
        std::process::exit(1);
    }

    let database = match matches.subcommand_name().map(Database::new) {
        Some(Ok(database)) => database,
        _ => unreachable!(), // subcommand_required only lets pg and mysql through
    };

    let options = match dump_options(&matches) {
        Ok(options) => options,
        Err(err) => {
            error!("{:?}", err);
            std::process::exit(1);
        }
    };

    match scalingo_dump_db::dump_database(database, &options).await {
        Err(err) => {
            error!("{}", err);
            std::process::exit(1);
        }
        Ok(path) => info!("Backup written to {}", path.display()),
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_is_valid() {
        cli().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let matches = cli()
            .try_get_matches_from(["scalingo-dump-db", "-a", "myapp", "pg"])
            .unwrap();

        assert_eq!(matches.subcommand_name(), Some("pg"));
        assert_eq!(matches.get_one::<String>("app").unwrap(), "myapp");
        assert_eq!(*matches.get_one::<u16>("port").unwrap(), 31415);
        assert!(matches.get_one::<PathBuf>("file").is_none());
        assert!(!matches.get_flag("debug"));
    }

    #[test]
    fn test_postgres_aliases() {
        for alias in ["pg", "postgres", "postgresql"] {
            let matches = cli()
                .try_get_matches_from(["scalingo-dump-db", "--app", "myapp", alias])
                .unwrap();

            let database = Database::new(matches.subcommand_name().unwrap()).unwrap();
            assert_eq!(database, Database::Postgres);
        }
    }

    #[test]
    fn test_all_flags() {
        let matches = cli()
            .try_get_matches_from([
                "scalingo-dump-db",
                "-a",
                "myapp",
                "-p",
                "4000",
                "-f",
                "backup.sql",
                "-d",
                "-t",
                "5",
                "--dump-timeout",
                "600",
                "mysql",
            ])
            .unwrap();

        assert_eq!(matches.subcommand_name(), Some("mysql"));
        assert!(matches.get_flag("debug"));

        let options = dump_options(&matches).unwrap();
        assert_eq!(options.app, "myapp");
        assert_eq!(options.port, 4000);
        assert_eq!(options.file, Some(PathBuf::from("backup.sql")));
        assert_eq!(options.tunnel_timeout, Duration::from_secs(5));
        assert_eq!(options.dump_timeout, Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_app_is_required() {
        let result = cli().try_get_matches_from(["scalingo-dump-db", "pg"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_port() {
        for port in ["0", "70000", "not-a-port"] {
            let result =
                cli().try_get_matches_from(["scalingo-dump-db", "-a", "myapp", "-p", port, "pg"]);
            assert!(result.is_err(), "port {} should be rejected", port);
        }
    }

    #[test]
    fn test_unknown_engine() {
        let result = cli().try_get_matches_from(["scalingo-dump-db", "-a", "myapp", "redis"]);
        assert!(result.is_err());
    }
}

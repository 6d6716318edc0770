use clap::error::ErrorKind;
use clap::Parser;
use tracing::{debug, error};
use txn_recovery_tools::db::{
    CommandType, ConnectionSettings, DatabaseType, MarkerCommand, MarkerStore, TableName,
    DEFAULT_TABLE_NAME,
};
use txn_recovery_tools::logging::{self, LogLevel};
use txn_recovery_tools::output::{self, OutputFormat};

#[derive(Parser)]
#[command(name = "querydb")]
#[command(
    about = "Creates, stores and lists transaction recovery markers in a database",
    long_about = None
)]
struct Cli {
    #[arg(short = 'y', long = "type_db", value_enum, default_value = "postgresql", help = "Database type to work with")]
    type_db: DatabaseType,
    #[arg(short = 'o', long, default_value = "localhost", help = "Hostname where the database runs")]
    host: String,
    #[arg(short, long, help = "Port where the database runs [default: 5432 for postgresql, 3306 for mysql]")]
    port: Option<u16>,
    #[arg(short, long, help = "Database name to connect to at the host and port")]
    database: String,
    #[arg(short, long, help = "Username at the database")]
    user: String,
    #[arg(short = 's', long, help = "Password of the database user")]
    password: String,
    #[arg(short, long = "table_name", default_value = DEFAULT_TABLE_NAME, help = "Table name to be working with")]
    table_name: String,
    #[arg(short, long, value_enum, default_value = "select_recovery", help = "Command to run in the database")]
    command: CommandType,
    #[arg(short, long = "application_pod_name", help = "Application pod name to insert/delete or to filter by")]
    application_pod_name: Option<String>,
    #[arg(short, long = "recovery_pod_name", help = "Recovery pod name to insert/delete or to filter by")]
    recovery_pod_name: Option<String>,
    #[arg(short, long, value_enum, default_value = "list_space", help = "Output format")]
    format: OutputFormat,
    #[arg(short, long, value_enum, ignore_case = true, default_value = "critical", help = "Log level")]
    loglevel: LogLevel,
}

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp
            | ErrorKind::DisplayVersion
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => e.exit(),
            _ => {
                let _ = e.print();
                std::process::exit(1);
            }
        },
    };
    logging::init(cli.loglevel);

    let settings = ConnectionSettings {
        database_type: cli.type_db,
        host: cli.host,
        port: cli.port,
        database: cli.database,
        user: cli.user,
        password: cli.password,
    };
    debug!(
        "Database command {:?} is going to be executed against {:?}",
        cli.command, settings
    );

    let command = match MarkerCommand::from_args(
        cli.command,
        cli.application_pod_name,
        cli.recovery_pod_name,
    ) {
        Ok(command) => command,
        Err(e) => {
            error!("Command {:?} cannot be run: {}", cli.command, e);
            std::process::exit(1);
        }
    };

    let table = match TableName::parse(&cli.table_name) {
        Ok(table) => table,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let mut store = match MarkerStore::connect(&settings, table).await {
        Ok(store) => store,
        Err(e) => {
            logging::log_error_chain("Failed to open database connection", &e);
            std::process::exit(1);
        }
    };

    let result = match store.run(&command).await {
        Ok(result) => result,
        Err(e) => {
            logging::log_error_chain("Database command failed", &e);
            std::process::exit(1);
        }
    };

    if let Err(e) = store.close().await {
        logging::log_error_chain("Failed to close database connection", &e);
    }

    output::print(&result, cli.format);
}

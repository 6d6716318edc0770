use clap::error::ErrorKind;
use clap::Parser;
use dotenv::dotenv;
use tracing::{debug, error};
use txn_recovery_tools::environment::Environment;
use txn_recovery_tools::kube::KubeAgent;
use txn_recovery_tools::logging::{self, LogLevel};
use txn_recovery_tools::output::{self, OutputFormat};
use txn_recovery_tools::query::{QueryRequest, QueryType};

#[derive(Debug, Parser)]
#[command(name = "queryapi")]
#[command(
    about = "Queries the orchestration API, gathering the json and parsing it to get specific info from it",
    long_about = None
)]
struct Cli {
    #[arg(short, long, value_enum, default_value = "pods", help = "Query type/what to query")]
    query: QueryType,
    #[arg(short, long, value_enum, default_value = "raw", help = "Output format")]
    format: OutputFormat,
    #[arg(short, long, value_enum, ignore_case = true, default_value = "critical", help = "Log level")]
    loglevel: LogLevel,
    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        help = "Arguments of the query (each query type has different)"
    )]
    args: Vec<String>,
}

#[tokio::main]
async fn main() {
    dotenv().ok();

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

    debug!("Starting query of the API with args: {:?}", cli);

    let request = match QueryRequest::from_args(cli.query, &cli.args) {
        Ok(request) => request,
        Err(e) => {
            error!("{}", e);
            std::process::exit(1);
        }
    };

    let env = Environment::new();
    let kube_agent = match KubeAgent::from_environment(&env) {
        Ok(agent) => agent,
        Err(e) => {
            logging::log_error_chain("Failed to initialize API client", &e);
            std::process::exit(1);
        }
    };

    match request.run(kube_agent).await {
        Ok(result) => output::print(&result, cli.format),
        Err(e) => {
            logging::log_error_chain("Query failed", &e);
            std::process::exit(1);
        }
    }
}

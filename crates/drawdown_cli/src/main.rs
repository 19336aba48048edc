use std::io::Read as _;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use drawdown_core::{ScenarioRequest, run_scenario};

#[derive(Parser, Debug)]
#[command(name = "drawdown")]
#[command(about = "Retirement drawdown simulation engine")]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a scenario and print the response as JSON.
    Run {
        /// Path to a JSON scenario request, or `-` to read from stdin.
        #[arg(short, long)]
        scenario: PathBuf,
    },
    /// Print the health check and exit.
    Health,
}

fn init_logging(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn read_request(path: &PathBuf) -> color_eyre::Result<ScenarioRequest> {
    let raw = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&raw)?)
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match cli.command {
        Command::Health => {
            let status = drawdown_core::health();
            println!("{}", serde_json::to_string(&status)?);
        }
        Command::Run { scenario } => {
            let request = read_request(&scenario)?;
            let response = run_scenario(request);
            let failed = response.status == drawdown_core::RunStatus::Failed;
            println!("{}", serde_json::to_string(&response)?);
            if failed {
                let message = response.error_message.unwrap_or_default();
                tracing::error!("{message}");
                return Err(color_eyre::eyre::eyre!("{message}"));
            }
        }
    }

    Ok(())
}

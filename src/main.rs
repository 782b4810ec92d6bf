use clap::{Parser, Subcommand};
use hub_workflow::app::{App, Invocation};
use hub_workflow::catalog::operations;
use hub_workflow::errors::HubError;
use std::path::PathBuf;
use tokio::io::AsyncReadExt;

/// Runs hub operations described by a JSON invocation document.
#[derive(Parser, Debug)]
#[command(name = "hub-workflow")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Execute the items of an invocation document and print the outputs
    Run {
        /// Invocation file; read from stdin when omitted
        #[arg(long, short = 'i', value_name = "FILE")]
        input: Option<PathBuf>,
    },
    /// List every resource/operation pair the hub understands
    Operations,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Command::Run { input } => run(input).await,
        Command::Operations => {
            for op in operations() {
                println!("{:<28} {:<7} {}", op.key(), op.method.as_str(), op.path);
            }
            Ok(())
        }
    };
    if let Err(err) = result {
        let rendered = serde_json::to_string(&err).unwrap_or_else(|_| err.to_string());
        eprintln!("hub-workflow: {}", rendered);
        std::process::exit(1);
    }
}

async fn run(input: Option<PathBuf>) -> Result<(), HubError> {
    let raw = match input {
        Some(path) => tokio::fs::read_to_string(&path).await.map_err(|err| {
            HubError::invalid_parameter(format!("Cannot read {}: {}", path.display(), err))
        })?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .map_err(|err| HubError::invalid_parameter(format!("Cannot read stdin: {}", err)))?;
            buffer
        }
    };
    let invocation: Invocation = serde_json::from_str(&raw)
        .map_err(|err| HubError::invalid_parameter(format!("Invalid invocation document: {}", err)))?;
    let outputs = App::run(invocation).await?;
    let rendered = serde_json::to_string_pretty(&outputs)
        .map_err(|err| HubError::api_error(err.to_string()))?;
    println!("{}", rendered);
    Ok(())
}

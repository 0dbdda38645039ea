use clap::Parser;
use contratos_client::utils::error::{ClientError, ErrorSeverity};
use contratos_client::utils::logger;
use contratos_client::{CliConfig, Command, ContractApi, RemoteContractClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting contratos CLI");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    match execute(&cli).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ Request failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };
            std::process::exit(exit_code);
        }
    }
}

async fn execute(cli: &CliConfig) -> Result<serde_json::Value, ClientError> {
    let config = cli.client_config()?;
    let client = RemoteContractClient::new(&config)?;
    tracing::debug!("Using backend at {}", client.base_url());
    run(&client, &cli.command).await
}

async fn run<A: ContractApi>(
    api: &A,
    command: &Command,
) -> Result<serde_json::Value, ClientError> {
    let value = match command {
        Command::List { skip, limit } => to_json(api.list_contracts(*skip, *limit).await?)?,
        Command::Search { query, limit } => to_json(api.search_contracts(query, *limit).await?)?,
        Command::Files => to_json(api.list_files().await?)?,
        Command::Ask {
            question,
            max_results,
        } => to_json(api.ask_question(question, *max_results).await?)?,
    };
    Ok(value)
}

fn to_json<T: serde::Serialize>(value: T) -> Result<serde_json::Value, ClientError> {
    serde_json::to_value(value).map_err(|e| ClientError::MalformedResponse {
        message: e.to_string(),
    })
}

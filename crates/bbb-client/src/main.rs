//! bbb-client
//!
//! Command-line access to the BigBlueButton control API. Connection settings
//! come from the environment (`BBB_API_URL`, `BBB_SECRET`,
//! `BBB_HASH_ALGORITHM`, `BBB_HTTP_TIMEOUT_SECONDS`).

use bbb_client::observability::{init_tracing, LogFormat};
use bbb_client::{ApiClient, ConnectionConfig, Session};
use clap::{Parser, Subcommand};
use std::collections::HashMap;
use std::env;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(name = "bbb-client", version, about = "BigBlueButton control API client")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a meeting and print the response as JSON.
    Create {
        /// Meeting ID (a random UUID when omitted).
        #[arg(long)]
        meeting_id: Option<String>,
        /// Meeting display name.
        #[arg(long)]
        name: String,
        #[arg(long)]
        moderator_password: String,
        #[arg(long)]
        attendee_password: String,
    },
    /// Join a meeting and print the join URL.
    Join {
        #[arg(long)]
        meeting_id: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        password: String,
    },
    /// End a meeting.
    End {
        #[arg(long)]
        meeting_id: String,
        #[arg(long)]
        password: String,
    },
    /// Print the signed URL for an action without sending it.
    Sign {
        /// API action name, e.g. `getMeetings`.
        action: String,
        /// Query parameters as KEY=VALUE, in order.
        #[arg(value_parser = parse_param)]
        params: Vec<(String, String)>,
    },
}

fn parse_param(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))
}

#[tokio::main]
async fn main() -> ExitCode {
    let vars: HashMap<String, String> = env::vars().collect();
    init_tracing(LogFormat::from_vars(&vars));

    let cli = Cli::parse();

    match run(cli.command, &vars).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Command failed");
            ExitCode::FAILURE
        }
    }
}

async fn run(
    command: Command,
    vars: &HashMap<String, String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConnectionConfig::from_vars(vars)?;

    info!(
        base_url = %config.base_url(),
        hash_algorithm = %config.hash_algorithm(),
        "Configuration loaded"
    );

    let api = ApiClient::new(config)?;

    match command {
        Command::Create {
            meeting_id,
            name,
            moderator_password,
            attendee_password,
        } => {
            let meeting_id = meeting_id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
            let document = api
                .create(&meeting_id, &name, &moderator_password, &attendee_password)
                .await?;
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        Command::Join {
            meeting_id,
            full_name,
            password,
        } => {
            let mut session = Session::new(api);
            let url = session.join(&meeting_id, &full_name, &password).await?;
            println!("{url}");
        }
        Command::End {
            meeting_id,
            password,
        } => {
            Session::new(api).end(&meeting_id, &password).await?;
            info!(meeting_id = %meeting_id, "Meeting ended");
        }
        Command::Sign { action, params } => {
            let params: Vec<(&str, &str)> = params
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str()))
                .collect();
            println!("{}", api.build_url(&action, &params));
        }
    }

    Ok(())
}

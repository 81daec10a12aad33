use clap::{Parser, Subcommand};
use std::io::Write;
use std::sync::Arc;

use cartera::app_state::AppState;
use cartera::commands;
use cartera::logging;
use cartera::repl::readline;
use cartera_core::context::AppConfigExt;
use cartera_types::AppConfig;
use tokio::sync::RwLock;

#[tokio::main]
async fn main() -> Result<(), String> {
    let _log_guard = logging::init();

    let config = AppConfig::load();
    let state = AppState::new(config).map_err(|e| e.to_string())?;
    let state = Arc::new(RwLock::new(state));
    tracing::info!(base_url = %state.read().await.client.base_url(), "cartera ready");

    while let Some(line) = readline()? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, Arc::clone(&state)).await {
            Ok(quit) => {
                if quit {
                    break;
                }
            }
            Err(err) => {
                writeln!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }

    Ok(())
}

#[derive(Parser)]
#[command(version, about = "portfolio analytics dashboard client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Change the filter selection
    Filter {
        #[command(subcommand)]
        action: FilterAction,
    },
    /// Show the current filter selection
    Show,
    /// Print the selection signature
    Signature,
    /// Print the query string, or the full URL for an endpoint
    Query { endpoint: Option<String> },
    /// Fetch one endpoint (summary, trend, performance, moroso-trend, anuales)
    Fetch {
        endpoint: String,
        /// Normalize the body and draw it as a chart
        #[arg(short, long)]
        chart: bool,
    },
    /// Fetch summary and trend if the filters changed
    Refresh {
        #[arg(short, long)]
        force: bool,
    },
    /// Fetch and chart the moroso movement trend
    Trend,
    /// List rendered charts
    Charts,
    /// Show or change the configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigAction>,
    },
    /// Set or clear the debug query parameter
    SetDebug { value: Option<String> },
    Exit,
}

#[derive(Subcommand)]
enum FilterAction {
    Add {
        group: String,
        #[arg(required = true)]
        values: Vec<String>,
    },
    Remove {
        group: String,
        #[arg(required = true)]
        values: Vec<String>,
    },
    Toggle {
        group: String,
        value: String,
    },
    /// Clear one group, or every group when omitted
    Clear { group: Option<String> },
}

#[derive(Subcommand)]
enum ConfigAction {
    Set { key: String, value: String },
}

async fn respond(line: &str, state: Arc<RwLock<AppState>>) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "cartera".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match cli.command {
        Some(Commands::Filter { action }) => match action {
            FilterAction::Add { group, values } => {
                commands::filter_add(&group, &values, state).await?
            }
            FilterAction::Remove { group, values } => {
                commands::filter_remove(&group, &values, state).await?
            }
            FilterAction::Toggle { group, value } => {
                commands::filter_toggle(&group, &value, state).await?
            }
            FilterAction::Clear { group } => commands::filter_clear(group.as_deref(), state).await?,
        },
        Some(Commands::Show) => commands::show(state).await,
        Some(Commands::Signature) => commands::print_signature(state).await,
        Some(Commands::Query { endpoint }) => {
            commands::print_query(endpoint.as_deref(), state).await?
        }
        Some(Commands::Fetch { endpoint, chart }) => {
            commands::fetch(&endpoint, chart, state).await?
        }
        Some(Commands::Refresh { force }) => commands::refresh(force, state).await?,
        Some(Commands::Trend) => commands::movement_trend(state).await?,
        Some(Commands::Charts) => commands::list_charts(state).await,
        Some(Commands::Config { action }) => match action {
            Some(ConfigAction::Set { key, value }) => {
                commands::set_config(&key, &value, state).await?
            }
            None => commands::show_config(state).await,
        },
        Some(Commands::SetDebug { value }) => commands::set_debug(value, state).await,
        Some(Commands::Exit) => {
            commands::exit(state).await?;
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}

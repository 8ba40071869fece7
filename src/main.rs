mod commands;
mod replies;
mod resolver;
mod state;

use crate::commands::Command;
use crate::resolver::{LeagueRegistry, TeamResolver};
use crate::state::app_settings::AppSettings;
use crate::state::messages::{InputEvent, NetworkRequest, NetworkResponse};
use crate::state::network::{NetworkWorker, local_reply};
use anyhow::anyhow;
use football_api::client::FootballApi;
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if handle_cli_args() {
        return Ok(());
    }

    // A missing .env is normal; real environment variables still apply.
    dotenvy::dotenv().ok();
    better_panic::install();

    let settings = AppSettings::load();
    init_logging(&settings.log_filter)?;

    if settings.api_key.is_none() {
        warn!("FOOTBALL_DATA_API_KEY is not set; lookups will fail until it is");
    }

    let api = FootballApi::new(settings.api_key.clone())
        .with_base_url(settings.api_url.as_str())
        .with_timeout(settings.request_timeout);
    debug!("request timeout {:?}", api.timeout());
    let resolver = Arc::new(
        TeamResolver::new(api, LeagueRegistry::default())
            .with_detail_concurrency(settings.detail_concurrency),
    );

    let (input_tx, input_rx) = mpsc::channel::<InputEvent>(100);
    let (network_req_tx, network_req_rx) = mpsc::channel::<NetworkRequest>(100);
    let (network_resp_tx, network_resp_rx) = mpsc::channel::<NetworkResponse>(100);

    // Input thread
    let input_handler = tokio::spawn(input_handler_task(input_tx));

    // Network thread
    let network_worker = NetworkWorker::new(resolver.clone(), network_req_rx, network_resp_tx);
    let network_task = tokio::spawn(network_worker.run());

    info!("footbot {} ready (api: {})", env!("CARGO_PKG_VERSION"), settings.api_url);
    println!("{}", commands::MENU);

    chat_loop(resolver.leagues(), input_rx, network_req_tx, network_resp_rx).await;

    input_handler.abort();
    network_task.abort();

    Ok(())
}

fn handle_cli_args() -> bool {
    let mut args = std::env::args().skip(1);
    let Some(arg) = args.next() else {
        return false;
    };

    match arg.as_str() {
        "-h" | "--help" => {
            println!("{}", usage_text());
            true
        }
        "-V" | "--version" => {
            println!("footbot {}", env!("CARGO_PKG_VERSION"));
            true
        }
        _ => {
            eprintln!("Unknown argument: {arg}\n\n{}", usage_text());
            std::process::exit(2);
        }
    }
}

fn usage_text() -> &'static str {
    "footbot - football chat bot backed by football-data.org

Usage:
  footbot
  footbot --help
  footbot --version

Type commands such as /leagues or /form arsenal premier league on stdin.

Environment (also read from ./.env):
  FOOTBALL_DATA_API_KEY  football-data.org API token (required for lookups)
  FOOTBOT_API_URL        API base URL (default https://api.football-data.org/v4)
  FOOTBOT_TIMEOUT_SECS   Per-request timeout in seconds (default 10)
  FOOTBOT_CONCURRENCY    Parallel team-detail requests for /stadium (default 4)
  RUST_LOG               Log filter (default info)"
}

/// Logs go to stderr so they never interleave with replies on stdout.
fn init_logging(filter: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to initialise logging: {e}"))
}

async fn chat_loop(
    leagues: &LeagueRegistry,
    mut input_events: mpsc::Receiver<InputEvent>,
    network_requests: mpsc::Sender<NetworkRequest>,
    mut network_responses: mpsc::Receiver<NetworkResponse>,
) {
    let mut next_id: u64 = 0;
    let mut pending: usize = 0;
    let mut input_open = true;

    loop {
        tokio::select! {
            Some(event) = input_events.recv(), if input_open => {
                let line = match event {
                    InputEvent::Line(line) => line,
                    InputEvent::Closed => {
                        // Piped input: answer what was asked before exiting.
                        input_open = false;
                        if pending == 0 {
                            break;
                        }
                        continue;
                    }
                };
                if line.trim().is_empty() {
                    continue;
                }

                match commands::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) if command.is_local() => {
                        if let Some(text) = local_reply(&command, leagues) {
                            println!("{text}");
                        }
                    }
                    Ok(command) => {
                        next_id += 1;
                        let request = NetworkRequest { id: next_id, command };
                        if network_requests.send(request).await.is_err() {
                            error!("network worker is gone; shutting down");
                            break;
                        }
                        pending += 1;
                    }
                    Err(e) => println!("{e}"),
                }
            }

            Some(response) = network_responses.recv() => {
                match response {
                    NetworkResponse::Reply { id, text } => {
                        debug!("reply {id}");
                        println!("{text}");
                    }
                    NetworkResponse::Error { id, message } => {
                        debug!("error reply {id}");
                        println!("{message}");
                    }
                }
                pending = pending.saturating_sub(1);
                if !input_open && pending == 0 {
                    break;
                }
            }

            else => break,
        }
    }
}

async fn input_handler_task(input_events: mpsc::Sender<InputEvent>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let event = match lines.next_line().await {
            Ok(Some(line)) => InputEvent::Line(line),
            Ok(None) => InputEvent::Closed,
            Err(e) => {
                error!("Failed to read stdin: {e}");
                InputEvent::Closed
            }
        };
        let closed = matches!(event, InputEvent::Closed);
        if input_events.send(event).await.is_err() || closed {
            break;
        }
    }
}

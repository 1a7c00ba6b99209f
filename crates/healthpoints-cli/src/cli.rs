//! Argument parsing and command dispatch.

use clap::{Parser, Subcommand};
use url::Url;

use crate::client::{AppContext, CliResult, parse_url, timestamp_now_ms};
use crate::commands::{blood_pressure, points, preferences, users, weight};
use crate::output::OutputFormat;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Parses CLI arguments, executes the requested command, and reports the
/// outcome. Returns the process exit code.
pub async fn run() -> i32 {
    init_tracing();
    let cli = Cli::parse();
    let command_name = command_label(&cli.command);
    let trace_id = format!("{}-{}", std::process::id(), timestamp_now_ms());

    let ctx = match AppContext::from_options(
        cli.api_url.clone(),
        cli.timeout,
        cli.token.as_deref(),
        &trace_id,
    ) {
        Ok(ctx) => ctx,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            return err.exit_code();
        }
    };

    tracing::debug!(command = command_name, trace_id = %trace_id, "dispatching command");

    match dispatch(cli, &ctx).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

async fn dispatch(cli: Cli, ctx: &AppContext) -> CliResult<()> {
    match cli.command {
        Command::Bp(command) => blood_pressure::dispatch(ctx, command, cli.output).await,
        Command::Weight(command) => weight::dispatch(ctx, command, cli.output).await,
        Command::Points(command) => points::dispatch(ctx, command, cli.output).await,
        Command::Prefs(command) => preferences::dispatch(ctx, command, cli.output).await,
        Command::Users(command) => users::dispatch(ctx, command, cli.output).await,
    }
}

#[derive(Parser)]
#[command(
    name = "healthpoints",
    about = "Command-line client for a HealthPoints server"
)]
struct Cli {
    #[arg(
        long,
        global = true,
        env = "HEALTHPOINTS_API_URL",
        value_parser = parse_url,
        default_value = DEFAULT_API_URL
    )]
    api_url: Url,
    #[arg(
        long,
        global = true,
        env = "HEALTHPOINTS_API_TOKEN",
        help = "Bearer token sent with every request"
    )]
    token: Option<String>,
    #[arg(
        long,
        global = true,
        env = "HEALTHPOINTS_HTTP_TIMEOUT_SECS",
        default_value_t = DEFAULT_TIMEOUT_SECS
    )]
    timeout: u64,
    #[arg(
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Select output format for commands that render structured data"
    )]
    output: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Blood pressure readings.
    #[command(subcommand)]
    Bp(blood_pressure::BloodPressureCommand),
    /// Weight measurements.
    #[command(subcommand)]
    Weight(weight::WeightCommand),
    /// Daily points entries.
    #[command(subcommand)]
    Points(points::PointsCommand),
    /// Per-user preferences.
    #[command(subcommand)]
    Prefs(preferences::PreferencesCommand),
    /// User directory.
    #[command(subcommand)]
    Users(users::UsersCommand),
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Bp(command) => command.label(),
        Command::Weight(command) => command.label(),
        Command::Points(command) => command.label(),
        Command::Prefs(command) => command.label(),
        Command::Users(command) => command.label(),
    }
}

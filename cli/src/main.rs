use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

mod commands;
mod util;

use commands::normalize::NormalizeArgs;
use commands::remote::AskArgs;
use util::exit_error;

#[derive(Parser)]
#[command(name = "relay", version, about = "Relay CLI: normalize agent answers and inspect agent event streams")]
struct Cli {
    /// Read input from this file instead of stdin ("-" means stdin)
    #[arg(long, global = true)]
    input: Option<String>,

    /// Relay API base URL (for `health` and `ask`)
    #[arg(long, env = "RELAY_API_URL", default_value = "http://localhost:3000", global = true)]
    api_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Normalize an agent answer into required section headings
    Normalize(NormalizeArgs),
    /// Print whether the text is a project analysis request (true/false)
    Intent {
        /// Text to classify (reads input when omitted)
        text: Option<String>,
    },
    /// Print the refusal line of an agent answer; exits 1 when none
    Refusal,
    /// Decode newline-delimited JSON agent events into text
    Decode {
        /// Print each fragment on its own line instead of the aggregate
        #[arg(long)]
        stream: bool,
    },
    /// Check a running relay API
    Health,
    /// Ask a running relay API
    Ask(AskArgs),
}

fn init_tracing() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .compact()
        .init();
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    init_tracing();
    let cli = Cli::parse();
    let input = cli.input.as_deref();

    let result = match cli.command {
        Commands::Normalize(args) => commands::normalize::run(input, args),
        Commands::Intent { text } => commands::intent::run(input, text),
        Commands::Refusal => commands::refusal::run(input),
        Commands::Decode { stream } => commands::decode::run(input, stream).await,
        Commands::Health => commands::remote::health(&cli.api_url).await,
        Commands::Ask(args) => commands::remote::ask(&cli.api_url, input, args).await,
    };

    match result {
        Ok(code) => std::process::exit(code),
        Err(e) => exit_error(&e.to_string(), None),
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_normalize_with_repeated_sections() {
        let cli = Cli::try_parse_from([
            "relay",
            "normalize",
            "--section",
            "Overview",
            "--section",
            "Risks",
            "--skip-empty",
            "--input",
            "answer.md",
        ])
        .expect("valid arguments");
        assert_eq!(cli.input.as_deref(), Some("answer.md"));
        assert!(matches!(cli.command, Commands::Normalize(_)));
    }

    #[test]
    fn section_and_preset_conflict() {
        let result = Cli::try_parse_from([
            "relay",
            "normalize",
            "--section",
            "Overview",
            "--preset",
            "executive_report",
        ]);
        assert!(result.is_err());
    }
}

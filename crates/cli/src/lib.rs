pub mod commands;

use std::io::Read;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "bargainer",
    about = "Bargainer operator CLI",
    long_about = "Run single negotiation decisions, inspect effective configuration, and check readiness.",
    after_help = "Examples:\n  bargainer propose --quantities 7,4,1 --valuations 45,72,33\n  bargainer evaluate --offer 150 --batna 100 --counter 160\n  echo '{\"action\":\"PROPOSE\",...}' | bargainer handle\n  bargainer doctor --json"
)]
pub struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    #[command(about = "Propose a split of the item pool using the aspiration target")]
    Propose {
        #[arg(long, allow_hyphen_values = true, help = "Comma-separated item quantities")]
        quantities: String,
        #[arg(long, allow_hyphen_values = true, help = "Comma-separated per-unit self valuations")]
        valuations: String,
        #[arg(long, allow_hyphen_values = true, help = "Reservation value (accepted, not used)")]
        batna: Option<String>,
        #[arg(long, allow_hyphen_values = true, help = "Share of the total value to keep, in (0, 1]")]
        target_fraction: Option<String>,
    },
    #[command(about = "Decide whether to accept an offer")]
    Evaluate {
        #[arg(long, allow_hyphen_values = true)]
        offer: String,
        #[arg(long, allow_hyphen_values = true)]
        batna: String,
        #[arg(long, allow_hyphen_values = true)]
        counter: String,
    },
    #[command(about = "Answer a free-text message carrying a JSON observation (stdin by default)")]
    Handle {
        #[arg(long, help = "Message text; read from stdin when omitted")]
        message: Option<String>,
    },
    #[command(about = "Inspect effective configuration values with source attribution")]
    Config,
    #[command(about = "Validate config and run negotiator self-checks")]
    Doctor {
        #[arg(long, help = "Emit machine-readable JSON output")]
        json: bool,
    },
}

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Command::Propose { quantities, valuations, batna, target_fraction } => {
            commands::propose::run(
                &quantities,
                &valuations,
                batna.as_deref(),
                target_fraction.as_deref(),
            )
        }
        Command::Evaluate { offer, batna, counter } => {
            commands::evaluate::run(&offer, &batna, &counter)
        }
        Command::Handle { message } => match message.map_or_else(read_stdin, Ok) {
            Ok(message) => commands::handle::run(&message),
            Err(error) => commands::CommandResult::failure(
                "handle",
                "stdin",
                format!("failed to read message from stdin: {error}"),
                commands::EXIT_INVALID_REQUEST,
            ),
        },
        Command::Config => commands::config::run(),
        Command::Doctor { json } => commands::doctor::run(json),
    };

    println!("{}", result.output);
    ExitCode::from(result.exit_code)
}

fn read_stdin() -> std::io::Result<String> {
    let mut message = String::new();
    std::io::stdin().read_to_string(&mut message)?;
    Ok(message)
}

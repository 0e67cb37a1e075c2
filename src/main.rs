use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use clap::Parser;
use geoprompt::location::config::{DEFAULT_USER_AGENT, NOMINATIM_SEARCH_URL};
use geoprompt::location::{LocationResolver, Resolution, ResolverConfig, UreqTransport};
use geoprompt::prompt;
use tracing_subscriber::EnvFilter;

/// Geocode the place named in a weather question.
///
/// Finds a location phrase in the question, resolves it through Nominatim,
/// and prints the prompt with coordinates appended. If nothing resolves the
/// question is printed unchanged.
///
/// Examples:
///   geoprompt "What's the weather like in New York City?"
///   geoprompt --place "Paris, France"
///   geoprompt --json "Any alerts in California?"
///   geoprompt            (asks for the question interactively)
#[derive(Parser)]
#[command(name = "geoprompt", version, about, long_about = None)]
struct Cli {
    /// Weather question. Read from stdin when omitted.
    #[arg(index = 1)]
    question: Option<String>,

    /// Resolve a place name directly instead of a question.
    #[arg(long, short = 'p', conflicts_with = "question")]
    place: Option<String>,

    /// Geocoding search endpoint.
    #[arg(long, env = "GEOPROMPT_ENDPOINT", default_value = NOMINATIM_SEARCH_URL)]
    endpoint: String,

    /// User-Agent sent to the geocoder.
    #[arg(long, env = "GEOPROMPT_USER_AGENT", default_value = DEFAULT_USER_AGENT)]
    user_agent: String,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = ResolverConfig::default()
        .with_endpoint(cli.endpoint.clone())
        .with_user_agent(cli.user_agent.clone());
    let resolver = LocationResolver::with_transport(UreqTransport::new(), config);

    // ── Place mode ──────────────────────────────────────────────

    if let Some(ref place) = cli.place {
        let resolution = resolver.resolve(place).await;
        if cli.json {
            return print_json(&resolution);
        }
        match resolution {
            Resolution::Resolved(c) => println!("{}", c),
            Resolution::Unresolved => {
                eprintln!("  Could not resolve '{}'.", place);
                println!("unresolved");
            }
        }
        return ExitCode::SUCCESS;
    }

    // ── Question mode ───────────────────────────────────────────

    let question = match cli.question {
        Some(q) => q,
        None => match read_question() {
            Ok(q) => q,
            Err(e) => {
                eprintln!("Error: failed to read question: {}", e);
                return ExitCode::FAILURE;
            }
        },
    };
    let question = question.trim();
    if question.is_empty() {
        eprintln!("Error: empty question.");
        return ExitCode::FAILURE;
    }

    let enriched = prompt::enrich(&resolver, question).await;

    if cli.json {
        return print_json(&enriched);
    }

    match (&enriched.location, enriched.resolution) {
        (Some(place), Some(Resolution::Resolved(c))) => eprintln!("  {} \u{2192} {}", place, c),
        (Some(place), _) => eprintln!("  Could not resolve '{}'; using question as-is.", place),
        (None, _) => eprintln!("  No location found in question."),
    }
    println!("{}", enriched.prompt);
    ExitCode::SUCCESS
}

fn read_question() -> io::Result<String> {
    eprintln!("Ask a question about the weather (e.g., 'What's the weather like in New York City?')");
    eprint!("Your question: ");
    io::stderr().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line)
}

fn print_json<T: serde::Serialize>(value: &T) -> ExitCode {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

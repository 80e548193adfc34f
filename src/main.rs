use clap::{Parser, Subcommand};
use tracing::Level;

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run Bijoy keys through the transliterator.
    Transliterate(cmd::transliterate::TransliterateArgs),
    /// Race a synthetic typist against a prompt.
    Simulate(cmd::simulate::SimulateArgs),
    /// Inspect and rescore a saved replay.
    Replay(cmd::replay::ReplayArgs),
    /// Rescore many replays in parallel.
    Audit(cmd::audit::AuditArgs),
}

fn main() {
    let cli = Cli::parse();

    let level = if cli.debug { Level::DEBUG } else { Level::INFO };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    let outcome = match cli.command {
        Commands::Transliterate(args) => cmd::transliterate::run(args),
        Commands::Simulate(args) => cmd::simulate::run(args),
        Commands::Replay(args) => cmd::replay::run(args),
        Commands::Audit(args) => cmd::audit::run(args),
    };

    if let Err(e) = outcome {
        eprintln!("\n❌ {}", e);
        std::process::exit(1);
    }
}

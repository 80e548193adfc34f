use crate::reports;
use clap::Args;
use keyrace::config::SessionConfig;
use keyrace::error::{KeyRaceError, KrResult};
use keyrace::prompt::Prompt;
use keyrace::simulate::SimulatedTypist;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct SimulateArgs {
    #[command(flatten)]
    pub config: SessionConfig,

    #[command(flatten)]
    pub typist: SimulatedTypist,

    /// Plain text file with the prompt words.
    #[arg(short, long)]
    pub prompt: Option<PathBuf>,

    /// Prompt given inline instead of a file.
    #[arg(long)]
    pub text: Option<String>,

    /// JSON session config; overrides the flags above.
    #[arg(long)]
    pub config_file: Option<PathBuf>,

    #[arg(long)]
    pub replay_out: Option<PathBuf>,

    /// Per-second WPM samples as CSV.
    #[arg(long)]
    pub samples_csv: Option<PathBuf>,
}

pub fn run(args: SimulateArgs) -> KrResult<()> {
    let config = super::resolve_config(&args.config, &args.config_file)?;

    let prompt = match (&args.prompt, &args.text) {
        (Some(path), _) => Prompt::load_from_file(path)?,
        (None, Some(text)) => Prompt::from_text(text),
        (None, None) => {
            return Err(KeyRaceError::Config(
                "either --prompt or --text is required".to_string(),
            ))
        }
    };

    println!(
        "\n🏁 Simulating {} words ({} mode, {} ms/key)",
        prompt.len(),
        config.mode,
        args.typist.delay_ms
    );
    let result = args.typist.run(&prompt, &config);

    reports::print_result(&result);
    reports::print_word_table(&result.words);

    if let Some(path) = &args.replay_out {
        match &result.replay {
            Some(replay) => replay.save(path)?,
            None => println!("⚠️  Nothing typed, no replay written."),
        }
    }
    if let Some(path) = &args.samples_csv {
        reports::write_samples_csv(path, &result)?;
        println!("📈 Samples written to {}", path.display());
    }
    Ok(())
}

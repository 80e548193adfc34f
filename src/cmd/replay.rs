use crate::reports;
use clap::Args;
use keyrace::config::SessionConfig;
use keyrace::error::KrResult;
use keyrace::metrics::EventKind;
use keyrace::replay::Replay;
use std::path::PathBuf;

#[derive(Args, Debug, Clone)]
pub struct ReplayArgs {
    pub file: PathBuf,

    /// Scoring settings for logs that did not record their own.
    #[command(flatten)]
    pub config: SessionConfig,

    /// Print the buffer as it was this many ms into the run.
    #[arg(long)]
    pub at: Option<u64>,
}

pub fn run(args: ReplayArgs) -> KrResult<()> {
    let replay = Replay::load(&args.file)?;
    println!(
        "\n📼 Replay: {} ({} events, {} ms)",
        args.file.display(),
        replay.events.len(),
        replay.duration()
    );

    match replay.mode() {
        Some(mode) => println!("   Recorded mode: {}", mode),
        None => println!("   No recorded config, scoring with flags ({} mode)", args.config.mode),
    }

    if let Some(t) = args.at {
        println!("⏱  Buffer at {} ms: \"{}\"", t, replay.text_at(t));
        println!("   Submitted so far: {:?}", submitted_before(&replay, t));
    }

    args.config.validate()?;
    let result = replay.rescore(&args.config);
    reports::print_result(&result);
    reports::print_word_table(&result.words);
    Ok(())
}

fn submitted_before(replay: &Replay, t: u64) -> Vec<&str> {
    replay
        .events
        .iter()
        .take_while(|e| e.t <= t)
        .filter_map(|e| match e.kind {
            EventKind::Submit => e.value.as_deref(),
            _ => None,
        })
        .collect()
}

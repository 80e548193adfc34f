use crate::reports::{self, AuditRow};
use clap::Args;
use keyrace::config::SessionConfig;
use keyrace::error::KrResult;
use keyrace::replay::Replay;
use rayon::prelude::*;
use std::path::PathBuf;
use tracing::warn;

#[derive(Args, Debug, Clone)]
pub struct AuditArgs {
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Used only for logs that carry no config of their own.
    #[command(flatten)]
    pub config: SessionConfig,
}

pub fn run(args: AuditArgs) -> KrResult<()> {
    args.config.validate()?;
    println!("\n🔎 === REPLAY AUDIT ({} files) === 🔎", args.files.len());

    let mut rows: Vec<AuditRow> = args
        .files
        .par_iter()
        .filter_map(|path| match Replay::load(path) {
            Ok(replay) => Some(AuditRow {
                name: path.display().to_string(),
                result: replay.rescore(&args.config),
            }),
            Err(e) => {
                warn!("Skipping '{}': {}", path.display(), e);
                None
            }
        })
        .collect();

    rows.sort_by(|a, b| b.result.wpm.total_cmp(&a.result.wpm));
    reports::print_audit(&rows);
    Ok(())
}

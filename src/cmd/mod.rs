pub mod audit;
pub mod replay;
pub mod simulate;
pub mod transliterate;

use keyrace::config::SessionConfig;
use keyrace::error::KrResult;
use std::path::PathBuf;

/// `--config-file` wins over the individual flags when given.
pub fn resolve_config(flags: &SessionConfig, file: &Option<PathBuf>) -> KrResult<SessionConfig> {
    match file {
        Some(path) => {
            println!("⚙️  Loading session config from: {}", path.display());
            SessionConfig::load_from_file(path)
        }
        None => {
            flags.validate()?;
            Ok(flags.clone())
        }
    }
}

use crate::consts::{DEFAULT_TIME_LIMIT_SECS, RAW_WPM_CAP, SAMPLE_INTERVAL_MS, WPM_CAP};
use crate::error::{KeyRaceError, KrResult};
use crate::metrics::Mode;
use crate::text::Segmenter;
use clap::Args;
use serde::{Deserialize, Serialize};
use std::fmt::Display as FmtDisplay;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

/// Parses one of the named choices, listing all of them on failure.
pub fn parse_choice<T>(s: &str) -> Result<T, String>
where
    T: FromStr + IntoEnumIterator + FmtDisplay,
{
    s.parse().map_err(|_| {
        let names: Vec<String> = T::iter().map(|v| v.to_string()).collect();
        format!("'{}' is not one of: {}", s, names.join(", "))
    })
}

/// How key presses become text.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, EnumString, Display, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum InputMethod {
    /// Keys insert themselves (Latin prompts, or an OS-level Bengali layout).
    #[default]
    Direct,
    /// Keys go through the Bijoy transliterator first.
    Bijoy,
}

#[derive(Args, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    #[arg(long, default_value = "words", value_parser = parse_choice::<Mode>)]
    pub mode: Mode,

    /// Only used by `Mode::Time`.
    #[arg(long, default_value_t = DEFAULT_TIME_LIMIT_SECS)]
    pub time_limit: u64,

    /// In time mode, let the word in progress finish before stopping.
    #[arg(long, default_value_t = false)]
    pub stop_on_word_end: bool,

    #[arg(long, default_value = "direct", value_parser = parse_choice::<InputMethod>)]
    pub input_method: InputMethod,

    #[arg(long, default_value = "unicode", value_parser = parse_choice::<Segmenter>)]
    pub segmenter: Segmenter,

    #[arg(long, default_value_t = SAMPLE_INTERVAL_MS)]
    pub sample_interval_ms: u64,

    #[arg(long, default_value_t = WPM_CAP)]
    pub wpm_cap: f64,

    #[arg(long, default_value_t = RAW_WPM_CAP)]
    pub raw_wpm_cap: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: Mode::Words,
            time_limit: DEFAULT_TIME_LIMIT_SECS,
            stop_on_word_end: false,
            input_method: InputMethod::Direct,
            segmenter: Segmenter::Unicode,
            sample_interval_ms: SAMPLE_INTERVAL_MS,
            wpm_cap: WPM_CAP,
            raw_wpm_cap: RAW_WPM_CAP,
        }
    }
}

impl SessionConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> KrResult<Self> {
        let content = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> KrResult<()> {
        if self.mode == Mode::Time && self.time_limit == 0 {
            return Err(KeyRaceError::Config(
                "time mode needs a time limit above zero".to_string(),
            ));
        }
        if self.sample_interval_ms == 0 {
            return Err(KeyRaceError::Config(
                "sample interval must be at least 1 ms".to_string(),
            ));
        }
        if !(self.wpm_cap > 0.0 && self.raw_wpm_cap > 0.0) {
            return Err(KeyRaceError::Config("WPM caps must be positive".to_string()));
        }
        Ok(())
    }

    pub fn time_limit_ms(&self) -> u64 {
        self.time_limit.saturating_mul(1000)
    }

    pub fn timed(time_limit: u64) -> Self {
        Self {
            mode: Mode::Time,
            time_limit,
            ..Self::default()
        }
    }

    pub fn with_input_method(mut self, method: InputMethod) -> Self {
        self.input_method = method;
        self
    }
}

use crate::config::SessionConfig;
use crate::error::{KeyRaceError, KrResult};
use crate::metrics::{EventKind, FinishReason, Mode, ReplayEvent, Session, SessionResult, Timestamp};
use crate::prompt::Prompt;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Prompt plus keystroke log. Enough to rebuild the buffer at any time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Replay {
    pub prompt_words: Vec<String>,
    /// Settings the run was scored with. Logs written without one are
    /// rescored with whatever config the caller supplies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<SessionConfig>,
    pub events: Vec<ReplayEvent>,
}

impl Replay {
    /// Buffer contents at `t` ms after start. Empty before the first event.
    pub fn text_at(&self, t: Timestamp) -> &str {
        let idx = self.events.partition_point(|e| e.t <= t);
        match idx {
            0 => "",
            i => &self.events[i - 1].text,
        }
    }

    pub fn duration(&self) -> Timestamp {
        self.events.last().map(|e| e.t).unwrap_or(0)
    }

    /// Words locked in by the log, in order.
    pub fn submitted_words(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter(|e| e.kind == EventKind::Submit)
            .filter_map(|e| e.value.as_deref())
            .collect()
    }

    pub fn validate(&self) -> KrResult<()> {
        if let Some(w) = self.events.windows(2).find(|w| w[1].t < w[0].t) {
            return Err(KeyRaceError::Validation(format!(
                "events out of order: {} ms after {} ms",
                w[1].t, w[0].t
            )));
        }
        if let Some(e) = self
            .events
            .iter()
            .find(|e| e.kind == EventKind::Submit && !e.text.is_empty())
        {
            return Err(KeyRaceError::Validation(format!(
                "submit at {} ms left text '{}' in the buffer",
                e.t, e.text
            )));
        }
        if let Some(config) = &self.config {
            config.validate()?;
        }
        Ok(())
    }

    /// Mode the run used, if the log recorded it.
    pub fn mode(&self) -> Option<Mode> {
        self.config.as_ref().map(|c| c.mode)
    }

    /// Drives a fresh session through the log and returns its result.
    ///
    /// The recorded config wins; `fallback` only scores logs without one.
    /// WPM samples are taken at event times, so consistency can differ
    /// slightly from the live run; everything else matches.
    pub fn rescore(&self, fallback: &SessionConfig) -> SessionResult {
        let config = self.config.clone().unwrap_or_else(|| fallback.clone());
        let mode = config.mode;
        let mut session = Session::new(Prompt::new(&self.prompt_words), config);

        for e in &self.events {
            session.tick(e.t);
            match e.kind {
                EventKind::Input | EventKind::Delete => {
                    session.update_input(&e.text, e.t);
                }
                EventKind::Submit => {
                    session.submit_word(e.t);
                }
            }
        }

        let reason = match mode {
            Mode::Time => FinishReason::Time,
            _ => FinishReason::External,
        };
        session.finish(reason, self.duration())
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> KrResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json)?;
        info!("Saved replay to '{}'", path.as_ref().display());
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> KrResult<Self> {
        let content = fs::read_to_string(&path)?;
        let replay: Self = serde_json::from_str(&content)?;
        if replay.events.is_empty() {
            warn!("Replay '{}' has no events", path.as_ref().display());
        }
        replay.validate()?;
        Ok(replay)
    }
}

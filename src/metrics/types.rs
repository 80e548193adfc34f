use crate::replay::Replay;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Milliseconds. Absolute for host clocks, relative to start inside events.
pub type Timestamp = u64;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumString, Display, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Finish after the last prompt word.
    #[default]
    Words,
    /// Finish when the clock runs out.
    Time,
    /// Open-ended; only an external finish ends it.
    Zen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Completed,
    Time,
    External,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
pub enum Phase {
    Idle,
    Running,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Input,
    Delete,
    Submit,
}

/// One entry of the replay log. `text` is the full buffer after the event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayEvent {
    pub t: Timestamp,
    #[serde(rename = "type")]
    pub kind: EventKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub text: String,
}

/// Grapheme buckets from comparing typed words to the prompt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharCounts {
    pub correct: usize,
    pub incorrect: usize,
    pub extra: usize,
    pub missed: usize,
    pub correct_word_chars: usize,
    pub correct_spaces: usize,
    pub spaces: usize,
}

/// Raw keypress tallies. Only ever grow; backspace does not undo them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeypressCounts {
    pub correct: usize,
    pub incorrect: usize,
}

impl KeypressCounts {
    pub fn accuracy(&self) -> f64 {
        let total = self.correct + self.incorrect;
        if total == 0 {
            return 100.0;
        }
        self.correct as f64 / total as f64 * 100.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Severity(pub u8);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordResult {
    pub expected: String,
    pub typed: String,
    pub correct: usize,
    pub incorrect: usize,
    pub extra: usize,
    pub missed: usize,
    pub severity: Severity,
}

impl WordResult {
    pub fn mistakes(&self) -> usize {
        self.incorrect + self.extra + self.missed
    }
}

/// Snapshot for a live display. Frozen values once the session finished.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveStats {
    pub phase: Phase,
    pub wpm: f64,
    pub raw_wpm: f64,
    pub accuracy: f64,
    pub elapsed_ms: Timestamp,
    pub word_index: usize,
    pub chars: CharCounts,
    pub keypresses: KeypressCounts,
}

/// Everything a finished attempt produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResult {
    pub mode: Mode,
    pub reason: FinishReason,
    pub wpm: f64,
    pub raw_wpm: f64,
    pub accuracy: f64,
    pub consistency: f64,
    pub elapsed_ms: Timestamp,
    pub chars: CharCounts,
    pub keypresses: KeypressCounts,
    pub wpm_samples: Vec<f64>,
    pub raw_samples: Vec<f64>,
    pub words: Vec<WordResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replay: Option<Replay>,
}

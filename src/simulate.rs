use crate::config::{InputMethod, SessionConfig};
use crate::metrics::{FinishReason, Mode, SessionResult, Timestamp};
use crate::prompt::Prompt;
use crate::typist::{Key, Typist};
use clap::Args;
use tracing::debug;

/// Synthetic typist. Same seed, same keystrokes, same result.
#[derive(Args, Debug, Clone)]
pub struct SimulatedTypist {
    /// Mean gap between key presses.
    #[arg(long, default_value_t = 180)]
    pub delay_ms: u64,

    /// Uniform +/- spread around the mean gap.
    #[arg(long, default_value_t = 60)]
    pub jitter_ms: u64,

    /// Chance per character of hitting a wrong key first.
    #[arg(long, default_value_t = 0.04)]
    pub error_rate: f64,

    /// Chance a wrong key gets backspaced before moving on.
    #[arg(long, default_value_t = 0.7)]
    pub fix_rate: f64,

    #[arg(short = 'S', long)]
    pub seed: Option<u64>,
}

impl Default for SimulatedTypist {
    fn default() -> Self {
        Self {
            delay_ms: 180,
            jitter_ms: 60,
            error_rate: 0.04,
            fix_rate: 0.7,
            seed: None,
        }
    }
}

const TYPO_KEYS: &[char] = &['q', 'x', 'z', 'j', 'k', ';'];

impl SimulatedTypist {
    pub fn run(&self, prompt: &Prompt, config: &SessionConfig) -> SessionResult {
        let mut rng = match self.seed {
            Some(s) => fastrand::Rng::with_seed(s),
            None => fastrand::Rng::new(),
        };
        // Prompt text is typed as-is, so skip transliteration.
        let config = SessionConfig {
            input_method: InputMethod::Direct,
            ..config.clone()
        };
        let mode = config.mode;
        let interval = config.sample_interval_ms;
        let mut typist = Typist::new(prompt.clone(), config);

        let mut now: Timestamp = 0;
        let mut next_tick = interval;

        'words: for (i, word) in prompt.words().iter().enumerate() {
            let mut keys: Vec<Key> = Vec::new();
            for c in word.chars() {
                if rng.f64() < self.error_rate {
                    keys.push(Key::Char(TYPO_KEYS[rng.usize(..TYPO_KEYS.len())]));
                    if rng.f64() < self.fix_rate {
                        keys.push(Key::Backspace);
                    }
                }
                keys.push(Key::Char(c));
            }
            if i + 1 < prompt.len() {
                keys.push(Key::Space);
            }

            for key in keys {
                typist.press(key, now);
                now += self.gap(&mut rng);
                while now >= next_tick {
                    typist.tick(next_tick);
                    next_tick += interval;
                }
                if typist.session().is_finished() {
                    break 'words;
                }
            }
        }

        // A wrong last word leaves the session open; end it like the host would.
        let reason = match mode {
            Mode::Time => FinishReason::Time,
            _ => FinishReason::External,
        };
        let result = typist.finish(reason, now);
        debug!(wpm = result.wpm, accuracy = result.accuracy, "simulation done");
        result
    }

    fn gap(&self, rng: &mut fastrand::Rng) -> u64 {
        let lo = self.delay_ms.saturating_sub(self.jitter_ms);
        let hi = self.delay_ms + self.jitter_ms;
        rng.u64(lo..=hi).max(1)
    }
}

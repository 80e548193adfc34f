use super::counts::Tally;
use super::math;
use super::types::{
    CharCounts, EventKind, FinishReason, KeypressCounts, LiveStats, Mode, Phase, ReplayEvent,
    SessionResult, Timestamp,
};
use crate::config::SessionConfig;
use crate::prompt::Prompt;
use crate::replay::Replay;
use crate::text::{graphemes_equal, is_grapheme_prefix, normalize};
use tracing::{debug, trace};

/// What a handler did with the event, for host-side feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feedback {
    /// Nothing changed (finished session, bare space, same text).
    Ignored,
    Input,
    Delete,
    /// A word was locked in; `correct` drives audio/visual cues only.
    Submit { correct: bool },
}

/// One typing attempt against a fixed prompt.
///
/// Driven entirely by the host: every handler takes the host clock in ms.
/// `idle -> running` on the first character, `running -> finished` on an
/// auto-finish rule or `finish`. Only `reset` leaves `finished`.
#[derive(Debug, Clone)]
pub struct Session {
    config: SessionConfig,
    prompt: Prompt,

    input_history: Vec<String>,
    current_input: String,
    current_word_index: usize,
    start_time: Option<Timestamp>,
    end_time: Option<Timestamp>,

    keypresses: KeypressCounts,
    spaces: usize,
    wpm_samples: Vec<f64>,
    raw_samples: Vec<f64>,
    last_sample_at: Option<Timestamp>,
    /// Time is up but the word in progress gets to finish.
    overtime: bool,

    events: Vec<ReplayEvent>,
    result: Option<SessionResult>,
}

impl Session {
    pub fn new(prompt: Prompt, config: SessionConfig) -> Self {
        Self {
            config,
            prompt,
            input_history: Vec::new(),
            current_input: String::new(),
            current_word_index: 0,
            start_time: None,
            end_time: None,
            keypresses: KeypressCounts::default(),
            spaces: 0,
            wpm_samples: Vec::new(),
            raw_samples: Vec::new(),
            last_sample_at: None,
            overtime: false,
            events: Vec::new(),
            result: None,
        }
    }

    /// Drops everything accumulated. Prompt and config stay.
    pub fn reset(&mut self) {
        let prompt = std::mem::take(&mut self.prompt);
        let config = self.config.clone();
        *self = Self::new(prompt, config);
    }

    /// Starts over on a different prompt.
    pub fn reset_with(&mut self, prompt: Prompt) {
        self.prompt = prompt;
        self.reset();
    }

    // --- Handlers ---

    /// The word buffer changed (typed, composed or backspaced). `text` is
    /// the whole new buffer of the current word.
    pub fn update_input(&mut self, text: &str, now: Timestamp) -> Feedback {
        if self.result.is_some() || text == self.current_input {
            return Feedback::Ignored;
        }
        if self.should_stop_on_time(now) {
            self.finish(FinishReason::Time, now);
            return Feedback::Ignored;
        }
        if self.start_time.is_none() {
            if text.is_empty() {
                return Feedback::Ignored;
            }
            self.start_time = Some(now);
            debug!(mode = %self.config.mode, words = self.prompt.len(), "session started");
        }

        let old = normalize(&std::mem::replace(&mut self.current_input, text.to_string()));
        let new = normalize(text);
        let kind = if new.chars().count() < old.chars().count() {
            EventKind::Delete
        } else {
            EventKind::Input
        };

        let value = match kind {
            EventKind::Input => Some(self.count_keypresses(&old, &new)),
            _ => None,
        };
        self.push_event(kind, value, now);

        if self.completes_prompt(&new) {
            let correct = self.commit_word(now);
            self.finish(FinishReason::Completed, now);
            return Feedback::Submit { correct };
        }

        match kind {
            EventKind::Delete => Feedback::Delete,
            _ => Feedback::Input,
        }
    }

    /// Space key. A bare space on an empty buffer does nothing.
    pub fn submit_word(&mut self, now: Timestamp) -> Feedback {
        if self.result.is_some() || self.current_input.is_empty() {
            return Feedback::Ignored;
        }
        self.spaces += 1;
        let correct = self.commit_word(now);

        let exhausted = self.current_word_index >= self.prompt.len();
        match self.config.mode {
            Mode::Words if exhausted => {
                self.finish(FinishReason::Completed, now);
            }
            Mode::Time if exhausted => {
                self.finish(FinishReason::Completed, now);
            }
            Mode::Time if self.overtime || self.time_up(now) => {
                self.finish(FinishReason::Time, now);
            }
            _ => {}
        }
        Feedback::Submit { correct }
    }

    /// Periodic timer. Samples WPM and enforces the time limit.
    pub fn tick(&mut self, now: Timestamp) -> Phase {
        if self.phase() != Phase::Running {
            return self.phase();
        }
        self.sample(now);

        if self.config.mode == Mode::Time && self.time_up(now) {
            if self.config.stop_on_word_end && !self.current_input.is_empty() {
                if !self.overtime {
                    debug!("time up, waiting for word end");
                }
                self.overtime = true;
            } else {
                self.finish(FinishReason::Time, now);
            }
        }
        self.phase()
    }

    /// Freezes the attempt. Later calls return the first result unchanged.
    pub fn finish(&mut self, reason: FinishReason, now: Timestamp) -> SessionResult {
        if let Some(existing) = &self.result {
            return existing.clone();
        }
        let result = self.build_result(reason, now);
        debug!(
            reason = %reason,
            wpm = result.wpm,
            accuracy = result.accuracy,
            "session finished"
        );
        self.result = Some(result.clone());
        result
    }

    // --- Queries ---

    pub fn phase(&self) -> Phase {
        if self.result.is_some() {
            Phase::Finished
        } else if self.start_time.is_some() {
            Phase::Running
        } else {
            Phase::Idle
        }
    }

    pub fn is_finished(&self) -> bool {
        self.result.is_some()
    }

    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    pub fn stats(&self, now: Timestamp) -> LiveStats {
        if let Some(r) = &self.result {
            return LiveStats {
                phase: Phase::Finished,
                wpm: r.wpm,
                raw_wpm: r.raw_wpm,
                accuracy: r.accuracy,
                elapsed_ms: r.elapsed_ms,
                word_index: self.current_word_index,
                chars: r.chars,
                keypresses: r.keypresses,
            };
        }
        let Some(start) = self.start_time else {
            return LiveStats {
                phase: Phase::Idle,
                wpm: 0.0,
                raw_wpm: 0.0,
                accuracy: 100.0,
                elapsed_ms: 0,
                word_index: 0,
                chars: CharCounts::default(),
                keypresses: KeypressCounts::default(),
            };
        };

        let elapsed = now.saturating_sub(start);
        let current = normalize(&self.current_input);
        let (chars, _) = self.tally(&current, false).run();
        let words = self.input_history.len();
        LiveStats {
            phase: Phase::Running,
            wpm: math::wpm(words, elapsed, self.config.wpm_cap).round(),
            raw_wpm: math::wpm(words, elapsed, self.config.raw_wpm_cap).round(),
            accuracy: math::accuracy(&chars),
            elapsed_ms: elapsed,
            word_index: self.current_word_index,
            chars,
            keypresses: self.keypresses,
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn prompt(&self) -> &Prompt {
        &self.prompt
    }

    pub fn expected_word(&self) -> Option<&str> {
        self.prompt.get(self.current_word_index)
    }

    pub fn history(&self) -> &[String] {
        &self.input_history
    }

    pub fn current_input(&self) -> &str {
        &self.current_input
    }

    pub fn word_index(&self) -> usize {
        self.current_word_index
    }

    pub fn start_time(&self) -> Option<Timestamp> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<Timestamp> {
        self.end_time
    }

    pub fn keypresses(&self) -> KeypressCounts {
        self.keypresses
    }

    pub fn wpm_samples(&self) -> &[f64] {
        &self.wpm_samples
    }

    pub fn events(&self) -> &[ReplayEvent] {
        &self.events
    }

    // --- Internals ---

    fn time_up(&self, now: Timestamp) -> bool {
        self.start_time
            .is_some_and(|s| now.saturating_sub(s) >= self.config.time_limit_ms())
    }

    fn should_stop_on_time(&self, now: Timestamp) -> bool {
        self.config.mode == Mode::Time && !self.config.stop_on_word_end && self.time_up(now)
    }

    /// Last prompt word typed exactly, no space needed.
    fn completes_prompt(&self, normalized: &str) -> bool {
        self.config.mode != Mode::Zen
            && self.current_word_index + 1 == self.prompt.len()
            && self
                .expected_word()
                .is_some_and(|e| graphemes_equal(e, normalized, self.config.segmenter))
    }

    /// Classifies graphemes that appeared between the unchanged prefix and
    /// the unchanged suffix, and returns them as the event value.
    fn count_keypresses(&mut self, old: &str, new: &str) -> String {
        let seg = self.config.segmenter;
        let old_g = seg.split(old);
        let new_g = seg.split(new);
        let common = old_g
            .iter()
            .zip(new_g.iter())
            .take_while(|(a, b)| a == b)
            .count();
        // Suffix may not reach back into the prefix on either side.
        let tail = old_g[common..]
            .iter()
            .rev()
            .zip(new_g[common..].iter().rev())
            .take_while(|(a, b)| a == b)
            .count();
        let changed = common..new_g.len() - tail;

        let zen = self.config.mode == Mode::Zen;
        let expected = self.expected_word().unwrap_or("").to_string();
        let exp_g = seg.split(&expected);

        for (i, g) in new_g.iter().enumerate().take(changed.end).skip(changed.start) {
            let ok = zen
                || match exp_g.get(i) {
                    Some(e) => g == e || (i + 1 == new_g.len() && is_grapheme_prefix(g, e)),
                    None => false,
                };
            if ok {
                self.keypresses.correct += 1;
            } else {
                self.keypresses.incorrect += 1;
            }
        }
        new_g[changed].concat()
    }

    fn commit_word(&mut self, now: Timestamp) -> bool {
        let word = normalize(&self.current_input);
        let correct = match self.config.mode {
            Mode::Zen => true,
            _ => self
                .expected_word()
                .is_some_and(|e| graphemes_equal(e, &word, self.config.segmenter)),
        };
        trace!(word = %word, correct, index = self.current_word_index, "word submitted");

        self.input_history.push(word.clone());
        self.current_input.clear();
        self.current_word_index += 1;
        self.push_event(EventKind::Submit, Some(word), now);
        correct
    }

    fn push_event(&mut self, kind: EventKind, value: Option<String>, now: Timestamp) {
        let start = self.start_time.unwrap_or(now);
        let floor = self.events.last().map(|e| e.t).unwrap_or(0);
        self.events.push(ReplayEvent {
            t: now.saturating_sub(start).max(floor),
            kind,
            value,
            text: self.current_input.clone(),
        });
    }

    fn sample(&mut self, now: Timestamp) {
        let Some(start) = self.start_time else {
            return;
        };
        let since = self.last_sample_at.unwrap_or(start);
        if now.saturating_sub(since) < self.config.sample_interval_ms {
            return;
        }
        let elapsed = now.saturating_sub(start);
        let words = self.input_history.len();
        self.wpm_samples
            .push(math::wpm(words, elapsed, self.config.wpm_cap));
        self.raw_samples
            .push(math::wpm(words, elapsed, self.config.raw_wpm_cap));
        self.last_sample_at = Some(now);
    }

    /// `current` is the open buffer, already normalized like the history.
    fn tally<'a>(&'a self, current: &'a str, finished: bool) -> Tally<'a> {
        Tally {
            prompt: self.prompt.words(),
            history: &self.input_history,
            current,
            mode: self.config.mode,
            finished,
            spaces: self.spaces,
            segmenter: self.config.segmenter,
        }
    }

    fn build_result(&mut self, reason: FinishReason, now: Timestamp) -> SessionResult {
        // An idle session stays unstarted; its elapsed time is zero.
        let start = self.start_time.unwrap_or(now);
        let end = now.max(start);
        self.end_time = Some(end);

        let elapsed_ms = if reason == FinishReason::Time && self.config.mode == Mode::Time {
            self.config.time_limit_ms()
        } else {
            end - start
        };

        let words = self.input_history.len();
        let wpm = math::wpm(words, elapsed_ms, self.config.wpm_cap);
        let raw_wpm = math::wpm(words, elapsed_ms, self.config.raw_wpm_cap);
        if self.wpm_samples.is_empty() {
            self.wpm_samples.push(wpm);
            self.raw_samples.push(raw_wpm);
        }

        let current = normalize(&self.current_input);
        let (chars, word_results) = self.tally(&current, true).run();

        let replay = if self.events.is_empty() {
            None
        } else {
            Some(Replay {
                prompt_words: self.prompt.words().to_vec(),
                config: Some(self.config.clone()),
                events: self.events.clone(),
            })
        };

        SessionResult {
            mode: self.config.mode,
            reason,
            wpm: wpm.round(),
            raw_wpm: raw_wpm.round(),
            accuracy: math::accuracy(&chars),
            consistency: math::consistency(&self.wpm_samples),
            elapsed_ms,
            chars,
            keypresses: self.keypresses,
            wpm_samples: self.wpm_samples.clone(),
            raw_samples: self.raw_samples.clone(),
            words: word_results,
            replay,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(words: &str, config: SessionConfig) -> Session {
        Session::new(Prompt::from_text(words), config)
    }

    /// Types `word` one char at a time, 100 ms apart, from `t`.
    fn type_word(s: &mut Session, word: &str, t: &mut Timestamp) {
        let mut buf = s.current_input().to_string();
        for c in word.chars() {
            buf.push(c);
            s.update_input(&buf, *t);
            *t += 100;
        }
    }

    #[test]
    fn test_bare_space_does_not_start() {
        let mut s = session("a b", SessionConfig::default());
        assert_eq!(s.submit_word(0), Feedback::Ignored);
        assert_eq!(s.phase(), Phase::Idle);
        assert!(s.events().is_empty());
    }

    #[test]
    fn test_first_char_starts_clock() {
        let mut s = session("ab", SessionConfig::default());
        s.update_input("a", 5_000);
        assert_eq!(s.start_time(), Some(5_000));
        assert_eq!(s.events()[0].t, 0);
        assert_eq!(s.phase(), Phase::Running);
    }

    #[test]
    fn test_words_mode_finishes_on_last_submit() {
        let mut s = session("ab cd", SessionConfig::default());
        let mut t = 0;
        type_word(&mut s, "ab", &mut t);
        assert_eq!(s.submit_word(t), Feedback::Submit { correct: true });
        type_word(&mut s, "cx", &mut t);
        assert_eq!(s.submit_word(t), Feedback::Submit { correct: false });
        assert!(s.is_finished());
        let r = s.result().unwrap();
        assert_eq!(r.reason, FinishReason::Completed);
        assert_eq!(r.chars.correct, 3);
        assert_eq!(r.chars.incorrect, 1);
    }

    #[test]
    fn test_exact_last_word_finishes_without_space() {
        let mut s = session("ab cd", SessionConfig::default());
        let mut t = 0;
        type_word(&mut s, "ab", &mut t);
        s.submit_word(t);
        type_word(&mut s, "cd", &mut t);
        assert!(s.is_finished());
        assert_eq!(s.history(), ["ab", "cd"]);
        let r = s.result().unwrap();
        assert_eq!(r.chars.spaces, 1);
        assert_eq!(r.chars.correct_spaces, 1);
        assert_eq!(r.accuracy, 100.0);
    }

    #[test]
    fn test_zen_never_auto_finishes() {
        let config = SessionConfig {
            mode: Mode::Zen,
            ..SessionConfig::default()
        };
        let mut s = session("", config);
        let mut t = 0;
        for w in ["one", "two", "three"] {
            type_word(&mut s, w, &mut t);
            assert_eq!(s.submit_word(t), Feedback::Submit { correct: true });
        }
        assert!(!s.is_finished());
        let r = s.finish(FinishReason::External, t);
        assert_eq!(r.accuracy, 100.0);
        assert_eq!(r.chars.correct, 11);
    }

    #[test]
    fn test_keypress_counters_survive_backspace() {
        let mut s = session("ab", SessionConfig::default());
        s.update_input("x", 0);
        s.update_input("", 100);
        s.update_input("a", 200);
        assert_eq!(s.keypresses(), KeypressCounts { correct: 1, incorrect: 1 });
        assert_eq!(s.events()[1].kind, EventKind::Delete);
    }

    #[test]
    fn test_time_mode_tick_finishes_at_limit() {
        let mut s = session("aa bb cc dd ee", SessionConfig::timed(2));
        let mut t = 0;
        type_word(&mut s, "aa", &mut t);
        s.submit_word(t);
        type_word(&mut s, "b", &mut t);
        assert_eq!(s.tick(1_000), Phase::Running);
        assert_eq!(s.tick(2_000), Phase::Finished);
        let r = s.result().unwrap();
        assert_eq!(r.reason, FinishReason::Time);
        assert_eq!(r.elapsed_ms, 2_000);
        assert_eq!(r.chars.missed, 0);
        assert_eq!(r.words.len(), 2);
    }

    #[test]
    fn test_stop_on_word_end_defers_to_submit() {
        let config = SessionConfig {
            stop_on_word_end: true,
            ..SessionConfig::timed(1)
        };
        let mut s = session("aaaa bb", config);
        s.update_input("a", 0);
        assert_eq!(s.tick(1_500), Phase::Running);
        s.update_input("aa", 1_600);
        assert!(!s.is_finished());
        s.submit_word(1_700);
        let r = s.result().unwrap();
        assert_eq!(r.reason, FinishReason::Time);
        assert_eq!(r.elapsed_ms, 1_000);
    }

    #[test]
    fn test_samples_respect_interval() {
        let mut s = session("a b c", SessionConfig::default());
        s.update_input("a", 0);
        s.tick(500);
        s.tick(1_000);
        s.tick(1_400);
        s.tick(2_000);
        assert_eq!(s.wpm_samples().len(), 2);
    }

    #[test]
    fn test_event_times_never_go_backwards() {
        let mut s = session("abc", SessionConfig::default());
        s.update_input("a", 1_000);
        s.update_input("ab", 900);
        assert_eq!(s.events()[1].t, 0);
    }

    #[test]
    fn test_finish_leaves_clock_and_buffer_alone() {
        let mut idle = session("ab", SessionConfig::default());
        let r = idle.finish(FinishReason::External, 4_000);
        assert_eq!(idle.start_time(), None);
        assert_eq!(r.elapsed_ms, 0);

        let mut s = session("caf\u{00E9} x", SessionConfig::default());
        s.update_input("cafe\u{0301}", 0);
        let r = s.finish(FinishReason::External, 1_000);
        assert_eq!(s.current_input(), "cafe\u{0301}");
        assert_eq!(s.start_time(), Some(0));
        assert_eq!(r.chars.correct, 4);
        assert_eq!(r.chars.incorrect, 0);
    }
}

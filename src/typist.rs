use crate::bijoy::Transliterator;
use crate::config::{InputMethod, SessionConfig};
use crate::metrics::{Feedback, FinishReason, LiveStats, Phase, Session, SessionResult, Timestamp};
use crate::prompt::Prompt;
use tracing::trace;

/// A physical key press as the host reports it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Space,
    Backspace,
    Enter,
    Left,
    Right,
    /// Anything else (modifiers, function keys). Only resets lookahead.
    Other,
}

impl Key {
    /// Maps a typed character the way a keyboard would deliver it.
    pub fn from_char(c: char) -> Self {
        match c {
            ' ' => Key::Space,
            '\u{8}' => Key::Backspace,
            '\n' | '\r' => Key::Enter,
            c => Key::Char(c),
        }
    }
}

/// Owns one attempt: the session, the word buffer and, for Bijoy, the
/// transliterator that sits between the keys and the buffer.
#[derive(Debug, Clone)]
pub struct Typist {
    session: Session,
    transliterator: Option<Transliterator>,
    buffer: String,
    cursor: usize,
}

impl Typist {
    pub fn new(prompt: Prompt, config: SessionConfig) -> Self {
        let transliterator = match config.input_method {
            InputMethod::Bijoy => Some(Transliterator::new()),
            InputMethod::Direct => None,
        };
        Self {
            session: Session::new(prompt, config),
            transliterator,
            buffer: String::new(),
            cursor: 0,
        }
    }

    pub fn press(&mut self, key: Key, now: Timestamp) -> Feedback {
        if self.session.is_finished() {
            return Feedback::Ignored;
        }
        if !matches!(key, Key::Char(_)) {
            self.reset_lookahead();
        }

        match key {
            Key::Char(c) => self.insert(c, now),
            Key::Space => {
                let feedback = self.session.submit_word(now);
                if feedback != Feedback::Ignored {
                    self.buffer.clear();
                    self.cursor = 0;
                }
                feedback
            }
            Key::Backspace => {
                // Submitted words are locked; only the live word shrinks.
                if self.cursor == 0 {
                    return Feedback::Ignored;
                }
                let at = byte_offset(&self.buffer, self.cursor - 1);
                self.buffer.remove(at);
                self.cursor -= 1;
                self.sync(now)
            }
            Key::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                Feedback::Ignored
            }
            Key::Right => {
                self.cursor = (self.cursor + 1).min(self.buffer.chars().count());
                Feedback::Ignored
            }
            Key::Enter | Key::Other => Feedback::Ignored,
        }
    }

    /// Presses each char of `keys`, `step_ms` apart starting at `start`.
    /// Returns the time after the last key.
    pub fn type_str(&mut self, keys: &str, start: Timestamp, step_ms: u64) -> Timestamp {
        let mut now = start;
        for c in keys.chars() {
            self.press(Key::from_char(c), now);
            now += step_ms;
        }
        now
    }

    pub fn tick(&mut self, now: Timestamp) -> Phase {
        let phase = self.session.tick(now);
        if phase == Phase::Finished {
            self.reset_lookahead();
        }
        phase
    }

    pub fn finish(&mut self, reason: FinishReason, now: Timestamp) -> SessionResult {
        self.reset_lookahead();
        self.session.finish(reason, now)
    }

    /// Back to a fresh attempt on the same prompt.
    pub fn reset(&mut self) {
        self.session.reset();
        self.reset_lookahead();
        self.buffer.clear();
        self.cursor = 0;
    }

    pub fn stats(&self, now: Timestamp) -> LiveStats {
        self.session.stats(now)
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn insert(&mut self, c: char, now: Timestamp) -> Feedback {
        let edit = self
            .transliterator
            .as_mut()
            .and_then(|t| t.handle_keystroke(c, &self.buffer, self.cursor));

        match edit {
            Some(edit) => {
                trace!(key = %c, text = %edit.text, "transliterated");
                self.buffer = edit.text;
                self.cursor = edit.cursor;
            }
            None => {
                let at = byte_offset(&self.buffer, self.cursor);
                self.buffer.insert(at, c);
                self.cursor += 1;
            }
        }
        self.sync(now)
    }

    fn sync(&mut self, now: Timestamp) -> Feedback {
        let feedback = self.session.update_input(&self.buffer, now);
        if matches!(feedback, Feedback::Submit { .. }) || self.session.is_finished() {
            self.buffer.clear();
            self.cursor = 0;
        }
        feedback
    }

    fn reset_lookahead(&mut self) {
        if let Some(t) = self.transliterator.as_mut() {
            t.reset();
        }
    }
}

fn byte_offset(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(b, _)| b)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backspace_cannot_reach_submitted_word() {
        let mut t = Typist::new(Prompt::from_text("ab cd ef"), SessionConfig::default());
        let now = t.type_str("ab ", 0, 100);
        assert_eq!(t.press(Key::Backspace, now), Feedback::Ignored);
        assert_eq!(t.session().history(), ["ab"]);
        assert_eq!(t.buffer(), "");
    }

    #[test]
    fn test_direct_mode_inserts_keys() {
        let mut t = Typist::new(Prompt::from_text("hello world"), SessionConfig::default());
        t.type_str("helo", 0, 100);
        t.press(Key::Left, 500);
        t.press(Key::Char('l'), 600);
        assert_eq!(t.buffer(), "hello");
        assert_eq!(t.session().current_input(), "hello");
    }

    #[test]
    fn test_mid_word_insert_counts_one_keypress() {
        let mut t = Typist::new(Prompt::from_text("hello world"), SessionConfig::default());
        t.type_str("helo", 0, 100);
        t.press(Key::Left, 500);
        t.press(Key::Char('l'), 600);

        // The stray 'o' was wrong when typed; the inserted 'l' is right.
        let k = t.session().keypresses();
        assert_eq!(k.correct + k.incorrect, 5);
        assert_eq!(k.incorrect, 1);

        let last = t.session().events().last().unwrap();
        assert_eq!(last.value.as_deref(), Some("l"));
        assert_eq!(last.text, "hello");
    }

    #[test]
    fn test_bijoy_mode_transliterates() {
        let config = SessionConfig::default().with_input_method(InputMethod::Bijoy);
        let mut t = Typist::new(Prompt::from_text("কি আম"), config);
        t.type_str("dj", 0, 100);
        assert_eq!(t.buffer(), "কি");
        t.press(Key::Space, 300);
        assert_eq!(t.session().history(), ["কি"]);
        t.type_str("gfm", 400, 100);
        assert!(t.session().is_finished());
        assert_eq!(t.session().result().unwrap().accuracy, 100.0);
    }
}

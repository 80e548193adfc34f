use super::table::{self, HALANT, PREFIX_KEY, REPH};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// What the previous keystroke left behind. Decides how the next one lands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum KeyState {
    #[default]
    Idle,
    /// The prefix key was pressed and nothing has been inserted yet.
    PendingVowelPrefix(char),
    /// A pre-base vowel sign was just typed on its own and is waiting for
    /// the consonant it belongs to.
    PreBaseVowel(char),
    /// A consonant was moved in front of this pre-base sign. The cursor sits
    /// after the sign; halant, phala, conjunct consonants and reph still
    /// belong in front of it.
    AttachedVowel(char),
}

/// New buffer contents and cursor (in chars) after a handled keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub text: String,
    pub cursor: usize,
}

/// Bijoy keystroke-to-Bengali state machine. One per text input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transliterator {
    state: KeyState,
    last_inserted: String,
}

impl Transliterator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget all context. Call on any key the engine did not see
    /// (backspace, space, enter, cursor moves).
    pub fn reset(&mut self) {
        self.state = KeyState::Idle;
        self.last_inserted.clear();
    }

    pub fn state(&self) -> KeyState {
        self.state
    }

    pub fn last_inserted(&self) -> &str {
        &self.last_inserted
    }

    /// Maps one key press against the current buffer.
    ///
    /// Returns `None` when the key is not part of the layout; the caller
    /// should then insert the key as typed. `cursor` counts chars and is
    /// clamped to the text.
    pub fn handle_keystroke(&mut self, key: char, text: &str, cursor: usize) -> Option<Edit> {
        let cursor = cursor.min(text.chars().count());

        if let KeyState::PendingVowelPrefix(prefix) = self.state {
            self.state = KeyState::Idle;
            if let Some(vowel) = table::lookup_pair(prefix, key) {
                trace!(prefix = %prefix, key = %key, vowel, "two-key vowel");
                self.last_inserted = vowel.to_string();
                return Some(splice(text, cursor, cursor, vowel));
            }
        }

        if key == PREFIX_KEY {
            return Some(self.prefix_key(text, cursor));
        }

        let Some(mapped) = table::lookup(key) else {
            self.reset();
            return None;
        };

        if mapped == REPH {
            if let Some(edit) = self.reposition_reph(text, cursor) {
                return Some(edit);
            }
        }

        if let Some(edit) = self.place_before_vowel_sign(mapped, text, cursor) {
            return Some(edit);
        }

        let edit = splice(text, cursor, cursor, mapped);
        let prev_was_halant = self.last_inserted == HALANT;
        self.state = match table::single_char(mapped) {
            Some(c) if table::is_pre_base_sign(c) && !prev_was_halant => KeyState::PreBaseVowel(c),
            _ => KeyState::Idle,
        };
        self.last_inserted = mapped.to_string();
        Some(edit)
    }

    fn prefix_key(&mut self, text: &str, cursor: usize) -> Edit {
        if !table::is_consonant_str(&self.last_inserted) {
            self.state = KeyState::PendingVowelPrefix(PREFIX_KEY);
            return Edit {
                text: text.to_string(),
                cursor,
            };
        }

        let edit = match self.attached_sign(text, cursor) {
            Some(sign) => {
                let mut edit = splice(text, cursor - 1, cursor - 1, HALANT);
                edit.cursor += 1;
                self.state = KeyState::AttachedVowel(sign);
                edit
            }
            None => {
                self.state = KeyState::Idle;
                splice(text, cursor, cursor, HALANT)
            }
        };
        self.last_inserted = HALANT.to_string();
        edit
    }

    /// `ক` + reph => `র্ক`. Also reaches past an attached pre-base sign.
    fn reposition_reph(&mut self, text: &str, cursor: usize) -> Option<Edit> {
        let sign = self.attached_sign(text, cursor);
        let base_end = if sign.is_some() { cursor - 1 } else { cursor };

        let consonant = char_before(text, base_end).filter(|&c| table::is_consonant(c))?;
        let mut unit = String::from(REPH);
        unit.push(consonant);

        let mut edit = splice(text, base_end - 1, base_end, &unit);
        if sign.is_some() {
            edit.cursor += 1;
        }
        self.last_inserted = consonant.to_string();
        self.state = match sign {
            Some(s) => KeyState::AttachedVowel(s),
            None => KeyState::Idle,
        };
        Some(edit)
    }

    /// Consonants (and phala after a consonant) go in front of a pre-base
    /// sign that is still waiting for them.
    fn place_before_vowel_sign(&mut self, mapped: &str, text: &str, cursor: usize) -> Option<Edit> {
        let is_consonant = table::is_consonant_str(mapped);

        let sign = match self.state {
            KeyState::PreBaseVowel(sign)
                if is_consonant && char_before(text, cursor) == Some(sign) =>
            {
                sign
            }
            KeyState::AttachedVowel(sign) if self.attached_sign(text, cursor).is_some() => {
                let after_halant = is_consonant && self.last_inserted == HALANT;
                let phala = mapped.starts_with(HALANT)
                    && table::is_consonant_str(&self.last_inserted);
                if !(after_halant || phala) {
                    return None;
                }
                sign
            }
            _ => return None,
        };

        trace!(sign = %sign, mapped, "reordering before pre-base sign");
        let mut edit = splice(text, cursor - 1, cursor - 1, mapped);
        edit.cursor += 1;
        self.state = KeyState::AttachedVowel(sign);
        self.last_inserted = mapped.to_string();
        Some(edit)
    }

    fn attached_sign(&self, text: &str, cursor: usize) -> Option<char> {
        match self.state {
            KeyState::AttachedVowel(sign) if char_before(text, cursor) == Some(sign) => Some(sign),
            _ => None,
        }
    }
}

fn char_before(text: &str, cursor: usize) -> Option<char> {
    if cursor == 0 {
        return None;
    }
    text.chars().nth(cursor - 1)
}

fn byte_offset(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(b, _)| b)
        .unwrap_or(text.len())
}

/// Replaces chars `from..to` with `insert`; cursor lands after the insert.
fn splice(text: &str, from: usize, to: usize, insert: &str) -> Edit {
    let start = byte_offset(text, from);
    let end = byte_offset(text, to);

    let mut out = String::with_capacity(text.len() + insert.len());
    out.push_str(&text[..start]);
    out.push_str(insert);
    out.push_str(&text[end..]);

    Edit {
        text: out,
        cursor: from + insert.chars().count(),
    }
}

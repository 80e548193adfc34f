use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

const ZWNJ: char = '\u{200C}';
const ZWJ: char = '\u{200D}';
const BENGALI_VIRAMA: char = '\u{09CD}';

/// Canonical composed form (NFC).
pub fn normalize(s: &str) -> String {
    s.nfc().collect()
}

/// How a session splits text into user-perceived characters.
///
/// A session picks one segmenter up front and keeps it; mixing the two
/// would count the same text differently at different points in the run.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, EnumString, Display, EnumIter, Serialize, Deserialize,
)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Segmenter {
    /// Extended grapheme clusters (UAX #29).
    #[default]
    Unicode,
    /// Code points, with combining marks, joiners and virama-linked
    /// consonants kept on the preceding base.
    Fallback,
}

impl Segmenter {
    pub fn split(self, s: &str) -> Vec<&str> {
        match self {
            Self::Unicode => s.graphemes(true).collect(),
            Self::Fallback => fallback_split(s),
        }
    }

    pub fn count(self, s: &str) -> usize {
        match self {
            Self::Unicode => s.graphemes(true).count(),
            Self::Fallback => fallback_split(s).len(),
        }
    }
}

fn is_bengali_consonant(c: char) -> bool {
    matches!(c, '\u{0995}'..='\u{09B9}' | '\u{09DC}'..='\u{09DF}' | '\u{09F0}' | '\u{09F1}')
}

fn fallback_split(s: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;

    for (idx, c) in s.char_indices() {
        let joins = match prev {
            None => false,
            Some(p) => {
                is_combining_mark(c)
                    || c == ZWJ
                    || c == ZWNJ
                    || p == ZWJ
                    || (p == BENGALI_VIRAMA && is_bengali_consonant(c))
            }
        };
        if prev.is_some() && !joins {
            out.push(&s[start..idx]);
            start = idx;
        }
        prev = Some(c);
    }
    if start < s.len() {
        out.push(&s[start..]);
    }
    out
}

/// Grapheme-for-grapheme equality after NFC.
pub fn graphemes_equal(a: &str, b: &str, seg: Segmenter) -> bool {
    let (a, b) = (normalize(a), normalize(b));
    seg.split(&a) == seg.split(&b)
}

/// True when `typed` could still grow into `expected`.
///
/// Used for the grapheme under the cursor: in Bengali a consonant is typed
/// before its vowel sign attaches, so "ক" is on its way to "কি". Pre-base
/// signs go the other way (typed first, base slotted in front), so a lone
/// run of marks matching the tail of `expected` counts too.
pub fn is_grapheme_prefix(typed: &str, expected: &str) -> bool {
    if typed.is_empty() {
        return false;
    }
    expected.starts_with(typed)
        || (typed.chars().all(is_combining_mark) && expected.ends_with(typed))
}

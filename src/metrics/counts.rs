use super::types::{CharCounts, Mode, Severity, WordResult};
use crate::consts::{SEVERITY_MAJOR, SEVERITY_MINOR};
use crate::text::{is_grapheme_prefix, Segmenter};

/// Inputs for one character-count pass. All strings are NFC already.
pub struct Tally<'a> {
    pub prompt: &'a [String],
    pub history: &'a [String],
    /// Word in progress. Ignored when empty.
    pub current: &'a str,
    pub mode: Mode,
    pub finished: bool,
    /// Words submitted with the space key.
    pub spaces: usize,
    pub segmenter: Segmenter,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct WordCounts {
    correct: usize,
    incorrect: usize,
    extra: usize,
    missed: usize,
}

impl Tally<'_> {
    pub fn run(&self) -> (CharCounts, Vec<WordResult>) {
        let mut entries: Vec<&str> = self.history.iter().map(String::as_str).collect();
        let has_current = !self.current.is_empty();
        if has_current {
            entries.push(self.current);
        }

        let last = entries.len().saturating_sub(1);
        let mut totals = CharCounts {
            spaces: self.spaces,
            ..Default::default()
        };
        let mut words = Vec::with_capacity(entries.len());

        for (i, typed) in entries.iter().enumerate() {
            let expected = self.expected_at(i, typed);
            let open = has_current && i == last && !self.finished;
            let count_missed = !open && !(self.finished && self.mode == Mode::Time && i == last);

            let wc = self.compare(typed, expected, open, count_missed);
            totals.correct += wc.correct;
            totals.incorrect += wc.incorrect;
            totals.extra += wc.extra;
            totals.missed += wc.missed;

            if !open && *typed == expected {
                totals.correct_word_chars += wc.correct;
                if i < self.spaces {
                    totals.correct_spaces += 1;
                }
            }

            let expected_len = self.segmenter.count(expected);
            words.push(WordResult {
                expected: expected.to_string(),
                typed: typed.to_string(),
                correct: wc.correct,
                incorrect: wc.incorrect,
                extra: wc.extra,
                missed: wc.missed,
                severity: severity(wc.incorrect + wc.extra + wc.missed, expected_len),
            });
        }

        (totals, words)
    }

    fn expected_at<'b>(&'b self, i: usize, typed: &'b str) -> &'b str {
        match self.mode {
            Mode::Zen => typed,
            _ => self.prompt.get(i).map(String::as_str).unwrap_or(""),
        }
    }

    fn compare(&self, typed: &str, expected: &str, open: bool, count_missed: bool) -> WordCounts {
        let t = self.segmenter.split(typed);
        let e = self.segmenter.split(expected);
        let mut wc = WordCounts::default();

        for (i, (tg, eg)) in t.iter().zip(e.iter()).enumerate() {
            // The grapheme under the cursor may still be growing.
            let growing = open && i + 1 == t.len() && is_grapheme_prefix(tg, eg);
            if tg == eg || growing {
                wc.correct += 1;
            } else {
                wc.incorrect += 1;
            }
        }

        if t.len() > e.len() {
            wc.extra = t.len() - e.len();
        } else if count_missed {
            wc.missed = e.len() - t.len();
        }
        wc
    }
}

/// 0 = clean, 1 = a slip, 2 = rough, 3 = mangled.
pub fn severity(mistakes: usize, expected_len: usize) -> Severity {
    if mistakes == 0 {
        return Severity(0);
    }
    let ratio = mistakes as f64 / expected_len.max(1) as f64;
    let (minor_ratio, minor_max) = SEVERITY_MINOR;
    let (major_ratio, major_max) = SEVERITY_MAJOR;

    if ratio <= minor_ratio && mistakes <= minor_max {
        Severity(1)
    } else if ratio <= major_ratio && mistakes <= major_max {
        Severity(2)
    } else {
        Severity(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn words(ws: &[&str]) -> Vec<String> {
        ws.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_severity_levels() {
        assert_eq!(severity(0, 5), Severity(0));
        assert_eq!(severity(1, 5), Severity(1));
        assert_eq!(severity(1, 4), Severity(2)); // 0.25 > 0.2
        assert_eq!(severity(3, 10), Severity(2));
        assert_eq!(severity(4, 10), Severity(3)); // too many
        assert_eq!(severity(1, 0), Severity(3)); // ratio 1.0
    }

    #[test]
    fn test_open_word_has_no_missed() {
        let prompt = words(&["hello", "world"]);
        let history = words(&["hello"]);
        let tally = Tally {
            prompt: &prompt,
            history: &history,
            current: "wo",
            mode: Mode::Words,
            finished: false,
            spaces: 1,
            segmenter: Segmenter::Unicode,
        };
        let (c, ws) = tally.run();
        assert_eq!(c.correct, 7);
        assert_eq!(c.missed, 0);
        assert_eq!(c.correct_word_chars, 5);
        assert_eq!(c.correct_spaces, 1);
        assert_eq!(ws.len(), 2);
    }

    #[test]
    fn test_extra_and_incorrect() {
        let prompt = words(&["cat"]);
        let history = words(&["cbtxx"]);
        let tally = Tally {
            prompt: &prompt,
            history: &history,
            current: "",
            mode: Mode::Words,
            finished: true,
            spaces: 1,
            segmenter: Segmenter::Unicode,
        };
        let (c, ws) = tally.run();
        assert_eq!((c.correct, c.incorrect, c.extra, c.missed), (2, 1, 2, 0));
        assert_eq!(c.correct_word_chars, 0);
        assert_eq!(ws[0].severity, Severity(3));
    }

    #[test]
    fn test_growing_bengali_grapheme_is_not_an_error() {
        let prompt = words(&["কি"]);
        let tally = Tally {
            prompt: &prompt,
            history: &[],
            current: "ক",
            mode: Mode::Words,
            finished: false,
            spaces: 0,
            segmenter: Segmenter::Unicode,
        };
        let (c, _) = tally.run();
        assert_eq!((c.correct, c.incorrect), (1, 0));
    }

    #[test]
    fn test_zen_compares_against_itself() {
        let history = words(&["anything", "goes"]);
        let tally = Tally {
            prompt: &[],
            history: &history,
            current: "",
            mode: Mode::Zen,
            finished: true,
            spaces: 2,
            segmenter: Segmenter::Unicode,
        };
        let (c, _) = tally.run();
        assert_eq!(c.incorrect + c.extra + c.missed, 0);
        assert_eq!(c.correct, 12);
    }
}

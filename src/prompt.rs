use crate::error::{KeyRaceError, KrResult};
use crate::text::normalize;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// The ordered target words of one attempt, NFC-normalized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    words: Vec<String>,
}

impl Prompt {
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .flat_map(|w| {
                w.as_ref()
                    .split_whitespace()
                    .map(normalize)
                    .collect::<Vec<_>>()
            })
            .collect();
        Self { words }
    }

    pub fn from_text(text: &str) -> Self {
        Self::new(text.split_whitespace())
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> KrResult<Self> {
        let content = fs::read_to_string(&path)?;
        let prompt = Self::from_text(&content);
        if prompt.is_empty() {
            return Err(KeyRaceError::Validation(format!(
                "prompt file '{}' has no words",
                path.as_ref().display()
            )));
        }
        info!(
            "Loaded prompt '{}' ({} words)",
            path.as_ref().display(),
            prompt.len()
        );
        Ok(prompt)
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn get(&self, i: usize) -> Option<&str> {
        self.words.get(i).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_splits_and_normalizes() {
        let p = Prompt::new(["the quick", " fox ", "", "cafe\u{0301}"]);
        assert_eq!(p.words(), ["the", "quick", "fox", "caf\u{00E9}"]);
    }

    #[test]
    fn test_empty_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.txt");
        fs::write(&path, "  \n ").unwrap();
        assert!(matches!(
            Prompt::load_from_file(&path),
            Err(KeyRaceError::Validation(_))
        ));
    }
}

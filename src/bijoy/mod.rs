// Bijoy input method: Latin key presses in, Bengali Unicode out.
pub mod engine;
pub mod table;

pub use self::engine::{Edit, KeyState, Transliterator};

/// Runs a whole key string through a fresh engine, inserting unmapped
/// keys as typed. Handy for tests and the `transliterate` command.
pub fn transliterate(keys: &str) -> String {
    let mut engine = Transliterator::new();
    let mut text = String::new();
    let mut cursor = 0;

    for key in keys.chars() {
        match engine.handle_keystroke(key, &text, cursor) {
            Some(edit) => {
                text = edit.text;
                cursor = edit.cursor;
            }
            None => {
                let at = text
                    .char_indices()
                    .nth(cursor)
                    .map(|(b, _)| b)
                    .unwrap_or(text.len());
                text.insert(at, key);
                cursor += 1;
            }
        }
    }
    text
}

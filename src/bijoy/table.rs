//! Fixed Bijoy key tables. Immutable and shared by every engine instance.

/// Hasanta / virama. Joins the consonant before it with the next one.
pub const HALANT: &str = "\u{09CD}";

/// Reph: the "র্" that belongs after a cluster but is drawn over it.
pub const REPH: &str = "র্";

/// The key that means "halant" after a consonant and starts a two-key
/// vowel everywhere else.
pub const PREFIX_KEY: char = 'g';

/// Vowel signs drawn to the left of the consonant they follow.
pub const PRE_BASE_SIGNS: [char; 3] = ['ি', 'ে', 'ৈ'];

const CONSONANTS: [char; 36] = [
    'ক', 'খ', 'গ', 'ঘ', 'ঙ', 'চ', 'ছ', 'জ', 'ঝ', 'ঞ', 'ট', 'ঠ', 'ড', 'ঢ', 'ণ', 'ত', 'থ', 'দ', 'ধ',
    'ন', 'প', 'ফ', 'ব', 'ভ', 'ম', 'য', 'র', 'ল', 'শ', 'ষ', 'স', 'হ', 'ৎ',
    // Nukta letters: ড়, ঢ়, য়
    '\u{09DC}', '\u{09DD}', '\u{09DF}',
];

/// Single-key map. `None` means the key is not part of the layout.
pub fn lookup(key: char) -> Option<&'static str> {
    let s = match key {
        // Consonants
        'j' => "ক",
        'J' => "খ",
        'o' => "গ",
        'O' => "ঘ",
        'q' => "ঙ",
        'y' => "চ",
        'Y' => "ছ",
        'u' => "জ",
        'U' => "ঝ",
        'I' => "ঞ",
        't' => "ট",
        'T' => "ঠ",
        'e' => "ড",
        'E' => "ঢ",
        'B' => "ণ",
        'k' => "ত",
        'K' => "থ",
        'l' => "দ",
        'L' => "ধ",
        'b' => "ন",
        'r' => "প",
        'R' => "ফ",
        'h' => "ব",
        'H' => "ভ",
        'm' => "ম",
        'w' => "য",
        'W' => "\u{09DF}",
        'v' => "র",
        'V' => "ল",
        'M' => "শ",
        'N' => "ষ",
        'n' => "স",
        'i' => "হ",
        'p' => "\u{09DC}",
        'P' => "\u{09DD}",
        '\\' => "ৎ",

        // Dependent vowel signs
        'f' => "া",
        'd' => "ি",
        'D' => "ী",
        's' => "ু",
        'S' => "ূ",
        'a' => "ৃ",
        'c' => "ে",
        'C' => "ৈ",
        'x' => "ো",
        'X' => "ৌ",

        // Marks and phala
        'Q' => "ং",
        '|' => "ঃ",
        '&' => "ঁ",
        'Z' => "্য",
        'z' => "্র",
        'A' => REPH,
        'G' => "।",
        'F' => "অ",

        // Digits
        '0' => "০",
        '1' => "১",
        '2' => "২",
        '3' => "৩",
        '4' => "৪",
        '5' => "৫",
        '6' => "৬",
        '7' => "৭",
        '8' => "৮",
        '9' => "৯",

        _ => return None,
    };
    Some(s)
}

/// Two-key vowels, all introduced by `PREFIX_KEY`.
pub fn lookup_pair(prefix: char, key: char) -> Option<&'static str> {
    if prefix != PREFIX_KEY {
        return None;
    }
    let s = match key {
        'f' => "আ",
        'd' => "ই",
        'D' => "ঈ",
        's' => "উ",
        'S' => "ঊ",
        'a' => "ঋ",
        'c' => "এ",
        'C' => "ঐ",
        'x' => "ও",
        'X' => "ঔ",
        _ => return None,
    };
    Some(s)
}

pub fn is_consonant(c: char) -> bool {
    CONSONANTS.contains(&c)
}

/// A mapped string counts as a consonant when it is exactly one consonant.
pub fn is_consonant_str(s: &str) -> bool {
    let mut chars = s.chars();
    matches!((chars.next(), chars.next()), (Some(c), None) if is_consonant(c))
}

pub fn is_pre_base_sign(c: char) -> bool {
    PRE_BASE_SIGNS.contains(&c)
}

pub fn single_char(s: &str) -> Option<char> {
    let mut chars = s.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_mapped_consonant_is_in_the_set() {
        for key in "jJoOqyYuUItTeEBkKlLbrRhHmwWvVMNnipP\\".chars() {
            let mapped = lookup(key).unwrap();
            assert!(is_consonant_str(mapped), "{key} -> {mapped} not a consonant");
        }
    }

    #[test]
    fn test_signs_are_not_consonants() {
        for key in "fdDsSacCxXQZzAG".chars() {
            assert!(!is_consonant_str(lookup(key).unwrap()), "{key}");
        }
    }

    #[test]
    fn test_pairs_only_after_prefix() {
        assert_eq!(lookup_pair('g', 'f'), Some("আ"));
        assert_eq!(lookup_pair('g', 'j'), None);
        assert_eq!(lookup_pair('h', 'f'), None);
    }

    #[test]
    fn test_prefix_key_is_not_in_single_map() {
        assert_eq!(lookup(PREFIX_KEY), None);
        assert_eq!(lookup(','), None);
    }
}

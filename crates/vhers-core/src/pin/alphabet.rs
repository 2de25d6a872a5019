//! Character sets that PINs are drawn from.
//!
//! Both presets drop glyphs that are easy to confuse when a PIN is read off
//! a printed letter (`0`/`O`, `1`/`I`, and for lowercase also `l`).

/// Default alphabet: digits and uppercase letters without `0`, `1`, `I`, `O`.
pub const UPPERCASE_ALPHABET: &str = "ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Lowercase alphabet: digits and lowercase letters without `0`, `1`, `i`,
/// `l`, `o`.
pub const LOWERCASE_ALPHABET: &str = "abcdefghjkmnpqrstuvwxyz23456789";

/// The set of characters a PIN may contain.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Alphabet {
    /// [`UPPERCASE_ALPHABET`] (default).
    #[default]
    Uppercase,
    /// [`LOWERCASE_ALPHABET`].
    Lowercase,
    /// Caller-supplied characters. Duplicates are ignored; an empty string
    /// stays empty and is rejected by the generator.
    Custom(String),
}

impl Alphabet {
    /// Returns the distinct characters of this alphabet in first-seen order.
    pub fn chars(&self) -> Vec<char> {
        let source = match self {
            Self::Uppercase => UPPERCASE_ALPHABET,
            Self::Lowercase => LOWERCASE_ALPHABET,
            Self::Custom(s) => s.as_str(),
        };
        let mut out: Vec<char> = Vec::with_capacity(source.len());
        for c in source.chars() {
            if !out.contains(&c) {
                out.push(c);
            }
        }
        out
    }

    /// Number of distinct characters available.
    pub fn size(&self) -> usize {
        self.chars().len()
    }
}

/// Returns `true` when `alphabet_size ^ length >= quantity`, i.e. when
/// `quantity` distinct strings of `length` characters can exist at all.
///
/// Overflow of the power means the keyspace dwarfs any `usize` quantity.
pub(crate) fn keyspace_fits(alphabet_size: usize, length: usize, quantity: usize) -> bool {
    let needed = quantity as u128;
    let base = alphabet_size as u128;
    if base <= 1 {
        // 0^n = 0 and 1^n = 1 for every n >= 1.
        return base >= needed;
    }
    let Ok(exp) = u32::try_from(length) else {
        return true;
    };
    base.checked_pow(exp).is_none_or(|keyspace| keyspace >= needed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_exclude_look_alikes() {
        for c in ['0', '1', 'I', 'O'] {
            assert!(!UPPERCASE_ALPHABET.contains(c), "uppercase contains {c}");
        }
        for c in ['0', '1', 'i', 'l', 'o'] {
            assert!(!LOWERCASE_ALPHABET.contains(c), "lowercase contains {c}");
        }
        assert_eq!(Alphabet::Uppercase.size(), 32);
        assert_eq!(Alphabet::Lowercase.size(), 31);
    }

    #[test]
    fn custom_alphabet_drops_duplicates() {
        let a = Alphabet::Custom("AABBA".to_owned());
        assert_eq!(a.chars(), vec!['A', 'B']);
        assert_eq!(a.size(), 2);
    }

    #[test]
    fn empty_custom_alphabet_stays_empty() {
        assert_eq!(Alphabet::Custom(String::new()).size(), 0);
    }

    #[test]
    fn keyspace_checks() {
        assert!(keyspace_fits(2, 3, 8));
        assert!(!keyspace_fits(2, 3, 9));
        assert!(!keyspace_fits(0, 8, 1));
        assert!(keyspace_fits(1, 5, 1));
        assert!(!keyspace_fits(1, 5, 2));
        assert!(keyspace_fits(32, 64, usize::MAX));
    }
}

//! Memorable mode - one dictionary word followed by a digit run.

use rand::Rng;

use crate::wordlist::choose_word;

/// Fewest digits appended to the word.
pub const MIN_SUFFIX_DIGITS: usize = 2;

/// Most digits appended to the word.
pub const MAX_SUFFIX_DIGITS: usize = 12;

// Length share reserved for the word itself.
const WORD_BUDGET: usize = 8;

/// Number of digits appended for a requested password length.
///
/// Non-decreasing in `password_length`.
pub fn suffix_width(password_length: usize) -> usize {
    password_length
        .saturating_sub(WORD_BUDGET)
        .clamp(MIN_SUFFIX_DIGITS, MAX_SUFFIX_DIGITS)
}

pub(super) fn generate<R: Rng + ?Sized>(password_length: usize, rng: &mut R) -> String {
    let word = capitalize(&choose_word(rng));
    let digits: String = (0..suffix_width(password_length))
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect();

    format!("{word}{digits}")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_suffix_width_bounds() {
        assert_eq!(suffix_width(1), MIN_SUFFIX_DIGITS);
        assert_eq!(suffix_width(10), MIN_SUFFIX_DIGITS);
        assert_eq!(suffix_width(16), 8);
        assert_eq!(suffix_width(128), MAX_SUFFIX_DIGITS);
    }

    #[test]
    fn test_suffix_width_is_monotonic() {
        for length in 1..128 {
            assert!(suffix_width(length + 1) >= suffix_width(length), "length {length}");
        }
    }

    #[test]
    fn test_generate_shape() {
        let mut rng = StdRng::seed_from_u64(21);
        for length in [1, 8, 16, 64] {
            let pwd = generate(length, &mut rng);
            let split = pwd
                .find(|c: char| c.is_ascii_digit())
                .expect("memorable password has a digit run");
            let (word, digits) = pwd.split_at(split);

            assert!(!word.is_empty());
            assert!(word.chars().all(char::is_alphabetic));
            assert!(word.chars().next().is_some_and(char::is_uppercase));
            assert_eq!(digits.len(), suffix_width(length));
            assert!(digits.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("maple"), "Maple");
        assert_eq!(capitalize(""), "");
    }
}

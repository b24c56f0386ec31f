//! Character-class mode - uniform draws from the enabled classes.

use rand::Rng;
use rand::seq::SliceRandom;

use crate::settings::PasswordSettings;

/// Returns the usable alphabet: enabled classes concatenated in canonical
/// order (lowercase, uppercase, numbers, symbols).
pub fn alphabet(settings: &PasswordSettings) -> Vec<char> {
    settings
        .enabled_classes()
        .flat_map(|class| class.characters().chars())
        .collect()
}

/// Draws `password_length` characters independently from the alphabet.
///
/// Returns an empty string when no class is enabled.
pub(super) fn generate<R: Rng + ?Sized>(settings: &PasswordSettings, rng: &mut R) -> String {
    let alphabet = alphabet(settings);
    if alphabet.is_empty() {
        #[cfg(feature = "tracing")]
        tracing::debug!("no character class enabled, returning empty password");
        return String::new();
    }

    (0..settings.password_length)
        .filter_map(|_| alphabet.choose(rng).copied())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::CharacterClass;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn only(classes: &[CharacterClass]) -> PasswordSettings {
        CharacterClass::ALL.into_iter().fold(PasswordSettings::default(), |s, class| {
            s.with_class(class, classes.contains(&class))
        })
    }

    #[test]
    fn test_alphabet_canonical_order() {
        let settings = only(&[CharacterClass::Numbers, CharacterClass::Lowercase]);
        let alphabet: String = alphabet(&settings).into_iter().collect();
        assert_eq!(alphabet, "abcdefghijklmnopqrstuvwxyz0123456789");
    }

    #[test]
    fn test_generate_exact_length_for_every_class_combination() {
        let mut rng = StdRng::seed_from_u64(42);

        for mask in 1u8..16 {
            let classes: Vec<_> = CharacterClass::ALL
                .into_iter()
                .enumerate()
                .filter(|(i, _)| mask & (1 << i) != 0)
                .map(|(_, class)| class)
                .collect();
            let settings = only(&classes).with_length(24);

            let pwd = generate(&settings, &mut rng);
            assert_eq!(pwd.chars().count(), 24, "mask {mask:#06b}");
            assert!(
                pwd.chars().all(|c| classes.iter().any(|class| class.contains(c))),
                "mask {mask:#06b} produced {pwd:?}"
            );
        }
    }

    #[test]
    fn test_generate_no_class_enabled_returns_empty() {
        let mut rng = StdRng::seed_from_u64(1);
        for length in [1, 16, 128] {
            let settings = only(&[]).with_length(length);
            assert_eq!(generate(&settings, &mut rng), "");
        }
    }

    #[test]
    fn test_generate_single_class() {
        let mut rng = StdRng::seed_from_u64(3);
        let settings = only(&[CharacterClass::Symbols]).with_length(50);
        let pwd = generate(&settings, &mut rng);
        assert!(pwd.chars().all(|c| CharacterClass::Symbols.contains(c)));
    }

    #[test]
    fn test_generate_minimum_length() {
        let mut rng = StdRng::seed_from_u64(5);
        let settings = PasswordSettings::default().with_length(1);
        assert_eq!(generate(&settings, &mut rng).chars().count(), 1);
    }

    #[test]
    fn test_generate_draws_follow_rng_sequence() {
        let settings = only(&[CharacterClass::Lowercase, CharacterClass::Numbers]).with_length(32);
        let first = generate(&settings, &mut StdRng::seed_from_u64(77));
        let second = generate(&settings, &mut StdRng::seed_from_u64(77));
        assert_eq!(first, second);
        assert_eq!(first.chars().count(), 32);
    }

    #[test]
    fn test_generate_uses_whole_alphabet() {
        let mut rng = StdRng::seed_from_u64(9);
        let settings = only(&[CharacterClass::Numbers]).with_length(128);
        let pwd = generate(&settings, &mut rng);
        let distinct: std::collections::HashSet<char> = pwd.chars().collect();
        assert_eq!(distinct.len(), 10);
    }
}

//! Generation settings - the constraints a password is generated under.

use serde::{Deserialize, Serialize};

/// Shortest password the settings allow.
pub const MIN_PASSWORD_LENGTH: usize = 1;

/// Longest password the settings allow.
pub const MAX_PASSWORD_LENGTH: usize = 128;

const DEFAULT_PASSWORD_LENGTH: usize = 16;

/// Generation strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Mode {
    /// One dictionary word followed by a run of digits.
    Memorable,
    /// Characters drawn uniformly from the enabled character classes.
    AllCharacters,
}

/// A group of characters that can be enabled for `Mode::AllCharacters`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CharacterClass {
    Lowercase,
    Uppercase,
    Numbers,
    Symbols,
}

impl CharacterClass {
    /// Canonical order used when building an alphabet.
    pub const ALL: [CharacterClass; 4] = [
        CharacterClass::Lowercase,
        CharacterClass::Uppercase,
        CharacterClass::Numbers,
        CharacterClass::Symbols,
    ];

    /// The characters belonging to this class.
    pub fn characters(self) -> &'static str {
        match self {
            CharacterClass::Lowercase => "abcdefghijklmnopqrstuvwxyz",
            CharacterClass::Uppercase => "ABCDEFGHIJKLMNOPQRSTUVWXYZ",
            CharacterClass::Numbers => "0123456789",
            CharacterClass::Symbols => "!@#$%^&*()_+-=[]{}|;:,.<>?~",
        }
    }

    pub fn contains(self, c: char) -> bool {
        self.characters().contains(c)
    }
}

/// Immutable description of how a password is generated.
///
/// Serialized in camelCase so a persisted value reads
/// `{"passwordLength":16,"mode":"allCharacters","withLowercase":true,...}`.
/// Missing fields fall back to [`PasswordSettings::default`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PasswordSettings {
    pub password_length: usize,
    pub mode: Mode,
    pub with_lowercase: bool,
    pub with_uppercase: bool,
    pub with_numbers: bool,
    pub with_symbols: bool,
}

impl Default for PasswordSettings {
    fn default() -> Self {
        Self {
            password_length: DEFAULT_PASSWORD_LENGTH,
            mode: Mode::AllCharacters,
            with_lowercase: true,
            with_uppercase: true,
            with_numbers: true,
            with_symbols: true,
        }
    }
}

impl PasswordSettings {
    /// Returns a copy with the length set, clamped to the allowed range.
    pub fn with_length(self, password_length: usize) -> Self {
        Self {
            password_length: password_length.clamp(MIN_PASSWORD_LENGTH, MAX_PASSWORD_LENGTH),
            ..self
        }
    }

    pub fn with_mode(self, mode: Mode) -> Self {
        Self { mode, ..self }
    }

    /// Returns a copy with one character class switched on or off.
    pub fn with_class(mut self, class: CharacterClass, enabled: bool) -> Self {
        match class {
            CharacterClass::Lowercase => self.with_lowercase = enabled,
            CharacterClass::Uppercase => self.with_uppercase = enabled,
            CharacterClass::Numbers => self.with_numbers = enabled,
            CharacterClass::Symbols => self.with_symbols = enabled,
        }
        self
    }

    /// Whether `class` is enabled. Only meaningful in `Mode::AllCharacters`.
    pub fn includes(&self, class: CharacterClass) -> bool {
        match class {
            CharacterClass::Lowercase => self.with_lowercase,
            CharacterClass::Uppercase => self.with_uppercase,
            CharacterClass::Numbers => self.with_numbers,
            CharacterClass::Symbols => self.with_symbols,
        }
    }

    /// Enabled classes in canonical order.
    pub fn enabled_classes(&self) -> impl Iterator<Item = CharacterClass> + '_ {
        CharacterClass::ALL
            .into_iter()
            .filter(move |class| self.includes(*class))
    }

    pub fn has_any_class(&self) -> bool {
        self.enabled_classes().next().is_some()
    }

    /// Brings a restored value back inside the length bounds.
    pub fn normalized(self) -> Self {
        self.with_length(self.password_length)
    }
}

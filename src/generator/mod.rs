//! Password generator - maps settings to a fresh password.
//!
//! Each mode lives in its own module.

mod charset;
mod memorable;

use rand::Rng;
use rand::rngs::OsRng;
use secrecy::SecretString;

use crate::settings::{Mode, PasswordSettings};

pub use charset::alphabet;
pub use memorable::suffix_width;

/// Generates a password for `settings` using the operating system RNG.
///
/// Never fails: an `AllCharacters` configuration with no class enabled
/// yields an empty password.
pub fn generate(settings: &PasswordSettings) -> SecretString {
    generate_with_rng(settings, &mut OsRng)
}

/// Same as [`generate`] with a caller-provided random source.
pub fn generate_with_rng<R: Rng + ?Sized>(settings: &PasswordSettings, rng: &mut R) -> SecretString {
    let password = match settings.mode {
        Mode::Memorable => memorable::generate(settings.password_length, rng),
        Mode::AllCharacters => charset::generate(settings, rng),
    };

    #[cfg(feature = "tracing")]
    tracing::debug!("generated {:?} password of {} chars", settings.mode, password.chars().count());

    SecretString::new(password.into())
}

//! Password generation library
//!
//! This library generates passwords under user-selected constraints and
//! keeps a strength score for the current password up to date without
//! scoring every keystroke.
//!
//! # Features
//!
//! - `async` (default): Enables the debounce scheduler, the strength
//!   evaluator and the controller
//! - `tracing`: Enables logging via tracing crate
//!
//! # Environment Variables
//!
//! - `PWD_DEBOUNCE_MS`: Quiet period before a changed password is scored
//!   (default: `300`)
//! - `PWD_SETTINGS_PATH`: JSON file used by [`JsonFileStore`]
//!   (default: `./pwd-settings.json`)
//! - `PWD_WORDLIST_PATH`: Optional word list for memorable passwords
//!   (default: bundled list)
//!
//! # Example
//!
//! ```rust,no_run
//! use pwd_generator::{generate, Mode, PasswordSettings};
//! use secrecy::ExposeSecret;
//!
//! let settings = PasswordSettings::default().with_length(20);
//! let password = generate(&settings);
//! println!("{}", password.expose_secret());
//!
//! let memorable = generate(&settings.with_mode(Mode::Memorable));
//! println!("{}", memorable.expose_secret());
//! ```
//!
//! With the `async` feature, a [`PasswordController`] ties everything
//! together:
//!
//! ```rust,no_run
//! # #[cfg(feature = "async")]
//! # async fn run() {
//! use pwd_generator::{Config, JsonFileStore, PasswordController, ZxcvbnScorer};
//!
//! let mut controller = PasswordController::new(
//!     ZxcvbnScorer::new(),
//!     JsonFileStore::from_env(),
//!     Config::from_env(),
//! );
//! let mut scores = controller.subscribe_score();
//!
//! controller.regenerate();
//! scores.changed().await.ok();
//! println!("Score: {:?}", controller.score());
//! # }
//! ```

mod config;
mod generator;
mod score;
mod scorer;
mod settings;
mod store;
mod wordlist;

#[cfg(feature = "async")]
mod controller;
#[cfg(feature = "async")]
mod debounce;
#[cfg(feature = "async")]
mod evaluator;

// Public API
pub use config::{Config, DEBOUNCE_ENV, DEFAULT_DEBOUNCE, get_debounce_period};
pub use generator::{alphabet, generate, generate_with_rng, suffix_width};
pub use score::{StrengthScore, StrengthTier};
pub use scorer::{ScorerError, StrengthScorer, ZxcvbnScorer};
pub use settings::{CharacterClass, MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH, Mode, PasswordSettings};
pub use store::{
    HIDDEN_KEY, JsonFileStore, MemoryStore, SETTINGS_KEY, SETTINGS_PATH_ENV, SettingsStore,
    StoreError, get_settings_path,
};
pub use wordlist::{
    WORDLIST_PATH_ENV, WordlistError, bundled_words, get_wordlist_path, init_wordlist,
    init_wordlist_from_path,
};

#[cfg(feature = "async")]
pub use controller::PasswordController;
#[cfg(feature = "async")]
pub use debounce::{DebounceState, Debouncer};
#[cfg(feature = "async")]
pub use evaluator::{EvaluationOutcome, StrengthEvaluator};

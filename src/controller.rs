//! Controller - owns the current settings, password and display flags and
//! drives the generator and the strength evaluator.

use secrecy::{ExposeSecret, SecretString};
use tokio::sync::watch;

use crate::config::Config;
use crate::evaluator::StrengthEvaluator;
use crate::generator::generate;
use crate::score::StrengthScore;
use crate::scorer::StrengthScorer;
use crate::settings::PasswordSettings;
use crate::store::{HIDDEN_KEY, SETTINGS_KEY, SettingsStore};

/// State behind a password generator view.
///
/// Every command runs to completion on the caller's task; only scoring is
/// asynchronous. Must be created inside a tokio runtime.
pub struct PasswordController<S, P> {
    settings: PasswordSettings,
    password: SecretString,
    copied: bool,
    hidden: bool,
    store: P,
    evaluator: StrengthEvaluator<S>,
}

impl<S, P> PasswordController<S, P>
where
    S: StrengthScorer + 'static,
    P: SettingsStore,
{
    /// Restores settings (or defaults), generates a first password and
    /// scores it immediately.
    pub fn new(scorer: S, store: P, config: Config) -> Self {
        let settings = store
            .get(SETTINGS_KEY, PasswordSettings::default())
            .normalized();
        let hidden = store.get(HIDDEN_KEY, false);
        let password = generate(&settings);
        let evaluator = StrengthEvaluator::start(
            scorer,
            SecretString::new(password.expose_secret().into()),
            config.debounce,
        );

        #[cfg(feature = "tracing")]
        tracing::info!("password controller ready: {:?}", settings);

        Self {
            settings,
            password,
            copied: false,
            hidden,
            store,
            evaluator,
        }
    }

    pub fn settings(&self) -> &PasswordSettings {
        &self.settings
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    pub fn score(&self) -> Option<StrengthScore> {
        self.evaluator.score()
    }

    pub fn subscribe_score(&self) -> watch::Receiver<Option<StrengthScore>> {
        self.evaluator.subscribe()
    }

    pub fn evaluator(&self) -> &StrengthEvaluator<S> {
        &self.evaluator
    }

    pub fn is_copied(&self) -> bool {
        self.copied
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Applies new settings: persists them and regenerates the password.
    ///
    /// Unchanged settings are a no-op.
    pub fn update_settings(&mut self, settings: PasswordSettings) {
        let settings = settings.normalized();
        if settings == self.settings {
            return;
        }
        self.settings = settings;
        self.persist(SETTINGS_KEY, &settings);
        self.regenerate();
    }

    /// Generates a new password with the current settings.
    pub fn regenerate(&mut self) {
        let password = generate(&self.settings);
        self.replace_password(password);
    }

    /// Replaces the password with user input, bypassing the generator.
    pub fn edit_password(&mut self, password: SecretString) {
        self.replace_password(password);
    }

    /// Records that the current password was copied to the clipboard.
    pub fn mark_copied(&mut self) {
        self.copied = true;
    }

    /// Flips the hidden flag, persists it and returns the new value.
    pub fn toggle_hidden(&mut self) -> bool {
        self.hidden = !self.hidden;
        self.persist(HIDDEN_KEY, &self.hidden);
        self.hidden
    }

    pub fn shutdown(&self) {
        self.evaluator.shutdown();
    }

    fn replace_password(&mut self, password: SecretString) {
        self.copied = false;
        self.evaluator
            .on_password_changed(SecretString::new(password.expose_secret().into()));
        self.password = password;
    }

    fn persist<T: serde::Serialize>(&self, key: &str, value: &T) {
        if let Err(_e) = self.store.set(key, value) {
            #[cfg(feature = "tracing")]
            tracing::warn!("failed to persist {:?}: {}", key, _e);
        }
    }
}
